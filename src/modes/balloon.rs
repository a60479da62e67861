use log::info;
use rand::Rng;

use crate::config::{
    BALLOON_ADVANCE_DELAY, BALLOON_BURST_SPEED, BALLOON_MAX_LEVEL, PINCH_TENSION,
};
use crate::modes::{Cue, FrameInput, HudSignal, ModeOutput};
use crate::shapes::{balloon_layout, balloon_points, balloon_slice, Balloon};
use crate::simulation::{Burst, ModeCanvas, Rgb, ScreenPlane};

/// Pinch balloons to pop them; clear a level to get one more balloon
#[derive(Clone, Debug, PartialEq)]
pub struct BalloonGame {
    level: u32,
    balloons: Vec<Balloon>,
    popped: Vec<bool>,
    advance_timer: Option<f32>,
}

impl BalloonGame {
    /// Level 1; the targets already hold the level-1 layout
    pub fn enter(canvas: &mut ModeCanvas<'_>) -> Self {
        let game = Self::at_level(1);
        game.paint(canvas);
        game
    }

    fn at_level(level: u32) -> Self {
        let balloons = balloon_layout(level);
        Self {
            level,
            popped: vec![false; balloons.len()],
            balloons,
            advance_timer: None,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn popped(&self) -> &[bool] {
        &self.popped
    }

    pub fn all_popped(&self) -> bool {
        self.popped.iter().all(|p| *p)
    }

    pub fn frame<R: Rng>(
        &mut self,
        input: &FrameInput<'_>,
        canvas: &mut ModeCanvas<'_>,
        rng: &mut R,
    ) -> ModeOutput {
        let mut cue = None;
        let count = canvas.len();
        let n = self.balloons.len();

        for control in input.active().filter(|c| c.tension > PINCH_TENSION) {
            let point = input.world(control);
            for (k, balloon) in self.balloons.iter().enumerate() {
                if self.popped[k] || point.distance_xy(balloon.center) >= balloon.radius {
                    continue;
                }
                self.popped[k] = true;
                let range = balloon_slice(k, n, count);
                for i in range.clone() {
                    canvas.styles.ballistic[i] = true;
                    canvas.styles.weight[i] = 0.0;
                }
                canvas.bursts.push(Burst {
                    range,
                    center: balloon.center,
                    speed: BALLOON_BURST_SPEED,
                });
                cue = Some(Cue::Pop);
            }
        }

        if self.all_popped() {
            let timer = self.advance_timer.unwrap_or(0.0) + input.dt.max(0.0);
            self.advance_timer = Some(timer);
            if timer >= BALLOON_ADVANCE_DELAY {
                let next = self.level % BALLOON_MAX_LEVEL + 1;
                *self = Self::at_level(next);
                canvas
                    .targets
                    .regenerate(balloon_points(&self.balloons, count, rng));
                canvas.styles.reset(canvas.base_color);
                self.paint(canvas);
                info!("Balloon level {}", next);
                cue = Some(Cue::LevelUp);
            }
        }

        ModeOutput::hud(HudSignal::Level(self.level)).with_cue(cue)
    }

    /// One hue per balloon
    fn paint(&self, canvas: &mut ModeCanvas<'_>) {
        let n = self.balloons.len();
        for k in 0..n {
            let hue = k as f32 / n as f32 + 0.55;
            let tint = Rgb::from_hue(hue).lerp(Rgb::WHITE, 0.25);
            canvas.styles.tint_range(balloon_slice(k, n, canvas.len()), tint);
        }
    }
}
