use std::collections::VecDeque;
use std::ops::Range;

use rand::Rng;

use crate::config::{
    SNAKE_BASE_TRAIL, SNAKE_EAT_RADIUS, SNAKE_FOLLOW_RATE, SNAKE_MAX_TRAIL, SNAKE_TRAIL_INTERVAL,
    SNAKE_TRAIL_PER_FOOD,
};
use crate::modes::{Cue, FrameInput, HudSignal, ModeOutput};
use crate::simulation::{ModeCanvas, Rgb, ScreenPlane, Vec3};

const START_HEAD: Vec3 = Vec3::new(-4.0, 0.0, 0.0);
const START_FOOD: Vec3 = Vec3::new(4.0, 2.0, 0.0);

/// Share of the viewport new food may land in
const FOOD_SPREAD: f32 = 0.8;

/// Thickness of the body tube
const BODY_RADIUS: f32 = 0.25;

#[derive(Clone, Debug, PartialEq)]
pub struct SnakeGame {
    head: Vec3,
    dir: Vec3,
    trail: VecDeque<Vec3>,
    score: u32,
    food: Vec3,
    trail_clock: f32,
    body: Range<usize>,
    food_range: Range<usize>,
}

impl SnakeGame {
    /// Deterministic start: same head, food and empty trail every time
    pub fn enter(canvas: &mut ModeCanvas<'_>) -> Self {
        let count = canvas.len();
        let body_end = count * 9 / 10;
        let game = Self {
            head: START_HEAD,
            dir: Vec3::new(1.0, 0.0, 0.0),
            trail: VecDeque::with_capacity(SNAKE_MAX_TRAIL),
            score: 0,
            food: START_FOOD,
            trail_clock: 0.0,
            body: 0..body_end,
            food_range: body_end..count,
        };
        canvas.styles.tint_range(game.food_range.clone(), Rgb::GOLD);
        game
    }

    pub fn head(&self) -> Vec3 {
        self.head
    }

    pub fn food(&self) -> Vec3 {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn trail(&self) -> &VecDeque<Vec3> {
        &self.trail
    }

    /// Trail segments kept for the current score
    pub fn trail_capacity(&self) -> usize {
        (SNAKE_BASE_TRAIL + self.score as usize * SNAKE_TRAIL_PER_FOOD).min(SNAKE_MAX_TRAIL)
    }

    pub fn frame<R: Rng>(
        &mut self,
        input: &FrameInput<'_>,
        canvas: &mut ModeCanvas<'_>,
        rng: &mut R,
    ) -> ModeOutput {
        let goal = match input.primary() {
            Some(control) => input.world(control),
            None => wander(input.elapsed, input),
        };

        let follow = 1.0 - (-SNAKE_FOLLOW_RATE * input.dt.max(0.0)).exp();
        let next = self.head.lerp(goal, follow);
        let step = next - self.head;
        if step.length_squared() > 1e-8 {
            self.dir = step.normalize_or_zero();
        }
        self.head = next;

        self.trail_clock += input.dt.max(0.0);
        while self.trail_clock >= SNAKE_TRAIL_INTERVAL {
            self.trail_clock -= SNAKE_TRAIL_INTERVAL;
            self.trail.push_front(self.head);
        }
        self.trail.truncate(self.trail_capacity());

        let mut cue = None;
        if self.head.distance_xy(self.food) < SNAKE_EAT_RADIUS {
            self.score += 1;
            self.food = Vec3::new(
                rng.gen_range(-1.0..1.0) * input.extent.half_width * FOOD_SPREAD,
                rng.gen_range(-1.0..1.0) * input.extent.half_height * FOOD_SPREAD,
                0.0,
            );
            cue = Some(Cue::Eat);
        }

        self.draw(canvas, input.elapsed);
        ModeOutput::hud(HudSignal::Score(self.score)).with_cue(cue)
    }

    fn draw(&self, canvas: &mut ModeCanvas<'_>, elapsed: f32) {
        let body_len = self.body.len().max(1);
        let segments = self.trail.len();
        for i in self.body.clone() {
            let along = i as f32 / body_len as f32;
            let spine = match segments {
                0 => self.head,
                1 => self.trail[0],
                _ => {
                    let f = along * (segments - 1) as f32;
                    let k = f as usize;
                    let next = (k + 1).min(segments - 1);
                    self.trail[k].lerp(self.trail[next], f - k as f32)
                }
            };
            // Tube tapering toward the tail
            let angle = i as f32 * 2.399_963;
            let radius = BODY_RADIUS * (1.0 - along * 0.6) * ((i % 7) as f32 / 6.0);
            let offset = Vec3::new(angle.cos() * radius, angle.sin() * radius, angle.sin() * radius);
            canvas.targets.set_live(i, spine + offset);
        }

        let food_len = self.food_range.len().max(1);
        for (k, i) in self.food_range.clone().enumerate() {
            let angle = k as f32 * 2.399_963 + elapsed * 3.0;
            let radius = 0.35 * ((k % 5) as f32 + 1.0) / 5.0;
            let lift = (k as f32 / food_len as f32 - 0.5) * 0.4;
            canvas.targets.set_live(
                i,
                self.food + Vec3::new(angle.cos() * radius, angle.sin() * radius, lift),
            );
        }
    }
}

/// Lissajous path the head follows without input
fn wander(t: f32, input: &FrameInput<'_>) -> Vec3 {
    Vec3::new(
        (t * 0.7).sin() * input.extent.half_width * 0.6,
        (t * 1.1).sin() * input.extent.half_height * 0.6,
        0.0,
    )
}
