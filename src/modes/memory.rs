use log::debug;
use rand::Rng;

use crate::config::{
    MEMORY_CELEBRATE, MEMORY_PICK_COOLDOWN, MEMORY_PICK_TENSION, MEMORY_REPEAT_TIMEOUT,
    MEMORY_SHOW_ON, MEMORY_SHOW_STEP, MEMORY_START_LENGTH,
};
use crate::modes::{Cue, FrameInput, HudSignal, ModeOutput};
use crate::shapes::{memory_card_at, memory_card_center, memory_card_of, MEMORY_CARDS};
use crate::simulation::{ModeCanvas, Rgb, Vec3};

/// Spin rate of a highlighted card (radians per second)
const CARD_SPIN: f32 = 5.0;

/// Brightness of cards that are not highlighted
const IDLE_CARD_BRIGHTNESS: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MemoryPhase {
    /// Playing the sequence back; `timer` runs from the start of playback
    Showing { timer: f32 },
    /// Waiting for the player; `progress` cards matched so far
    Repeating {
        progress: usize,
        idle: f32,
        cooldown: f32,
        armed: bool,
    },
    Celebrating { timer: f32 },
}

/// Simon-style sequence game on a 4x3 card grid
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryGame {
    sequence: Vec<usize>,
    phase: MemoryPhase,
    active_zone: Option<usize>,
    level: u32,
}

impl MemoryGame {
    pub fn enter<R: Rng>(canvas: &mut ModeCanvas<'_>, rng: &mut R) -> Self {
        let sequence = (0..MEMORY_START_LENGTH)
            .map(|_| rng.gen_range(0..MEMORY_CARDS))
            .collect();
        let game = Self {
            sequence,
            phase: MemoryPhase::Showing { timer: 0.0 },
            active_zone: None,
            level: 1,
        };
        game.paint(canvas, 0.0);
        game
    }

    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    pub fn phase(&self) -> MemoryPhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Card currently lit (playback step or hover)
    pub fn active_zone(&self) -> Option<usize> {
        self.active_zone
    }

    pub fn frame<R: Rng>(
        &mut self,
        input: &FrameInput<'_>,
        canvas: &mut ModeCanvas<'_>,
        rng: &mut R,
    ) -> ModeOutput {
        let dt = input.dt.max(0.0);
        let mut cue = None;

        let phase = self.phase;
        self.phase = match phase {
            MemoryPhase::Showing { timer } => {
                let timer = timer + dt;
                let step = (timer / MEMORY_SHOW_STEP) as usize;
                if step >= self.sequence.len() {
                    self.active_zone = None;
                    MemoryPhase::Repeating {
                        progress: 0,
                        idle: 0.0,
                        cooldown: 0.0,
                        armed: true,
                    }
                } else {
                    let lit = timer - step as f32 * MEMORY_SHOW_STEP < MEMORY_SHOW_ON;
                    self.active_zone = lit.then(|| self.sequence[step]);
                    MemoryPhase::Showing { timer }
                }
            }
            MemoryPhase::Repeating {
                progress,
                idle,
                cooldown,
                armed,
            } => self.repeat(input, progress, idle + dt, (cooldown - dt).max(0.0), armed, &mut cue),
            MemoryPhase::Celebrating { timer } => {
                let timer = timer + dt;
                if timer >= MEMORY_CELEBRATE {
                    self.sequence.push(rng.gen_range(0..MEMORY_CARDS));
                    self.level += 1;
                    self.active_zone = None;
                    cue = Some(Cue::LevelUp);
                    debug!("Memory level {} ({} cards)", self.level, self.sequence.len());
                    MemoryPhase::Showing { timer: 0.0 }
                } else {
                    MemoryPhase::Celebrating { timer }
                }
            }
        };

        self.paint(canvas, input.elapsed);
        ModeOutput::hud(HudSignal::Level(self.level)).with_cue(cue)
    }

    fn repeat(
        &mut self,
        input: &FrameInput<'_>,
        progress: usize,
        idle: f32,
        cooldown: f32,
        armed: bool,
        cue: &mut Option<Cue>,
    ) -> MemoryPhase {
        if idle >= MEMORY_REPEAT_TIMEOUT {
            *cue = Some(Cue::Miss);
            self.active_zone = None;
            return MemoryPhase::Showing { timer: 0.0 };
        }

        let control = input.primary();
        let hover = control.and_then(|c| memory_card_at(input.world(c)));
        self.active_zone = hover;

        let pinched = control.is_some_and(|c| c.tension > MEMORY_PICK_TENSION);
        // A pick needs the grip released since the previous one
        let armed = armed || !pinched;
        let (Some(card), true, true, true) = (hover, pinched, armed, cooldown <= 0.0) else {
            return MemoryPhase::Repeating {
                progress,
                idle,
                cooldown,
                armed,
            };
        };

        if self.sequence.get(progress) != Some(&card) {
            *cue = Some(Cue::Miss);
            self.active_zone = None;
            return MemoryPhase::Showing { timer: 0.0 };
        }

        let progress = progress + 1;
        if progress == self.sequence.len() {
            *cue = Some(Cue::Win);
            return MemoryPhase::Celebrating { timer: 0.0 };
        }
        *cue = Some(Cue::Place);
        MemoryPhase::Repeating {
            progress,
            idle: 0.0,
            cooldown: MEMORY_PICK_COOLDOWN,
            armed: false,
        }
    }

    /// Light and spin the active card, dim the rest
    fn paint(&self, canvas: &mut ModeCanvas<'_>, elapsed: f32) {
        let celebrating = matches!(self.phase, MemoryPhase::Celebrating { .. });
        let angle = elapsed * CARD_SPIN;
        let dim = canvas.base_color.scale(IDLE_CARD_BRIGHTNESS);

        for i in 0..canvas.len() {
            let card = memory_card_of(i);
            if celebrating || self.active_zone == Some(card) {
                let center = memory_card_center(card);
                let base = canvas.targets.base()[i];
                let lx = base.x - center.x;
                canvas.targets.set_live(
                    i,
                    Vec3::new(center.x + lx * angle.cos(), base.y, lx * angle.sin()),
                );
                canvas.styles.tint[i] = zone_color(card);
            } else {
                canvas.targets.restore(i);
                canvas.styles.tint[i] = dim;
            }
        }
    }
}

/// Fixed palette, one hue per card
pub fn zone_color(card: usize) -> Rgb {
    Rgb::from_hue(card as f32 / MEMORY_CARDS as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::ControlPoint;
    use crate::shapes::{generate, Mode};
    use crate::simulation::{Burst, StyleBuffer, TargetBuffer, ViewExtent};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        targets: TargetBuffer,
        styles: StyleBuffer,
        bursts: Vec<Burst>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                targets: TargetBuffer::new(generate(Mode::Memory, 1200, Some(1))),
                styles: StyleBuffer::new(1200, Rgb::WHITE),
                bursts: Vec::new(),
            }
        }

        fn canvas(&mut self) -> ModeCanvas<'_> {
            ModeCanvas {
                targets: &mut self.targets,
                styles: &mut self.styles,
                bursts: &mut self.bursts,
                base_color: Rgb::WHITE,
            }
        }
    }

    fn pointer_on(card: usize, tension: f32) -> [ControlPoint; 1] {
        let extent = ViewExtent::default();
        let c = memory_card_center(card);
        [ControlPoint::pointer(c.x / extent.half_width, c.y / extent.half_height, tension)]
    }

    fn run(
        game: &mut MemoryGame,
        fixture: &mut Fixture,
        rng: &mut StdRng,
        controls: &[ControlPoint],
        seconds: f32,
    ) -> Vec<Cue> {
        let mut cues = Vec::new();
        let mut t = 0.0;
        while t < seconds {
            let input = FrameInput::new(controls, 0.02, t, ViewExtent::default());
            if let Some(cue) = game.frame(&input, &mut fixture.canvas(), rng).cue {
                cues.push(cue);
            }
            t += 0.02;
        }
        cues
    }

    #[test]
    fn test_playback_then_repeat() {
        let mut fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(2);
        let mut game = MemoryGame::enter(&mut fixture.canvas(), &mut rng);
        assert_eq!(game.sequence().len(), MEMORY_START_LENGTH);

        let first = game.sequence()[0];
        let input = FrameInput::new(&[], 0.1, 0.0, ViewExtent::default());
        game.frame(&input, &mut fixture.canvas(), &mut rng);
        assert_eq!(game.active_zone(), Some(first));

        run(&mut game, &mut fixture, &mut rng, &[], MEMORY_SHOW_STEP * MEMORY_START_LENGTH as f32);
        assert!(matches!(game.phase(), MemoryPhase::Repeating { progress: 0, .. }));
    }

    #[test]
    fn test_correct_sequence_levels_up() {
        let mut fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = MemoryGame::enter(&mut fixture.canvas(), &mut rng);
        run(&mut game, &mut fixture, &mut rng, &[], MEMORY_SHOW_STEP * 3.0 + 0.1);

        let sequence = game.sequence().to_vec();
        for card in sequence {
            // Release, then pinch on the card long enough to clear the cooldown
            run(&mut game, &mut fixture, &mut rng, &pointer_on(card, 0.0), 0.1);
            let cues = run(&mut game, &mut fixture, &mut rng, &pointer_on(card, 1.0), MEMORY_PICK_COOLDOWN + 0.1);
            assert!(
                cues.contains(&Cue::Place) || cues.contains(&Cue::Win),
                "pick on card {} gave {:?}",
                card,
                cues
            );
        }
        assert!(matches!(game.phase(), MemoryPhase::Celebrating { .. }));

        let cues = run(&mut game, &mut fixture, &mut rng, &[], MEMORY_CELEBRATE + 0.1);
        assert!(cues.contains(&Cue::LevelUp));
        assert_eq!(game.level(), 2);
        assert_eq!(game.sequence().len(), MEMORY_START_LENGTH + 1);
    }

    #[test]
    fn test_wrong_card_replays() {
        let mut fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = MemoryGame::enter(&mut fixture.canvas(), &mut rng);
        run(&mut game, &mut fixture, &mut rng, &[], MEMORY_SHOW_STEP * 3.0 + 0.1);

        let wrong = (game.sequence()[0] + 1) % MEMORY_CARDS;
        let cues = run(&mut game, &mut fixture, &mut rng, &pointer_on(wrong, 1.0), 0.1);
        assert_eq!(cues, vec![Cue::Miss]);
        assert!(matches!(game.phase(), MemoryPhase::Showing { .. }));
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_timeout_replays() {
        let mut fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(6);
        let mut game = MemoryGame::enter(&mut fixture.canvas(), &mut rng);
        run(&mut game, &mut fixture, &mut rng, &[], MEMORY_SHOW_STEP * 3.0 + 0.1);
        let cues = run(&mut game, &mut fixture, &mut rng, &[], MEMORY_REPEAT_TIMEOUT + 0.1);
        assert_eq!(cues, vec![Cue::Miss]);
    }

    #[test]
    fn test_hover_spins_card() {
        let mut fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = MemoryGame::enter(&mut fixture.canvas(), &mut rng);
        run(&mut game, &mut fixture, &mut rng, &[], MEMORY_SHOW_STEP * 3.0 + 0.1);

        let pointers = pointer_on(5, 0.0);
        let input = FrameInput::new(&pointers, 0.02, 0.3, ViewExtent::default());
        game.frame(&input, &mut fixture.canvas(), &mut rng);
        assert_eq!(game.active_zone(), Some(5));
        let live = fixture.targets.live();
        assert!((0..1200).filter(|&i| memory_card_of(i) == 5).any(|i| live[i].z != 0.0));
        assert!((0..1200).filter(|&i| memory_card_of(i) == 4).all(|i| live[i].z == 0.0));
        assert_eq!(fixture.styles.tint[5], zone_color(5));
        assert_eq!(fixture.styles.tint[4], Rgb::WHITE.scale(IDLE_CARD_BRIGHTNESS));
    }
}
