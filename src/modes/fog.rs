use rand::Rng;

use crate::config::{FOG_BRIGHTNESS, FOG_WANDER, FOG_WEIGHT, REVEALED_WEIGHT, REVEAL_RADIUS};
use crate::modes::{Cue, FrameInput, HudSignal, ModeOutput};
use crate::shapes::{glyph_points, FOG_GLYPHS};
use crate::simulation::{ModeCanvas, ScreenPlane, Vec3};

/// Uncover a glyph hidden in drifting fog by sweeping a hand over it
#[derive(Clone, Debug, PartialEq)]
pub struct FogGame {
    glyph: usize,
    revealed: Vec<bool>,
    revealed_count: usize,
}

impl FogGame {
    /// First glyph; the targets already spell it
    pub fn enter(canvas: &mut ModeCanvas<'_>) -> Self {
        let game = Self {
            glyph: 0,
            revealed: vec![false; canvas.len()],
            revealed_count: 0,
        };
        game.paint(canvas);
        game
    }

    pub fn glyph(&self) -> char {
        FOG_GLYPHS[self.glyph % FOG_GLYPHS.len()]
    }

    pub fn glyph_index(&self) -> usize {
        self.glyph
    }

    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    /// Share of particles uncovered so far
    pub fn ratio(&self) -> f32 {
        if self.revealed.is_empty() {
            return 0.0;
        }
        self.revealed_count as f32 / self.revealed.len() as f32
    }

    pub fn frame(&mut self, input: &FrameInput<'_>, canvas: &mut ModeCanvas<'_>) -> ModeOutput {
        let hands: Vec<Vec3> = input.active().map(|c| input.world(c)).collect();
        let t = input.elapsed;
        let before = self.revealed_count;

        for i in 0..self.revealed.len().min(canvas.len()) {
            if self.revealed[i] {
                continue;
            }
            let home = canvas.targets.base()[i];
            if hands.iter().any(|h| h.distance_xy(home) < REVEAL_RADIUS) {
                self.revealed[i] = true;
                self.revealed_count += 1;
                canvas.targets.restore(i);
                canvas.styles.weight[i] = REVEALED_WEIGHT;
                canvas.styles.tint[i] = canvas.base_color;
                continue;
            }
            let phase = i as f32;
            let drift = Vec3::new(
                (t + phase).sin(),
                (t * 0.5 + phase * 1.3).cos(),
                (t * 0.3 + phase).sin() * 0.5,
            );
            canvas.targets.set_live(i, home + drift * FOG_WANDER);
        }

        let cue = (self.revealed_count > before && before == 0).then_some(Cue::Place);
        ModeOutput::hud(HudSignal::Reveal {
            index: self.glyph,
            ratio: self.ratio(),
        })
        .with_cue(cue)
    }

    /// Move on to the next glyph and hide it again
    pub fn advance<R: Rng>(&mut self, canvas: &mut ModeCanvas<'_>, rng: &mut R) -> ModeOutput {
        self.glyph = (self.glyph + 1) % FOG_GLYPHS.len();
        canvas
            .targets
            .regenerate(glyph_points(self.glyph(), canvas.len(), rng));
        self.revealed.iter_mut().for_each(|r| *r = false);
        self.revealed_count = 0;
        self.paint(canvas);
        ModeOutput {
            hud: HudSignal::Reveal {
                index: self.glyph,
                ratio: 0.0,
            },
            cue: Some(Cue::LevelUp),
        }
    }

    /// Tint and weight every particle from the reveal mask and current base color
    pub fn paint(&self, canvas: &mut ModeCanvas<'_>) {
        let fog = canvas.base_color.scale(FOG_BRIGHTNESS);
        for (i, revealed) in self.revealed.iter().enumerate().take(canvas.len()) {
            let (tint, weight) = if *revealed {
                (canvas.base_color, REVEALED_WEIGHT)
            } else {
                (fog, FOG_WEIGHT)
            };
            canvas.styles.tint[i] = tint;
            canvas.styles.weight[i] = weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::ControlPoint;
    use crate::shapes::{generate, Mode};
    use crate::simulation::{Burst, Rgb, StyleBuffer, TargetBuffer, ViewExtent};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        targets: TargetBuffer,
        styles: StyleBuffer,
        bursts: Vec<Burst>,
    }

    impl Fixture {
        fn new(count: usize) -> Self {
            Self {
                targets: TargetBuffer::new(generate(Mode::FogReveal, count, Some(1))),
                styles: StyleBuffer::new(count, Rgb::WHITE),
                bursts: Vec::new(),
            }
        }

        fn canvas(&mut self) -> ModeCanvas<'_> {
            self.canvas_with(Rgb::WHITE)
        }

        fn canvas_with(&mut self, base_color: Rgb) -> ModeCanvas<'_> {
            ModeCanvas {
                targets: &mut self.targets,
                styles: &mut self.styles,
                bursts: &mut self.bursts,
                base_color,
            }
        }
    }

    #[test]
    fn test_starts_fogged() {
        let mut fixture = Fixture::new(800);
        let game = FogGame::enter(&mut fixture.canvas());
        assert_eq!(game.glyph(), 'A');
        assert_eq!(game.ratio(), 0.0);
        assert!(fixture.styles.weight.iter().all(|w| *w == FOG_WEIGHT));
    }

    #[test]
    fn test_unrevealed_particles_wander() {
        let mut fixture = Fixture::new(800);
        let mut game = FogGame::enter(&mut fixture.canvas());
        let input = FrameInput::new(&[], 0.016, 1.0, ViewExtent::default());
        game.frame(&input, &mut fixture.canvas());
        let moved = fixture
            .targets
            .live()
            .iter()
            .zip(fixture.targets.base())
            .filter(|(live, base)| live != base)
            .count();
        assert!(moved > 700);
    }

    #[test]
    fn test_hand_reveals_nearby_particles() {
        let mut fixture = Fixture::new(800);
        let mut game = FogGame::enter(&mut fixture.canvas());
        let control = [ControlPoint::pointer(0.0, 0.0, 0.0)];
        let input = FrameInput::new(&control, 0.016, 0.0, ViewExtent::default());
        let out = game.frame(&input, &mut fixture.canvas());

        assert!(game.ratio() > 0.0 && game.ratio() < 1.0);
        assert_eq!(out.cue, Some(Cue::Place));
        for (i, revealed) in game.revealed().iter().enumerate() {
            let home = fixture.targets.base()[i];
            assert_eq!(*revealed, home.distance_xy(Vec3::ZERO) < REVEAL_RADIUS);
            if *revealed {
                assert_eq!(fixture.targets.live()[i], home);
                assert_eq!(fixture.styles.weight[i], REVEALED_WEIGHT);
            }
        }

        // Revealed particles stay revealed after the hand leaves
        let count = game.revealed().iter().filter(|r| **r).count();
        let input = FrameInput::new(&[], 0.016, 0.1, ViewExtent::default());
        game.frame(&input, &mut fixture.canvas());
        assert_eq!(game.revealed().iter().filter(|r| **r).count(), count);
    }

    #[test]
    fn test_advance_resets_mask() {
        let mut fixture = Fixture::new(800);
        let mut rng = StdRng::seed_from_u64(8);
        let mut game = FogGame::enter(&mut fixture.canvas());
        let control = [ControlPoint::pointer(0.0, 0.0, 0.0)];
        let input = FrameInput::new(&control, 0.016, 0.0, ViewExtent::default());
        game.frame(&input, &mut fixture.canvas());

        let out = game.advance(&mut fixture.canvas(), &mut rng);
        assert_eq!(out.cue, Some(Cue::LevelUp));
        assert_eq!(game.glyph(), 'B');
        assert_eq!(game.ratio(), 0.0);
        assert!(game.revealed().iter().all(|r| !*r));
    }

    #[test]
    fn test_paint_follows_new_base_color() {
        let mut fixture = Fixture::new(800);
        let mut game = FogGame::enter(&mut fixture.canvas());
        let control = [ControlPoint::pointer(0.0, 0.0, 0.0)];
        let input = FrameInput::new(&control, 0.016, 0.0, ViewExtent::default());
        game.frame(&input, &mut fixture.canvas());

        let red = Rgb::new(1.0, 0.0, 0.0);
        game.paint(&mut fixture.canvas_with(red));
        for (i, revealed) in game.revealed().iter().enumerate() {
            let expected = if *revealed { red } else { red.scale(FOG_BRIGHTNESS) };
            assert_eq!(fixture.styles.tint[i], expected);
        }
    }
}
