//! Per-frame orchestration: mode state, particle engine and mode switching.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::AudioBands;
use crate::config::{SwarmConfig, FOG_ADVANCE_RATIO, MAX_DT};
use crate::gesture::ControlPoint;
use crate::modes::{Cue, FrameInput, HudSignal, ModeState};
use crate::shapes::{generate_with, Mode};
use crate::simulation::{ParticleEngine, Rgb, Vec3, ViewExtent};

/// Radius of the start-up scatter
const BIG_BANG_RADIUS: f32 = 30.0;

/// What one frame produced for the HUD
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub hud: HudSignal,
    pub cue: Option<Cue>,
}

/// One running swarm: owns the engine and the active mode
pub struct Session {
    config: SwarmConfig,
    engine: ParticleEngine,
    mode: Mode,
    state: ModeState,
    /// Randomness for formations and game logic; the engine has its own
    rng: StdRng,
    extent: ViewExtent,
    elapsed: f32,
    hud: HudSignal,
}

impl Session {
    pub fn new(config: SwarmConfig) -> Self {
        let count = config.particle_count();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mode = config.mode;
        let targets = generate_with(mode, count, &mut rng);
        let mut engine = ParticleEngine::new(
            targets,
            config.base_color,
            config.particle_size,
            config.seed.wrapping_add(1),
        );
        let state = ModeState::enter(mode, &mut engine.canvas(), &mut rng);
        info!("Session started: {} particles, mode {}", count, mode);

        Self {
            config,
            engine,
            mode,
            state,
            rng,
            extent: ViewExtent::default(),
            elapsed: 0.0,
            hud: HudSignal::None,
        }
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> &ModeState {
        &self.state
    }

    pub fn engine(&self) -> &ParticleEngine {
        &self.engine
    }

    pub fn positions(&self) -> &[Vec3] {
        self.engine.positions()
    }

    pub fn colors(&self) -> &[Rgb] {
        self.engine.colors()
    }

    pub fn point_size(&self) -> f32 {
        self.engine.point_size()
    }

    /// HUD signal of the most recent frame
    pub fn hud(&self) -> HudSignal {
        self.hud
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn extent(&self) -> ViewExtent {
        self.extent
    }

    /// Match the control-point mapping to the window aspect ratio
    pub fn set_aspect(&mut self, aspect: f32) {
        self.extent = ViewExtent::for_aspect(aspect);
    }

    pub fn set_base_color(&mut self, color: Rgb) {
        self.config.base_color = color;
        self.engine.set_base_color(color);
        self.state.repaint(&mut self.engine.canvas());
    }

    pub fn set_particle_size(&mut self, size: f32) {
        self.config.particle_size = size;
        self.engine.set_base_size(size);
    }

    /// Fling every particle outward so the first formation assembles itself
    pub fn big_bang(&mut self) {
        self.engine.scatter(BIG_BANG_RADIUS);
    }

    /// Morph into `mode` with freshly generated targets and fresh mode state
    pub fn set_mode(&mut self, mode: Mode) {
        let targets = generate_with(mode, self.engine.len(), &mut self.rng);
        self.engine.retarget(targets);
        self.state = ModeState::enter(mode, &mut self.engine.canvas(), &mut self.rng);
        self.mode = mode;
        self.hud = HudSignal::None;
        info!("Mode switched to {}", mode);
    }

    /// Restart the current mode from scratch
    pub fn reset_mode(&mut self) {
        self.set_mode(self.mode);
    }

    /// Advance mode logic and physics by one frame
    pub fn frame(
        &mut self,
        dt: f32,
        controls: &[ControlPoint],
        audio: AudioBands,
    ) -> FrameReport {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
        self.elapsed += dt;

        let controls: Vec<ControlPoint> = controls.iter().map(|c| c.clamped()).collect();
        let input = FrameInput::new(&controls, dt, self.elapsed, self.extent);

        let mut output = self
            .state
            .frame(&input, &mut self.engine.canvas(), &mut self.rng);

        if let ModeState::FogReveal(game) = &mut self.state {
            if game.ratio() >= FOG_ADVANCE_RATIO {
                debug!("Glyph {} revealed", game.glyph());
                output = game.advance(&mut self.engine.canvas(), &mut self.rng);
            }
        }

        let profile = self.state.profile(self.mode, &input, audio);
        self.engine
            .step(dt, &controls, audio, &profile, self.extent, self.elapsed);

        self.hud = output.hud;
        FrameReport {
            hud: output.hud,
            cue: output.cue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FOG_BRIGHTNESS;
    use crate::modes::TurnState;

    fn session(mode: Mode) -> Session {
        Session::new(SwarmConfig {
            mode,
            ..SwarmConfig::default()
        })
    }

    #[test]
    fn test_idle_sphere_holds_its_shape() {
        let mut session = session(Mode::Sphere);
        assert_eq!(session.positions().len(), 6000);

        for _ in 0..(5.0 / 0.016) as usize {
            session.frame(0.016, &[], AudioBands::default());
        }

        for (i, p) in session.positions().iter().enumerate() {
            let r = p.length();
            assert!((4.0..=6.0).contains(&r), "particle {} drifted to radius {}", i, r);
        }
    }

    #[test]
    fn test_closed_hand_gathers_nearby_particles() {
        let mut session = session(Mode::Sphere);
        let near: Vec<usize> = session
            .positions()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.length() < 6.0)
            .map(|(i, _)| i)
            .collect();
        let mean_distance = |s: &Session| {
            near.iter().map(|&i| s.positions()[i].length()).sum::<f32>() / near.len() as f32
        };
        let before = mean_distance(&session);

        let control = [ControlPoint::pointer(0.0, 0.0, 0.95)];
        for _ in 0..(2.0 / 0.016) as usize {
            session.frame(0.016, &control, AudioBands::default());
        }
        assert!(mean_distance(&session) < before);
    }

    #[test]
    fn test_tic_tac_toe_player_then_ai() {
        let mut session = session(Mode::TicTacToe);
        let control = [ControlPoint::pointer(0.0, 0.0, 1.0)];
        let mut cues = Vec::new();
        for _ in 0..(2.0 / 0.016) as usize {
            let report = session.frame(0.016, &control, AudioBands::default());
            cues.extend(report.cue);
        }

        let ModeState::TicTacToe(game) = session.state() else {
            panic!("tic-tac-toe state expected");
        };
        assert_eq!(game.marks(), 2);
        assert_eq!(cues, vec![Cue::Place, Cue::Place]);
        assert_eq!(session.hud(), HudSignal::Turn(TurnState::PlayerTurn));
    }

    #[test]
    fn test_mode_round_trip_resets_state() {
        let mut session = session(Mode::Snake);
        let fresh = session.state().clone();

        let control = [ControlPoint::pointer(0.5, 0.5, 0.0)];
        for _ in 0..60 {
            session.frame(0.016, &control, AudioBands::default());
        }
        assert_ne!(session.state(), &fresh);

        session.set_mode(Mode::Memory);
        session.set_mode(Mode::Snake);
        assert_eq!(session.state(), &fresh);
        assert_eq!(session.hud(), HudSignal::None);
    }

    #[test]
    fn test_mode_switch_keeps_particle_count() {
        let mut session = session(Mode::Vortex);
        for mode in Mode::ALL {
            session.set_mode(mode);
            session.frame(0.016, &[], AudioBands::default());
            assert_eq!(session.positions().len(), 6000);
            assert_eq!(session.engine().targets().len(), 6000);
        }
    }

    #[test]
    fn test_fog_advances_once_mostly_revealed() {
        let mut session = Session::new(SwarmConfig {
            mode: Mode::FogReveal,
            particle_count: 1000,
            ..SwarmConfig::default()
        });
        let sweep: Vec<ControlPoint> = (0..9)
            .map(|k| ControlPoint::pointer(-0.4 + 0.1 * k as f32, 0.0, 0.0))
            .collect();

        let mut advanced = false;
        for frame in 0..400 {
            let y = ((frame % 40) as f32 / 20.0 - 1.0) * 0.8;
            let controls: Vec<ControlPoint> = sweep
                .iter()
                .map(|c| ControlPoint::pointer(c.x, y, 0.0))
                .collect();
            let report = session.frame(0.016, &controls, AudioBands::default());
            if report.cue == Some(Cue::LevelUp) {
                advanced = true;
                break;
            }
        }
        assert!(advanced);
        let ModeState::FogReveal(game) = session.state() else {
            panic!("fog state expected");
        };
        assert_eq!(game.glyph(), 'B');
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut session = session(Mode::Sphere);
        let before = session.positions().to_vec();
        session.frame(f32::NAN, &[], AudioBands::default());
        session.frame(-1.0, &[], AudioBands::default());
        assert_eq!(session.positions(), &before[..]);
        assert_eq!(session.elapsed(), 0.0);
    }

    #[test]
    fn test_color_change_recolors_fog() {
        let mut session = session(Mode::FogReveal);
        let red = Rgb::new(1.0, 0.0, 0.0);
        session.set_base_color(red);
        let fog = red.scale(FOG_BRIGHTNESS);
        assert!(session.engine().styles().tint.iter().all(|t| *t == fog));
        assert_eq!(session.config().base_color, red);
    }
}
