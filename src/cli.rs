use clap::Parser;
use gesture_swarm::config::{
    GestureConfig, SwarmConfig, DEFAULT_BASE_COLOR, DEFAULT_CLOSED_RATIO, DEFAULT_OPEN_RATIO,
    DEFAULT_PARTICLE_COUNT, DEFAULT_PARTICLE_SIZE, DEFAULT_SEED,
};
use gesture_swarm::shapes::Mode;
use gesture_swarm::simulation::Rgb;

/// Everything the binary needs to start a session
#[derive(Parser, Clone, Debug, PartialEq)]
#[command(name = "gesture-swarm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Particle swarm driven by hand gestures and audio", long_about = None)]
#[command(after_help = "\
Keys: Left/Right switch mode, R reset mode, Space scatter, C cycle color,
-/= particle size, Esc quit. Without hands the mouse acts as a pointer;
hold the left button to grip.")]
pub struct LaunchOptions {
    /// Particle count (clamped to 1000-20000)
    #[arg(long, default_value_t = DEFAULT_PARTICLE_COUNT)]
    pub particles: usize,

    /// Starting mode (sphere, vortex, snake, tic-tac-toe, ...); unknown names start on the sphere
    #[arg(long, value_parser = parse_mode, default_value = "vortex")]
    pub mode: Mode,

    /// Random seed for formations and games
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Base particle color as hex, e.g. 06b6d4
    #[arg(long, value_parser = parse_color)]
    pub color: Option<Rgb>,

    /// Base particle size
    #[arg(long, default_value_t = DEFAULT_PARTICLE_SIZE)]
    pub size: f32,

    /// Tip/palm ratio of a fully open hand
    #[arg(long, default_value_t = DEFAULT_OPEN_RATIO)]
    pub open_ratio: f32,

    /// Tip/palm ratio of a closed fist
    #[arg(long, default_value_t = DEFAULT_CLOSED_RATIO)]
    pub closed_ratio: f32,

    /// Drive the swarm with a simulated hand
    #[arg(long)]
    pub synthetic_hands: bool,

    /// Drive the swarm with a simulated beat
    #[arg(long)]
    pub synthetic_audio: bool,

    /// Simulate a refused camera permission
    #[arg(long)]
    pub deny_camera: bool,

    /// Start with particles already on their targets
    #[arg(long)]
    pub no_big_bang: bool,
}

impl LaunchOptions {
    pub fn config(&self) -> SwarmConfig {
        SwarmConfig {
            particle_count: self.particles,
            mode: self.mode,
            base_color: self.color.unwrap_or(DEFAULT_BASE_COLOR),
            particle_size: self.size,
            gesture: GestureConfig {
                open_ratio: self.open_ratio,
                closed_ratio: self.closed_ratio,
            },
            seed: self.seed,
        }
    }

    pub fn big_bang(&self) -> bool {
        !self.no_big_bang
    }
}

fn parse_mode(name: &str) -> Result<Mode, String> {
    Ok(Mode::from_name(name))
}

fn parse_color(hex: &str) -> Result<Rgb, String> {
    Rgb::from_hex(hex).ok_or_else(|| format!("expected a hex color such as 06b6d4, got {hex:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<LaunchOptions, clap::Error> {
        LaunchOptions::try_parse_from(std::iter::once("gesture-swarm").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_is_well_formed() {
        LaunchOptions::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let options = parse(&[]).unwrap();
        assert_eq!(options.config(), SwarmConfig::default());
        assert!(options.big_bang());
        assert!(!options.synthetic_hands && !options.synthetic_audio && !options.deny_camera);
    }

    #[test]
    fn test_flags_and_values() {
        let options = parse(&[
            "--particles",
            "12000",
            "--mode",
            "tic-tac-toe",
            "--seed",
            "7",
            "--color",
            "#ff0000",
            "--closed-ratio",
            "0.8",
            "--synthetic-hands",
            "--deny-camera",
            "--no-big-bang",
        ])
        .unwrap();
        let config = options.config();
        assert_eq!(config.particle_count, 12000);
        assert_eq!(config.mode, Mode::TicTacToe);
        assert_eq!(config.seed, 7);
        assert_eq!(config.base_color, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(config.gesture.closed_ratio, 0.8);
        assert!(options.synthetic_hands && options.deny_camera);
        assert!(!options.synthetic_audio && !options.big_bang());
    }

    #[test]
    fn test_unknown_mode_falls_back_to_sphere() {
        let options = parse(&["--mode", "warp-drive"]).unwrap();
        assert_eq!(options.config().mode, Mode::Sphere);
    }

    #[test]
    fn test_errors() {
        let kind = |args: &[&str]| parse(args).unwrap_err().kind();
        assert_eq!(kind(&["--particles"]), ErrorKind::InvalidValue);
        assert_eq!(kind(&["--seed", "abc"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["--color", "teal"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["--fullscreen"]), ErrorKind::UnknownArgument);
        assert_eq!(kind(&["-h"]), ErrorKind::DisplayHelp);
    }
}
