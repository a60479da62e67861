//! Gesture- and audio-steered particle swarm.
//!
//! The crate is the simulation core: target formations per mode, a gesture
//! pipeline turning hand landmarks into smoothed control points, an audio band
//! splitter, the per-mode game state machines and the particle engine that
//! integrates everything once per frame. Capture threads hand their newest
//! values to the frame loop through [`input::InputHub`].

pub mod audio;
pub mod config;
pub mod error;
pub mod gesture;
pub mod input;
pub mod modes;
pub mod session;
pub mod shapes;
pub mod simulation;

pub use audio::AudioBands;
pub use config::SwarmConfig;
pub use gesture::ControlPoint;
pub use session::{FrameReport, Session};
pub use shapes::Mode;
