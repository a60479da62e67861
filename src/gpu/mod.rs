mod buffers;
mod context;
mod render;

pub use buffers::{SwarmBuffers, ViewParams};
pub use context::GpuContext;
pub use render::{focal_length, RenderPipeline, CAMERA_DISTANCE};
