mod color;
mod engine;
mod field;
mod particle;

pub use color::Rgb;
pub use engine::{depth_fade, random_unit, ModeCanvas, ParticleEngine};
pub use field::{
    attract_force, falloff, flow_field, hand_force, ForceProfile, Interaction, ModeField,
    ScreenPlane, ViewExtent,
};
pub use glam::{Quat, Vec3};
pub use particle::{Burst, ParticleBuffers, StyleBuffer, TargetBuffer};
