//! Force terms shared by every mode, and the per-mode force profile.

use rand::Rng;

use crate::config::{
    ATTRACT_STRENGTH, DEFAULT_DAMPING, DEFAULT_STIFFNESS, FLOW_AMPLITUDE, GRIP_THRESHOLD,
    INTERACTION_RADIUS, REPEL_STRENGTH, VIEW_HALF_HEIGHT, VIEW_HALF_WIDTH, VORTEX_STRENGTH,
};
use crate::simulation::Vec3;

/// Half extents of the world plane that viewport coordinates map onto
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewExtent {
    pub half_width: f32,
    pub half_height: f32,
}

impl ViewExtent {
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_width,
            half_height,
        }
    }

    /// Extent for a window aspect ratio, keeping the default visible height
    pub fn for_aspect(aspect: f32) -> Self {
        Self::new(VIEW_HALF_HEIGHT * aspect.max(0.1), VIEW_HALF_HEIGHT)
    }
}

impl Default for ViewExtent {
    fn default() -> Self {
        Self::new(VIEW_HALF_WIDTH, VIEW_HALF_HEIGHT)
    }
}

/// Hit tests in the view plane ignore depth
pub trait ScreenPlane {
    fn distance_xy(self, other: Self) -> f32;
}

impl ScreenPlane for Vec3 {
    fn distance_xy(self, other: Vec3) -> f32 {
        self.truncate().distance(other.truncate())
    }
}

/// How control points act on the swarm this frame
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    /// Closed hands attract, open hands repel and swirl
    Hands,
    /// Every particle in range is pulled toward one point while any hand is active
    AttractTo { point: Vec3, strength: f32 },
    Disabled,
}

/// Mode-specific force applied once per particle
#[derive(Clone, Debug, PartialEq)]
pub enum ModeField {
    None,
    /// Spin around the Y axis
    Swirl { spin: f32 },
    /// Uniform random kicks
    Crackle { amplitude: f32 },
    /// Gravity and sideways scatter for ballistic particles
    Ballistic { gravity: f32, scatter: f32 },
}

impl ModeField {
    pub fn force<R: Rng>(&self, position: Vec3, ballistic: bool, rng: &mut R) -> Vec3 {
        match *self {
            ModeField::None => Vec3::ZERO,
            ModeField::Swirl { spin } => {
                let dist = (position.x * position.x + position.z * position.z).sqrt() + 0.1;
                Vec3::new(-position.z * spin / dist, 0.0, position.x * spin / dist)
            }
            ModeField::Crackle { amplitude } => Vec3::new(
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5),
            ) * amplitude,
            ModeField::Ballistic { gravity, scatter } => {
                if ballistic {
                    Vec3::new(
                        rng.gen_range(-0.5..0.5) * scatter,
                        -gravity,
                        rng.gen_range(-0.5..0.5) * scatter,
                    )
                } else {
                    Vec3::ZERO
                }
            }
        }
    }
}

/// Everything the engine needs to know about the active mode for one step
#[derive(Clone, Debug, PartialEq)]
pub struct ForceProfile {
    pub stiffness: f32,
    /// Velocity retained per reference frame
    pub damping: f32,
    pub flow: f32,
    pub interaction: Interaction,
    pub field: ModeField,
}

impl Default for ForceProfile {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            flow: FLOW_AMPLITUDE,
            interaction: Interaction::Hands,
            field: ModeField::None,
        }
    }
}

/// Smooth pseudo-noise built from sine/cosine terms; each axis in [-1, 1]
pub fn flow_field(p: Vec3, time: f32) -> Vec3 {
    Vec3::new(
        (p.y * 0.5 + time * 0.7).sin() + (p.z * 0.3 + time * 0.4).cos(),
        (p.z * 0.5 + time * 0.6).sin() + (p.x * 0.3 - time * 0.5).cos(),
        (p.x * 0.5 - time * 0.8).sin() + (p.y * 0.3 + time * 0.3).cos(),
    ) * 0.5
}

/// Soft-edged falloff: 1 at the center, 0 at `radius`
pub fn falloff(distance: f32, radius: f32) -> f32 {
    let t = (1.0 - distance / radius).max(0.0);
    t * t
}

/// Force a control point at `hand` with `tension` exerts on `p`
pub fn hand_force(p: Vec3, hand: Vec3, tension: f32) -> Vec3 {
    let delta = hand - p;
    let dist = delta.length();
    if dist >= INTERACTION_RADIUS || dist < 1e-3 {
        return Vec3::ZERO;
    }
    let weight = falloff(dist, INTERACTION_RADIUS);
    let dir = delta * (1.0 / dist);

    if tension >= GRIP_THRESHOLD {
        dir * (ATTRACT_STRENGTH * weight)
    } else {
        let openness = 1.0 - tension;
        let curl = Vec3::Z.cross(dir);
        -dir * (REPEL_STRENGTH * openness * weight) + curl * (VORTEX_STRENGTH * openness * weight)
    }
}

/// Pure attraction toward `point`, same falloff as a closed hand
pub fn attract_force(p: Vec3, point: Vec3, strength: f32) -> Vec3 {
    let delta = point - p;
    let dist = delta.length();
    if dist >= INTERACTION_RADIUS || dist < 1e-3 {
        return Vec3::ZERO;
    }
    delta * (strength * falloff(dist, INTERACTION_RADIUS) / dist)
}
