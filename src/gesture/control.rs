use crate::config::CONTROL_DEPTH_RANGE;
use crate::simulation::{Vec3, ViewExtent};

/// Identity of a tracked hand, used to keep filter state continuous
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandId {
    Left,
    Right,
}

impl HandId {
    /// Parse a detector handedness label ("Left"/"Right", any case)
    pub fn from_label(label: &str) -> Option<HandId> {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(HandId::Left),
            "right" | "r" => Some(HandId::Right),
            _ => None,
        }
    }

    pub fn other(self) -> HandId {
        match self {
            HandId::Left => HandId::Right,
            HandId::Right => HandId::Left,
        }
    }
}

/// Smoothed per-frame estimate of one hand (or pointer).
///
/// `x`/`y` are viewport coordinates in [-1, 1] (+x right, +y up), `z` a
/// relative depth in [-1, 1] (+z toward the viewer), `tension` the grip in
/// [0, 1] (1 = closed fist).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    pub id: Option<HandId>,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub tension: f32,
    pub active: bool,
}

impl ControlPoint {
    /// Active hand control point, clamped into range
    pub fn hand(id: HandId, x: f32, y: f32, z: f32, tension: f32) -> Self {
        Self {
            id: Some(id),
            x,
            y,
            z,
            tension,
            active: true,
        }
        .clamped()
    }

    /// Mouse / touch fallback: no identity, no depth
    pub fn pointer(x: f32, y: f32, tension: f32) -> Self {
        Self {
            id: None,
            x,
            y,
            z: 0.0,
            tension,
            active: true,
        }
        .clamped()
    }

    /// Copy with every scalar forced into its documented range (NaN becomes 0)
    pub fn clamped(self) -> Self {
        let clamp = |v: f32, lo: f32, hi: f32| if v.is_finite() { v.clamp(lo, hi) } else { 0.0 };
        Self {
            x: clamp(self.x, -1.0, 1.0),
            y: clamp(self.y, -1.0, 1.0),
            z: clamp(self.z, -1.0, 1.0),
            tension: clamp(self.tension, 0.0, 1.0),
            ..self
        }
    }

    /// Position on the world plane the swarm lives in
    pub fn world(&self, extent: ViewExtent) -> Vec3 {
        let c = self.clamped();
        Vec3::new(
            c.x * extent.half_width,
            c.y * extent.half_height,
            c.z * CONTROL_DEPTH_RANGE,
        )
    }
}
