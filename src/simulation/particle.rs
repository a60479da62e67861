use std::ops::Range;

use crate::simulation::{Rgb, Vec3};

/// Parallel per-particle state arrays.
///
/// Particles are addressed by index only; all three arrays share one length
/// fixed at construction.
pub struct ParticleBuffers {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub colors: Vec<Rgb>,
}

impl ParticleBuffers {
    /// Particles at the given positions, at rest
    pub fn from_positions(positions: Vec<Vec3>, color: Rgb) -> Self {
        let count = positions.len();
        Self {
            positions,
            velocities: vec![Vec3::ZERO; count],
            colors: vec![color; count],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Destination points: `base` as generated, `live` after mode mutation.
pub struct TargetBuffer {
    base: Vec<Vec3>,
    live: Vec<Vec3>,
}

impl TargetBuffer {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            live: points.clone(),
            base: points,
        }
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Replace every point; panics on a cardinality change
    pub fn regenerate(&mut self, points: Vec<Vec3>) {
        assert_eq!(points.len(), self.base.len(), "Target count mismatch");
        self.live.copy_from_slice(&points);
        self.base = points;
    }

    pub fn base(&self) -> &[Vec3] {
        &self.base
    }

    pub fn live(&self) -> &[Vec3] {
        &self.live
    }

    /// Displace a point for this frame only; `base` is untouched
    pub fn set_live(&mut self, index: usize, point: Vec3) {
        self.live[index] = point;
    }

    pub fn restore(&mut self, index: usize) {
        self.live[index] = self.base[index];
    }
}

/// Per-particle overrides written by the active mode.
pub struct StyleBuffer {
    pub tint: Vec<Rgb>,
    /// Spring weight multiplier; 0 detaches a particle from its target
    pub weight: Vec<f32>,
    /// Ballistic particles feel the mode field's gravity instead of a spring
    pub ballistic: Vec<bool>,
}

impl StyleBuffer {
    pub fn new(count: usize, tint: Rgb) -> Self {
        Self {
            tint: vec![tint; count],
            weight: vec![1.0; count],
            ballistic: vec![false; count],
        }
    }

    pub fn reset(&mut self, tint: Rgb) {
        self.tint.fill(tint);
        self.weight.fill(1.0);
        self.ballistic.fill(false);
    }

    pub fn tint_range(&mut self, range: Range<usize>, tint: Rgb) {
        self.tint[range].fill(tint);
    }
}

/// One-shot outward impulse for a range of particles
#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    pub range: Range<usize>,
    pub center: Vec3,
    pub speed: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_share_length() {
        let buffers = ParticleBuffers::from_positions(vec![Vec3::ZERO; 32], Rgb::WHITE);
        assert_eq!(buffers.len(), 32);
        assert_eq!(buffers.velocities.len(), 32);
        assert_eq!(buffers.colors.len(), 32);
        assert!(buffers.velocities.iter().all(|v| *v == Vec3::ZERO));
    }

    #[test]
    fn test_live_targets_restore_to_base() {
        let mut targets = TargetBuffer::new(vec![Vec3::new(1.0, 0.0, 0.0); 4]);
        targets.set_live(2, Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(targets.live()[2], Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(targets.base()[2], Vec3::new(1.0, 0.0, 0.0));

        targets.restore(2);
        assert_eq!(targets.live()[2], targets.base()[2]);
    }

    #[test]
    fn test_regenerate_drops_live_displacement() {
        let mut targets = TargetBuffer::new(vec![Vec3::ZERO; 4]);
        targets.set_live(1, Vec3::splat(9.0));
        targets.regenerate(vec![Vec3::X; 4]);
        assert_eq!(targets.base(), targets.live());
        assert_eq!(targets.live()[1], Vec3::X);
    }

    #[test]
    #[should_panic(expected = "Target count mismatch")]
    fn test_regenerate_rejects_resize() {
        let mut targets = TargetBuffer::new(vec![Vec3::ZERO; 4]);
        targets.regenerate(vec![Vec3::ZERO; 5]);
    }

    #[test]
    fn test_style_reset() {
        let mut styles = StyleBuffer::new(8, Rgb::WHITE);
        styles.weight[3] = 0.0;
        styles.ballistic[3] = true;
        styles.tint_range(0..4, Rgb::GOLD);

        styles.reset(Rgb::WHITE);
        assert!(styles.weight.iter().all(|w| *w == 1.0));
        assert!(styles.ballistic.iter().all(|b| !b));
        assert!(styles.tint.iter().all(|t| *t == Rgb::WHITE));
    }
}
