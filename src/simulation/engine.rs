use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::AudioBands;
use crate::config::{
    AUDIO_EXCITATION, AUDIO_JITTER, DEPTH_FADE_RANGE, IDLE_CENTERING, MAX_DT, MAX_VELOCITY,
    MIN_DEPTH_BRIGHTNESS, REFERENCE_FPS,
};
use crate::gesture::ControlPoint;
use crate::simulation::field::{attract_force, flow_field, hand_force};
use crate::simulation::{
    Burst, ForceProfile, Interaction, ParticleBuffers, Rgb, StyleBuffer, TargetBuffer, Vec3,
    ViewExtent,
};

/// Mutable view of the engine state a mode is allowed to touch
pub struct ModeCanvas<'a> {
    pub targets: &'a mut TargetBuffer,
    pub styles: &'a mut StyleBuffer,
    pub bursts: &'a mut Vec<Burst>,
    pub base_color: Rgb,
}

impl ModeCanvas<'_> {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Owns the particle buffers and integrates one step per frame.
pub struct ParticleEngine {
    particles: ParticleBuffers,
    targets: TargetBuffer,
    styles: StyleBuffer,
    bursts: Vec<Burst>,
    /// Active control points in world space, rebuilt each step
    attractors: Vec<(Vec3, f32)>,
    base_color: Rgb,
    base_size: f32,
    point_size: f32,
    rng: StdRng,
}

impl ParticleEngine {
    /// Particles start at rest on their targets
    pub fn new(targets: Vec<Vec3>, base_color: Rgb, base_size: f32, seed: u64) -> Self {
        let count = targets.len();
        Self {
            particles: ParticleBuffers::from_positions(targets.clone(), base_color),
            targets: TargetBuffer::new(targets),
            styles: StyleBuffer::new(count, base_color),
            bursts: Vec::new(),
            attractors: Vec::with_capacity(4),
            base_color,
            base_size,
            point_size: base_size,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.particles.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.particles.velocities
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.particles.colors
    }

    pub fn targets(&self) -> &TargetBuffer {
        &self.targets
    }

    pub fn styles(&self) -> &StyleBuffer {
        &self.styles
    }

    /// Rendered point size after audio scaling
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn base_color(&self) -> Rgb {
        self.base_color
    }

    /// Swap the base color, keeping mode-specific tints intact
    pub fn set_base_color(&mut self, color: Rgb) {
        let old = self.base_color;
        for tint in self.styles.tint.iter_mut().filter(|t| **t == old) {
            *tint = color;
        }
        self.base_color = color;
    }

    pub fn set_base_size(&mut self, size: f32) {
        self.base_size = size.max(0.0);
    }

    pub fn base_size(&self) -> f32 {
        self.base_size
    }

    /// Soft morph onto a new formation: targets replaced, velocities halved
    pub fn retarget(&mut self, points: Vec<Vec3>) {
        self.targets.regenerate(points);
        self.styles.reset(self.base_color);
        self.bursts.clear();
        for v in &mut self.particles.velocities {
            *v = *v * 0.5;
        }
    }

    /// Throw every particle to a random spot inside a ball of `radius`
    pub fn scatter(&mut self, radius: f32) {
        for (p, v) in self
            .particles
            .positions
            .iter_mut()
            .zip(self.particles.velocities.iter_mut())
        {
            let r = radius * self.rng.gen::<f32>().cbrt();
            *p = random_unit(&mut self.rng) * r;
            *v = Vec3::ZERO;
        }
    }

    pub fn canvas(&mut self) -> ModeCanvas<'_> {
        ModeCanvas {
            targets: &mut self.targets,
            styles: &mut self.styles,
            bursts: &mut self.bursts,
            base_color: self.base_color,
        }
    }

    /// Advance the swarm by one (clamped) timestep
    pub fn step(
        &mut self,
        dt: f32,
        controls: &[ControlPoint],
        audio: AudioBands,
        profile: &ForceProfile,
        extent: ViewExtent,
        elapsed: f32,
    ) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
        let audio = audio.clamped();
        self.point_size = self.base_size * (1.0 + audio.level * AUDIO_EXCITATION * 0.5);

        let Self {
            particles,
            targets,
            styles,
            bursts,
            attractors,
            rng,
            ..
        } = self;

        attractors.clear();
        attractors.extend(
            controls
                .iter()
                .filter(|c| c.active)
                .map(|c| (c.world(extent), c.tension.clamp(0.0, 1.0))),
        );
        let idle = attractors.is_empty();

        for burst in bursts.drain(..) {
            for i in burst.range.start..burst.range.end.min(particles.len()) {
                let mut dir = (particles.positions[i] - burst.center).normalize_or_zero();
                if dir == Vec3::ZERO {
                    dir = random_unit(rng);
                }
                particles.velocities[i] += dir * burst.speed;
            }
        }

        let damping = profile.damping.clamp(0.0, 1.0).powf(dt * REFERENCE_FPS);
        let jitter = audio.bass * AUDIO_JITTER;
        let live = targets.live();

        for i in 0..particles.len() {
            let p = particles.positions[i];
            let mut v = particles.velocities[i];

            let mut force = (live[i] - p) * (profile.stiffness * styles.weight[i]);
            force += flow_field(p, elapsed) * profile.flow;

            match &profile.interaction {
                Interaction::Hands => {
                    for &(hand, tension) in attractors.iter() {
                        force += hand_force(p, hand, tension);
                    }
                }
                Interaction::AttractTo { point, strength } => {
                    if !idle {
                        force += attract_force(p, *point, *strength);
                    }
                }
                Interaction::Disabled => {}
            }

            if idle {
                force -= p * IDLE_CENTERING;
            }

            force += profile.field.force(p, styles.ballistic[i], rng);

            if jitter > 0.0 {
                force += Vec3::new(
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                ) * jitter;
            }

            v += force * dt;
            v = (v * damping).clamp_length_max(MAX_VELOCITY);
            if !v.is_finite() {
                v = Vec3::ZERO;
            }

            let next = p + v * dt;
            particles.positions[i] = next;
            particles.velocities[i] = v;
            particles.colors[i] = styles.tint[i].scale(depth_fade(next.z));
        }
    }
}

/// Brightness falloff for particles behind the origin (camera looks down -Z)
pub fn depth_fade(z: f32) -> f32 {
    let behind = (-z).max(0.0) / DEPTH_FADE_RANGE;
    1.0 - behind.min(1.0) * (1.0 - MIN_DEPTH_BRIGHTNESS)
}

/// Uniform direction on the unit sphere
pub fn random_unit<R: Rng>(rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let cos_phi = rng.gen_range(-1.0f32..1.0);
    let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
    Vec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi)
}
