use gesture_swarm::simulation::{Rgb, Vec3};
use wgpu::{Buffer, BufferUsages, Device, Queue};

/// One particle as the point shader reads it (32 bytes, vec4 aligned)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuParticle {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

/// Camera and sprite parameters passed to the point shader (32 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewParams {
    pub aspect: f32,
    pub point_size: f32,
    /// Scene rotation about the vertical axis (radians)
    pub rotation: f32,
    pub camera_distance: f32,

    pub focal_length: f32,
    pub brightness: f32,
    pub _padding: [f32; 2],
}

/// Per-frame upload target for the particle arrays
pub struct SwarmBuffers {
    /// Storage buffer of `GpuParticle`, one per particle
    pub particles: Buffer,
    /// Uniform buffer for `ViewParams`
    pub view_params: Buffer,
    staging: Vec<GpuParticle>,
    count: u32,
}

impl SwarmBuffers {
    pub fn new(device: &Device, count: usize) -> Self {
        let particles = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle-buffer"),
            size: (count.max(1) * std::mem::size_of::<GpuParticle>()) as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let view_params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view-params-buffer"),
            size: std::mem::size_of::<ViewParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            particles,
            view_params,
            staging: Vec::with_capacity(count),
            count: count as u32,
        }
    }

    /// Number of instances to draw
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Copy this frame's positions and colors to the GPU
    pub fn upload(&mut self, queue: &Queue, positions: &[Vec3], colors: &[Rgb]) {
        pack_particles(positions, colors, &mut self.staging);
        self.staging.truncate(self.count as usize);
        queue.write_buffer(&self.particles, 0, bytemuck::cast_slice(&self.staging));
    }

    pub fn update_view(&self, queue: &Queue, params: &ViewParams) {
        queue.write_buffer(&self.view_params, 0, bytemuck::bytes_of(params));
    }
}

/// Interleave positions and colors into `out`, reusing its allocation
pub fn pack_particles(positions: &[Vec3], colors: &[Rgb], out: &mut Vec<GpuParticle>) {
    out.clear();
    out.extend(positions.iter().zip(colors).map(|(p, c)| GpuParticle {
        position: [p.x, p.y, p.z, 1.0],
        color: [c.r, c.g, c.b, 1.0],
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<GpuParticle>(), 32);
        assert_eq!(std::mem::size_of::<ViewParams>(), 32);
    }

    #[test]
    fn test_pack_reuses_buffer() {
        let mut out = Vec::new();
        let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO];
        let colors = [Rgb::GOLD, Rgb::WHITE];
        pack_particles(&positions, &colors, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(out[0].color, [1.0, 0.8, 0.2, 1.0]);

        pack_particles(&positions[..1], &colors[..1], &mut out);
        assert_eq!(out.len(), 1);
    }
}
