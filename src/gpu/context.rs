use std::sync::Arc;

use gesture_swarm::error::GpuError;
use wgpu::{Device, Instance, Queue, Surface, SurfaceConfiguration};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Device, queue and the window surface the swarm is drawn into
pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
}

impl GpuContext {
    /// Open a device that can present to `window`.
    ///
    /// Fails with [`GpuError::Surface`] when the window cannot back a surface,
    /// [`GpuError::NoAdapter`] when no adapter can present to it,
    /// [`GpuError::Device`] when the adapter refuses the device request and
    /// [`GpuError::UnsupportedSurface`] when the adapter has no configuration
    /// for the surface. The caller logs the error and exits with a failure
    /// code instead of panicking.
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        log::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("gesture-swarm-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let limit = device.limits().max_texture_dimension_2d;
        let (width, height) = surface_extent(window.inner_size(), limit).unwrap_or((1, 1));
        let config = surface
            .get_default_config(&adapter, width, height)
            .ok_or(GpuError::UnsupportedSurface)?;

        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Reconfigure for a new window size; minimised windows keep the old surface
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let limit = self.device.limits().max_texture_dimension_2d;
        if let Some((width, height)) = surface_extent(new_size, limit) {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}

/// Surface size for a window, clamped to the device texture limit.
/// `None` while the window has no area.
fn surface_extent(size: PhysicalSize<u32>, limit: u32) -> Option<(u32, u32)> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    Some((size.width.min(limit), size.height.min(limit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_extent() {
        assert_eq!(surface_extent(PhysicalSize::new(0, 720), 8192), None);
        assert_eq!(surface_extent(PhysicalSize::new(1280, 720), 8192), Some((1280, 720)));
        assert_eq!(surface_extent(PhysicalSize::new(10000, 720), 8192), Some((8192, 720)));
    }
}
