use std::sync::Arc;
use std::time::Instant;

use gesture_swarm::config::DEFAULT_BASE_COLOR;
use gesture_swarm::gesture::ControlPoint;
use gesture_swarm::input::{
    DeniedDevice, InputHub, LandmarkSource, SpectrumSource, SyntheticHands, SyntheticSpectrum,
};
use gesture_swarm::modes::Cue;
use gesture_swarm::session::Session;
use gesture_swarm::simulation::Rgb;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::cli::LaunchOptions;
use crate::gpu::{focal_length, GpuContext, RenderPipeline, SwarmBuffers, ViewParams, CAMERA_DISTANCE};

/// Gentle back-and-forth turn of the scene
const SWAY_AMPLITUDE: f32 = 0.3;
const SWAY_SPEED: f32 = 0.15;

const BRIGHTNESS: f32 = 0.8;

/// Base colors cycled with C
const PALETTE: [Rgb; 5] = [
    DEFAULT_BASE_COLOR,
    Rgb::new(0.925, 0.282, 0.600),
    Rgb::new(0.980, 0.800, 0.082),
    Rgb::new(0.133, 0.773, 0.369),
    Rgb::new(0.659, 0.333, 0.969),
];

const SIZE_STEP: f32 = 1.25;

/// Mouse stand-in used while no hands are tracked
#[derive(Debug, Default)]
struct Pointer {
    /// Viewport coordinates in [-1, 1], +y up
    position: Option<(f32, f32)>,
    pressed: bool,
}

impl Pointer {
    fn control(&self) -> Option<ControlPoint> {
        let (x, y) = self.position?;
        let tension = if self.pressed { 1.0 } else { 0.0 };
        Some(ControlPoint::pointer(x, y, tension))
    }
}

/// Everything that exists only once the window does
struct Renderer {
    gpu: GpuContext,
    buffers: SwarmBuffers,
    pipeline: RenderPipeline,
    bind_group: wgpu::BindGroup,
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    session: Session,
    hub: InputHub,
    pointer: Pointer,
    palette_index: usize,
    last_frame: Instant,
    fps_counter: FpsCounter,
    fps: f64,
    failed: bool,
}

impl App {
    pub fn new(options: LaunchOptions) -> Self {
        let config = options.config();
        let mut session = Session::new(config.clone());
        if options.big_bang() {
            session.big_bang();
        }
        let hub = InputHub::start(gesture_source(&options), audio_source(&options), &config);

        Self {
            window: None,
            renderer: None,
            session,
            hub,
            pointer: Pointer::default(),
            palette_index: 0,
            last_frame: Instant::now(),
            fps_counter: FpsCounter::new(),
            fps: 0.0,
            failed: false,
        }
    }

    /// Whether start-up failed and the process should exit non-zero
    pub fn failed(&self) -> bool {
        self.failed
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop) {
        self.failed = true;
        self.hub.shutdown();
        event_loop.exit();
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let mut controls = self.hub.controls();
        if controls.is_empty() {
            controls.extend(self.pointer.control());
        }
        let report = self.session.frame(dt, &controls, self.hub.audio());
        if let Some(cue) = report.cue {
            log_cue(cue);
        }

        self.render();

        if let Some(fps) = self.fps_counter.tick() {
            self.fps = fps;
            self.update_title();
        } else if report.cue.is_some() {
            self.update_title();
        }
    }

    fn render(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let Renderer {
            gpu,
            buffers,
            pipeline,
            bind_group,
        } = renderer;

        buffers.upload(&gpu.queue, self.session.positions(), self.session.colors());
        buffers.update_view(
            &gpu.queue,
            &ViewParams {
                aspect: gpu.aspect(),
                point_size: self.session.point_size(),
                rotation: SWAY_AMPLITUDE * (self.session.elapsed() * SWAY_SPEED).sin(),
                camera_distance: CAMERA_DISTANCE,
                focal_length: focal_length(),
                brightness: BRIGHTNESS,
                _padding: [0.0, 0.0],
            },
        );

        // Get surface texture
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        pipeline.draw(&mut encoder, &view, bind_group, buffers.count());

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Window title doubles as the HUD
    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let status = self.hub.status();
        let hud = self.session.hud().to_string();
        let hud = if hud.is_empty() {
            String::new()
        } else {
            format!(" [{}]", hud)
        };
        window.set_title(&format!(
            "Gesture Swarm - {}{} - hands {} - audio {} - {:.0} FPS",
            self.session.mode(),
            hud,
            status.gesture,
            status.audio,
            self.fps
        ));
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::ArrowRight | KeyCode::KeyN => {
                self.session.set_mode(self.session.mode().next());
            }
            KeyCode::ArrowLeft | KeyCode::KeyP => {
                self.session.set_mode(self.session.mode().previous());
            }
            KeyCode::KeyR => {
                self.session.reset_mode();
                log::info!("Mode reset");
            }
            KeyCode::Space => {
                self.session.big_bang();
            }
            KeyCode::KeyC => {
                self.palette_index = (self.palette_index + 1) % PALETTE.len();
                self.session.set_base_color(PALETTE[self.palette_index]);
            }
            KeyCode::Minus => {
                let size = self.session.config().particle_size / SIZE_STEP;
                self.session.set_particle_size(size);
                log::info!("Particle size: {:.3}", size);
            }
            KeyCode::Equal => {
                let size = self.session.config().particle_size * SIZE_STEP;
                self.session.set_particle_size(size);
                log::info!("Particle size: {:.3}", size);
            }
            _ => return,
        }
        self.update_title();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing gesture swarm...");

        let window_attrs = Window::default_attributes()
            .with_title("Gesture Swarm - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {}", err);
                self.abort(event_loop);
                return;
            }
        };

        log::info!("Creating GPU context...");
        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(err) => {
                log::error!("GPU setup failed: {}", err);
                self.abort(event_loop);
                return;
            }
        };

        let count = self.session.positions().len();
        log::info!("Creating buffers for {} particles...", count);
        let buffers = SwarmBuffers::new(&gpu.device, count);
        let pipeline = RenderPipeline::new(&gpu.device, gpu.format());
        let bind_group =
            pipeline.create_bind_group(&gpu.device, &buffers.particles, &buffers.view_params);
        self.session.set_aspect(gpu.aspect());

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Left/Right (P/N): Previous/next mode");
        log::info!("  R: Reset mode");
        log::info!("  Space: Scatter particles");
        log::info!("  C: Cycle base color");
        log::info!("  -/=: Particle size");
        log::info!("  Mouse: Pointer when no hands are tracked (hold left button to grip)");
        log::info!("  Escape: Quit");

        self.window = Some(window);
        self.renderer = Some(Renderer {
            gpu,
            buffers,
            pipeline,
            bind_group,
        });
        self.last_frame = Instant::now();
        self.update_title();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.hub.shutdown();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && !event.repeat {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            self.hub.shutdown();
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    let x = position.x as f32 / size.width.max(1) as f32 * 2.0 - 1.0;
                    let y = 1.0 - position.y as f32 / size.height.max(1) as f32 * 2.0;
                    self.pointer.position = Some((x, y));
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.position = None;
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.pointer.pressed = state == ElementState::Pressed;
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    renderer.gpu.resize(new_size);
                    self.session.set_aspect(renderer.gpu.aspect());
                }
            }
            WindowEvent::RedrawRequested => {
                // The token is the single running flag; once cancelled no
                // further frames are requested
                if !self.hub.is_running() {
                    return;
                }
                self.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn gesture_source(options: &LaunchOptions) -> Option<Box<dyn LandmarkSource>> {
    if options.deny_camera {
        Some(Box::new(DeniedDevice::camera()))
    } else if options.synthetic_hands {
        let config = options.config();
        Some(Box::new(SyntheticHands::new(config.gesture, config.seed)))
    } else {
        None
    }
}

fn audio_source(options: &LaunchOptions) -> Option<Box<dyn SpectrumSource>> {
    if options.synthetic_audio {
        Some(Box::new(SyntheticSpectrum::new(options.seed)))
    } else {
        None
    }
}

fn log_cue(cue: Cue) {
    match cue {
        Cue::Win | Cue::Lose | Cue::Draw | Cue::LevelUp => log::info!("{:?}", cue),
        _ => log::debug!("{:?}", cue),
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
