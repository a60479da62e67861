use crate::shapes::Mode;
use crate::simulation::Rgb;

/// Default particle count (6K particles reads well at 60 FPS on the CPU step)
pub const DEFAULT_PARTICLE_COUNT: usize = 6000;

/// Particle count bounds accepted by `SwarmConfig::particle_count`
pub const MIN_PARTICLE_COUNT: usize = 1000;
pub const MAX_PARTICLE_COUNT: usize = 20_000;

/// Default seed for every pseudo-random stream in a session
pub const DEFAULT_SEED: u64 = 0x5EED_F1E1D;

// ============================================
// Integration Parameters
// ============================================

/// Largest timestep accepted by the engine (stalls are clamped to this)
pub const MAX_DT: f32 = 0.1;

/// Damping and jitter constants are tuned per frame at this rate
pub const REFERENCE_FPS: f32 = 60.0;

/// Hard cap on particle speed after every step (world units per second)
pub const MAX_VELOCITY: f32 = 30.0;

/// Spring stiffness used by most shape modes
pub const DEFAULT_STIFFNESS: f32 = 2.5;

/// Per-frame velocity damping used by most shape modes
pub const DEFAULT_DAMPING: f32 = 0.92;

/// Amplitude of the ambient flow field
pub const FLOW_AMPLITUDE: f32 = 0.4;

/// Pull toward the origin while no control point is active
pub const IDLE_CENTERING: f32 = 0.05;

// ============================================
// Control Point Interaction
// ============================================

/// World-space radius around a control point that feels its force
pub const INTERACTION_RADIUS: f32 = 7.5;

/// Tension at or above which a hand attracts instead of repelling
pub const GRIP_THRESHOLD: f32 = 0.5;

/// Attraction strength of a closed hand
pub const ATTRACT_STRENGTH: f32 = 60.0;

/// Repulsion strength of an open hand
pub const REPEL_STRENGTH: f32 = 25.0;

/// Tangential (curl) strength of an open hand
pub const VORTEX_STRENGTH: f32 = 18.0;

/// World z range a control point's relative depth is mapped onto
pub const CONTROL_DEPTH_RANGE: f32 = 2.0;

/// Half extents of the visible world plane at z = 0 (camera at z = 15, 45° fov)
pub const VIEW_HALF_HEIGHT: f32 = 6.2;
pub const VIEW_HALF_WIDTH: f32 = 11.0;

// ============================================
// Audio Reactivity
// ============================================

/// Level -> excitation gain (point size grows by `excitation * 0.5`)
pub const AUDIO_EXCITATION: f32 = 5.0;

/// Bass -> random velocity jitter gain
pub const AUDIO_JITTER: f32 = 40.0;

/// Frequency bins requested from spectrum sources
pub const SPECTRUM_BINS: usize = 64;

// ============================================
// Color
// ============================================

/// Default swarm color (#06b6d4)
pub const DEFAULT_BASE_COLOR: Rgb = Rgb::new(0.024, 0.714, 0.831);

/// Brightness floor for particles far behind the origin
pub const MIN_DEPTH_BRIGHTNESS: f32 = 0.35;

/// Distance behind the origin over which brightness falls to the floor
pub const DEPTH_FADE_RANGE: f32 = 8.0;

/// Default base point size handed to the renderer
pub const DEFAULT_PARTICLE_SIZE: f32 = 0.12;

// ============================================
// Gesture Pipeline
// ============================================

/// Tip/palm ratio of a fully open hand (tension 0)
pub const DEFAULT_OPEN_RATIO: f32 = 2.2;

/// Tip/palm ratio of a closed fist (tension 1)
pub const DEFAULT_CLOSED_RATIO: f32 = 0.7;

/// Palm width (normalized image units) treated as depth 0
pub const DEPTH_REFERENCE_PALM: f32 = 0.12;

/// (process noise, measurement noise) per filtered axis
pub const POSITION_FILTER: FilterTuning = FilterTuning::new(0.01, 0.1);
pub const DEPTH_FILTER: FilterTuning = FilterTuning::new(0.001, 0.2);
pub const TENSION_FILTER: FilterTuning = FilterTuning::new(0.05, 0.1);

/// Capture cadence of the gesture and audio loops
pub const GESTURE_INTERVAL_MS: u64 = 33;
pub const AUDIO_INTERVAL_MS: u64 = 16;

// ============================================
// Mode Fields
// ============================================

/// Vortex / tornado spin: base + grip-scaled boost
pub const SWIRL_BASE_SPIN: f32 = 4.0;
pub const SWIRL_GRIP_SPIN: f32 = 12.0;

/// Thunder: heavy damping and per-frame crackle (base + grip + excitation)
pub const THUNDER_DAMPING: f32 = 0.6;
pub const THUNDER_BASE_CRACKLE: f32 = 0.2;
pub const THUNDER_GRIP_CRACKLE: f32 = 3.0;

/// Spring stiffness of unpopped balloons
pub const BALLOON_STIFFNESS: f32 = 3.0;

// ============================================
// Game Modes
// ============================================

/// Snake: head follow rate, trail cadence and length
pub const SNAKE_FOLLOW_RATE: f32 = 6.0;
pub const SNAKE_TRAIL_INTERVAL: f32 = 0.05;
pub const SNAKE_BASE_TRAIL: usize = 12;
pub const SNAKE_TRAIL_PER_FOOD: usize = 6;
pub const SNAKE_MAX_TRAIL: usize = 160;
pub const SNAKE_EAT_RADIUS: f32 = 0.9;

/// Tic-tac-toe: placement tension, move debounce and AI think time (seconds)
pub const PLACE_TENSION: f32 = 0.9;
pub const MOVE_DEBOUNCE: f32 = 0.8;
pub const AI_DELAY: f32 = 1.2;
pub const SELECTION_ATTRACT: f32 = 40.0;

/// Memory: sequence playback timing, pick threshold and repeat timeout
pub const MEMORY_START_LENGTH: usize = 3;
pub const MEMORY_SHOW_ON: f32 = 0.7;
pub const MEMORY_SHOW_STEP: f32 = 1.0;
pub const MEMORY_PICK_TENSION: f32 = 0.8;
pub const MEMORY_PICK_COOLDOWN: f32 = 0.6;
pub const MEMORY_REPEAT_TIMEOUT: f32 = 12.0;
pub const MEMORY_CELEBRATE: f32 = 1.5;

/// Balloon pop: pinch threshold, level delay and level cap
pub const PINCH_TENSION: f32 = 0.8;
pub const BALLOON_ADVANCE_DELAY: f32 = 2.0;
pub const BALLOON_MAX_LEVEL: u32 = 5;
pub const BALLOON_BURST_SPEED: f32 = 6.0;
pub const BALLOON_GRAVITY: f32 = 9.8;
pub const BALLOON_SCATTER: f32 = 10.0;

/// Fog reveal: reveal radius, fog weight and brightness, glyph advance ratio
pub const REVEAL_RADIUS: f32 = 2.0;
pub const FOG_WEIGHT: f32 = 0.35;
pub const FOG_BRIGHTNESS: f32 = 0.3;
pub const REVEALED_WEIGHT: f32 = 1.6;
pub const FOG_WANDER: f32 = 1.5;
pub const FOG_ADVANCE_RATIO: f32 = 0.85;

/// Tuning of one recursive estimator axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterTuning {
    pub process_noise: f32,
    pub measurement_noise: f32,
}

impl FilterTuning {
    pub const fn new(process_noise: f32, measurement_noise: f32) -> Self {
        Self {
            process_noise,
            measurement_noise,
        }
    }
}

/// Gesture thresholds exposed as configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    pub open_ratio: f32,
    pub closed_ratio: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            open_ratio: DEFAULT_OPEN_RATIO,
            closed_ratio: DEFAULT_CLOSED_RATIO,
        }
    }
}

/// Runtime configuration of a session
#[derive(Clone, Debug, PartialEq)]
pub struct SwarmConfig {
    pub particle_count: usize,
    pub mode: Mode,
    pub base_color: Rgb,
    pub particle_size: f32,
    pub gesture: GestureConfig,
    pub seed: u64,
}

impl SwarmConfig {
    /// Particle count clamped to the supported range
    pub fn particle_count(&self) -> usize {
        self.particle_count
            .clamp(MIN_PARTICLE_COUNT, MAX_PARTICLE_COUNT)
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            mode: Mode::Vortex,
            base_color: DEFAULT_BASE_COLOR,
            particle_size: DEFAULT_PARTICLE_SIZE,
            gesture: GestureConfig::default(),
            seed: DEFAULT_SEED,
        }
    }
}
