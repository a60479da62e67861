//! Stand-in devices so the swarm can be driven without a camera or microphone.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{GestureConfig, AUDIO_INTERVAL_MS, DEPTH_REFERENCE_PALM, GESTURE_INTERVAL_MS};
use crate::error::{DetectionError, DeviceError};
use crate::gesture::{hand_landmarks, HandId, RawHand};
use crate::input::{LandmarkSource, SpectrumSource};

/// Landmark noise added to every synthetic sample (normalized image units)
const LANDMARK_NOISE: f32 = 0.004;

/// One hand circling the frame, slowly clenching and opening
pub struct SyntheticHands {
    config: GestureConfig,
    rng: StdRng,
    frame: u64,
}

impl SyntheticHands {
    pub fn new(config: GestureConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
        }
    }

    fn time(&self) -> f32 {
        self.frame as f32 * GESTURE_INTERVAL_MS as f32 / 1000.0
    }
}

impl LandmarkSource for SyntheticHands {
    fn open(&mut self) -> Result<(), DeviceError> {
        self.frame = 0;
        Ok(())
    }

    fn detect(&mut self) -> Result<Vec<RawHand>, DetectionError> {
        let t = self.time();
        self.frame += 1;

        // Hand leaves the frame for a moment every 12 seconds
        if t % 12.0 > 10.5 {
            return Ok(Vec::new());
        }

        let center = (0.5 + 0.25 * (t * 0.4).cos(), 0.5 + 0.2 * (t * 0.6).sin());
        let grip = 0.5 + 0.5 * (t * TAU / 6.0).sin();
        let palm = DEPTH_REFERENCE_PALM * (1.0 + 0.3 * (t * 0.3).sin());
        let mut hand = hand_landmarks(center, grip, palm, &self.config, Some(HandId::Right));
        for landmark in &mut hand.landmarks {
            landmark.x += self.rng.gen_range(-LANDMARK_NOISE..LANDMARK_NOISE);
            landmark.y += self.rng.gen_range(-LANDMARK_NOISE..LANDMARK_NOISE);
        }
        Ok(vec![hand])
    }
}

/// Beat-like spectrum: a bass kick twice a second over a drifting hiss
pub struct SyntheticSpectrum {
    rng: StdRng,
    frame: u64,
}

impl SyntheticSpectrum {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
        }
    }
}

impl SpectrumSource for SyntheticSpectrum {
    fn open(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn read(&mut self, bins: &mut [u8]) -> Result<(), DeviceError> {
        let t = self.frame as f32 * AUDIO_INTERVAL_MS as f32 / 1000.0;
        self.frame += 1;

        let kick = (-(t % 0.5) * 10.0).exp();
        let len = bins.len().max(1) as f32;
        for (i, bin) in bins.iter_mut().enumerate() {
            let f = i as f32 / len;
            let low = kick * (1.0 - f * 4.0).max(0.0);
            let hiss = 0.15 + 0.1 * (t * 0.7 + f * 5.0).sin() + self.rng.gen_range(0.0..0.1);
            *bin = ((low + hiss * f).clamp(0.0, 1.0) * 255.0) as u8;
        }
        Ok(())
    }
}

/// Device whose permission prompt was refused
#[derive(Clone, Copy, Debug)]
pub struct DeniedDevice {
    device: &'static str,
}

impl DeniedDevice {
    pub fn camera() -> Self {
        Self { device: "camera" }
    }

    pub fn microphone() -> Self {
        Self {
            device: "microphone",
        }
    }
}

impl LandmarkSource for DeniedDevice {
    fn open(&mut self) -> Result<(), DeviceError> {
        Err(DeviceError::PermissionDenied {
            device: self.device,
        })
    }

    fn detect(&mut self) -> Result<Vec<RawHand>, DetectionError> {
        Err(DetectionError::NoFrame)
    }
}

impl SpectrumSource for DeniedDevice {
    fn open(&mut self) -> Result<(), DeviceError> {
        Err(DeviceError::PermissionDenied {
            device: self.device,
        })
    }

    fn read(&mut self, _bins: &mut [u8]) -> Result<(), DeviceError> {
        Err(DeviceError::PermissionDenied {
            device: self.device,
        })
    }
}
