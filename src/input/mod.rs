//! Capture threads and the last-value-wins hand-off to the frame loop.
//!
//! Each input channel runs on its own named thread at its own cadence and
//! publishes a snapshot into a [`Latest`] slot. The frame loop copies the
//! newest snapshot out and never waits on a capture thread.

mod synthetic;

pub use synthetic::{DeniedDevice, SyntheticHands, SyntheticSpectrum};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use parking_lot::Mutex;

use crate::audio::{AudioBands, AudioProcessor};
use crate::config::{SwarmConfig, AUDIO_INTERVAL_MS, GESTURE_INTERVAL_MS, SPECTRUM_BINS};
use crate::error::{DetectionError, DeviceError};
use crate::gesture::{ControlPoint, GestureProcessor, RawHand};

/// Single-slot mailbox: writers overwrite, readers copy the newest value
#[derive(Debug, Default)]
pub struct Latest<T> {
    slot: Mutex<T>,
}

impl<T: Clone> Latest<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Mutex::new(value),
        }
    }

    pub fn publish(&self, value: T) {
        *self.slot.lock() = value;
    }

    pub fn snapshot(&self) -> T {
        self.slot.lock().clone()
    }
}

/// Shared stop flag for capture loops and the frame loop
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Health of one input channel, shown in the HUD
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ChannelStatus {
    #[default]
    Disabled,
    Starting,
    Active,
    Unavailable(String),
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelStatus::Disabled => f.write_str("off"),
            ChannelStatus::Starting => f.write_str("starting"),
            ChannelStatus::Active => f.write_str("live"),
            ChannelStatus::Unavailable(reason) => write!(f, "unavailable ({})", reason),
        }
    }
}

/// Status of both channels at one instant
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputStatus {
    pub gesture: ChannelStatus,
    pub audio: ChannelStatus,
}

/// Camera + landmark detector
pub trait LandmarkSource: Send {
    /// Acquire the device; failure disables the channel for the session
    fn open(&mut self) -> Result<(), DeviceError>;

    /// Hands in the newest frame
    fn detect(&mut self) -> Result<Vec<RawHand>, DetectionError>;

    fn close(&mut self) {}
}

/// Microphone + frequency analyser
pub trait SpectrumSource: Send {
    fn open(&mut self) -> Result<(), DeviceError>;

    /// Fill `bins` with the newest byte-valued magnitudes
    fn read(&mut self, bins: &mut [u8]) -> Result<(), DeviceError>;

    fn close(&mut self) {}
}

/// Owns the capture threads and their published snapshots
pub struct InputHub {
    token: CancelToken,
    controls: Arc<Latest<Vec<ControlPoint>>>,
    audio: Arc<Latest<AudioBands>>,
    gesture_status: Arc<Latest<ChannelStatus>>,
    audio_status: Arc<Latest<ChannelStatus>>,
    workers: Vec<JoinHandle<()>>,
}

impl InputHub {
    /// Spawn one capture thread per provided source; `None` leaves a
    /// channel disabled.
    pub fn start(
        gesture: Option<Box<dyn LandmarkSource>>,
        audio: Option<Box<dyn SpectrumSource>>,
        config: &SwarmConfig,
    ) -> Self {
        let mut hub = Self {
            token: CancelToken::new(),
            controls: Arc::new(Latest::new(Vec::new())),
            audio: Arc::new(Latest::new(AudioBands::default())),
            gesture_status: Arc::new(Latest::new(ChannelStatus::Disabled)),
            audio_status: Arc::new(Latest::new(ChannelStatus::Disabled)),
            workers: Vec::with_capacity(2),
        };

        if let Some(source) = gesture {
            let token = hub.token.clone();
            let slot = Arc::clone(&hub.controls);
            let status = Arc::clone(&hub.gesture_status);
            let processor = GestureProcessor::new(config.gesture);
            status.publish(ChannelStatus::Starting);
            hub.workers.extend(spawn_worker("gesture-capture", &hub.gesture_status, move || {
                gesture_loop(source, processor, &slot, &status, &token)
            }));
        }

        if let Some(source) = audio {
            let token = hub.token.clone();
            let slot = Arc::clone(&hub.audio);
            let status = Arc::clone(&hub.audio_status);
            status.publish(ChannelStatus::Starting);
            hub.workers.extend(spawn_worker("audio-capture", &hub.audio_status, move || {
                audio_loop(source, &slot, &status, &token)
            }));
        }

        hub
    }

    /// Newest smoothed control points (empty without hands)
    pub fn controls(&self) -> Vec<ControlPoint> {
        self.controls.snapshot()
    }

    /// Newest audio bands (silent without audio)
    pub fn audio(&self) -> AudioBands {
        self.audio.snapshot()
    }

    pub fn status(&self) -> InputStatus {
        InputStatus {
            gesture: self.gesture_status.snapshot(),
            audio: self.audio_status.snapshot(),
        }
    }

    /// Token shared with the capture threads; the frame loop checks it too
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Cancel, then join every capture thread. Idempotent.
    pub fn shutdown(&mut self) {
        self.token.cancel();
        if self.workers.is_empty() {
            return;
        }
        for worker in self.workers.drain(..) {
            let name = worker.thread().name().unwrap_or("capture").to_string();
            if worker.join().is_err() {
                error!("{} thread panicked", name);
            }
        }
        info!("Input capture stopped");
    }
}

impl Drop for InputHub {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_worker<F>(name: &str, status: &Latest<ChannelStatus>, body: F) -> Option<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    match thread::Builder::new().name(name.to_string()).spawn(body) {
        Ok(handle) => Some(handle),
        Err(err) => {
            error!("Failed to spawn {} thread: {}", name, err);
            status.publish(ChannelStatus::Unavailable(err.to_string()));
            None
        }
    }
}

/// Sleep whatever is left of `interval` since `started`, in short slices so
/// cancellation is noticed promptly
fn pace(started: Instant, interval: Duration, token: &CancelToken) {
    const SLICE: Duration = Duration::from_millis(5);
    while !token.is_cancelled() {
        let spent = started.elapsed();
        if spent >= interval {
            return;
        }
        thread::sleep((interval - spent).min(SLICE));
    }
}

fn gesture_loop(
    mut source: Box<dyn LandmarkSource>,
    mut processor: GestureProcessor,
    slot: &Latest<Vec<ControlPoint>>,
    status: &Latest<ChannelStatus>,
    token: &CancelToken,
) {
    if let Err(err) = source.open() {
        error!("Gesture input disabled: {}", err);
        status.publish(ChannelStatus::Unavailable(err.to_string()));
        return;
    }
    info!("Gesture input active");
    status.publish(ChannelStatus::Active);

    let interval = Duration::from_millis(GESTURE_INTERVAL_MS);
    while !token.is_cancelled() {
        let started = Instant::now();
        let controls = processor.update_detection(source.detect());
        slot.publish(controls);
        pace(started, interval, token);
    }

    source.close();
    slot.publish(Vec::new());
}

fn audio_loop(
    mut source: Box<dyn SpectrumSource>,
    slot: &Latest<AudioBands>,
    status: &Latest<ChannelStatus>,
    token: &CancelToken,
) {
    if let Err(err) = source.open() {
        error!("Audio input disabled: {}", err);
        status.publish(ChannelStatus::Unavailable(err.to_string()));
        return;
    }
    info!("Audio input active");
    status.publish(ChannelStatus::Active);

    let processor = AudioProcessor::new();
    let mut bins = vec![0u8; SPECTRUM_BINS];
    let interval = Duration::from_millis(AUDIO_INTERVAL_MS);
    while !token.is_cancelled() {
        let started = Instant::now();
        if let Err(err) = source.read(&mut bins) {
            warn!("Audio device lost: {}", err);
            status.publish(ChannelStatus::Unavailable(err.to_string()));
            break;
        }
        slot.publish(processor.update(&bins));
        pace(started, interval, token);
    }

    source.close();
    slot.publish(AudioBands::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GestureConfig;
    use crate::gesture::hand_landmarks;

    /// Poll `check` until it holds or two seconds pass
    fn eventually(mut check: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        check()
    }

    struct FixedHand {
        closed: Arc<AtomicBool>,
    }

    impl LandmarkSource for FixedHand {
        fn open(&mut self) -> Result<(), DeviceError> {
            Ok(())
        }

        fn detect(&mut self) -> Result<Vec<RawHand>, DetectionError> {
            let config = GestureConfig::default();
            Ok(vec![hand_landmarks((0.5, 0.5), 0.8, 0.12, &config, None)])
        }

        fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    struct FlakyDetector;

    impl LandmarkSource for FlakyDetector {
        fn open(&mut self) -> Result<(), DeviceError> {
            Ok(())
        }

        fn detect(&mut self) -> Result<Vec<RawHand>, DetectionError> {
            Err(DetectionError::Backend("model not loaded".into()))
        }
    }

    #[test]
    fn test_latest_keeps_newest_value() {
        let slot = Latest::new(1);
        slot.publish(2);
        slot.publish(3);
        assert_eq!(slot.snapshot(), 3);
        assert_eq!(slot.snapshot(), 3);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_hand_snapshots_flow_and_shutdown_closes_source() {
        let closed = Arc::new(AtomicBool::new(false));
        let source = FixedHand {
            closed: Arc::clone(&closed),
        };
        let mut hub = InputHub::start(Some(Box::new(source)), None, &SwarmConfig::default());

        assert!(eventually(|| !hub.controls().is_empty()));
        let controls = hub.controls();
        assert!((controls[0].tension - 0.8).abs() < 1e-3);
        assert_eq!(hub.status().gesture, ChannelStatus::Active);
        assert_eq!(hub.status().audio, ChannelStatus::Disabled);

        hub.shutdown();
        assert!(closed.load(Ordering::SeqCst));
        assert!(hub.controls().is_empty());
        assert!(!hub.is_running());
        hub.shutdown();
    }

    #[test]
    fn test_denied_devices_disable_channels() {
        let hub = InputHub::start(
            Some(Box::new(DeniedDevice::camera())),
            Some(Box::new(DeniedDevice::microphone())),
            &SwarmConfig::default(),
        );
        assert!(eventually(|| {
            let status = hub.status();
            matches!(status.gesture, ChannelStatus::Unavailable(_))
                && matches!(status.audio, ChannelStatus::Unavailable(_))
        }));
        assert!(hub.controls().is_empty());
        assert_eq!(hub.audio(), AudioBands::default());
    }

    #[test]
    fn test_detection_errors_yield_no_hands() {
        let hub = InputHub::start(Some(Box::new(FlakyDetector)), None, &SwarmConfig::default());
        assert!(eventually(|| hub.status().gesture == ChannelStatus::Active));
        thread::sleep(Duration::from_millis(80));
        assert!(hub.controls().is_empty());
    }

    #[test]
    fn test_synthetic_audio_publishes_bands() {
        let mut hub = InputHub::start(
            None,
            Some(Box::new(SyntheticSpectrum::new(3))),
            &SwarmConfig::default(),
        );
        assert!(eventually(|| hub.audio().level > 0.0));
        hub.shutdown();
        assert_eq!(hub.audio(), AudioBands::default());
    }
}
