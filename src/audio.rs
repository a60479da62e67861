//! Reduces a byte-valued frequency spectrum to three control bands.

/// Scalar audio bands, each in [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioBands {
    pub level: f32,
    pub bass: f32,
    pub high: f32,
}

impl AudioBands {
    pub fn new(level: f32, bass: f32, high: f32) -> Self {
        Self { level, bass, high }.clamped()
    }

    /// Copy with every band forced into [0, 1] (NaN becomes 0)
    pub fn clamped(self) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            level: clamp(self.level),
            bass: clamp(self.bass),
            high: clamp(self.high),
        }
    }
}

/// Fraction of the spectrum (from the bottom) averaged into `bass`
pub const BASS_FRACTION: f32 = 0.1;

/// Fraction of the spectrum (from the top) averaged into `high`
pub const HIGH_FRACTION: f32 = 0.5;

/// Stateless band splitter
#[derive(Clone, Copy, Debug, Default)]
pub struct AudioProcessor;

impl AudioProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn update(&self, bins: &[u8]) -> AudioBands {
        let len = bins.len();
        if len == 0 {
            return AudioBands::default();
        }

        let bass_len = ((len as f32 * BASS_FRACTION) as usize).max(1);
        let high_start = ((len as f32 * (1.0 - HIGH_FRACTION)) as usize).min(len - 1);

        AudioBands::new(
            mean(bins),
            mean(&bins[..bass_len]),
            mean(&bins[high_start..]),
        )
    }
}

/// Mean of a byte slice normalized by the largest bin value
fn mean(bins: &[u8]) -> f32 {
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / (bins.len() as f32 * u8::MAX as f32)
}
