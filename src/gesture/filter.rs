use crate::config::FilterTuning;

/// Error covariance a freshly seeded filter starts from
const INITIAL_COVARIANCE: f32 = 1.0;

/// One-dimensional recursive noise filter (scalar Kalman form).
///
/// Higher measurement noise gives smoother, laggier output; higher process
/// noise tracks faster with more jitter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecursiveFilter {
    tuning: FilterTuning,
    estimate: f32,
    error_covariance: f32,
    seeded: bool,
}

impl RecursiveFilter {
    /// Unseeded filter; the first measurement becomes the estimate
    pub fn new(tuning: FilterTuning) -> Self {
        Self {
            tuning,
            estimate: 0.0,
            error_covariance: INITIAL_COVARIANCE,
            seeded: false,
        }
    }

    /// Filter already holding `estimate`
    pub fn with_estimate(tuning: FilterTuning, estimate: f32) -> Self {
        Self {
            seeded: true,
            estimate,
            ..Self::new(tuning)
        }
    }

    pub fn estimate(&self) -> f32 {
        self.estimate
    }

    pub fn error_covariance(&self) -> f32 {
        self.error_covariance
    }

    /// Fold one measurement in and return the new estimate
    pub fn update(&mut self, measurement: f32) -> f32 {
        if !measurement.is_finite() {
            return self.estimate;
        }
        if !self.seeded {
            self.seeded = true;
            self.estimate = measurement;
            return self.estimate;
        }

        self.error_covariance += self.tuning.process_noise;
        let gain =
            self.error_covariance / (self.error_covariance + self.tuning.measurement_noise);
        self.estimate += gain * (measurement - self.estimate);
        self.error_covariance *= 1.0 - gain;
        self.estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEPTH_FILTER, POSITION_FILTER, TENSION_FILTER};

    #[test]
    fn test_first_measurement_seeds_estimate() {
        let mut filter = RecursiveFilter::new(POSITION_FILTER);
        assert_eq!(filter.update(0.42), 0.42);
    }

    #[test]
    fn test_converges_to_constant_measurement() {
        for tuning in [POSITION_FILTER, DEPTH_FILTER, TENSION_FILTER] {
            let mut filter = RecursiveFilter::with_estimate(tuning, 0.0);
            let mut estimate = 0.0;
            for _ in 0..300 {
                estimate = filter.update(1.0);
            }
            assert!(
                (estimate - 1.0).abs() < 1e-3,
                "{:?} settled at {}",
                tuning,
                estimate
            );
        }
    }

    #[test]
    fn test_estimate_moves_monotonically_toward_step() {
        let mut filter = RecursiveFilter::with_estimate(POSITION_FILTER, 0.0);
        let mut previous = 0.0;
        for _ in 0..50 {
            let next = filter.update(1.0);
            assert!(next >= previous && next <= 1.0);
            previous = next;
        }
    }

    #[test]
    fn test_higher_measurement_noise_lags_more() {
        let mut smooth = RecursiveFilter::with_estimate(FilterTuning::new(0.01, 1.0), 0.0);
        let mut fast = RecursiveFilter::with_estimate(FilterTuning::new(0.01, 0.01), 0.0);
        for _ in 0..5 {
            smooth.update(1.0);
            fast.update(1.0);
        }
        assert!(fast.estimate() > smooth.estimate());
    }

    #[test]
    fn test_covariance_stays_positive_and_bounded() {
        let mut filter = RecursiveFilter::with_estimate(TENSION_FILTER, 0.5);
        for i in 0..1000 {
            filter.update((i % 7) as f32 / 7.0);
            assert!(filter.error_covariance() > 0.0);
            assert!(filter.error_covariance() <= INITIAL_COVARIANCE + TENSION_FILTER.process_noise);
        }
    }

    #[test]
    fn test_non_finite_measurement_ignored() {
        let mut filter = RecursiveFilter::with_estimate(POSITION_FILTER, 0.3);
        assert_eq!(filter.update(f32::NAN), 0.3);
        assert_eq!(filter.update(f32::INFINITY), 0.3);
    }
}
