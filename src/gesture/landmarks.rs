use crate::config::{GestureConfig, DEPTH_REFERENCE_PALM};
use crate::gesture::HandId;

/// Landmarks per detected hand
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_BASE: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_BASE: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Normalized image-space landmark (x right, y down, both in [0, 1])
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Image-plane distance; detector z is too noisy to use
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One detected hand as the landmark detector reports it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawHand {
    pub landmarks: Vec<Landmark>,
    pub handedness: Option<HandId>,
}

impl RawHand {
    pub fn new(landmarks: Vec<Landmark>, handedness: Option<HandId>) -> Self {
        Self {
            landmarks,
            handedness,
        }
    }

    /// Exactly 21 landmarks, all finite
    pub fn is_well_formed(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT && self.landmarks.iter().all(Landmark::is_finite)
    }

    /// Wrist to index-finger base, the scale reference for grip and depth
    pub fn palm_width(&self) -> f32 {
        self.landmarks[WRIST].distance(&self.landmarks[INDEX_BASE])
    }

    /// Unfiltered measurement, `None` for malformed or degenerate hands
    pub fn measure(&self, config: &GestureConfig) -> Option<Measurement> {
        if !self.is_well_formed() {
            return None;
        }
        let palm = self.palm_width();
        if palm <= f32::EPSILON {
            return None;
        }

        let wrist = &self.landmarks[WRIST];
        let reach: f32 = FINGERTIPS
            .iter()
            .map(|&tip| wrist.distance(&self.landmarks[tip]))
            .sum::<f32>()
            / FINGERTIPS.len() as f32;
        let ratio = reach / palm;

        let center = &self.landmarks[MIDDLE_BASE];
        Some(Measurement {
            x: ((0.5 - center.x) * 2.0).clamp(-1.0, 1.0),
            y: ((0.5 - center.y) * 2.0).clamp(-1.0, 1.0),
            z: (palm / DEPTH_REFERENCE_PALM - 1.0).clamp(-1.0, 1.0),
            tension: tension_from_ratio(ratio, config),
        })
    }
}

/// Raw control values of one hand before smoothing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub tension: f32,
}

/// Map a tip/palm ratio onto [0, 1] grip (closed ratio -> 1, open ratio -> 0)
pub fn tension_from_ratio(ratio: f32, config: &GestureConfig) -> f32 {
    let span = config.open_ratio - config.closed_ratio;
    if span.abs() <= f32::EPSILON || !ratio.is_finite() {
        return 0.0;
    }
    (1.0 - (ratio - config.closed_ratio) / span).clamp(0.0, 1.0)
}

/// Synthesize a plausible hand whose measured grip equals `tension`.
///
/// `center` is the mid-palm landmark in image space, `palm` the wrist to
/// index-base distance. Used by the synthetic gesture source and tests.
pub fn hand_landmarks(
    center: (f32, f32),
    tension: f32,
    palm: f32,
    config: &GestureConfig,
    handedness: Option<HandId>,
) -> RawHand {
    let tension = tension.clamp(0.0, 1.0);
    let ratio = config.closed_ratio + (1.0 - tension) * (config.open_ratio - config.closed_ratio);
    let reach = ratio * palm;

    let (cx, cy) = center;
    let wrist = Landmark::new(cx, cy + palm, 0.0);
    let mut landmarks = vec![wrist; LANDMARK_COUNT];
    landmarks[MIDDLE_BASE] = Landmark::new(cx, cy, 0.0);
    landmarks[INDEX_BASE] = Landmark::new(cx - palm * 0.6, cy + palm * 0.2, 0.0);

    // Fan the tips upward from the wrist, all at the same reach
    for (k, &tip) in FINGERTIPS.iter().enumerate() {
        let angle = (-60.0 + 30.0 * k as f32).to_radians();
        landmarks[tip] = Landmark::new(
            wrist.x + reach * angle.sin(),
            wrist.y - reach * angle.cos(),
            0.0,
        );
    }
    // Knuckles between base and tip so the set looks like a hand
    for finger in 0..5 {
        let tip = landmarks[FINGERTIPS[finger]];
        for joint in 1..4 {
            let idx = FINGERTIPS[finger] - joint;
            if idx == INDEX_BASE || idx == MIDDLE_BASE || idx == WRIST {
                continue;
            }
            let t = 1.0 - joint as f32 * 0.25;
            landmarks[idx] = Landmark::new(
                wrist.x + (tip.x - wrist.x) * t,
                wrist.y + (tip.y - wrist.y) * t,
                0.0,
            );
        }
    }

    // INDEX_BASE was placed with a fixed offset; rescale it to exactly `palm`
    let offset = (landmarks[INDEX_BASE].x - wrist.x, landmarks[INDEX_BASE].y - wrist.y);
    let len = (offset.0 * offset.0 + offset.1 * offset.1).sqrt();
    if len > f32::EPSILON {
        landmarks[INDEX_BASE] = Landmark::new(
            wrist.x + offset.0 / len * palm,
            wrist.y + offset.1 / len * palm,
            0.0,
        );
    }

    RawHand::new(landmarks, handedness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tension_mapping_endpoints() {
        let config = GestureConfig::default();
        assert_eq!(tension_from_ratio(config.open_ratio, &config), 0.0);
        assert_eq!(tension_from_ratio(config.closed_ratio, &config), 1.0);
        assert_eq!(tension_from_ratio(10.0, &config), 0.0);
        assert_eq!(tension_from_ratio(0.1, &config), 1.0);
        let mid = (config.open_ratio + config.closed_ratio) / 2.0;
        assert!((tension_from_ratio(mid, &config) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_synthetic_hand_round_trips_tension() {
        let config = GestureConfig::default();
        for grip in [0.0, 0.25, 0.6, 1.0] {
            let hand = hand_landmarks((0.5, 0.5), grip, 0.12, &config, None);
            let m = hand.measure(&config).unwrap();
            assert!((m.tension - grip).abs() < 1e-3, "grip {} measured {}", grip, m.tension);
        }
    }

    #[test]
    fn test_position_is_mirrored() {
        let config = GestureConfig::default();
        // Hand on the right of the camera image appears on the left of the screen
        let hand = hand_landmarks((0.75, 0.25), 0.5, 0.12, &config, None);
        let m = hand.measure(&config).unwrap();
        assert!((m.x + 0.5).abs() < 1e-5);
        assert!((m.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_depth_follows_palm_size() {
        let config = GestureConfig::default();
        let reference = hand_landmarks((0.5, 0.5), 0.5, DEPTH_REFERENCE_PALM, &config, None);
        assert!(reference.measure(&config).unwrap().z.abs() < 1e-4);

        let near = hand_landmarks((0.5, 0.5), 0.5, DEPTH_REFERENCE_PALM * 1.5, &config, None);
        assert!(near.measure(&config).unwrap().z > 0.4);

        let far = hand_landmarks((0.5, 0.5), 0.5, DEPTH_REFERENCE_PALM * 0.5, &config, None);
        assert!(far.measure(&config).unwrap().z < -0.4);
    }

    #[test]
    fn test_malformed_hands_rejected() {
        let config = GestureConfig::default();
        let short = RawHand::new(vec![Landmark::default(); 20], None);
        assert!(short.measure(&config).is_none());

        let mut nan = hand_landmarks((0.5, 0.5), 0.5, 0.12, &config, None);
        nan.landmarks[7].y = f32::NAN;
        assert!(nan.measure(&config).is_none());

        let collapsed = RawHand::new(vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT], None);
        assert!(collapsed.measure(&config).is_none());
    }
}
