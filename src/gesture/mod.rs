//! Hand landmarks in, smoothed control points out.

mod control;
mod filter;
mod landmarks;
mod processor;

pub use control::{ControlPoint, HandId};
pub use filter::RecursiveFilter;
pub use landmarks::{
    hand_landmarks, tension_from_ratio, Landmark, Measurement, RawHand, INDEX_BASE, INDEX_TIP,
    LANDMARK_COUNT, MIDDLE_BASE, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP, WRIST,
};
pub use processor::{GestureProcessor, MAX_HANDS};
