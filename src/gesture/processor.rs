use std::collections::BTreeMap;

use log::{debug, warn};

use crate::config::{GestureConfig, DEPTH_FILTER, POSITION_FILTER, TENSION_FILTER};
use crate::error::DetectionError;
use crate::gesture::{ControlPoint, HandId, Measurement, RawHand, RecursiveFilter};

/// Most hands tracked at once
pub const MAX_HANDS: usize = 2;

/// Per-hand filter bank, one estimator per axis
#[derive(Clone, Debug)]
struct HandFilters {
    x: RecursiveFilter,
    y: RecursiveFilter,
    z: RecursiveFilter,
    tension: RecursiveFilter,
}

impl HandFilters {
    fn new() -> Self {
        Self {
            x: RecursiveFilter::new(POSITION_FILTER),
            y: RecursiveFilter::new(POSITION_FILTER),
            z: RecursiveFilter::new(DEPTH_FILTER),
            tension: RecursiveFilter::new(TENSION_FILTER),
        }
    }

    /// Current screen position estimate
    fn position(&self) -> (f32, f32) {
        (self.x.estimate(), self.y.estimate())
    }

    fn update(&mut self, id: HandId, m: Measurement) -> ControlPoint {
        ControlPoint::hand(
            id,
            self.x.update(m.x),
            self.y.update(m.y),
            self.z.update(m.z),
            self.tension.update(m.tension),
        )
    }
}

/// Turns raw landmark sets into smoothed control points.
///
/// Filter state is keyed by hand identity and only lives while that hand
/// keeps being detected.
pub struct GestureProcessor {
    config: GestureConfig,
    filters: BTreeMap<HandId, HandFilters>,
}

impl GestureProcessor {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            filters: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Number of hands with live filter state
    pub fn tracked(&self) -> usize {
        self.filters.len()
    }

    /// Forget every hand
    pub fn reset(&mut self) {
        self.filters.clear();
    }

    /// Consume one detector result; errors count as a frame with no hands
    pub fn update_detection(
        &mut self,
        detection: Result<Vec<RawHand>, DetectionError>,
    ) -> Vec<ControlPoint> {
        match detection {
            Ok(hands) => self.update(&hands),
            Err(err) => {
                warn!("Hand detection failed: {}", err);
                self.reset();
                Vec::new()
            }
        }
    }

    /// Process one captured frame of hands
    pub fn update(&mut self, hands: &[RawHand]) -> Vec<ControlPoint> {
        let measured: Vec<(Option<HandId>, Measurement)> = hands
            .iter()
            .filter_map(|hand| match hand.measure(&self.config) {
                Some(m) => Some((hand.handedness, m)),
                None => {
                    debug!(
                        "Skipping malformed hand ({} landmarks)",
                        hand.landmarks.len()
                    );
                    None
                }
            })
            .take(MAX_HANDS)
            .collect();

        let previous: Vec<(HandId, (f32, f32))> = self
            .filters
            .iter()
            .map(|(id, filters)| (*id, filters.position()))
            .collect();
        let assigned = assign_ids(&measured, &previous);
        self.filters.retain(|id, _| assigned.iter().any(|(a, _)| a == id));

        assigned
            .into_iter()
            .map(|(id, m)| {
                self.filters
                    .entry(id)
                    .or_insert_with(HandFilters::new)
                    .update(id, m)
            })
            .collect()
    }
}

/// Labeled hands keep their label. Unlabeled or duplicate labels take the
/// free identity whose previous estimate is nearest, closest pairs first;
/// anything still unmatched falls back to the first free identity in
/// detection order.
fn assign_ids(
    measured: &[(Option<HandId>, Measurement)],
    previous: &[(HandId, (f32, f32))],
) -> Vec<(HandId, Measurement)> {
    let mut taken: Vec<HandId> = Vec::with_capacity(MAX_HANDS);
    let mut slots: Vec<Option<HandId>> = measured
        .iter()
        .map(|(label, _)| match label {
            Some(id) if !taken.contains(id) => {
                taken.push(*id);
                Some(*id)
            }
            _ => None,
        })
        .collect();

    let mut pairs: Vec<(f32, usize, HandId)> = Vec::new();
    for (index, (slot, (_, m))) in slots.iter().zip(measured).enumerate() {
        if slot.is_some() {
            continue;
        }
        for (id, (x, y)) in previous.iter().filter(|(id, _)| !taken.contains(id)) {
            pairs.push(((m.x - x).hypot(m.y - y), index, *id));
        }
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (_, index, id) in pairs {
        if slots[index].is_none() && !taken.contains(&id) {
            taken.push(id);
            slots[index] = Some(id);
        }
    }

    for slot in slots.iter_mut().filter(|s| s.is_none()) {
        if let Some(free) = [HandId::Left, HandId::Right]
            .into_iter()
            .find(|id| !taken.contains(id))
        {
            taken.push(free);
            *slot = Some(free);
        }
    }

    slots
        .into_iter()
        .zip(measured)
        .filter_map(|(slot, (_, m))| slot.map(|id| (id, *m)))
        .collect()
}
