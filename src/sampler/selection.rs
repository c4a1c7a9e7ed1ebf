//! Qualifying-detection selection.

use crate::sampler::detection::Detection;

/// Pick the highest-confidence detection of `class_id`.
///
/// Ties keep the first instance in detector order.
pub fn select_qualifying(detections: &[Detection], class_id: u32) -> Option<&Detection> {
    detections
        .iter()
        .filter(|d| d.class_id == class_id)
        .fold(None::<&Detection>, |best, det| match best {
            Some(b) if b.confidence >= det.confidence => Some(b),
            _ => Some(det),
        })
}
