//! Builder for creating Detection objects from various input formats.

use crate::sampler::{Detection, Keypoint, Rect};

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    class_id: u32,
    bbox: Rect,
    confidence: f32,
    keypoints: Vec<Keypoint>,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_xywh(cx, cy, w, h);
        self
    }

    /// Set bounding box in TLWH format (top, left, width, height).
    pub fn tlwh(mut self, t: f32, l: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(l, t, w, h);
        self
    }

    /// Set the confidence score.
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Append one keypoint; order is preserved.
    pub fn keypoint(mut self, x: f32, y: f32, visibility: f32) -> Self {
        self.keypoints.push(Keypoint::new(x, y, visibility));
        self
    }

    /// Append keypoints from flat `(x, y, v)` triplets.
    pub fn keypoints_flat(mut self, values: &[f32]) -> Self {
        self.keypoints.extend(
            values
                .chunks_exact(3)
                .map(|kp| Keypoint::new(kp[0], kp[1], kp[2])),
        );
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::new(self.class_id, self.confidence, self.bbox, self.keypoints)
    }
}
