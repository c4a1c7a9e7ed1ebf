//! Per-frame detection instances handed to the sampler.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::sampler::config::ReferenceAnchor;
use crate::sampler::rect::Rect;

/// A single keypoint as reported by a pose detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Visibility flag or keypoint confidence, passed through untouched.
    #[serde(default)]
    pub visibility: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    #[inline]
    pub fn position(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }
}

/// Detection input for the sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label assigned by the detector
    pub class_id: u32,
    /// Detection confidence score in [0, 1]
    pub confidence: f32,
    /// Bounding box in pixels
    #[serde(default)]
    pub bbox: Rect,
    /// Keypoints in detector order
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl Detection {
    pub fn new(class_id: u32, confidence: f32, bbox: Rect, keypoints: Vec<Keypoint>) -> Self {
        Self {
            class_id,
            confidence,
            bbox,
            keypoints,
        }
    }

    /// A detection reduced to one point: a single keypoint and a zero-size box
    /// at `(x, y)`, so every anchor resolves to the same position.
    pub fn at_point(class_id: u32, confidence: f32, x: f32, y: f32) -> Self {
        Self {
            class_id,
            confidence,
            bbox: Rect::new(x, y, 0.0, 0.0),
            keypoints: vec![Keypoint::new(x, y, 1.0)],
        }
    }

    /// The coordinate used for motion comparison.
    ///
    /// Returns `None` when the anchor names a keypoint the detection does not have.
    pub fn reference_point(&self, anchor: ReferenceAnchor) -> Option<Point2<f32>> {
        match anchor {
            ReferenceAnchor::Keypoint(index) => self.keypoints.get(index).map(Keypoint::position),
            ReferenceAnchor::BoxCenter => Some(self.bbox.center()),
        }
    }
}
