//! Decoding of raw pose-model output matrices.

use ndarray::{ArrayView1, ArrayView2};
use thiserror::Error;

use super::DetectionBuilder;
use crate::sampler::Detection;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("pose output has {got} columns, layout expects {expected}")]
    ColumnMismatch { expected: usize, got: usize },
}

/// Column layout of a YOLO-style pose head.
///
/// Each row is one candidate: `cx, cy, w, h`, one score per class, then
/// `x, y, v` for every keypoint. Coordinates are in input pixels.
#[derive(Debug, Clone)]
pub struct PoseOutputLayout {
    pub num_classes: usize,
    pub num_keypoints: usize,
    pub conf_threshold: f32,
    /// IoU above which a lower-scoring box of the same class is suppressed.
    pub iou_threshold: f32,
}

impl Default for PoseOutputLayout {
    fn default() -> Self {
        Self {
            num_classes: 1,
            num_keypoints: 3,
            conf_threshold: 0.25,
            iou_threshold: 0.7,
        }
    }
}

impl PoseOutputLayout {
    pub fn columns(&self) -> usize {
        4 + self.num_classes + 3 * self.num_keypoints
    }

    /// Decode every row above the confidence threshold, then apply per-class NMS.
    ///
    /// Output is sorted by descending confidence.
    pub fn decode(&self, output: ArrayView2<'_, f32>) -> Result<Vec<Detection>, DecodeError> {
        let (_, cols) = output.dim();
        if cols != self.columns() {
            return Err(DecodeError::ColumnMismatch {
                expected: self.columns(),
                got: cols,
            });
        }

        let mut candidates: Vec<Detection> = output
            .rows()
            .into_iter()
            .filter_map(|row| self.decode_row(row))
            .collect();

        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        Ok(non_max_suppression(candidates, self.iou_threshold))
    }

    fn decode_row(&self, row: ArrayView1<'_, f32>) -> Option<Detection> {
        let scores = row.slice(ndarray::s![4..4 + self.num_classes]);
        let (class_id, &confidence) = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))?;

        if !(confidence >= self.conf_threshold) {
            return None;
        }

        let kpts = row.slice(ndarray::s![4 + self.num_classes..]);
        let flat: Vec<f32> = kpts.iter().copied().collect();
        Some(
            DetectionBuilder::new()
                .class_id(class_id as u32)
                .confidence(confidence.clamp(0.0, 1.0))
                .xywh(row[0], row[1], row[2], row[3])
                .keypoints_flat(&flat)
                .build(),
        )
    }
}

/// Greedy per-class non-max suppression over detections sorted by descending confidence.
pub fn non_max_suppression(sorted: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    let mut kept: Vec<Detection> = Vec::with_capacity(sorted.len());
    for det in sorted {
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == det.class_id && k.bbox.iou(&det.bbox) > iou_threshold);
        if !suppressed {
            kept.push(det);
        }
    }
    kept
}
