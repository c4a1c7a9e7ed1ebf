//! YOLO pose label records and the COCO -> YOLO converter.

use std::fmt;
use std::fs;
use std::path::Path;

use log::info;

use super::coco::CocoDataset;
use super::error::{DatasetError, IoContext};
use crate::sampler::{Keypoint, Rect};

/// One line of a YOLO pose label file, all coordinates normalized to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct PoseLabel {
    pub class_id: u32,
    /// Center x, center y, width, height
    pub bbox: [f64; 4],
    pub keypoints: Vec<Keypoint>,
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

impl PoseLabel {
    /// Build a label from flat COCO `x, y, v` keypoints in pixels.
    ///
    /// The box is the envelope of every keypoint, visible or not.
    pub fn from_coco_keypoints(
        raw: &[f32],
        image_width: u32,
        image_height: u32,
        class_id: u32,
    ) -> Option<Self> {
        if raw.is_empty() || raw.len() % 3 != 0 || image_width == 0 || image_height == 0 {
            return None;
        }
        let envelope = Rect::enclosing(raw.chunks_exact(3).map(|kp| (kp[0], kp[1])))?;
        let (w, h) = (image_width as f64, image_height as f64);
        let [x_min, y_min, x_max, y_max] = envelope.to_tlbr().map(f64::from);

        let bbox = [
            round6((x_min + x_max) / 2.0 / w),
            round6((y_min + y_max) / 2.0 / h),
            round6((x_max - x_min) / w),
            round6((y_max - y_min) / h),
        ];
        let keypoints = raw
            .chunks_exact(3)
            .map(|kp| {
                Keypoint::new(
                    round6(kp[0] as f64 / w) as f32,
                    round6(kp[1] as f64 / h) as f32,
                    round6(kp[2] as f64) as f32,
                )
            })
            .collect();

        Some(Self {
            class_id,
            bbox,
            keypoints,
        })
    }
}

impl fmt::Display for PoseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_id)?;
        for v in self.bbox {
            write!(f, " {}", v)?;
        }
        for kp in &self.keypoints {
            // back through f64 rounding so f32 noise never reaches the file
            write!(
                f,
                " {} {} {}",
                round6(kp.x as f64),
                round6(kp.y as f64),
                round6(kp.visibility as f64)
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub label_files: usize,
    pub labels: usize,
}

/// Write one `<image stem>.txt` per annotated image into `output_dir`.
///
/// Images without annotations get no file. Every label uses `class_id`.
pub fn convert_coco_to_yolo(
    json_path: &Path,
    output_dir: &Path,
    class_id: u32,
) -> Result<ConversionSummary, DatasetError> {
    let dataset = CocoDataset::from_path(json_path)?;
    fs::create_dir_all(output_dir).at(output_dir)?;

    let grouped = dataset.annotations_by_image();
    let mut summary = ConversionSummary::default();

    for image in &dataset.images {
        let Some(annotations) = grouped.get(&image.id) else {
            continue;
        };
        if image.width == 0 || image.height == 0 {
            return Err(DatasetError::InvalidImageSize {
                image_id: image.id,
                width: image.width,
                height: image.height,
            });
        }

        let mut lines = String::new();
        for ann in annotations {
            let label =
                PoseLabel::from_coco_keypoints(&ann.keypoints, image.width, image.height, class_id)
                    .ok_or(DatasetError::MalformedKeypoints {
                        image_id: image.id,
                        len: ann.keypoints.len(),
                    })?;
            lines.push_str(&label.to_string());
            lines.push('\n');
        }

        let stem = Path::new(&image.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.file_name.clone());
        let label_path = output_dir.join(format!("{}.txt", stem));
        fs::write(&label_path, lines).at(&label_path)?;

        summary.label_files += 1;
        summary.labels += annotations.len();
    }

    info!(
        "converted {} labels into {} YOLO files under {}",
        summary.labels,
        summary.label_files,
        output_dir.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_keypoints() {
        // three keypoints, the last one invisible at the origin
        let raw = [50.0, 20.0, 2.0, 150.0, 80.0, 2.0, 0.0, 0.0, 0.0];
        let label = PoseLabel::from_coco_keypoints(&raw, 200, 100, 0).unwrap();

        assert_eq!(label.bbox, [0.375, 0.4, 0.75, 0.8]);
        assert_eq!(label.keypoints[0], Keypoint::new(0.25, 0.2, 2.0));
        assert_eq!(
            label.to_string(),
            "0 0.375 0.4 0.75 0.8 0.25 0.2 2 0.75 0.8 2 0 0 0"
        );
    }

    #[test]
    fn test_rounds_to_six_places() {
        let label = PoseLabel::from_coco_keypoints(&[1.0, 1.0, 1.0], 3, 3, 1).unwrap();
        assert_eq!(label.to_string(), "1 0.333333 0.333333 0 0 0.333333 0.333333 1");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(PoseLabel::from_coco_keypoints(&[], 10, 10, 0).is_none());
        assert!(PoseLabel::from_coco_keypoints(&[1.0, 2.0], 10, 10, 0).is_none());
        assert!(PoseLabel::from_coco_keypoints(&[1.0, 2.0, 2.0], 0, 10, 0).is_none());
    }
}
