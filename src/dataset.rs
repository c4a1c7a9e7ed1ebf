//! Helpers for turning sampled keyframes into a pose-training dataset.

mod coco;
mod error;
mod split;
mod yolo;

pub use coco::{CocoAnnotation, CocoDataset, CocoImage};
pub use error::DatasetError;
pub use split::{DEFAULT_SEED, SplitPlan, SplitSummary, create_dataset, labels_without_images};
pub use yolo::{ConversionSummary, PoseLabel, convert_coco_to_yolo};
