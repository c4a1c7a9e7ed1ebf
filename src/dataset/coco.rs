//! The subset of the COCO keypoint format the converter reads.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::{DatasetError, IoContext};

#[derive(Debug, Clone, Deserialize)]
pub struct CocoDataset {
    pub images: Vec<CocoImage>,
    #[serde(default)]
    pub annotations: Vec<CocoAnnotation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoAnnotation {
    pub image_id: u64,
    /// Flat `x, y, v` triplets in pixels
    pub keypoints: Vec<f32>,
}

impl CocoDataset {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let text = fs::read_to_string(path).at(path)?;
        serde_json::from_str(&text).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Annotations grouped by image id, keeping file order within each image.
    pub fn annotations_by_image(&self) -> HashMap<u64, Vec<&CocoAnnotation>> {
        let mut grouped: HashMap<u64, Vec<&CocoAnnotation>> = HashMap::new();
        for ann in &self.annotations {
            grouped.entry(ann.image_id).or_default().push(ann);
        }
        grouped
    }
}
