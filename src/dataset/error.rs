use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid COCO annotations in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("image {image_id} has invalid size {width}x{height}")]
    InvalidImageSize {
        image_id: u64,
        width: u32,
        height: u32,
    },
    #[error("annotation for image {image_id} has {len} keypoint values, expected a multiple of 3")]
    MalformedKeypoints { image_id: u64, len: usize },
    #[error("train ratio must be within [0, 1], got {0}")]
    InvalidTrainRatio(f64),
}

pub(crate) trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T, DatasetError>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T, DatasetError> {
        self.map_err(|source| DatasetError::Io {
            path: path.into(),
            source,
        })
    }
}
