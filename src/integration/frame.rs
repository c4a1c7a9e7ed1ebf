//! Frame type and the source/sink collaborators around the sampler.

use std::path::PathBuf;
use std::time::Duration;

use image::RgbImage;
use thiserror::Error;

/// One decoded frame in presentation order.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Position in the stream handed to the sampler (0, 1, 2, ...)
    pub index: u64,
    /// Position in the underlying video before any trimming
    pub source_index: u64,
    pub timestamp: Duration,
    pub image: RgbImage,
}

impl Frame {
    /// A frame whose source position equals its stream position.
    pub fn new(index: u64, timestamp: Duration, image: RgbImage) -> Self {
        Self {
            index,
            source_index: index,
            timestamp,
            image,
        }
    }

    pub fn with_source_index(mut self, source_index: u64) -> Self {
        self.source_index = source_index;
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid frame stream: {0}")]
    Invalid(String),
}

/// Yields frames in order until exhausted.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError>;
}

/// Persists kept frames.
pub trait FrameSink {
    /// `ordinal` is the sampler's `emitted_count` after this keyframe (1-based).
    fn write_keyframe(&mut self, frame: &Frame, ordinal: u64) -> Result<(), FrameError>;
}

/// In-memory source, mainly for tests and pre-decoded clips.
impl FrameSource for std::vec::IntoIter<Frame> {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        Ok(self.next())
    }
}

/// Collects `(ordinal, frame index)` pairs without storing pixels.
impl FrameSink for Vec<(u64, u64)> {
    fn write_keyframe(&mut self, frame: &Frame, ordinal: u64) -> Result<(), FrameError> {
        self.push((ordinal, frame.index));
        Ok(())
    }
}
