use std::fs;
use std::path::{Path, PathBuf};

use crate::integration::{Frame, FrameError, FrameSink};

/// Writes keyframes as `{video_name}_{ordinal}.jpg` into one directory.
pub struct ImageDirSink {
    dir: PathBuf,
    video_name: String,
    written: Vec<PathBuf>,
}

impl ImageDirSink {
    /// Creates `dir` (and parents) if missing.
    pub fn create(
        dir: impl Into<PathBuf>,
        video_name: impl Into<String>,
    ) -> Result<Self, FrameError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| FrameError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            video_name: video_name.into(),
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in emission order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn keyframe_path(&self, ordinal: u64) -> PathBuf {
        self.dir.join(format!("{}_{}.jpg", self.video_name, ordinal))
    }
}

impl FrameSink for ImageDirSink {
    fn write_keyframe(&mut self, frame: &Frame, ordinal: u64) -> Result<(), FrameError> {
        let path = self.keyframe_path(ordinal);
        frame.image.save(&path).map_err(|source| FrameError::Image {
            path: path.clone(),
            source,
        })?;
        self.written.push(path);
        Ok(())
    }
}
