//! Replays detections recorded by an external detector run.
//!
//! The recording is JSON lines, one object per frame:
//!
//! ```text
//! {"frame": 0, "detections": [{"class_id": 0, "confidence": 0.91, "keypoints": [{"x": 412.0, "y": 233.5, "visibility": 2.0}]}]}
//! {"frame": 1, "detections": []}
//! ```
//!
//! Frames missing from the recording replay as "nothing detected". `frame` is
//! the position in the untrimmed video, so one recording serves any time
//! window cut from it.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DetectionSource;
use crate::sampler::Detection;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read detection recording: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("frame {frame} recorded more than once")]
    DuplicateFrame { frame: u64 },
}

/// One line of a detection recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

/// `DetectionSource` that ignores pixels and returns the recorded detections
/// for the frame it was last seeked to, advancing one frame per call.
#[derive(Debug, Clone, Default)]
pub struct ReplayDetector {
    records: BTreeMap<u64, Vec<Detection>>,
    cursor: u64,
    warned_past_end: bool,
}

impl ReplayDetector {
    pub fn from_records(
        records: impl IntoIterator<Item = FrameRecord>,
    ) -> Result<Self, ReplayError> {
        let mut map = BTreeMap::new();
        for record in records {
            if map.insert(record.frame, record.detections).is_some() {
                return Err(ReplayError::DuplicateFrame {
                    frame: record.frame,
                });
            }
        }
        Ok(Self {
            records: map,
            cursor: 0,
            warned_past_end: false,
        })
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ReplayError> {
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
                line: idx + 1,
                source,
            })?;
            records.push(record);
        }
        Self::from_records(records)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Number of frames present in the recording.
    pub fn recorded_frames(&self) -> usize {
        self.records.len()
    }

    /// Index of the last recorded frame, if any.
    pub fn last_frame(&self) -> Option<u64> {
        self.records.keys().next_back().copied()
    }
}

impl DetectionSource for ReplayDetector {
    type Error = Infallible;

    fn detect(
        &mut self,
        _input: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<Detection>, Self::Error> {
        let frame = self.cursor;
        self.cursor += 1;
        match self.last_frame() {
            Some(last) if frame > last && !self.warned_past_end => {
                warn!("detection recording ends at frame {}, replaying empty frames", last);
                self.warned_past_end = true;
            }
            _ => {}
        }
        Ok(self.records.get(&frame).cloned().unwrap_or_default())
    }

    fn seek(&mut self, source_index: u64) {
        self.cursor = source_index;
    }
}
