use nalgebra::Point2;

use crate::sampler::decision::SamplerMode;

/// Running state of one video's sampling pass.
///
/// Create one per input video and feed it every frame in order. Nothing in
/// here is meaningful for another video; call [`SamplerState::reset`] or make
/// a new one instead of carrying it over.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerState {
    /// Reference point of the last motion-gated keyframe (origin before the first one)
    pub last_kept_position: Point2<f32>,
    /// Consecutive frames without a qualifying detection
    pub miss_streak: u32,
    /// Keyframes emitted so far
    pub emitted_count: u64,
    /// Index the next `decide` call must carry
    pub(crate) next_frame: u64,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerState {
    pub fn new() -> Self {
        Self {
            last_kept_position: Point2::origin(),
            miss_streak: 0,
            emitted_count: 0,
            next_frame: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Frame index expected by the next `decide` call.
    pub fn next_frame(&self) -> u64 {
        self.next_frame
    }

    /// Frames consumed so far.
    pub fn frames_seen(&self) -> u64 {
        self.next_frame
    }

    /// Searching while misses are accumulating. A heartbeat emission clears
    /// the streak, so the mode reads Tracking again right after one.
    pub fn mode(&self) -> SamplerMode {
        if self.miss_streak > 0 {
            SamplerMode::Searching
        } else {
            SamplerMode::Tracking
        }
    }
}
