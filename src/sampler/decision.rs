/// Outcome of one sampler step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Retain the frame as a keyframe
    Keep,
    /// Drop the frame
    Skip,
}

impl Decision {
    #[inline]
    pub fn is_keep(self) -> bool {
        self == Decision::Keep
    }
}

/// Conceptual tracking mode derived from the miss streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerMode {
    /// The last frame had a qualifying detection
    #[default]
    Tracking,
    /// Accumulating consecutive misses
    Searching,
}
