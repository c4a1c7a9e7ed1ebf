use thiserror::Error;

/// Configuration rejected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("motion threshold must be a finite value > 0, got {0}")]
    InvalidMotionThreshold(f32),
    #[error("invalid sampler configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Caller contract violations detected by `KeyframeSampler::decide`.
///
/// None of these are transient: the caller has to re-establish correct
/// sequencing (or start a fresh state) before continuing.
#[derive(Debug, Error, PartialEq)]
pub enum SamplerError {
    #[error("frame {got} presented out of order, expected frame {expected}")]
    OutOfOrder { expected: u64, got: u64 },
    #[error("detection {index} on frame {frame} has confidence {confidence} outside [0, 1]")]
    InvalidConfidence {
        frame: u64,
        index: usize,
        confidence: f32,
    },
    #[error("tracked detection on frame {frame} has no reference keypoint {keypoint}")]
    MissingReferencePoint { frame: u64, keypoint: usize },
    #[error("tracked detection on frame {frame} has a non-finite reference point")]
    NonFinitePoint { frame: u64 },
}
