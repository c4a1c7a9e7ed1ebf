//! Motion-gated keyframe sampling for detector-annotated video.
//!
//! For every frame an external detector reports zero or more instances; the
//! [`KeyframeSampler`] keeps a frame when the tracked subject has moved far
//! enough since the last keyframe, or when the subject has been missing for
//! long enough that a heartbeat frame is due.
//!
//! ```
//! use keyframe_rs::{Decision, Detection, KeyframeSampler, SamplerConfig, SamplerState};
//!
//! let sampler = KeyframeSampler::new(SamplerConfig::default()).unwrap();
//! let mut state = SamplerState::new();
//!
//! let frame0 = [Detection::at_point(0, 0.9, 100.0, 100.0)];
//! assert_eq!(sampler.decide(0, &frame0, &mut state), Ok(Decision::Keep));
//!
//! let frame1 = [Detection::at_point(0, 0.9, 110.0, 100.0)];
//! assert_eq!(sampler.decide(1, &frame1, &mut state), Ok(Decision::Skip));
//! ```

pub mod dataset;
pub mod integration;
pub mod media;
pub mod sampler;

pub use integration::{
    DetectionBuilder, DetectionSource, Frame, FrameSink, FrameSource, PipelineError,
    SamplerPipeline,
};
pub use sampler::{
    ConfigError, Decision, Detection, Keypoint, KeyframeSampler, Rect, ReferenceAnchor,
    SamplerConfig, SamplerError, SamplerState,
};
