//! Integration module for connecting detection backends, frame sources and
//! sinks with the keyframe sampler.
//!
//! This module provides traits and utilities for integrating various inference
//! backends (Burn, recorded detections, etc.) with the sampler.

mod batch;
mod builder;
mod decode;
mod detector;
mod frame;
mod pipeline;
mod replay;

pub use batch::{VideoJob, VideoOutcome, sample_videos_parallel};
pub use builder::DetectionBuilder;
pub use decode::{DecodeError, PoseOutputLayout, non_max_suppression};
pub use detector::{DetectionSource, IntoDetections};
pub use frame::{Frame, FrameError, FrameSink, FrameSource};
pub use pipeline::{PipelineError, RunSummary, SamplerPipeline};
pub use replay::{FrameRecord, ReplayDetector, ReplayError};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel};
