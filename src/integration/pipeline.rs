//! SamplerPipeline for combining detection with keyframe sampling.

use log::debug;
use thiserror::Error;

use super::{DetectionSource, Frame, FrameError, FrameSink, FrameSource};
use crate::sampler::{
    ConfigError, Decision, KeyframeSampler, SamplerConfig, SamplerError, SamplerState,
};

#[derive(Debug, Error)]
pub enum PipelineError<E> {
    #[error("detection failed on frame {frame}")]
    Detection {
        frame: u64,
        #[source]
        source: E,
    },
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    #[error("frame source failed")]
    Source(#[source] FrameError),
    #[error("sink failed on keyframe {ordinal}")]
    Sink {
        ordinal: u64,
        #[source]
        source: FrameError,
    },
}

/// Counts for one finished video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub keyframes: u64,
}

/// Bundles a detector with the keyframe sampler and one video's state.
///
/// One pipeline processes one video; build a new one (or call
/// [`SamplerPipeline::reset`]) before starting the next.
pub struct SamplerPipeline<D: DetectionSource> {
    detector: D,
    sampler: KeyframeSampler,
    state: SamplerState,
}

impl<D: DetectionSource> SamplerPipeline<D> {
    /// Create a new sampling pipeline with the given detector and sampler config.
    pub fn new(detector: D, config: SamplerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            detector,
            sampler: KeyframeSampler::new(config)?,
            state: SamplerState::new(),
        })
    }

    /// Create a new sampling pipeline with default sampler configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self::from_sampler(detector, KeyframeSampler::default())
    }

    /// Create a pipeline around an already validated sampler, with fresh state.
    pub fn from_sampler(detector: D, sampler: KeyframeSampler) -> Self {
        Self {
            detector,
            sampler,
            state: SamplerState::new(),
        }
    }

    /// Run detection on one frame and classify it.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<Decision, PipelineError<D::Error>> {
        self.detector.seek(frame.source_index);
        let detections = self
            .detector
            .detect(frame.image.as_raw(), frame.width(), frame.height())
            .map_err(|source| PipelineError::Detection {
                frame: frame.index,
                source,
            })?;
        Ok(self
            .sampler
            .decide(frame.index, &detections, &mut self.state)?)
    }

    /// Drain `source`, writing every keyframe to `sink`.
    pub fn run<S, K>(
        &mut self,
        source: &mut S,
        sink: &mut K,
    ) -> Result<RunSummary, PipelineError<D::Error>>
    where
        S: FrameSource + ?Sized,
        K: FrameSink + ?Sized,
    {
        let mut frames = 0;
        while let Some(frame) = source.next_frame().map_err(PipelineError::Source)? {
            frames += 1;
            if self.process_frame(&frame)?.is_keep() {
                let ordinal = self.state.emitted_count;
                sink.write_keyframe(&frame, ordinal)
                    .map_err(|source| PipelineError::Sink { ordinal, source })?;
            }
            if frames % 500 == 0 {
                debug!(
                    "{} frames processed, {} keyframes",
                    frames, self.state.emitted_count
                );
            }
        }

        let summary = RunSummary {
            frames,
            keyframes: self.state.emitted_count,
        };
        debug!(
            "sampled {} keyframes from {} frames",
            summary.keyframes, summary.frames
        );
        Ok(summary)
    }

    /// Drop the current video's state so the next frame must be frame 0.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn sampler(&self) -> &KeyframeSampler {
        &self.sampler
    }

    pub fn state(&self) -> &SamplerState {
        &self.state
    }
}
