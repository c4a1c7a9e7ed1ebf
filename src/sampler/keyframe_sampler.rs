//! Motion-gated keyframe sampling with a dropout heartbeat.

use log::debug;
use nalgebra::Point2;

use crate::sampler::config::{ReferenceAnchor, SamplerConfig};
use crate::sampler::decision::Decision;
use crate::sampler::detection::Detection;
use crate::sampler::error::{ConfigError, SamplerError};
use crate::sampler::selection::select_qualifying;
use crate::sampler::state::SamplerState;

/// Decides, frame by frame, which frames of a video are keyframes.
///
/// The sampler itself only holds validated configuration; all running state
/// lives in a [`SamplerState`] owned by the caller, one per video.
#[derive(Debug, Clone)]
pub struct KeyframeSampler {
    config: SamplerConfig,
}

impl Default for KeyframeSampler {
    fn default() -> Self {
        Self {
            config: SamplerConfig::default(),
        }
    }
}

impl KeyframeSampler {
    pub fn new(config: SamplerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Classify frame `frame_index` as KEEP or SKIP, updating `state`.
    ///
    /// Frames must arrive as 0, 1, 2, ... on a given state. Any contract
    /// violation is reported before the state is touched.
    pub fn decide(
        &self,
        frame_index: u64,
        detections: &[Detection],
        state: &mut SamplerState,
    ) -> Result<Decision, SamplerError> {
        if frame_index != state.next_frame {
            return Err(SamplerError::OutOfOrder {
                expected: state.next_frame,
                got: frame_index,
            });
        }
        validate_confidences(frame_index, detections)?;

        let target = match select_qualifying(detections, self.config.tracked_class_id) {
            Some(det) => Some(self.reference_point(frame_index, det)?),
            None => None,
        };

        state.next_frame += 1;

        let decision = match target {
            Some(point) => {
                state.miss_streak = 0;
                let moved = nalgebra::distance(&point, &state.last_kept_position);
                if moved > self.config.motion_threshold {
                    state.last_kept_position = point;
                    state.emitted_count += 1;
                    debug!(
                        "frame {}: keep, moved {:.1}px (keyframe {})",
                        frame_index, moved, state.emitted_count
                    );
                    Decision::Keep
                } else {
                    Decision::Skip
                }
            }
            None => {
                state.miss_streak += 1;
                if state.miss_streak >= self.config.miss_tolerance {
                    state.emitted_count += 1;
                    debug!(
                        "frame {}: keep, heartbeat after {} misses (keyframe {})",
                        frame_index, state.miss_streak, state.emitted_count
                    );
                    state.miss_streak = 0;
                    Decision::Keep
                } else {
                    Decision::Skip
                }
            }
        };

        Ok(decision)
    }

    fn reference_point(&self, frame: u64, det: &Detection) -> Result<Point2<f32>, SamplerError> {
        let point = det
            .reference_point(self.config.reference)
            .ok_or(match self.config.reference {
                ReferenceAnchor::Keypoint(keypoint) => {
                    SamplerError::MissingReferencePoint { frame, keypoint }
                }
                ReferenceAnchor::BoxCenter => SamplerError::NonFinitePoint { frame },
            })?;

        if !(point.x.is_finite() && point.y.is_finite()) {
            return Err(SamplerError::NonFinitePoint { frame });
        }
        Ok(point)
    }
}

fn validate_confidences(frame: u64, detections: &[Detection]) -> Result<(), SamplerError> {
    match detections
        .iter()
        .position(|d| !(0.0..=1.0).contains(&d.confidence))
    {
        Some(index) => Err(SamplerError::InvalidConfidence {
            frame,
            index,
            confidence: detections[index].confidence,
        }),
        None => Ok(()),
    }
}
