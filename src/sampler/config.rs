use serde::{Deserialize, Serialize};

use crate::sampler::error::ConfigError;

/// Which coordinate of a detection is compared between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceAnchor {
    /// The keypoint at this index in the detector's keypoint order.
    Keypoint(usize),
    /// The center of the bounding box.
    BoxCenter,
}

impl Default for ReferenceAnchor {
    fn default() -> Self {
        Self::Keypoint(0)
    }
}

/// Configuration for the KeyframeSampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Class label that counts as the subject.
    pub tracked_class_id: u32,
    /// Minimum pixel distance from the last kept position for a new keyframe.
    pub motion_threshold: f32,
    /// Consecutive misses that force a heartbeat keyframe.
    pub miss_tolerance: u32,
    pub reference: ReferenceAnchor,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            tracked_class_id: 0,
            motion_threshold: 30.0,
            miss_tolerance: 20,
            reference: ReferenceAnchor::default(),
        }
    }
}

impl SamplerConfig {
    /// Load a configuration from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.motion_threshold.is_finite() || self.motion_threshold <= 0.0 {
            return Err(ConfigError::InvalidMotionThreshold(self.motion_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SamplerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.motion_threshold, 30.0);
        assert_eq!(config.miss_tolerance, 20);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        for threshold in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = SamplerConfig {
                motion_threshold: threshold,
                ..SamplerConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidMotionThreshold(_))
            ));
        }
    }

    #[test]
    fn test_from_json() {
        let config =
            SamplerConfig::from_json(r#"{"miss_tolerance": 5, "reference": "box_center"}"#)
                .unwrap();
        assert_eq!(config.miss_tolerance, 5);
        assert_eq!(config.reference, ReferenceAnchor::BoxCenter);
        assert_eq!(config.tracked_class_id, 0);

        let config = SamplerConfig::from_json(r#"{"reference": {"keypoint": 2}}"#).unwrap();
        assert_eq!(config.reference, ReferenceAnchor::Keypoint(2));
    }

    #[test]
    fn test_from_json_rejects_negative_tolerance() {
        assert!(matches!(
            SamplerConfig::from_json(r#"{"miss_tolerance": -1}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
