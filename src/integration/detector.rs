//! Trait for object/keypoint detection backends.

use crate::sampler::Detection;

/// Trait for object/keypoint detection backends.
///
/// Implement this trait to connect any detection model to the sampler.
///
/// # Example
///
/// ```ignore
/// use keyframe_rs::{DetectionSource, Detection};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run inference on one frame and return its detections.
    ///
    /// # Arguments
    /// * `input` - Raw RGB8 pixels, row-major
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;

    /// Called before `detect` with the frame's position in the untrimmed video.
    ///
    /// Detectors that look at pixels ignore it; sources keyed by frame number
    /// (recordings, caches) use it to stay aligned when the stream is trimmed.
    fn seek(&mut self, _source_index: u64) {}
}

/// Helper trait for converting model-specific outputs to `Detection`.
///
/// Implement this for your model's output format to enable easy conversion.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

impl IntoDetections for Option<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter().collect()
    }
}
