//! Burn inference backend for keypoint detection.
//!
//! This module provides a `BurnDetector` that implements `DetectionSource`
//! for running pose models built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use keyframe_rs::integration::{BurnDetector, BurnModel, PoseOutputLayout};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your pose model
//! struct MyPoseModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyPoseModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> burn::tensor::Tensor<NdArray, 2> {
//!         // Run inference, one row per candidate
//!     }
//! }
//!
//! let model = MyPoseModel::load("model.bin");
//! let detector = BurnDetector::new(model, Default::default(), PoseOutputLayout::default());
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use ndarray::Array2;
use thiserror::Error;

use super::{DecodeError, DetectionSource, PoseOutputLayout};
use crate::sampler::Detection;

/// Error type for Burn detection failures.
#[derive(Debug, Error)]
pub enum BurnDetectorError {
    /// Input image has invalid dimensions.
    #[error("invalid input dimensions: expected {expected:?}, got {got:?}")]
    InvalidInputDimensions {
        expected: (u32, u32, u32),
        got: (u32, u32, u32),
    },
    /// Preprocessing failed.
    #[error("preprocessing error: {0}")]
    PreprocessingError(String),
    /// Model output could not be read back.
    #[error("postprocessing error: {0}")]
    PostprocessingError(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Trait for Burn-based pose models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [batch, channels, height, width]
    ///
    /// # Returns
    /// Raw candidates of shape [rows, columns], laid out as described by
    /// [`PoseOutputLayout`].
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 640, 640) // Default YOLO input size
    }
}

/// Burn-based pose detector implementing `DetectionSource`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    layout: PoseOutputLayout,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a new Burn detector with the given model, device and output layout.
    pub fn new(model: M, device: B::Device, layout: PoseOutputLayout) -> Self {
        Self {
            model,
            device,
            layout,
        }
    }

    /// Set the confidence threshold for filtering detections.
    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.layout.conf_threshold = threshold;
        self
    }

    /// Convert interleaved RGB8 pixels into a normalized [1, C, H, W] tensor.
    pub fn preprocess(
        &self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (channels, target_h, target_w) = self.model.input_size();
        if width == 0 || height == 0 || channels == 0 {
            return Err(BurnDetectorError::InvalidInputDimensions {
                expected: (channels, target_h, target_w),
                got: (channels, height, width),
            });
        }

        let expected_len = width as usize * height as usize * channels as usize;
        if input.len() != expected_len {
            let row_len = height as usize * channels as usize;
            return Err(BurnDetectorError::InvalidInputDimensions {
                expected: (channels, height, width),
                got: (channels, height, (input.len() / row_len) as u32),
            });
        }

        if height != target_h || width != target_w {
            return Err(BurnDetectorError::PreprocessingError(format!(
                "input size {}x{} doesn't match model size {}x{}, resize frames upstream",
                width, height, target_w, target_h
            )));
        }

        // HWC -> CHW, scaled to [0, 1]
        let (h, w, c) = (height as usize, width as usize, channels as usize);
        let mut data = vec![0.0f32; input.len()];
        for (i, &px) in input.iter().enumerate() {
            let (pixel, channel) = (i / c, i % c);
            data[channel * h * w + pixel] = px as f32 / 255.0;
        }

        let tensor =
            Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([1, c, h, w]);
        Ok(tensor)
    }

    fn postprocess(&self, output: Tensor<B, 2>) -> Result<Vec<Detection>, BurnDetectorError> {
        let [rows, cols] = output.dims();
        let values = output
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| BurnDetectorError::PostprocessingError(format!("{:?}", e)))?;
        let matrix = Array2::from_shape_vec((rows, cols), values)
            .map_err(|e| BurnDetectorError::PostprocessingError(e.to_string()))?;
        Ok(self.layout.decode(matrix.view())?)
    }
}

impl<B: Backend, M: BurnModel<B>> DetectionSource for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error> {
        let tensor = self.preprocess(input, width, height)?;
        let output = self.model.forward(tensor);
        self.postprocess(output)
    }
}
