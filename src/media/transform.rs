use image::RgbImage;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::integration::FrameError;

/// Quarter-turn applied to each frame, for footage recorded sideways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    None,
    /// 90 degrees clockwise
    Left,
    /// 90 degrees counter-clockwise
    Right,
}

impl Rotation {
    pub fn apply(self, image: RgbImage) -> RgbImage {
        match self {
            Rotation::None => image,
            Rotation::Left => imageops::rotate90(&image),
            Rotation::Right => imageops::rotate270(&image),
        }
    }
}

/// Per-frame resize then rotate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    pub rotation: Rotation,
    /// Resize rate applied to both sides; 1.0 leaves the frame untouched.
    pub scale: f32,
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self {
            rotation: Rotation::None,
            scale: 1.0,
        }
    }
}

impl FrameTransform {
    /// Rejects a scale that is not a finite value > 0.
    pub fn new(rotation: Rotation, scale: f32) -> Result<Self, FrameError> {
        let transform = Self { rotation, scale };
        transform.validate()?;
        Ok(transform)
    }

    pub fn validate(&self) -> Result<(), FrameError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(FrameError::Invalid(format!(
                "resize rate must be a finite value > 0, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == Rotation::None && self.scale == 1.0
    }

    pub fn apply(&self, image: RgbImage) -> RgbImage {
        let image = if self.scale == 1.0 {
            image
        } else {
            let width = ((image.width() as f32 * self.scale) as u32).max(1);
            let height = ((image.height() as f32 * self.scale) as u32).max(1);
            imageops::resize(&image, width, height, FilterType::Triangle)
        };
        self.rotation.apply(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_rotation_swaps_dimensions() {
        let mut image = RgbImage::new(4, 2);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));

        let right = Rotation::Right.apply(image.clone());
        assert_eq!(right.dimensions(), (2, 4));
        // counter-clockwise: top-left moves to bottom-left
        assert_eq!(right.get_pixel(0, 3), &Rgb([255, 0, 0]));

        let left = Rotation::Left.apply(image);
        assert_eq!(left.dimensions(), (2, 4));
        // clockwise: top-left moves to top-right
        assert_eq!(left.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_rejects_bad_scale() {
        for scale in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                FrameTransform::new(Rotation::None, scale),
                Err(FrameError::Invalid(_))
            ));
        }
        assert_eq!(
            FrameTransform::new(Rotation::Left, 0.5).unwrap(),
            FrameTransform {
                rotation: Rotation::Left,
                scale: 0.5
            }
        );
    }

    #[test]
    fn test_scale_then_rotate() {
        let transform = FrameTransform {
            rotation: Rotation::Left,
            scale: 0.5,
        };
        let out = transform.apply(RgbImage::new(8, 4));
        assert_eq!(out.dimensions(), (2, 4));
        assert!(!transform.is_identity());
        assert!(FrameTransform::default().is_identity());
    }
}
