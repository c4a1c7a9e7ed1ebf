use std::path::{Path, PathBuf};

use log::{debug, info};

use super::discover::{IMAGE_EXTENSIONS, find_files};
use super::transform::FrameTransform;
use super::window::{TimeWindow, WindowPosition, frame_timestamp};
use crate::integration::{Frame, FrameError, FrameSource};

/// Frames of one video, stored as numbered still images in a directory.
///
/// Files are read in path order. The time window is evaluated on the original
/// frame numbering; frames handed out are renumbered 0, 1, 2, ... so the
/// sampler always sees a gap-free stream, and keep their original position in
/// [`Frame::source_index`].
pub struct ImageSequenceSource {
    paths: std::vec::IntoIter<PathBuf>,
    fps: f64,
    window: TimeWindow,
    transform: FrameTransform,
    source_index: u64,
    next_index: u64,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path, fps: f64) -> Result<Self, FrameError> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(FrameError::Invalid(format!("fps must be > 0, got {}", fps)));
        }
        let paths = find_files(dir, IMAGE_EXTENSIONS).map_err(|source| FrameError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        info!("{}: {} frame images", dir.display(), paths.len());
        Ok(Self {
            paths: paths.into_iter(),
            fps,
            window: TimeWindow::default(),
            transform: FrameTransform::default(),
            source_index: 0,
            next_index: 0,
        })
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    /// Fails if the transform's resize rate is not a finite value > 0.
    pub fn with_transform(mut self, transform: FrameTransform) -> Result<Self, FrameError> {
        transform.validate()?;
        self.transform = transform;
        Ok(self)
    }

    fn load(&self, path: &Path) -> Result<image::RgbImage, FrameError> {
        let image = image::open(path).map_err(|source| FrameError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.transform.apply(image.to_rgb8()))
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        while let Some(path) = self.paths.next() {
            let source_index = self.source_index;
            let t = frame_timestamp(source_index, self.fps);
            self.source_index += 1;

            match self.window.position(t.as_secs_f64()) {
                WindowPosition::Before => continue,
                WindowPosition::After => {
                    debug!("window ends before {}", path.display());
                    self.paths = Vec::new().into_iter();
                    return Ok(None);
                }
                WindowPosition::Inside => {
                    let image = self.load(&path)?;
                    let frame =
                        Frame::new(self.next_index, t, image).with_source_index(source_index);
                    self.next_index += 1;
                    return Ok(Some(frame));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn write_frames(dir: &Path, n: usize) {
        for i in 0..n {
            RgbImage::new(6, 4)
                .save(dir.join(format!("frame_{:04}.png", i)))
                .unwrap();
        }
    }

    #[test]
    fn test_window_renumbers_frames() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 10);

        // 2 fps: frame i is at i/2 s, window [1.0, 2.5] keeps source frames 2..=5
        let mut source = ImageSequenceSource::open(dir.path(), 2.0)
            .unwrap()
            .with_window(TimeWindow::new(1.0, Some(2.5)));

        let mut frames = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            frames.push(frame);
        }

        let indices: Vec<u64> = frames.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        let sources: Vec<u64> = frames.iter().map(|f| f.source_index).collect();
        assert_eq!(sources, vec![2, 3, 4, 5]);
        assert_eq!(frames[0].timestamp.as_secs_f64(), 1.0);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_transform_applied() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 1);

        let mut source = ImageSequenceSource::open(dir.path(), 30.0)
            .unwrap()
            .with_transform(FrameTransform {
                rotation: crate::media::Rotation::Right,
                scale: 1.0,
            })
            .unwrap();

        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!((frame.width(), frame.height()), (4, 6));
    }

    #[test]
    fn test_rejects_zero_resize() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 1);

        let source = ImageSequenceSource::open(dir.path(), 30.0)
            .unwrap()
            .with_transform(FrameTransform {
                rotation: crate::media::Rotation::None,
                scale: 0.0,
            });
        assert!(matches!(source, Err(FrameError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_fps() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageSequenceSource::open(dir.path(), 0.0).is_err());
    }
}
