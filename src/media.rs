//! Frame sources, sinks and per-frame transforms for image-sequence input.
//!
//! Videos are consumed as directories of already extracted frames; decoding
//! containers is left to external tools.

mod discover;
mod sequence;
mod sink;
mod transform;
mod window;

pub use discover::{IMAGE_EXTENSIONS, find_files, has_extension, stem_of};
pub use sequence::ImageSequenceSource;
pub use sink::ImageDirSink;
pub use transform::{FrameTransform, Rotation};
pub use window::{TimeWindow, WindowPosition, frame_timestamp};
