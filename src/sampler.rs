mod config;
mod decision;
mod detection;
mod error;
mod keyframe_sampler;
mod rect;
mod selection;
mod state;

pub use config::{ReferenceAnchor, SamplerConfig};
pub use decision::{Decision, SamplerMode};
pub use detection::{Detection, Keypoint};
pub use error::{ConfigError, SamplerError};
pub use keyframe_sampler::KeyframeSampler;
pub use rect::Rect;
pub use selection::select_qualifying;
pub use state::SamplerState;
