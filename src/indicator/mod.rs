//! Live waiting indicator: frame sets, fade shape and the background session

pub mod fade;
pub mod frames;
pub mod session;

pub use fade::FadeSequence;
pub use frames::{BUILTIN_STYLES, FrameCycle, FrameSet, builtin_style_names, is_known_style};
pub use session::{
    ActivityTracker, IndicatorReport, IndicatorSession, IndicatorSpec, IndicatorState, StopMode,
};
