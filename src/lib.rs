//! easel is a runtime for generative sketches.
//!
//! A sketch is a setup routine that returns a per-frame renderer. easel owns everything around
//! it:
//!
//! - Resolve [`Settings`] (physical units, presets, pixel ratio) into a [`ResolvedGeometry`]
//! - Drive a deterministic [`AnimationClock`] that hands [`FrameContext`]s to the sketch
//! - Run the sketch through a [`SketchController`] on any [`RenderAdapter`]
//! - Capture single frames or whole loops with [`ExportRequest`]
//!
//! Drawing itself belongs to the render adapter; [`RasterAdapter`] is a small CPU reference.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod export;
pub(crate) mod render;
pub(crate) mod settings;
pub(crate) mod sketch;

pub use crate::foundation::core::{Canvas, Fps};
pub use crate::foundation::error::{
    ConfigError, EaselError, EaselResult, ExportError, RuntimeError,
};

pub use crate::animation::clock::{AnimationClock, ClockState, FrameContext, Timing};
pub use crate::animation::ease::{Ease, EaseFn, EaseSpec};
pub use crate::export::encode::{Encoding, encode_frame};
pub use crate::export::pipeline::{
    CancelToken, ExportOutcome, ExportResult, ExportedFrame, SequenceExport, suggested_name,
};
pub use crate::export::request::{ExportKind, ExportRequest};
pub use crate::render::adapter::{FrameRGBA, RenderAdapter, SurfaceRequest};
pub use crate::render::raster::{Raster, RasterAdapter};
pub use crate::settings::model::{ContextKind, Dimensions, Orientation, PlaybackRate, Settings};
pub use crate::settings::presets::{PRESETS, Preset, lookup_preset};
pub use crate::settings::resolve::{DisplayHints, ResolvedGeometry, resolve_geometry};
pub use crate::settings::units::{DEFAULT_PIXELS_PER_INCH, Units, convert_length};
pub use crate::sketch::controller::{ControllerBuilder, SketchController, TickOutcome};
pub use crate::sketch::preload::{PollFn, Preload, poll_fn};
pub use crate::sketch::props::FrameProps;
pub use crate::sketch::renderer::{RenderFn, Renderer, SetupFn, SketchHooks};
pub use crate::sketch::scheduler::{ManualScheduler, TickScheduler, drive};
