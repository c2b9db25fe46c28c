/// Convenience result type used across easel.
pub type EaselResult<T> = Result<T, EaselError>;

/// Top-level error taxonomy used by the public API.
///
/// The three families map onto the lifecycle of a run: configuration problems surface while
/// initializing (or resizing), runtime problems stop the controller, and export problems are
/// reported to the export caller only.
#[derive(thiserror::Error, Debug)]
pub enum EaselError {
    /// Settings could not be resolved into a geometry or a clock.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The sketch or the render adapter failed while the controller was running.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// An export request could not be satisfied.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EaselError {
    /// `true` when this error stopped the controller (sketch or adapter failure).
    pub fn is_fatal_runtime(&self) -> bool {
        matches!(
            self,
            Self::Runtime(RuntimeError::SketchThrew { .. } | RuntimeError::AdapterFailed { .. })
        )
    }
}

/// Invalid or unresolvable settings. Fatal to the run, never retried.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// `dimensions` named a preset that is not in the preset table.
    #[error("unknown dimensions preset '{name}'")]
    UnknownPreset {
        /// The name as given by the user.
        name: String,
    },

    /// Explicit dimensions were missing, non-finite, or not positive.
    #[error("invalid dimensions: {detail}")]
    InvalidDimensions {
        /// Which value was rejected and why.
        detail: String,
    },

    /// `units` is outside the unit vocabulary, or cannot be used in this context.
    #[error("invalid unit '{unit}': {detail}")]
    InvalidUnit {
        /// The unit as given by the user.
        unit: String,
        /// Why it was rejected.
        detail: String,
    },

    /// Any other setting failed validation.
    #[error("invalid setting `{field}`: {detail}")]
    InvalidSetting {
        /// Settings key (camelCase, as written in JSON).
        field: &'static str,
        /// Offending value and constraint.
        detail: String,
    },

    /// A named easing curve was not recognized.
    #[error("unknown easing '{name}'")]
    UnknownEase {
        /// The name as given by the user.
        name: String,
    },

    /// The preload step reported a failure; the first tick never happens.
    #[error("preload failed: {source:#}")]
    PreloadFailed {
        /// Error returned by the preload step.
        #[source]
        source: anyhow::Error,
    },

    /// The settings document could not be read or parsed.
    #[error("parse settings: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Build a [`ConfigError::InvalidDimensions`] value.
    pub fn invalid_dimensions(detail: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            detail: detail.into(),
        }
    }

    /// Build a [`ConfigError::InvalidUnit`] value.
    pub fn invalid_unit(unit: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidUnit {
            unit: unit.into(),
            detail: detail.into(),
        }
    }

    /// Build a [`ConfigError::InvalidSetting`] value.
    pub fn invalid_setting(field: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field,
            detail: detail.into(),
        }
    }

    /// Build a [`ConfigError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Failures while the controller is running. Not retried automatically.
#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    /// The user drawing routine (or one of its hooks) returned an error.
    #[error("sketch threw in `{phase}` on frame {frame}: {source:#}")]
    SketchThrew {
        /// Frame index the sketch was handling.
        frame: u64,
        /// Which routine failed (`setup`, `update`, `render`, `pre_export`, ...).
        phase: &'static str,
        /// Error returned by the sketch.
        #[source]
        source: anyhow::Error,
    },

    /// The render adapter could not create, resize, or snapshot the surface.
    #[error("render adapter failed to {stage}: {source:#}")]
    AdapterFailed {
        /// Adapter operation that failed.
        stage: &'static str,
        /// Error returned by the adapter.
        #[source]
        source: anyhow::Error,
    },

    /// An operation needs the preload gate to be open.
    #[error("sketch is not ready: {0}")]
    NotReady(&'static str),

    /// The controller was stopped and accepts no further work.
    #[error("controller is stopped")]
    Stopped,
}

/// Export failures, reported to the export caller only.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// A sequence export needs a finite frame count.
    #[error(
        "sequence export needs a finite frame count: set `duration` or `totalFrames` on an animated sketch, or pass an explicit frame count"
    )]
    IndeterminateDuration,

    /// The caller cancelled a sequence; `produced` frames were captured before the cancel.
    #[error("sequence export cancelled after {produced} frame(s)")]
    CancelledMidSequence {
        /// Number of frames captured before cancellation.
        produced: usize,
    },

    /// The request itself is malformed.
    #[error("invalid export request: {0}")]
    InvalidRequest(String),

    /// A captured frame could not be encoded.
    #[error("encode frame {index} as {encoding}: {detail}")]
    Encode {
        /// Frame index being encoded.
        index: u64,
        /// Encoding name.
        encoding: &'static str,
        /// Encoder message.
        detail: String,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
