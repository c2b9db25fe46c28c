use crate::export::encode::Encoding;
use crate::foundation::error::ConfigError;
use crate::foundation::math::is_positive_finite;
use crate::settings::units::{DEFAULT_PIXELS_PER_INCH, Units};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Requested output size: an explicit `[width, height]` pair or a preset name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimensions {
    /// Named entry of the preset table (see [`crate::PRESETS`]).
    Preset(String),
    /// Explicit width and height in the settings' `units`.
    Size([f64; 2]),
}

/// Optional orientation constraint applied after the size is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Width >= height.
    Landscape,
    /// Width <= height.
    Portrait,
}

/// How interactive ticks turn elapsed wall time into animation time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackRate {
    /// Advance by the elapsed wall time.
    #[default]
    Realtime,
    /// Advance exactly one frame per tick, ignoring wall time.
    Fixed,
    /// Advance by wall time, but only emit once a full frame interval has accumulated.
    Throttle,
}

/// Surface kind requested from the render adapter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContextKind {
    /// 2D raster context.
    #[default]
    TwoD,
    /// WebGL-style context.
    WebGl,
    /// WebGL2-style context.
    WebGl2,
    /// Any other adapter-specific tag.
    Custom(String),
}

impl ContextKind {
    /// Tag as written in settings.
    pub fn as_str(&self) -> &str {
        match self {
            Self::TwoD => "2d",
            Self::WebGl => "webgl",
            Self::WebGl2 => "webgl2",
            Self::Custom(s) => s,
        }
    }
}

impl From<String> for ContextKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "2d" => Self::TwoD,
            "webgl" => Self::WebGl,
            "webgl2" => Self::WebGl2,
            _ => Self::Custom(value),
        }
    }
}

impl From<ContextKind> for String {
    fn from(value: ContextKind) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied settings description.
///
/// Field names follow the JSON keys (`pixelsPerInch`, `exportPixelRatio`, ...). Every field is
/// optional; defaults are applied during resolution, not at parse time, so a settings value can be
/// round-tripped without gaining keys. Unrecognized keys (adapter blocks such as `gui` or `p5`) are
/// kept verbatim in [`Settings::extra`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Explicit size or preset name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Unit name; parsed during resolution so that a bad value is reported as an invalid unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// DPI used for physical-unit conversion (default 72).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixels_per_inch: Option<f64>,
    /// Display oversampling factor (default: adapter hint, else 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_ratio: Option<f64>,
    /// Oversampling factor used only while exporting; overrides `pixelRatio`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_pixel_ratio: Option<f64>,
    /// Animation length in seconds. Absent means a static artwork.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Animation length in frames, as an alternative to `duration`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_frames: Option<u64>,
    /// Integer frame rate (default 24).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    /// Run the clock. Defaults to `true` when a duration or frame count is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animate: Option<bool>,
    /// Loop at the end of the duration (default `true`).
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    /// Interactive playback policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_rate: Option<PlaybackRate>,
    /// Force landscape or portrait.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Margin added on every side, in `units`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bleed: Option<f64>,
    /// Surface kind requested from the adapter (default `2d`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextKind>,
    /// Opaque surface-creation attributes, handed to the adapter untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
    /// Base file name for exports (default `sketch`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Prepended to export file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Appended to the export base name, before the frame index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Export encoding (default png).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    /// Lossy encoding quality in `(0, 1]` (default 0.92).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding_quality: Option<f64>,
    /// Adapter-specific blocks (`gui`, `p5`, ...) passed through verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Settings {
    /// Empty settings; every option takes its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::parse(format!("settings JSON: {e}")))
    }

    /// Parse settings from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> Result<Self, ConfigError> {
        serde_json::from_reader(r).map_err(|e| ConfigError::parse(format!("settings JSON: {e}")))
    }

    /// Parse settings from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ConfigError::parse(format!("open settings JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Set an explicit size in the settings' units.
    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.dimensions = Some(Dimensions::Size([width, height]));
        self
    }

    /// Use a named preset size.
    pub fn with_preset(mut self, name: impl Into<String>) -> Self {
        self.dimensions = Some(Dimensions::Preset(name.into()));
        self
    }

    /// Set the length units.
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units.as_str().to_owned());
        self
    }

    /// Set the pixels-per-inch used for physical units.
    pub fn with_pixels_per_inch(mut self, ppi: f64) -> Self {
        self.pixels_per_inch = Some(ppi);
        self
    }

    /// Set the display pixel ratio.
    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = Some(ratio);
        self
    }

    /// Set the export-only pixel ratio.
    pub fn with_export_pixel_ratio(mut self, ratio: f64) -> Self {
        self.export_pixel_ratio = Some(ratio);
        self
    }

    /// Set the animation duration in seconds.
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }

    /// Set the animation length in frames.
    pub fn with_total_frames(mut self, frames: u64) -> Self {
        self.total_frames = Some(frames);
        self
    }

    /// Set the frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Enable or disable the running clock.
    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = Some(animate);
        self
    }

    /// Enable or disable looping.
    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = Some(looping);
        self
    }

    /// Set the interactive playback policy.
    pub fn with_playback_rate(mut self, rate: PlaybackRate) -> Self {
        self.playback_rate = Some(rate);
        self
    }

    /// Force an orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Add a bleed margin on every side.
    pub fn with_bleed(mut self, bleed: f64) -> Self {
        self.bleed = Some(bleed);
        self
    }

    /// Request a surface kind.
    pub fn with_context(mut self, context: ContextKind) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the export base name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the default export encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Parsed `units`, defaulting to pixels.
    pub fn units(&self) -> Result<Units, ConfigError> {
        match self.units.as_deref() {
            None => Ok(Units::Pixels),
            Some(s) => s.parse(),
        }
    }

    /// Validated `pixelsPerInch`, defaulting to 72.
    pub fn pixels_per_inch(&self) -> Result<f64, ConfigError> {
        positive_or("pixelsPerInch", self.pixels_per_inch, DEFAULT_PIXELS_PER_INCH)
    }

    /// Requested surface kind, defaulting to `2d`.
    pub fn context_kind(&self) -> ContextKind {
        self.context.clone().unwrap_or_default()
    }

    /// Validated lossy-encoding quality in `(0, 1]`, defaulting to 0.92.
    pub fn encoding_quality(&self) -> Result<f64, ConfigError> {
        match self.encoding_quality {
            None => Ok(0.92),
            Some(q) if is_positive_finite(q) && q <= 1.0 => Ok(q),
            Some(q) => Err(ConfigError::invalid_setting(
                "encodingQuality",
                format!("must be in (0, 1], got {q}"),
            )),
        }
    }
}

pub(crate) fn positive_or(
    field: &'static str,
    value: Option<f64>,
    default: f64,
) -> Result<f64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) if is_positive_finite(v) => Ok(v),
        Some(v) => Err(ConfigError::invalid_setting(
            field,
            format!("must be a finite number > 0, got {v}"),
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;
