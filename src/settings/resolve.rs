use crate::foundation::core::Canvas;
use crate::foundation::error::ConfigError;
use crate::foundation::math::{is_positive_finite, round_pixels};
use crate::settings::model::{Dimensions, Orientation, Settings, positive_or};
use crate::settings::presets::lookup_preset;
use crate::settings::units::{Units, convert_length};

/// Environment facts supplied by the render adapter, never invented by the resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplayHints {
    /// Device pixel ratio of the display, if the adapter knows it.
    pub pixel_ratio: Option<f64>,
    /// Size of the hosting viewport in CSS pixels, used for percent units and for settings without
    /// `dimensions`.
    pub viewport: Option<(f64, f64)>,
}

/// Physical and pixel dimensions derived from [`Settings`].
///
/// `pixel_width = round_half_up(output_width * conversionFactor(units, ppi) * pixel_ratio)`, and
/// likewise for the height. Pixel dimensions are always >= 1.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGeometry {
    /// Surface width in device pixels.
    pub pixel_width: u32,
    /// Surface height in device pixels.
    pub pixel_height: u32,
    /// Output width in `units`, bleed included.
    pub output_width: f64,
    /// Output height in `units`, bleed included.
    pub output_height: f64,
    /// Width in `units` without bleed.
    pub trim_width: f64,
    /// Height in `units` without bleed.
    pub trim_height: f64,
    /// Bleed added on every side, in `units`.
    pub bleed: f64,
    /// Output width in CSS pixels (before the pixel ratio).
    pub style_width: f64,
    /// Output height in CSS pixels (before the pixel ratio).
    pub style_height: f64,
    /// Units the output size is expressed in.
    pub units: Units,
    /// DPI used for physical conversion.
    pub pixels_per_inch: f64,
    /// Pixel ratio applied to produce `pixel_width`/`pixel_height`.
    pub pixel_ratio: f64,
    /// `true` when `pixel_ratio` came from settings rather than the adapter's display hint.
    pub pixel_ratio_explicit: bool,
    /// Export-only pixel ratio from settings, if any.
    pub export_pixel_ratio: Option<f64>,
    /// `true` for the geometry used during export capture.
    pub exporting: bool,
}

impl ResolvedGeometry {
    /// Surface size in device pixels.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.pixel_width,
            height: self.pixel_height,
        }
    }

    /// Device pixels per output unit, per axis.
    pub fn pixels_per_unit(&self) -> (f64, f64) {
        (
            f64::from(self.pixel_width) / self.output_width,
            f64::from(self.pixel_height) / self.output_height,
        )
    }

    /// Same geometry re-rasterized at `pixel_ratio` (which must be finite and > 0).
    pub fn with_pixel_ratio(&self, pixel_ratio: f64) -> Self {
        Self {
            pixel_width: round_pixels(self.style_width * pixel_ratio),
            pixel_height: round_pixels(self.style_height * pixel_ratio),
            pixel_ratio,
            ..self.clone()
        }
    }

    /// Geometry used during export capture.
    ///
    /// `override_ratio` wins, then `exportPixelRatio`, then an explicit `pixelRatio`, then 1.
    /// A display hint never sizes exported frames. The export ratio replaces the display ratio;
    /// it is never multiplied with it.
    pub fn for_export(&self, override_ratio: Option<f64>) -> Self {
        let ratio = override_ratio
            .or(self.export_pixel_ratio)
            .or(self.pixel_ratio_explicit.then_some(self.pixel_ratio))
            .unwrap_or(1.0);
        Self {
            exporting: true,
            ..self.with_pixel_ratio(ratio)
        }
    }

    /// Settings that resolve back to exactly this geometry (given the same display hints for
    /// percent units).
    pub fn to_settings(&self) -> Settings {
        Settings {
            dimensions: Some(Dimensions::Size([self.trim_width, self.trim_height])),
            units: Some(self.units.as_str().to_owned()),
            pixels_per_inch: Some(self.pixels_per_inch),
            pixel_ratio: self.pixel_ratio_explicit.then_some(self.pixel_ratio),
            export_pixel_ratio: self.export_pixel_ratio,
            bleed: (self.bleed > 0.0).then_some(self.bleed),
            ..Settings::default()
        }
    }
}

/// Resolve settings into a [`ResolvedGeometry`]. Pure: identical inputs give identical outputs.
pub fn resolve_geometry(
    settings: &Settings,
    hints: &DisplayHints,
) -> Result<ResolvedGeometry, ConfigError> {
    let units = settings.units()?;
    let pixels_per_inch = settings.pixels_per_inch()?;

    let pixel_ratio = match settings.pixel_ratio {
        Some(_) => positive_or("pixelRatio", settings.pixel_ratio, 1.0)?,
        None => hints
            .pixel_ratio
            .filter(|r| is_positive_finite(*r))
            .unwrap_or(1.0),
    };
    let export_pixel_ratio = match settings.export_pixel_ratio {
        Some(_) => Some(positive_or(
            "exportPixelRatio",
            settings.export_pixel_ratio,
            1.0,
        )?),
        None => None,
    };
    let bleed = match settings.bleed {
        None => 0.0,
        Some(b) if b.is_finite() && b >= 0.0 => b,
        Some(b) => {
            return Err(ConfigError::invalid_setting(
                "bleed",
                format!("must be a finite number >= 0, got {b}"),
            ));
        }
    };
    let viewport = hints
        .viewport
        .filter(|(w, h)| is_positive_finite(*w) && is_positive_finite(*h));

    let (mut width, mut height) = match &settings.dimensions {
        Some(Dimensions::Size([w, h])) => {
            for (axis, v) in [(0, *w), (1, *h)] {
                if !is_positive_finite(v) {
                    return Err(ConfigError::invalid_dimensions(format!(
                        "dimensions[{axis}] must be a finite number > 0, got {v}"
                    )));
                }
            }
            (*w, *h)
        }
        Some(Dimensions::Preset(name)) => {
            let preset = lookup_preset(name).ok_or_else(|| ConfigError::UnknownPreset {
                name: name.clone(),
            })?;
            if units == Units::Percent {
                return Err(ConfigError::invalid_unit(
                    units.as_str(),
                    format!("preset '{}' cannot be expressed in percent", preset.name),
                ));
            }
            (
                convert_length(preset.width, preset.units, units, pixels_per_inch)?,
                convert_length(preset.height, preset.units, units, pixels_per_inch)?,
            )
        }
        None => {
            let (vw, vh) = viewport.ok_or_else(|| {
                ConfigError::invalid_dimensions(
                    "`dimensions` is required when the render adapter reports no viewport",
                )
            })?;
            if units == Units::Percent {
                (100.0, 100.0)
            } else {
                (
                    convert_length(vw, Units::Pixels, units, pixels_per_inch)?,
                    convert_length(vh, Units::Pixels, units, pixels_per_inch)?,
                )
            }
        }
    };

    match settings.orientation {
        Some(Orientation::Landscape) if height > width => std::mem::swap(&mut width, &mut height),
        Some(Orientation::Portrait) if width > height => std::mem::swap(&mut width, &mut height),
        _ => {}
    }

    let output_width = width + 2.0 * bleed;
    let output_height = height + 2.0 * bleed;

    let (factor_x, factor_y) = match units.conversion_factor(pixels_per_inch) {
        Some(f) => (f, f),
        None => {
            let (vw, vh) = viewport.ok_or_else(|| {
                ConfigError::invalid_unit(
                    units.as_str(),
                    "percent units need a viewport size from the render adapter",
                )
            })?;
            (vw / 100.0, vh / 100.0)
        }
    };
    let style_width = output_width * factor_x;
    let style_height = output_height * factor_y;

    let geometry = ResolvedGeometry {
        pixel_width: round_pixels(style_width * pixel_ratio),
        pixel_height: round_pixels(style_height * pixel_ratio),
        output_width,
        output_height,
        trim_width: width,
        trim_height: height,
        bleed,
        style_width,
        style_height,
        units,
        pixels_per_inch,
        pixel_ratio,
        pixel_ratio_explicit: settings.pixel_ratio.is_some(),
        export_pixel_ratio,
        exporting: false,
    };
    tracing::debug!(
        pixel_width = geometry.pixel_width,
        pixel_height = geometry.pixel_height,
        units = %geometry.units,
        pixel_ratio = geometry.pixel_ratio,
        "resolved geometry"
    );
    Ok(geometry)
}

#[cfg(test)]
#[path = "../../tests/unit/settings/resolve.rs"]
mod tests;
