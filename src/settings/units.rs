use crate::foundation::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Default pixels-per-inch used for physical unit conversion.
pub const DEFAULT_PIXELS_PER_INCH: f64 = 72.0;

/// Length units accepted in settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Units {
    /// Device-independent pixels. Already resolved; conversion factor is 1.
    #[default]
    Pixels,
    /// Inches.
    Inches,
    /// Centimeters.
    Centimeters,
    /// Millimeters.
    Millimeters,
    /// Typographic points (1/72 inch).
    Points,
    /// Percent of the adapter's viewport, per axis.
    Percent,
}

impl Units {
    /// All supported units, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Pixels,
        Self::Inches,
        Self::Centimeters,
        Self::Millimeters,
        Self::Points,
        Self::Percent,
    ];

    /// Short name as written in settings (`px`, `in`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pixels => "px",
            Self::Inches => "in",
            Self::Centimeters => "cm",
            Self::Millimeters => "mm",
            Self::Points => "pt",
            Self::Percent => "%",
        }
    }

    /// How many of this unit fit in one inch. `None` for units that are not physical lengths.
    pub fn units_per_inch(self) -> Option<f64> {
        match self {
            Self::Inches => Some(1.0),
            Self::Centimeters => Some(2.54),
            Self::Millimeters => Some(25.4),
            Self::Points => Some(72.0),
            Self::Pixels | Self::Percent => None,
        }
    }

    /// `true` for inches, centimeters, millimeters and points.
    pub fn is_physical(self) -> bool {
        self.units_per_inch().is_some()
    }

    /// Pixels per one of this unit at `pixels_per_inch`.
    ///
    /// `ppi / unitsPerInch` for physical units, `1` for pixels, `None` for percent (which needs a
    /// viewport; see [`crate::resolve_geometry`]).
    pub fn conversion_factor(self, pixels_per_inch: f64) -> Option<f64> {
        match self {
            Self::Pixels => Some(1.0),
            Self::Percent => None,
            physical => physical.units_per_inch().map(|upi| pixels_per_inch / upi),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Units {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "px" | "pixel" | "pixels" => Self::Pixels,
            "in" | "inch" | "inches" => Self::Inches,
            "cm" | "centimeter" | "centimeters" => Self::Centimeters,
            "mm" | "millimeter" | "millimeters" => Self::Millimeters,
            "pt" | "point" | "points" => Self::Points,
            "%" | "percent" => Self::Percent,
            _ => {
                return Err(ConfigError::invalid_unit(
                    s,
                    "expected one of px, in, cm, mm, pt, %",
                ));
            }
        };
        Ok(unit)
    }
}

/// Convert a length between two physical-or-pixel units at a fixed `pixels_per_inch`.
///
/// Percent is relative to a viewport and cannot be converted here.
pub fn convert_length(
    value: f64,
    from: Units,
    to: Units,
    pixels_per_inch: f64,
) -> Result<f64, ConfigError> {
    if from == to {
        return Ok(value);
    }
    let percent_err = |u: Units| {
        ConfigError::invalid_unit(
            u.as_str(),
            "percent lengths are relative to a viewport and cannot be converted",
        )
    };
    let from_px = from
        .conversion_factor(pixels_per_inch)
        .ok_or_else(|| percent_err(from))?;
    let to_px = to
        .conversion_factor(pixels_per_inch)
        .ok_or_else(|| percent_err(to))?;
    Ok(value * from_px / to_px)
}

#[cfg(test)]
#[path = "../../tests/unit/settings/units.rs"]
mod tests;
