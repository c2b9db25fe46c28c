use crate::settings::units::Units;

/// A named `(width, height, units)` triple, e.g. a paper size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preset {
    /// Canonical lowercase name.
    pub name: &'static str,
    /// Width in `units` (portrait orientation for paper sizes).
    pub width: f64,
    /// Height in `units`.
    pub height: f64,
    /// Native units of the preset.
    pub units: Units,
}

const fn mm(name: &'static str, width: f64, height: f64) -> Preset {
    Preset {
        name,
        width,
        height,
        units: Units::Millimeters,
    }
}

const fn inch(name: &'static str, width: f64, height: f64) -> Preset {
    Preset {
        name,
        width,
        height,
        units: Units::Inches,
    }
}

const fn px(name: &'static str, width: f64, height: f64) -> Preset {
    Preset {
        name,
        width,
        height,
        units: Units::Pixels,
    }
}

/// Immutable preset table. Lookups are case-insensitive on `name`.
pub const PRESETS: &[Preset] = &[
    // ISO 216 A series
    mm("a0", 841.0, 1189.0),
    mm("a1", 594.0, 841.0),
    mm("a2", 420.0, 594.0),
    mm("a3", 297.0, 420.0),
    mm("a4", 210.0, 297.0),
    mm("a5", 148.0, 210.0),
    mm("a6", 105.0, 148.0),
    mm("a7", 74.0, 105.0),
    mm("a8", 52.0, 74.0),
    mm("a9", 37.0, 52.0),
    mm("a10", 26.0, 37.0),
    // ISO 216 B series
    mm("b0", 1000.0, 1414.0),
    mm("b1", 707.0, 1000.0),
    mm("b2", 500.0, 707.0),
    mm("b3", 353.0, 500.0),
    mm("b4", 250.0, 353.0),
    mm("b5", 176.0, 250.0),
    mm("b6", 125.0, 176.0),
    mm("b7", 88.0, 125.0),
    mm("b8", 62.0, 88.0),
    mm("b9", 44.0, 62.0),
    mm("b10", 31.0, 44.0),
    // ISO 269 C series (envelopes)
    mm("c0", 917.0, 1297.0),
    mm("c1", 648.0, 917.0),
    mm("c2", 458.0, 648.0),
    mm("c3", 324.0, 458.0),
    mm("c4", 229.0, 324.0),
    mm("c5", 162.0, 229.0),
    mm("c6", 114.0, 162.0),
    mm("c7", 81.0, 114.0),
    mm("c8", 57.0, 81.0),
    mm("c9", 40.0, 57.0),
    mm("c10", 28.0, 40.0),
    // North American paper
    inch("letter", 8.5, 11.0),
    inch("legal", 8.5, 14.0),
    inch("tabloid", 11.0, 17.0),
    inch("ledger", 17.0, 11.0),
    inch("half-letter", 5.5, 8.5),
    inch("junior-legal", 5.0, 8.0),
    inch("business-card", 3.5, 2.0),
    mm("postcard", 101.6, 152.4),
    inch("poster-small", 11.0, 17.0),
    inch("poster", 18.0, 24.0),
    inch("poster-large", 24.0, 36.0),
    // Screens
    px("720p", 1280.0, 720.0),
    px("hd", 1280.0, 720.0),
    px("1080p", 1920.0, 1080.0),
    px("fhd", 1920.0, 1080.0),
    px("4k", 3840.0, 2160.0),
    px("uhd", 3840.0, 2160.0),
    px("square", 1080.0, 1080.0),
];

/// Look up a preset by name (case-insensitive, surrounding whitespace ignored).
pub fn lookup_preset(name: &str) -> Option<&'static Preset> {
    let key = name.trim();
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(key))
}

#[cfg(test)]
#[path = "../../tests/unit/settings/presets.rs"]
mod tests;
