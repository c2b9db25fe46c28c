use crate::foundation::error::ConfigError;
use crate::foundation::math::FRAME_EPSILON;

/// Integer frame rate (frames per second), always > 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Fps(u32);

impl Fps {
    /// Frame rate used when settings do not specify one.
    pub const DEFAULT: Self = Self(24);

    /// Validate and wrap a frame rate.
    pub fn new(fps: u32) -> Result<Self, ConfigError> {
        if fps == 0 {
            return Err(ConfigError::invalid_setting("fps", "must be > 0, got 0"));
        }
        Ok(Self(fps))
    }

    /// Frame rate as an integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Frame rate as `f64`.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Seconds covered by one frame.
    pub fn frame_duration_secs(self) -> f64 {
        1.0 / self.as_f64()
    }

    /// Timestamp of frame `frames` (`frames / fps`).
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        frames as f64 / self.as_f64()
    }

    /// Frame index containing timestamp `secs`.
    ///
    /// Tolerates accumulated floating error so that `n` additions of `1/fps` land on frame `n`.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64() + FRAME_EPSILON).floor().max(0.0) as u64
    }

    /// Number of frames needed to cover `secs` (`ceil(secs * fps)`), at least 1 for any positive
    /// duration.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        let frames = (secs * self.as_f64() - FRAME_EPSILON).ceil().max(0.0) as u64;
        if secs > 0.0 { frames.max(1) } else { frames }
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Fps {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fps> for u32 {
    fn from(value: Fps) -> Self {
        value.0
    }
}

/// Surface size in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels, >= 1.
    pub width: u32,
    /// Height in pixels, >= 1.
    pub height: u32,
}

impl Canvas {
    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
