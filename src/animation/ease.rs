use crate::foundation::error::ConfigError;
use std::fmt;
use std::sync::Arc;

/// Named easing curves mapping normalized progress `t` in `[0, 1]` to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    QuadIn,
    /// Quadratic ease-out.
    QuadOut,
    /// Quadratic ease-in/out.
    QuadInOut,
    /// Cubic ease-in.
    CubicIn,
    /// Cubic ease-out.
    CubicOut,
    /// Cubic ease-in/out.
    CubicInOut,
    /// Quartic ease-in.
    QuartIn,
    /// Quartic ease-out.
    QuartOut,
    /// Quartic ease-in/out.
    QuartInOut,
    /// Sinusoidal ease-in.
    SineIn,
    /// Sinusoidal ease-out.
    SineOut,
    /// Sinusoidal ease-in/out.
    SineInOut,
    /// Exponential ease-in.
    ExpoIn,
    /// Exponential ease-out.
    ExpoOut,
    /// Exponential ease-in/out.
    ExpoInOut,
}

impl Ease {
    /// Every named curve.
    pub const ALL: [Self; 16] = [
        Self::Linear,
        Self::QuadIn,
        Self::QuadOut,
        Self::QuadInOut,
        Self::CubicIn,
        Self::CubicOut,
        Self::CubicInOut,
        Self::QuartIn,
        Self::QuartOut,
        Self::QuartInOut,
        Self::SineIn,
        Self::SineOut,
        Self::SineInOut,
        Self::ExpoIn,
        Self::ExpoOut,
        Self::ExpoInOut,
    ];

    /// Lookup name of this curve.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::QuadIn => "quadIn",
            Self::QuadOut => "quadOut",
            Self::QuadInOut => "quadInOut",
            Self::CubicIn => "cubicIn",
            Self::CubicOut => "cubicOut",
            Self::CubicInOut => "cubicInOut",
            Self::QuartIn => "quartIn",
            Self::QuartOut => "quartOut",
            Self::QuartInOut => "quartInOut",
            Self::SineIn => "sineIn",
            Self::SineOut => "sineOut",
            Self::SineInOut => "sineInOut",
            Self::ExpoIn => "expoIn",
            Self::ExpoOut => "expoOut",
            Self::ExpoInOut => "expoInOut",
        }
    }

    /// Find a curve by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownEase {
                name: name.to_owned(),
            })
    }

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        use std::f64::consts::PI;

        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => 1.0 - (1.0 - t).powi(2),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::QuartIn => t.powi(4),
            Self::QuartOut => 1.0 - (1.0 - t).powi(4),
            Self::QuartInOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Self::SineOut => (t * PI / 2.0).sin(),
            Self::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            // Exact endpoints; the exponential form only approaches 0 and 1.
            Self::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Self::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::ExpoInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An easing choice before resolution: a name from the [`Ease`] table or a user function.
#[derive(Clone)]
pub enum EaseSpec {
    /// Looked up in the [`Ease`] table by [`EaseSpec::resolve`].
    Named(String),
    /// User-supplied curve, used as-is.
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl EaseSpec {
    /// Wrap a user curve.
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Resolve to a callable curve once, failing on unknown names.
    pub fn resolve(&self) -> Result<EaseFn, ConfigError> {
        match self {
            Self::Named(name) => Ease::from_name(name).map(EaseFn::Named),
            Self::Custom(f) => Ok(EaseFn::Custom(Arc::clone(f))),
        }
    }
}

impl fmt::Debug for EaseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl From<&str> for EaseSpec {
    fn from(value: &str) -> Self {
        Self::Named(value.to_owned())
    }
}

impl From<Ease> for EaseSpec {
    fn from(value: Ease) -> Self {
        Self::Named(value.name().to_owned())
    }
}

/// A resolved easing curve. Calling it never fails.
#[derive(Clone)]
pub enum EaseFn {
    /// Table curve.
    Named(Ease),
    /// User curve.
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl EaseFn {
    /// Evaluate the curve at `t`. Table curves clamp `t` to `[0, 1]`; user curves see it raw.
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Self::Named(e) => e.apply(t),
            Self::Custom(f) => f(t),
        }
    }
}

impl fmt::Debug for EaseFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(e) => f.debug_tuple("Named").field(e).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
