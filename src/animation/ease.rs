use crate::foundation::error::{UnveilError, UnveilResult};

/// Easing function identifier.
///
/// The controller never evaluates these itself during playback; it hands the
/// identifier to the animation driver. [`Ease::apply`] is provided for
/// drivers (and tests) that interpolate in-process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Identity curve.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in-out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out. The default enter curve.
    #[default]
    OutCubic,
    /// Cubic ease-in-out.
    InOutCubic,
    /// Sinusoidal ease-in.
    InSine,
    /// Sinusoidal ease-out.
    OutSine,
    /// Sinusoidal ease-in-out.
    InOutSine,
    /// Exponential ease-in.
    InExpo,
    /// Exponential ease-out.
    OutExpo,
}

impl Ease {
    /// Evaluate the curve at normalized time `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InSine => 1.0 - (t * std::f64::consts::FRAC_PI_2).cos(),
            Self::OutSine => (t * std::f64::consts::FRAC_PI_2).sin(),
            Self::InOutSine => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
            Self::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    (2.0f64).powf(10.0 * t - 10.0)
                }
            }
            Self::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - (2.0f64).powf(-10.0 * t)
                }
            }
        }
    }

    /// Parse an easing name.
    ///
    /// Accepts the CSS-ish and camel-case spellings interchangeably:
    /// `"ease-out-cubic"`, `"easeOutCubic"`, and `"out-cubic"` all resolve to
    /// [`Ease::OutCubic`].
    pub fn parse(name: &str) -> UnveilResult<Ease> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UnveilError::validation("easing name must be non-empty"));
        }

        let mut key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        if let Some(stripped) = key.strip_prefix("ease") {
            // Bare "ease" is not an alias for anything; "easeout..." is.
            if !stripped.is_empty() {
                key = stripped.to_string();
            }
        }

        match key.as_str() {
            "linear" => Ok(Self::Linear),
            "inquad" => Ok(Self::InQuad),
            "outquad" => Ok(Self::OutQuad),
            "inoutquad" => Ok(Self::InOutQuad),
            "incubic" => Ok(Self::InCubic),
            "outcubic" => Ok(Self::OutCubic),
            "inoutcubic" => Ok(Self::InOutCubic),
            "insine" => Ok(Self::InSine),
            "outsine" => Ok(Self::OutSine),
            "inoutsine" => Ok(Self::InOutSine),
            "inexpo" => Ok(Self::InExpo),
            "outexpo" => Ok(Self::OutExpo),
            other => Err(UnveilError::validation(format!(
                "unknown easing '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
