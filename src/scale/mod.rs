// src/scale/mod.rs

//! Resolves the unit selection into the `scale` multiplier.

use crate::GeneratorError;
use serde::{Deserialize, Serialize};

/// Marker stored in `scale_unit` when the multiplier is a custom power of ten.
pub const CUSTOM_MARKER: &str = "custom..";

/// Allowed range for the custom exponent.
pub const CUSTOM_EXPONENT_RANGE: std::ops::RangeInclusive<i32> = 1..=10;

/// The unit choices offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleUnit {
    Metre,
    Centimetre,
    Millimetre,
    Custom,
}

impl ScaleUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "m" => Some(ScaleUnit::Metre),
            "cm" => Some(ScaleUnit::Centimetre),
            "mm" => Some(ScaleUnit::Millimetre),
            CUSTOM_MARKER => Some(ScaleUnit::Custom),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScaleUnit::Metre => "m",
            ScaleUnit::Centimetre => "cm",
            ScaleUnit::Millimetre => "mm",
            ScaleUnit::Custom => CUSTOM_MARKER,
        }
    }
}

/// What to do with a custom exponent (or unit) that cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalePolicy {
    /// Use a multiplier of 1 and carry on.
    #[default]
    Lenient,
    /// Fail with `GeneratorError::Scale`.
    Strict,
}

/// Turns the raw unit, sign and exponent fields into a multiplier.
///
/// `m`, `cm` and `mm` map to 1, 0.01 and 0.001. The custom marker maps to
/// `10^(±exponent)` with the exponent in 1..=10. Under `ScalePolicy::Lenient`
/// an unusable custom exponent, or an unknown unit, yields 1.
pub fn resolve_scale(unit: &str, sign: &str, exponent: &str, policy: ScalePolicy) -> Result<f64, GeneratorError> {
    let outcome = match ScaleUnit::parse(unit) {
        Some(ScaleUnit::Metre) => Ok(1.0),
        Some(ScaleUnit::Centimetre) => Ok(0.01),
        Some(ScaleUnit::Millimetre) => Ok(0.001),
        Some(ScaleUnit::Custom) => custom_multiplier(sign, exponent),
        None => Err(format!("unknown scale unit '{}'", unit)),
    };
    match (outcome, policy) {
        (Ok(scale), _) => Ok(scale),
        (Err(reason), ScalePolicy::Strict) => Err(GeneratorError::Scale(reason)),
        (Err(reason), ScalePolicy::Lenient) => {
            log::warn!("{}; using scale 1", reason);
            Ok(1.0)
        }
    }
}

fn custom_multiplier(sign: &str, exponent: &str) -> Result<f64, String> {
    let exp: i32 = exponent
        .trim()
        .parse()
        .map_err(|_| format!("custom scale exponent '{}' is not an integer", exponent))?;
    if !CUSTOM_EXPONENT_RANGE.contains(&exp) {
        return Err(format!(
            "custom scale exponent {} is outside {}..={}",
            exp,
            CUSTOM_EXPONENT_RANGE.start(),
            CUSTOM_EXPONENT_RANGE.end()
        ));
    }
    // Powers of ten up to 1e10 are exact, and one division rounds 10^-n correctly.
    let magnitude = 10f64.powi(exp);
    Ok(if sign == "+" { magnitude } else { 1.0 / magnitude })
}

/// Formats a multiplier for the `scale` entry: integral values without a
/// fractional part (`1`, `1000`), everything else as a real (`0.01`).
pub fn format_scale(scale: f64) -> String {
    if scale.fract() == 0.0 && scale.abs() < 1e16 {
        format!("{}", scale as i64)
    } else {
        format!("{:?}", scale)
    }
}
