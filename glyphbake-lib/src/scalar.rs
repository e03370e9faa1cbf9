//! Turning raw grid values into source literals.
//!
//! There are two independent literal forms. Path coordinates and most
//! metrics become em-relative floating literals (`1`, `.5f`, `-1.25f`),
//! while advance widths become 16.16 fixed-point hex integers
//! (`0x00004000`).

use crate::grid::Grid;

/// Significant digits of a fractional literal, as printf's `%.6g`.
pub const SIGNIFICANT_DIGITS: usize = 6;

/// Nine significant digits always identify an `f32` uniquely.
const F32_ROUND_TRIP_DIGITS: usize = 9;

/// Whole values at or beyond this magnitude do not fit a 64-bit integer.
const WHOLE_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// What to do when six significant digits do not reproduce the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LiteralPrecision {
    /// Add digits, up to nine, until the literal reads back exactly.
    #[default]
    Widen,
    /// Refuse to emit a literal that does not read back exactly.
    Strict,
    /// Always emit six significant digits.
    Truncate,
}

impl std::str::FromStr for LiteralPrecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "widen" => Ok(LiteralPrecision::Widen),
            "strict" => Ok(LiteralPrecision::Strict),
            "truncate" => Ok(LiteralPrecision::Truncate),
            other => Err(format!(
                "unknown literal precision '{}', expected widen, strict or truncate",
                other
            )),
        }
    }
}

/// Formats a raw value as an em-relative scalar literal.
///
/// Whole em values are emitted as bare integers. Anything else gets the
/// shortest `%g`-style rendering allowed by `precision`, with trailing zeros
/// and a lone leading zero removed, and an `f` suffix.
pub fn format_scalar(
    raw: f64,
    grid: Grid,
    precision: LiteralPrecision,
) -> Result<String, LiteralError> {
    let value = raw / grid.units_per_em();
    if !value.is_finite() {
        return Err(LiteralError::NonFinite(raw));
    }
    if value == value.trunc() {
        if value.abs() >= WHOLE_LIMIT {
            return Err(LiteralError::OutOfRange(raw));
        }
        // `as` maps -0.0 to 0
        return Ok((value as i64).to_string());
    }

    let short = format_general(value, SIGNIFICANT_DIGITS);
    if precision == LiteralPrecision::Truncate || reads_back(&short, value) {
        return Ok(float_literal(&short));
    }
    if precision == LiteralPrecision::Strict {
        return Err(LiteralError::Inexact {
            value,
            literal: float_literal(&short),
        });
    }

    let wide = (SIGNIFICANT_DIGITS + 1..F32_ROUND_TRIP_DIGITS)
        .map(|digits| format_general(value, digits))
        .find(|text| reads_back(text, value))
        .unwrap_or_else(|| format_general(value, F32_ROUND_TRIP_DIGITS));
    log::trace!("widened {} to '{}'", value, wide);
    Ok(float_literal(&wide))
}

/// Formats a raw advance width as a 16.16 fixed-point hex literal.
///
/// The width is scaled by `65536 / grid size` and truncated; negative
/// results are written as their 32-bit two's complement. The scaled width
/// must fit in an `i32`.
pub fn format_fixed(raw: f64, grid: Grid) -> Result<String, LiteralError> {
    let scaled = (raw * f64::from(grid.fixed_scale())).trunc();
    if !scaled.is_finite() {
        return Err(LiteralError::NonFinite(raw));
    }
    if scaled < f64::from(i32::MIN) || scaled > f64::from(i32::MAX) {
        return Err(LiteralError::OutOfRange(raw));
    }
    Ok(format!("0x{:08x}", scaled as i32 as u32))
}

/// Renders `value` like C's `%.*g`: `digits` significant digits, scientific
/// notation only for very small or very large magnitudes, and no trailing
/// zeros in the fraction.
fn format_general(value: f64, digits: usize) -> String {
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Strips trailing zeros after the decimal point, and the point itself if
/// nothing is left behind it.
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn reads_back(text: &str, value: f64) -> bool {
    text.parse::<f32>()
        .map_or(false, |parsed| parsed == value as f32)
}

/// `0.5` becomes `.5f`, `-0.25` becomes `-.25f`.
fn float_literal(text: &str) -> String {
    let text = if let Some(rest) = text.strip_prefix("0.") {
        format!(".{}", rest)
    } else if let Some(rest) = text.strip_prefix("-0.") {
        format!("-.{}", rest)
    } else {
        text.to_string()
    };
    text + "f"
}

/// A value that has no acceptable literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralError {
    NonFinite(f64),
    /// The value is finite but too large for its literal form.
    OutOfRange(f64),
    Inexact { value: f64, literal: String },
}

impl std::fmt::Display for LiteralError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NonFinite(raw) => write!(f, "{} has no finite em-relative value", raw),
            Self::OutOfRange(raw) => write!(f, "{} is too large to write as a literal", raw),
            Self::Inexact { value, literal } => write!(
                f,
                "literal '{}' does not reproduce {} exactly",
                literal, value
            ),
        }
    }
}

impl std::error::Error for LiteralError {}
