//! Errors raised while encoding.

use crate::path::SegmentError;
use crate::scalar::LiteralError;

/// A broken input contract; encoding stops at the first one.
///
/// None of these can be retried: they mean the outline source produced data
/// the encoder is not allowed to reinterpret, so no partial output is ever
/// returned alongside them.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// A path coordinate that is not a whole number of grid units.
    OffGrid {
        codepoint: char,
        segment: usize,
        axis: Axis,
        value: f64,
    },
    /// An advance width that is not a whole number of grid units.
    OffGridAdvance { codepoint: char, value: f64 },
    /// A segment with a verb code outside the known five.
    UnknownVerb {
        codepoint: char,
        segment: usize,
        verb: u8,
    },
    /// A segment carrying the wrong number of raw points for its verb.
    PointCount {
        codepoint: char,
        segment: usize,
        error: SegmentError,
    },
    /// An advance width too large for a 16.16 fixed-point literal.
    AdvanceLiteral {
        codepoint: char,
        error: LiteralError,
    },
    /// A path coordinate with no acceptable literal.
    CoordinateLiteral {
        codepoint: char,
        segment: usize,
        error: LiteralError,
    },
    /// A metrics field with no acceptable literal.
    MetricLiteral {
        field: &'static str,
        error: LiteralError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl EncodeError {
    pub(crate) fn from_segment(codepoint: char, segment: usize, error: SegmentError) -> Self {
        match error {
            SegmentError::UnknownVerb(verb) => EncodeError::UnknownVerb {
                codepoint,
                segment,
                verb,
            },
            SegmentError::PointCount { .. } => EncodeError::PointCount {
                codepoint,
                segment,
                error,
            },
        }
    }

    /// The glyph the error was found in, if it came from a glyph.
    pub fn codepoint(&self) -> Option<char> {
        match self {
            Self::OffGrid { codepoint, .. }
            | Self::OffGridAdvance { codepoint, .. }
            | Self::AdvanceLiteral { codepoint, .. }
            | Self::UnknownVerb { codepoint, .. }
            | Self::PointCount { codepoint, .. }
            | Self::CoordinateLiteral { codepoint, .. } => Some(*codepoint),
            Self::MetricLiteral { .. } => None,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::OffGrid {
                codepoint,
                segment,
                axis,
                value,
            } => write!(
                f,
                "glyph {:?}: segment {} has {} coordinate {} off the grid",
                codepoint, segment, axis, value
            ),
            Self::OffGridAdvance { codepoint, value } => write!(
                f,
                "glyph {:?}: advance width {} is off the grid",
                codepoint, value
            ),
            Self::UnknownVerb {
                codepoint,
                segment,
                verb,
            } => write!(
                f,
                "glyph {:?}: segment {} has unknown verb code {}",
                codepoint, segment, verb
            ),
            Self::PointCount {
                codepoint,
                segment,
                error,
            } => write!(f, "glyph {:?}: segment {}: {}", codepoint, segment, error),
            Self::AdvanceLiteral { codepoint, error } => {
                write!(f, "glyph {:?}: advance width: {}", codepoint, error)
            }
            Self::CoordinateLiteral {
                codepoint,
                segment,
                error,
            } => write!(f, "glyph {:?}: segment {}: {}", codepoint, segment, error),
            Self::MetricLiteral { field, error } => {
                write!(f, "metrics field {}: {}", field, error)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_glyph() {
        let err = EncodeError::OffGrid {
            codepoint: 'g',
            segment: 3,
            axis: Axis::Y,
            value: 0.5,
        };
        assert_eq!(
            err.to_string(),
            "glyph 'g': segment 3 has y coordinate 0.5 off the grid"
        );
        assert_eq!(err.codepoint(), Some('g'));
    }

    #[test]
    fn segment_errors_are_split() {
        let err = EncodeError::from_segment('a', 0, SegmentError::UnknownVerb(9));
        assert_eq!(
            err,
            EncodeError::UnknownVerb {
                codepoint: 'a',
                segment: 0,
                verb: 9
            }
        );
        let metric = EncodeError::MetricLiteral {
            field: "ascent",
            error: LiteralError::NonFinite(f64::NAN),
        };
        assert_eq!(metric.codepoint(), None);
    }
}
