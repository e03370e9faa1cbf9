//! The boundary with whatever loads fonts and extracts outlines.

use std::ops::RangeInclusive;

use crate::glyph::{Glyph, GlyphSet};
use crate::metrics::FontMetrics;
use crate::path::RawOutline;

/// Something that can hand out glyph outlines and metrics in raw grid units.
///
/// Implementations are expected to have snapped every point and advance
/// to a whole grid unit already; the encoder refuses anything else.
pub trait GlyphSource {
    /// The raw segment stream for `ch`, with y pointing down.
    fn outline(&self, ch: char) -> Result<RawOutline, SourceError>;
    fn advance_width(&self, ch: char) -> Result<f64, SourceError>;
    fn font_metrics(&self) -> Result<FontMetrics, SourceError>;
}

/// Extracts one glyph per codepoint in `codepoints`, in order.
pub fn collect_glyphs<S: GlyphSource + ?Sized>(
    source: &S,
    codepoints: RangeInclusive<char>,
) -> Result<GlyphSet, SourceError> {
    let mut glyphs = GlyphSet::new();
    for ch in codepoints {
        let outline = source.outline(ch)?;
        let advance = source.advance_width(ch)?;
        log::trace!(
            "extracted {:?}: {} segments, advance {}",
            ch,
            outline.segments().count(),
            advance
        );
        glyphs.push(Glyph::new(ch, outline, advance));
    }
    log::debug!("extracted {} glyphs", glyphs.len());
    Ok(glyphs)
}

/// Failures of the outline source itself, before any encoding happens.
#[derive(Debug)]
pub enum SourceError {
    IoError(std::io::Error),
    /// The font data could not be parsed.
    Parse(String),
    /// The font has no glyph for a requested codepoint, and no fallback.
    MissingGlyph(char),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::IoError(err) => write!(f, "io error reading font: '{}'", err),
            Self::Parse(msg) => write!(f, "failed to parse font: '{}'", msg),
            Self::MissingGlyph(ch) => write!(f, "font has no glyph for {:?}", ch),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(src: std::io::Error) -> SourceError {
        SourceError::IoError(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{code, RawSegment};
    use kurbo::Point;
    use std::collections::HashMap;

    struct TableSource {
        widths: HashMap<char, f64>,
    }

    impl GlyphSource for TableSource {
        fn outline(&self, ch: char) -> Result<RawOutline, SourceError> {
            if !self.widths.contains_key(&ch) {
                return Err(SourceError::MissingGlyph(ch));
            }
            let mut outline = RawOutline::new();
            outline.push(RawSegment::new(code::MOVE, vec![Point::ZERO]));
            outline.finish();
            Ok(outline)
        }

        fn advance_width(&self, ch: char) -> Result<f64, SourceError> {
            self.widths
                .get(&ch)
                .copied()
                .ok_or(SourceError::MissingGlyph(ch))
        }

        fn font_metrics(&self) -> Result<FontMetrics, SourceError> {
            Ok(FontMetrics::default())
        }
    }

    fn source() -> TableSource {
        TableSource {
            widths: ('a'..='e').zip([10., 20., 30., 40., 50.]).collect(),
        }
    }

    #[test]
    fn collects_in_order() {
        let glyphs = collect_glyphs(&source(), 'b'..='d').unwrap();
        let got: Vec<_> = glyphs.iter().map(|g| (g.codepoint, g.advance)).collect();
        assert_eq!(got, vec![('b', 20.), ('c', 30.), ('d', 40.)]);
    }

    #[test]
    fn missing_glyph_stops_collection() {
        let err = collect_glyphs(&source(), 'd'..='f').unwrap_err();
        assert!(matches!(err, SourceError::MissingGlyph('f')));
    }

    #[test]
    fn works_through_trait_objects() {
        let source: Box<dyn GlyphSource> = Box::new(source());
        assert_eq!(collect_glyphs(source.as_ref(), 'a'..='a').unwrap().len(), 1);
    }
}
