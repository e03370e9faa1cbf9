//! Glyphs as handed to the encoder.

use std::borrow::Cow;
use std::ops::RangeInclusive;

use crate::path::RawOutline;

/// The codepoints encoded when nothing else is configured: printable ASCII.
pub const PRINTABLE_ASCII: RangeInclusive<char> = ' '..='~';

/// One character's outline and advance, in raw grid units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub codepoint: char,
    pub outline: RawOutline,
    pub advance: f64,
}

impl Glyph {
    pub fn new(codepoint: char, outline: RawOutline, advance: f64) -> Self {
        Glyph {
            codepoint,
            outline,
            advance,
        }
    }

    /// A name for the glyph that is safe inside a line comment.
    pub fn label(&self) -> Cow<'static, str> {
        match self.codepoint {
            ' ' => "space".into(),
            '\\' => "backslash".into(),
            c if c.is_control() => format!("U+{:04X}", c as u32).into(),
            c => c.to_string().into(),
        }
    }
}

/// Glyphs in encoding order.
///
/// Glyphs are only ever appended; the order they are pushed in is the order
/// they are emitted in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyphSet {
    glyphs: Vec<Glyph>,
}

impl GlyphSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, glyph: Glyph) {
        self.glyphs.push(glyph);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl FromIterator<Glyph> for GlyphSet {
    fn from_iter<I: IntoIterator<Item = Glyph>>(iter: I) -> Self {
        GlyphSet {
            glyphs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{code, RawSegment};
    use kurbo::Point;

    #[test]
    fn labels() {
        let label = |c| Glyph::new(c, RawOutline::new(), 0.).label();
        assert_eq!(label(' '), "space");
        assert_eq!(label('\\'), "backslash");
        assert_eq!(label('A'), "A");
        assert_eq!(label('~'), "~");
        assert_eq!(label('\n'), "U+000A");
    }

    #[test]
    fn printable_ascii() {
        assert_eq!(PRINTABLE_ASCII.count(), 95);
    }

    #[test]
    fn json_round_trip() {
        let mut outline = RawOutline::new();
        outline.push(RawSegment::new(code::MOVE, vec![Point::new(0., 0.)]));
        outline.push(RawSegment::new(
            code::LINE,
            vec![Point::new(0., 0.), Point::new(4096., 0.)],
        ));
        outline.push(RawSegment::new(code::CLOSE, Vec::new()));
        outline.finish();
        let set: GlyphSet = vec![Glyph::new('-', outline, 1024.)].into_iter().collect();

        let json = serde_json::to_string(&set).unwrap();
        let back: GlyphSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert_eq!(back.len(), 1);
    }
}
