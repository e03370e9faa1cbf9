//! Outlines and metrics from OpenType and TrueType fonts.

use std::path::Path;

use glyphbake_lib::{
    flags, FontMetrics, GlyphSource, Grid, RawOutline, SourceError, PRINTABLE_ASCII,
};
use kurbo::BezPath;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::grid_fit::GridFit;

/// A binary font file, held in memory.
///
/// The `Face` is re-parsed for every query; that only validates headers and
/// builds an offset table, so it is cheap.
pub struct TtfSource {
    data: Vec<u8>,
    fit: GridFit,
}

impl TtfSource {
    pub fn load(path: &Path, grid: Grid) -> Result<Self, SourceError> {
        Self::from_bytes(std::fs::read(path)?, grid)
    }

    pub fn from_bytes(data: Vec<u8>, grid: Grid) -> Result<Self, SourceError> {
        let units_per_em = parse(&data)?.units_per_em();
        log::info!("font has {} units per em", units_per_em);
        Ok(TtfSource {
            fit: GridFit::new(grid, f64::from(units_per_em)),
            data,
        })
    }

    fn face(&self) -> Result<Face<'_>, SourceError> {
        parse(&self.data)
    }
}

fn parse(data: &[u8]) -> Result<Face<'_>, SourceError> {
    Face::parse(data, 0).map_err(|e| SourceError::Parse(e.to_string()))
}

/// Characters the font does not map get `.notdef`, which is what a
/// rasterizer would draw for them.
fn glyph_id(face: &Face, ch: char) -> GlyphId {
    face.glyph_index(ch).unwrap_or_else(|| {
        log::warn!("no glyph for {:?}, using .notdef", ch);
        GlyphId(0)
    })
}

/// A glyph past the end of `hmtx` has no advance; it is baked as zero.
fn advance_or_zero(advance: Option<u16>, ch: char, id: GlyphId) -> u16 {
    advance.unwrap_or_else(|| {
        log::warn!("no advance width for {:?} (glyph {}), using 0", ch, id.0);
        0
    })
}

impl GlyphSource for TtfSource {
    fn outline(&self, ch: char) -> Result<RawOutline, SourceError> {
        let face = self.face()?;
        let mut builder = PathBuilder(BezPath::new());
        // glyphs without contours (like space) report `None` here
        face.outline_glyph(glyph_id(&face, ch), &mut builder);
        Ok(self.fit.outline(&builder.0))
    }

    fn advance_width(&self, ch: char) -> Result<f64, SourceError> {
        let face = self.face()?;
        let id = glyph_id(&face, ch);
        let advance = advance_or_zero(face.glyph_hor_advance(id), ch, id);
        Ok(self.fit.advance(f64::from(advance)))
    }

    fn font_metrics(&self) -> Result<FontMetrics, SourceError> {
        let face = self.face()?;
        let fit = &self.fit;
        let bbox = face.global_bounding_box();

        let ascii_advances: Vec<f64> = PRINTABLE_ASCII
            .filter_map(|ch| face.glyph_index(ch))
            .filter_map(|id| face.glyph_hor_advance(id))
            .map(f64::from)
            .collect();
        let avg_advance = if ascii_advances.is_empty() {
            0.0
        } else {
            ascii_advances.iter().sum::<f64>() / ascii_advances.len() as f64
        };
        let max_advance = (0..face.number_of_glyphs())
            .filter_map(|id| face.glyph_hor_advance(GlyphId(id)))
            .max()
            .unwrap_or(0);

        let mut metrics = FontMetrics {
            top: fit.y(f64::from(bbox.y_max)),
            ascent: fit.y(f64::from(face.ascender())),
            descent: fit.y(f64::from(face.descender())),
            bottom: fit.y(f64::from(bbox.y_min)),
            leading: fit.x(f64::from(face.line_gap())),
            avg_char_width: fit.x(avg_advance),
            max_char_width: fit.x(f64::from(max_advance)),
            x_min: fit.x(f64::from(bbox.x_min)),
            x_max: fit.x(f64::from(bbox.x_max)),
            x_height: fit.x(f64::from(face.x_height().unwrap_or(0))),
            cap_height: fit.x(f64::from(face.capital_height().unwrap_or(0))),
            ..Default::default()
        };
        if let Some(underline) = face.underline_metrics() {
            metrics.flags |=
                flags::UNDERLINE_THICKNESS_IS_VALID | flags::UNDERLINE_POSITION_IS_VALID;
            metrics.underline_thickness = fit.x(f64::from(underline.thickness));
            metrics.underline_position = fit.y(f64::from(underline.position));
        }
        Ok(metrics)
    }
}

/// Collects a `ttf_parser` outline into a `BezPath`.
struct PathBuilder(BezPath);

impl OutlineBuilder for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to((f64::from(x), f64::from(y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to((f64::from(x), f64::from(y)));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0
            .quad_to((f64::from(x1), f64::from(y1)), (f64::from(x), f64::from(y)));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.curve_to(
            (f64::from(x1), f64::from(y1)),
            (f64::from(x2), f64::from(y2)),
            (f64::from(x), f64::from(y)),
        );
    }

    fn close(&mut self) {
        self.0.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn builder_collects_elements() {
        let mut builder = PathBuilder(BezPath::new());
        builder.move_to(0., 0.);
        builder.line_to(10., 0.);
        builder.quad_to(10., 10., 0., 10.);
        builder.curve_to(0., 5., 1., 2., 0., 0.);
        builder.close();
        let elements = builder.0.elements();
        assert_eq!(elements.len(), 5);
        assert_eq!(elements[1], PathEl::LineTo((10., 0.).into()));
        assert_eq!(elements[4], PathEl::ClosePath);
    }

    #[test]
    fn missing_advance_is_zero() {
        assert_eq!(advance_or_zero(Some(1139), 'a', GlyphId(68)), 1139);
        assert_eq!(advance_or_zero(None, 'a', GlyphId(9000)), 0);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let result = TtfSource::from_bytes(b"definitely not a font".to_vec(), Grid::default());
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }
}
