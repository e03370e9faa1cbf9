//! Outlines and metrics from UFO font sources.

use std::path::Path;

use glyphbake_lib::{
    flags, FontMetrics, GlyphSource, Grid, RawOutline, SourceError, PRINTABLE_ASCII,
};
use kurbo::{Affine, BezPath, Point, Shape};
use norad::{Contour, ContourPoint, Font, Glyph, Layer, PointType};

use crate::grid_fit::GridFit;

/// Components nested deeper than this are assumed to be cyclic.
const MAX_COMPONENT_DEPTH: usize = 16;

pub struct UfoSource {
    font: Font,
    fit: GridFit,
}

impl UfoSource {
    pub fn load(path: &Path, grid: Grid) -> Result<Self, SourceError> {
        let font = Font::load(path).map_err(|e| SourceError::Parse(e.to_string()))?;
        let units_per_em = font
            .font_info
            .units_per_em
            .map(|v| v.to_string().parse().unwrap_or(1000.0))
            .unwrap_or(1000.0);
        log::info!("font has {} units per em", units_per_em);
        Ok(UfoSource {
            fit: GridFit::new(grid, units_per_em),
            font,
        })
    }

    fn layer(&self) -> &Layer {
        self.font.default_layer()
    }

    /// The glyph mapped to `ch`, falling back to `.notdef`.
    fn glyph(&self, ch: char) -> Result<&Glyph, SourceError> {
        let layer = self.layer();
        if let Some(glyph) = layer
            .iter()
            .find(|g| g.codepoints.iter().any(|cp| cp == ch))
        {
            return Ok(glyph);
        }
        match layer.get_glyph(".notdef") {
            Some(glyph) => {
                log::warn!("no glyph for {:?}, using .notdef", ch);
                Ok(glyph)
            }
            None => Err(SourceError::MissingGlyph(ch)),
        }
    }
}

impl GlyphSource for UfoSource {
    fn outline(&self, ch: char) -> Result<RawOutline, SourceError> {
        let path = path_for_glyph(self.layer(), self.glyph(ch)?, 0)?;
        Ok(self.fit.outline(&path))
    }

    fn advance_width(&self, ch: char) -> Result<f64, SourceError> {
        Ok(self.fit.advance(self.glyph(ch)?.width))
    }

    fn font_metrics(&self) -> Result<FontMetrics, SourceError> {
        let info = &self.font.font_info;
        let fit = &self.fit;
        let layer = self.layer();

        let mut bounds: Option<kurbo::Rect> = None;
        let mut max_width: f64 = 0.0;
        for glyph in layer.iter() {
            max_width = max_width.max(glyph.width);
            let path = path_for_glyph(layer, glyph, 0)?;
            if path.elements().is_empty() {
                continue;
            }
            let bbox = path.bounding_box();
            bounds = Some(bounds.map_or(bbox, |b| b.union(bbox)));
        }
        let bounds = bounds.unwrap_or_default();

        let ascii_widths: Vec<f64> = PRINTABLE_ASCII
            .filter_map(|ch| {
                layer
                    .iter()
                    .find(|g| g.codepoints.iter().any(|cp| cp == ch))
            })
            .map(|g| g.width)
            .collect();
        let avg_width = if ascii_widths.is_empty() {
            0.0
        } else {
            ascii_widths.iter().sum::<f64>() / ascii_widths.len() as f64
        };

        let mut metrics = FontMetrics {
            top: fit.y(bounds.y1),
            ascent: fit.y(info.ascender.unwrap_or(0.0)),
            descent: fit.y(info.descender.unwrap_or(0.0)),
            bottom: fit.y(bounds.y0),
            leading: fit.x(info.open_type_hhea_line_gap.map(f64::from).unwrap_or(0.0)),
            avg_char_width: fit.x(avg_width),
            max_char_width: fit.x(max_width),
            x_min: fit.x(bounds.x0),
            x_max: fit.x(bounds.x1),
            x_height: fit.x(info.x_height.unwrap_or(0.0)),
            cap_height: fit.x(info.cap_height.unwrap_or(0.0)),
            ..Default::default()
        };
        if let Some(thickness) = info.postscript_underline_thickness {
            metrics.flags |= flags::UNDERLINE_THICKNESS_IS_VALID;
            metrics.underline_thickness = fit.x(thickness);
        }
        if let Some(position) = info.postscript_underline_position {
            metrics.flags |= flags::UNDERLINE_POSITION_IS_VALID;
            metrics.underline_position = fit.y(position);
        }
        Ok(metrics)
    }
}

/// Convert a glyph's contours, and those of its components, into a single
/// `kurbo::BezPath` in design units.
fn path_for_glyph(layer: &Layer, glyph: &Glyph, depth: usize) -> Result<BezPath, SourceError> {
    if depth > MAX_COMPONENT_DEPTH {
        return Err(SourceError::Parse(format!(
            "components of '{}' nest too deeply",
            glyph.name()
        )));
    }
    let mut path = BezPath::new();
    for contour in &glyph.contours {
        add_contour(&mut path, contour)?;
    }
    for component in &glyph.components {
        let name = component.base.to_string();
        let base = match layer.get_glyph(&name) {
            Some(base) => base,
            None => {
                log::warn!("'{}' uses missing component '{}'", glyph.name(), name);
                continue;
            }
        };
        let t = &component.transform;
        let affine = Affine::new([
            t.x_scale, t.xy_scale, t.yx_scale, t.y_scale, t.x_offset, t.y_offset,
        ]);
        let mut sub = path_for_glyph(layer, base, depth + 1)?;
        sub.apply_affine(affine);
        path.extend(sub.elements().iter().copied());
    }
    Ok(path)
}

fn to_point(p: &ContourPoint) -> Point {
    Point::new(p.x, p.y)
}

/// An outline can have multiple contours, which correspond to subpaths.
fn add_contour(path: &mut BezPath, contour: &Contour) -> Result<(), SourceError> {
    if contour.points.is_empty() {
        return Ok(());
    }
    let closed = contour.points[0].typ != PointType::Move;

    // closed contours may start anywhere, including on an off-curve point
    let points: Vec<&ContourPoint> = if closed {
        let start = contour
            .points
            .iter()
            .position(|p| p.typ != PointType::OffCurve)
            .ok_or_else(|| SourceError::Parse("contour has no on-curve points".into()))?;
        contour.points[start..]
            .iter()
            .chain(&contour.points[..start])
            .collect()
    } else {
        contour.points.iter().collect()
    };

    let first = to_point(points[0]);
    path.move_to(first);
    let mut controls: Vec<Point> = Vec::with_capacity(2);

    for next in points[1..].iter().copied().chain(closed.then_some(points[0])) {
        let point = to_point(next);
        match next.typ {
            PointType::OffCurve => controls.push(point),
            PointType::Line => {
                if !controls.is_empty() {
                    log::warn!("line point follows off-curve points; dropping them");
                    controls.clear();
                }
                path.line_to(point);
            }
            PointType::Curve => add_curve(path, point, &mut controls)?,
            PointType::QCurve => add_qcurve(path, point, &mut controls),
            PointType::Move => {
                return Err(SourceError::Parse("move point inside a contour".into()))
            }
        }
    }
    if closed {
        path.close_path();
    }
    Ok(())
}

fn add_curve(path: &mut BezPath, to: Point, controls: &mut Vec<Point>) -> Result<(), SourceError> {
    match controls.as_slice() {
        [] => path.line_to(to),
        [a] => path.quad_to(*a, to),
        [a, b] => path.curve_to(*a, *b, to),
        _ => {
            return Err(SourceError::Parse(format!(
                "cubic segment with {} off-curve points",
                controls.len()
            )))
        }
    }
    controls.clear();
    Ok(())
}

/// TrueType-style runs of off-curve points have an implied on-curve point
/// halfway between each pair.
fn add_qcurve(path: &mut BezPath, to: Point, controls: &mut Vec<Point>) {
    if controls.is_empty() {
        path.line_to(to);
        return;
    }
    for pair in controls.windows(2) {
        path.quad_to(pair[0], pair[0].midpoint(pair[1]));
    }
    if let Some(last) = controls.last() {
        path.quad_to(*last, to);
    }
    controls.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    fn pt(x: f64, y: f64, typ: PointType) -> ContourPoint {
        ContourPoint::new(x, y, typ, false, None, None)
    }

    fn path_of(points: Vec<ContourPoint>) -> BezPath {
        let mut path = BezPath::new();
        add_contour(&mut path, &Contour::new(points, None)).unwrap();
        path
    }

    #[test]
    fn closed_line_contour() {
        let path = path_of(vec![
            pt(0., 0., PointType::Line),
            pt(100., 0., PointType::Line),
            pt(100., 100., PointType::Line),
        ]);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo((0., 0.).into()),
                PathEl::LineTo((100., 0.).into()),
                PathEl::LineTo((100., 100.).into()),
                PathEl::LineTo((0., 0.).into()),
                PathEl::ClosePath,
            ]
        );
    }

    #[test]
    fn open_contour_is_not_closed() {
        let path = path_of(vec![
            pt(0., 0., PointType::Move),
            pt(50., 0., PointType::Line),
        ]);
        assert_eq!(path.elements().len(), 2);
        assert_ne!(path.elements().last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn rotates_to_on_curve_start() {
        let path = path_of(vec![
            pt(0., 50., PointType::OffCurve),
            pt(0., 100., PointType::OffCurve),
            pt(50., 100., PointType::Curve),
            pt(50., 0., PointType::Line),
        ]);
        let elements = path.elements();
        assert_eq!(elements[0], PathEl::MoveTo((50., 100.).into()));
        assert_eq!(elements[1], PathEl::LineTo((50., 0.).into()));
        assert_eq!(
            elements[2],
            PathEl::CurveTo((0., 50.).into(), (0., 100.).into(), (50., 100.).into())
        );
        assert_eq!(elements[3], PathEl::ClosePath);
    }

    #[test]
    fn implied_quadratic_on_curves() {
        let path = path_of(vec![
            pt(0., 0., PointType::Move),
            pt(10., 0., PointType::OffCurve),
            pt(20., 10., PointType::OffCurve),
            pt(20., 20., PointType::QCurve),
        ]);
        assert_eq!(
            &path.elements()[1..],
            &[
                PathEl::QuadTo((10., 0.).into(), (15., 5.).into()),
                PathEl::QuadTo((20., 10.).into(), (20., 20.).into()),
            ]
        );
    }

    #[test]
    fn too_many_cubic_controls() {
        let mut path = BezPath::new();
        let contour = Contour::new(
            vec![
                pt(0., 0., PointType::Move),
                pt(1., 0., PointType::OffCurve),
                pt(2., 0., PointType::OffCurve),
                pt(3., 0., PointType::OffCurve),
                pt(4., 0., PointType::Curve),
            ],
            None,
        );
        assert!(matches!(
            add_contour(&mut path, &contour),
            Err(SourceError::Parse(_))
        ));
    }
}
