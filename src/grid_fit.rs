//! Moving design-space outlines onto the encoder's grid.
//!
//! Fonts are y-up and measured in their own units per em; the encoder wants
//! y-down values in whole grid units. Rounding here plays the part hinting
//! plays when a rasterizer renders at a large em size.

use glyphbake_lib::{Grid, RawOutline};
use kurbo::{Affine, BezPath};

#[derive(Debug, Clone, Copy)]
pub(crate) struct GridFit {
    scale: f64,
}

impl GridFit {
    pub(crate) fn new(grid: Grid, units_per_em: f64) -> Self {
        GridFit {
            scale: grid.units_per_em() / units_per_em,
        }
    }

    /// Scales, flips and snaps a design-space path into a raw outline.
    pub(crate) fn outline(&self, path: &BezPath) -> RawOutline {
        let mut path = path.clone();
        path.apply_affine(Affine::FLIP_Y * Affine::scale(self.scale));
        let mut outline = RawOutline::from_bezpath(&path);
        outline.map_points(|p| p.round());
        outline
    }

    /// A horizontal distance, snapped to a whole grid unit.
    pub(crate) fn advance(&self, width: f64) -> f64 {
        (width * self.scale).round()
    }

    /// A horizontal metric, not snapped.
    pub(crate) fn x(&self, value: f64) -> f64 {
        value * self.scale
    }

    /// A vertical metric, not snapped, with y flipped to point down.
    pub(crate) fn y(&self, value: f64) -> f64 {
        -value * self.scale
    }
}
