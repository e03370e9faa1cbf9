//! Font-wide metrics, emitted once after all glyphs.

/// Bits of [`FontMetrics::flags`].
pub mod flags {
    pub const UNDERLINE_THICKNESS_IS_VALID: u32 = 1 << 0;
    pub const UNDERLINE_POSITION_IS_VALID: u32 = 1 << 1;
}

/// Font-wide measurements, in raw grid units with y pointing down.
///
/// Field order here is the order of the emitted record, which downstream
/// consumers read positionally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub flags: u32,
    pub top: f64,
    pub ascent: f64,
    pub descent: f64,
    pub bottom: f64,
    pub leading: f64,
    pub avg_char_width: f64,
    pub max_char_width: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub x_height: f64,
    pub cap_height: f64,
    pub underline_thickness: f64,
    pub underline_position: f64,
}

/// The number of scalar fields following the flags.
pub const SCALAR_FIELD_COUNT: usize = 13;

/// Where the emitted record breaks lines, as counts of scalars per line.
pub(crate) const LINE_BREAKS: [usize; 3] = [5, 4, 4];

impl FontMetrics {
    /// The scalar fields, named, in emission order.
    pub fn scalars(&self) -> [(&'static str, f64); SCALAR_FIELD_COUNT] {
        [
            ("top", self.top),
            ("ascent", self.ascent),
            ("descent", self.descent),
            ("bottom", self.bottom),
            ("leading", self.leading),
            ("avg_char_width", self.avg_char_width),
            ("max_char_width", self.max_char_width),
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("x_height", self.x_height),
            ("cap_height", self.cap_height),
            ("underline_thickness", self.underline_thickness),
            ("underline_position", self.underline_position),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order() {
        let metrics = FontMetrics {
            top: 1.,
            ascent: 2.,
            descent: 3.,
            bottom: 4.,
            leading: 5.,
            avg_char_width: 6.,
            max_char_width: 7.,
            x_min: 8.,
            x_max: 9.,
            x_height: 10.,
            cap_height: 11.,
            underline_thickness: 12.,
            underline_position: 13.,
            ..Default::default()
        };
        let values: Vec<f64> = metrics.scalars().iter().map(|(_, v)| *v).collect();
        assert_eq!(values, (1..=13).map(f64::from).collect::<Vec<_>>());
        assert_eq!(metrics.scalars()[0].0, "top");
        assert_eq!(metrics.scalars()[12].0, "underline_position");
        assert_eq!(LINE_BREAKS.iter().sum::<usize>(), SCALAR_FIELD_COUNT);
    }
}
