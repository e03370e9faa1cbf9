//! The fixed integer lattice that glyph coordinates live on.

/// One em in 16.16 fixed point.
const FIXED_ONE: u32 = 1 << 16;

/// The grid size used when nothing else is configured.
pub const DEFAULT_GRID_SIZE: u32 = 4096;

/// The resolution of the em square, in grid units per em.
///
/// The size is always a power of two no larger than 65536, so the factor
/// from grid units to 16.16 fixed point is an exact integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    size: u32,
}

impl Grid {
    pub fn new(size: u32) -> Result<Self, InvalidGridSize> {
        if size.is_power_of_two() && size <= FIXED_ONE {
            Ok(Grid { size })
        } else {
            Err(InvalidGridSize(size))
        }
    }

    pub fn size(self) -> u32 {
        self.size
    }

    pub fn units_per_em(self) -> f64 {
        f64::from(self.size)
    }

    /// The number of 16.16 fixed-point units in one grid unit.
    pub fn fixed_scale(self) -> u32 {
        FIXED_ONE / self.size
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            size: DEFAULT_GRID_SIZE,
        }
    }
}

/// Returns `raw` unchanged if it lies on the grid.
///
/// Collaborators are expected to have snapped every point to a whole grid
/// unit already; a fractional (or non-finite) value means they did not.
pub fn check_aligned(raw: f64) -> Result<f64, OffGrid> {
    if raw.is_finite() && raw.floor() == raw {
        Ok(raw)
    } else {
        Err(OffGrid(raw))
    }
}

/// A raw value that is not a whole number of grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffGrid(pub f64);

impl std::fmt::Display for OffGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "value {} is not on the grid", self.0)
    }
}

impl std::error::Error for OffGrid {}

/// A grid size that is zero, not a power of two, or larger than 65536.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidGridSize(pub u32);

impl std::fmt::Display for InvalidGridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "grid size {} must be a power of two between 1 and {}",
            self.0, FIXED_ONE
        )
    }
}

impl std::error::Error for InvalidGridSize {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_sizes() {
        assert_eq!(Grid::default().size(), 4096);
        assert_eq!(Grid::default().fixed_scale(), 16);
        assert_eq!(Grid::new(65536).unwrap().fixed_scale(), 1);
        assert_eq!(Grid::new(1).unwrap().fixed_scale(), 65536);
        assert_eq!(Grid::new(0), Err(InvalidGridSize(0)));
        assert_eq!(Grid::new(1000), Err(InvalidGridSize(1000)));
        assert_eq!(Grid::new(131072), Err(InvalidGridSize(131072)));
    }

    #[test]
    fn alignment() {
        assert_eq!(check_aligned(4096.0), Ok(4096.0));
        assert_eq!(check_aligned(-12.0), Ok(-12.0));
        assert_eq!(check_aligned(0.0), Ok(0.0));
        assert_eq!(check_aligned(0.5), Err(OffGrid(0.5)));
        assert_eq!(check_aligned(-1.25), Err(OffGrid(-1.25)));
        assert!(check_aligned(f64::NAN).is_err());
        assert!(check_aligned(f64::INFINITY).is_err());
    }

    #[test]
    fn alignment_never_rounds() {
        let raw = 2047.999_999;
        assert_eq!(check_aligned(raw), Err(OffGrid(raw)));
    }
}
