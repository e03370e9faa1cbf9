//! The core library of glyphbake: baking glyph outlines and font metrics
//! into source text.
//!
//! An outline source (see [`GlyphSource`]) supplies raw segment streams and
//! advance widths on a fixed integer grid. [`serialize_glyph_set`] checks
//! that every value really is on the grid, picks the shortest literal for
//! each one, and writes one statement per path verb.

#[macro_use]
extern crate serde_derive;

mod config;
mod emit;
mod error;
mod glyph;
mod grid;
mod metrics;
mod path;
mod scalar;
mod settings;
mod source;

pub use config::{EncodeConfig, Naming};
pub use emit::{serialize_glyph_set, verb_statement};
pub use error::{Axis, EncodeError};
pub use glyph::{Glyph, GlyphSet, PRINTABLE_ASCII};
pub use grid::{check_aligned, Grid, InvalidGridSize, OffGrid, DEFAULT_GRID_SIZE};
pub use metrics::{flags, FontMetrics, SCALAR_FIELD_COUNT};
pub use path::{code, RawOutline, RawSegment, SegmentError, Verb};
pub use scalar::{format_fixed, format_scalar, LiteralError, LiteralPrecision, SIGNIFICANT_DIGITS};
pub use settings::{Settings, SettingsError};
pub use source::{collect_glyphs, GlyphSource, SourceError};
