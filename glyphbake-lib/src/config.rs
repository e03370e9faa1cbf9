//! Options that shape a single encoding run.

use crate::grid::Grid;
use crate::scalar::LiteralPrecision;

/// Everything the encoder needs to know besides the glyphs themselves.
///
/// This is passed explicitly to [`serialize_glyph_set`]; there is no
/// global state.
///
/// [`serialize_glyph_set`]: crate::serialize_glyph_set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeConfig {
    pub grid: Grid,
    pub precision: LiteralPrecision,
    pub naming: Naming,
}

/// Names used in the text around the encoded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    /// Mentioned in the header comment.
    pub generator: String,
    pub namespace: String,
    /// The generated function that fills the path and width arrays.
    pub function: String,
    /// The variable each glyph's path is built in.
    pub path_variable: String,
}

impl Default for Naming {
    fn default() -> Self {
        Naming {
            generator: "glyphbake".into(),
            namespace: "glyph_data".into(),
            function: "create_font".into(),
            path_variable: "path".into(),
        }
    }
}

/// True for names that can be pasted into generated code as identifiers.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}
