//! Serializing outlines and metrics as source text.
//!
//! The output is a single C++ function that appends one path and one
//! advance width per glyph to a pair of arrays, and returns the font
//! metrics. The statements inside the function are the stable part: one
//! per verb, in stream order, with every coordinate passed through
//! [`format_scalar`] and every advance through [`format_fixed`].

use kurbo::Point;

use crate::config::EncodeConfig;
use crate::error::{Axis, EncodeError};
use crate::glyph::{Glyph, GlyphSet};
use crate::grid::{check_aligned, Grid};
use crate::metrics::{FontMetrics, LINE_BREAKS};
use crate::path::Verb;
use crate::scalar::{format_fixed, format_scalar, LiteralError, LiteralPrecision};

const INDENT: &str = "    ";
const RETURN_TYPE: &str = "SkPaint::FontMetrics";

/// Encodes every glyph, in order, followed by the font metrics.
///
/// This is a pure function of its inputs. If any glyph breaks the input
/// contract the whole run fails and no text is returned.
pub fn serialize_glyph_set(
    glyphs: &GlyphSet,
    metrics: &FontMetrics,
    config: &EncodeConfig,
) -> Result<String, EncodeError> {
    let mut out = header(config);
    for glyph in glyphs.iter() {
        out.push_str(&encode_glyph(glyph, config)?);
    }
    out.push_str(&encode_metrics(metrics, config)?);
    out.push_str("}\n\n}\n");
    log::info!(
        "encoded {} glyphs at {} units per em",
        glyphs.len(),
        config.grid.size()
    );
    Ok(out)
}

/// The statement for one verb, e.g. `lineTo(1, 0);`.
///
/// `points` are the points to emit, already stripped of the repeated
/// current point.
pub fn verb_statement(
    verb: Verb,
    points: &[Point],
    grid: Grid,
    precision: LiteralPrecision,
) -> Result<String, LiteralError> {
    debug_assert_eq!(points.len(), verb.point_count());
    let mut args = Vec::with_capacity(points.len() * 2);
    for point in points {
        args.push(format_scalar(point.x, grid, precision)?);
        args.push(format_scalar(point.y, grid, precision)?);
    }
    Ok(format!("{}({});", verb.method(), args.join(", ")))
}

fn header(config: &EncodeConfig) -> String {
    let naming = &config.naming;
    let signature = format!("{} {}(", RETURN_TYPE, naming.function);
    let align = " ".repeat(signature.len());
    format!(
        "/*\n * Generated by {generator}. Do not edit.\n */\n\
         \n\
         #include \"SkPaint.h\"\n\
         #include \"SkPath.h\"\n\
         #include \"SkTDArray.h\"\n\
         \n\
         namespace {namespace} {{\n\
         \n\
         {signature}SkTDArray<SkPath*>& pathArray,\n\
         {align}SkTDArray<SkFixed>& widthArray) {{\n\
         {INDENT}SkPath* {var};\n",
        generator = naming.generator,
        namespace = naming.namespace,
        signature = signature,
        align = align,
        INDENT = INDENT,
        var = naming.path_variable,
    )
}

/// One glyph's block: declaration, one statement per verb, advance width.
pub(crate) fn encode_glyph(glyph: &Glyph, config: &EncodeConfig) -> Result<String, EncodeError> {
    let var = &config.naming.path_variable;
    let codepoint = glyph.codepoint;
    let mut block = format!(
        "{i}{var} = new SkPath(); // {label}\n{i}*pathArray.append() = {var};\n",
        i = INDENT,
        var = var,
        label = glyph.label(),
    );

    let mut verbs = 0;
    for (segment, raw) in glyph.outline.segments().enumerate() {
        let (verb, points) = raw
            .decode()
            .map_err(|e| EncodeError::from_segment(codepoint, segment, e))?;
        for point in points {
            for (axis, value) in [(Axis::X, point.x), (Axis::Y, point.y)] {
                check_aligned(value).map_err(|_| EncodeError::OffGrid {
                    codepoint,
                    segment,
                    axis,
                    value,
                })?;
            }
        }
        let statement = verb_statement(verb, points, config.grid, config.precision).map_err(
            |error| EncodeError::CoordinateLiteral {
                codepoint,
                segment,
                error,
            },
        )?;
        block.push_str(INDENT);
        block.push_str(var);
        block.push_str("->");
        block.push_str(&statement);
        block.push('\n');
        verbs += 1;
    }

    let advance = check_aligned(glyph.advance).map_err(|_| EncodeError::OffGridAdvance {
        codepoint,
        value: glyph.advance,
    })?;
    let fixed = format_fixed(advance, config.grid)
        .map_err(|error| EncodeError::AdvanceLiteral { codepoint, error })?;
    block.push_str(&format!(
        "{}*widthArray.append() = {};\n\n",
        INDENT, fixed
    ));
    log::debug!("glyph {:?}: {} verbs", codepoint, verbs);
    Ok(block)
}

/// The metrics record: flags in hex, then the scalars in their fixed order.
pub(crate) fn encode_metrics(
    metrics: &FontMetrics,
    config: &EncodeConfig,
) -> Result<String, EncodeError> {
    let literals = metrics
        .scalars()
        .iter()
        .map(|&(field, raw)| {
            format_scalar(raw, config.grid, config.precision)
                .map_err(|error| EncodeError::MetricLiteral { field, error })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut lines = Vec::with_capacity(LINE_BREAKS.len());
    let mut rest = literals.as_slice();
    for count in LINE_BREAKS {
        let (line, tail) = rest.split_at(count);
        lines.push(line.join(", "));
        rest = tail;
    }
    let separator = format!(",\n{0}{0}", INDENT);
    Ok(format!(
        "{i}{ty} metrics = {{\n{i}{i}0x{flags:08x}, {body}\n{i}}};\n{i}return metrics;\n",
        i = INDENT,
        ty = RETURN_TYPE,
        flags = metrics.flags,
        body = lines.join(&separator),
    ))
}
