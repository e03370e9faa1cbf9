//! Extracted glyphs saved as JSON, so a font can be encoded again without
//! re-reading it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use glyphbake_lib::{FontMetrics, GlyphSet, GlyphSource, Grid, RawOutline, SourceError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDump {
    /// The grid the glyphs were snapped to.
    pub grid_size: u32,
    pub metrics: FontMetrics,
    pub glyphs: GlyphSet,
}

impl FontDump {
    pub fn new(grid: Grid, metrics: FontMetrics, glyphs: GlyphSet) -> Self {
        FontDump {
            grid_size: grid.size(),
            metrics,
            glyphs,
        }
    }

    /// Loads a dump, which must have been made on `grid`.
    pub fn load(path: &Path, grid: Grid) -> Result<FontDump> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let dump: FontDump = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if dump.grid_size != grid.size() {
            bail!(
                "{} was extracted on a {} unit grid, but the grid is {}",
                path.display(),
                dump.grid_size,
                grid.size()
            );
        }
        log::info!("loaded {} glyphs from {}", dump.glyphs.len(), path.display());
        Ok(dump)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        log::info!("saved {} glyphs to {}", self.glyphs.len(), path.display());
        Ok(())
    }
}

impl GlyphSource for FontDump {
    fn outline(&self, ch: char) -> Result<RawOutline, SourceError> {
        self.glyphs
            .iter()
            .find(|g| g.codepoint == ch)
            .map(|g| g.outline.clone())
            .ok_or(SourceError::MissingGlyph(ch))
    }

    fn advance_width(&self, ch: char) -> Result<f64, SourceError> {
        self.glyphs
            .iter()
            .find(|g| g.codepoint == ch)
            .map(|g| g.advance)
            .ok_or(SourceError::MissingGlyph(ch))
    }

    fn font_metrics(&self) -> Result<FontMetrics, SourceError> {
        Ok(self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphbake_lib::{collect_glyphs, code, Glyph, RawSegment};
    use kurbo::Point;

    fn dump() -> FontDump {
        let mut outline = RawOutline::new();
        outline.push(RawSegment::new(code::MOVE, vec![Point::ZERO]));
        outline.push(RawSegment::new(
            code::LINE,
            vec![Point::ZERO, Point::new(4096., 0.)],
        ));
        outline.push(RawSegment::new(code::CLOSE, vec![]));
        outline.finish();
        let glyphs = vec![
            Glyph::new('a', outline, 2048.),
            Glyph::new('b', RawOutline::new(), 1024.),
        ]
        .into_iter()
        .collect();
        FontDump::new(Grid::default(), FontMetrics::default(), glyphs)
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("glyphbake-{}-{}", std::process::id(), name))
    }

    #[test]
    fn save_and_load() {
        let path = temp_path("dump.json");
        let saved = dump();
        saved.save(&path).unwrap();
        let loaded = FontDump::load(&path, Grid::default()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn grid_mismatch() {
        let path = temp_path("mismatch.json");
        dump().save(&path).unwrap();
        let result = FontDump::load(&path, Grid::new(1024).unwrap());
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn serves_as_a_source() {
        let dump = dump();
        let glyphs = collect_glyphs(&dump, 'a'..='b').unwrap();
        assert_eq!(glyphs.len(), 2);
        assert!(matches!(
            dump.advance_width('z'),
            Err(SourceError::MissingGlyph('z'))
        ));
    }
}
