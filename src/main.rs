//! Bakes glyph outlines from a font into C++ source.

#[macro_use]
extern crate serde_derive;

mod dump;
mod grid_fit;
mod ttf;
mod ufo;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use glyphbake_lib::{collect_glyphs, serialize_glyph_set, GlyphSource, Grid, Settings};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use dump::FontDump;

/// glyphbake command line arguments
///
/// Examples:
///   glyphbake Fira.ttf -o fira_glyphs.inc
///   glyphbake MyFont.ufo --settings bake.settings
///   glyphbake MyFont.otf --dump-json glyphs.json
///   glyphbake glyphs.json --precision strict
#[derive(Parser, Debug)]
#[clap(
    name = "glyphbake",
    version,
    about = "Bake glyph outlines from a font into C++ source"
)]
struct Args {
    /// The font to read: a .ttf or .otf file, a .ufo directory, or a .json
    /// file written by --dump-json.
    font: PathBuf,

    /// Where to write the generated source; stdout if omitted.
    #[clap(long, short = 'o')]
    out: Option<PathBuf>,

    /// A settings file; see the library docs for the format.
    #[clap(long)]
    settings: Option<PathBuf>,

    /// Overrides GRID_SIZE from the settings file.
    #[clap(long)]
    grid_size: Option<u32>,

    /// Overrides LITERAL_PRECISION: widen, strict or truncate.
    #[clap(long)]
    precision: Option<String>,

    /// Also save the extracted glyphs as JSON.
    #[clap(long)]
    dump_json: Option<PathBuf>,

    /// More logging; repeat for more detail.
    #[clap(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to start logger: {}", e);
    }
    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(size) = args.grid_size {
        settings.set("GRID_SIZE", size.to_string())?;
    }
    if let Some(precision) = &args.precision {
        settings.set("LITERAL_PRECISION", precision.as_str())?;
    }
    let config = settings.encode_config()?;
    let codepoints = settings.codepoints()?;

    let source = open_source(&args.font, config.grid)?;
    let glyphs = collect_glyphs(source.as_ref(), codepoints)
        .with_context(|| format!("failed to extract glyphs from {}", args.font.display()))?;
    let metrics = source.font_metrics()?;

    if let Some(path) = &args.dump_json {
        FontDump::new(config.grid, metrics, glyphs.clone()).save(path)?;
    }

    let text = serialize_glyph_set(&glyphs, &metrics, &config)?;
    match &args.out {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}

fn open_source(path: &Path, grid: Grid) -> Result<Box<dyn GlyphSource>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let source: Box<dyn GlyphSource> = match extension.as_deref() {
        Some("ttf") | Some("otf") => Box::new(ttf::TtfSource::load(path, grid)?),
        Some("ufo") => Box::new(ufo::UfoSource::load(path, grid)?),
        Some("json") => Box::new(FontDump::load(path, grid)?),
        _ => bail!(
            "don't know how to read {}; expected .ttf, .otf, .ufo or .json",
            path.display()
        ),
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let args =
            Args::try_parse_from(["glyphbake", "font.ttf", "-o", "out.inc", "-vv", "--grid-size", "2048"])
                .unwrap();
        assert_eq!(args.font, PathBuf::from("font.ttf"));
        assert_eq!(args.out, Some(PathBuf::from("out.inc")));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.grid_size, Some(2048));
    }

    #[test]
    fn unknown_extension() {
        let err = open_source(Path::new("font.woff2"), Grid::default()).err().unwrap();
        assert!(err.to_string().contains("font.woff2"));
    }
}
