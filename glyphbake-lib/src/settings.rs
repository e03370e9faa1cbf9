//! Loading encoder settings from files.
//!
//! ## File format
//!
//! Settings use the same simple text format as runebender themes: each
//! non-blank line must contain a key/value pair, separated by a colon.
//! Anything after `//` is a comment. Every key is optional; unknown keys are
//! an error, so typos don't silently fall back to defaults.
//!
//! ## Example file
//!
//! ```text
//! // bake the printable ASCII range at 4096 units per em
//! GRID_SIZE:          4096
//! LITERAL_PRECISION:  widen
//! FIRST_CODEPOINT:    0x20
//! LAST_CODEPOINT:     0x7e
//! NAMESPACE:          sk_tool_utils
//! FUNCTION_NAME:      create_font
//! PATH_VARIABLE:      path
//! GENERATOR_NAME:     glyphbake
//! ```

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::config::{is_identifier, EncodeConfig};
use crate::glyph::PRINTABLE_ASCII;
use crate::grid::Grid;
use crate::scalar::LiteralPrecision;

const GRID_SIZE: &str = "GRID_SIZE";
const LITERAL_PRECISION: &str = "LITERAL_PRECISION";
const FIRST_CODEPOINT: &str = "FIRST_CODEPOINT";
const LAST_CODEPOINT: &str = "LAST_CODEPOINT";
const NAMESPACE: &str = "NAMESPACE";
const FUNCTION_NAME: &str = "FUNCTION_NAME";
const PATH_VARIABLE: &str = "PATH_VARIABLE";
const GENERATOR_NAME: &str = "GENERATOR_NAME";

const KNOWN_KEYS: &[&str] = &[
    GRID_SIZE,
    LITERAL_PRECISION,
    FIRST_CODEPOINT,
    LAST_CODEPOINT,
    NAMESPACE,
    FUNCTION_NAME,
    PATH_VARIABLE,
    GENERATOR_NAME,
];

/// Raw settings as read from a file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Settings::parse(&text)?;
        log::debug!("loaded {} settings from {}", settings.values.len(), path.display());
        Ok(settings)
    }

    pub fn parse(text: &str) -> Result<Settings, SettingsError> {
        let mut values = HashMap::new();
        for item in iter_items(text) {
            let (key, value) = item?;
            if !KNOWN_KEYS.contains(&key) {
                return Err(SettingsError::UnknownKey(key.to_string()));
            }
            if values.insert(key.to_string(), value.to_string()).is_some() {
                return Err(SettingsError::DuplicateKey(key.to_string()));
            }
        }
        Ok(Settings { values })
    }

    /// Overrides (or sets) a single value, as a command line flag would.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), SettingsError> {
        match KNOWN_KEYS.iter().find(|k| **k == key) {
            Some(known) => {
                self.values.insert(known.to_string(), value.into());
                Ok(())
            }
            None => Err(SettingsError::UnknownKey(key.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Validates the settings into an [`EncodeConfig`], filling in defaults.
    pub fn encode_config(&self) -> Result<EncodeConfig, SettingsError> {
        let mut config = EncodeConfig::default();
        if let Some(size) = self.get(GRID_SIZE) {
            let parsed = size
                .parse::<u32>()
                .map_err(|e| SettingsError::invalid(GRID_SIZE, size, e))?;
            config.grid = Grid::new(parsed).map_err(|e| SettingsError::invalid(GRID_SIZE, size, e))?;
        }
        if let Some(precision) = self.get(LITERAL_PRECISION) {
            config.precision = precision
                .parse::<LiteralPrecision>()
                .map_err(|e| SettingsError::invalid(LITERAL_PRECISION, precision, e))?;
        }
        let naming = &mut config.naming;
        for (key, slot) in [
            (NAMESPACE, &mut naming.namespace),
            (FUNCTION_NAME, &mut naming.function),
            (PATH_VARIABLE, &mut naming.path_variable),
        ] {
            if let Some(name) = self.get(key) {
                if !is_identifier(name) {
                    return Err(SettingsError::invalid(key, name, "not an identifier"));
                }
                *slot = name.to_string();
            }
        }
        if let Some(generator) = self.get(GENERATOR_NAME) {
            // the name ends up inside a block comment
            if generator.contains("*/") {
                return Err(SettingsError::invalid(
                    GENERATOR_NAME,
                    generator,
                    "would end the header comment",
                ));
            }
            naming.generator = generator.to_string();
        }
        Ok(config)
    }

    /// The codepoints to encode, in order.
    pub fn codepoints(&self) -> Result<RangeInclusive<char>, SettingsError> {
        let first = match self.get(FIRST_CODEPOINT) {
            Some(value) => parse_codepoint(FIRST_CODEPOINT, value)?,
            None => *PRINTABLE_ASCII.start(),
        };
        let last = match self.get(LAST_CODEPOINT) {
            Some(value) => parse_codepoint(LAST_CODEPOINT, value)?,
            None => *PRINTABLE_ASCII.end(),
        };
        if first > last {
            return Err(SettingsError::invalid(
                LAST_CODEPOINT,
                self.get(LAST_CODEPOINT).unwrap_or_default(),
                "range ends before it starts",
            ));
        }
        Ok(first..=last)
    }
}

/// Accepts `0x`-prefixed hex or plain decimal.
fn parse_codepoint(key: &'static str, value: &str) -> Result<char, SettingsError> {
    let number = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    }
    .map_err(|e| SettingsError::invalid(key, value, e))?;
    char::from_u32(number).ok_or_else(|| SettingsError::invalid(key, value, "not a scalar value"))
}

/// Given a string in the settings format, iterate over keys and values
fn iter_items(s: &str) -> impl Iterator<Item = Result<(&str, &str), SettingsError>> {
    s.lines().filter_map(|line| {
        let line = line.split("//").next().unwrap_or(line);
        if line.trim().is_empty() {
            None
        } else {
            let mut split = line.split(':');
            match (split.next(), split.next(), split.next()) {
                (Some(key), Some(val), None) => Some(Ok((key.trim(), val.trim()))),
                _ => Some(Err(SettingsError::MalformedLine(line.to_string()))),
            }
        }
    })
}

/// A type for errors that occur when loading settings.
#[derive(Debug)]
pub enum SettingsError {
    IoError(std::io::Error),
    MalformedLine(String),
    UnknownKey(String),
    DuplicateKey(String),
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl SettingsError {
    fn invalid(key: &'static str, value: &str, reason: impl std::fmt::Display) -> Self {
        SettingsError::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::IoError(err) => write!(f, "io error loading settings: '{}'", err),
            Self::MalformedLine(s) => {
                write!(f, "Settings contained malformed line: '{}'", s.escape_debug())
            }
            Self::UnknownKey(k) => write!(f, "Unknown settings key '{}'", k),
            Self::DuplicateKey(k) => write!(f, "Settings key '{}' appears twice", k),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "Invalid value '{}' for {}: {}", value, key, reason)
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(src: std::io::Error) -> SettingsError {
        SettingsError::IoError(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test() {
        let text = r#"// this is a comment
            GRID_SIZE: 2048
            LITERAL_PRECISION: strict
            NAMESPACE: sk_tool_utils //trailing comment
            FIRST_CODEPOINT: 0x41
            LAST_CODEPOINT: 90
            "#;

        let settings = Settings::parse(text).unwrap();
        let config = settings.encode_config().unwrap();
        assert_eq!(config.grid.size(), 2048);
        assert_eq!(config.precision, LiteralPrecision::Strict);
        assert_eq!(config.naming.namespace, "sk_tool_utils");
        assert_eq!(config.naming.function, "create_font");
        assert_eq!(settings.codepoints().unwrap(), 'A'..='Z');
    }

    #[test]
    fn empty_means_defaults() {
        let settings = Settings::parse("\n   \n// nothing\n").unwrap();
        assert_eq!(settings.encode_config().unwrap(), EncodeConfig::default());
        assert_eq!(settings.codepoints().unwrap(), ' '..='~');
    }

    #[test]
    fn rejects_bad_lines_and_keys() {
        assert!(matches!(
            Settings::parse("GRID_SIZE 4096"),
            Err(SettingsError::MalformedLine(_))
        ));
        assert!(matches!(
            Settings::parse("NAMESPACE: a:b"),
            Err(SettingsError::MalformedLine(_))
        ));
        assert!(matches!(
            Settings::parse("GRID_SZE: 4096"),
            Err(SettingsError::UnknownKey(k)) if k == "GRID_SZE"
        ));
        assert!(matches!(
            Settings::parse("GRID_SIZE: 4096\nGRID_SIZE: 2048"),
            Err(SettingsError::DuplicateKey(_))
        ));
    }

    #[test]
    fn rejects_bad_values() {
        let invalid = |text: &str| {
            let settings = Settings::parse(text).unwrap();
            let config = settings.encode_config().map(|_| ());
            let range = settings.codepoints().map(|_| ());
            config.and(range).unwrap_err()
        };
        for text in [
            "GRID_SIZE: 1000",
            "GRID_SIZE: big",
            "GRID_SIZE: 131072",
            "LITERAL_PRECISION: loose",
            "FUNCTION_NAME: make font",
            "GENERATOR_NAME: evil */ int x = 1; /*",
            "FIRST_CODEPOINT: 0xd800",
            "FIRST_CODEPOINT: 0x7e\nLAST_CODEPOINT: 0x20",
        ] {
            assert!(
                matches!(invalid(text), SettingsError::InvalidValue { .. }),
                "{}",
                text
            );
        }
    }

    #[test]
    fn generator_name_is_free_text() {
        let settings = Settings::parse("GENERATOR_NAME: bake-fonts 2.1 (ci)").unwrap();
        assert_eq!(
            settings.encode_config().unwrap().naming.generator,
            "bake-fonts 2.1 (ci)"
        );
    }

    #[test]
    fn overrides() {
        let mut settings = Settings::parse("GRID_SIZE: 2048").unwrap();
        settings.set("GRID_SIZE", "1024").unwrap();
        assert_eq!(settings.encode_config().unwrap().grid.size(), 1024);
        assert!(settings.set("NOT_A_KEY", "1").is_err());
    }

    #[test]
    fn load_from_disk() {
        let path = std::env::temp_dir().join(format!("glyphbake-settings-{}.txt", std::process::id()));
        std::fs::write(&path, "PATH_VARIABLE: glyph\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.encode_config().unwrap().naming.path_variable, "glyph");

        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::IoError(_))
        ));
    }
}
