//! Error handling for GCodePath
//!
//! Provides the error types for every stage of the toolpath codec:
//! - Parse errors (malformed numeric fields on a motion line)
//! - Format errors (settings block structure)
//! - Geometry errors (point data requested from an incomplete line)
//! - Config errors (codec configuration loading and validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;

/// A coordinate, extrusion or feedrate token whose value is not a decimal number.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}Invalid value for '{field}': '{token}' is not a decimal number", line_prefix(.line_number))]
pub struct ParseError {
    /// Zero-based source line, when the failing line is part of a program.
    pub line_number: Option<usize>,
    /// The field letter (X, Y, Z, E or F).
    pub field: char,
    /// The offending token, including its field letter.
    pub token: String,
}

fn line_prefix(line_number: &Option<usize>) -> String {
    match line_number {
        Some(n) => format!("Line {}: ", n),
        None => String::new(),
    }
}

impl ParseError {
    /// Create a parse error for a single line with no program context
    pub fn new(field: char, token: impl Into<String>) -> Self {
        Self {
            line_number: None,
            field,
            token: token.into(),
        }
    }

    /// Attach the zero-based position of the failing line within a program
    pub fn at_line(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }
}

/// Settings block structure errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The settings list does not begin with the start sentinel
    #[error("Settings must begin with '{expected}', found {}", describe_found(.found))]
    MissingStartSentinel {
        /// The sentinel that was expected as the first element.
        expected: String,
        /// The first element actually found, if any.
        found: Option<String>,
    },
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(line) => format!("'{}'", line),
        None => "an empty list".to_string(),
    }
}

/// Geometry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A line lacks full X, Y and Z data
    #[error("Cannot calculate distance: line {} does not contain coordinate data", describe_index(.index))]
    MissingCoordinates {
        /// Index of the line within its program, if it has been aggregated.
        index: Option<usize>,
    },
}

fn describe_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => i.to_string(),
        None => "(unindexed)".to_string(),
    }
}

/// Codec configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// I/O error while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Main error type for GCodePath
///
/// A unified error type that can represent any error from all crates.
/// This is the primary error type used in pipeline APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Parse error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Settings format error
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Check if this is a parse error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// Check if this is a settings format error
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
