//! Codec configuration
//!
//! Describes the G-code dialect details the codec depends on: the comment
//! delimiter, the recognised motion code, the settings block sentinels,
//! output rounding and how explicit zero coordinates are treated during
//! aggregation. Configuration can be loaded from TOML; every field has a
//! default so partial files are accepted.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Largest number of decimal places accepted for output rounding
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// How the aggregation pass treats an axis written explicitly as zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// Only absent axes are filled; `X0` is a real move to X=0
    Presence,
    /// An explicit zero is treated as absent and replaced by the carried value.
    /// Matches G-code produced for hosts that never emit a true zero.
    ZeroAsAbsent,
}

impl Default for ZeroPolicy {
    fn default() -> Self {
        Self::Presence
    }
}

impl fmt::Display for ZeroPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presence => write!(f, "presence"),
            Self::ZeroAsAbsent => write!(f, "zero_as_absent"),
        }
    }
}

impl FromStr for ZeroPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "presence" => Ok(Self::Presence),
            "zero_as_absent" | "legacy" => Ok(Self::ZeroAsAbsent),
            _ => Err(format!("Unknown zero policy: {}", s)),
        }
    }
}

/// Decimal places used when generating motion lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Precision {
    /// X, Y and Z
    pub coordinate: u32,
    /// F
    pub feedrate: u32,
    /// E
    pub extrusion: u32,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            coordinate: 3,
            feedrate: 0,
            extrusion: 5,
        }
    }
}

/// Codec configuration shared by the parser and generator crates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Character that starts a trailing comment
    pub comment_delimiter: char,
    /// The only command whose fields are tokenised
    pub motion_code: String,
    /// First element of every settings list
    pub start_sentinel: String,
    /// Separates preamble from postamble in a settings list
    pub end_sentinel: String,
    /// Zero-coordinate handling during aggregation
    pub zero_policy: ZeroPolicy,
    /// Output rounding for generated motion lines
    pub precision: Precision,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            comment_delimiter: ';',
            motion_code: "G1".to_string(),
            start_sentinel: "::START::".to_string(),
            end_sentinel: "::END::".to_string(),
            zero_policy: ZeroPolicy::default(),
            precision: Precision::default(),
        }
    }
}

impl CodecConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zero policy
    pub fn with_zero_policy(mut self, policy: ZeroPolicy) -> Self {
        self.zero_policy = policy;
        self
    }

    /// Set the output precision
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded codec config from {}", path.display());
        Ok(config)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.comment_delimiter.is_whitespace() {
            return Err(invalid(
                "comment_delimiter",
                "must not be a whitespace character",
            ));
        }
        if self.motion_code.trim().is_empty() {
            return Err(invalid("motion_code", "must not be empty"));
        }
        if self.motion_code.contains(char::is_whitespace) {
            return Err(invalid("motion_code", "must be a single token"));
        }
        if self.start_sentinel.is_empty() {
            return Err(invalid("start_sentinel", "must not be empty"));
        }
        if self.end_sentinel.is_empty() {
            return Err(invalid("end_sentinel", "must not be empty"));
        }
        if self.start_sentinel == self.end_sentinel {
            return Err(invalid(
                "end_sentinel",
                "must differ from start_sentinel",
            ));
        }

        let places = [
            ("precision.coordinate", self.precision.coordinate),
            ("precision.feedrate", self.precision.feedrate),
            ("precision.extrusion", self.precision.extrusion),
        ];
        for (key, value) in places {
            if value > MAX_DECIMAL_PLACES {
                return Err(invalid(
                    key,
                    &format!("{} exceeds {} decimal places", value, MAX_DECIMAL_PLACES),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
