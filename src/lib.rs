//! # GCodePath
//!
//! Bidirectional translation between G-code motion programs and 3D line
//! segments annotated with feedrate, extrusion and travel flags.
//!
//! ## Architecture
//!
//! GCodePath is organized as a workspace with multiple crates:
//!
//! 1. **gcodepath-core** - errors, geometry interfaces, configuration, diagnostics
//! 2. **gcodepath-parser** - line model, sticky-coordinate aggregation, decoding
//! 3. **gcodepath-camtools** - settings blocks and G-code generation
//! 4. **gcodepath** - facade crate and command-line front end
//!
//! ## Example
//!
//! ```
//! use gcodepath::{ToolpathDecoder, ToolpathEncoder};
//!
//! let decoded = ToolpathDecoder::new()
//!     .decode(&["G1 X0 Y0 Z0", "G1 X10 Y0", "G1 X10 Y10 E1.0"])
//!     .unwrap();
//! assert_eq!(decoded.len(), 2);
//!
//! let program = ToolpathEncoder::new()
//!     .encode(
//!         &["::START::", "G28", "::END::", "M104 S0"],
//!         &decoded.lines()[1..],
//!         &[false],
//!         &[1500.0],
//!         &[0.4],
//!     )
//!     .unwrap();
//! assert_eq!(program.texts(), vec!["G28", "G1 X10 Y10 Z0 E0.4 F1500", "M104 S0"]);
//! ```

pub use gcodepath_core::{
    format_decimal, round_to, CodecConfig, CollectingSink, ConfigError, Diagnostic,
    DiagnosticLevel, DiagnosticSink, DirectedSegment, Error, FormatError, GeometryError,
    LineSegment, ParseError, Point3, Point3D, Precision, Result, TracingSink, ZeroPolicy,
};

pub use gcodepath_parser::{
    distance, AxisValue, DecodedToolpath, FillState, Line, PathAggregate, Segment,
    ToolpathDecoder,
};

pub use gcodepath_camtools::{
    DiagnosticSinkHandle, EncodedProgram, SettingsBlock, ToolpathEncoder, ToolpathMove,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that switches log output to JSON lines
pub const LOG_FORMAT_ENV: &str = "GCODEPATH_LOG_FORMAT";

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so generated G-code and JSON on stdout stay clean
/// - RUST_LOG environment variable support
/// - JSON lines when `GCODEPATH_LOG_FORMAT=json`
///
/// Calling this more than once leaves the first subscriber in place.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .json();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }

    Ok(())
}
