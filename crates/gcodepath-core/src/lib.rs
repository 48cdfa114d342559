//! # GCodePath Core
//!
//! Core types, traits, and utilities for GCodePath.
//! Provides the error taxonomy, the geometry interfaces the codec needs
//! from a host, codec configuration, and the diagnostic sink.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod numeric;

pub use config::{CodecConfig, Precision, ZeroPolicy};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticLevel, DiagnosticSink, TracingSink};
pub use error::{
    ConfigError, ConfigResult, Error, FormatError, GeometryError, ParseError, Result,
};
pub use geometry::{DirectedSegment, LineSegment, Point3, Point3D};
pub use numeric::{format_decimal, round_to};
