//! # GCodePath Parser
//!
//! G-code parsing and decoding for GCodePath:
//! - Line model with tri-state axes and derived predicates
//! - Sticky-coordinate aggregation over a whole program
//! - Decoding into 3D segments annotated with motion attributes

pub mod aggregate;
pub mod decoder;
pub mod line;

pub use aggregate::{FillState, PathAggregate};
pub use decoder::{DecodedToolpath, Segment, ToolpathDecoder};
pub use line::{distance, AxisValue, Line};
