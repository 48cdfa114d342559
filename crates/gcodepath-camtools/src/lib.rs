//! # GCodePath CAM Tools
//!
//! G-code generation for GCodePath.
//!
//! - **Settings Block**: splits a `::START::` / `::END::` settings list into
//!   the commands emitted before and after the motion block
//! - **Toolpath Encoder**: turns directed segments with feedrate, extrusion
//!   and travel attributes into `G1` motion lines

pub mod encoder;
pub mod settings_block;

pub use encoder::{DiagnosticSinkHandle, EncodedProgram, ToolpathEncoder, ToolpathMove};
pub use settings_block::SettingsBlock;
