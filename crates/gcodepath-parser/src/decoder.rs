//! G-code to segment decoding
//!
//! Turns a program into directed 3D segments between consecutive resolved
//! points. A motion command's feedrate and extrusion describe the move that
//! arrives at its coordinates, so each segment takes its attributes from its
//! trailing endpoint.

use crate::aggregate::PathAggregate;
use gcodepath_core::{CodecConfig, LineSegment, Result};
use serde::{Deserialize, Serialize};

/// One decoded move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Geometry of the move
    pub line: LineSegment,
    /// No material is deposited along this move
    pub is_travel: bool,
    /// Feedrate of the trailing endpoint (mm/min)
    pub feedrate: f64,
    /// Extrusion delta of the trailing endpoint
    pub extrusion: f64,
    /// Index of the trailing endpoint's line in the source program
    pub source_index: usize,
}

impl Segment {
    pub fn is_extruding(&self) -> bool {
        !self.is_travel
    }
}

/// Ordered segments produced by [`ToolpathDecoder`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedToolpath {
    pub segments: Vec<Segment>,
}

impl DecodedToolpath {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn lines(&self) -> Vec<LineSegment> {
        self.segments.iter().map(|s| s.line).collect()
    }

    pub fn travel_flags(&self) -> Vec<bool> {
        self.segments.iter().map(|s| s.is_travel).collect()
    }

    pub fn feedrates(&self) -> Vec<f64> {
        self.segments.iter().map(|s| s.feedrate).collect()
    }

    pub fn extrusions(&self) -> Vec<f64> {
        self.segments.iter().map(|s| s.extrusion).collect()
    }

    pub fn source_indices(&self) -> Vec<usize> {
        self.segments.iter().map(|s| s.source_index).collect()
    }

    /// Sum of extrusion deltas over extruding segments
    pub fn total_extrusion(&self) -> f64 {
        self.extrusion_segments().map(|s| s.extrusion).sum()
    }

    pub fn extrusion_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| !s.is_travel)
    }

    pub fn travel_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_travel)
    }
}

impl<'a> IntoIterator for &'a DecodedToolpath {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Decoder pipeline from G-code text to segments
#[derive(Debug, Clone, Default)]
pub struct ToolpathDecoder {
    config: CodecConfig,
}

impl ToolpathDecoder {
    /// Create a decoder for the default dialect
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Parse, aggregate and decode raw G-code lines
    ///
    /// A malformed numeric word aborts decoding with a parse error.
    pub fn decode<S: AsRef<str>>(&self, lines: &[S]) -> Result<DecodedToolpath> {
        let aggregate = PathAggregate::from_text_with_config(lines, &self.config)?;
        Ok(self.decode_aggregate(&aggregate))
    }

    /// Decode a whole program held in one string
    pub fn decode_program(&self, program: &str) -> Result<DecodedToolpath> {
        let aggregate = PathAggregate::from_program(program, &self.config)?;
        Ok(self.decode_aggregate(&aggregate))
    }

    /// Decode an already aggregated program
    ///
    /// Produces one segment per adjacent pair of point-complete lines, so `k`
    /// points yield `k - 1` segments (none when fewer than two).
    pub fn decode_aggregate(&self, aggregate: &PathAggregate) -> DecodedToolpath {
        let kept: Vec<_> = aggregate
            .point_lines()
            .filter_map(|line| line.point().map(|point| (point, line)))
            .collect();

        let segments: Vec<Segment> = kept
            .windows(2)
            .map(|pair| {
                let (start, _) = pair[0];
                let (end, trailing) = pair[1];
                Segment {
                    line: LineSegment::new(start, end),
                    is_travel: !trailing.is_extruding(),
                    feedrate: trailing.f().value(),
                    extrusion: trailing.extrusion(),
                    source_index: trailing.index().unwrap_or_default(),
                }
            })
            .collect();

        tracing::debug!(
            "Decoded {} segments from {} points ({} source lines)",
            segments.len(),
            kept.len(),
            aggregate.len()
        );

        DecodedToolpath { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcodepath_core::Point3D;

    #[test]
    fn test_segments_take_trailing_attributes() {
        let decoded = ToolpathDecoder::new()
            .decode(&["G1 X0 Y0 Z0", "G1 X10 Y0", "G1 X10 Y10 E1.0"])
            .unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.travel_flags(), vec![true, false]);
        assert_eq!(decoded.extrusions(), vec![0.0, 1.0]);
        assert_eq!(decoded.source_indices(), vec![1, 2]);
        assert_eq!(
            decoded.segments[1].line,
            LineSegment::new(Point3D::new(10.0, 0.0, 0.0), Point3D::new(10.0, 10.0, 0.0))
        );
    }

    #[test]
    fn test_feedrate_comes_from_trailing_point() {
        let decoded = ToolpathDecoder::new()
            .decode(&["G1 X0 Y0 Z0.2 F3000", "G1 X5 F1200 E0.3", "G1 X9 E0.2"])
            .unwrap();
        assert_eq!(decoded.feedrates(), vec![1200.0, 1200.0]);
        assert!((decoded.total_extrusion() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_point_lines_are_skipped_but_indexed() {
        let decoded = ToolpathDecoder::new()
            .decode(&[
                "G28",
                "G1 X1 Y1 Z1",
                "M106 S255",
                "G1 E-2 F2400",
                "G1 X2 Y1",
            ])
            .unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.source_indices(), vec![4]);
        assert_eq!(decoded.feedrates(), vec![2400.0]);
        assert!(decoded.segments[0].is_travel);
    }

    #[test]
    fn test_fewer_than_two_points_yields_nothing() {
        let decoder = ToolpathDecoder::new();
        assert!(decoder.decode::<&str>(&[]).unwrap().is_empty());
        assert!(decoder.decode(&["G28", "G1 X1 Y1 Z1"]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_aborts() {
        let err = ToolpathDecoder::new()
            .decode(&["G1 X0 Y0 Z0", "G1 X?? Y1"])
            .unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_travel_and_extrusion_filters() {
        let decoded = ToolpathDecoder::new()
            .decode_program("G1 X0 Y0 Z0\nG1 X1 E0.1\nG1 X2\nG1 X3 E0.1\n")
            .unwrap();
        assert_eq!(decoded.extrusion_segments().count(), 2);
        assert_eq!(decoded.travel_segments().count(), 1);
        assert_eq!(decoded.lines().len(), 3);
    }
}
