//! Toolpath to G-code generation
//!
//! Builds a complete program from a settings list and a sequence of
//! directed segments with motion attributes: the settings preamble, one
//! motion line per segment, then the settings postamble.

use crate::settings_block::SettingsBlock;
use gcodepath_core::{
    CodecConfig, DiagnosticSink, DirectedSegment, LineSegment, Point3, Point3D, Result,
    TracingSink,
};
use gcodepath_parser::{Line, Segment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handle to a diagnostic sink
pub type DiagnosticSinkHandle = Arc<dyn DiagnosticSink>;

/// One move to generate, as a single record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolpathMove {
    pub segment: LineSegment,
    #[serde(default)]
    pub is_travel: bool,
    pub feedrate: f64,
    #[serde(default)]
    pub extrusion: f64,
}

impl ToolpathMove {
    pub fn new(segment: LineSegment, is_travel: bool, feedrate: f64, extrusion: f64) -> Self {
        Self {
            segment,
            is_travel,
            feedrate,
            extrusion,
        }
    }
}

impl From<Segment> for ToolpathMove {
    fn from(segment: Segment) -> Self {
        Self::new(
            segment.line,
            segment.is_travel,
            segment.feedrate,
            segment.extrusion,
        )
    }
}

/// Generated program: preamble, motion and postamble lines in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedProgram {
    lines: Vec<Line>,
    preamble_len: usize,
    motion_len: usize,
}

impl EncodedProgram {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    /// Raw text of every line
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(Line::to_gcode).collect()
    }

    /// Whole program, one command per line
    pub fn to_text(&self) -> String {
        self.texts().join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn preamble(&self) -> &[Line] {
        &self.lines[..self.preamble_len]
    }

    pub fn motion(&self) -> &[Line] {
        &self.lines[self.preamble_len..self.preamble_len + self.motion_len]
    }

    pub fn postamble(&self) -> &[Line] {
        &self.lines[self.preamble_len + self.motion_len..]
    }
}

/// Encoder pipeline from segments to G-code
#[derive(Clone)]
pub struct ToolpathEncoder {
    config: CodecConfig,
    sink: DiagnosticSinkHandle,
}

impl Default for ToolpathEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolpathEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolpathEncoder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ToolpathEncoder {
    /// Create an encoder for the default dialect that logs warnings
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            sink: Arc::new(TracingSink),
        }
    }

    /// Route non-fatal warnings to `sink`
    pub fn with_sink(mut self, sink: DiagnosticSinkHandle) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Generate a program from parallel motion lists
    ///
    /// `segments`, `is_travel`, `feedrates` and `extrusions` describe the
    /// same moves index by index. Any length mismatch is reported to the
    /// sink. A `feedrates` list shorter than `segments` is then padded with
    /// its first value; other lists truncate the motion block to the
    /// shortest one.
    pub fn encode<T, S>(
        &self,
        settings: &[T],
        segments: &[S],
        is_travel: &[bool],
        feedrates: &[f64],
        extrusions: &[f64],
    ) -> Result<EncodedProgram>
    where
        T: AsRef<str>,
        S: DirectedSegment,
    {
        let block = SettingsBlock::parse(settings, &self.config, self.sink.as_ref())?;

        let n = segments.len();
        let feedrate_mismatch = !feedrates.is_empty() && feedrates.len() != n;
        if is_travel.len() != n || extrusions.len() != n || feedrate_mismatch {
            self.sink.warn(&format!(
                "paths ({}), travel flags ({}), feedrates ({}) and extrusions ({}) do not have matching counts",
                n,
                is_travel.len(),
                feedrates.len(),
                extrusions.len()
            ));
        }

        let feedrates = self.broadcast_feedrates(feedrates, n);

        let count = n
            .min(is_travel.len())
            .min(feedrates.len())
            .min(extrusions.len());

        let moves: Vec<ToolpathMove> = (0..count)
            .map(|i| {
                let segment = LineSegment::new(
                    segments[i].start().to_point3d(),
                    segments[i].end().to_point3d(),
                );
                ToolpathMove::new(segment, is_travel[i], feedrates[i], extrusions[i])
            })
            .collect();

        let motion = self.motion_lines(&moves);
        Ok(self.assemble(block, motion))
    }

    /// Generate a program from move records
    pub fn encode_moves<T: AsRef<str>>(
        &self,
        settings: &[T],
        moves: &[ToolpathMove],
    ) -> Result<EncodedProgram> {
        let block = SettingsBlock::parse(settings, &self.config, self.sink.as_ref())?;
        let motion = self.motion_lines(moves);
        Ok(self.assemble(block, motion))
    }

    /// One motion line per move
    ///
    /// NaN and infinite values cannot be written as G-code words; they are
    /// reported to the sink and written as `0`.
    fn motion_lines(&self, moves: &[ToolpathMove]) -> Vec<Line> {
        moves
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let end = m.segment.end;
                let end = Point3D::new(
                    self.finite(i, 'X', end.x),
                    self.finite(i, 'Y', end.y),
                    self.finite(i, 'Z', end.z),
                );
                let extrusion = if m.is_travel {
                    0.0
                } else {
                    self.finite(i, 'E', m.extrusion)
                };
                Line::from_segment_with(
                    &LineSegment::new(m.segment.start, end),
                    self.finite(i, 'F', m.feedrate),
                    extrusion,
                    m.is_travel,
                    &self.config,
                )
            })
            .collect()
    }

    fn finite(&self, index: usize, field: char, value: f64) -> f64 {
        if value.is_finite() {
            return value;
        }
        self.sink.warn(&format!(
            "Move {}: {} value {} is not finite; writing 0",
            index, field, value
        ));
        0.0
    }

    /// Pad a short feedrate list with its first value
    fn broadcast_feedrates(&self, feedrates: &[f64], count: usize) -> Vec<f64> {
        let mut padded = feedrates.to_vec();
        match feedrates.first() {
            Some(&first) if padded.len() < count => {
                tracing::debug!(
                    "Broadcasting feedrate {} to {} missing entries",
                    first,
                    count - padded.len()
                );
                padded.resize(count, first);
            }
            None if count > 0 => {
                self.sink
                    .warn("No feedrates supplied; no motion lines were generated");
            }
            _ => {}
        }
        padded
    }

    fn assemble(&self, block: SettingsBlock, motion: Vec<Line>) -> EncodedProgram {
        let (preamble, postamble) = block.into_parts();
        let preamble_len = preamble.len();
        let motion_len = motion.len();

        let mut lines = preamble;
        lines.reserve(motion_len + postamble.len());
        lines.extend(motion);
        lines.extend(postamble);

        tracing::debug!(
            "Generated {} lines ({} motion)",
            lines.len(),
            motion_len
        );

        EncodedProgram {
            lines,
            preamble_len,
            motion_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcodepath_core::{CollectingSink, Precision};
    use gcodepath_parser::ToolpathDecoder;

    fn seg(from: (f64, f64, f64), to: (f64, f64, f64)) -> LineSegment {
        LineSegment::new(from.into(), to.into())
    }

    fn encoder_with_sink() -> (ToolpathEncoder, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let encoder = ToolpathEncoder::new().with_sink(sink.clone());
        (encoder, sink)
    }

    #[test]
    fn test_encode_single_segment() {
        let (encoder, sink) = encoder_with_sink();
        let program = encoder
            .encode(
                &["::START::", "G28", "::END::", "M104 S0"],
                &[seg((0.0, 0.0, 0.0), (10.0, 0.0, 0.0))],
                &[false],
                &[1500.0],
                &[0.4],
            )
            .unwrap();

        assert_eq!(
            program.texts(),
            vec!["G28", "G1 X10 Y0 Z0 E0.4 F1500", "M104 S0"]
        );
        assert_eq!(program.preamble().len(), 1);
        assert_eq!(program.motion().len(), 1);
        assert_eq!(program.postamble().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_start_sentinel_emits_nothing() {
        let (encoder, _sink) = encoder_with_sink();
        let result = encoder.encode(
            &["G28", "::END::"],
            &[seg((0.0, 0.0, 0.0), (1.0, 1.0, 1.0))],
            &[false],
            &[1500.0],
            &[0.4],
        );
        assert!(result.unwrap_err().is_format_error());
    }

    #[test]
    fn test_single_feedrate_is_broadcast() {
        let (encoder, sink) = encoder_with_sink();
        let segments = [
            seg((0.0, 0.0, 0.2), (5.0, 0.0, 0.2)),
            seg((5.0, 0.0, 0.2), (5.0, 5.0, 0.2)),
            seg((5.0, 5.0, 0.2), (0.0, 5.0, 0.2)),
        ];
        let program = encoder
            .encode(
                &["::START::", "::END::"],
                &segments,
                &[true, false, false],
                &[2400.0],
                &[0.0, 0.2, 0.2],
            )
            .unwrap();

        assert_eq!(
            program.texts(),
            vec![
                "G1 X5 Y0 Z0.2 E0 F2400",
                "G1 X5 Y5 Z0.2 E0.2 F2400",
                "G1 X0 Y5 Z0.2 E0.2 F2400",
            ]
        );
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_short_feedrate_list_warns_once() {
        let (encoder, sink) = encoder_with_sink();
        let program = encoder
            .encode(
                &["::START::", "::END::"],
                &[
                    seg((0.0, 0.0, 0.0), (1.0, 0.0, 0.0)),
                    seg((1.0, 0.0, 0.0), (2.0, 0.0, 0.0)),
                ],
                &[false, false],
                &[1500.0],
                &[0.1, 0.1],
            )
            .unwrap();

        assert_eq!(program.motion().len(), 2);
        assert_eq!(program.motion()[1].f().value(), 1500.0);
        let warnings = sink.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("feedrates (1)"));
    }

    #[test]
    fn test_non_finite_values_are_reported_and_zeroed() {
        let (encoder, sink) = encoder_with_sink();
        let program = encoder
            .encode(
                &["::START::", "::END::"],
                &[seg((0.0, 0.0, 0.0), (1.0, f64::INFINITY, 1.0))],
                &[false],
                &[f64::NAN],
                &[0.1],
            )
            .unwrap();

        assert_eq!(program.texts(), vec!["G1 X1 Y0 Z1 E0.1 F0"]);
        assert_eq!(sink.warnings().len(), 2);

        let decoded = ToolpathDecoder::new()
            .decode(&["G1 X0 Y0 Z0"].into_iter().chain(program.texts()).collect::<Vec<_>>())
            .unwrap();
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn test_travel_ignores_non_finite_extrusion() {
        let (encoder, sink) = encoder_with_sink();
        let program = encoder
            .encode_moves(
                &["::START::", "::END::"],
                &[ToolpathMove::new(
                    seg((0.0, 0.0, 0.0), (2.0, 2.0, 2.0)),
                    true,
                    6000.0,
                    f64::NAN,
                )],
            )
            .unwrap();
        assert_eq!(program.texts(), vec!["G1 X2 Y2 Z2 E0 F6000"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_length_mismatch_warns_and_truncates() {
        let (encoder, sink) = encoder_with_sink();
        let segments = [
            seg((0.0, 0.0, 0.0), (1.0, 0.0, 0.0)),
            seg((1.0, 0.0, 0.0), (2.0, 0.0, 0.0)),
            seg((2.0, 0.0, 0.0), (3.0, 0.0, 0.0)),
        ];
        let program = encoder
            .encode(
                &["::START::", "::END::"],
                &segments,
                &[false, false],
                &[1000.0, 1000.0, 1000.0],
                &[0.1, 0.1, 0.1],
            )
            .unwrap();

        assert_eq!(program.motion().len(), 2);
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_empty_feedrates_warn() {
        let (encoder, sink) = encoder_with_sink();
        let program = encoder
            .encode(
                &["::START::", "G28", "::END::"],
                &[seg((0.0, 0.0, 0.0), (1.0, 0.0, 0.0))],
                &[false],
                &[],
                &[0.1],
            )
            .unwrap();
        assert_eq!(program.texts(), vec!["G28"]);
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_no_segments() {
        let (encoder, sink) = encoder_with_sink();
        let program = encoder
            .encode::<_, LineSegment>(&["::START::", "G28", "::END::", "M84"], &[], &[], &[], &[])
            .unwrap();
        assert_eq!(program.to_text(), "G28\nM84");
        assert!(program.motion().is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_encode_moves_matches_parallel_lists() {
        let encoder = ToolpathEncoder::new();
        let segment = seg((0.0, 0.0, 0.0), (1.5, 2.25, 0.3));
        let settings = ["::START::", "::END::"];

        let from_lists = encoder
            .encode(&settings, &[segment], &[false], &[900.0], &[0.05])
            .unwrap();
        let from_moves = encoder
            .encode_moves(&settings, &[ToolpathMove::new(segment, false, 900.0, 0.05)])
            .unwrap();
        assert_eq!(from_lists, from_moves);
    }

    #[test]
    fn test_custom_precision() {
        let config = CodecConfig::default().with_precision(Precision {
            coordinate: 1,
            feedrate: 1,
            extrusion: 2,
        });
        let encoder = ToolpathEncoder::with_config(config);
        let program = encoder
            .encode_moves(
                &["::START::", "::END::"],
                &[ToolpathMove::new(
                    LineSegment::new(Point3D::default(), Point3D::new(1.26, 0.04, 2.0)),
                    false,
                    1234.56,
                    0.123,
                )],
            )
            .unwrap();
        assert_eq!(program.texts(), vec!["G1 X1.3 Y0 Z2 E0.12 F1234.6"]);
    }

    #[test]
    fn test_move_from_decoded_segment() {
        let segment = Segment {
            line: seg((0.0, 0.0, 0.0), (1.0, 1.0, 0.0)),
            is_travel: true,
            feedrate: 3000.0,
            extrusion: 0.0,
            source_index: 3,
        };
        let mv = ToolpathMove::from(segment);
        assert!(mv.is_travel);
        assert_eq!(mv.feedrate, 3000.0);
        assert_eq!(mv.segment, segment.line);
    }
}
