//! Path aggregation with sticky coordinates
//!
//! G-code omits any axis that did not change since the last command. The
//! aggregation pass folds a [`FillState`] over the program so that every
//! line ends up with absolute X, Y, Z and F values.

use crate::line::{distance, AxisValue, Line};
use gcodepath_core::{CodecConfig, ParseError, Point3D, ZeroPolicy};
use serde::{Deserialize, Serialize};

/// Running values carried between lines during aggregation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillState {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub f: Option<f64>,
    pub policy: ZeroPolicy,
}

impl FillState {
    /// Empty state: no axis established yet
    pub fn new(policy: ZeroPolicy) -> Self {
        Self {
            x: None,
            y: None,
            z: None,
            f: None,
            policy,
        }
    }

    /// Resolve one line against the running state
    ///
    /// Returns the updated state and the resolved copy of `line`. Coordinates
    /// are only resolved on lines that carry coordinate words; the feedrate is
    /// resolved on every line.
    pub fn apply(self, line: &Line) -> (FillState, Line) {
        let mut next = self;
        let mut resolved = line.clone();

        if line.has_coord {
            (next.x, resolved.x) = self.resolve_axis(self.x, line.x);
            (next.y, resolved.y) = self.resolve_axis(self.y, line.y);
            (next.z, resolved.z) = self.resolve_axis(self.z, line.z);

            let resolvable =
                resolved.x.is_resolved() && resolved.y.is_resolved() && resolved.z.is_resolved();
            let point_complete = match self.policy {
                ZeroPolicy::Presence => resolvable,
                ZeroPolicy::ZeroAsAbsent => {
                    resolvable
                        && resolved.x.value() != 0.0
                        && resolved.y.value() != 0.0
                        && resolved.z.value() != 0.0
                }
            };
            resolved.has_point = line.has_point || point_complete;
        }

        (next.f, resolved.f) = self.resolve_axis(self.f, line.f);

        (next, resolved)
    }

    fn resolve_axis(&self, current: Option<f64>, axis: AxisValue) -> (Option<f64>, AxisValue) {
        match axis {
            AxisValue::Explicit(v) if self.adopts(v) => (Some(v), AxisValue::Explicit(v)),
            _ => match current {
                Some(c) => (current, AxisValue::Carried(c)),
                None => (current, axis),
            },
        }
    }

    fn adopts(&self, value: f64) -> bool {
        match self.policy {
            ZeroPolicy::Presence => true,
            ZeroPolicy::ZeroAsAbsent => value != 0.0,
        }
    }
}

/// An ordered, fully resolved toolpath program
///
/// Construction runs the aggregation pass once; afterwards the aggregate is
/// read-only. Every line's index equals its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathAggregate {
    lines: Vec<Line>,
    policy: ZeroPolicy,
}

impl PathAggregate {
    /// Aggregate already parsed lines with the default zero policy
    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self::from_lines_with_policy(lines, ZeroPolicy::default())
    }

    /// Aggregate already parsed lines
    pub fn from_lines_with_policy(lines: Vec<Line>, policy: ZeroPolicy) -> Self {
        let lines = fill(lines, policy);
        tracing::debug!(
            "Aggregated {} lines ({} with points)",
            lines.len(),
            lines.iter().filter(|l| l.has_point).count()
        );
        Self { lines, policy }
    }

    /// Parse and aggregate raw text lines with the default dialect
    pub fn from_text<S: AsRef<str>>(texts: &[S]) -> Result<Self, ParseError> {
        Self::from_text_with_config(texts, &CodecConfig::default())
    }

    /// Parse and aggregate raw text lines
    ///
    /// Fails on the first malformed numeric word; the error carries the
    /// zero-based line number.
    pub fn from_text_with_config<S: AsRef<str>>(
        texts: &[S],
        config: &CodecConfig,
    ) -> Result<Self, ParseError> {
        let lines = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Line::parse_with(text.as_ref(), config).map_err(|e| e.at_line(i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_lines_with_policy(lines, config.zero_policy))
    }

    /// Parse and aggregate a whole program held in one string
    pub fn from_program(program: &str, config: &CodecConfig) -> Result<Self, ParseError> {
        let texts: Vec<&str> = program.lines().collect();
        Self::from_text_with_config(&texts, config)
    }

    /// Run the aggregation pass again over the resolved lines
    ///
    /// The pass is idempotent, so the result equals `self`.
    pub fn refill(&self) -> Self {
        Self::from_lines_with_policy(self.lines.clone(), self.policy)
    }

    pub fn policy(&self) -> ZeroPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Lines that have a resolved point, in order
    pub fn point_lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|l| l.has_point)
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    /// Source text of every line
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.x.value()).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.y.value()).collect()
    }

    pub fn zs(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.z.value()).collect()
    }

    pub fn feedrates(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.f.value()).collect()
    }

    /// Extrusion deltas, `0.0` where a line has no E word
    pub fn extrusions(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.extrusion()).collect()
    }

    pub fn has_coords(&self) -> Vec<bool> {
        self.lines.iter().map(|l| l.has_coord).collect()
    }

    pub fn has_points(&self) -> Vec<bool> {
        self.lines.iter().map(|l| l.has_point).collect()
    }

    pub fn is_extruding(&self) -> Vec<bool> {
        self.lines.iter().map(|l| l.is_extruding).collect()
    }

    /// One entry per line: the point where the line has one, `None` elsewhere
    pub fn points(&self) -> Vec<Option<Point3D>> {
        self.lines.iter().map(Line::point).collect()
    }

    /// Sum of planar distances between consecutive point-complete lines
    pub fn planar_length(&self) -> f64 {
        let points: Vec<&Line> = self.point_lines().collect();
        points
            .windows(2)
            .filter_map(|pair| distance(pair[0], pair[1]).ok())
            .sum()
    }
}

impl<'a> IntoIterator for &'a PathAggregate {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

fn fill(lines: Vec<Line>, policy: ZeroPolicy) -> Vec<Line> {
    let mut state = FillState::new(policy);
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let (next, mut resolved) = state.apply(line);
            state = next;
            resolved.index = Some(index);
            tracing::trace!("Line {}: resolved '{}'", index, resolved.text);
            resolved
        })
        .collect()
}
