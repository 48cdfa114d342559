//! Single G-code line model
//!
//! A [`Line`] is one command of a toolpath program. It is built either by
//! parsing raw text or from a directed segment plus motion attributes when
//! generating G-code. Each coordinate and the feedrate are held as an
//! [`AxisValue`] so that "absent from the line", "written on the line" and
//! "filled in by aggregation" stay distinguishable.

use gcodepath_core::{
    format_decimal, round_to, CodecConfig, DirectedSegment, GeometryError, ParseError, Point3,
    Point3D,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// State of one axis (or the feedrate) on a line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisValue {
    /// Not written on the line and never established earlier in the program
    Absent,
    /// Written on the line
    Explicit(f64),
    /// Filled in from the last known value by aggregation
    Carried(f64),
}

impl AxisValue {
    /// Resolved value; `0.0` when absent
    pub fn value(&self) -> f64 {
        match self {
            Self::Absent => 0.0,
            Self::Explicit(v) | Self::Carried(v) => *v,
        }
    }

    /// The value, if the axis is explicit or carried
    pub fn get(&self) -> Option<f64> {
        match self {
            Self::Absent => None,
            Self::Explicit(v) | Self::Carried(v) => Some(*v),
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }

    /// Explicit or carried
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

impl Default for AxisValue {
    fn default() -> Self {
        Self::Absent
    }
}

/// One toolpath command
///
/// Two lines compare equal when their content matches; the index assigned
/// by a [`crate::PathAggregate`] is not part of equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) text: String,
    pub(crate) command: String,
    pub(crate) comment: String,
    pub(crate) code: String,
    pub(crate) is_motion: bool,
    pub(crate) x: AxisValue,
    pub(crate) y: AxisValue,
    pub(crate) z: AxisValue,
    pub(crate) e: Option<f64>,
    pub(crate) f: AxisValue,
    pub(crate) has_coord: bool,
    pub(crate) has_point: bool,
    pub(crate) is_extruding: bool,
    pub(crate) index: Option<usize>,
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.command == other.command
            && self.comment == other.comment
            && self.code == other.code
            && self.is_motion == other.is_motion
            && self.x == other.x
            && self.y == other.y
            && self.z == other.z
            && self.e == other.e
            && self.f == other.f
            && self.has_coord == other.has_coord
            && self.has_point == other.has_point
            && self.is_extruding == other.is_extruding
    }
}

fn decimal_regex() -> &'static Regex {
    static DECIMAL_REGEX: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    DECIMAL_REGEX.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").expect("invalid regex pattern")
    })
}

/// Parse a signed, optionally fractional decimal literal
fn parse_decimal(field: char, token: &str) -> Result<f64, ParseError> {
    let digits = &token[field.len_utf8()..];
    if !decimal_regex().is_match(digits) {
        return Err(ParseError::new(field, token));
    }
    digits
        .parse::<f64>()
        .map_err(|_| ParseError::new(field, token))
}

impl Line {
    /// Parse one line of G-code using the default dialect
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_with(text, &CodecConfig::default())
    }

    /// Parse one line of G-code
    ///
    /// Only lines whose first token is the configured motion code have their
    /// X, Y, Z, E and F words extracted; any other line keeps its text and
    /// comment but carries no numeric fields. Unknown words are ignored.
    pub fn parse_with(text: &str, config: &CodecConfig) -> Result<Self, ParseError> {
        let (command_part, comment) = match text.split_once(config.comment_delimiter) {
            Some((command, comment)) => (command, comment.trim().to_string()),
            None => (text, String::new()),
        };

        let mut words = command_part.split_whitespace();
        let code = words.next().unwrap_or_default().to_string();
        let is_motion = code == config.motion_code;

        let mut line = Self {
            text: text.to_string(),
            command: command_part.trim().to_string(),
            comment,
            code,
            is_motion,
            x: AxisValue::Absent,
            y: AxisValue::Absent,
            z: AxisValue::Absent,
            e: None,
            f: AxisValue::Absent,
            has_coord: false,
            has_point: false,
            is_extruding: false,
            index: None,
        };

        if is_motion {
            for word in words {
                let Some(field) = word.chars().next() else {
                    continue;
                };
                match field {
                    'X' => line.x = AxisValue::Explicit(parse_decimal(field, word)?),
                    'Y' => line.y = AxisValue::Explicit(parse_decimal(field, word)?),
                    'Z' => line.z = AxisValue::Explicit(parse_decimal(field, word)?),
                    'E' => line.e = Some(parse_decimal(field, word)?),
                    'F' => line.f = AxisValue::Explicit(parse_decimal(field, word)?),
                    _ => {
                        tracing::trace!("Ignoring word '{}' in '{}'", word, text);
                    }
                }
            }
        }

        line.has_coord = line.x.is_explicit() || line.y.is_explicit() || line.z.is_explicit();
        line.has_point = line.x.is_explicit() && line.y.is_explicit() && line.z.is_explicit();
        line.is_extruding = line.e.is_some_and(|e| e != 0.0);

        Ok(line)
    }

    /// Build a motion line from a directed segment using the default dialect
    pub fn from_segment<S: DirectedSegment>(
        segment: &S,
        feedrate: f64,
        extrusion: f64,
        is_travel: bool,
    ) -> Self {
        Self::from_segment_with(segment, feedrate, extrusion, is_travel, &CodecConfig::default())
    }

    /// Build a motion line targeting the segment's end point
    ///
    /// Coordinates, feedrate and extrusion are rounded to the configured
    /// precision. Travel moves always carry `E0`. Non-finite values are
    /// written as given (`FNaN`, `Xinf`) and will not parse back.
    pub fn from_segment_with<S: DirectedSegment>(
        segment: &S,
        feedrate: f64,
        extrusion: f64,
        is_travel: bool,
        config: &CodecConfig,
    ) -> Self {
        let precision = config.precision;
        let end = segment.end();
        let x = round_to(end.x(), precision.coordinate);
        let y = round_to(end.y(), precision.coordinate);
        let z = round_to(end.z(), precision.coordinate);
        let f = round_to(feedrate, precision.feedrate);
        let e = if is_travel {
            0.0
        } else {
            round_to(extrusion, precision.extrusion)
        };

        let text = format!(
            "{} X{} Y{} Z{} E{} F{}",
            config.motion_code,
            format_decimal(x),
            format_decimal(y),
            format_decimal(z),
            format_decimal(e),
            format_decimal(f)
        );

        Self {
            command: text.clone(),
            text,
            comment: String::new(),
            code: config.motion_code.clone(),
            is_motion: true,
            x: AxisValue::Explicit(x),
            y: AxisValue::Explicit(y),
            z: AxisValue::Explicit(z),
            e: Some(e),
            f: AxisValue::Explicit(f),
            has_coord: true,
            has_point: true,
            is_extruding: !is_travel,
            index: None,
        }
    }

    /// Full source text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Command portion of the line, without the comment
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Trailing comment, trimmed; empty when there is none
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// First token of the command portion (e.g. `G1`, `M104`)
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether the first token is the recognised motion code
    pub fn is_motion(&self) -> bool {
        self.is_motion
    }

    pub fn x(&self) -> AxisValue {
        self.x
    }

    pub fn y(&self) -> AxisValue {
        self.y
    }

    pub fn z(&self) -> AxisValue {
        self.z
    }

    /// Feedrate
    pub fn f(&self) -> AxisValue {
        self.f
    }

    /// Extrusion delta, if written on the line
    pub fn e(&self) -> Option<f64> {
        self.e
    }

    /// Extrusion delta, `0.0` when absent
    pub fn extrusion(&self) -> f64 {
        self.e.unwrap_or(0.0)
    }

    /// At least one of X, Y, Z was written on the line
    pub fn has_coord(&self) -> bool {
        self.has_coord
    }

    /// X, Y and Z are all resolvable
    ///
    /// On a freshly parsed line this means all three were written; inside a
    /// [`crate::PathAggregate`] it also counts axes carried from earlier lines.
    pub fn has_point(&self) -> bool {
        self.has_point
    }

    /// Extrusion delta is present and nonzero
    pub fn is_extruding(&self) -> bool {
        self.is_extruding
    }

    /// Position within the owning aggregate; `None` until aggregated
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Resolved point, when the line has one
    pub fn point(&self) -> Option<Point3D> {
        if self.has_point {
            Some(Point3D::new(self.x.value(), self.y.value(), self.z.value()))
        } else {
            None
        }
    }

    /// Raw G-code text for emission
    pub fn to_gcode(&self) -> &str {
        &self.text
    }

    /// Planar distance to another line; see [`distance`]
    pub fn distance_to(&self, other: &Line) -> Result<f64, GeometryError> {
        distance(self, other)
    }
}

impl FromStr for Line {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Euclidean distance between two lines in the XY plane
///
/// Z is excluded so layer changes do not contribute to in-layer path length.
/// Both lines must have a point.
pub fn distance(a: &Line, b: &Line) -> Result<f64, GeometryError> {
    for line in [a, b] {
        if !line.has_point {
            return Err(GeometryError::MissingCoordinates { index: line.index });
        }
    }
    let dx = a.x.value() - b.x.value();
    let dy = a.y.value() - b.y.value();
    Ok((dx * dx + dy * dy).sqrt())
}
