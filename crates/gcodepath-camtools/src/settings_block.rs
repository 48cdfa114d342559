//! Settings block handling
//!
//! A settings list wraps the generated motion with machine setup and
//! teardown commands:
//!
//! ```text
//! ::START::
//! G28          <- preamble
//! M104 S210
//! ::END::
//! M104 S0      <- postamble
//! M84
//! ```
//!
//! Preamble and postamble lines are parsed individually; no coordinate
//! aggregation is applied to them.

use gcodepath_core::{CodecConfig, DiagnosticSink, FormatError, ParseError, Result};
use gcodepath_parser::Line;

/// Preamble and postamble lines split out of a settings list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsBlock {
    preamble: Vec<Line>,
    postamble: Vec<Line>,
    has_end_sentinel: bool,
}

impl SettingsBlock {
    /// Split a settings list into preamble and postamble
    ///
    /// The list must begin with the start sentinel. Lines before the end
    /// sentinel form the preamble, lines after it the postamble; sentinels
    /// themselves are never emitted. A list without an end sentinel is
    /// accepted with a warning and treated as all preamble.
    pub fn parse<S: AsRef<str>>(
        settings: &[S],
        config: &CodecConfig,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self> {
        let first = settings.first().map(|s| s.as_ref().trim());
        if first != Some(config.start_sentinel.as_str()) {
            return Err(FormatError::MissingStartSentinel {
                expected: config.start_sentinel.clone(),
                found: first.map(str::to_string),
            }
            .into());
        }

        let mut block = Self::default();
        for (i, text) in settings.iter().enumerate().skip(1) {
            let text = text.as_ref();
            let marker = text.trim();

            if marker == config.end_sentinel {
                if block.has_end_sentinel {
                    sink.warn(&format!(
                        "Settings line {}: duplicate '{}' ignored",
                        i, config.end_sentinel
                    ));
                }
                block.has_end_sentinel = true;
                continue;
            }
            if marker == config.start_sentinel {
                sink.warn(&format!(
                    "Settings line {}: duplicate '{}' ignored",
                    i, config.start_sentinel
                ));
                continue;
            }

            let line = Line::parse_with(text, config).map_err(|e: ParseError| e.at_line(i))?;
            if block.has_end_sentinel {
                block.postamble.push(line);
            } else {
                block.preamble.push(line);
            }
        }

        if !block.has_end_sentinel {
            sink.warn(&format!(
                "Settings have no '{}' marker; all settings lines are treated as start lines",
                config.end_sentinel
            ));
        }

        tracing::debug!(
            "Settings block: {} start lines, {} end lines",
            block.preamble.len(),
            block.postamble.len()
        );

        Ok(block)
    }

    /// Lines emitted before the motion block
    pub fn preamble(&self) -> &[Line] {
        &self.preamble
    }

    /// Lines emitted after the motion block
    pub fn postamble(&self) -> &[Line] {
        &self.postamble
    }

    pub fn has_end_sentinel(&self) -> bool {
        self.has_end_sentinel
    }

    pub fn into_parts(self) -> (Vec<Line>, Vec<Line>) {
        (self.preamble, self.postamble)
    }
}
