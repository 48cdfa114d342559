//! Diagnostic sink interface
//!
//! Pipelines report non-fatal validation problems (mismatched list lengths,
//! a missing end sentinel) to a host-provided sink instead of aborting.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A non-fatal message raised while running a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Receiver for non-fatal pipeline diagnostics
///
/// Implement this trait to surface warnings in a host application.
/// Reporting never halts the pipeline that raised the diagnostic.
pub trait DiagnosticSink: Send + Sync {
    /// Called for every diagnostic a pipeline raises
    fn report(&self, diagnostic: Diagnostic);

    /// Report a warning
    fn warn(&self, message: &str) {
        self.report(Diagnostic::warning(message));
    }
}

/// Sink that forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Info => tracing::info!("{}", diagnostic.message),
            DiagnosticLevel::Warning => tracing::warn!("{}", diagnostic.message),
        }
    }
}

/// Sink that stores every diagnostic for later inspection
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Messages of all warnings reported so far
    pub fn warnings(&self) -> Vec<String> {
        self.diagnostics
            .lock()
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
            .map(|d| d.message.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().is_empty()
    }

    pub fn clear(&self) {
        self.diagnostics.lock().clear();
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::trace!("Collected diagnostic: {}", diagnostic);
        self.diagnostics.lock().push(diagnostic);
    }
}
