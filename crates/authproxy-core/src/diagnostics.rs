//! Diagnostics sink.
//!
//! Each operation accumulates zero or more records and hands them back to the
//! caller together with the resulting descriptor. Records are only appended,
//! never replaced, so a late failure is reported next to the one that caused
//! the operation to stop.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ReconcileError};

/// Severity of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One structured error or warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// Set when the record was produced from a [`ReconcileError`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            kind: None,
        }
    }

    #[must_use]
    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            kind: None,
        }
    }

    /// Builds an error record from a reconcile error.
    #[must_use]
    pub fn from_error(summary: impl Into<String>, err: &ReconcileError) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: err.to_string(),
            kind: Some(err.kind()),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.summary, self.detail)
    }
}

/// Ordered collection of diagnostic records for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.records.push(diagnostic);
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::error(summary, detail));
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::warning(summary, detail));
    }

    /// Records `err` as an error under `summary`.
    pub fn add_reconcile_error(&mut self, summary: impl Into<String>, err: &ReconcileError) {
        self.push(Diagnostic::from_error(summary, err));
    }

    /// Appends every record of `other`, keeping order.
    pub fn append(&mut self, other: Diagnostics) {
        self.records.extend(other.records);
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.records.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| !d.is_error())
    }

    /// Returns `true` if any error record carries `kind`.
    #[must_use]
    pub fn contains_kind(&self, kind: ErrorKind) -> bool {
        self.records.iter().any(|d| d.kind == Some(kind))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Result of one reconciler operation: the descriptor it ended with plus the
/// diagnostics it produced along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied<T> {
    pub state: T,
    pub diagnostics: Diagnostics,
}

impl<T> Applied<T> {
    #[must_use]
    pub fn new(state: T, diagnostics: Diagnostics) -> Self {
        Self { state, diagnostics }
    }

    /// `true` when no error record was produced.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.diagnostics.has_error()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Applied<U> {
        Applied {
            state: f(self.state),
            diagnostics: self.diagnostics,
        }
    }
}
