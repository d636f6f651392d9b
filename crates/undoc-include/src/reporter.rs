//! Warning sink passed explicitly through the include pipeline.

use std::fmt;
use std::path::PathBuf;

/// Position of a directive in a source document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Location {
    /// Document containing the directive.
    pub source: PathBuf,
    /// Line of the directive (1-indexed).
    pub line: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source.display(), self.line)
    }
}

/// Receiver for non-fatal warnings.
pub trait Reporter {
    /// Report a warning, optionally tied to a directive location.
    fn warning(&mut self, message: &str, location: Option<&Location>);
}

/// A reported warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Warning text.
    pub message: String,
    /// Where it was reported, if known.
    pub location: Option<Location>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: WARNING: {}", self.message),
            None => write!(f, "WARNING: {}", self.message),
        }
    }
}

/// Reporter that keeps warnings in the order they were reported.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    /// Create an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the reporter and return its warnings.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Reporter for CollectingReporter {
    fn warning(&mut self, message: &str, location: Option<&Location>) {
        self.diagnostics.push(Diagnostic {
            message: message.to_owned(),
            location: location.cloned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let mut reporter = CollectingReporter::new();
        let location = Location {
            source: PathBuf::from("docs/index.rst"),
            line: 7,
        };
        reporter.warning("first", Some(&location));
        reporter.warning("second", None);

        let diagnostics = reporter.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].to_string(), "docs/index.rst:7: WARNING: first");
        assert_eq!(diagnostics[1].to_string(), "WARNING: second");
    }
}
