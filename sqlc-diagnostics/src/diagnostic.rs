use std::fmt;
use std::path::{Path, PathBuf};

use crate::span::Span;

/// How serious a [`Diagnostic`] is.
///
/// Errors never prevent the rest of a file from being analyzed (see
/// `sqlc-diagnostics` crate docs for the propagation discipline the analyzer
/// follows), but a compilation that produced any `Error` diagnostic must be
/// reported to the caller as failed.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// A non-fatal informational note, usually attached to another diagnostic.
    Note,
    /// A suspicious but legal construct (e.g. integer division of two
    /// integer columns, or a deprecated built-in function).
    Warning,
    /// A construct that could not be fully analyzed; the surrounding
    /// statement is still recorded where salvageable.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A single diagnostic produced while compiling one file.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// How serious this diagnostic is.
    pub severity: Severity,
    /// Human-readable message text, already fully formatted (no further
    /// interpolation is performed by a reporter).
    pub message: String,
    /// The byte range in `file` that the diagnostic concerns.
    pub span: Span,
    /// The source file the diagnostic was produced in.
    pub file: PathBuf,
}

impl Diagnostic {
    /// Constructs an error-severity diagnostic.
    pub fn error(file: impl Into<PathBuf>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            file: file.into(),
        }
    }

    /// Constructs a warning-severity diagnostic.
    pub fn warning(file: impl Into<PathBuf>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
            file: file.into(),
        }
    }

    /// Constructs a note-severity diagnostic.
    pub fn note(file: impl Into<PathBuf>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
            span,
            file: file.into(),
        }
    }

    /// Renders `path:line:col: severity: message`, resolving the span
    /// against `source` (the full text of `self.file`).
    ///
    /// This is the "human" reporter format from the external CLI surface;
    /// colorization is the CLI's concern, not the compiler's.
    pub fn render_human(&self, source: &str) -> String {
        let lc = self.span.start_line_col(source);
        format!(
            "{}:{}: {}: {}",
            self.file.display(),
            lc,
            self.severity,
            self.message
        )
    }

    /// Renders the single-line editor-friendly format
    /// `path:line:col:{error|warning}: message`. Notes are rendered with
    /// severity `warning`, matching the two-bucket severity editors expect.
    pub fn render_editor(&self, source: &str) -> String {
        let lc = self.span.start_line_col(source);
        let bucket = match self.severity {
            Severity::Error => "error",
            Severity::Warning | Severity::Note => "warning",
        };
        format!(
            "{}:{}:{}:{}: {}",
            self.file.display(),
            lc.line,
            lc.column,
            bucket,
            self.message
        )
    }
}

/// Sorts diagnostics by `(file_index, span.start)`, matching the ordering
/// guarantee of the driver: diagnostics are reported in source order within
/// a file and in file order across files.
pub fn sort_stable(diagnostics: &mut [Diagnostic], file_order: impl Fn(&Path) -> usize) {
    diagnostics.sort_by_key(|d| (file_order(&d.file), d.span.start));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_rendering() {
        let d = Diagnostic::error("foo.sql", Span::new(7, 9), "column 'id' does not exist");
        assert_eq!(
            d.render_human("select id from bar"),
            "foo.sql:1:8: error: column 'id' does not exist"
        );
    }

    #[test]
    fn editor_rendering_downgrades_note_to_warning_bucket() {
        let d = Diagnostic::note("foo.sql", Span::new(0, 1), "see also");
        assert_eq!(d.render_editor("x"), "foo.sql:1:1:warning: see also");
    }

    #[test]
    fn sort_is_file_then_position() {
        let mut diags = vec![
            Diagnostic::error("b.sql", Span::new(10, 11), "x"),
            Diagnostic::error("a.sql", Span::new(5, 6), "y"),
            Diagnostic::error("a.sql", Span::new(1, 2), "z"),
        ];
        let order = |p: &Path| match p.to_str().unwrap() {
            "a.sql" => 0,
            "b.sql" => 1,
            _ => usize::MAX,
        };
        sort_stable(&mut diags, order);
        let msgs: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs, vec!["z", "y", "x"]);
    }
}
