use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt;

use crate::compiler::ParseError;

/// A diagnostic message with source location, ready for rendering.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Byte range of the offending source.
    pub span: std::ops::Range<usize>,
    /// Human-readable description of the problem.
    pub message: String,
    /// Optional label shown at the span.
    pub label: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic for the given span.
    pub fn new(span: std::ops::Range<usize>, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            label: None,
        }
    }

    /// Attach a label shown at the span.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Diagnostic::new(err.span.clone(), err.kind.to_string())
    }
}

/// Render a diagnostic using ariadne for pretty terminal output.
pub fn render_diagnostic(source: &str, filename: &str, diagnostic: &Diagnostic) -> String {
    let mut output = Vec::new();

    // Ariadne spans must lie inside the source; clamp degenerate ones.
    let end = diagnostic.span.end.min(source.len());
    let start = diagnostic.span.start.min(end);
    let span = (filename, start..end);

    let mut report = Report::build(ReportKind::Error, span).with_message(&diagnostic.message);

    let label_text = diagnostic.label.as_deref().unwrap_or(&diagnostic.message);
    report = report.with_label(
        Label::new((filename, start..end))
            .with_message(label_text)
            .with_color(Color::Red),
    );

    report
        .finish()
        .write((filename, Source::from(source)), &mut output)
        .ok();

    String::from_utf8(output).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::new(0..5, "duplicate scene id: \"start\"");
        assert_eq!(d.to_string(), "error: duplicate scene id: \"start\"");
    }

    #[test]
    fn render_parse_error() {
        let source = "scene a {\n    title \"T\"\n    \"\"\"\n    Pick.\n    \"\"\"\n    choice \"Go\" -> nowhere\n}\n";
        let err = parse(source).unwrap_err();
        let diag = Diagnostic::from(&err).with_label("not declared anywhere");

        let output = render_diagnostic(source, "test.agf", &diag);
        assert!(!output.is_empty());
        assert!(output.contains("undeclared scene"));
    }
}
