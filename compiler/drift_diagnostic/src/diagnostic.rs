//! Diagnostic type and severity levels.

use std::fmt;

use drift_ir::Span;

/// Severity level for a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Malformed input: a required token was missing, or a statement could
    /// not be parsed. The pipeline keeps going, but the result is suspect.
    Error,
    /// Recoverable oddity: unknown character, undefined variable. The
    /// behavior is well-defined (skip, null) and execution is unaffected.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic message.
///
/// `line` is 1-based; 0 means the position is unknown (runtime diagnostics
/// that have no source location). `span` is the byte range when available.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: u32,
    pub span: Option<Span>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            line: 0,
            span: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            line: 0,
            span: None,
        }
    }

    /// Attach a 1-based line number.
    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// Attach a source span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Whether this diagnostic is an error.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "{} (line {}): {}", self.severity, self.line, self.message)
        } else {
            write!(f, "{}: {}", self.severity, self.message)
        }
    }
}

/// Create an "unexpected token" diagnostic (parser recovery path).
pub fn unexpected_token(span: Span, line: u32, expected: &str, found: &str) -> Diagnostic {
    Diagnostic::error(format!(
        "unexpected token: expected `{expected}`, found `{found}`"
    ))
    .with_line(line)
    .with_span(span)
}

/// Create an "unknown character" diagnostic (lexer skip path).
pub fn unknown_character(span: Span, line: u32, ch: char) -> Diagnostic {
    Diagnostic::warning(format!("unknown character `{ch}`"))
        .with_line(line)
        .with_span(span)
}

/// Create an "undefined variable" diagnostic (lenient evaluation path).
pub fn undefined_variable(name: &str) -> Diagnostic {
    Diagnostic::warning(format!("undefined variable '{name}'"))
}
