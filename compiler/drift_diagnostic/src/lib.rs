//! Diagnostic system for the Drift runtime.
//!
//! Every pipeline phase reports problems here instead of printing:
//! - the lexer warns about unknown characters it skips
//! - the parser records recoverable syntax errors with line numbers
//! - the evaluator warns about undefined variables in lenient mode
//!
//! Execution never stops because of a queued diagnostic; the queue exists so
//! a host can inspect everything that went sideways after the fact.

mod diagnostic;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{
    undefined_variable, unexpected_token, unknown_character, Diagnostic, Severity,
};
pub use queue::{DiagnosticConfig, DiagnosticQueue};
pub use span_utils::LineOffsetTable;
