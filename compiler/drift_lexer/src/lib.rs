//! Indentation-aware tokenizer for Drift source text.
//!
//! Drift uses layout for block structure: leading whitespace on each line
//! is measured against a running indent stack and surfaced to the parser
//! as explicit `Indent`/`Dedent` tokens, so the grammar never deals with
//! raw whitespace. Line ends become `Newline` tokens, normalized so that
//! the stream never doubles them up.
//!
//! Lexing never fails. Unrecognized characters are skipped with a
//! warning-severity diagnostic, unterminated strings run to end of input,
//! and the returned stream is always well-formed: every `Indent` has a
//! matching `Dedent` and the stream ends with `Newline` (when nonempty)
//! followed by `Eof`.
//!
//! String and identifier text is interned into the shared pool; tokens
//! carry spans, and line numbers for diagnostics come from
//! [`drift_diagnostic::LineOffsetTable`].

mod cursor;
mod keywords;
mod scanner;

use drift_diagnostic::DiagnosticQueue;
use drift_ir::{StringInterner, Token};

/// Tokenize Drift source text.
///
/// Returns the complete token stream; problems found along the way are
/// queued on `diags` rather than aborting the scan.
pub fn tokenize(source: &str, interner: &StringInterner, diags: &mut DiagnosticQueue) -> Vec<Token> {
    scanner::Lexer::new(source, interner, diags).run()
}
