//! Recursive descent parser for Drift.
//!
//! Consumes the token stream produced by `drift_lexer` and builds the tree
//! in `drift_ir::ast`. Parsing never fails: where a required token is
//! missing the parser queues an error diagnostic, consumes the offending
//! token, and keeps going; a token that cannot start an expression becomes
//! a null literal node. The result is always a complete `Program`, suspect
//! only where diagnostics say so.
//!
//! Layout is explicit in the token stream (`Newline`/`Indent`/`Dedent`),
//! so blocks are parsed as plain token sequences with no whitespace logic
//! here.

mod cursor;
mod grammar;


use drift_diagnostic::{unexpected_token, DiagnosticQueue, LineOffsetTable};
use drift_ir::{Name, Program, Span, StringInterner, Token, TokenKind};
use tracing::debug;

use cursor::Cursor;

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
    line_table: &'a LineOffsetTable,
    diags: &'a mut DiagnosticQueue,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: &'a [Token],
        interner: &'a StringInterner,
        line_table: &'a LineOffsetTable,
        diags: &'a mut DiagnosticQueue,
    ) -> Parser<'a> {
        Parser {
            cursor: Cursor::new(tokens),
            interner,
            line_table,
            diags,
        }
    }

    // Cursor delegation.

    #[inline]
    fn current(&self) -> Token {
        self.cursor.current()
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current().kind
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current().span
    }

    #[inline]
    fn peek_kind(&self) -> TokenKind {
        self.cursor.peek().kind
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn advance(&mut self) {
        self.cursor.advance();
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    #[inline]
    fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Consume the current token if it matches.
    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a specific token. On mismatch, report and consume the
    /// offending token anyway, per the single-token-skip recovery policy.
    fn expect(&mut self, kind: TokenKind) {
        if !self.check(kind) {
            self.report_unexpected(kind.display_name());
        }
        self.advance();
    }

    /// Require an identifier and return its name. On mismatch, report,
    /// consume, and substitute the empty name.
    fn expect_ident(&mut self) -> Name {
        let name = if let TokenKind::Ident(name) = self.current_kind() {
            name
        } else {
            self.report_unexpected("identifier");
            Name::EMPTY
        };
        self.advance();
        name
    }

    fn report_unexpected(&mut self, expected: &str) {
        let token = self.current();
        let line = self.line_table.line_of(token.span);
        let found = self.describe(token.kind);
        self.diags
            .add(unexpected_token(token.span, line, expected, found));
    }

    /// Human-readable form of a token for error messages: identifiers show
    /// their spelling, everything else its kind name.
    fn describe(&self, kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::Ident(name) => self.interner.lookup(name),
            other => other.display_name(),
        }
    }
}

/// Parse a token stream into a program.
///
/// `line_table` must be built from the same source text that produced
/// `tokens`; it supplies line numbers for diagnostics.
pub fn parse(
    tokens: &[Token],
    interner: &StringInterner,
    line_table: &LineOffsetTable,
    diags: &mut DiagnosticQueue,
) -> Program {
    debug!(tokens = tokens.len(), "parse start");
    let program = Parser::new(tokens, interner, line_table, diags).parse_program();
    debug!(statements = program.stmts.len(), "parse done");
    program
}
