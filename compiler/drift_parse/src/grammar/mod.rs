//! Statement and block grammar.
//!
//! Statement forms are distinguished by their leading token, with one
//! token of lookahead to tell assignment (`name is expr`) from an
//! expression statement that starts with an identifier. Anything else
//! parses as an expression statement.

mod expr;

use drift_ir::{Name, Span, Stmt, StmtKind, TokenKind};
use drift_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::Parser;

impl Parser<'_> {
    pub(crate) fn parse_program(&mut self) -> drift_ir::Program {
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.at_end() {
            self.skip_newlines();
            if self.at_end() {
                break;
            }
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                // A Dedent with no open block (stray indentation); drop it.
                None => self.advance(),
            }
        }
        drift_ir::Program { stmts }
    }

    /// Parse one statement, or `None` at a block boundary.
    ///
    /// Blocks nest through this function, so the stack guard lives here.
    fn parse_statement(&mut self) -> Option<Stmt> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Option<Stmt> {
        self.skip_newlines();
        let token = self.current();
        trace!(
            pos = self.cursor.position(),
            kind = token.kind.display_name(),
            "parse_statement"
        );
        match token.kind {
            TokenKind::Eof | TokenKind::Dedent => None,
            TokenKind::Define => Some(self.parse_define(token.span)),
            TokenKind::If => Some(self.parse_if(token.span)),
            TokenKind::Loop => Some(self.parse_loop(token.span)),
            TokenKind::Return => Some(self.parse_return(token.span)),
            TokenKind::Ident(name) if self.peek_kind() == TokenKind::Is => {
                Some(self.parse_assign(name, token.span))
            }
            _ => {
                let value = self.parse_expression();
                self.match_token(TokenKind::Newline);
                let span = value.span;
                Some(Stmt::new(StmtKind::Expr(value), span))
            }
        }
    }

    /// `define name [as]: block`. The function binds the single implicit
    /// parameter `n`.
    fn parse_define(&mut self, start: Span) -> Stmt {
        self.advance();
        let name = self.expect_ident();
        if self.check(TokenKind::As) {
            self.advance();
        }
        self.expect(TokenKind::Colon);
        self.skip_newlines();
        let body = self.parse_block();
        let span = start.merge(self.previous_span());
        Stmt::new(
            StmtKind::FuncDef {
                name,
                param: self.interner.intern("n"),
                body: body.into(),
            },
            span,
        )
    }

    /// `if cond: block` with optional `else: block`. Blank lines may sit
    /// between the two blocks.
    fn parse_if(&mut self, start: Span) -> Stmt {
        self.advance();
        let cond = self.parse_expression();
        self.expect(TokenKind::Colon);
        self.skip_newlines();
        let then_body = self.parse_block();
        self.skip_newlines();
        let else_body = if self.check(TokenKind::Else) {
            self.advance();
            self.expect(TokenKind::Colon);
            self.skip_newlines();
            Some(self.parse_block())
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        Stmt::new(
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
            span,
        )
    }

    /// `loop [while] cond: block`. The `while` is optional noise, the
    /// condition is not.
    fn parse_loop(&mut self, start: Span) -> Stmt {
        self.advance();
        self.match_token(TokenKind::While);
        let cond = self.parse_expression();
        self.expect(TokenKind::Colon);
        self.skip_newlines();
        let body = self.parse_block();
        let span = start.merge(self.previous_span());
        Stmt::new(StmtKind::Loop { cond, body }, span)
    }

    fn parse_return(&mut self, start: Span) -> Stmt {
        self.advance();
        let value = self.parse_expression();
        let span = start.merge(value.span);
        self.match_token(TokenKind::Newline);
        Stmt::new(StmtKind::Return(value), span)
    }

    fn parse_assign(&mut self, name: Name, start: Span) -> Stmt {
        self.advance(); // identifier
        self.advance(); // is
        let value = self.parse_expression();
        let span = start.merge(value.span);
        self.match_token(TokenKind::Newline);
        Stmt::new(StmtKind::Assign { name, value }, span)
    }

    /// One indented block: `Indent`, statements, `Dedent`.
    ///
    /// A missing `Indent` is reported and recovery consumes the token in
    /// its place, so a body written on the header line is skipped rather
    /// than adopted.
    fn parse_block(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        self.expect(TokenKind::Indent);
        self.skip_newlines();
        while !matches!(self.current_kind(), TokenKind::Dedent | TokenKind::Eof) {
            self.skip_newlines();
            if matches!(self.current_kind(), TokenKind::Dedent | TokenKind::Eof) {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            }
        }
        self.match_token(TokenKind::Dedent);
        stmts
    }
}
