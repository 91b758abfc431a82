//! Expression grammar.
//!
//! Precedence, low to high: `or` → `and` → comparison (one tier,
//! non-associative) → additive → multiplicative → unary (`-`, `not`,
//! right-recursive) → the relation operator (`f of x`) → primary.
//!
//! The relation operator's right side re-enters at the additive level, so
//! `f of a + b` applies `f` to the sum, and `f of g of x` nests to the
//! right. Index suffixes (`expr[i]`, chainable) attach at the primary
//! level.

use drift_ir::{BinOp, Expr, ExprKind, Span, TokenKind, UnOp};
use drift_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::Parser;

impl Parser<'_> {
    /// Parse a full expression.
    ///
    /// Nested expressions re-enter here (parentheses, list elements,
    /// index operands), so the stack guard lives here.
    pub(crate) fn parse_expression(&mut self) -> Expr {
        ensure_sufficient_stack(|| self.parse_or())
    }

    fn parse_or(&mut self) -> Expr {
        let mut left = self.parse_and();
        while self.check(TokenKind::Or) {
            self.advance();
            let right = self.parse_and();
            left = binary(BinOp::Or, left, right);
        }
        left
    }

    fn parse_and(&mut self) -> Expr {
        let mut left = self.parse_comparison();
        while self.check(TokenKind::And) {
            self.advance();
            let right = self.parse_comparison();
            left = binary(BinOp::And, left, right);
        }
        left
    }

    /// One optional comparison; `a < b < c` parses as `(a < b)` and leaves
    /// `< c` for the statement level to stumble over.
    fn parse_comparison(&mut self) -> Expr {
        let left = self.parse_additive();
        let op = match self.current_kind() {
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::LtEq => BinOp::LtEq,
            TokenKind::GtEq => BinOp::GtEq,
            TokenKind::Eq => BinOp::Eq,
            TokenKind::NotEq => BinOp::NotEq,
            _ => return left,
        };
        self.advance();
        let right = self.parse_additive();
        binary(op, left, right)
    }

    fn parse_additive(&mut self) -> Expr {
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative();
            left = binary(op, left, right);
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut left = self.parse_unary();
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary();
            left = binary(op, left, right);
        }
        left
    }

    fn parse_unary(&mut self) -> Expr {
        let op = match self.current_kind() {
            TokenKind::Minus => UnOp::Neg,
            TokenKind::Not => UnOp::Not,
            _ => return self.parse_relation(),
        };
        let start = self.current_span();
        self.advance();
        // Direct self-recursion, so it carries its own stack guard.
        let operand = ensure_sufficient_stack(|| self.parse_unary());
        let span = start.merge(operand.span);
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// `func of arg`: the left side is the callable, the right side the
    /// argument, parsed from the additive level down.
    fn parse_relation(&mut self) -> Expr {
        let func = self.parse_primary();
        if self.check(TokenKind::Of) {
            self.advance();
            let arg = self.parse_additive();
            let span = func.span.merge(arg.span);
            return Expr::new(
                ExprKind::Relation {
                    func: Box::new(func),
                    arg: Box::new(arg),
                },
                span,
            );
        }
        func
    }

    fn parse_primary(&mut self) -> Expr {
        let token = self.current();
        trace!(kind = token.kind.display_name(), "parse_primary");
        match token.kind {
            TokenKind::Interrogative(kind) => {
                self.advance();
                if self.check(TokenKind::Is) {
                    self.advance();
                    let target = self.parse_expression();
                    let span = token.span.merge(target.span);
                    return Expr::new(
                        ExprKind::Interrogate {
                            kind,
                            target: Box::new(target),
                        },
                        span,
                    );
                }
                // Bare interrogative: an ordinary variable of the same
                // spelling.
                let name = self.interner.intern(kind.as_str());
                let ident = Expr::new(ExprKind::Ident(name), token.span);
                self.parse_index_suffix(ident)
            }
            TokenKind::Predicate(kind) => {
                self.advance();
                Expr::new(ExprKind::Predicate(kind), token.span)
            }
            TokenKind::Num(bits) => {
                self.advance();
                let num = Expr::new(ExprKind::Num(f64::from_bits(bits)), token.span);
                self.parse_index_suffix(num)
            }
            TokenKind::Str(name) => {
                self.advance();
                let text = Expr::new(ExprKind::Str(name), token.span);
                self.parse_index_suffix(text)
            }
            TokenKind::Null => {
                self.advance();
                Expr::new(ExprKind::Null, token.span)
            }
            TokenKind::Ident(name) => {
                self.advance();
                let ident = Expr::new(ExprKind::Ident(name), token.span);
                self.parse_index_suffix(ident)
            }
            TokenKind::LParen => {
                self.advance();
                let mut inner = self.parse_expression();
                self.expect(TokenKind::RParen);
                inner.span = token.span.merge(self.previous_span());
                self.parse_index_suffix(inner)
            }
            TokenKind::LBracket => self.parse_list(token.span),
            _ => {
                // Cannot start an expression. Consume the offender unless
                // it is a layout token, and stand in a null literal.
                if matches!(
                    token.kind,
                    TokenKind::Eof | TokenKind::Newline | TokenKind::Dedent
                ) {
                    Expr::new(ExprKind::Null, Span::point(token.span.start))
                } else {
                    self.advance();
                    Expr::new(ExprKind::Null, token.span)
                }
            }
        }
    }

    /// Chainable `[index]` suffixes. Empty lists, `null`, comprehensions,
    /// and interrogation forms take none; everything else at primary level
    /// does.
    fn parse_index_suffix(&mut self, mut expr: Expr) -> Expr {
        while self.check(TokenKind::LBracket) {
            self.advance();
            let index = self.parse_expression();
            self.expect(TokenKind::RBracket);
            let span = expr.span.merge(self.previous_span());
            expr = Expr::new(
                ExprKind::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                },
                span,
            );
        }
        expr
    }

    /// List literal or comprehension, starting at `[`.
    fn parse_list(&mut self, start: Span) -> Expr {
        self.advance();
        if self.check(TokenKind::RBracket) {
            self.advance();
            return Expr::new(ExprKind::List(Vec::new()), start.merge(self.previous_span()));
        }

        let first = self.parse_expression();

        if self.check(TokenKind::For) {
            self.advance();
            let var = self.expect_ident();
            self.expect(TokenKind::In);
            let iter = self.parse_expression();
            let filter = if self.check(TokenKind::If) {
                self.advance();
                Some(Box::new(self.parse_expression()))
            } else {
                None
            };
            self.expect(TokenKind::RBracket);
            let span = start.merge(self.previous_span());
            return Expr::new(
                ExprKind::ListComp {
                    expr: Box::new(first),
                    var,
                    iter: Box::new(iter),
                    filter,
                },
                span,
            );
        }

        let mut elems = vec![first];
        while self.match_token(TokenKind::Comma) {
            if self.check(TokenKind::RBracket) {
                break; // trailing comma
            }
            elems.push(self.parse_expression());
        }
        self.expect(TokenKind::RBracket);
        let span = start.merge(self.previous_span());
        let list = Expr::new(ExprKind::List(elems), span);
        self.parse_index_suffix(list)
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}
