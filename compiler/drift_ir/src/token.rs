//! Token types for the Drift lexer.
//!
//! Number literals store their `f64` bits as `u64` so tokens stay `Eq + Hash`.
//! String literals and identifiers use interned [`Name`] for O(1) equality.

use std::fmt;
use std::hash::Hash;

use crate::{Name, Span};

/// A token with its span in the source.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Create a dummy token for testing/synthesized input.
    pub const fn dummy(kind: TokenKind) -> Self {
        Token {
            kind,
            span: Span::DUMMY,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds for Drift.
///
/// Layout tokens (`Newline`, `Indent`, `Dedent`) carry block structure out of
/// the lexer so the parser never sees raw whitespace.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// Number literal: 42, 3.14, 2.5e-8 (stored as bits for Eq/Hash)
    Num(u64),
    /// String literal (interned): "hello"
    Str(Name),
    /// Identifier (interned)
    Ident(Name),

    // Keywords
    Define,
    As,
    If,
    Else,
    Loop,
    While,
    Return,
    And,
    Or,
    Not,
    Of,
    Is,
    For,
    In,
    Null,

    /// Interrogative keyword: what, who, when, where, why, how
    Interrogative(InterrogativeKind),
    /// State predicate keyword: converged, diverging, ...
    Predicate(PredicateKind),

    // Operators
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %
    Eq,      // = and ==
    NotEq,   // !=
    Lt,      // <
    LtEq,    // <=
    Gt,      // >
    GtEq,    // >=

    // Punctuation
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Colon,    // :
    Comma,    // ,
    Dot,      // . (outside a number literal)

    // Layout
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl TokenKind {
    /// Build a number token from an `f64` value.
    #[inline]
    pub fn num(value: f64) -> Self {
        TokenKind::Num(value.to_bits())
    }

    /// Extract the `f64` value of a number token.
    #[inline]
    pub fn num_value(&self) -> Option<f64> {
        match self {
            TokenKind::Num(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Name of this token kind for diagnostics, e.g. "expected `:` after condition".
    #[inline]
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Num(_) => "number",
            TokenKind::Str(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Define => "define",
            TokenKind::As => "as",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Loop => "loop",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Of => "of",
            TokenKind::Is => "is",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::Null => "null",
            TokenKind::Interrogative(kind) => kind.as_str(),
            TokenKind::Predicate(kind) => kind.as_str(),
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Eq => "=",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Num(bits) => write!(f, "Num({})", f64::from_bits(*bits)),
            TokenKind::Str(name) => write!(f, "Str({name:?})"),
            TokenKind::Ident(name) => write!(f, "Ident({name:?})"),
            TokenKind::Interrogative(kind) => write!(f, "Interrogative({kind:?})"),
            TokenKind::Predicate(kind) => write!(f, "Predicate({kind:?})"),
            _ => write!(f, "{}", self.display_name()),
        }
    }
}

/// The six interrogative keywords.
///
/// In operator position (`what is x`) they query the observer; bare, they
/// behave as ordinary identifiers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum InterrogativeKind {
    What,
    Who,
    When,
    Where,
    Why,
    How,
}

impl InterrogativeKind {
    /// Source spelling of this interrogative.
    pub const fn as_str(self) -> &'static str {
        match self {
            InterrogativeKind::What => "what",
            InterrogativeKind::Who => "who",
            InterrogativeKind::When => "when",
            InterrogativeKind::Where => "where",
            InterrogativeKind::Why => "why",
            InterrogativeKind::How => "how",
        }
    }
}

/// The six entropy-state predicate keywords.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PredicateKind {
    Converged,
    Diverging,
    Stable,
    Oscillating,
    Improving,
    Equilibrium,
}

impl PredicateKind {
    /// Source spelling of this predicate.
    pub const fn as_str(self) -> &'static str {
        match self {
            PredicateKind::Converged => "converged",
            PredicateKind::Diverging => "diverging",
            PredicateKind::Stable => "stable",
            PredicateKind::Oscillating => "oscillating",
            PredicateKind::Improving => "improving",
            PredicateKind::Equilibrium => "equilibrium",
        }
    }
}

// Size assertions to prevent accidental regressions
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Token, TokenKind};
    crate::static_assert_size!(TokenKind, 16);
    crate::static_assert_size!(Token, 24);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_bits_roundtrip() {
        let kind = TokenKind::num(3.14);
        assert_eq!(kind.num_value(), Some(3.14));

        let zero = TokenKind::num(0.0);
        assert_eq!(zero.num_value(), Some(0.0));
    }

    #[test]
    fn test_num_value_on_non_number() {
        assert_eq!(TokenKind::Plus.num_value(), None);
        assert_eq!(TokenKind::Ident(Name::EMPTY).num_value(), None);
    }

    #[test]
    fn test_num_tokens_hash_by_bits() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(TokenKind::num(1.5));
        set.insert(TokenKind::num(1.5)); // duplicate
        set.insert(TokenKind::num(2.5));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TokenKind::Define.display_name(), "define");
        assert_eq!(TokenKind::Colon.display_name(), ":");
        assert_eq!(
            TokenKind::Interrogative(InterrogativeKind::What).display_name(),
            "what"
        );
        assert_eq!(
            TokenKind::Predicate(PredicateKind::Converged).display_name(),
            "converged"
        );
        assert_eq!(TokenKind::Eof.display_name(), "end of input");
    }

    #[test]
    fn test_dummy_token() {
        let token = Token::dummy(TokenKind::Newline);
        assert_eq!(token.span, Span::DUMMY);
        assert_eq!(token.kind, TokenKind::Newline);
    }
}
