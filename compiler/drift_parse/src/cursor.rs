//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, one-token lookahead, and consumption.
//! The cursor clamps at the end of the stream: reading past the last token
//! yields `Eof`, so grammar code never needs its own bounds checks.

use drift_ir::{Span, Token, TokenKind};

/// Cursor over a lexed token stream.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Cursor<'a> {
        Cursor { tokens, pos: 0 }
    }

    /// Current token. Past the end of the stream this is a synthesized
    /// `Eof`, so an empty slice parses as an empty program.
    #[inline]
    pub(crate) fn current(&self) -> Token {
        match self.tokens.get(self.pos) {
            Some(token) => *token,
            None => Token::dummy(TokenKind::Eof),
        }
    }

    /// One-token lookahead, clamped to `Eof` at the end.
    #[inline]
    pub(crate) fn peek(&self) -> Token {
        match self.tokens.get(self.pos + 1) {
            Some(token) => *token,
            None => Token::dummy(TokenKind::Eof),
        }
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens
                .get(self.pos - 1)
                .map_or(Span::DUMMY, |token| token.span)
        } else {
            Span::DUMMY
        }
    }

    /// Advance one token, saturating at the end of the stream.
    #[inline]
    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Position in the stream, for progress checks and trace output.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use drift_ir::{Span, Token, TokenKind};

    fn token(kind: TokenKind, start: u32) -> Token {
        Token::new(kind, Span::new(start, start + 1))
    }

    #[test]
    fn test_clamps_to_eof() {
        let tokens = [token(TokenKind::Colon, 0), token(TokenKind::Eof, 1)];
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.current().kind, TokenKind::Colon);
        cursor.advance();
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.current().kind, TokenKind::Eof);
        assert_eq!(cursor.peek().kind, TokenKind::Eof);
    }

    #[test]
    fn test_empty_stream_reads_as_eof() {
        let cursor = Cursor::new(&[]);
        assert_eq!(cursor.current().kind, TokenKind::Eof);
        assert_eq!(cursor.previous_span(), Span::DUMMY);
    }

    #[test]
    fn test_previous_span() {
        let tokens = [token(TokenKind::Plus, 0), token(TokenKind::Eof, 1)];
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.previous_span(), Span::DUMMY);
        cursor.advance();
        assert_eq!(cursor.previous_span(), Span::new(0, 1));
    }
}
