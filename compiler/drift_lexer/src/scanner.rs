//! The tokenizer proper: indentation tracking plus token dispatch.
//!
//! The scanner runs in two alternating modes. At the start of each line it
//! measures leading whitespace and compares it against the indent stack,
//! emitting `Indent`/`Dedent` tokens; blank and comment-only lines are
//! consumed whole without touching the stack. Within a line it dispatches
//! on the current byte and emits one token per step.
//!
//! The token stream is normalized: it never begins with a `Newline`, never
//! contains a `Newline` directly after another layout token, and always
//! ends with any open blocks closed, a final `Newline`, and `Eof`.

use drift_diagnostic::{unknown_character, DiagnosticQueue};
use drift_ir::{Span, StringInterner, Token, TokenKind};
use smallvec::{smallvec, SmallVec};

use crate::cursor::Cursor;
use crate::keywords;

/// What the indent pass found at the start of a line.
enum LineStart {
    /// Real content follows; any indent tokens have been emitted.
    Content,
    /// Blank or comment-only line, consumed entirely.
    Skipped,
    /// End of input reached while measuring indentation.
    EndOfInput,
}

pub(crate) struct Lexer<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
    diags: &'a mut DiagnosticQueue,
    tokens: Vec<Token>,
    /// Indent width stack; the base level 0 is always present.
    indents: SmallVec<[u32; 16]>,
    /// 1-based line counter for diagnostics (tokens carry spans, not lines).
    line: u32,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(
        source: &'a str,
        interner: &'a StringInterner,
        diags: &'a mut DiagnosticQueue,
    ) -> Lexer<'a> {
        Lexer {
            cursor: Cursor::new(source),
            interner,
            diags,
            tokens: Vec::new(),
            indents: smallvec![0],
            line: 1,
            at_line_start: true,
        }
    }

    pub(crate) fn run(mut self) -> Vec<Token> {
        loop {
            if self.cursor.is_eof() {
                break;
            }
            if self.at_line_start {
                match self.line_start() {
                    LineStart::Content => self.at_line_start = false,
                    LineStart::Skipped => continue,
                    LineStart::EndOfInput => break,
                }
            }
            self.scan_token();
        }
        self.finish()
    }

    /// Measure leading whitespace and emit indent tokens as needed.
    ///
    /// Widths: leading spaces count 1 column each; if a tab follows, each
    /// tab counts 4 and any spaces after the tabs count 1 each. A line
    /// holding only whitespace, or whitespace then a comment, produces no
    /// tokens and leaves the indent stack alone.
    fn line_start(&mut self) -> LineStart {
        let start = self.cursor.pos();
        let mut width: u32 = 0;
        while self.cursor.current() == b' ' {
            width += 1;
            self.cursor.advance();
        }
        if self.cursor.current() == b'\t' {
            while self.cursor.current() == b'\t' {
                width += 4;
                self.cursor.advance();
            }
            while self.cursor.current() == b' ' {
                width += 1;
                self.cursor.advance();
            }
        }

        if self.cursor.current() == b'#' {
            self.cursor.eat_until_newline();
            if self.cursor.current() == b'\n' {
                self.cursor.advance();
                self.line += 1;
            }
            return LineStart::Skipped;
        }
        if self.cursor.current() == b'\n' {
            self.cursor.advance();
            self.line += 1;
            return LineStart::Skipped;
        }
        if self.cursor.is_eof() {
            return LineStart::EndOfInput;
        }

        let span = Span::new(start, self.cursor.pos());
        if width > self.indent_top() {
            self.indents.push(width);
            self.push(TokenKind::Indent, span);
        } else {
            // One Dedent per level popped; a width between two levels pops
            // down past it without pushing the new width.
            while self.indents.len() > 1 && width < self.indent_top() {
                self.indents.pop();
                self.push(TokenKind::Dedent, span);
            }
        }
        LineStart::Content
    }

    #[inline]
    fn indent_top(&self) -> u32 {
        self.indents.last().copied().unwrap_or(0)
    }

    /// Dispatch one scanning step from the current byte.
    fn scan_token(&mut self) {
        let start = self.cursor.pos();
        match self.cursor.current() {
            b' ' | b'\t' => self.cursor.eat_while(|b| b == b' ' || b == b'\t'),
            b'#' => self.cursor.eat_until_newline(),
            b'\n' => {
                self.emit_newline(Span::new(start, start + 1));
                self.cursor.advance();
                self.line += 1;
                self.at_line_start = true;
            }
            b'"' => self.string(start),
            b'0'..=b'9' => self.number(start),
            b'.' if self.cursor.peek().is_ascii_digit() => self.number(start),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.word(start),
            _ => self.operator(start),
        }
    }

    /// Emit a `Newline` unless the stream is empty or the previous token is
    /// already a layout token.
    fn emit_newline(&mut self, span: Span) {
        let suppressed = matches!(
            self.tokens.last().map(|t| t.kind),
            None | Some(TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent)
        );
        if !suppressed {
            self.push(TokenKind::Newline, span);
        }
    }

    /// Scan a string literal. The opening quote is at `start`.
    ///
    /// Content runs to the next unescaped `"`, or to end of input for an
    /// unterminated literal (no diagnostic; the value is what was read).
    /// Raw newlines are legal inside strings.
    fn string(&mut self, start: u32) {
        self.cursor.advance();
        let content_start = self.cursor.pos();
        loop {
            if self.cursor.is_eof() {
                break;
            }
            match self.cursor.current() {
                b'"' => break,
                b'\\' => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                _ => self.cursor.advance(),
            }
        }
        let raw = self.cursor.slice(content_start, self.cursor.pos());
        if self.cursor.current() == b'"' {
            self.cursor.advance();
        }

        for byte in raw.bytes() {
            if byte == b'\n' {
                self.line += 1;
            }
        }

        let name = if raw.contains('\\') {
            self.interner.intern_owned(cook_escapes(raw))
        } else {
            self.interner.intern(raw)
        };
        self.push(TokenKind::Str(name), Span::new(start, self.cursor.pos()));
    }

    /// Scan a number literal: decimal digits with optional fraction and
    /// optional exponent. Takes the longest valid prefix, so `1e` is the
    /// number `1` followed by the identifier `e`.
    fn number(&mut self, start: u32) {
        self.cursor.eat_while(|b| b.is_ascii_digit());
        if self.cursor.current() == b'.' {
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }
        if matches!(self.cursor.current(), b'e' | b'E') {
            let checkpoint = self.cursor;
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            if self.cursor.current().is_ascii_digit() {
                self.cursor.eat_while(|b| b.is_ascii_digit());
            } else {
                self.cursor = checkpoint;
            }
        }

        let text = self.cursor.slice(start, self.cursor.pos());
        // The scanned prefix is always a valid float; 0.0 is unreachable.
        let value = text.parse::<f64>().unwrap_or(0.0);
        self.push(TokenKind::num(value), Span::new(start, self.cursor.pos()));
    }

    /// Scan an identifier or keyword.
    fn word(&mut self, start: u32) {
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let text = self.cursor.slice(start, self.cursor.pos());
        let kind = keywords::lookup(text)
            .unwrap_or_else(|| TokenKind::Ident(self.interner.intern(text)));
        self.push(kind, Span::new(start, self.cursor.pos()));
    }

    /// Scan an operator or punctuation token.
    fn operator(&mut self, start: u32) {
        let kind = match self.cursor.current() {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'.' => TokenKind::Dot,
            b'<' => return self.comparison(start, TokenKind::Lt, TokenKind::LtEq),
            b'>' => return self.comparison(start, TokenKind::Gt, TokenKind::GtEq),
            b'!' => {
                if self.cursor.peek() == b'=' {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.push(TokenKind::NotEq, Span::new(start, self.cursor.pos()));
                } else {
                    // A bare `!` has no meaning; drop it.
                    self.cursor.advance();
                }
                return;
            }
            b'=' => {
                // `=` and `==` are both the equality operator.
                if self.cursor.peek() == b'=' {
                    self.cursor.advance();
                }
                self.cursor.advance();
                self.push(TokenKind::Eq, Span::new(start, self.cursor.pos()));
                return;
            }
            _ => {
                self.unknown_char(start);
                return;
            }
        };
        self.cursor.advance();
        self.push(kind, Span::new(start, self.cursor.pos()));
    }

    fn comparison(&mut self, start: u32, single: TokenKind, with_eq: TokenKind) {
        let kind = if self.cursor.peek() == b'=' {
            self.cursor.advance();
            with_eq
        } else {
            single
        };
        self.cursor.advance();
        self.push(kind, Span::new(start, self.cursor.pos()));
    }

    /// Skip an unrecognized character and queue a warning for it.
    fn unknown_char(&mut self, start: u32) {
        if let Some(ch) = self.cursor.current_char() {
            self.cursor.advance_n(ch.len_utf8() as u32);
            let span = Span::new(start, self.cursor.pos());
            self.diags.add(unknown_character(span, self.line, ch));
        } else {
            self.cursor.advance();
        }
    }

    /// Close open blocks, terminate the last line, and cap with `Eof`.
    fn finish(mut self) -> Vec<Token> {
        let span = Span::point(self.cursor.pos());
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, span);
        }
        if self.tokens.last().is_some_and(|t| t.kind != TokenKind::Newline) {
            self.push(TokenKind::Newline, span);
        }
        self.push(TokenKind::Eof, span);
        self.tokens
    }

    #[inline]
    fn push(&mut self, kind: TokenKind, span: Span) {
        self.tokens.push(Token::new(kind, span));
    }
}

/// Resolve backslash escapes: `\n` and `\t` map to the control characters,
/// any other escaped character stands for itself.
fn cook_escapes(raw: &str) -> String {
    let mut cooked = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => cooked.push('\n'),
                Some('t') => cooked.push('\t'),
                Some(other) => cooked.push(other),
                None => {}
            }
        } else {
            cooked.push(c);
        }
    }
    cooked
}
