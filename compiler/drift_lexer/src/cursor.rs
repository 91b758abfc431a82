//! Byte-level cursor over source text.
//!
//! All reads are bounds-checked; past the end of input [`Cursor::current`]
//! returns `0`, so scanning loops terminate without a separate length test
//! on every arm. Positions are `u32` byte offsets (source files are capped
//! at 4 GiB by the span representation).
//!
//! The cursor is `Copy`, so scanners checkpoint by saving the cursor value
//! and restore by assigning it back.

/// A cheap, copyable position into source text.
#[derive(Copy, Clone)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    pos: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Cursor<'a> {
        debug_assert!(
            u32::try_from(source.len()).is_ok(),
            "source exceeds the 4 GiB span limit"
        );
        Cursor { source, pos: 0 }
    }

    /// Current byte, or `0` at end of input.
    #[inline]
    pub(crate) fn current(&self) -> u8 {
        self.source
            .as_bytes()
            .get(self.pos as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Byte after the current one, or `0` past the end.
    #[inline]
    pub(crate) fn peek(&self) -> u8 {
        self.source
            .as_bytes()
            .get(self.pos as usize + 1)
            .copied()
            .unwrap_or(0)
    }

    /// Advance one byte. Saturates at end of input.
    #[inline]
    pub(crate) fn advance(&mut self) {
        if (self.pos as usize) < self.source.len() {
            self.pos += 1;
        }
    }

    /// Advance `n` bytes, saturating at end of input.
    #[inline]
    pub(crate) fn advance_n(&mut self, n: u32) {
        for _ in 0..n {
            self.advance();
        }
    }

    #[inline]
    pub(crate) fn pos(&self) -> u32 {
        self.pos
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos as usize >= self.source.len()
    }

    /// Decode the full character at the current position.
    ///
    /// Returns `None` at end of input. The cursor only ever rests on UTF-8
    /// character boundaries (ASCII-driven scanning never advances into a
    /// multi-byte sequence), so the decode cannot fail mid-character.
    pub(crate) fn current_char(&self) -> Option<char> {
        self.source
            .get(self.pos as usize..)
            .and_then(|rest| rest.chars().next())
    }

    /// Slice of the source between two byte positions.
    #[inline]
    pub(crate) fn slice(&self, start: u32, end: u32) -> &'a str {
        &self.source[start as usize..end as usize]
    }

    /// Advance while `pred` holds for the current byte.
    #[inline]
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` (not past it), or to end of input.
    pub(crate) fn eat_until_newline(&mut self) {
        let rest = &self.source.as_bytes()[self.pos as usize..];
        match memchr::memchr(b'\n', rest) {
            Some(offset) => self.pos += offset as u32,
            None => self.pos = self.source.len() as u32,
        }
    }
}
