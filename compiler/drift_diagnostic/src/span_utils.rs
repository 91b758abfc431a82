//! Span utility functions for diagnostic processing.
//!
//! Provides line lookup from byte offsets, used by the parser and the driver
//! to attach line numbers to span-carrying diagnostics.

use drift_ir::Span;

/// Pre-computed line offset table for efficient line lookup.
///
/// Builds a table of byte offsets for each line start, enabling O(log L)
/// binary search lookups instead of O(n) linear scans.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start (0-indexed lines internally).
    /// offsets[0] = 0 (line 1 starts at byte 0)
    /// offsets[1] = byte after first \n (line 2 start)
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text.
    ///
    /// Scans the source once to find all newlines, O(n) construction
    /// for O(log L) lookups where L is the number of lines.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                // Next line starts at byte after the newline
                offsets.push((i + 1) as u32);
            }
        }
        LineOffsetTable { offsets }
    }

    /// Get 1-based line number from a byte offset using binary search.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        // Binary search for the largest line start <= offset
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,                      // Exact match: offset is at line start
            Err(insert) => insert.saturating_sub(1), // Insert point: line is before
        };
        (line_idx as u32) + 1 // Convert to 1-based
    }

    /// Get 1-based line number for the start of a span.
    #[inline]
    pub fn line_of(&self, span: Span) -> u32 {
        self.line_from_offset(span.start)
    }

    /// Get the number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let table = LineOffsetTable::build("hello world");
        assert_eq!(table.line_count(), 1);
        assert_eq!(table.line_from_offset(0), 1);
        assert_eq!(table.line_from_offset(10), 1);
    }

    #[test]
    fn test_multiple_lines() {
        let table = LineOffsetTable::build("line1\nline2\nline3");
        assert_eq!(table.line_count(), 3);
        assert_eq!(table.line_from_offset(0), 1); // 'l' of line1
        assert_eq!(table.line_from_offset(5), 1); // '\n' after line1
        assert_eq!(table.line_from_offset(6), 2); // 'l' of line2
        assert_eq!(table.line_from_offset(11), 2); // '\n' after line2
        assert_eq!(table.line_from_offset(12), 3); // 'l' of line3
    }

    #[test]
    fn test_line_of_span() {
        let table = LineOffsetTable::build("line1\nline2\nline3");
        assert_eq!(table.line_of(Span::new(0, 5)), 1);
        assert_eq!(table.line_of(Span::new(6, 11)), 2);
        assert_eq!(table.line_of(Span::new(12, 17)), 3);
    }

    #[test]
    fn test_empty_source() {
        let table = LineOffsetTable::build("");
        assert_eq!(table.line_count(), 1);
        assert_eq!(table.line_from_offset(0), 1);
    }

    #[test]
    fn test_trailing_newline() {
        let table = LineOffsetTable::build("line1\nline2\n");
        assert_eq!(table.line_count(), 3); // Empty line after trailing \n
        assert_eq!(table.line_from_offset(12), 3); // After second \n
    }

    #[test]
    fn test_offset_past_end() {
        let table = LineOffsetTable::build("ab\ncd");
        assert_eq!(table.line_from_offset(100), 2);
    }
}
