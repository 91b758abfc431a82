//! Diagnostic queue for collecting and deduplicating diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of same-line errors with similar messages
//! - Suppression counting so callers can report how much was dropped

use std::hash::{Hash, Hasher};

use crate::Diagnostic;

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

/// Hash the first N characters of a message for dedup comparison.
///
/// Uses a lightweight hash instead of allocating an owned `String` prefix.
/// A collision can at worst suppress one extra same-line diagnostic.
#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before suppressing (0 = unlimited).
    pub error_limit: usize,
    /// Deduplicate errors with same line and similar content.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting and deduplicating diagnostics.
///
/// All pipeline phases push here instead of writing to stderr; the driver
/// decides where the collected diagnostics go.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    /// Collected diagnostics.
    diagnostics: Vec<Diagnostic>,
    /// Count of errors (not warnings).
    error_count: usize,
    /// Diagnostics dropped by the limit or dedup.
    suppressed: usize,
    /// Last (line, `message_prefix_hash`) error for dedup.
    last_error: Option<(u32, u64)>,
    /// Configuration.
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            suppressed: 0,
            last_error: None,
            config,
        }
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was
    /// suppressed by the error limit or deduplication.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();

        // Check error limit
        if is_error && self.config.error_limit > 0 && self.error_count >= self.config.error_limit {
            self.suppressed += 1;
            return false;
        }

        // Deduplicate
        if self.config.deduplicate && self.is_duplicate(&diag) {
            self.suppressed += 1;
            return false;
        }

        // Update dedup tracking
        if is_error {
            self.last_error = Some((diag.line, message_prefix_hash(&diag.message)));
            self.error_count += 1;
        }

        self.diagnostics.push(diag);
        true
    }

    /// Convenience: add an error with a message and line.
    pub fn error(&mut self, message: impl Into<String>, line: u32) -> bool {
        self.add(Diagnostic::error(message).with_line(line))
    }

    /// Convenience: add a warning with a message and line.
    pub fn warning(&mut self, message: impl Into<String>, line: u32) -> bool {
        self.add(Diagnostic::warning(message).with_line(line))
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Get the number of diagnostics dropped by the limit or dedup.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed
    }

    /// Check if any errors were collected.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Iterate over collected diagnostics without clearing the queue.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Sort diagnostics by line and return them, clearing the queue.
    ///
    /// Skips sorting if already in order (common case for a single pass
    /// over a single source).
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self.diagnostics.windows(2).all(|w| w[0].line <= w[1].line);
        if !already_sorted {
            self.diagnostics.sort_by_key(|d| d.line);
        }

        let result: Vec<Diagnostic> = self.diagnostics.drain(..).collect();

        self.error_count = 0;
        self.suppressed = 0;
        self.last_error = None;

        result
    }

    /// Check if a diagnostic duplicates the most recent error.
    fn is_duplicate(&self, diag: &Diagnostic) -> bool {
        if !diag.is_error() {
            return false;
        }
        if let Some((last_line, last_hash)) = self.last_error {
            if last_line == diag.line && message_prefix_hash(&diag.message) == last_hash {
                return true;
            }
        }
        false
    }
}

impl<'a> IntoIterator for &'a DiagnosticQueue {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Severity;

    #[test]
    fn test_add_and_count() {
        let mut queue = DiagnosticQueue::new();
        assert!(queue.error("bad token", 1));
        assert!(queue.warning("odd but fine", 2));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.error_count(), 1);
        assert!(queue.has_errors());
    }

    #[test]
    fn test_error_limit_suppresses() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
            error_limit: 2,
            deduplicate: false,
        });

        assert!(queue.error("first", 1));
        assert!(queue.error("second", 2));
        assert!(!queue.error("third", 3));

        assert_eq!(queue.error_count(), 2);
        assert_eq!(queue.suppressed_count(), 1);
        assert!(queue.limit_reached());
    }

    #[test]
    fn test_limit_does_not_block_warnings() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
            error_limit: 1,
            deduplicate: false,
        });

        assert!(queue.error("first", 1));
        assert!(!queue.error("second", 2));
        assert!(queue.warning("still recorded", 3));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_dedup_same_line_same_message() {
        let mut queue = DiagnosticQueue::new();
        assert!(queue.error("expected `:`, found `)`", 4));
        assert!(!queue.error("expected `:`, found `)`", 4));
        assert!(queue.error("expected `:`, found `)`", 9));

        assert_eq!(queue.error_count(), 2);
        assert_eq!(queue.suppressed_count(), 1);
    }

    #[test]
    fn test_dedup_never_drops_warnings() {
        let mut queue = DiagnosticQueue::new();
        assert!(queue.warning("unknown character `$`", 2));
        assert!(queue.warning("unknown character `$`", 2));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_unlimited_config() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
        for i in 0..50 {
            assert!(queue.error("same message", i));
        }
        assert_eq!(queue.error_count(), 50);
        assert_eq!(queue.suppressed_count(), 0);
    }

    #[test]
    fn test_flush_sorts_by_line() {
        let mut queue = DiagnosticQueue::new();
        queue.error("later", 9);
        queue.error("earlier", 2);

        let flushed = queue.flush();
        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[0].line, 2);
        assert_eq!(flushed[1].line, 9);
        assert!(queue.is_empty());
        assert_eq!(queue.error_count(), 0);
    }

    #[test]
    fn test_iter_preserves_queue() {
        let mut queue = DiagnosticQueue::new();
        queue.warning("one", 1);
        queue.warning("two", 2);

        let severities: Vec<Severity> = queue.iter().map(|d| d.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Warning]);
        assert_eq!(queue.len(), 2);
    }
}
