//! String interner for identifier and string-literal storage.
//!
//! Provides O(1) interning and lookup. Interned strings are leaked into a
//! single pool so lookups hand out `&'static str` without lifetime plumbing.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Pool exceeded capacity (over 4 billion strings).
    PoolOverflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::PoolOverflow { count } => write!(
                f,
                "interner pool exceeded capacity: {count} strings (0x{count:X}), max is {} (0x{:X})",
                u32::MAX,
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Storage for interned strings.
struct InternPool {
    /// Map from string content to pool index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

impl InternPool {
    fn with_empty() -> Self {
        let mut pool = Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        // Pre-intern empty string at index 0 so Name::EMPTY resolves
        let empty: &'static str = "";
        pool.map.insert(empty, 0);
        pool.strings.push(empty);
        pool
    }
}

/// String interner backing every [`Name`] in the runtime.
///
/// The lexer interns identifiers and string literals; the evaluator resolves
/// them back for display and environment keys.
///
/// # Thread Safety
/// Uses an `RwLock` around the pool so a single interner can be shared by
/// reference across pipeline phases.
pub struct StringInterner {
    pool: RwLock<InternPool>,
}

impl StringInterner {
    /// Create a new interner with pre-interned keywords.
    pub fn new() -> Self {
        let interner = Self {
            pool: RwLock::new(InternPool::with_empty()),
        };
        interner.pre_intern_keywords();
        interner
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    ///
    /// This is the fallible version of `intern()`. Use this when you need to
    /// handle the overflow case gracefully instead of panicking.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: check if already interned
        {
            let guard = self.pool.read();
            if let Some(&index) = guard.map.get(s) {
                return Ok(Name::from_raw(index));
            }
        }

        let mut guard = self.pool.write();

        // Double-check after acquiring write lock
        if let Some(&index) = guard.map.get(s) {
            return Ok(Name::from_raw(index));
        }

        // Leak the string to get 'static lifetime
        let owned: String = s.to_owned();
        let leaked: &'static str = Box::leak(owned.into_boxed_str());

        Self::insert(&mut guard, leaked)
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity (over 4 billion strings).
    /// Use `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Try to intern an owned String, returning its Name or an error on overflow.
    pub fn try_intern_owned(&self, s: String) -> Result<Name, InternError> {
        // Fast path: check if already interned
        {
            let guard = self.pool.read();
            if let Some(&index) = guard.map.get(s.as_str()) {
                return Ok(Name::from_raw(index));
            }
        }

        let mut guard = self.pool.write();

        // Double-check after acquiring write lock
        if let Some(&index) = guard.map.get(s.as_str()) {
            return Ok(Name::from_raw(index));
        }

        // Leak the owned string directly (no extra allocation)
        let leaked: &'static str = Box::leak(s.into_boxed_str());

        Self::insert(&mut guard, leaked)
    }

    /// Intern an owned String, avoiding double allocation.
    ///
    /// More efficient than `intern()` when the caller already owns the String,
    /// e.g. an unescaped string literal built by the lexer.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity (over 4 billion strings).
    /// Use `try_intern_owned` for fallible interning.
    pub fn intern_owned(&self, s: String) -> Name {
        self.try_intern_owned(s).unwrap_or_else(|e| panic!("{e}"))
    }

    fn insert(pool: &mut InternPool, leaked: &'static str) -> Result<Name, InternError> {
        let index = u32::try_from(pool.strings.len()).map_err(|_| InternError::PoolOverflow {
            count: pool.strings.len(),
        })?;
        pool.strings.push(leaked);
        pool.map.insert(leaked, index);
        Ok(Name::from_raw(index))
    }

    /// Look up the string for a Name.
    ///
    /// The returned reference is `'static` because interned strings are leaked
    /// and never deallocated.
    pub fn lookup(&self, name: Name) -> &'static str {
        let guard = self.pool.read();
        guard.strings[name.index()]
    }

    /// Pre-intern all Drift keywords and well-known identifiers.
    fn pre_intern_keywords(&self) {
        const KEYWORDS: &[&str] = &[
            // Reserved keywords
            "define",
            "as",
            "if",
            "else",
            "loop",
            "while",
            "return",
            "and",
            "or",
            "not",
            "of",
            "is",
            "for",
            "in",
            "null",
            // Interrogatives
            "what",
            "who",
            "when",
            "where",
            "why",
            "how",
            // State predicates
            "converged",
            "diverging",
            "stable",
            "oscillating",
            "improving",
            "equilibrium",
            // Built-in functions
            "print",
            "len",
            "str",
            "append",
            "type",
            "report",
            "observe",
            "assert",
            // Well-known bindings
            "n",
            "__observer__",
            "__loop_exit__",
            "__loop_iterations__",
        ];

        for kw in KEYWORDS {
            self.intern(kw);
        }
    }

    /// Get the number of interned strings.
    pub fn len(&self) -> usize {
        self.pool.read().strings.len()
    }

    /// Check if the interner is empty (only has the empty string).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_lookup() {
        let interner = StringInterner::new();

        let hello = interner.intern("hello");
        let world = interner.intern("world");
        let hello2 = interner.intern("hello");

        assert_eq!(hello, hello2);
        assert_ne!(hello, world);

        assert_eq!(interner.lookup(hello), "hello");
        assert_eq!(interner.lookup(world), "world");
    }

    #[test]
    fn test_empty_string() {
        let interner = StringInterner::new();
        let empty = interner.intern("");
        assert_eq!(empty, Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn test_keywords_pre_interned() {
        let interner = StringInterner::new();
        let before = interner.len();

        let define = interner.intern("define");
        let loop_kw = interner.intern("loop");
        let observer = interner.intern("__observer__");

        // Pre-interned, so no growth
        assert_eq!(interner.len(), before);
        assert_eq!(interner.lookup(define), "define");
        assert_eq!(interner.lookup(loop_kw), "loop");
        assert_eq!(interner.lookup(observer), "__observer__");
    }

    #[test]
    fn test_intern_owned() {
        let interner = StringInterner::new();

        let owned = String::from("owned_string");
        let name1 = interner.intern_owned(owned);

        let name2 = interner.intern("owned_string");
        assert_eq!(name1, name2);
        assert_eq!(interner.lookup(name1), "owned_string");
    }

    #[test]
    fn test_intern_owned_already_interned() {
        let interner = StringInterner::new();

        let name1 = interner.intern("test_string");
        let name2 = interner.intern_owned(String::from("test_string"));
        assert_eq!(name1, name2);
    }

    #[test]
    fn test_lookup_outlives_guard() {
        let interner = StringInterner::new();
        let name = interner.intern("durable");
        let s: &'static str = interner.lookup(name);
        drop(interner);
        assert_eq!(s, "durable");
    }
}
