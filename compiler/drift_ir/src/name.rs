//! Interned string identifier.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Interned string identifier.
///
/// A `Name` is a 32-bit index into the [`StringInterner`](crate::StringInterner)
/// pool. Two names compare equal iff their strings are identical, making
/// identifier comparison O(1) throughout the runtime.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Index into the interner pool.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Hash for Name {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
