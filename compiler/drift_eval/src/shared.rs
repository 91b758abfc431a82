//! Shared mutable handles.
//!
//! Drift has two aliased mutable structures: scope chains (a child scope
//! keeps its parent alive) and lists (`b is a` makes both names refer to one
//! list, and `append` through either is visible through both). `Shared<T>`
//! is the single-threaded handle used for both.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A cheaply cloneable handle to interior-mutable data.
///
/// Cloning clones the handle, not the value; all clones observe the same
/// underlying `T`.
#[repr(transparent)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    /// Borrow the inner value immutably.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrow the inner value mutably.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether two handles refer to the same underlying value.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&self.0).finish()
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Shared::new(T::default())
    }
}
