//! Lexical scope chain.
//!
//! Scopes form a parent chain: the global scope at the root, one child per
//! function call or comprehension element. Lookup walks the chain outward.
//! Assignment overwrites the nearest existing binding and only defines a
//! new one in the innermost scope when no scope binds the name, which is
//! what lets a function body rebind an outer variable in place.

use rustc_hash::FxHashMap;

use drift_ir::Name;

use crate::shared::Shared;
use crate::value::Value;

/// One scope: local bindings plus an optional parent.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<Shared<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: None,
        }
    }

    pub fn with_parent(parent: Shared<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Define or overwrite a binding in this scope only.
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Look a name up through the chain, cloning the bound value.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        let mut current = self.parent.clone();
        while let Some(scope) = current {
            if let Some(value) = scope.borrow().bindings.get(&name) {
                return Some(value.clone());
            }
            let parent = scope.borrow().parent.clone();
            current = parent;
        }
        None
    }
}

impl Shared<Scope> {
    /// New empty scope chained under this one.
    pub fn child(&self) -> Shared<Scope> {
        Shared::new(Scope::with_parent(self.clone()))
    }

    /// Assignment: overwrite the nearest scope binding `name`, or define it
    /// in this scope when the whole chain misses.
    pub fn set(&self, name: Name, value: Value) {
        let mut current = self.clone();
        loop {
            if current.borrow().bindings.contains_key(&name) {
                current.borrow_mut().bindings.insert(name, value);
                return;
            }
            let parent = current.borrow().parent.clone();
            match parent {
                Some(scope) => current = scope,
                None => break,
            }
        }
        self.borrow_mut().bindings.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use drift_ir::StringInterner;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn define_and_lookup_in_one_scope() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let scope = Shared::new(Scope::new());
        scope.borrow_mut().define(x, Value::num(1.0));
        assert_eq!(scope.borrow().lookup(x), Some(Value::num(1.0)));
        assert_eq!(scope.borrow().lookup(interner.intern("y")), None);
    }

    #[test]
    fn lookup_walks_the_parent_chain() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let root = Shared::new(Scope::new());
        root.borrow_mut().define(x, Value::text("outer"));
        let inner = root.child().child();
        assert_eq!(inner.borrow().lookup(x), Some(Value::text("outer")));
    }

    #[test]
    fn local_definition_shadows_the_parent() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let root = Shared::new(Scope::new());
        root.borrow_mut().define(x, Value::num(1.0));
        let child = root.child();
        child.borrow_mut().define(x, Value::num(2.0));
        assert_eq!(child.borrow().lookup(x), Some(Value::num(2.0)));
        assert_eq!(root.borrow().lookup(x), Some(Value::num(1.0)));
    }

    #[test]
    fn set_overwrites_the_nearest_existing_binding() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let root = Shared::new(Scope::new());
        root.borrow_mut().define(x, Value::num(1.0));
        let child = root.child();
        child.set(x, Value::num(5.0));
        assert_eq!(root.borrow().lookup(x), Some(Value::num(5.0)));
        // the child gained no local copy: dropping to the root still sees 5
        child.borrow_mut().define(x, Value::num(9.0));
        assert_eq!(root.borrow().lookup(x), Some(Value::num(5.0)));
    }

    #[test]
    fn set_defines_locally_when_the_chain_misses() {
        let interner = StringInterner::new();
        let y = interner.intern("y");
        let root = Shared::new(Scope::new());
        let child = root.child();
        child.set(y, Value::num(7.0));
        assert_eq!(child.borrow().lookup(y), Some(Value::num(7.0)));
        assert_eq!(root.borrow().lookup(y), None);
    }
}
