//! Lexical scopes for variable bindings.
//!
//! A scope is a name → value store plus an optional link to the enclosing scope.
//! Lookups walk the chain from the innermost scope outward, so inner bindings
//! shadow outer ones:
//! ```text
//! let x = 1;
//! let f = fn() { let x = 2; x };   // `x` inside `f` is 2
//! ```
//!
//! Scopes are allocated in the same arena as the values they hold. A closure keeps a
//! reference to the scope it was defined in, and that scope may in turn bind the
//! closure itself (recursive functions), so scope graphs can contain cycles through
//! values. The chain of `outer` links alone is always acyclic.

use bumpalo::Bump;
use core::cell::RefCell;
use core::fmt;
use hashbrown::{DefaultHashBuilder, HashMap};

use crate::values::Value;

pub struct Scope<'a> {
    store: RefCell<HashMap<&'a str, &'a Value<'a>, DefaultHashBuilder, &'a Bump>>,
    outer: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    /// Allocate a new outermost scope.
    pub fn new(arena: &'a Bump) -> &'a Scope<'a> {
        arena.alloc(Scope {
            store: RefCell::new(HashMap::new_in(arena)),
            outer: None,
        })
    }

    /// Allocate a new scope enclosed by `outer`.
    pub fn enclosed(arena: &'a Bump, outer: &'a Scope<'a>) -> &'a Scope<'a> {
        arena.alloc(Scope {
            store: RefCell::new(HashMap::new_in(arena)),
            outer: Some(outer),
        })
    }

    pub fn outer(&self) -> Option<&'a Scope<'a>> {
        self.outer
    }

    /// Look up a name, searching from this scope outward.
    pub fn get(&self, name: &str) -> Option<&'a Value<'a>> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(value) = current.store.borrow().get(name) {
                return Some(*value);
            }
            scope = current.outer.map(|outer| outer as &Scope<'a>);
        }
        None
    }

    /// Bind `name` in this scope, replacing any previous binding of the same name.
    pub fn set(&self, name: &'a str, value: &'a Value<'a>) {
        self.store.borrow_mut().insert(name, value);
    }

    /// The bindings of this scope only (not its outer scopes), sorted by name.
    pub fn bindings(&self) -> Vec<(&'a str, &'a Value<'a>)> {
        let mut bindings: Vec<_> = self
            .store
            .borrow()
            .iter()
            .map(|(name, value)| (*name, *value))
            .collect();
        bindings.sort_unstable_by_key(|(name, _)| *name);
        bindings
    }

    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }

    /// Whether `value` (by identity) is bound to some name in this scope's own store.
    pub fn contains_value(&self, value: &Value<'a>) -> bool {
        self.store.borrow().values().any(|bound| bound.is(value))
    }

    /// Whether `value` (by identity) is bound anywhere along the chain starting here.
    ///
    /// Terminates because the `outer` links form a chain rooted at an outermost scope.
    pub fn chain_contains(&self, value: &Value<'a>) -> bool {
        self.chain().any(|scope| scope.contains_value(value))
    }

    /// This scope followed by each enclosing scope, innermost first.
    pub fn chain(&self) -> impl Iterator<Item = &Scope<'a>> {
        core::iter::successors(Some(self), |scope| {
            scope.outer.map(|outer| outer as &Scope<'a>)
        })
    }

    /// Identity comparison.
    pub fn is(&self, other: &Scope<'a>) -> bool {
        core::ptr::eq(self, other)
    }
}

// Bound values may be closures referring back to this scope, so only names are shown.
impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.bindings().into_iter().map(|(name, _)| name).collect();
        f.debug_struct("Scope")
            .field("names", &names)
            .field("has_outer", &self.outer.is_some())
            .finish()
    }
}
