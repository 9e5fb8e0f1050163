use std::collections::HashMap;

use crate::scheme::TypeScheme;

/// A single lexical scope: one frame of an [`Environment`]'s stack.
#[derive(Default, Debug)]
struct Scope {
    entries: HashMap<String, TypeScheme>,
}

/// A stacked, insertion-ordered mapping used while type-checking an
/// expression (spec.md §3). Defining a name that already exists *in the
/// same scope* does not overwrite it — it flags the existing entry
/// `ambiguous`, so any later unqualified lookup of that name fails with a
/// dedicated diagnostic while a qualified lookup (which bypasses the
/// environment and goes straight to the schema) still works.
///
/// Pushing a new scope models entering a correlated subquery: its own
/// columns shadow the outer query's, but lookups that miss in the inner
/// scope still fall through to the outer one.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self { scopes: vec![Scope::default()] }
    }
}

impl Environment {
    /// An environment with a single, empty top-level scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a fresh, empty scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pops the innermost scope. Panics if called with only the root scope
    /// left, which would indicate a push/pop mismatch in the caller.
    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "popped the root environment scope");
        self.scopes.pop();
    }

    /// Binds `name` to `scheme` in the innermost scope. A second `define`
    /// of the same name in the same scope marks the existing binding
    /// ambiguous rather than replacing it, so the first type is kept for
    /// diagnostics (e.g. "ambiguous" errors still mention a concrete type).
    pub fn define(&mut self, name: impl Into<String>, scheme: TypeScheme) {
        let name = name.into();
        let scope = self.scopes.last_mut().expect("environment always has a scope");
        match scope.entries.get_mut(&name) {
            Some(existing) => existing.ambiguous = true,
            None => {
                scope.entries.insert(name, scheme);
            }
        }
    }

    /// Looks up `name`, searching from the innermost scope outward and
    /// stopping at the first scope that defines it (inner scopes shadow
    /// outer ones; they do not merge).
    pub fn lookup(&self, name: &str) -> Option<&TypeScheme> {
        self.scopes.iter().rev().find_map(|scope| scope.entries.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Type;

    #[test]
    fn duplicate_define_in_same_scope_marks_ambiguous() {
        let mut env = Environment::new();
        env.define("id", TypeScheme::monomorphic(Type::integer()));
        env.define("id", TypeScheme::monomorphic(Type::text()));
        let scheme = env.lookup("id").unwrap();
        assert!(scheme.ambiguous);
        assert_eq!(scheme.ty, Type::integer(), "the first definition's type is retained");
    }

    #[test]
    fn inner_scope_shadows_without_merging() {
        let mut env = Environment::new();
        env.define("x", TypeScheme::monomorphic(Type::integer()));
        env.push_scope();
        env.define("x", TypeScheme::monomorphic(Type::text()));
        assert_eq!(env.lookup("x").unwrap().ty, Type::text());
        assert!(!env.lookup("x").unwrap().ambiguous);
        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap().ty, Type::integer());
    }

    #[test]
    fn lookup_falls_through_to_outer_scope() {
        let mut env = Environment::new();
        env.define("y", TypeScheme::monomorphic(Type::real()));
        env.push_scope();
        assert_eq!(env.lookup("y").unwrap().ty, Type::real());
    }
}
