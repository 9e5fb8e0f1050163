use std::collections::HashMap;

use crate::ty::{RowShape, Type, TypeVarId};
use crate::unify::Unifier;

/// `∀ vars . Type`, plus the two flags spec.md §3 calls for: `variadic`
/// (the catalog entry's trailing parameter repeats to fill the call's
/// arity) and `ambiguous` (this name resolved to more than one entry in the
/// environment it was looked up in).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeScheme {
    /// The variables this scheme is generic over; each call/reference gets
    /// fresh ones via [`TypeScheme::instantiate`].
    pub vars: Vec<TypeVarId>,
    /// The scheme's type, possibly mentioning `vars`.
    pub ty: Type,
    /// Whether the scheme's trailing parameter type repeats to match an
    /// actual call's arity (`Type::Fn` schemes only).
    pub variadic: bool,
    /// Whether this scheme represents a name that resolved to more than one
    /// environment entry; referencing it unqualified is a type error.
    pub ambiguous: bool,
}

impl TypeScheme {
    /// A scheme with no bound variables: referencing it always yields `ty` verbatim.
    pub fn monomorphic(ty: Type) -> Self {
        Self {
            vars: Vec::new(),
            ty,
            variadic: false,
            ambiguous: false,
        }
    }

    /// A monomorphic scheme flagged as ambiguous (used when a duplicate
    /// definition is recorded in an [`crate::Environment`]).
    pub fn ambiguous(ty: Type) -> Self {
        Self {
            ambiguous: true,
            ..Self::monomorphic(ty)
        }
    }

    /// Marks this scheme's trailing parameter as variadic.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Generalizes `ty` over `vars`.
    pub fn polymorphic(vars: Vec<TypeVarId>, ty: Type) -> Self {
        Self {
            vars,
            ty,
            variadic: false,
            ambiguous: false,
        }
    }

    /// Replaces every bound variable with a fresh one, for use at a single
    /// call/reference site.
    pub fn instantiate(&self, unifier: &mut Unifier) -> Type {
        if self.vars.is_empty() {
            return self.ty.clone();
        }
        let subst: HashMap<TypeVarId, Type> = self
            .vars
            .iter()
            .map(|v| (*v, unifier.new_var()))
            .collect();
        substitute(&self.ty, &subst)
    }

    /// If this is a `Fn` scheme, the parameter types expanded so the list
    /// has exactly `arity` entries (replicating the last parameter when
    /// `variadic` and `arity` exceeds the declared parameter count).
    pub fn params_for_arity(&self, arity: usize) -> Option<Vec<Type>> {
        let Type::Fn { params, .. } = &self.ty else {
            return None;
        };
        if !self.variadic {
            return (params.len() == arity).then(|| params.clone());
        }
        let last = params.last()?.clone();
        if arity < params.len() - 1 {
            return None;
        }
        let mut expanded = params[..params.len() - 1].to_vec();
        expanded.extend(std::iter::repeat(last).take(arity - expanded.len()));
        Some(expanded)
    }
}

fn substitute(ty: &Type, subst: &HashMap<TypeVarId, Type>) -> Type {
    match ty {
        Type::Var(id) => subst.get(id).cloned().unwrap_or_else(|| ty.clone()),
        Type::Optional(inner) => Type::Optional(Box::new(substitute(inner, subst))),
        Type::Fn { params, ret, variadic } => Type::Fn {
            params: params.iter().map(|p| substitute(p, subst)).collect(),
            ret: Box::new(substitute(ret, subst)),
            variadic: *variadic,
        },
        Type::Row(RowShape::Named(cols)) => Type::Row(RowShape::Named(
            cols.iter().map(|(n, t)| (n.clone(), substitute(t, subst))).collect(),
        )),
        Type::Row(RowShape::Fixed(cols)) => {
            Type::Row(RowShape::Fixed(cols.iter().map(|t| substitute(t, subst)).collect()))
        }
        Type::Nominal { .. } | Type::Error => ty.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiate_monomorphic_scheme_is_identity() {
        let mut unifier = Unifier::new();
        let scheme = TypeScheme::monomorphic(Type::integer());
        assert_eq!(scheme.instantiate(&mut unifier), Type::integer());
    }

    #[test]
    fn instantiate_polymorphic_scheme_produces_fresh_vars() {
        let mut unifier = Unifier::new();
        let v = unifier.new_var_id();
        let scheme = TypeScheme::polymorphic(vec![v], Type::Fn {
            params: vec![Type::Var(v)],
            ret: Box::new(Type::Var(v)),
            variadic: false,
        });
        let a = scheme.instantiate(&mut unifier);
        let b = scheme.instantiate(&mut unifier);
        assert_ne!(a, b, "each instantiation should mint fresh variables");
    }

    #[test]
    fn variadic_params_expand_to_requested_arity() {
        let scheme = TypeScheme {
            vars: Vec::new(),
            ty: Type::Fn {
                params: vec![Type::integer()],
                ret: Type::integer().into(),
                variadic: true,
            },
            variadic: true,
            ambiguous: false,
        };
        let expanded = scheme.params_for_arity(3).unwrap();
        assert_eq!(expanded, vec![Type::integer(), Type::integer(), Type::integer()]);
    }
}
