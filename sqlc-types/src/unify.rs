use crate::ty::{RowShape, Type, TypeVarId};

/// Why two types could not be unified.
#[derive(Clone, Debug, thiserror::Error)]
pub enum UnifyError {
    /// The two types have no common instance.
    #[error("unable to unify types '{left}' and '{right}'")]
    Mismatch {
        /// The left operand's type, as resolved at the point of failure.
        left: String,
        /// The right operand's type, as resolved at the point of failure.
        right: String,
    },
    /// Binding a variable to a type that contains that same variable would
    /// produce an infinite type.
    #[error("cannot construct an infinite type")]
    OccursCheck,
    /// Two `Row` shapes of different kinds or lengths were compared.
    #[error("row shapes are not compatible")]
    RowShapeMismatch,
}

/// A union-find substitution over inference variables (spec.md §9): each
/// variable is either unbound or bound to a `Type` (which may itself
/// mention other variables, hence "union-find" rather than a flat map —
/// resolving follows chains with path compression).
#[derive(Clone, Debug, Default)]
pub struct Unifier {
    bindings: Vec<Option<Type>>,
}

impl Unifier {
    /// A unifier with no variables allocated yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh variable and returns it wrapped as `Type::Var`.
    pub fn new_var(&mut self) -> Type {
        Type::Var(self.new_var_id())
    }

    /// Allocates a fresh variable id.
    pub fn new_var_id(&mut self) -> TypeVarId {
        let id = TypeVarId(self.bindings.len() as u32);
        self.bindings.push(None);
        id
    }

    /// Follows variable bindings (with path compression) until reaching an
    /// unbound variable or a non-variable type. Does not recurse into
    /// compound types (`Optional`, `Fn`, `Row` are returned as-is once their
    /// own head is resolved).
    pub fn resolve(&mut self, ty: &Type) -> Type {
        let mut current = ty.clone();
        let mut chain = Vec::new();
        loop {
            match current {
                Type::Var(id) => match self.bindings[id.0 as usize].clone() {
                    Some(bound) => {
                        chain.push(id);
                        current = bound;
                    }
                    None => break,
                },
                _ => break,
            }
        }
        for id in chain {
            self.bindings[id.0 as usize] = Some(current.clone());
        }
        current
    }

    /// Fully resolves `ty`, recursing into every compound position so the
    /// result contains no bound variables (only genuinely free ones).
    pub fn resolve_deep(&mut self, ty: &Type) -> Type {
        let head = self.resolve(ty);
        match head {
            Type::Optional(inner) => Type::Optional(Box::new(self.resolve_deep(&inner))),
            Type::Fn { params, ret, variadic } => Type::Fn {
                params: params.iter().map(|p| self.resolve_deep(p)).collect(),
                ret: Box::new(self.resolve_deep(&ret)),
                variadic,
            },
            Type::Row(RowShape::Named(cols)) => Type::Row(RowShape::Named(
                cols.into_iter().map(|(n, t)| (n, self.resolve_deep(&t))).collect(),
            )),
            Type::Row(RowShape::Fixed(cols)) => {
                Type::Row(RowShape::Fixed(cols.into_iter().map(|t| self.resolve_deep(&t)).collect()))
            }
            other => other,
        }
    }

    fn bind(&mut self, id: TypeVarId, ty: Type) -> Result<(), UnifyError> {
        if self.occurs(id, &ty) {
            return Err(UnifyError::OccursCheck);
        }
        self.bindings[id.0 as usize] = Some(ty);
        Ok(())
    }

    fn occurs(&mut self, id: TypeVarId, ty: &Type) -> bool {
        match self.resolve(ty) {
            Type::Var(other) => other == id,
            Type::Optional(inner) => self.occurs(id, &inner),
            Type::Fn { params, ret, .. } => {
                params.iter().any(|p| self.occurs(id, p)) || self.occurs(id, &ret)
            }
            Type::Row(RowShape::Named(cols)) => cols.iter().any(|(_, t)| self.occurs(id, t)),
            Type::Row(RowShape::Fixed(cols)) => cols.iter().any(|t| self.occurs(id, t)),
            Type::Nominal { .. } | Type::Error => false,
        }
    }

    /// Unifies `a` and `b`, returning the (possibly more specific) unified
    /// type. `Error` unifies with anything and always wins (it keeps
    /// propagating so one failure doesn't cascade into unrelated
    /// diagnostics); `ANY` unifies with anything and yields the other side.
    pub fn unify(&mut self, a: &Type, b: &Type) -> Result<Type, UnifyError> {
        let a = self.resolve(a);
        let b = self.resolve(b);
        if a.is_any() {
            return Ok(b);
        }
        if b.is_any() {
            return Ok(a);
        }
        let mismatch = || UnifyError::Mismatch { left: a.to_string(), right: b.to_string() };
        match (a.clone(), b.clone()) {
            (Type::Error, _) | (_, Type::Error) => Ok(Type::Error),
            (Type::Var(id), Type::Var(other_id)) if id == other_id => Ok(a),
            (Type::Var(id), other) => {
                self.bind(id, other.clone())?;
                Ok(other)
            }
            (other, Type::Var(id)) => {
                self.bind(id, other.clone())?;
                Ok(other)
            }
            (Type::Optional(inner_a), Type::Optional(inner_b)) => {
                Ok(self.unify(&inner_a, &inner_b)?.optional())
            }
            (Type::Optional(inner), other) | (other, Type::Optional(inner)) => {
                Ok(self.unify(&inner, &other)?.optional())
            }
            (Type::Nominal { name: n1, adapter: a1 }, Type::Nominal { name: n2, adapter: a2 }) => {
                if n1.eq_ignore_ascii_case(&n2) {
                    Ok(Type::Nominal { name: n1, adapter: a1.or(a2) })
                } else {
                    Err(mismatch())
                }
            }
            (
                Type::Fn { params: p1, ret: r1, variadic: v1 },
                Type::Fn { params: p2, ret: r2, variadic: v2 },
            ) => {
                if p1.len() != p2.len() {
                    return Err(mismatch());
                }
                let mut params = Vec::with_capacity(p1.len());
                for (x, y) in p1.iter().zip(p2.iter()) {
                    params.push(self.unify(x, y)?);
                }
                let ret = Box::new(self.unify(&r1, &r2)?);
                Ok(Type::Fn { params, ret, variadic: v1 && v2 })
            }
            (Type::Row(RowShape::Fixed(c1)), Type::Row(RowShape::Fixed(c2))) => {
                if c1.len() != c2.len() {
                    return Err(UnifyError::RowShapeMismatch);
                }
                let mut unified = Vec::with_capacity(c1.len());
                for (x, y) in c1.iter().zip(c2.iter()) {
                    unified.push(self.unify(x, y)?);
                }
                Ok(Type::Row(RowShape::Fixed(unified)))
            }
            (Type::Row(RowShape::Named(c1)), Type::Row(RowShape::Named(c2))) => {
                if c1.len() != c2.len() {
                    return Err(UnifyError::RowShapeMismatch);
                }
                let mut unified = Vec::with_capacity(c1.len());
                for ((name, x), (_, y)) in c1.iter().zip(c2.iter()) {
                    unified.push((name.clone(), self.unify(x, y)?));
                }
                Ok(Type::Row(RowShape::Named(unified)))
            }
            _ => Err(mismatch()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_unifies_and_binds() {
        let mut u = Unifier::new();
        let v = u.new_var();
        let unified = u.unify(&v, &Type::integer()).unwrap();
        assert_eq!(unified, Type::integer());
        assert_eq!(u.resolve(&v), Type::integer());
    }

    #[test]
    fn optional_widens_non_null_side() {
        let mut u = Unifier::new();
        let unified = u.unify(&Type::integer(), &Type::integer().optional()).unwrap();
        assert_eq!(unified, Type::integer().optional());
    }

    #[test]
    fn any_unifies_with_anything_producing_other_side() {
        let mut u = Unifier::new();
        assert_eq!(u.unify(&Type::any(), &Type::text()).unwrap(), Type::text());
        assert_eq!(u.unify(&Type::blob(), &Type::any()).unwrap(), Type::blob());
    }

    #[test]
    fn error_unifies_with_anything_silently() {
        let mut u = Unifier::new();
        assert_eq!(u.unify(&Type::Error, &Type::text()).unwrap(), Type::Error);
    }

    #[test]
    fn mismatched_nominal_types_fail() {
        let mut u = Unifier::new();
        assert!(u.unify(&Type::integer(), &Type::text()).is_err());
    }

    #[test]
    fn occurs_check_rejects_infinite_type() {
        let mut u = Unifier::new();
        let v = u.new_var();
        let id = match v {
            Type::Var(id) => id,
            _ => unreachable!(),
        };
        let cyclic = Type::Optional(Box::new(v.clone()));
        assert!(matches!(u.unify(&v, &cyclic), Err(UnifyError::OccursCheck)));
        let _ = id;
    }

    #[test]
    fn fixed_rows_unify_pairwise_by_position() {
        let mut u = Unifier::new();
        let left = Type::Row(RowShape::Fixed(vec![Type::integer(), Type::text()]));
        let right = Type::Row(RowShape::Fixed(vec![Type::integer(), Type::text()]));
        assert_eq!(u.unify(&left, &right).unwrap(), left);
    }
}
