use std::fmt;

/// Opaque identifier for an inference variable, indexing into a
/// [`crate::Unifier`]'s binding table.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeVarId(pub(crate) u32);

/// The shape of a `Row` type: either a named, ordered sequence of
/// `(name, type)` pairs (a query's output columns, a table's columns in
/// scope) or a positional sequence with no names (a `VALUES` row).
///
/// `Named` preserves duplicate names rather than rejecting them — the same
/// column name can appear twice after a join, and detecting that is the
/// analyzer's job, not this container's.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowShape {
    /// An ordered `(name, type)` sequence.
    Named(Vec<(String, Type)>),
    /// An ordered, unnamed sequence (e.g. a `VALUES (...)` tuple).
    Fixed(Vec<Type>),
}

/// The inference universe (spec.md §3).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    /// A declared SQL storage type (`INTEGER`, `TEXT`, ...) or a
    /// host-language type introduced by `AS <Name>`, optionally tagged with
    /// the `USING <Adapter>` name that maps it to/from storage.
    Nominal {
        /// The type's name, e.g. `INTEGER` or a host type like `UserId`.
        name: String,
        /// The `USING <Adapter>` tag, if any.
        adapter: Option<String>,
    },
    /// A nullable wrapper.
    Optional(Box<Type>),
    /// An unresolved inference variable.
    Var(TypeVarId),
    /// A function signature. `variadic` means the final entry in `params`
    /// repeats to match the call's actual arity.
    Fn {
        /// The parameter types, as declared (before variadic expansion).
        params: Vec<Type>,
        /// The return type.
        ret: Box<Type>,
        /// Whether the trailing parameter is variadic.
        variadic: bool,
    },
    /// A row of named or positional columns.
    Row(RowShape),
    /// The propagating error type: unifies with anything, silently.
    Error,
}

impl Type {
    /// `INTEGER`.
    pub fn integer() -> Self {
        Type::nominal("INTEGER")
    }

    /// `REAL`.
    pub fn real() -> Self {
        Type::nominal("REAL")
    }

    /// `TEXT`.
    pub fn text() -> Self {
        Type::nominal("TEXT")
    }

    /// `BLOB`.
    pub fn blob() -> Self {
        Type::nominal("BLOB")
    }

    /// `ANY`, the type that unifies with everything.
    pub fn any() -> Self {
        Type::nominal("ANY")
    }

    /// `TRUE`/`FALSE` literals: stored as `INTEGER` (0/1) but tagged so a
    /// code generator can still emit a host boolean.
    pub fn bool_literal() -> Self {
        Type::Nominal {
            name: "INTEGER".into(),
            adapter: Some("Bool".into()),
        }
    }

    /// A plain nominal type with no adapter tag.
    pub fn nominal(name: impl Into<String>) -> Self {
        Type::Nominal {
            name: name.into(),
            adapter: None,
        }
    }

    /// Wraps `self` in `Optional` unless it already is one.
    pub fn optional(self) -> Self {
        match self {
            Type::Optional(_) => self,
            other => Type::Optional(Box::new(other)),
        }
    }

    /// The type with any `Optional` wrapper stripped.
    pub fn strip_optional(&self) -> &Type {
        match self {
            Type::Optional(inner) => inner.strip_optional(),
            other => other,
        }
    }

    /// Whether this type is `Optional(_)` at the top level.
    pub fn is_optional(&self) -> bool {
        matches!(self, Type::Optional(_))
    }

    /// True for the case-insensitive nominal name `ANY` with no adapter.
    pub fn is_any(&self) -> bool {
        matches!(self, Type::Nominal { name, adapter: None } if name.eq_ignore_ascii_case("ANY"))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Nominal { name, adapter: None } => write!(f, "{name}"),
            Type::Nominal { name, adapter: Some(a) } => write!(f, "{name} USING {a}"),
            Type::Optional(inner) => write!(f, "Optional<{inner}>"),
            Type::Var(id) => write!(f, "?{}", id.0),
            Type::Fn { params, ret, variadic } => {
                write!(f, "fn(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                    if *variadic && i == params.len() - 1 {
                        write!(f, "...")?;
                    }
                }
                write!(f, ") -> {ret}")
            }
            Type::Row(RowShape::Named(cols)) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in cols.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, "}}")
            }
            Type::Row(RowShape::Fixed(cols)) => {
                write!(f, "(")?;
                for (i, ty) in cols.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, ")")
            }
            Type::Error => write!(f, "<error>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_does_not_double_wrap() {
        let t = Type::integer().optional().optional();
        assert_eq!(t, Type::Optional(Box::new(Type::integer())));
    }

    #[test]
    fn display_formats_nominal_with_adapter() {
        let t = Type::Nominal {
            name: "INTEGER".into(),
            adapter: Some("Bool".into()),
        };
        assert_eq!(t.to_string(), "INTEGER USING Bool");
    }

    #[test]
    fn strip_optional_unwraps_nested() {
        let t = Type::integer().optional().optional();
        assert_eq!(*t.strip_optional(), Type::integer());
    }
}
