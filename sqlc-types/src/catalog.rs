use crate::scheme::TypeScheme;
use crate::ty::Type;
use crate::unify::Unifier;

/// A builder for an operator's or function's type scheme. Taking the
/// [`Unifier`] lets a generic entry (e.g. `+`, which is `T, T -> T` for
/// whatever `T` the call site supplies) mint its own fresh variable rather
/// than the catalog owning variable ids that could collide across
/// unrelated compilations.
pub type SchemeBuilder = fn(&mut Unifier) -> TypeScheme;

/// A catalog entry for a named function: its scheme plus an optional
/// static advisory emitted whenever the function is called, independent of
/// the actual argument types (spec.md §4.4's "explicit warnings").
#[derive(Clone, Copy)]
pub struct CatalogFunction {
    /// Builds the function's type scheme against a fresh [`Unifier`].
    pub scheme: SchemeBuilder,
    /// A warning to attach to every call, if any (e.g. `strftime`'s
    /// encouragement to prefer `unixepoch()`).
    pub warning: Option<&'static str>,
}

fn generic_same_type(u: &mut Unifier) -> TypeScheme {
    let v = u.new_var_id();
    TypeScheme::polymorphic(
        vec![v],
        Type::Fn {
            params: vec![Type::Var(v), Type::Var(v)],
            ret: Box::new(Type::Var(v)),
            variadic: false,
        },
    )
}

fn generic_comparison(u: &mut Unifier) -> TypeScheme {
    let v = u.new_var_id();
    TypeScheme::polymorphic(
        vec![v],
        Type::Fn {
            params: vec![Type::Var(v), Type::Var(v)],
            ret: Box::new(Type::bool_literal()),
            variadic: false,
        },
    )
}

fn logical(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![Type::bool_literal(), Type::bool_literal()],
        ret: Box::new(Type::bool_literal()),
        variadic: false,
    })
}

fn unary_not(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![Type::bool_literal()],
        ret: Box::new(Type::bool_literal()),
        variadic: false,
    })
}

fn generic_unary_same_type(u: &mut Unifier) -> TypeScheme {
    let v = u.new_var_id();
    TypeScheme::polymorphic(
        vec![v],
        Type::Fn {
            params: vec![Type::Var(v)],
            ret: Box::new(Type::Var(v)),
            variadic: false,
        },
    )
}

fn text_comparison(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![Type::text(), Type::text()],
        ret: Box::new(Type::bool_literal()),
        variadic: false,
    })
}

fn concat(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![Type::text(), Type::text()],
        ret: Box::new(Type::text()),
        variadic: false,
    })
}

fn json_extract(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![Type::any(), Type::text()],
        ret: Box::new(Type::any()),
        variadic: false,
    })
}

/// A static warning attached to integer `/`; the analyzer checks this
/// specifically when both resolved operand types are `INTEGER`, since the
/// catalog scheme itself has no way to express "only for this operand
/// type".
pub const INTEGER_DIVISION_WARNING: &str =
    "integer division of two INTEGER operands truncates; cast one side to REAL for an exact result";

/// Looks up a binary/unary operator's type scheme by its surface symbol
/// (`"+"`, `"="`, `"AND"`, ...).
pub fn lookup_operator(symbol: &str) -> Option<SchemeBuilder> {
    Some(match symbol {
        "+" | "-" | "*" | "/" | "%" | "&" | "|" | "<<" | ">>" => generic_same_type,
        "<" | "<=" | ">" | ">=" | "=" | "<>" => generic_comparison,
        "AND" | "OR" => logical,
        "NOT" => unary_not,
        "||" => concat,
        "->" | "->>" => json_extract,
        "GLOB" | "MATCH" | "REGEXP" => text_comparison,
        "~" | "UNARY-" | "UNARY+" => generic_unary_same_type,
        _ => return None,
    })
}

fn aggregate_same_type(u: &mut Unifier) -> TypeScheme {
    let v = u.new_var_id();
    TypeScheme::polymorphic(
        vec![v],
        Type::Fn {
            params: vec![Type::Var(v)],
            ret: Box::new(Type::Var(v).optional()),
            variadic: false,
        },
    )
}

fn count_star(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![],
        ret: Box::new(Type::integer()),
        variadic: false,
    })
}

fn count_expr(u: &mut Unifier) -> TypeScheme {
    let v = u.new_var_id();
    TypeScheme::polymorphic(
        vec![v],
        Type::Fn {
            params: vec![Type::Var(v)],
            ret: Box::new(Type::integer()),
            variadic: false,
        },
    )
}

fn avg(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![Type::real()],
        ret: Box::new(Type::real().optional()),
        variadic: false,
    })
}

fn length(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![Type::text()],
        ret: Box::new(Type::integer()),
        variadic: false,
    })
}

fn text_to_text(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![Type::text()],
        ret: Box::new(Type::text()),
        variadic: false,
    })
}

fn coalesce(u: &mut Unifier) -> TypeScheme {
    let v = u.new_var_id();
    TypeScheme::polymorphic(
        vec![v],
        Type::Fn {
            params: vec![Type::Var(v)],
            ret: Box::new(Type::Var(v)),
            variadic: true,
        },
    )
    .variadic()
}

fn typeof_fn(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn {
        params: vec![Type::any()],
        ret: Box::new(Type::text()),
        variadic: false,
    })
}

fn no_args_text(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn { params: vec![], ret: Box::new(Type::text()), variadic: false })
}

fn no_args_integer(_: &mut Unifier) -> TypeScheme {
    TypeScheme::monomorphic(Type::Fn { params: vec![], ret: Box::new(Type::integer()), variadic: false })
}

fn strftime(u: &mut Unifier) -> TypeScheme {
    let v = u.new_var_id();
    TypeScheme::polymorphic(
        vec![v],
        Type::Fn {
            params: vec![Type::text(), Type::Var(v)],
            ret: Box::new(Type::text()),
            variadic: true,
        },
    )
    .variadic()
}

/// Looks up a named function's catalog entry by `(name, arity)`. SQLite
/// function names are case-insensitive; callers should uppercase before
/// looking up (this table's keys are already upper-case).
pub fn lookup_function(name: &str, arity: usize) -> Option<CatalogFunction> {
    let name = name.to_ascii_uppercase();
    match (name.as_str(), arity) {
        ("COUNT", 0) => Some(CatalogFunction { scheme: count_star, warning: None }),
        ("COUNT", 1) => Some(CatalogFunction { scheme: count_expr, warning: None }),
        ("SUM", 1) | ("MIN", 1) | ("MAX", 1) => {
            Some(CatalogFunction { scheme: aggregate_same_type, warning: None })
        }
        ("AVG", 1) => Some(CatalogFunction { scheme: avg, warning: None }),
        ("LENGTH", 1) => Some(CatalogFunction { scheme: length, warning: None }),
        ("LOWER", 1) | ("UPPER", 1) | ("TRIM", 1) | ("LTRIM", 1) | ("RTRIM", 1) | ("HEX", 1) => {
            Some(CatalogFunction { scheme: text_to_text, warning: None })
        }
        ("ABS", 1) | ("ROUND", 1) => {
            Some(CatalogFunction { scheme: generic_unary_same_type, warning: None })
        }
        ("COALESCE", n) | ("IFNULL", n) if n >= 1 => {
            Some(CatalogFunction { scheme: coalesce, warning: None })
        }
        ("TYPEOF", 1) => Some(CatalogFunction { scheme: typeof_fn, warning: None }),
        ("UNIXEPOCH", 0) | ("UNIXEPOCH", 1) => {
            Some(CatalogFunction { scheme: no_args_integer, warning: None })
        }
        ("DATE", _) | ("TIME", _) | ("DATETIME", _) => {
            Some(CatalogFunction { scheme: no_args_text, warning: None })
        }
        ("STRFTIME", n) if n >= 1 => Some(CatalogFunction {
            scheme: strftime,
            warning: Some(
                "strftime(...) returns TEXT; consider unixepoch(...) if a numeric result is wanted",
            ),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_operator_is_generic_over_a_single_type() {
        let mut u = Unifier::new();
        let scheme = lookup_operator("+").unwrap()(&mut u);
        let instantiated = scheme.instantiate(&mut u);
        match instantiated {
            Type::Fn { params, ret, .. } => {
                assert_eq!(params.len(), 2);
                assert_eq!(params[0], params[1]);
                assert_eq!(*ret, params[0]);
            }
            other => panic!("expected a Fn type, got {other:?}"),
        }
    }

    #[test]
    fn comparison_operator_returns_bool_literal() {
        let mut u = Unifier::new();
        let scheme = lookup_operator("=").unwrap()(&mut u);
        match scheme.instantiate(&mut u) {
            Type::Fn { ret, .. } => assert_eq!(*ret, Type::bool_literal()),
            other => panic!("expected a Fn type, got {other:?}"),
        }
    }

    #[test]
    fn count_star_takes_no_arguments() {
        let mut u = Unifier::new();
        let scheme = lookup_function("count", 0).unwrap();
        match (scheme.scheme)(&mut u).ty {
            Type::Fn { params, ret, .. } => {
                assert!(params.is_empty());
                assert_eq!(*ret, Type::integer());
            }
            other => panic!("expected a Fn type, got {other:?}"),
        }
    }

    #[test]
    fn coalesce_is_variadic_and_case_insensitive_lookup() {
        let entry = lookup_function("Coalesce", 3).unwrap();
        let mut u = Unifier::new();
        let scheme = (entry.scheme)(&mut u);
        assert!(scheme.variadic);
        let params = scheme.params_for_arity(3).unwrap();
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn strftime_carries_a_warning() {
        let entry = lookup_function("strftime", 2).unwrap();
        assert!(entry.warning.is_some());
    }

    #[test]
    fn unknown_function_is_absent() {
        assert!(lookup_function("not_a_real_function", 1).is_none());
    }
}
