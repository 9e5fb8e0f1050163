use sqlc_ast::{Expr, LiteralValue};

/// The subset of `PRAGMA` directives the compiler recognizes and acts on.
/// Every other pragma name is accepted and ignored (SQLite has dozens of
/// directives with no bearing on static analysis).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PragmaSettings {
    /// `PRAGMA require_strict_tables = TRUE`: when set, a `CREATE TABLE`
    /// without `STRICT` is diagnosed.
    pub require_strict_tables: bool,
    /// `PRAGMA foreign_keys = ...`: recorded but has no effect on analysis,
    /// matching spec's note that it "passes through without effect here".
    pub foreign_keys: bool,
}

/// Reads a pragma value as a boolean, defaulting to `false` for anything
/// that isn't a recognizable truthy literal (`TRUE`, a nonzero integer).
pub fn pragma_bool(value: Option<&Expr>) -> bool {
    match value {
        Some(Expr::Literal(lit)) => match &lit.value {
            LiteralValue::True => true,
            LiteralValue::False => false,
            LiteralValue::Integer(s) => s.parse::<i64>().map(|n| n != 0).unwrap_or(false),
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlc_ast::Literal;
    use sqlc_diagnostics::Span;

    fn lit(value: LiteralValue) -> Expr {
        Expr::Literal(Literal {
            value,
            span: Span::empty_at(0),
        })
    }

    #[test]
    fn recognizes_true_false_and_integers() {
        assert!(pragma_bool(Some(&lit(LiteralValue::True))));
        assert!(!pragma_bool(Some(&lit(LiteralValue::False))));
        assert!(pragma_bool(Some(&lit(LiteralValue::Integer("1".into())))));
        assert!(!pragma_bool(Some(&lit(LiteralValue::Integer("0".into())))));
        assert!(!pragma_bool(None));
    }
}
