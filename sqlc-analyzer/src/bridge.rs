use sqlc_ast::{DataType, Literal, LiteralValue};
use sqlc_types::{Type, Unifier};

/// Maps a declared column/cast type to the inference universe: the storage
/// type name becomes a `Nominal`, with the `USING <Adapter>` tag carried
/// through and `AS <HostType>` overriding the nominal name itself (the host
/// type is what the rest of the pipeline reasons about; the original SQL
/// storage name is only needed for STRICT-set validation, which happens
/// before this bridge runs).
pub fn data_type_to_type(data_type: &DataType) -> Type {
    let name = match &data_type.host_type {
        Some(host) => host.value.clone(),
        None => data_type.name.value.to_ascii_uppercase(),
    };
    let adapter = data_type.adapter.as_ref().map(|a| a.value.clone());
    Type::Nominal { name, adapter }
}

/// Maps a literal to its type (spec.md §4.4).
pub fn literal_to_type(literal: &Literal, unifier: &mut Unifier) -> Type {
    match &literal.value {
        LiteralValue::Integer(_) => Type::integer(),
        LiteralValue::Real(_) => Type::real(),
        LiteralValue::String(_) => Type::text(),
        LiteralValue::Blob(_) => Type::blob(),
        LiteralValue::Null => unifier.new_var().optional(),
        LiteralValue::True | LiteralValue::False => Type::bool_literal(),
        LiteralValue::CurrentTime | LiteralValue::CurrentDate | LiteralValue::CurrentTimestamp => {
            Type::text()
        }
    }
}

/// The fixed `STRICT` storage type set (spec.md §4.3).
pub fn is_strict_type_name(name: &str) -> bool {
    matches!(
        name.to_ascii_uppercase().as_str(),
        "INT" | "INTEGER" | "TEXT" | "BLOB" | "REAL" | "ANY"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlc_diagnostics::Span;
    use sqlc_ast::Ident;

    fn dt(name: &str, host: Option<&str>, adapter: Option<&str>) -> DataType {
        DataType {
            name: Ident::new(name, Span::new(0, 0)),
            args: Vec::new(),
            host_type: host.map(|h| Ident::new(h, Span::new(0, 0))),
            adapter: adapter.map(|a| Ident::new(a, Span::new(0, 0))),
            span: Span::new(0, 0),
        }
    }

    #[test]
    fn plain_storage_type_becomes_uppercase_nominal() {
        let ty = data_type_to_type(&dt("integer", None, None));
        assert_eq!(ty, Type::integer());
    }

    #[test]
    fn host_type_overrides_nominal_name_and_keeps_adapter() {
        let ty = data_type_to_type(&dt("INTEGER", Some("Bool"), Some("BoolAdapter")));
        assert_eq!(
            ty,
            Type::Nominal { name: "Bool".into(), adapter: Some("BoolAdapter".into()) }
        );
    }

    #[test]
    fn strict_set_is_case_insensitive() {
        assert!(is_strict_type_name("text"));
        assert!(!is_strict_type_name("DECIMAL"));
    }
}
