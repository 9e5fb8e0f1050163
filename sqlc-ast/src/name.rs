use sqlc_diagnostics::{Span, Spanned};

/// An identifier, as it appeared in source: case as written, with its
/// quoting style (if any) recorded so the analyzer can decide whether
/// keyword-reclassification or case-folding applies.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    /// The identifier text, quotes stripped.
    pub value: String,
    /// The quoting style used, if any.
    pub quote: Option<char>,
    /// Source range of the identifier token.
    pub span: Span,
}

impl Ident {
    /// Creates a new unquoted identifier.
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            quote: None,
            span,
        }
    }

    /// The name used for case-insensitive comparisons: lowercased only when
    /// the identifier was not quoted (quoting preserves case in this dialect).
    pub fn canonical(&self) -> String {
        if self.quote.is_some() {
            self.value.clone()
        } else {
            self.value.to_lowercase()
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

/// A possibly schema-qualified name: `table` or `schema.table`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectName {
    /// One (`name`) or two (`schema`, `name`) parts, outermost last.
    pub parts: Vec<Ident>,
}

impl ObjectName {
    /// Creates a single-part name.
    pub fn simple(ident: Ident) -> Self {
        Self { parts: vec![ident] }
    }

    /// The final (unqualified) part, e.g. `table` in `schema.table`.
    pub fn name(&self) -> &Ident {
        self.parts.last().expect("ObjectName always has >= 1 part")
    }

    /// The schema qualifier, if the name was schema-qualified.
    pub fn schema(&self) -> Option<&Ident> {
        if self.parts.len() > 1 {
            self.parts.first()
        } else {
            None
        }
    }

    /// The canonical, dotted, lowercase-folded key used to look up this name
    /// in the schema catalog.
    pub fn canonical(&self) -> String {
        self.parts
            .iter()
            .map(Ident::canonical)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl Spanned for ObjectName {
    fn span(&self) -> Span {
        let first = self.parts.first().expect("ObjectName always has >= 1 part");
        let last = self.parts.last().unwrap();
        first.span.to(last.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_folds_unquoted_case() {
        let id = Ident::new("Foo", Span::new(0, 3));
        assert_eq!(id.canonical(), "foo");
    }

    #[test]
    fn canonical_preserves_quoted_case() {
        let id = Ident {
            value: "Foo".into(),
            quote: Some('"'),
            span: Span::new(0, 5),
        };
        assert_eq!(id.canonical(), "Foo");
    }

    #[test]
    fn object_name_schema_qualification() {
        let name = ObjectName {
            parts: vec![
                Ident::new("main", Span::new(0, 4)),
                Ident::new("users", Span::new(5, 10)),
            ],
        };
        assert_eq!(name.schema().unwrap().value, "main");
        assert_eq!(name.name().value, "users");
        assert_eq!(name.canonical(), "main.users");
    }
}
