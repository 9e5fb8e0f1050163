use sqlc_diagnostics::{Span, Spanned};

use crate::name::Ident;

/// A column's declared SQL type, plus the typed-column annotations
/// (`AS <HostType>`, `USING <Adapter>`) this dialect adds on top of plain
/// SQLite column types.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataType {
    /// The declared storage type name, e.g. `INTEGER`, `TEXT`, `DECIMAL(10,2)`'s `DECIMAL`.
    pub name: Ident,
    /// Optional type arguments, e.g. the `10, 2` in `DECIMAL(10, 2)`. Parsed
    /// but not semantically interpreted; SQLite type affinity ignores them.
    pub args: Vec<String>,
    /// The `AS <HostType>` host-language type override, if present.
    pub host_type: Option<Ident>,
    /// The `USING <Adapter>` adapter tag, if present.
    pub adapter: Option<Ident>,
    /// Source range covering the whole annotated type.
    pub span: Span,
}

impl Spanned for DataType {
    fn span(&self) -> Span {
        self.span
    }
}
