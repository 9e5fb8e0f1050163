use sqlc_types::Type;

/// A table's column in its final, frozen shape: no constraints, no
/// defaults, nothing a code generator doesn't need to decode a row or
/// bind a value.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    /// The column's name, as declared.
    pub name: String,
    /// The column's resolved type.
    pub ty: Type,
    /// Whether the column accepts `NULL`.
    pub nullable: bool,
}

/// A table as it exists once the schema-evolution log has been fully
/// replayed: just a name and an ordered column list, frozen for
/// consumption by a code generator.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    /// The table's fully-qualified, canonical name.
    pub name: String,
    /// The table's columns, in declared order.
    pub columns: Vec<Column>,
}
