use std::collections::BTreeSet;

use sqlc_types::Type;

/// How many rows a statement's execution yields, derived from its shape
/// rather than observed at runtime.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Cardinality {
    /// Exactly zero or one row (a primary-key lookup, `LIMIT 1`).
    Single,
    /// Zero or more rows.
    Many,
    /// No rows (an INSERT/UPDATE/DELETE with no `RETURNING` clause).
    None,
}

/// One of a query's bind parameters, frozen with a stable 1-based index.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    /// The parameter's position in the statement's bind order, starting
    /// at 1. The full set of indices across a query's parameters is a
    /// permutation of `[1..=N]`.
    pub index: u32,
    /// The parameter's deterministically derived or caller-supplied name.
    pub name: String,
    /// The parameter's resolved type. When `variadic` is set, this is the
    /// element type of the list the caller is expected to supply, not the
    /// list type itself.
    pub ty: Type,
    /// Whether the parameter accepts `NULL`.
    pub nullable: bool,
    /// Whether this parameter was bound inside an `IN (...)` position and
    /// so accepts zero or more values of `ty` rather than exactly one.
    pub variadic: bool,
}

/// One column of an output chunk.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkColumn {
    /// The column's output name (explicit alias, derived column name, or
    /// a synthesized label for a non-reference expression).
    pub name: String,
    /// The column's resolved type.
    pub ty: Type,
}

/// A contiguous slice of a query's output row. A `table.*` expansion
/// produces one chunk bound to that table (`source_table = Some(..)`) so a
/// code generator can decode it straight into the table's record type; a
/// free expression produces a one-column chunk with no table binding, and
/// adjacent free chunks coalesce into one.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chunk {
    /// The chunk's columns, in output order.
    pub columns: Vec<ChunkColumn>,
    /// The table this chunk's columns were drawn from, if any.
    pub source_table: Option<String>,
    /// Whether this chunk as a whole is nullable (the nullable side of an
    /// outer join), independent of any individual column's nullability.
    pub nullable_as_whole: bool,
}

/// A single compiled query, frozen for a code generator: everything it
/// needs to emit a callable binding without re-running analysis.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryIr {
    /// The query's caller-supplied name.
    pub name: String,
    /// An explicit input-record type name, if the query declared one.
    pub input_type_name: Option<String>,
    /// An explicit output-record type name, if the query declared one.
    pub output_type_name: Option<String>,
    /// The query's parameters, ordered by `index`.
    pub parameters: Vec<Parameter>,
    /// The query's output row, as an ordered sequence of chunks.
    pub output_chunks: Vec<Chunk>,
    /// Every base table this query (or its `RETURNING` clause) reads from.
    pub observed_tables: BTreeSet<String>,
    /// The statement's cardinality.
    pub cardinality: Cardinality,
    /// The statement's text, sanitized (comments stripped, whitespace
    /// normalized) so it can be embedded in generated code or logs.
    pub source_text: String,
}
