//! The compiler's final output: a frozen, language-neutral description of
//! every table and every compiled query, meant to be handed to a code
//! generator (or serialized to JSON for one written in another language).
//! Nothing in this crate can fail to construct — by the time a value of
//! these types exists, analysis has already happened and any errors were
//! reported as diagnostics elsewhere.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod query;
mod table;

pub use query::{Cardinality, Chunk, ChunkColumn, Parameter, QueryIr};
pub use table::{Column, Table};

/// The complete output of a compilation run: every table the schema ended
/// up with, and every named query compiled against it.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ir {
    /// The final schema's tables.
    pub tables: Vec<Table>,
    /// The compiled queries, in the order their source files were
    /// processed.
    pub queries: Vec<QueryIr>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlc_types::Type;

    #[test]
    fn default_ir_is_empty() {
        let ir = Ir::default();
        assert!(ir.tables.is_empty());
        assert!(ir.queries.is_empty());
    }

    #[test]
    fn chunk_column_carries_its_own_type() {
        let column = ChunkColumn { name: "id".into(), ty: Type::integer() };
        assert_eq!(column.ty, Type::integer());
    }
}
