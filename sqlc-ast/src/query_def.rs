use sqlc_diagnostics::{Span, Spanned};

use crate::data_type::DataType;
use crate::name::Ident;
use crate::stmt::Statement;

/// An explicit `(input: Ty, output: Ty)` type annotation on a `DEFINE QUERY`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuerySignatureHint {
    /// The declared input (parameter row) type, if given.
    pub input: Option<DataType>,
    /// The declared output (result row) type, if given.
    pub output: Option<DataType>,
}

/// One named query declared in a user query file, in either surface form:
///
/// - the block form, `name: <statement>;`
/// - the wrapped form, `DEFINE QUERY name[(input: Ty, output: Ty)] AS <statement>;`
///
/// Both forms are accepted interchangeably within the same file; the parser
/// records which one was used only for diagnostics and for faithfully
/// rendering source spans, not to change downstream semantics.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryDef {
    /// The query's declared name.
    pub name: Ident,
    /// The explicit signature hint, present only on the wrapped `DEFINE QUERY` form.
    pub hint: Option<QuerySignatureHint>,
    /// The wrapped statement.
    pub statement: Box<Statement>,
    /// Whether this declaration used the wrapped `DEFINE QUERY ... AS` form
    /// rather than the bare `name: ...;` block form.
    pub is_define_query_form: bool,
    /// Source range of the whole declaration.
    pub span: Span,
}

impl Spanned for QueryDef {
    fn span(&self) -> Span {
        self.span
    }
}

/// A parsed user query file: a sequence of [`QueryDef`] declarations.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryFile {
    /// The declarations, in file order.
    pub queries: Vec<QueryDef>,
}
