//! Type inference engine: a standalone universe of types, schemes, a
//! union-find unifier, and a scoped lookup environment, plus the built-in
//! operator/function catalog. Deliberately has no notion of SQL syntax —
//! it knows nothing about `sqlc-ast`. Bridging a schema's declared column
//! types or an AST expression into this universe is left to the crate that
//! drives analysis, keeping this crate reusable and easy to reason about
//! in isolation.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod catalog;
mod env;
mod scheme;
mod ty;
mod unify;

pub use catalog::{
    lookup_function, lookup_operator, CatalogFunction, SchemeBuilder, INTEGER_DIVISION_WARNING,
};
pub use env::Environment;
pub use scheme::TypeScheme;
pub use ty::{RowShape, Type, TypeVarId};
pub use unify::{UnifyError, Unifier};
