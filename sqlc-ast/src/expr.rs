use sqlc_diagnostics::{Span, Spanned};

use crate::data_type::DataType;
use crate::literal::Literal;
use crate::name::{Ident, ObjectName};
use crate::query::Select;

/// A unary prefix operator.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UnaryOp {
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `~`
    BitNot,
    /// `NOT`
    Not,
}

/// A binary infix operator.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BinaryOp {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `||`
    Concat,
    /// `->`
    Arrow,
    /// `->>`
    DoubleArrow,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `=`
    Eq,
    /// `<>` / `!=`
    NotEq,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `LIKE`
    Like,
    /// `GLOB`
    Glob,
    /// `REGEXP`
    Regexp,
    /// `MATCH`
    Match,
}

/// How a bind parameter was written.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindParamKind {
    /// `?`
    Anonymous,
    /// `?N`
    Indexed(u32),
    /// `:name`, `@name` or `$name`.
    Named,
}

/// A bind parameter occurrence.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BindParam {
    /// How the parameter was written.
    pub kind: BindParamKind,
    /// The explicit name, for `:name`/`@name`/`$name` forms.
    pub name: Option<String>,
    /// Source range of the parameter token.
    pub span: Span,
}

/// A `WHEN cond THEN result` arm of a `CASE` expression.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhenClause {
    /// The condition (or, for a simple `CASE x WHEN ...`, the comparison value).
    pub condition: Expr,
    /// The result if `condition` matches.
    pub result: Expr,
}

/// A function call argument list, including the `DISTINCT` aggregate modifier.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionArgs {
    /// `f(*)`, e.g. `COUNT(*)`.
    Wildcard,
    /// `f(a, b, ...)`, optionally `DISTINCT`-qualified.
    List {
        /// Whether `DISTINCT` preceded the argument list.
        distinct: bool,
        /// The argument expressions.
        args: Vec<Expr>,
    },
}

/// A SQL expression.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),
    /// A bind parameter (`?`, `?N`, `:name`, `@name`, `$name`).
    BindParam(BindParam),
    /// An unqualified or qualified column reference, e.g. `id`, `t.id`, `main.t.id`.
    ColumnRef {
        /// The name parts, 1 to 3 long (`column`, `table.column`, `schema.table.column`).
        parts: Vec<Ident>,
    },
    /// Bare `*`.
    Wildcard {
        /// Span of the `*` token.
        span: Span,
    },
    /// `table.*` or `schema.table.*`.
    QualifiedWildcard {
        /// The table (optionally schema-qualified) being expanded.
        table: ObjectName,
        /// Span covering the whole `table.*`.
        span: Span,
    },
    /// `(expr)`.
    Nested {
        /// The wrapped expression.
        expr: Box<Expr>,
        /// Span including the parens.
        span: Span,
    },
    /// `op expr`.
    UnaryOp {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        expr: Box<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `left op right`.
    BinaryOp {
        /// The left operand.
        left: Box<Expr>,
        /// The operator.
        op: BinaryOp,
        /// The right operand.
        right: Box<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `expr [NOT] LIKE pattern [ESCAPE escape]`.
    Like {
        /// The subject expression.
        expr: Box<Expr>,
        /// Whether `NOT` preceded `LIKE`.
        negated: bool,
        /// The pattern expression.
        pattern: Box<Expr>,
        /// The optional `ESCAPE` expression.
        escape: Option<Box<Expr>>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `expr IS [NOT] NULL`.
    IsNull {
        /// The subject expression.
        expr: Box<Expr>,
        /// Whether `NOT` preceded `NULL`.
        negated: bool,
        /// Span of the whole expression.
        span: Span,
    },
    /// `expr ISNULL` / `expr NOTNULL`.
    PostfixNullTest {
        /// The subject expression.
        expr: Box<Expr>,
        /// True for `NOTNULL`, false for `ISNULL`.
        negated: bool,
        /// Span of the whole expression.
        span: Span,
    },
    /// `expr IS [NOT] DISTINCT FROM other`.
    IsDistinctFrom {
        /// The left operand.
        left: Box<Expr>,
        /// Whether `NOT` preceded `DISTINCT`.
        negated: bool,
        /// The right operand.
        right: Box<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `expr [NOT] IN (val1, val2, ...)`, or `expr [NOT] IN ?` (variadic parameter form).
    InList {
        /// The subject expression.
        expr: Box<Expr>,
        /// Whether `NOT` preceded `IN`.
        negated: bool,
        /// The candidate list, or a single bind parameter for the variadic form.
        list: Vec<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `expr [NOT] IN (subquery)`.
    InSubquery {
        /// The subject expression.
        expr: Box<Expr>,
        /// Whether `NOT` preceded `IN`.
        negated: bool,
        /// The subquery.
        subquery: Box<Select>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        /// The subject expression.
        expr: Box<Expr>,
        /// Whether `NOT` preceded `BETWEEN`.
        negated: bool,
        /// The lower bound.
        low: Box<Expr>,
        /// The upper bound.
        high: Box<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
    Case {
        /// The optional simple-case operand.
        operand: Option<Box<Expr>>,
        /// The `WHEN ... THEN ...` arms, at least one.
        when_then: Vec<WhenClause>,
        /// The optional `ELSE` result.
        else_result: Option<Box<Expr>>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `expr COLLATE name`.
    Collate {
        /// The subject expression.
        expr: Box<Expr>,
        /// The collation name.
        collation: Ident,
        /// Span of the whole expression.
        span: Span,
    },
    /// `CAST(expr AS type)`.
    Cast {
        /// The subject expression.
        expr: Box<Expr>,
        /// The target type.
        data_type: DataType,
        /// Span of the whole expression.
        span: Span,
    },
    /// `EXISTS(subquery)`, optionally negated.
    Exists {
        /// The subquery.
        subquery: Box<Select>,
        /// Whether `NOT` preceded `EXISTS`.
        negated: bool,
        /// Span of the whole expression.
        span: Span,
    },
    /// `(subquery)` used as a scalar expression.
    Subquery {
        /// The subquery.
        subquery: Box<Select>,
        /// Span including the parens.
        span: Span,
    },
    /// A function call, e.g. `COUNT(*)`, `LOWER(name)`.
    Function {
        /// The function name.
        name: ObjectName,
        /// The argument list.
        args: FunctionArgs,
        /// An optional `FILTER (WHERE ...)` clause on an aggregate call.
        filter: Option<Box<Expr>>,
        /// An optional `OVER (...)` window specification, opaque to the type
        /// checker beyond recognizing the call as a window function.
        over: bool,
        /// Span of the whole expression.
        span: Span,
    },
}

impl Expr {
    /// Returns the span covering this whole expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(lit) => lit.span,
            Expr::BindParam(p) => p.span,
            Expr::ColumnRef { parts } => {
                let first = parts.first().expect("ColumnRef always has >= 1 part");
                first.span.to(parts.last().unwrap().span)
            }
            Expr::Wildcard { span }
            | Expr::QualifiedWildcard { span, .. }
            | Expr::Nested { span, .. }
            | Expr::UnaryOp { span, .. }
            | Expr::BinaryOp { span, .. }
            | Expr::Like { span, .. }
            | Expr::IsNull { span, .. }
            | Expr::PostfixNullTest { span, .. }
            | Expr::IsDistinctFrom { span, .. }
            | Expr::InList { span, .. }
            | Expr::InSubquery { span, .. }
            | Expr::Between { span, .. }
            | Expr::Case { span, .. }
            | Expr::Collate { span, .. }
            | Expr::Cast { span, .. }
            | Expr::Exists { span, .. }
            | Expr::Subquery { span, .. }
            | Expr::Function { span, .. } => *span,
        }
    }

    /// If this expression is a bare (possibly qualified) column reference,
    /// returns its parts.
    pub fn as_column_ref(&self) -> Option<&[Ident]> {
        match self {
            Expr::ColumnRef { parts } => Some(parts),
            _ => None,
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        Expr::span(self)
    }
}
