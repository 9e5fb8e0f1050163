use sqlc_ast::{
    CommonTableExpr, Expr, FromItem, JoinConstraint, JoinKind, Select, SelectCore, SelectItem, TableFactor, With,
};
use sqlc_diagnostics::{Span, Spanned};
use sqlc_types::Type;

use crate::bridge::data_type_to_type;
use crate::ctx::Ctx;
use crate::diagnostics::AnalyzerError;
use crate::expr::check_expr;
use crate::scope::{ScopeColumn, ScopeTable};

/// One output column of a checked `SELECT`, before [`assemble_chunks`] groups
/// adjacent columns into the row's output chunks.
#[derive(Clone, Debug)]
pub struct OutputColumn {
    /// The column's output name, if one could be determined (an explicit
    /// alias, a bare column reference's own name, or a wildcard-expanded
    /// column's name).
    pub name: Option<String>,
    /// The column's resolved type.
    pub ty: Type,
    /// The key of the table this column came from via a `table.*`/bare `*`
    /// expansion, if any. `None` for a scalar projection item, even one that
    /// happens to be a bare column reference.
    pub table_chunk: Option<String>,
    /// Whether the table this column was expanded from sits on the nullable
    /// side of an outer join.
    pub table_nullable: bool,
}

/// Type-checks a full `SELECT` (with any `WITH`, compound arms, `ORDER BY`,
/// `LIMIT`/`OFFSET`) and returns its output row as a flat column list.
pub fn check_select(ctx: &mut Ctx<'_>, select: &Select) -> Vec<OutputColumn> {
    if let Some(with) = &select.with {
        check_with(ctx, with);
    }
    let mut rows = check_select_core(ctx, &select.body);
    for set_op in &select.set_ops {
        let other = check_select_core(ctx, &set_op.core);
        rows = unify_compound_arms(ctx, rows, other, set_operator_symbol(set_op.op), select.span);
    }
    for order in &select.order_by {
        check_expr(ctx, &order.expr);
    }
    if let Some(limit) = &select.limit {
        check_expr(ctx, limit);
    }
    if let Some(offset) = &select.offset {
        check_expr(ctx, offset);
    }
    rows
}

fn set_operator_symbol(op: sqlc_ast::SetOperator) -> &'static str {
    match op {
        sqlc_ast::SetOperator::Union => "UNION",
        sqlc_ast::SetOperator::UnionAll => "UNION ALL",
        sqlc_ast::SetOperator::Intersect => "INTERSECT",
        sqlc_ast::SetOperator::Except => "EXCEPT",
    }
}

fn unify_compound_arms(
    ctx: &mut Ctx<'_>,
    left: Vec<OutputColumn>,
    right: Vec<OutputColumn>,
    op: &str,
    span: Span,
) -> Vec<OutputColumn> {
    if left.len() != right.len() {
        ctx.report(AnalyzerError::CompoundArityMismatch { op: op.to_string() }, span);
        return left;
    }
    left.into_iter()
        .zip(right)
        .map(|(l, r)| {
            let ty = ctx.unifier.unify(&l.ty, &r.ty).unwrap_or(Type::Error);
            OutputColumn { name: l.name.or(r.name), ty, table_chunk: None, table_nullable: false }
        })
        .collect()
}

fn check_select_core(ctx: &mut Ctx<'_>, core: &SelectCore) -> Vec<OutputColumn> {
    match core {
        SelectCore::Values { rows, .. } => check_values(ctx, rows),
        SelectCore::Select { projection, from, selection, group_by, having, .. } => {
            ctx.push_scope();
            let mut tables = Vec::new();
            let mut constraints = Vec::new();
            for item in from {
                let (item_tables, item_constraints) = elaborate_from_item(ctx, item);
                tables.extend(item_tables);
                constraints.extend(item_constraints);
            }
            for table in tables {
                ctx.install_table(table);
            }
            for (constraint, span) in constraints {
                check_join_constraint(ctx, &constraint, span);
            }
            if let Some(selection) = selection {
                require_boolean(ctx, selection);
            }
            if let Some(group_by) = group_by {
                for expr in &group_by.exprs {
                    check_expr(ctx, expr);
                }
            }
            if let Some(having) = having {
                require_boolean(ctx, having);
            }
            let output = build_projection(ctx, projection);
            ctx.pop_scope();
            output
        }
    }
}

pub(crate) fn require_boolean(ctx: &mut Ctx<'_>, expr: &Expr) {
    let ty = check_expr(ctx, expr);
    if ctx.unifier.unify(&ty, &Type::bool_literal()).is_err() {
        ctx.report(AnalyzerError::NotBoolean, expr.span());
    }
}

fn check_values(ctx: &mut Ctx<'_>, rows: &[Vec<Expr>]) -> Vec<OutputColumn> {
    let mut shape: Option<Vec<Type>> = None;
    for row in rows {
        let types: Vec<Type> = row.iter().map(|e| check_expr(ctx, e)).collect();
        shape = Some(match shape {
            None => types,
            Some(prev) if prev.len() == types.len() => prev
                .into_iter()
                .zip(types)
                .map(|(a, b)| ctx.unifier.unify(&a, &b).unwrap_or(Type::Error))
                .collect(),
            Some(prev) => {
                let span = row.first().map(|e| e.span()).unwrap_or_else(|| Span::empty_at(0));
                ctx.report(
                    AnalyzerError::ColumnCountMismatch {
                        context: "VALUES row".to_string(),
                        found: row.len(),
                        expected: prev.len(),
                    },
                    span,
                );
                prev
            }
        });
    }
    shape
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, ty)| OutputColumn {
            name: Some(format!("column{}", i + 1)),
            ty,
            table_chunk: None,
            table_nullable: false,
        })
        .collect()
}

pub(crate) fn check_with(ctx: &mut Ctx<'_>, with: &With) {
    for cte in &with.ctes {
        let rows = if cte.recursive {
            check_recursive_cte(ctx, cte)
        } else {
            check_select(ctx, &cte.query)
        };
        let table = build_cte_scope_table(cte, &rows);
        ctx.install_table(table);
    }
}

fn check_recursive_cte(ctx: &mut Ctx<'_>, cte: &CommonTableExpr) -> Vec<OutputColumn> {
    let anchor = check_select_core(ctx, &cte.query.body);
    let placeholder = build_cte_scope_table(cte, &anchor);
    ctx.push_scope();
    ctx.install_table(placeholder);
    let mut rows = anchor;
    for set_op in &cte.query.set_ops {
        let other = check_select_core(ctx, &set_op.core);
        rows = unify_compound_arms(ctx, rows, other, set_operator_symbol(set_op.op), cte.query.span);
    }
    for order in &cte.query.order_by {
        check_expr(ctx, &order.expr);
    }
    if let Some(limit) = &cte.query.limit {
        check_expr(ctx, limit);
    }
    if let Some(offset) = &cte.query.offset {
        check_expr(ctx, offset);
    }
    ctx.pop_scope();
    rows
}

fn build_cte_scope_table(cte: &CommonTableExpr, rows: &[OutputColumn]) -> ScopeTable {
    let columns = if !cte.columns.is_empty() {
        cte.columns
            .iter()
            .zip(rows)
            .map(|(ident, col)| ScopeColumn { name: ident.canonical(), ty: col.ty.clone() })
            .collect()
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, col)| {
                let name = col.name.clone().unwrap_or_else(|| format!("column{}", i + 1));
                ScopeColumn { name, ty: col.ty.clone() }
            })
            .collect()
    };
    ScopeTable { alias: cte.name.canonical(), qualified_name: None, columns, nullable: false }
}

fn find_scope_table(ctx: &Ctx<'_>, key: &str) -> Option<ScopeTable> {
    ctx.scopes.iter().rev().find_map(|s| s.find_table(key).cloned())
}

fn scope_table_from_schema(table: &sqlc_schema::Table, alias: &str) -> ScopeTable {
    let columns = table
        .columns
        .iter()
        .map(|c| {
            let base = c.declared_type.as_ref().map(data_type_to_type).unwrap_or_else(Type::any);
            let ty = if c.nullable { base.optional() } else { base };
            ScopeColumn { name: c.name.canonical(), ty }
        })
        .collect();
    ScopeTable {
        alias: alias.to_string(),
        qualified_name: Some(table.name.canonical()),
        columns,
        nullable: false,
    }
}

fn table_factor_span(factor: &TableFactor) -> Span {
    match factor {
        TableFactor::Table { name, .. } => name.span(),
        TableFactor::Derived { subquery, .. } => subquery.span(),
        TableFactor::TableFunction { name, .. } => name.span(),
        TableFactor::NestedJoin { item } => table_factor_span(&item.relation),
    }
}

fn elaborate_table_factor(
    ctx: &mut Ctx<'_>,
    factor: &TableFactor,
) -> (Vec<ScopeTable>, Vec<(JoinConstraint, Span)>) {
    match factor {
        TableFactor::Table { name, alias } => {
            let alias_name = alias.as_ref().map(|a| a.canonical()).unwrap_or_else(|| name.name().canonical());
            if name.parts.len() == 1 {
                if let Some(mut existing) = find_scope_table(ctx, &name.canonical()) {
                    existing.alias = alias_name;
                    return (vec![existing], Vec::new());
                }
            }
            match ctx.schema.table(name) {
                Some(table) => (vec![scope_table_from_schema(table, &alias_name)], Vec::new()),
                None => {
                    ctx.report(AnalyzerError::TableNotFound { name: name.canonical() }, name.span());
                    (Vec::new(), Vec::new())
                }
            }
        }
        TableFactor::Derived { subquery, alias } => {
            let rows = check_select(ctx, subquery);
            let alias_name = alias.as_ref().map(|a| a.canonical()).unwrap_or_default();
            let columns = rows
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let name = col.name.clone().unwrap_or_else(|| format!("column{}", i + 1));
                    ScopeColumn { name, ty: col.ty.clone() }
                })
                .collect();
            (vec![ScopeTable { alias: alias_name, qualified_name: None, columns, nullable: false }], Vec::new())
        }
        TableFactor::TableFunction { name, args, alias } => {
            for arg in args {
                check_expr(ctx, arg);
            }
            let alias_name = alias.as_ref().map(|a| a.canonical()).unwrap_or_else(|| name.name().canonical());
            (
                vec![ScopeTable { alias: alias_name, qualified_name: None, columns: Vec::new(), nullable: false }],
                Vec::new(),
            )
        }
        TableFactor::NestedJoin { item } => elaborate_from_item(ctx, item),
    }
}

fn elaborate_from_item(ctx: &mut Ctx<'_>, item: &FromItem) -> (Vec<ScopeTable>, Vec<(JoinConstraint, Span)>) {
    let (mut tables, mut constraints) = elaborate_table_factor(ctx, &item.relation);
    for join in &item.joins {
        let (mut right_tables, right_constraints) = elaborate_table_factor(ctx, &join.relation);
        constraints.extend(right_constraints);
        apply_join_nullability(join.kind, &mut tables, &mut right_tables);
        constraints.push((join.constraint.clone(), table_factor_span(&join.relation)));
        tables.extend(right_tables);
    }
    (tables, constraints)
}

fn apply_join_nullability(kind: JoinKind, left: &mut [ScopeTable], right: &mut [ScopeTable]) {
    match kind {
        JoinKind::Inner | JoinKind::Cross => {}
        JoinKind::Left => {
            for t in right {
                t.make_nullable();
            }
        }
        JoinKind::Right => {
            for t in left {
                t.make_nullable();
            }
        }
        JoinKind::Full => {
            for t in left {
                t.make_nullable();
            }
            for t in right {
                t.make_nullable();
            }
        }
    }
}

fn check_join_constraint(ctx: &mut Ctx<'_>, constraint: &JoinConstraint, span: Span) {
    match constraint {
        JoinConstraint::On(expr) => require_boolean(ctx, expr),
        JoinConstraint::Using(columns) => {
            for column in columns {
                let key = column.canonical();
                if ctx.env.lookup(&key).is_none() {
                    ctx.report(AnalyzerError::ColumnNotFound { name: column.value.clone() }, span);
                }
            }
        }
        JoinConstraint::None => {}
    }
}

fn build_projection(ctx: &mut Ctx<'_>, projection: &[SelectItem]) -> Vec<OutputColumn> {
    let mut output = Vec::new();
    for item in projection {
        match item {
            SelectItem::Expr { expr, alias } => {
                let ty = check_expr(ctx, expr);
                let name = alias
                    .as_ref()
                    .map(|a| a.value.clone())
                    .or_else(|| expr.as_column_ref().and_then(|parts| parts.last()).map(|i| i.value.clone()));
                output.push(OutputColumn { name, ty, table_chunk: None, table_nullable: false });
            }
            SelectItem::Wildcard => {
                for table in ctx.current_scope().tables.clone() {
                    push_table_columns(&mut output, &table);
                }
            }
            SelectItem::QualifiedWildcard { table } => match ctx.current_scope().find_table(&table.canonical()).cloned() {
                Some(found) => push_table_columns(&mut output, &found),
                None => ctx.report(AnalyzerError::TableNotFound { name: table.canonical() }, table.span()),
            },
        }
    }
    output
}

pub(crate) fn push_table_columns(output: &mut Vec<OutputColumn>, table: &ScopeTable) {
    let key = table.qualified_name.clone().unwrap_or_else(|| table.alias.clone());
    for column in &table.columns {
        output.push(OutputColumn {
            name: Some(column.name.clone()),
            ty: column.ty.clone(),
            table_chunk: Some(key.clone()),
            table_nullable: table.nullable,
        });
    }
}

/// Groups a flat output-column list into ordered chunks (spec.md §4.7):
/// `table.*`/bare `*` expansions become one chunk per source table; scalar
/// projection items coalesce into a single contiguous "free" chunk.
pub fn assemble_chunks(columns: &[OutputColumn]) -> Vec<sqlc_ir::Chunk> {
    let mut chunks: Vec<sqlc_ir::Chunk> = Vec::new();
    for column in columns {
        let starts_new_chunk = match (&column.table_chunk, chunks.last()) {
            (Some(key), Some(last)) => last.source_table.as_deref() != Some(key.as_str()),
            (Some(_), None) => true,
            (None, Some(last)) => last.source_table.is_some(),
            (None, None) => true,
        };
        if starts_new_chunk {
            chunks.push(sqlc_ir::Chunk {
                columns: Vec::new(),
                source_table: column.table_chunk.clone(),
                nullable_as_whole: column.table_chunk.is_some() && column.table_nullable,
            });
        }
        chunks.last_mut().expect("just pushed if needed").columns.push(sqlc_ir::ChunkColumn {
            name: column.name.clone().unwrap_or_else(|| "column".to_string()),
            ty: column.ty.clone(),
        });
    }
    chunks
}
