use std::collections::BTreeSet;

use sqlc_ast::{BinaryOp, Delete, Expr, FromItem, Insert, InsertSource, Select, SelectCore, TableFactor, Update};
use sqlc_ir::Cardinality;
use sqlc_schema::{Schema, Table};

/// Derives a `SELECT`'s cardinality (spec.md §4.6): `Single` if `LIMIT 1`,
/// or if its `WHERE` clause pins every primary-key column of the sole
/// `FROM` table to a bind parameter or constant via `=`, ANDed together
/// only; `Many` otherwise (including for any compound `SELECT`, since a
/// `UNION`'s arms can each contribute rows independently of `LIMIT`).
pub fn select_cardinality(schema: &Schema, select: &Select) -> Cardinality {
    if is_limit_one(&select.limit) {
        return Cardinality::Single;
    }
    if !select.set_ops.is_empty() {
        return Cardinality::Many;
    }
    let SelectCore::Select { from, selection, .. } = &select.body else {
        return Cardinality::Many;
    };
    match sole_from_table(schema, from) {
        Some(table) if pk_fully_pinned(table, selection) => Cardinality::Single,
        _ => Cardinality::Many,
    }
}

/// An `INSERT` without `RETURNING` yields no rows; with `RETURNING`, its
/// cardinality is the number of rows it inserts (spec.md §4.6).
pub fn insert_cardinality(insert: &Insert) -> Cardinality {
    if insert.returning.is_empty() {
        return Cardinality::None;
    }
    match &insert.source {
        InsertSource::Values(rows) if rows.len() == 1 => Cardinality::Single,
        InsertSource::Values(_) => Cardinality::Many,
        InsertSource::DefaultValues => Cardinality::Single,
        InsertSource::Query(_) => Cardinality::Many,
    }
}

/// An `UPDATE` without `RETURNING` yields no rows; with `RETURNING`, it
/// inherits the `SELECT` primary-key-pinning rule applied to its target
/// table (spec.md §4.6).
pub fn update_cardinality(schema: &Schema, update: &Update) -> Cardinality {
    if update.returning.is_empty() {
        return Cardinality::None;
    }
    match schema.table(&update.table) {
        Some(table) if pk_fully_pinned(table, &update.selection) => Cardinality::Single,
        _ => Cardinality::Many,
    }
}

/// As [`update_cardinality`], for `DELETE`.
pub fn delete_cardinality(schema: &Schema, delete: &Delete) -> Cardinality {
    if delete.returning.is_empty() {
        return Cardinality::None;
    }
    match schema.table(&delete.table) {
        Some(table) if pk_fully_pinned(table, &delete.selection) => Cardinality::Single,
        _ => Cardinality::Many,
    }
}

fn is_limit_one(limit: &Option<Expr>) -> bool {
    matches!(
        limit,
        Some(Expr::Literal(lit))
            if matches!(&lit.value, sqlc_ast::LiteralValue::Integer(n) if n.trim() == "1")
    )
}

fn sole_from_table<'a>(schema: &'a Schema, from: &[FromItem]) -> Option<&'a Table> {
    let [item] = from else { return None };
    if !item.joins.is_empty() {
        return None;
    }
    match &item.relation {
        TableFactor::Table { name, .. } => schema.table(name),
        _ => None,
    }
}

fn pk_fully_pinned(table: &Table, selection: &Option<Expr>) -> bool {
    if table.primary_key.is_empty() {
        return false;
    }
    let Some(selection) = selection else { return false };
    let pinned = pinned_columns(selection);
    table.primary_key.iter().all(|col| pinned.contains(col.as_str()))
}

fn pinned_columns(expr: &Expr) -> BTreeSet<String> {
    let mut pinned = BTreeSet::new();
    for conjunct in flatten_and(expr) {
        if let Expr::BinaryOp { left, op: BinaryOp::Eq, right, .. } = conjunct {
            if let Some(name) = equality_column(left, right).or_else(|| equality_column(right, left)) {
                pinned.insert(name);
            }
        }
    }
    pinned
}

fn flatten_and(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Nested { expr, .. } => flatten_and(expr),
        Expr::BinaryOp { left, op: BinaryOp::And, right, .. } => {
            let mut conjuncts = flatten_and(left);
            conjuncts.extend(flatten_and(right));
            conjuncts
        }
        other => vec![other],
    }
}

fn equality_column(column_side: &Expr, value_side: &Expr) -> Option<String> {
    let parts = column_side.as_column_ref()?;
    let name = parts.last()?.canonical();
    match value_side {
        Expr::BindParam(_) | Expr::Literal(_) => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlc_ast::{Ident, ObjectName, Statement};
    use sqlc_diagnostics::Span;
    use sqlc_parser::Parser;
    use sqlc_schema::TableKind;

    fn object_name(name: &str) -> ObjectName {
        ObjectName::simple(Ident::new(name, Span::empty_at(0)))
    }

    fn schema_with_pk(table_name: &str, pk: &[&str]) -> Schema {
        let mut schema = Schema::new();
        let mut table = Table::new(object_name(table_name), TableKind::Normal, Span::empty_at(0));
        table.primary_key = pk.iter().map(|c| c.to_string()).collect();
        schema.tables.insert(table.name.canonical(), table);
        schema
    }

    fn parse_select(sql: &str) -> Select {
        let mut parser = Parser::new_with_source(sql).expect("lex");
        match parser.parse_statement().expect("parse") {
            Statement::Select(select) => *select,
            other => panic!("expected a SELECT, got {other:?}"),
        }
    }

    fn parse_update(sql: &str) -> Update {
        let mut parser = Parser::new_with_source(sql).expect("lex");
        match parser.parse_statement().expect("parse") {
            Statement::Update(update) => update,
            other => panic!("expected an UPDATE, got {other:?}"),
        }
    }

    fn parse_delete(sql: &str) -> Delete {
        let mut parser = Parser::new_with_source(sql).expect("lex");
        match parser.parse_statement().expect("parse") {
            Statement::Delete(delete) => delete,
            other => panic!("expected a DELETE, got {other:?}"),
        }
    }

    #[test]
    fn limit_one_is_single() {
        let schema = schema_with_pk("users", &["id"]);
        let select = parse_select("SELECT * FROM users WHERE name = ? LIMIT 1");
        assert_eq!(select_cardinality(&schema, &select), Cardinality::Single);
    }

    #[test]
    fn pk_pinned_by_equality_is_single() {
        let schema = schema_with_pk("users", &["id"]);
        let select = parse_select("SELECT * FROM users WHERE id = ?");
        assert_eq!(select_cardinality(&schema, &select), Cardinality::Single);
    }

    #[test]
    fn composite_pk_requires_every_column_pinned() {
        let schema = schema_with_pk("members", &["org_id", "user_id"]);
        let pinned = parse_select("SELECT * FROM members WHERE org_id = ? AND user_id = ?");
        assert_eq!(select_cardinality(&schema, &pinned), Cardinality::Single);
        let partial = parse_select("SELECT * FROM members WHERE org_id = ?");
        assert_eq!(select_cardinality(&schema, &partial), Cardinality::Many);
    }

    #[test]
    fn pk_pinned_inside_an_or_does_not_count() {
        let schema = schema_with_pk("users", &["id"]);
        let select = parse_select("SELECT * FROM users WHERE id = ? OR name = ?");
        assert_eq!(select_cardinality(&schema, &select), Cardinality::Many);
    }

    #[test]
    fn no_where_clause_is_many() {
        let schema = schema_with_pk("users", &["id"]);
        let select = parse_select("SELECT * FROM users");
        assert_eq!(select_cardinality(&schema, &select), Cardinality::Many);
    }

    #[test]
    fn joined_from_clause_is_never_single_without_limit() {
        let schema = schema_with_pk("users", &["id"]);
        let select = parse_select("SELECT * FROM users JOIN pets ON pets.owner_id = users.id WHERE users.id = ?");
        assert_eq!(select_cardinality(&schema, &select), Cardinality::Many);
    }

    #[test]
    fn update_without_returning_is_none() {
        let schema = schema_with_pk("users", &["id"]);
        let update = parse_update("UPDATE users SET name = ? WHERE id = ?");
        assert_eq!(update_cardinality(&schema, &update), Cardinality::None);
    }

    #[test]
    fn update_returning_with_pk_where_is_single() {
        let schema = schema_with_pk("users", &["id"]);
        let update = parse_update("UPDATE users SET name = ? WHERE id = ? RETURNING id");
        assert_eq!(update_cardinality(&schema, &update), Cardinality::Single);
    }

    #[test]
    fn delete_returning_without_pk_where_is_many() {
        let schema = schema_with_pk("users", &["id"]);
        let delete = parse_delete("DELETE FROM users WHERE name = ? RETURNING id");
        assert_eq!(delete_cardinality(&schema, &delete), Cardinality::Many);
    }

    #[test]
    fn insert_cardinality_by_row_count() {
        let single = match Parser::new_with_source("INSERT INTO users (id) VALUES (1) RETURNING id")
            .unwrap()
            .parse_statement()
            .unwrap()
        {
            Statement::Insert(insert) => insert,
            other => panic!("expected an INSERT, got {other:?}"),
        };
        assert_eq!(insert_cardinality(&single), Cardinality::Single);

        let many = match Parser::new_with_source("INSERT INTO users (id) VALUES (1), (2) RETURNING id")
            .unwrap()
            .parse_statement()
            .unwrap()
        {
            Statement::Insert(insert) => insert,
            other => panic!("expected an INSERT, got {other:?}"),
        };
        assert_eq!(insert_cardinality(&many), Cardinality::Many);

        let no_returning = match Parser::new_with_source("INSERT INTO users (id) VALUES (1)")
            .unwrap()
            .parse_statement()
            .unwrap()
        {
            Statement::Insert(insert) => insert,
            other => panic!("expected an INSERT, got {other:?}"),
        };
        assert_eq!(insert_cardinality(&no_returning), Cardinality::None);
    }
}
