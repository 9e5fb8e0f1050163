use sqlc_ast::{
    AlterTable, AlterTableAction, ColumnConstraint, ColumnDef, ConflictClause, CreateIndex,
    CreateTable, CreateTableBody, CreateTrigger, CreateView, DropObject, DropObjectKind,
    ForeignKeyClause, IndexedColumn, Pragma, ReIndex, ReferentialAction, Statement, TableConstraint,
    TriggerEvent, TriggerTiming,
};
use sqlc_lexer::{Keyword, TokenKind};

use crate::{error::ParseError, parser::Parser};

impl Parser {
    /// Parses `CREATE [TEMP|TEMPORARY] TABLE [IF NOT EXISTS] name (...)`,
    /// assuming `CREATE` has already been consumed.
    pub fn parse_create_table(&mut self, start: sqlc_diagnostics::Span, temporary: bool) -> Result<CreateTable, ParseError> {
        self.expect_keyword(Keyword::TABLE)?;
        let if_not_exists = self.parse_keywords(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS]);
        let name = self.parse_object_name()?;

        let body = if self.parse_keyword(Keyword::AS) {
            let select = self.parse_select()?;
            CreateTableBody::AsSelect(Box::new(select))
        } else {
            self.expect_token(&TokenKind::LeftParen)?;
            let mut columns = Vec::new();
            let mut constraints = Vec::new();
            loop {
                if self.starts_table_constraint() {
                    constraints.push(self.parse_table_constraint()?);
                } else {
                    columns.push(self.parse_column_def()?);
                }
                if !self.next_token_if_is(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_token(&TokenKind::RightParen)?;
            let without_rowid = self.parse_keywords(&[Keyword::WITHOUT, Keyword::ROWID]);
            let strict = self.parse_keyword(Keyword::STRICT);
            CreateTableBody::Columns {
                columns,
                constraints,
                without_rowid,
                strict,
            }
        };

        let end = self.current_span();
        Ok(CreateTable {
            name,
            if_not_exists,
            temporary,
            body,
            span: start.to(end),
        })
    }

    fn starts_table_constraint(&mut self) -> bool {
        self.peek_token()
            .map(|t| {
                t.kind.is_keyword(Keyword::PRIMARY)
                    || t.kind.is_keyword(Keyword::UNIQUE)
                    || t.kind.is_keyword(Keyword::CHECK)
                    || t.kind.is_keyword(Keyword::FOREIGN)
                    || t.kind.is_keyword(Keyword::CONSTRAINT)
            })
            .unwrap_or(false)
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraint, ParseError> {
        // A named constraint's name is recorded nowhere downstream, so it is
        // parsed and discarded like SQLite itself treats it as documentation.
        if self.parse_keyword(Keyword::CONSTRAINT) {
            self.parse_identifier()?;
        }
        if self.parse_keywords(&[Keyword::PRIMARY, Keyword::KEY]) {
            self.expect_token(&TokenKind::LeftParen)?;
            let columns = self.parse_comma_separated(Parser::parse_indexed_column_name)?;
            self.expect_token(&TokenKind::RightParen)?;
            Ok(TableConstraint::PrimaryKey { columns })
        } else if self.parse_keyword(Keyword::UNIQUE) {
            self.expect_token(&TokenKind::LeftParen)?;
            let columns = self.parse_comma_separated(Parser::parse_indexed_column_name)?;
            self.expect_token(&TokenKind::RightParen)?;
            Ok(TableConstraint::Unique { columns })
        } else if self.parse_keyword(Keyword::CHECK) {
            self.expect_token(&TokenKind::LeftParen)?;
            let expr = self.parse_expr()?;
            self.expect_token(&TokenKind::RightParen)?;
            Ok(TableConstraint::Check { expr })
        } else if self.parse_keywords(&[Keyword::FOREIGN, Keyword::KEY]) {
            self.expect_token(&TokenKind::LeftParen)?;
            let columns = self.parse_comma_separated(Parser::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            let references = self.parse_foreign_key_clause()?;
            Ok(TableConstraint::ForeignKey { columns, references })
        } else {
            self.expected("a table constraint")
        }
    }

    /// An indexed-column reference inside a key list; `ASC`/`DESC` is legal
    /// but semantically ignored at the catalog level.
    fn parse_indexed_column_name(&mut self) -> Result<sqlc_ast::Ident, ParseError> {
        let name = self.parse_identifier()?;
        self.parse_one_of_keywords(&[Keyword::ASC, Keyword::DESC]);
        Ok(name)
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.parse_identifier()?;
        let data_type = if self.starts_data_type() {
            Some(self.parse_data_type()?)
        } else {
            None
        };
        let mut constraints = Vec::new();
        while let Some(constraint) = self.parse_column_constraint()? {
            constraints.push(constraint);
        }
        let end = if constraints.is_empty() {
            data_type.as_ref().map(|t| t.span).unwrap_or(name.span)
        } else {
            self.current_span()
        };
        Ok(ColumnDef {
            span: name.span.to(end),
            name,
            data_type,
            constraints,
        })
    }

    fn starts_data_type(&mut self) -> bool {
        !matches!(
            self.peek_token().map(|t| &t.kind),
            Some(TokenKind::Comma)
                | Some(TokenKind::RightParen)
                | Some(TokenKind::Keyword(Keyword::PRIMARY))
                | Some(TokenKind::Keyword(Keyword::NOT))
                | Some(TokenKind::Keyword(Keyword::NULL))
                | Some(TokenKind::Keyword(Keyword::UNIQUE))
                | Some(TokenKind::Keyword(Keyword::CHECK))
                | Some(TokenKind::Keyword(Keyword::DEFAULT))
                | Some(TokenKind::Keyword(Keyword::COLLATE))
                | Some(TokenKind::Keyword(Keyword::REFERENCES))
                | Some(TokenKind::Keyword(Keyword::GENERATED))
                | Some(TokenKind::Keyword(Keyword::AS))
                | None
        )
    }

    fn parse_column_constraint(&mut self) -> Result<Option<ColumnConstraint>, ParseError> {
        if self.parse_keyword(Keyword::CONSTRAINT) {
            self.parse_identifier()?;
        }
        if self.parse_keywords(&[Keyword::PRIMARY, Keyword::KEY]) {
            self.parse_one_of_keywords(&[Keyword::ASC, Keyword::DESC]);
            let on_conflict = self.parse_conflict_clause()?;
            let autoincrement = self.parse_keyword(Keyword::AUTOINCREMENT);
            Ok(Some(ColumnConstraint::PrimaryKey {
                autoincrement,
                on_conflict,
            }))
        } else if self.parse_keyword(Keyword::NOT) {
            self.expect_keyword(Keyword::NULL)?;
            let on_conflict = self.parse_conflict_clause()?;
            Ok(Some(ColumnConstraint::NotNull { on_conflict }))
        } else if self.parse_keyword(Keyword::NULL) {
            Ok(Some(ColumnConstraint::Null))
        } else if self.parse_keyword(Keyword::UNIQUE) {
            let on_conflict = self.parse_conflict_clause()?;
            Ok(Some(ColumnConstraint::Unique { on_conflict }))
        } else if self.parse_keyword(Keyword::CHECK) {
            self.expect_token(&TokenKind::LeftParen)?;
            let expr = self.parse_expr()?;
            self.expect_token(&TokenKind::RightParen)?;
            Ok(Some(ColumnConstraint::Check(expr)))
        } else if self.parse_keyword(Keyword::DEFAULT) {
            let expr = if self.next_token_if_is(&TokenKind::LeftParen) {
                let expr = self.parse_expr()?;
                self.expect_token(&TokenKind::RightParen)?;
                expr
            } else if self.peek_token().map(|t| t.kind == TokenKind::Minus) == Some(true) {
                self.parse_expr()?
            } else {
                sqlc_ast::Expr::Literal(self.parse_literal()?)
            };
            Ok(Some(ColumnConstraint::Default(expr)))
        } else if self.parse_keyword(Keyword::COLLATE) {
            Ok(Some(ColumnConstraint::Collate(self.parse_identifier()?)))
        } else if self.parse_keyword(Keyword::REFERENCES) {
            Ok(Some(ColumnConstraint::ForeignKey(
                self.parse_foreign_key_clause()?,
            )))
        } else if self.parse_keywords(&[Keyword::GENERATED, Keyword::ALWAYS, Keyword::AS])
            || self.parse_keyword(Keyword::AS)
        {
            self.expect_token(&TokenKind::LeftParen)?;
            let expr = self.parse_expr()?;
            self.expect_token(&TokenKind::RightParen)?;
            let stored = if self.parse_keyword(Keyword::STORED) {
                true
            } else {
                self.parse_keyword(Keyword::VIRTUAL);
                false
            };
            Ok(Some(ColumnConstraint::GeneratedAs { expr, stored }))
        } else {
            Ok(None)
        }
    }

    /// Parses `ON CONFLICT {ROLLBACK|ABORT|FAIL|IGNORE|REPLACE}`, if present.
    fn parse_conflict_clause(&mut self) -> Result<Option<ConflictClause>, ParseError> {
        if !self.parse_keywords(&[Keyword::ON, Keyword::CONFLICT]) {
            return Ok(None);
        }
        match self.parse_one_of_keywords(&[
            Keyword::ROLLBACK,
            Keyword::ABORT,
            Keyword::FAIL,
            Keyword::IGNORE,
            Keyword::REPLACE,
        ]) {
            Some(Keyword::ROLLBACK) => Ok(Some(ConflictClause::Rollback)),
            Some(Keyword::ABORT) => Ok(Some(ConflictClause::Abort)),
            Some(Keyword::FAIL) => Ok(Some(ConflictClause::Fail)),
            Some(Keyword::IGNORE) => Ok(Some(ConflictClause::Ignore)),
            Some(Keyword::REPLACE) => Ok(Some(ConflictClause::Replace)),
            _ => self.expected("ROLLBACK, ABORT, FAIL, IGNORE or REPLACE after ON CONFLICT"),
        }
    }

    fn parse_foreign_key_clause(&mut self) -> Result<ForeignKeyClause, ParseError> {
        let table = self.parse_object_name()?;
        let columns = if self.next_token_if_is(&TokenKind::LeftParen) {
            let cols = self.parse_comma_separated(Parser::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            cols
        } else {
            Vec::new()
        };
        let mut on_delete = None;
        let mut on_update = None;
        loop {
            if self.parse_keyword(Keyword::ON) {
                let action = self.parse_referential_action()?;
                if self.parse_keyword(Keyword::DELETE) {
                    on_delete = Some(action);
                } else {
                    self.expect_keyword(Keyword::UPDATE)?;
                    on_update = Some(action);
                }
            } else {
                break;
            }
        }
        self.parse_keyword(Keyword::DEFERRABLE);
        Ok(ForeignKeyClause {
            table,
            columns,
            on_delete,
            on_update,
        })
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction, ParseError> {
        // Peeks `DELETE`/`UPDATE` is handled by the caller; here we only see
        // the action keyword that follows once the caller commits to it, so
        // re-derive it from the next one or two keywords.
        if self.parse_keyword(Keyword::CASCADE) {
            Ok(ReferentialAction::Cascade)
        } else if self.parse_keyword(Keyword::RESTRICT) {
            Ok(ReferentialAction::Restrict)
        } else if self.parse_keywords(&[Keyword::SET, Keyword::NULL]) {
            Ok(ReferentialAction::SetNull)
        } else if self.parse_keywords(&[Keyword::SET, Keyword::DEFAULT]) {
            Ok(ReferentialAction::SetDefault)
        } else if self.parse_keywords(&[Keyword::NO, Keyword::ACTION])
            || self.parse_keyword(Keyword::NO)
        {
            Ok(ReferentialAction::NoAction)
        } else {
            self.expected("CASCADE, RESTRICT, SET NULL, SET DEFAULT or NO ACTION")
        }
    }

    /// Parses `CREATE [UNIQUE] INDEX [IF NOT EXISTS] name ON table (...) [WHERE ...]`.
    pub fn parse_create_index(
        &mut self,
        start: sqlc_diagnostics::Span,
        unique: bool,
    ) -> Result<CreateIndex, ParseError> {
        self.expect_keyword(Keyword::INDEX)?;
        let if_not_exists = self.parse_keywords(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS]);
        let name = self.parse_object_name()?;
        self.expect_keyword(Keyword::ON)?;
        let table = self.parse_object_name()?;
        self.expect_token(&TokenKind::LeftParen)?;
        let columns = self.parse_comma_separated(Parser::parse_indexed_column)?;
        self.expect_token(&TokenKind::RightParen)?;
        let predicate = if self.parse_keyword(Keyword::WHERE) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = self.current_span();
        Ok(CreateIndex {
            name,
            unique,
            if_not_exists,
            table,
            columns,
            predicate,
            span: start.to(end),
        })
    }

    fn parse_indexed_column(&mut self) -> Result<IndexedColumn, ParseError> {
        let expr = self.parse_expr()?;
        let descending = self.parse_keyword(Keyword::DESC);
        if !descending {
            self.parse_keyword(Keyword::ASC);
        }
        Ok(IndexedColumn { expr, descending })
    }

    /// Parses `CREATE [TEMP] VIEW [IF NOT EXISTS] name [(cols)] AS SELECT ...`.
    pub fn parse_create_view(
        &mut self,
        start: sqlc_diagnostics::Span,
        temporary: bool,
    ) -> Result<CreateView, ParseError> {
        self.expect_keyword(Keyword::VIEW)?;
        let if_not_exists = self.parse_keywords(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS]);
        let name = self.parse_object_name()?;
        let columns = if self.next_token_if_is(&TokenKind::LeftParen) {
            let cols = self.parse_comma_separated(Parser::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            cols
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::AS)?;
        let query = self.parse_select()?;
        let end = self.current_span();
        Ok(CreateView {
            name,
            if_not_exists,
            temporary,
            columns,
            query: Box::new(query),
            span: start.to(end),
        })
    }

    /// Parses `CREATE TRIGGER name {BEFORE|AFTER|INSTEAD OF} event ON table
    /// [FOR EACH ROW] [WHEN expr] BEGIN ... END`. Each body statement is
    /// parsed into the returned `CreateTrigger`'s `body`.
    pub fn parse_create_trigger(
        &mut self,
        start: sqlc_diagnostics::Span,
    ) -> Result<CreateTrigger, ParseError> {
        self.expect_keyword(Keyword::TRIGGER)?;
        let if_not_exists = self.parse_keywords(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS]);
        let name = self.parse_object_name()?;

        let timing = if self.parse_keyword(Keyword::BEFORE) {
            TriggerTiming::Before
        } else if self.parse_keyword(Keyword::AFTER) {
            TriggerTiming::After
        } else if self.parse_keywords(&[Keyword::INSTEAD, Keyword::OF]) {
            TriggerTiming::InsteadOf
        } else {
            TriggerTiming::Before
        };

        let event = if self.parse_keyword(Keyword::INSERT) {
            TriggerEvent::Insert
        } else if self.parse_keyword(Keyword::DELETE) {
            TriggerEvent::Delete
        } else if self.parse_keyword(Keyword::UPDATE) {
            let columns = if self.parse_keyword(Keyword::OF) {
                self.parse_comma_separated(Parser::parse_identifier)?
            } else {
                Vec::new()
            };
            TriggerEvent::Update { columns }
        } else {
            return self.expected("INSERT, DELETE or UPDATE");
        };

        self.expect_keyword(Keyword::ON)?;
        let table = self.parse_object_name()?;
        self.parse_keywords(&[Keyword::FOR, Keyword::EACH, Keyword::ROW]);

        let when = if self.parse_keyword(Keyword::WHEN) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let body_start = self.current_span();
        self.expect_keyword(Keyword::BEGIN)?;
        let mut body = Vec::new();
        let body_end = loop {
            if self.peek_token().map(|t| t.kind.is_keyword(Keyword::END)).unwrap_or(true) {
                break self
                    .next_token()
                    .ok_or(ParseError::Expected {
                        expected: "END to close the trigger body".into(),
                        found: None,
                        span: self.current_span(),
                    })?
                    .span;
            }
            body.push(self.parse_trigger_body_statement()?);
            self.expect_token(&TokenKind::SemiColon)?;
        };

        let end = self.current_span();
        Ok(CreateTrigger {
            name,
            if_not_exists,
            timing,
            event,
            table,
            when,
            body,
            body_span: body_start.to(body_end),
            span: start.to(end),
        })
    }

    /// Parses a single statement inside a trigger's `BEGIN ... END` body.
    /// SQLite only allows `SELECT`/`INSERT`/`UPDATE`/`DELETE` there; no DDL
    /// and no `WITH`-prefixed CTEs.
    fn parse_trigger_body_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        match self.peek_token().map(|t| t.kind.clone()) {
            Some(TokenKind::Keyword(Keyword::SELECT)) | Some(TokenKind::Keyword(Keyword::VALUES)) => {
                Ok(Statement::Select(Box::new(self.parse_select()?)))
            }
            Some(TokenKind::Keyword(Keyword::INSERT)) => {
                Ok(Statement::Insert(self.parse_insert(start, None)?))
            }
            Some(TokenKind::Keyword(Keyword::UPDATE)) => {
                Ok(Statement::Update(self.parse_update(start, None)?))
            }
            Some(TokenKind::Keyword(Keyword::DELETE)) => {
                Ok(Statement::Delete(self.parse_delete(start, None)?))
            }
            _ => self.expected("SELECT, INSERT, UPDATE or DELETE inside a trigger body"),
        }
    }

    /// Parses `ALTER TABLE name action`.
    pub fn parse_alter_table(&mut self, start: sqlc_diagnostics::Span) -> Result<AlterTable, ParseError> {
        self.expect_keyword(Keyword::TABLE)?;
        let name = self.parse_object_name()?;

        let action = if self.parse_keyword(Keyword::RENAME) {
            if self.parse_keyword(Keyword::TO) {
                AlterTableAction::RenameTable {
                    new_name: self.parse_object_name()?,
                }
            } else {
                self.parse_keyword(Keyword::COLUMN);
                let old_name = self.parse_identifier()?;
                self.expect_keyword(Keyword::TO)?;
                let new_name = self.parse_identifier()?;
                AlterTableAction::RenameColumn { old_name, new_name }
            }
        } else if self.parse_keyword(Keyword::ADD) {
            self.parse_keyword(Keyword::COLUMN);
            AlterTableAction::AddColumn {
                column: self.parse_column_def()?,
            }
        } else if self.parse_keyword(Keyword::DROP) {
            self.parse_keyword(Keyword::COLUMN);
            AlterTableAction::DropColumn {
                name: self.parse_identifier()?,
            }
        } else {
            return self.expected("RENAME, ADD or DROP");
        };

        let end = self.current_span();
        Ok(AlterTable {
            name,
            action,
            span: start.to(end),
        })
    }

    /// Parses `DROP {TABLE|INDEX|VIEW|TRIGGER} [IF EXISTS] name`.
    pub fn parse_drop_object(&mut self, start: sqlc_diagnostics::Span) -> Result<DropObject, ParseError> {
        let kind = if self.parse_keyword(Keyword::TABLE) {
            DropObjectKind::Table
        } else if self.parse_keyword(Keyword::INDEX) {
            DropObjectKind::Index
        } else if self.parse_keyword(Keyword::VIEW) {
            DropObjectKind::View
        } else if self.parse_keyword(Keyword::TRIGGER) {
            DropObjectKind::Trigger
        } else {
            return self.expected("TABLE, INDEX, VIEW or TRIGGER");
        };
        let if_exists = self.parse_keywords(&[Keyword::IF, Keyword::EXISTS]);
        let name = self.parse_object_name()?;
        let end = self.current_span();
        Ok(DropObject {
            kind,
            if_exists,
            name,
            span: start.to(end),
        })
    }

    /// Parses `REINDEX [name]`, assuming `REINDEX` has already been consumed.
    pub fn parse_reindex(&mut self, start: sqlc_diagnostics::Span) -> Result<ReIndex, ParseError> {
        let name = if matches!(
            self.peek_token().map(|t| &t.kind),
            Some(TokenKind::Ident(_)) | Some(TokenKind::Keyword(_))
        ) {
            Some(self.parse_object_name()?)
        } else {
            None
        };
        let end = self.current_span();
        Ok(ReIndex {
            name,
            span: start.to(end),
        })
    }

    /// Parses `PRAGMA name [= value | (value)]`, assuming `PRAGMA` has
    /// already been consumed.
    pub fn parse_pragma(&mut self, start: sqlc_diagnostics::Span) -> Result<Pragma, ParseError> {
        let name = self.parse_identifier()?;
        let value = if self.next_token_if_is(&TokenKind::Equal) {
            Some(self.parse_expr()?)
        } else if self.next_token_if_is(&TokenKind::LeftParen) {
            let expr = self.parse_expr()?;
            self.expect_token(&TokenKind::RightParen)?;
            Some(expr)
        } else {
            None
        };
        let end = self.current_span();
        Ok(Pragma {
            name,
            value,
            span: start.to(end),
        })
    }
}

#[cfg(test)]
mod tests {
    use sqlc_ast::{Statement, TriggerEvent, TriggerTiming};

    use super::*;
    use crate::parser::Parser;

    fn parse_stmt(sql: &str) -> Statement {
        Parser::new_with_source(sql)
            .and_then(|mut p| p.parse_statement())
            .unwrap_or_else(|e| panic!("failed to parse `{sql}`: {e}"))
    }

    #[test]
    fn create_table_with_column_and_table_constraints() {
        match parse_stmt(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT AS String NOT NULL,
                age INTEGER DEFAULT 0,
                UNIQUE (email)
            )",
        ) {
            Statement::CreateTable(create) => {
                assert!(create.if_not_exists);
                match create.body {
                    CreateTableBody::Columns { columns, constraints, .. } => {
                        assert_eq!(columns.len(), 3);
                        assert_eq!(constraints.len(), 1);
                        assert!(matches!(
                            columns[0].constraints[0],
                            ColumnConstraint::PrimaryKey { autoincrement: true, .. }
                        ));
                        assert_eq!(columns[1].data_type.as_ref().unwrap().host_type.as_ref().unwrap().value, "String");
                        assert!(matches!(constraints[0], TableConstraint::Unique { .. }));
                    }
                    other => panic!("expected a column-bodied table, got {other:?}"),
                }
            }
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn create_table_as_select() {
        match parse_stmt("CREATE TABLE recent AS SELECT * FROM events") {
            Statement::CreateTable(create) => {
                assert!(matches!(create.body, CreateTableBody::AsSelect(_)));
            }
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn foreign_key_with_referential_actions() {
        match parse_stmt(
            "CREATE TABLE orders (
                user_id INTEGER REFERENCES users(id) ON DELETE CASCADE ON UPDATE SET NULL
            )",
        ) {
            Statement::CreateTable(create) => match create.body {
                CreateTableBody::Columns { columns, .. } => match &columns[0].constraints[0] {
                    ColumnConstraint::ForeignKey(fk) => {
                        assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
                        assert_eq!(fk.on_update, Some(ReferentialAction::SetNull));
                    }
                    other => panic!("expected a foreign key constraint, got {other:?}"),
                },
                other => panic!("expected a column-bodied table, got {other:?}"),
            },
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn create_unique_index_with_predicate() {
        match parse_stmt("CREATE UNIQUE INDEX idx ON t (a DESC) WHERE a IS NOT NULL") {
            Statement::CreateIndex(index) => {
                assert!(index.unique);
                assert_eq!(index.columns.len(), 1);
                assert!(index.columns[0].descending);
                assert!(index.predicate.is_some());
            }
            other => panic!("expected CREATE INDEX, got {other:?}"),
        }
    }

    #[test]
    fn create_view_with_column_list() {
        match parse_stmt("CREATE VIEW v (a, b) AS SELECT x, y FROM t") {
            Statement::CreateView(view) => assert_eq!(view.columns.len(), 2),
            other => panic!("expected CREATE VIEW, got {other:?}"),
        }
    }

    #[test]
    fn create_trigger_parses_body_statements() {
        match parse_stmt(
            "CREATE TRIGGER trg AFTER INSERT ON t FOR EACH ROW BEGIN SELECT 1; END",
        ) {
            Statement::CreateTrigger(trigger) => {
                assert_eq!(trigger.timing, TriggerTiming::After);
                assert!(matches!(trigger.event, TriggerEvent::Insert));
                assert_eq!(trigger.body.len(), 1);
                assert!(matches!(trigger.body[0], Statement::Select(_)));
            }
            other => panic!("expected CREATE TRIGGER, got {other:?}"),
        }
    }

    #[test]
    fn create_trigger_body_rejects_ddl() {
        let err = Parser::new_with_source(
            "CREATE TRIGGER trg AFTER INSERT ON t BEGIN CREATE TABLE x (a INTEGER); END",
        )
        .and_then(|mut p| p.parse_statement())
        .unwrap_err();
        assert!(matches!(err, ParseError::Expected { .. }));
    }

    #[test]
    fn create_trigger_instead_of_update_of_columns() {
        match parse_stmt(
            "CREATE TRIGGER trg INSTEAD OF UPDATE OF a, b ON v BEGIN SELECT 1; END",
        ) {
            Statement::CreateTrigger(trigger) => {
                assert_eq!(trigger.timing, TriggerTiming::InsteadOf);
                match trigger.event {
                    TriggerEvent::Update { columns } => assert_eq!(columns.len(), 2),
                    other => panic!("expected an UPDATE OF event, got {other:?}"),
                }
            }
            other => panic!("expected CREATE TRIGGER, got {other:?}"),
        }
    }

    #[test]
    fn create_trigger_with_multiple_body_statements() {
        match parse_stmt(
            "CREATE TRIGGER trg AFTER INSERT ON t BEGIN
                UPDATE t SET a = 1;
                SELECT 1;
            END",
        ) {
            Statement::CreateTrigger(trigger) => {
                assert_eq!(trigger.body.len(), 2);
                assert!(matches!(trigger.body[0], Statement::Update(_)));
                assert!(matches!(trigger.body[1], Statement::Select(_)));
            }
            other => panic!("expected CREATE TRIGGER, got {other:?}"),
        }
    }

    #[test]
    fn alter_table_rename_and_add_column() {
        match parse_stmt("ALTER TABLE t RENAME TO t2") {
            Statement::AlterTable(alter) => {
                assert!(matches!(alter.action, AlterTableAction::RenameTable { .. }))
            }
            other => panic!("expected ALTER TABLE, got {other:?}"),
        }
        match parse_stmt("ALTER TABLE t ADD COLUMN c INTEGER") {
            Statement::AlterTable(alter) => {
                assert!(matches!(alter.action, AlterTableAction::AddColumn { .. }))
            }
            other => panic!("expected ALTER TABLE, got {other:?}"),
        }
    }

    #[test]
    fn drop_table_if_exists() {
        match parse_stmt("DROP TABLE IF EXISTS t") {
            Statement::Drop(drop) => {
                assert_eq!(drop.kind, DropObjectKind::Table);
                assert!(drop.if_exists);
            }
            other => panic!("expected DROP, got {other:?}"),
        }
    }

    #[test]
    fn reindex_with_and_without_name() {
        assert!(matches!(parse_stmt("REINDEX"), Statement::ReIndex(r) if r.name.is_none()));
        assert!(matches!(parse_stmt("REINDEX idx"), Statement::ReIndex(r) if r.name.is_some()));
    }

    #[test]
    fn pragma_with_equals_value() {
        match parse_stmt("PRAGMA foreign_keys = ON") {
            Statement::Pragma(pragma) => {
                assert_eq!(pragma.name.value, "foreign_keys");
                assert!(pragma.value.is_some());
            }
            other => panic!("expected PRAGMA, got {other:?}"),
        }
    }

    #[test]
    fn without_rowid_and_strict_modifiers() {
        match parse_stmt("CREATE TABLE t (a INTEGER) WITHOUT ROWID") {
            Statement::CreateTable(create) => match create.body {
                CreateTableBody::Columns { without_rowid, .. } => assert!(without_rowid),
                other => panic!("expected a column-bodied table, got {other:?}"),
            },
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
        match parse_stmt("CREATE TABLE t (a INTEGER) STRICT") {
            Statement::CreateTable(create) => match create.body {
                CreateTableBody::Columns { strict, .. } => assert!(strict),
                other => panic!("expected a column-bodied table, got {other:?}"),
            },
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
    }
}
