use sqlc_ast::{
    Assignment, ConflictAction, Delete, Insert, InsertSource, OnConflict, OnConflictAction,
    ReturningItem, Update, With,
};
use sqlc_lexer::{Keyword, TokenKind};

use crate::{error::ParseError, parser::Parser};

impl Parser {
    /// Parses `[WITH ...] INSERT [OR action] INTO table [(cols)] source
    /// [ON CONFLICT ...] [RETURNING ...]`, assuming any leading `WITH` clause
    /// has already been consumed by the caller and is passed in as `with`.
    pub fn parse_insert(&mut self, start: sqlc_diagnostics::Span, with: Option<With>) -> Result<Insert, ParseError> {
        self.expect_keyword(Keyword::INSERT)?;
        let or_action = self.parse_or_conflict_action()?;
        self.expect_keyword(Keyword::INTO)?;
        let table = self.parse_object_name()?;

        let columns = if self.next_token_if_is(&TokenKind::LeftParen) {
            let cols = self.parse_comma_separated(Parser::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            cols
        } else {
            Vec::new()
        };

        let source = if self.parse_keywords(&[Keyword::DEFAULT, Keyword::VALUES]) {
            InsertSource::DefaultValues
        } else if self.peek_token().map(|t| t.kind.is_keyword(Keyword::VALUES)) == Some(true) {
            self.next_token();
            InsertSource::Values(self.parse_comma_separated(Parser::parse_insert_row)?)
        } else {
            InsertSource::Query(Box::new(self.parse_select()?))
        };

        let on_conflict = self.parse_on_conflict_clause()?;
        let returning = self.parse_returning_clause()?;
        let end = self.current_span();

        Ok(Insert {
            with,
            or_action,
            table,
            columns,
            source,
            on_conflict,
            returning,
            span: start.to(end),
        })
    }

    fn parse_insert_row(&mut self) -> Result<Vec<sqlc_ast::Expr>, ParseError> {
        self.expect_token(&TokenKind::LeftParen)?;
        let row = self.parse_comma_separated(Parser::parse_expr)?;
        self.expect_token(&TokenKind::RightParen)?;
        Ok(row)
    }

    /// Parses the `OR <action>` shorthand after `INSERT`/`UPDATE`.
    fn parse_or_conflict_action(&mut self) -> Result<Option<ConflictAction>, ParseError> {
        if !self.parse_keyword(Keyword::OR) {
            return Ok(None);
        }
        match self.parse_one_of_keywords(&[
            Keyword::ROLLBACK,
            Keyword::ABORT,
            Keyword::FAIL,
            Keyword::IGNORE,
            Keyword::REPLACE,
        ]) {
            Some(Keyword::ROLLBACK) => Ok(Some(ConflictAction::Rollback)),
            Some(Keyword::ABORT) => Ok(Some(ConflictAction::Abort)),
            Some(Keyword::FAIL) => Ok(Some(ConflictAction::Fail)),
            Some(Keyword::IGNORE) => Ok(Some(ConflictAction::Ignore)),
            Some(Keyword::REPLACE) => Ok(Some(ConflictAction::Replace)),
            _ => self.expected("ROLLBACK, ABORT, FAIL, IGNORE or REPLACE after OR"),
        }
    }

    fn parse_on_conflict_clause(&mut self) -> Result<Option<OnConflict>, ParseError> {
        if !self.parse_keywords(&[Keyword::ON, Keyword::CONFLICT]) {
            return Ok(None);
        }
        let target = if self.next_token_if_is(&TokenKind::LeftParen) {
            let cols = self.parse_comma_separated(Parser::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            cols
        } else {
            Vec::new()
        };
        let target_where = if !target.is_empty() && self.parse_keyword(Keyword::WHERE) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::DO)?;
        let action = if self.parse_keyword(Keyword::NOTHING) {
            OnConflictAction::DoNothing
        } else {
            self.expect_keyword(Keyword::UPDATE)?;
            self.expect_keyword(Keyword::SET)?;
            let assignments = self.parse_comma_separated(Parser::parse_assignment)?;
            let selection = if self.parse_keyword(Keyword::WHERE) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            OnConflictAction::DoUpdate {
                assignments,
                selection,
            }
        };
        Ok(Some(OnConflict {
            target,
            target_where,
            action,
        }))
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        if self.next_token_if_is(&TokenKind::LeftParen) {
            let columns = self.parse_comma_separated(Parser::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            self.expect_token(&TokenKind::Equal)?;
            self.expect_token(&TokenKind::LeftParen)?;
            let values = self.parse_comma_separated(Parser::parse_expr)?;
            self.expect_token(&TokenKind::RightParen)?;
            Ok(Assignment::Tuple { columns, values })
        } else {
            let column = self.parse_identifier()?;
            self.expect_token(&TokenKind::Equal)?;
            let value = self.parse_expr()?;
            Ok(Assignment::Single { column, value })
        }
    }

    fn parse_returning_clause(&mut self) -> Result<Vec<ReturningItem>, ParseError> {
        if !self.parse_keyword(Keyword::RETURNING) {
            return Ok(Vec::new());
        }
        if self.next_token_if_is(&TokenKind::Asterisk) {
            return Ok(vec![ReturningItem {
                expr: sqlc_ast::Expr::Wildcard {
                    span: self.current_span(),
                },
                alias: None,
            }]);
        }
        self.parse_comma_separated(Parser::parse_returning_item)
    }

    fn parse_returning_item(&mut self) -> Result<ReturningItem, ParseError> {
        let expr = self.parse_expr()?;
        let alias = if self.parse_keyword(Keyword::AS) {
            Some(self.parse_identifier()?)
        } else if matches!(self.peek_token().map(|t| &t.kind), Some(TokenKind::Ident(_))) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        Ok(ReturningItem { expr, alias })
    }

    /// Parses `[WITH ...] UPDATE [OR action] table SET assignments [WHERE ...]
    /// [RETURNING ...]`.
    pub fn parse_update(&mut self, start: sqlc_diagnostics::Span, with: Option<With>) -> Result<Update, ParseError> {
        self.expect_keyword(Keyword::UPDATE)?;
        let or_action = self.parse_or_conflict_action()?;
        let table = self.parse_object_name()?;
        self.expect_keyword(Keyword::SET)?;
        let assignments = self.parse_comma_separated(Parser::parse_assignment)?;
        let selection = if self.parse_keyword(Keyword::WHERE) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let returning = self.parse_returning_clause()?;
        let end = self.current_span();
        Ok(Update {
            with,
            or_action,
            table,
            assignments,
            selection,
            returning,
            span: start.to(end),
        })
    }

    /// Parses `[WITH ...] DELETE FROM table [WHERE ...] [RETURNING ...]`.
    pub fn parse_delete(&mut self, start: sqlc_diagnostics::Span, with: Option<With>) -> Result<Delete, ParseError> {
        self.expect_keyword(Keyword::DELETE)?;
        self.expect_keyword(Keyword::FROM)?;
        let table = self.parse_object_name()?;
        let selection = if self.parse_keyword(Keyword::WHERE) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let returning = self.parse_returning_clause()?;
        let end = self.current_span();
        Ok(Delete {
            with,
            table,
            selection,
            returning,
            span: start.to(end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse_insert(sql: &str) -> Insert {
        Parser::new_with_source(sql)
            .and_then(|mut p| p.parse_insert(sqlc_diagnostics::Span::empty_at(0), None))
            .unwrap_or_else(|e| panic!("failed to parse `{sql}`: {e}"))
    }

    fn parse_update(sql: &str) -> Update {
        Parser::new_with_source(sql)
            .and_then(|mut p| p.parse_update(sqlc_diagnostics::Span::empty_at(0), None))
            .unwrap_or_else(|e| panic!("failed to parse `{sql}`: {e}"))
    }

    fn parse_delete(sql: &str) -> Delete {
        Parser::new_with_source(sql)
            .and_then(|mut p| p.parse_delete(sqlc_diagnostics::Span::empty_at(0), None))
            .unwrap_or_else(|e| panic!("failed to parse `{sql}`: {e}"))
    }

    #[test]
    fn insert_values_with_explicit_columns() {
        let insert = parse_insert("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)");
        assert_eq!(insert.columns.len(), 2);
        match insert.source {
            InsertSource::Values(rows) => assert_eq!(rows.len(), 2),
            other => panic!("expected VALUES source, got {other:?}"),
        }
    }

    #[test]
    fn insert_default_values() {
        let insert = parse_insert("INSERT INTO t DEFAULT VALUES");
        assert!(matches!(insert.source, InsertSource::DefaultValues));
    }

    #[test]
    fn insert_from_select() {
        let insert = parse_insert("INSERT INTO t SELECT * FROM u");
        assert!(matches!(insert.source, InsertSource::Query(_)));
    }

    #[test]
    fn insert_or_replace_conflict_action() {
        let insert = parse_insert("INSERT OR REPLACE INTO t VALUES (1)");
        assert_eq!(insert.or_action, Some(ConflictAction::Replace));
    }

    #[test]
    fn insert_on_conflict_do_nothing() {
        let insert = parse_insert("INSERT INTO t (id) VALUES (1) ON CONFLICT (id) DO NOTHING");
        let on_conflict = insert.on_conflict.expect("expected an ON CONFLICT clause");
        assert_eq!(on_conflict.target.len(), 1);
        assert!(matches!(on_conflict.action, OnConflictAction::DoNothing));
    }

    #[test]
    fn insert_on_conflict_do_update_with_where() {
        let insert = parse_insert(
            "INSERT INTO t (id, n) VALUES (1, 1) ON CONFLICT (id) DO UPDATE SET n = n + 1 WHERE n < 10",
        );
        let on_conflict = insert.on_conflict.expect("expected an ON CONFLICT clause");
        match on_conflict.action {
            OnConflictAction::DoUpdate { assignments, selection } => {
                assert_eq!(assignments.len(), 1);
                assert!(selection.is_some());
            }
            other => panic!("expected DO UPDATE, got {other:?}"),
        }
    }

    #[test]
    fn insert_returning_star() {
        let insert = parse_insert("INSERT INTO t (id) VALUES (1) RETURNING *");
        assert_eq!(insert.returning.len(), 1);
        assert!(matches!(insert.returning[0].expr, sqlc_ast::Expr::Wildcard { .. }));
    }

    #[test]
    fn insert_returning_aliased_columns() {
        let insert = parse_insert("INSERT INTO t (id) VALUES (1) RETURNING id AS new_id");
        assert_eq!(insert.returning.len(), 1);
        assert_eq!(insert.returning[0].alias.as_ref().map(|a| a.value.as_str()), Some("new_id"));
    }

    #[test]
    fn update_with_tuple_assignment() {
        let update = parse_update("UPDATE t SET (a, b) = (1, 2) WHERE id = 1");
        match &update.assignments[0] {
            Assignment::Tuple { columns, values } => {
                assert_eq!(columns.len(), 2);
                assert_eq!(values.len(), 2);
            }
            other => panic!("expected a tuple assignment, got {other:?}"),
        }
        assert!(update.selection.is_some());
    }

    #[test]
    fn update_or_rollback() {
        let update = parse_update("UPDATE OR ROLLBACK t SET a = 1");
        assert_eq!(update.or_action, Some(ConflictAction::Rollback));
    }

    #[test]
    fn delete_with_where_and_returning() {
        let delete = parse_delete("DELETE FROM t WHERE id = 1 RETURNING id");
        assert!(delete.selection.is_some());
        assert_eq!(delete.returning.len(), 1);
    }

    #[test]
    fn delete_without_where_deletes_everything() {
        let delete = parse_delete("DELETE FROM t");
        assert!(delete.selection.is_none());
    }
}
