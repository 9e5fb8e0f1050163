use sqlc_ast::{
    MigrationFile, QueryDef, QueryFile, QuerySignatureHint, Statement,
};
use sqlc_diagnostics::Span;
use sqlc_lexer::{Keyword, ParamSigil, TokenKind};

use crate::{error::ParseError, parser::Parser};

impl Parser {
    /// Parses a whole migration file: a semicolon-separated sequence of DDL
    /// statements.
    pub fn parse_migration_file(&mut self) -> Result<MigrationFile, ParseError> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            statements.push(self.parse_statement()?);
            self.expect_token(&TokenKind::SemiColon)?;
        }
        Ok(MigrationFile { statements })
    }

    /// Parses a whole user query file: a sequence of [`QueryDef`]
    /// declarations in either the block (`name: <stmt>;`) or wrapped
    /// (`DEFINE QUERY name[(...)] AS <stmt>;`) surface form. Both forms may
    /// appear interchangeably within the same file.
    pub fn parse_query_file(&mut self) -> Result<QueryFile, ParseError> {
        let mut queries = Vec::new();
        while !self.at_eof() {
            queries.push(self.parse_query_def()?);
        }
        Ok(QueryFile { queries })
    }

    fn at_eof(&mut self) -> bool {
        self.peek_token().map(|t| t.is_eof()).unwrap_or(true)
    }

    fn parse_query_def(&mut self) -> Result<QueryDef, ParseError> {
        let start = self.current_span();
        if self.parse_keyword(Keyword::DEFINE) {
            self.expect_keyword(Keyword::QUERY)?;
            let name = self.parse_identifier()?;
            let hint = if self.next_token_if_is(&TokenKind::LeftParen) {
                let input = self.parse_data_type()?;
                self.expect_token(&TokenKind::Comma)?;
                let output = self.parse_data_type()?;
                self.expect_token(&TokenKind::RightParen)?;
                Some(QuerySignatureHint {
                    input: Some(input),
                    output: Some(output),
                })
            } else {
                None
            };
            self.expect_keyword(Keyword::AS)?;
            let statement = self.parse_statement()?;
            self.expect_token(&TokenKind::SemiColon)?;
            let end = self.current_span();
            Ok(QueryDef {
                name,
                hint,
                statement: Box::new(statement),
                is_define_query_form: true,
                span: start.to(end),
            })
        } else {
            let name = self.parse_identifier()?;
            self.expect_block_colon()?;
            let statement = self.parse_statement()?;
            self.expect_token(&TokenKind::SemiColon)?;
            let end = self.current_span();
            Ok(QueryDef {
                name,
                hint: None,
                statement: Box::new(statement),
                is_define_query_form: false,
                span: start.to(end),
            })
        }
    }

    /// The block form's `name:` separator lexes as an empty-named
    /// `:`-sigil bind parameter (the same token the lexer produces for
    /// `:foo`), since a bare `:` with nothing alphanumeric following it
    /// carries no parameter name. Consumes it or errors.
    fn expect_block_colon(&mut self) -> Result<(), ParseError> {
        let matched = self
            .next_token_if(|t| {
                matches!(
                    &t.kind,
                    TokenKind::BindNamed(ParamSigil::Colon, name) if name.is_empty()
                )
            })
            .is_some();
        if matched {
            Ok(())
        } else {
            self.expected("':' after the query name")
        }
    }

    /// Parses any single top-level statement (DDL or DML/query), dispatching
    /// on the leading keyword. Used both for migration files and for the
    /// statement wrapped inside a [`QueryDef`].
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();

        if self.peek_token().map(|t| t.kind.is_keyword(Keyword::WITH)) == Some(true) {
            let with = self.parse_with_clause()?;
            return match self.peek_token().map(|t| t.kind.clone()) {
                Some(TokenKind::Keyword(Keyword::INSERT)) => {
                    Ok(Statement::Insert(self.parse_insert(start, with)?))
                }
                Some(TokenKind::Keyword(Keyword::UPDATE)) => {
                    Ok(Statement::Update(self.parse_update(start, with)?))
                }
                Some(TokenKind::Keyword(Keyword::DELETE)) => {
                    Ok(Statement::Delete(self.parse_delete(start, with)?))
                }
                Some(TokenKind::Keyword(Keyword::SELECT)) | Some(TokenKind::Keyword(Keyword::VALUES)) => {
                    Ok(Statement::Select(Box::new(
                        self.parse_select_with(with, start)?,
                    )))
                }
                _ => self.expected("SELECT, VALUES, INSERT, UPDATE or DELETE after WITH"),
            };
        }

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
            Some(TokenKind::Keyword(Keyword::CREATE)) => self.parse_create_statement(start),
            Some(TokenKind::Keyword(Keyword::ALTER)) => {
                self.next_token();
                Ok(Statement::AlterTable(self.parse_alter_table(start)?))
            }
            Some(TokenKind::Keyword(Keyword::DROP)) => {
                self.next_token();
                Ok(Statement::Drop(self.parse_drop_object(start)?))
            }
            Some(TokenKind::Keyword(Keyword::PRAGMA)) => {
                self.next_token();
                Ok(Statement::Pragma(self.parse_pragma(start)?))
            }
            Some(TokenKind::Keyword(Keyword::REINDEX)) => {
                self.next_token();
                Ok(Statement::ReIndex(self.parse_reindex(start)?))
            }
            _ => self.expected("a statement"),
        }
    }

    fn parse_create_statement(&mut self, start: Span) -> Result<Statement, ParseError> {
        self.next_token(); // CREATE
        let temporary = self.parse_keyword(Keyword::TEMPORARY) || self.parse_keyword(Keyword::TEMP);

        if self.peek_token().map(|t| t.kind.is_keyword(Keyword::TABLE)) == Some(true) {
            return Ok(Statement::CreateTable(self.parse_create_table(start, temporary)?));
        }
        if self.peek_token().map(|t| t.kind.is_keyword(Keyword::VIEW)) == Some(true) {
            return Ok(Statement::CreateView(self.parse_create_view(start, temporary)?));
        }
        if temporary {
            return self.expected("TABLE or VIEW after CREATE TEMP/TEMPORARY");
        }

        let unique = self.parse_keyword(Keyword::UNIQUE);
        if unique || self.peek_token().map(|t| t.kind.is_keyword(Keyword::INDEX)) == Some(true) {
            return Ok(Statement::CreateIndex(self.parse_create_index(start, unique)?));
        }
        if self.peek_token().map(|t| t.kind.is_keyword(Keyword::TRIGGER)) == Some(true) {
            return Ok(Statement::CreateTrigger(self.parse_create_trigger(start)?));
        }
        self.expected("TABLE, VIEW, INDEX or TRIGGER after CREATE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_file_parses_a_sequence_of_ddl_statements() {
        let source = "CREATE TABLE t (a INTEGER); ALTER TABLE t ADD COLUMN b INTEGER;";
        let file = Parser::new_with_source(source)
            .and_then(|mut p| p.parse_migration_file())
            .expect("migration file should parse");
        assert_eq!(file.statements.len(), 2);
        assert!(matches!(file.statements[0], Statement::CreateTable(_)));
        assert!(matches!(file.statements[1], Statement::AlterTable(_)));
    }

    #[test]
    fn query_file_block_form() {
        let source = "get_user: SELECT * FROM users WHERE id = :id;";
        let file = Parser::new_with_source(source)
            .and_then(|mut p| p.parse_query_file())
            .expect("query file should parse");
        assert_eq!(file.queries.len(), 1);
        let query = &file.queries[0];
        assert_eq!(query.name.value, "get_user");
        assert!(!query.is_define_query_form);
        assert!(query.hint.is_none());
        assert!(matches!(*query.statement, Statement::Select(_)));
    }

    #[test]
    fn query_file_define_query_form_with_hint() {
        let source = "DEFINE QUERY get_user(UserId, User) AS SELECT * FROM users WHERE id = :id;";
        let file = Parser::new_with_source(source)
            .and_then(|mut p| p.parse_query_file())
            .expect("query file should parse");
        let query = &file.queries[0];
        assert_eq!(query.name.value, "get_user");
        assert!(query.is_define_query_form);
        let hint = query.hint.as_ref().expect("expected a signature hint");
        assert_eq!(hint.input.as_ref().unwrap().name.value, "UserId");
        assert_eq!(hint.output.as_ref().unwrap().name.value, "User");
    }

    #[test]
    fn query_file_define_query_form_without_hint() {
        let source = "DEFINE QUERY all_users AS SELECT * FROM users;";
        let file = Parser::new_with_source(source)
            .and_then(|mut p| p.parse_query_file())
            .expect("query file should parse");
        assert!(file.queries[0].hint.is_none());
    }

    #[test]
    fn query_file_accepts_both_surface_forms_interchangeably() {
        let source = "a: SELECT 1; DEFINE QUERY b AS SELECT 2;";
        let file = Parser::new_with_source(source)
            .and_then(|mut p| p.parse_query_file())
            .expect("query file should parse");
        assert_eq!(file.queries.len(), 2);
        assert!(!file.queries[0].is_define_query_form);
        assert!(file.queries[1].is_define_query_form);
    }

    #[test]
    fn query_file_with_clause_dispatches_to_insert() {
        let source = "ins: WITH src AS (SELECT 1 AS x) INSERT INTO t (x) SELECT x FROM src;";
        let file = Parser::new_with_source(source)
            .and_then(|mut p| p.parse_query_file())
            .expect("query file should parse");
        match &*file.queries[0].statement {
            Statement::Insert(insert) => assert!(insert.with.is_some()),
            other => panic!("expected an INSERT statement, got {other:?}"),
        }
    }

    #[test]
    fn block_form_missing_colon_is_an_error() {
        let err = Parser::new_with_source("get_user SELECT 1;")
            .and_then(|mut p| p.parse_query_file())
            .unwrap_err();
        assert!(matches!(err, ParseError::Expected { .. }));
    }
}
