use std::iter::Peekable;
use std::str::CharIndices;

use sqlc_diagnostics::Span;

use crate::error::LexerError;
use crate::token::{ParamSigil, Token, TokenKind};

/// Tokenizes `input`, producing a sequence of tokens terminated by
/// `TokenKind::Eof`. Whitespace and comments are recognized but never
/// emitted; the lexer is a pure function of `input`.
pub struct Lexer<'a> {
    iter: Peekable<CharIndices<'a>>,
    len: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            iter: input.char_indices().peekable(),
            len: input.len() as u32,
        }
    }

    /// Tokenizes the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn offset(&mut self) -> u32 {
        self.iter.peek().map(|&(i, _)| i as u32).unwrap_or(self.len)
    }

    fn bump(&mut self) -> Option<char> {
        self.iter.next().map(|(_, ch)| ch)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.iter.peek().map(|&(_, ch)| ch)
    }

    fn bump_if(&mut self, ch: char) -> bool {
        if self.peek_char() == Some(ch) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(ch) = self.peek_char() {
            if pred(ch) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(ch) = self.peek_char() {
            if pred(ch) {
                s.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_trivia()?;

        let start = self.offset();
        let ch = match self.peek_char() {
            None => return Ok(Token::new(TokenKind::Eof, Span::empty_at(start))),
            Some(ch) => ch,
        };

        let kind = match ch {
            c if is_ident_start(c) => self.lex_ident_or_prefixed_literal()?,
            c if c.is_ascii_digit() => self.lex_number(),
            '.' => {
                self.bump();
                if self.peek_char().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    let rest = self.take_while(|c| c.is_ascii_digit());
                    TokenKind::Number(format!(".{}", rest))
                } else {
                    TokenKind::Period
                }
            }
            '\'' => {
                self.bump();
                TokenKind::String(self.lex_quoted(start, '\'', "string literal")?)
            }
            '"' => {
                self.bump();
                let value = self.lex_quoted(start, '"', "quoted identifier")?;
                TokenKind::ident_or_keyword(value, Some('"'))
            }
            '`' => {
                self.bump();
                let value = self.lex_quoted(start, '`', "quoted identifier")?;
                TokenKind::ident_or_keyword(value, Some('`'))
            }
            '[' => {
                self.bump();
                let value = self.take_while(|c| c != ']');
                if !self.bump_if(']') {
                    return Err(LexerError::Unterminated {
                        kind: "quoted identifier",
                        span: Span::new(start, self.offset()),
                    });
                }
                TokenKind::ident_or_keyword(value, Some('['))
            }
            '?' => {
                self.bump();
                if self.peek_char().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    let digits = self.take_while(|c| c.is_ascii_digit());
                    let n: u32 = digits.parse().unwrap_or(0);
                    TokenKind::BindIndexed(n)
                } else {
                    TokenKind::BindAnonymous
                }
            }
            ':' => {
                self.bump();
                let name = self.take_while(is_ident_part);
                TokenKind::BindNamed(ParamSigil::Colon, name)
            }
            '@' => {
                self.bump();
                let name = self.take_while(is_ident_part);
                TokenKind::BindNamed(ParamSigil::At, name)
            }
            '$' => {
                self.bump();
                let name = self.take_while(is_ident_part);
                TokenKind::BindNamed(ParamSigil::Dollar, name)
            }
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::SemiColon),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '+' => self.single(TokenKind::Plus),
            '*' => self.single(TokenKind::Asterisk),
            '%' => self.single(TokenKind::Percent),
            '~' => self.single(TokenKind::Tilde),
            '=' => {
                self.bump();
                self.bump_if('=');
                TokenKind::Equal
            }
            '-' => {
                self.bump();
                if self.bump_if('>') {
                    if self.bump_if('>') {
                        TokenKind::DoubleArrow
                    } else {
                        TokenKind::Arrow
                    }
                } else {
                    TokenKind::Minus
                }
            }
            '/' => {
                self.bump();
                TokenKind::Slash
            }
            '<' => {
                self.bump();
                if self.bump_if('=') {
                    TokenKind::LessThanOrEqual
                } else if self.bump_if('>') {
                    TokenKind::NotEqual
                } else if self.bump_if('<') {
                    TokenKind::LeftShift
                } else {
                    TokenKind::LessThan
                }
            }
            '>' => {
                self.bump();
                if self.bump_if('=') {
                    TokenKind::GreaterThanOrEqual
                } else if self.bump_if('>') {
                    TokenKind::RightShift
                } else {
                    TokenKind::GreaterThan
                }
            }
            '!' => {
                self.bump();
                if self.bump_if('=') {
                    TokenKind::NotEqual
                } else {
                    return Err(LexerError::InvalidCharacter {
                        found: '!',
                        span: Span::new(start, self.offset()),
                    });
                }
            }
            '&' => self.single(TokenKind::Ampersand),
            '|' => {
                self.bump();
                if self.bump_if('|') {
                    TokenKind::Concat
                } else {
                    TokenKind::Pipe
                }
            }
            other => {
                self.bump();
                return Err(LexerError::InvalidCharacter {
                    found: other,
                    span: Span::new(start, self.offset()),
                });
            }
        };

        Ok(Token::new(kind, Span::new(start, self.offset())))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    /// Skips whitespace, `--` line comments and `/* */` block comments
    /// (which do not nest, per the dialect's grammar).
    fn skip_trivia(&mut self) -> Result<(), LexerError> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('-') => {
                    let mut lookahead = self.iter.clone();
                    lookahead.next();
                    if lookahead.peek().map(|&(_, c)| c) == Some('-') {
                        self.bump();
                        self.bump();
                        self.skip_while(|c| c != '\n');
                    } else {
                        return Ok(());
                    }
                }
                Some('/') => {
                    let mut lookahead = self.iter.clone();
                    lookahead.next();
                    if lookahead.peek().map(|&(_, c)| c) == Some('*') {
                        let start = self.offset();
                        self.bump();
                        self.bump();
                        loop {
                            match self.bump() {
                                Some('*') if self.peek_char() == Some('/') => {
                                    self.bump();
                                    break;
                                }
                                Some(_) => {}
                                None => {
                                    return Err(LexerError::UnterminatedComment {
                                        span: Span::new(start, self.offset()),
                                    })
                                }
                            }
                        }
                    } else {
                        return Ok(());
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Consumes an identifier, a keyword, or one of the `N'...'`/`X'...'`
    /// prefixed literal forms that share the identifier's start character.
    fn lex_ident_or_prefixed_literal(&mut self) -> Result<TokenKind, LexerError> {
        let start = self.offset();
        let first = self.bump().expect("caller peeked a char");
        if matches!(first, 'x' | 'X') && self.peek_char() == Some('\'') {
            self.bump();
            let hex = self.lex_quoted(start, '\'', "blob literal")?;
            if hex.len() % 2 != 0 || !hex.bytes().all(|b| (b as char).is_ascii_hexdigit()) {
                return Err(LexerError::MalformedBlob {
                    reason: "expected an even number of hex digits",
                    span: Span::new(start, self.offset()),
                });
            }
            return Ok(TokenKind::Blob(hex));
        }
        let rest = self.take_while(is_ident_part);
        let mut value = String::with_capacity(1 + rest.len());
        value.push(first);
        value.push_str(&rest);
        Ok(TokenKind::ident_or_keyword(value, None))
    }

    fn lex_number(&mut self) -> TokenKind {
        if self.peek_char() == Some('0') {
            let mut lookahead = self.iter.clone();
            lookahead.next();
            if matches!(lookahead.peek(), Some(&(_, 'x')) | Some(&(_, 'X'))) {
                self.bump();
                self.bump();
                let digits = self.take_while(|c| c.is_ascii_hexdigit());
                return TokenKind::Number(format!("0x{}", digits));
            }
        }
        let mut s = self.take_while(|c| c.is_ascii_digit());
        if self.peek_char() == Some('.') {
            s.push('.');
            self.bump();
            s.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }
        TokenKind::Number(s)
    }

    /// Consumes characters up to and including the closing `quote`,
    /// collapsing a doubled quote (`''`, `""`) into a single literal quote.
    fn lex_quoted(
        &mut self,
        start: u32,
        quote: char,
        kind: &'static str,
    ) -> Result<String, LexerError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => {
                    if self.bump_if(quote) {
                        value.push(quote);
                    } else {
                        return Ok(value);
                    }
                }
                Some(c) => value.push(c),
                None => {
                    return Err(LexerError::Unterminated {
                        kind,
                        span: Span::new(start, self.offset()),
                    })
                }
            }
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::Keyword;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn skips_whitespace_and_comments() {
        assert_eq!(
            kinds("select -- comment\n 1 /* block */ + 2"),
            vec![
                TokenKind::Keyword(Keyword::SELECT),
                TokenKind::Number("1".into()),
                TokenKind::Plus,
                TokenKind::Number("2".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_select_star_with_span() {
        let tokens = Lexer::new("SELECT * FROM foo WHERE id = 1").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::SELECT));
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn numeric_forms() {
        assert_eq!(
            kinds("123 1.5 .25 0x1F 0. ."),
            vec![
                TokenKind::Number("123".into()),
                TokenKind::Number("1.5".into()),
                TokenKind::Number(".25".into()),
                TokenKind::Number("0x1F".into()),
                TokenKind::Number("0.".into()),
                TokenKind::Period,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literal_with_escape() {
        assert_eq!(
            kinds("'it''s'"),
            vec![TokenKind::String("it's".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_reports_span_to_eof() {
        let err = Lexer::new("select 'foo").tokenize().unwrap_err();
        match err {
            LexerError::Unterminated { kind, span } => {
                assert_eq!(kind, "string literal");
                assert_eq!(span, Span::new(7, 11));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blob_literal_requires_even_hex_digits() {
        assert_eq!(
            kinds("x'abcd'"),
            vec![TokenKind::Blob("abcd".into()), TokenKind::Eof]
        );
        let err = Lexer::new("x'abc'").tokenize().unwrap_err();
        assert!(matches!(err, LexerError::MalformedBlob { .. }));
    }

    #[test]
    fn delimited_identifiers_three_styles() {
        assert_eq!(
            kinds(r#""foo" `bar` [baz]"#),
            vec![
                TokenKind::Ident(crate::token::Ident {
                    value: "foo".into(),
                    quote: Some('"')
                }),
                TokenKind::Ident(crate::token::Ident {
                    value: "bar".into(),
                    quote: Some('`')
                }),
                TokenKind::Ident(crate::token::Ident {
                    value: "baz".into(),
                    quote: Some('[')
                }),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bind_parameters() {
        assert_eq!(
            kinds("? ?3 :name @name $name"),
            vec![
                TokenKind::BindAnonymous,
                TokenKind::BindIndexed(3),
                TokenKind::BindNamed(ParamSigil::Colon, "name".into()),
                TokenKind::BindNamed(ParamSigil::At, "name".into()),
                TokenKind::BindNamed(ParamSigil::Dollar, "name".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn maximal_munch_operators() {
        assert_eq!(
            kinds("<= >= != <> == || -> ->> << >>"),
            vec![
                TokenKind::LessThanOrEqual,
                TokenKind::GreaterThanOrEqual,
                TokenKind::NotEqual,
                TokenKind::NotEqual,
                TokenKind::Equal,
                TokenKind::Concat,
                TokenKind::Arrow,
                TokenKind::DoubleArrow,
                TokenKind::LeftShift,
                TokenKind::RightShift,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn block_comments_do_not_nest() {
        let err = Lexer::new("/* /* nested */ still open").tokenize().unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedComment { .. }));
    }
}
