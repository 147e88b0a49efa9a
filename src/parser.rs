use thiserror::Error;

use crate::{
    ast::{CompareOp, Condition, Keyword, Literal, Token, TokenKind},
    lexer::{LexError, Lexer},
    path::{Path, PathSegment},
};

mod action;

/// Malformed rule text.
///
/// The message names what was expected and, where possible, shows the
/// correct form. The offset is a character offset into the source.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        ParseError {
            message: message.into(),
            offset,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError {
            message: e.message,
            offset: e.offset,
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Tokenize the whole source up front; lexer failures surface here.
    pub fn new(lexer: Lexer) -> Result<Self, ParseError> {
        let tokens = lexer.tokenize()?;
        Ok(Parser {
            tokens,
            position: 0,
        })
    }

    fn current(&self) -> &Token {
        // the token stream always ends with Eof and `advance` never moves past it
        &self.tokens[self.position]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn offset(&self) -> usize {
        self.current().offset
    }

    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.kind()) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(self.kind(), TokenKind::Keyword(k) if *k == kw)
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.offset())
    }

    /// Error of the form "Expected X, found Y" at the current token
    fn unexpected(&self, expected: &str) -> ParseError {
        self.error(format!("Expected {}, found {}", expected, self.kind().describe()))
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<(), ParseError> {
        if !self.check(&kind) {
            return Err(self.unexpected(expected));
        }
        self.advance();
        Ok(())
    }

    // ========================================
    // Conditions
    // ========================================

    /// Parse a complete condition; the whole input must be consumed.
    pub fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        if self.at_end() {
            return Err(self.error("Expected a condition, found end of input (e.g. status = \"draft\")"));
        }
        let condition = self.parse_or()?;
        if !self.at_end() {
            return Err(self.error(format!(
                "Unexpected {} after complete condition (combine conditions with AND / OR)",
                self.kind().describe()
            )));
        }
        Ok(condition)
    }

    /// Condition embedded in an action; stops at the first token that cannot continue it.
    pub(crate) fn parse_or(&mut self) -> Result<Condition, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword(Keyword::Or) {
            let right = self.parse_and()?;
            left = Condition::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Condition, ParseError> {
        let mut left = self.parse_unary()?;
        while self.eat_keyword(Keyword::And) {
            let right = self.parse_unary()?;
            left = Condition::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Condition, ParseError> {
        if self.eat_keyword(Keyword::Not) {
            if self.eat_keyword(Keyword::Has) {
                let path = self.parse_path("a field path after NOT HAS (e.g. NOT HAS reviewed)")?;
                return Ok(Condition::Exists {
                    path,
                    negated: true,
                });
            }
            let inner = self.parse_unary()?;
            return Ok(Condition::not(inner));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Condition, ParseError> {
        match self.kind() {
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen, "')' to close '('")?;
                Ok(inner)
            }
            TokenKind::Keyword(Keyword::Has) => {
                self.advance();
                let path = self.parse_path("a field path after HAS (e.g. HAS reviewed)")?;
                Ok(Condition::Exists {
                    path,
                    negated: false,
                })
            }
            TokenKind::Keyword(Keyword::Any) => {
                self.advance();
                let path = self.parse_path("an array path after ANY (e.g. ANY tasks WHERE done = false)")?;
                if !self.eat_keyword(Keyword::Where) {
                    return Err(self.unexpected(&format!(
                        "WHERE after 'ANY {}' (e.g. ANY {} WHERE done = false)",
                        path, path
                    )));
                }
                let condition = self.parse_or()?;
                Ok(Condition::Any {
                    path,
                    condition: Box::new(condition),
                })
            }
            TokenKind::Identifier(_) | TokenKind::String(_) | TokenKind::At => {
                let path = self.parse_path("a field path")?;
                self.parse_predicate(path)
            }
            TokenKind::Eof => Err(self.unexpected("a condition")),
            _ => Err(self.unexpected("a field path, HAS, ANY, NOT or '('")),
        }
    }

    /// What follows a path inside an atom
    fn parse_predicate(&mut self, path: Path) -> Result<Condition, ParseError> {
        let op = match self.kind() {
            TokenKind::Eq => Some(CompareOp::Equal),
            TokenKind::NotEq => Some(CompareOp::NotEqual),
            TokenKind::Lt => Some(CompareOp::LessThan),
            TokenKind::LtEq => Some(CompareOp::LessEqual),
            TokenKind::Gt => Some(CompareOp::GreaterThan),
            TokenKind::GtEq => Some(CompareOp::GreaterEqual),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let value = self.parse_literal_for(&format!(
                "a value after '{} {}' (e.g. {} {} \"draft\")",
                path, op, path, op
            ))?;
            return Ok(Condition::Comparison { path, op, value });
        }

        match self.kind() {
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                Ok(Condition::Exists {
                    path,
                    negated: false,
                })
            }
            TokenKind::Keyword(Keyword::Not) => {
                let offset = self.offset();
                self.advance();
                match self.kind() {
                    TokenKind::Keyword(Keyword::Exists) => {
                        self.advance();
                        Ok(Condition::Exists {
                            path,
                            negated: true,
                        })
                    }
                    TokenKind::Keyword(Keyword::Contains) | TokenKind::Keyword(Keyword::In) => {
                        let inner = self.parse_membership(path)?;
                        Ok(Condition::not(inner))
                    }
                    _ => Err(ParseError::new(
                        format!(
                            "Expected EXISTS, CONTAINS or IN after '{} NOT', found {} (to negate a condition write NOT before it)",
                            path,
                            self.kind().describe()
                        ),
                        offset,
                    )),
                }
            }
            TokenKind::Keyword(Keyword::Contains) | TokenKind::Keyword(Keyword::In) => {
                self.parse_membership(path)
            }
            _ => Ok(Condition::Truthy(path)),
        }
    }

    fn parse_membership(&mut self, path: Path) -> Result<Condition, ParseError> {
        if self.eat_keyword(Keyword::Contains) {
            let value = self.parse_literal_for(&format!(
                "a value after '{} CONTAINS' (e.g. {} CONTAINS \"work\")",
                path, path
            ))?;
            return Ok(Condition::Contains { path, value });
        }
        self.eat_keyword(Keyword::In);
        let list = self.parse_literal_for(&format!(
            "a list after '{} IN' (e.g. {} IN [\"draft\", \"review\"])",
            path, path
        ))?;
        let values = match list {
            Literal::Array(items) => items,
            single => vec![single],
        };
        Ok(Condition::In { path, values })
    }

    // ========================================
    // Paths and literals
    // ========================================

    fn starts_path(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Identifier(_) | TokenKind::String(_) | TokenKind::At
        )
    }

    /// Parse a dotted path. `expected` describes the path for error messages.
    fn parse_path(&mut self, expected: &str) -> Result<Path, ParseError> {
        let mut segments = Vec::new();

        match self.kind().clone() {
            TokenKind::Identifier(name) | TokenKind::String(name) => {
                segments.push(PathSegment::Key(name));
            }
            TokenKind::At => segments.push(PathSegment::Current),
            TokenKind::Keyword(kw) => {
                return Err(self.error(format!(
                    "Expected {}, found keyword {} (quote field names that are keywords: \"{}\")",
                    expected, kw, kw
                )));
            }
            _ => return Err(self.unexpected(expected)),
        }
        self.advance();

        while self.check(&TokenKind::Dot) {
            self.advance();
            let segment = match self.kind().clone() {
                TokenKind::Identifier(name) | TokenKind::String(name) => PathSegment::Key(name),
                TokenKind::Keyword(kw) => PathSegment::Key(kw.as_str().to_string()),
                TokenKind::Boolean(b) => PathSegment::Key(b.to_string()),
                TokenKind::Null => PathSegment::Key("null".to_string()),
                TokenKind::Number(n) if n.fract() == 0.0 => PathSegment::Index(n as i64),
                _ => return Err(self.unexpected("a field name or index after '.'")),
            };
            segments.push(segment);
            self.advance();
        }

        Ok(Path::new(segments))
    }

    fn starts_literal(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::Boolean(_)
                | TokenKind::Null
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Keyword(Keyword::Now)
                | TokenKind::Keyword(Keyword::Today)
        )
    }

    /// Parse a literal, reporting `expected` when none is present.
    fn parse_literal_for(&mut self, expected: &str) -> Result<Literal, ParseError> {
        if !self.starts_literal() {
            return Err(self.unexpected(expected));
        }
        self.parse_literal()
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let literal = match self.kind().clone() {
            TokenKind::Number(n) => Literal::Number(n),
            TokenKind::String(s) => Literal::String(s),
            TokenKind::Boolean(b) => Literal::Boolean(b),
            TokenKind::Null => Literal::Null,
            TokenKind::Keyword(Keyword::Now) => Literal::Now,
            TokenKind::Keyword(Keyword::Today) => Literal::Today,
            TokenKind::LBracket => {
                self.advance();
                return self.parse_array_literal();
            }
            TokenKind::LBrace => {
                self.advance();
                return self.parse_object_literal();
            }
            _ => return Err(self.unexpected("a value (string, number, true, false, null, list or object)")),
        };
        self.advance();
        Ok(literal)
    }

    fn parse_array_literal(&mut self) -> Result<Literal, ParseError> {
        let mut elements = vec![];

        while !self.check(&TokenKind::RBracket) {
            if self.at_end() {
                return Err(self.unexpected("']' to close the list"));
            }
            elements.push(self.parse_literal()?);

            if !self.check(&TokenKind::RBracket) {
                self.expect(TokenKind::Comma, "',' or ']' in list")?;
            }
        }

        self.advance(); // ]
        Ok(Literal::Array(elements))
    }

    fn parse_object_literal(&mut self) -> Result<Literal, ParseError> {
        let mut pairs: Vec<(String, Literal)> = vec![];

        while !self.check(&TokenKind::RBrace) {
            let key = match self.kind().clone() {
                TokenKind::Identifier(s) | TokenKind::String(s) => s,
                TokenKind::Keyword(kw) => kw.as_str().to_string(),
                _ => return Err(self.unexpected("a key (name or string) in object")),
            };
            self.advance();
            self.expect(TokenKind::Colon, &format!("':' after object key '{}'", key))?;

            let value = self.parse_literal()?;
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => pairs.push((key, value)),
            }

            if !self.check(&TokenKind::RBrace) {
                self.expect(TokenKind::Comma, "',' or '}' in object")?;
            }
        }

        self.advance(); // }
        Ok(Literal::Object(pairs))
    }

    /// Parse an integer (array index) literal
    fn parse_index(&mut self, expected: &str) -> Result<i64, ParseError> {
        match self.kind() {
            TokenKind::Number(n) if n.fract() == 0.0 => {
                let n = *n as i64;
                self.advance();
                Ok(n)
            }
            _ => Err(self.unexpected(expected)),
        }
    }
}
