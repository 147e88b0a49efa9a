use thiserror::Error;

use crate::ast::{Keyword, Token, TokenKind};

/// Malformed rule text detected while splitting it into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at offset {offset}")]
pub struct LexError {
    pub message: String,
    /// Character offset into the source
    pub offset: usize,
}

impl LexError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        LexError {
            message: message.into(),
            offset,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

/// Split a rule source string into tokens, ending with [`TokenKind::Eof`].
///
/// # Examples
///
/// ```
/// use metarule::lexer::tokenize;
/// use metarule::ast::{Keyword, TokenKind};
///
/// let tokens = tokenize("SET status \"done\"").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Set));
/// assert_eq!(tokens[1].kind, TokenKind::Identifier("status".into()));
/// assert_eq!(tokens[2].offset, 11);
/// assert_eq!(tokens[3].kind, TokenKind::Eof);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Consume the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(other) => {
                            return Err(LexError::new(
                                format!("Invalid escape sequence '\\{}' in string", other),
                                self.position - 1,
                            ));
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::new(
            format!("Unterminated string: missing closing {}", quote),
            start,
        ))
    }

    fn read_digits(&mut self, number: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<TokenKind, LexError> {
        let start = self.position;
        // digits right after a path dot are an index, so `matrix.0.1` stays three segments
        let path_index = start > 0 && self.input[start - 1] == '.';
        let mut number = String::new();

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }
        self.read_digits(&mut number);

        if self.current_char() == Some('.') && !path_index {
            match self.peek_char(1) {
                Some(c) if c.is_ascii_digit() => {
                    number.push('.');
                    self.advance();
                    self.read_digits(&mut number);
                    if self.current_char() == Some('.')
                        && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
                    {
                        return Err(self.malformed_number(start));
                    }
                }
                // `items.0.name`: the dot belongs to the path
                Some(c) if c.is_alphabetic() || c == '_' || c == '"' || c == '\'' => {}
                _ => return Err(self.malformed_number(start)),
            }
        }

        if matches!(self.current_char(), Some('e' | 'E')) {
            number.push('e');
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current_char() {
                number.push(sign);
                self.advance();
            }
            if !self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.malformed_number(start));
            }
            self.read_digits(&mut number);
        }

        if self
            .current_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(self.malformed_number(start));
        }

        number
            .parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| self.malformed_number(start))
    }

    fn malformed_number(&mut self, start: usize) -> LexError {
        // consume the rest of the word so the message shows all of it
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }
        let text: String = self.input[start..self.position].iter().collect();
        LexError::new(format!("Malformed number '{}'", text), start)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn pair(&mut self, second: char, matched: TokenKind, unmatched: TokenKind) -> TokenKind {
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            matched
        } else {
            unmatched
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let offset = self.position;

        let kind = match self.current_char() {
            None => TokenKind::Eof,
            Some('[') => self.single(TokenKind::LBracket),
            Some(']') => self.single(TokenKind::RBracket),
            Some('{') => self.single(TokenKind::LBrace),
            Some('}') => self.single(TokenKind::RBrace),
            Some('(') => self.single(TokenKind::LParen),
            Some(')') => self.single(TokenKind::RParen),
            Some(',') => self.single(TokenKind::Comma),
            Some('.') => self.single(TokenKind::Dot),
            Some(':') => self.single(TokenKind::Colon),
            Some('@') => self.single(TokenKind::At),
            Some('=') => self.pair('=', TokenKind::Eq, TokenKind::Eq),
            Some('<') => self.pair('=', TokenKind::LtEq, TokenKind::Lt),
            Some('>') => self.pair('=', TokenKind::GtEq, TokenKind::Gt),
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::NotEq
                } else {
                    return Err(LexError::new(
                        "Unexpected '!' (did you mean '!=' or NOT?)",
                        offset,
                    ));
                }
            }
            Some('"') => TokenKind::String(self.read_string('"')?),
            Some('\'') => TokenKind::String(self.read_string('\'')?),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()?
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                match ident.as_str() {
                    "true" => TokenKind::Boolean(true),
                    "false" => TokenKind::Boolean(false),
                    "null" => TokenKind::Null,
                    _ => match Keyword::from_ident(&ident) {
                        Some(kw) => TokenKind::Keyword(kw),
                        None => TokenKind::Identifier(ident),
                    },
                }
            }
            Some(ch) => {
                return Err(LexError::new(
                    format!("Unexpected character '{}'", ch),
                    offset,
                ));
            }
        };

        Ok(Token::new(kind, offset))
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("AND OR true false null");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Keyword(Keyword::And));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Keyword(Keyword::Or));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Boolean(true));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Boolean(false));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Null);
}

#[test]
fn test_offsets() {
    let tokens = tokenize("a.b >= 10").unwrap();
    let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![0, 1, 2, 4, 7, 9]);
}
