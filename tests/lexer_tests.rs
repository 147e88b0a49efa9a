// tests/lexer_tests.rs

use metarule::ast::{Keyword, TokenKind};
use metarule::lexer::{Lexer, tokenize};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
}

// ============================================================================
// Tokens
// ============================================================================

#[test]
fn test_condition_tokens() {
    assert_eq!(
        kinds("status = \"draft\" AND NOT HAS reviewed"),
        vec![
            TokenKind::Identifier("status".into()),
            TokenKind::Eq,
            TokenKind::String("draft".into()),
            TokenKind::Keyword(Keyword::And),
            TokenKind::Keyword(Keyword::Not),
            TokenKind::Keyword(Keyword::Has),
            TokenKind::Identifier("reviewed".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comparison_operators() {
    assert_eq!(
        kinds("= == != < <= > >="),
        vec![
            TokenKind::Eq,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("[ ] { } ( ) , . : @"),
        vec![
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Colon,
            TokenKind::At,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(kinds("SET")[0], TokenKind::Keyword(Keyword::Set));
    assert_eq!(kinds("set")[0], TokenKind::Identifier("set".into()));
    assert_eq!(kinds("REMOVE_ALL")[0], TokenKind::Keyword(Keyword::RemoveAll));
    assert_eq!(kinds("MERGE_OVERWRITE")[0], TokenKind::Keyword(Keyword::MergeOverwrite));
    assert_eq!(kinds("TODAY NOW")[..2], [TokenKind::Keyword(Keyword::Today), TokenKind::Keyword(Keyword::Now)]);
}

#[test]
fn test_identifiers_allow_hyphens() {
    assert_eq!(kinds("due-date")[0], TokenKind::Identifier("due-date".into()));
    assert_eq!(kinds("_internal")[0], TokenKind::Identifier("_internal".into()));
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(kinds("42")[0], TokenKind::Number(42.0));
    assert_eq!(kinds("-3.5")[0], TokenKind::Number(-3.5));
    assert_eq!(kinds("1e3")[0], TokenKind::Number(1000.0));
    assert_eq!(kinds("2.5E-1")[0], TokenKind::Number(0.25));
}

#[test]
fn test_string_escapes() {
    assert_eq!(kinds(r#""a\"b\n""#)[0], TokenKind::String("a\"b\n".into()));
    assert_eq!(kinds(r"'it\'s'")[0], TokenKind::String("it's".into()));
    assert_eq!(kinds(r#"'say "hi"'"#)[0], TokenKind::String("say \"hi\"".into()));
}

#[test]
fn test_boolean_and_null() {
    assert_eq!(
        kinds("true false null"),
        vec![TokenKind::Boolean(true), TokenKind::Boolean(false), TokenKind::Null, TokenKind::Eof]
    );
}

#[test]
fn test_index_path_is_not_a_float() {
    assert_eq!(
        kinds("items.0.name"),
        vec![
            TokenKind::Identifier("items".into()),
            TokenKind::Dot,
            TokenKind::Number(0.0),
            TokenKind::Dot,
            TokenKind::Identifier("name".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_consecutive_indexes_are_not_a_float() {
    assert_eq!(
        kinds("matrix.0.1 = 0.5"),
        vec![
            TokenKind::Identifier("matrix".into()),
            TokenKind::Dot,
            TokenKind::Number(0.0),
            TokenKind::Dot,
            TokenKind::Number(1.0),
            TokenKind::Eq,
            TokenKind::Number(0.5),
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Offsets and errors
// ============================================================================

#[test]
fn test_offsets_are_character_based() {
    let tokens = tokenize("tag = \"é\" OR x").unwrap();
    let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![0, 4, 6, 10, 13, 14]);
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("title = \"open").unwrap_err();
    assert!(err.message.contains("Unterminated string"));
    assert_eq!(err.offset, 8);
}

#[test]
fn test_invalid_escape() {
    let err = tokenize(r#"a = "\q""#).unwrap_err();
    assert!(err.message.contains("Invalid escape"));
}

#[test]
fn test_malformed_numbers() {
    for source in ["1.", "1e", "1.2.3", "12abc"] {
        let err = tokenize(source).unwrap_err();
        assert!(err.message.starts_with("Malformed number"), "{}: {}", source, err);
        assert_eq!(err.offset, 0);
    }
}

#[test]
fn test_lone_bang() {
    let err = tokenize("a ! b").unwrap_err();
    assert!(err.message.contains("'!'"));
    assert_eq!(err.offset, 2);
}

#[test]
fn test_unexpected_character() {
    let err = tokenize("a = #").unwrap_err();
    assert_eq!(err.to_string(), "Unexpected character '#' at offset 4");
}

#[test]
fn test_next_token_stops_at_eof() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier("x".into()));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}
