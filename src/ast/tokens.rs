use std::fmt;

/// Reserved words of the rule language.
///
/// Keywords are upper case and case-sensitive, so `status` and `in` remain
/// ordinary field names. A field that is spelled like a keyword can still be
/// addressed with a quoted segment (`"END"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Scalar verbs
    Set,
    Delete,
    Rename,
    To,
    Increment,
    Decrement,

    // Collection prefix and filters
    For,
    Where,

    // Logic
    And,
    Or,
    Not,
    Has,
    Any,
    In,
    Contains,
    Exists,

    // Collection verbs
    Append,
    Prepend,
    Insert,
    At,
    Remove,
    RemoveAll,
    Sort,
    By,
    Asc,
    Desc,
    Move,
    From,
    Start,
    End,
    After,
    Before,
    Deduplicate,
    Merge,
    MergeOverwrite,

    // Clock values
    Now,
    Today,
}

impl Keyword {
    /// Look up a keyword by its exact spelling
    pub fn from_ident(ident: &str) -> Option<Self> {
        use Keyword::*;
        let kw = match ident {
            "SET" => Set,
            "DELETE" => Delete,
            "RENAME" => Rename,
            "TO" => To,
            "INCREMENT" => Increment,
            "DECREMENT" => Decrement,
            "FOR" => For,
            "WHERE" => Where,
            "AND" => And,
            "OR" => Or,
            "NOT" => Not,
            "HAS" => Has,
            "ANY" => Any,
            "IN" => In,
            "CONTAINS" => Contains,
            "EXISTS" => Exists,
            "APPEND" => Append,
            "PREPEND" => Prepend,
            "INSERT" => Insert,
            "AT" => At,
            "REMOVE" => Remove,
            "REMOVE_ALL" => RemoveAll,
            "SORT" => Sort,
            "BY" => By,
            "ASC" => Asc,
            "DESC" => Desc,
            "MOVE" => Move,
            "FROM" => From,
            "START" => Start,
            "END" => End,
            "AFTER" => After,
            "BEFORE" => Before,
            "DEDUPLICATE" => Deduplicate,
            "MERGE" => Merge,
            "MERGE_OVERWRITE" => MergeOverwrite,
            "NOW" => Now,
            "TODAY" => Today,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(&self) -> &'static str {
        use Keyword::*;
        match self {
            Set => "SET",
            Delete => "DELETE",
            Rename => "RENAME",
            To => "TO",
            Increment => "INCREMENT",
            Decrement => "DECREMENT",
            For => "FOR",
            Where => "WHERE",
            And => "AND",
            Or => "OR",
            Not => "NOT",
            Has => "HAS",
            Any => "ANY",
            In => "IN",
            Contains => "CONTAINS",
            Exists => "EXISTS",
            Append => "APPEND",
            Prepend => "PREPEND",
            Insert => "INSERT",
            At => "AT",
            Remove => "REMOVE",
            RemoveAll => "REMOVE_ALL",
            Sort => "SORT",
            By => "BY",
            Asc => "ASC",
            Desc => "DESC",
            Move => "MOVE",
            From => "FROM",
            Start => "START",
            End => "END",
            After => "AFTER",
            Before => "BEFORE",
            Deduplicate => "DEDUPLICATE",
            Merge => "MERGE",
            MergeOverwrite => "MERGE_OVERWRITE",
            Now => "NOW",
            Today => "TODAY",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Number literal, integer or fractional
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -3.5
    /// 1e3
    /// ```
    Number(f64),

    /// String literal in double or single quotes
    ///
    /// # Examples
    /// ```text
    /// "published"
    /// 'Brave New World'
    /// ```
    String(String),

    /// `true` / `false`
    Boolean(bool),

    /// `null`
    Null,

    /// Field name
    ///
    /// Starts with a letter or underscore; may contain letters, digits,
    /// underscores and hyphens.
    ///
    /// # Examples
    /// ```text
    /// status
    /// due-date
    /// _internal
    /// ```
    Identifier(String),

    /// Reserved word, see [`Keyword`]
    Keyword(Keyword),

    // Comparison
    /// `=` or `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,

    // Delimiters
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Dot,
    Colon,

    /// Current element reference (`@`)
    ///
    /// Inside `ANY … WHERE` and `FOR … WHERE` clauses, `@` is the element
    /// being tested. Useful for arrays of scalars: `WHERE @ = "urgent"`.
    At,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Short description used in parse errors
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {}", crate::output::format_number(*n)),
            TokenKind::String(s) => format!("string \"{}\"", s),
            TokenKind::Boolean(b) => b.to_string(),
            TokenKind::Null => "null".to_string(),
            TokenKind::Identifier(name) => format!("'{}'", name),
            TokenKind::Keyword(kw) => kw.to_string(),
            TokenKind::Eq => "'='".to_string(),
            TokenKind::NotEq => "'!='".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::LtEq => "'<='".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::GtEq => "'>='".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::At => "'@'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token together with the character offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        Token { kind, offset }
    }
}
