//! Action grammar.
//!
//! ```text
//! SET path value (, path value)*
//! DELETE path (, path)*
//! RENAME path TO path (, path TO path)*
//! INCREMENT path [amount] (, path [amount])*
//! DECREMENT path [amount] (, path [amount])*
//! FOR path [WHERE condition] verb ...
//! ```
//!
//! Validation that depends on the combination of `FOR`, `WHERE` and the
//! verb happens here so a rule author sees the problem before anything runs.

use super::{ParseError, Parser};
use crate::{
    ast::{
        Action, CollectionOp, CollectionVerb, Condition, Keyword, Literal, MoveDestination,
        Operation, SortOrder, TokenKind,
    },
    path::Path,
};

/// Verb position inside a scalar action
#[derive(Clone, Copy, PartialEq)]
enum ScalarVerb {
    Set,
    Delete,
    Rename,
    Increment,
    Decrement,
}

impl ScalarVerb {
    fn from_keyword(kw: Keyword) -> Option<Self> {
        match kw {
            Keyword::Set => Some(ScalarVerb::Set),
            Keyword::Delete => Some(ScalarVerb::Delete),
            Keyword::Rename => Some(ScalarVerb::Rename),
            Keyword::Increment => Some(ScalarVerb::Increment),
            Keyword::Decrement => Some(ScalarVerb::Decrement),
            _ => None,
        }
    }

    fn example(&self) -> &'static str {
        match self {
            ScalarVerb::Set => "SET status \"published\", reviewed true",
            ScalarVerb::Delete => "DELETE draft, temp",
            ScalarVerb::Rename => "RENAME author TO creator",
            ScalarVerb::Increment => "INCREMENT views 1",
            ScalarVerb::Decrement => "DECREMENT credits 5",
        }
    }
}

fn is_collection_verb(kw: Keyword) -> bool {
    matches!(
        kw,
        Keyword::Append
            | Keyword::Prepend
            | Keyword::Insert
            | Keyword::RemoveAll
            | Keyword::Remove
            | Keyword::Sort
            | Keyword::Move
            | Keyword::Deduplicate
            | Keyword::Merge
            | Keyword::MergeOverwrite
    )
}

/// Correct form shown when a verb is used where it does not belong
fn collection_example(kw: Keyword) -> &'static str {
    match kw {
        Keyword::Append => "FOR tags APPEND \"reviewed\"",
        Keyword::Prepend => "FOR tags PREPEND \"urgent\"",
        Keyword::Insert => "FOR tags INSERT \"urgent\" AT 0",
        Keyword::RemoveAll => "FOR tags REMOVE_ALL [\"draft\", \"wip\"]",
        Keyword::Remove => "FOR tasks WHERE done = true REMOVE",
        Keyword::Sort => "FOR tasks SORT BY priority DESC",
        Keyword::Move => "FOR tasks MOVE FROM 0 TO -1",
        Keyword::Deduplicate => "FOR tags DEDUPLICATE",
        Keyword::Merge => "FOR metadata MERGE {reviewed: true}",
        Keyword::MergeOverwrite => "FOR metadata MERGE_OVERWRITE {reviewed: true}",
        _ => "FOR tags APPEND \"reviewed\"",
    }
}

impl Parser {
    /// Parse a complete action; the whole input must be consumed.
    pub fn parse_action(&mut self) -> Result<Action, ParseError> {
        let operations = match self.kind().clone() {
            TokenKind::Keyword(Keyword::For) => vec![self.parse_collection()?],
            TokenKind::Keyword(kw) => {
                if let Some(verb) = ScalarVerb::from_keyword(kw) {
                    self.advance();
                    self.parse_scalar(verb)?
                } else if kw == Keyword::Where {
                    return Err(self.error(
                        "WHERE is only allowed after FOR path and before the verb (e.g. FOR tasks WHERE done = true REMOVE)",
                    ));
                } else if is_collection_verb(kw) {
                    return Err(self.error(format!(
                        "{} needs a target introduced by FOR (e.g. {})",
                        kw,
                        collection_example(kw)
                    )));
                } else {
                    return Err(self.unexpected("an action verb (SET, DELETE, RENAME, INCREMENT, DECREMENT) or FOR"));
                }
            }
            TokenKind::Eof => {
                return Err(self.error("Expected an action, found end of input (e.g. SET status \"published\")"));
            }
            _ => return Err(self.unexpected("an action verb (SET, DELETE, RENAME, INCREMENT, DECREMENT) or FOR")),
        };

        log::debug!("parsed action with {} operation(s)", operations.len());
        Ok(Action { operations })
    }

    fn expect_end_of_action(&self) -> Result<(), ParseError> {
        if self.at_end() {
            return Ok(());
        }
        Err(self.error(format!(
            "Unexpected {} after complete action",
            self.kind().describe()
        )))
    }

    // ========================================
    // Scalar operations
    // ========================================

    fn parse_scalar(&mut self, verb: ScalarVerb) -> Result<Vec<Operation>, ParseError> {
        let mut operations = Vec::new();

        loop {
            if !self.starts_path() {
                if let TokenKind::Keyword(kw) = self.kind() {
                    if ScalarVerb::from_keyword(*kw).is_some() || is_collection_verb(*kw) {
                        return Err(self.error(format!(
                            "Expected a field path, found {} (one action uses one verb; list fields with commas: {})",
                            kw,
                            verb.example()
                        )));
                    }
                }
            }
            let path = self.parse_field_path(&format!("a field path (e.g. {})", verb.example()), verb)?;
            operations.push(self.parse_scalar_item(verb, path)?);

            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        if self.check_keyword(Keyword::Where) {
            return Err(self.error(
                "Scalar operations do not accept WHERE; to update matching array elements write FOR path WHERE condition SET field value (e.g. FOR tasks WHERE done = false SET status \"open\")",
            ));
        }
        self.expect_end_of_action()?;
        Ok(operations)
    }

    fn parse_scalar_item(&mut self, verb: ScalarVerb, path: Path) -> Result<Operation, ParseError> {
        match verb {
            ScalarVerb::Set => {
                let value = self.parse_assigned_value(&path)?;
                Ok(Operation::Set { path, value })
            }
            ScalarVerb::Delete => Ok(Operation::Delete { path }),
            ScalarVerb::Rename => {
                if !self.eat_keyword(Keyword::To) {
                    return Err(self.unexpected(&format!(
                        "TO after 'RENAME {}' (e.g. RENAME {} TO new_name)",
                        path, path
                    )));
                }
                let to = self.parse_field_path(
                    &format!(
                        "a new field path after 'RENAME {} TO' (e.g. RENAME {} TO new_name)",
                        path, path
                    ),
                    verb,
                )?;
                Ok(Operation::Rename { from: path, to })
            }
            ScalarVerb::Increment | ScalarVerb::Decrement => {
                let amount = match self.kind() {
                    TokenKind::Number(n) => {
                        let n = *n;
                        self.advance();
                        Some(n)
                    }
                    TokenKind::Comma | TokenKind::Eof | TokenKind::Keyword(Keyword::Where) => None,
                    _ => {
                        return Err(self.unexpected(&format!(
                            "a number after '{}' (e.g. {})",
                            path,
                            verb.example()
                        )));
                    }
                };
                if verb == ScalarVerb::Increment {
                    Ok(Operation::Increment { path, amount })
                } else {
                    Ok(Operation::Decrement { path, amount })
                }
            }
        }
    }

    /// A scalar target must name a field; `@` alone would be the whole document.
    fn parse_field_path(&mut self, expected: &str, verb: ScalarVerb) -> Result<Path, ParseError> {
        let offset = self.offset();
        let path = self.parse_path(expected)?;
        if path.is_current() {
            return Err(ParseError::new(
                format!(
                    "Expected a field path, found '{}' (scalar operations cannot target the whole document; name a field: {})",
                    path,
                    verb.example()
                ),
                offset,
            ));
        }
        Ok(path)
    }

    /// `path [=] value` after the path has been read
    fn parse_assigned_value(&mut self, path: &Path) -> Result<Literal, ParseError> {
        if self.check(&TokenKind::Eq) {
            self.advance();
        }
        self.parse_literal_for(&format!(
            "a value for '{}' (e.g. SET {} \"published\")",
            path, path
        ))
    }

    // ========================================
    // Collection operations
    // ========================================

    fn parse_collection(&mut self) -> Result<Operation, ParseError> {
        self.advance(); // FOR
        let target = self.parse_path("a field path after FOR (e.g. FOR tags SORT)")?;

        let mut filter = None;
        let mut where_offset = None;
        if self.check_keyword(Keyword::Where) {
            where_offset = Some(self.offset());
            self.advance();
            if self.at_end() || matches!(self.kind(), TokenKind::Keyword(kw) if is_collection_verb(*kw) || *kw == Keyword::Set) {
                return Err(self.unexpected(&format!(
                    "a condition after 'FOR {} WHERE' (e.g. FOR {} WHERE done = true REMOVE)",
                    target, target
                )));
            }
            filter = Some(self.parse_or()?);
        }

        let verb_offset = self.offset();
        let kw = match self.kind() {
            TokenKind::Keyword(kw) => *kw,
            _ => {
                return Err(self.unexpected(&format!(
                    "a collection verb after 'FOR {}' (APPEND, PREPEND, INSERT, REMOVE, REMOVE_ALL, SORT, MOVE, DEDUPLICATE, MERGE, MERGE_OVERWRITE or SET with WHERE)",
                    target
                )));
            }
        };

        if let Some(scalar) = ScalarVerb::from_keyword(kw) {
            if scalar != ScalarVerb::Set {
                return Err(ParseError::new(
                    format!(
                        "{} does not take a FOR prefix (e.g. {})",
                        kw,
                        scalar.example()
                    ),
                    verb_offset,
                ));
            }
        } else if !is_collection_verb(kw) {
            return Err(self.unexpected(&format!("a collection verb after 'FOR {}'", target)));
        }
        self.advance();

        // rejects a WHERE clause for verbs that cannot use one
        let reject_where = |example: String| -> Result<(), ParseError> {
            match where_offset {
                Some(offset) => Err(ParseError::new(
                    format!("{} does not accept a WHERE clause (e.g. {})", kw, example),
                    offset,
                )),
                None => Ok(()),
            }
        };

        let verb = match kw {
            Keyword::Set => {
                if filter.is_none() {
                    return Err(ParseError::new(
                        format!(
                            "SET on elements of '{}' requires a WHERE clause; there is no unconditional form (e.g. FOR {} WHERE status = \"open\" SET status \"done\"; to replace the whole field use SET {} value)",
                            target, target, target
                        ),
                        verb_offset,
                    ));
                }
                let mut assignments = Vec::new();
                loop {
                    let path = self.parse_path(&format!(
                        "a field path after SET (e.g. FOR {} WHERE done = false SET status \"open\")",
                        target
                    ))?;
                    let value = self.parse_assigned_value(&path)?;
                    assignments.push((path, value));
                    if self.check(&TokenKind::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                CollectionVerb::Update(assignments)
            }
            Keyword::Append | Keyword::Prepend => {
                reject_where(format!("FOR {} {} \"value\"", target, kw))?;
                let value = self.parse_literal_for(&format!(
                    "a value after {} (e.g. FOR {} {} \"value\")",
                    kw, target, kw
                ))?;
                if kw == Keyword::Append {
                    CollectionVerb::Append(value)
                } else {
                    CollectionVerb::Prepend(value)
                }
            }
            Keyword::Insert => {
                reject_where(format!("FOR {} INSERT \"value\" AT 0", target))?;
                let value = self.parse_literal_for(&format!(
                    "a value after INSERT (e.g. FOR {} INSERT \"value\" AT 0)",
                    target
                ))?;
                if !self.eat_keyword(Keyword::At) {
                    return Err(self.unexpected(&format!(
                        "AT index after INSERT value; INSERT requires an explicit position (e.g. FOR {} INSERT \"value\" AT 0, or AT -1 to append)",
                        target
                    )));
                }
                let at = self.parse_index(&format!(
                    "an integer index after AT (e.g. FOR {} INSERT \"value\" AT 2)",
                    target
                ))?;
                CollectionVerb::Insert { value, at }
            }
            Keyword::RemoveAll => {
                reject_where(format!(
                    "FOR {} REMOVE_ALL \"value\", or FOR {} WHERE condition REMOVE",
                    target, target
                ))?;
                let value = self.parse_literal_for(&format!(
                    "a value or list after REMOVE_ALL (e.g. FOR {} REMOVE_ALL [\"a\", \"b\"])",
                    target
                ))?;
                CollectionVerb::RemoveAll(value)
            }
            Keyword::Remove => {
                if filter.is_some() {
                    if self.starts_literal() {
                        return Err(self.error(format!(
                            "REMOVE with WHERE removes every matching element and takes no value (e.g. FOR {} WHERE @ = \"draft\" REMOVE)",
                            target
                        )));
                    }
                    CollectionVerb::Remove(None)
                } else {
                    let value = self.parse_literal_for(&format!(
                        "a value after REMOVE, or a WHERE clause before it (e.g. FOR {} REMOVE \"draft\", or FOR {} WHERE done = true REMOVE)",
                        target, target
                    ))?;
                    CollectionVerb::Remove(Some(value))
                }
            }
            Keyword::Sort => {
                reject_where(format!("FOR {} SORT BY field DESC", target))?;
                let by = if self.eat_keyword(Keyword::By) {
                    Some(self.parse_path(&format!(
                        "a field path after BY (e.g. FOR {} SORT BY priority)",
                        target
                    ))?)
                } else {
                    None
                };
                let order = if self.eat_keyword(Keyword::Desc) {
                    SortOrder::Desc
                } else {
                    self.eat_keyword(Keyword::Asc);
                    SortOrder::Asc
                };
                CollectionVerb::Sort { by, order }
            }
            Keyword::Move => self.parse_move(&target, filter.is_some(), &reject_where)?,
            Keyword::Deduplicate => {
                reject_where(format!("FOR {} DEDUPLICATE", target))?;
                CollectionVerb::Deduplicate
            }
            Keyword::Merge | Keyword::MergeOverwrite => {
                reject_where(format!("FOR {} {} {{reviewed: true}}", target, kw))?;
                let value = self.parse_literal_for(&format!(
                    "an object after {} (e.g. FOR {} {} {{reviewed: true}})",
                    kw, target, kw
                ))?;
                CollectionVerb::Merge {
                    value,
                    deep: kw == Keyword::Merge,
                }
            }
            _ => return Err(ParseError::new(format!("{} is not a collection verb", kw), verb_offset)),
        };

        if self.check_keyword(Keyword::Where) {
            return Err(self.error(format!(
                "WHERE must come before the verb (e.g. FOR {} WHERE condition {} ...)",
                target,
                verb.name()
            )));
        }
        self.expect_end_of_action()?;

        Ok(Operation::Collection(CollectionOp {
            target,
            filter,
            verb,
        }))
    }

    fn parse_move(
        &mut self,
        target: &Path,
        has_filter: bool,
        reject_where: &dyn Fn(String) -> Result<(), ParseError>,
    ) -> Result<CollectionVerb, ParseError> {
        if self.eat_keyword(Keyword::From) {
            reject_where(format!(
                "FOR {} MOVE FROM 0 TO 2; to move matching elements write FOR {} WHERE condition MOVE TO START",
                target, target
            ))?;
            let from = self.parse_index(&format!(
                "an integer index after MOVE FROM (e.g. FOR {} MOVE FROM 0 TO 2)",
                target
            ))?;
            if !self.eat_keyword(Keyword::To) {
                return Err(self.unexpected(&format!(
                    "TO after 'MOVE FROM {}' (e.g. FOR {} MOVE FROM {} TO 0)",
                    from, target, from
                )));
            }
            let to = self.parse_index(&format!(
                "an integer index after TO (e.g. FOR {} MOVE FROM {} TO 0)",
                target, from
            ))?;
            return Ok(CollectionVerb::MoveIndex { from, to });
        }

        if self.check_keyword(Keyword::To) {
            let to_offset = self.offset();
            self.advance();
            let destination = match self.kind() {
                TokenKind::Keyword(Keyword::Start) => {
                    self.advance();
                    MoveDestination::Start
                }
                TokenKind::Keyword(Keyword::End) => {
                    self.advance();
                    MoveDestination::End
                }
                TokenKind::Keyword(Keyword::After) => {
                    self.advance();
                    MoveDestination::After(self.parse_anchor("AFTER", target)?)
                }
                TokenKind::Keyword(Keyword::Before) => {
                    self.advance();
                    MoveDestination::Before(self.parse_anchor("BEFORE", target)?)
                }
                _ => {
                    return Err(self.unexpected("START, END, AFTER condition or BEFORE condition after MOVE TO"));
                }
            };
            if !has_filter {
                return Err(ParseError::new(
                    format!(
                        "MOVE TO needs a WHERE clause selecting the elements to move (e.g. FOR {} WHERE @ = \"urgent\" MOVE TO START; to move by position write FOR {} MOVE FROM 0 TO 2)",
                        target, target
                    ),
                    to_offset,
                ));
            }
            return Ok(CollectionVerb::MoveWhere(destination));
        }

        Err(self.unexpected(&format!(
            "FROM or TO after MOVE (e.g. FOR {} MOVE FROM 0 TO 2)",
            target
        )))
    }

    fn parse_anchor(&mut self, which: &str, target: &Path) -> Result<Condition, ParseError> {
        if self.at_end() {
            return Err(self.unexpected(&format!(
                "a condition after MOVE TO {} (e.g. FOR {} WHERE @ = \"a\" MOVE TO {} @ = \"b\")",
                which, target, which
            )));
        }
        self.parse_or()
    }
}
