//! Condition/action rule language for bulk-editing metadata documents.
//!
//! A rule pairs a **condition** (`status = "draft" AND NOT HAS reviewed`)
//! with an **action** (`SET status "published", reviewed TODAY`). Both are
//! parsed once and can then be run against any number of documents.
//!
//! ```
//! use metarule::{evaluate, execute, parse_action, parse_condition, Value};
//! use metarule::value::Map;
//!
//! let mut doc = Map::new();
//! doc.insert("status".to_string(), Value::from("draft"));
//! let doc = Value::Object(doc);
//!
//! let condition = parse_condition("status = \"draft\"").unwrap();
//! let action = parse_action("SET status \"published\"").unwrap();
//!
//! assert!(evaluate(&condition, &doc));
//! let result = execute(&action, &doc);
//! assert!(result.success && result.modified);
//! ```
pub mod ast;
pub mod convert;
pub mod evaluator;
pub mod executor;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod path;
pub mod structural;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

use chrono::NaiveDateTime;

pub use ast::{Action, Condition, Literal, Operation};
pub use evaluator::Evaluator;
pub use executor::{ExecError, ExecutionResult, Executor};
pub use lexer::{LexError, Lexer};
pub use output::{to_compact, to_pretty};
pub use parser::{ParseError, Parser};
pub use path::{Path, PathSegment};
pub use value::Value;

/// Parse condition text into a [`Condition`].
pub fn parse_condition(text: &str) -> Result<Condition, ParseError> {
    Parser::new(Lexer::new(text))?.parse_condition()
}

/// Parse action text into an [`Action`].
pub fn parse_action(text: &str) -> Result<Action, ParseError> {
    Parser::new(Lexer::new(text))?.parse_action()
}

/// Evaluate a condition against a document, using the local clock for `NOW` / `TODAY`.
pub fn evaluate(condition: &Condition, document: &Value) -> bool {
    Evaluator::new().evaluate(condition, document)
}

/// Evaluate a condition with a fixed clock.
pub fn evaluate_at(condition: &Condition, document: &Value, now: NaiveDateTime) -> bool {
    Evaluator::at(now).evaluate(condition, document)
}

/// Execute an action against a copy of a document, using the local clock.
pub fn execute(action: &Action, document: &Value) -> ExecutionResult {
    Executor::new().execute(action, document)
}

/// Execute an action with a fixed clock.
pub fn execute_at(action: &Action, document: &Value, now: NaiveDateTime) -> ExecutionResult {
    Executor::at(now).execute(action, document)
}
