//! # Rule Language - Abstract Syntax Tree
//!
//! This module defines the syntax trees for the two rule languages: the
//! **condition** language, a boolean test over a metadata document, and the
//! **action** language, an ordered list of mutations.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens and keywords shared by both parsers
//! - **[expressions]** - Literal values written in rule text
//! - **[operators]** - Comparison operators and sort order
//! - **[condition]** - Condition tree
//! - **[action]** - Actions, operations and collection verbs
//!
//! ## Quick Start
//!
//! ```text
//! condition:  status = "draft" AND NOT HAS reviewed
//! action:     SET status "published", reviewed TODAY
//! ```
//!
//! ## Paths
//!
//! Fields are addressed with dotted paths: `metadata.reviewed`,
//! `items.0.name`, `"due date"`. Inside `ANY … WHERE` and `FOR … WHERE`
//! clauses, paths are relative to the array element and `@` names the
//! element itself.
//!
//! ## Collection Operations
//!
//! ```text
//! FOR tags APPEND "reviewed"
//! FOR tags INSERT "urgent" AT 0
//! FOR tags REMOVE_ALL ["draft", "wip"]
//! FOR tasks SORT BY priority DESC
//! FOR tasks MOVE FROM 0 TO -1
//! FOR tags WHERE @ = "urgent" MOVE TO START
//! FOR tags DEDUPLICATE
//! FOR metadata MERGE {reviewed: true}
//! FOR countsLog WHERE mantra = "Brave New World" SET unit "Meditations"
//! ```
pub mod action;
pub mod condition;
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use action::{Action, CollectionOp, CollectionVerb, MoveDestination, Operation};
pub use condition::Condition;
pub use expressions::Literal;
pub use operators::{CompareOp, SortOrder};
pub use tokens::{Keyword, Token, TokenKind};
