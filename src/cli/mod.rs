//! CLI support for metarule
//!
//! Provides programmatic access to the metarule CLI functionality for
//! embedding in other tools.

mod apply;
mod check;
mod docs;
mod document;
mod onboard;

pub use apply::{ApplyOptions, ApplyReport, Status, execute_apply};
pub use check::{CheckOptions, CheckResult, execute_check, execute_eval};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use document::{Document, OutputFormat, parse_document, render_document};
pub use onboard::get_onboarding_content;

use std::io;

use thiserror::Error;

use crate::ParseError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid condition: {0}")]
    Condition(#[source] ParseError),

    #[error("Invalid action: {0}")]
    Action(#[source] ParseError),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe a document to stdin.")]
    NoInput,

    #[error("Nothing to check. Pass --condition and/or --action.")]
    NothingToCheck,

    #[error("Document must be a mapping of fields, found {0}")]
    NotAMapping(&'static str),

    #[error("Unknown category: '{0}'\nRun 'metarule docs' to see available categories.")]
    UnknownCategory(String),
}
