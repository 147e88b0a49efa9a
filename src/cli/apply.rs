//! Run a rule (optional condition plus action) against one document

use std::fmt;

use chrono::Local;

use super::{CliError, Document, parse_document};
use crate::{ExecutionResult, evaluate_at, execute_at, parse_action, parse_condition};

/// Options for the apply command
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Action text
    pub action: String,
    /// Condition gating the action; the action always runs when absent
    pub condition: Option<String>,
    /// YAML/JSON input string
    pub input: Option<String>,
}

/// Per-document outcome shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Error,
    /// The condition did not match; the action was not run
    Skipped,
}

impl Status {
    fn of(result: &ExecutionResult) -> Self {
        if !result.success {
            Status::Error
        } else if result.warning.is_some() {
            Status::Warning
        } else {
            Status::Success
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Error => "error",
            Status::Skipped => "skipped",
        })
    }
}

/// Result of an apply operation
#[derive(Debug)]
pub struct ApplyReport {
    pub status: Status,
    /// The parsed input document
    pub document: Document,
    /// Execution details; `None` when skipped
    pub result: Option<ExecutionResult>,
}

/// Parse both rule halves, then evaluate and execute them against the input.
///
/// Condition and action share one clock reading.
pub fn execute_apply(options: &ApplyOptions) -> Result<ApplyReport, CliError> {
    let action = parse_action(&options.action).map_err(CliError::Action)?;
    let condition = options
        .condition
        .as_deref()
        .map(parse_condition)
        .transpose()
        .map_err(CliError::Condition)?;

    let input = options.input.as_deref().ok_or(CliError::NoInput)?;
    let document = parse_document(input)?;
    let now = Local::now().naive_local();

    if let Some(condition) = &condition {
        if !evaluate_at(condition, &document.data, now) {
            log::debug!("condition did not match, skipping action");
            return Ok(ApplyReport {
                status: Status::Skipped,
                document,
                result: None,
            });
        }
    }

    let result = execute_at(&action, &document.data, now);
    Ok(ApplyReport {
        status: Status::of(&result),
        document,
        result: Some(result),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(action: &str, condition: Option<&str>, input: &str) -> ApplyReport {
        execute_apply(&ApplyOptions {
            action: action.to_string(),
            condition: condition.map(str::to_string),
            input: Some(input.to_string()),
        })
        .unwrap()
    }

    #[test]
    fn status_reflects_outcome() {
        assert_eq!(apply("SET status \"published\"", Some("status = \"draft\""), "status: draft\n").status, Status::Success);
        assert_eq!(apply("SET status \"published\"", Some("status = \"done\""), "status: draft\n").status, Status::Skipped);
        assert_eq!(apply("DELETE missing", None, "status: draft\n").status, Status::Warning);
        assert_eq!(apply("INCREMENT status", None, "status: draft\n").status, Status::Error);
    }

    #[test]
    fn invalid_rules_are_reported_by_half() {
        let err = execute_apply(&ApplyOptions {
            action: "SET status".to_string(),
            condition: None,
            input: Some("a: 1".to_string()),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Action(_)));
        assert!(err.to_string().starts_with("Invalid action: "));
    }
}
