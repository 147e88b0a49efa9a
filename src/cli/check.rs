//! Syntax checks and condition evaluation

use super::{CliError, parse_document};
use crate::{Action, Condition, Evaluator, parse_action, parse_condition};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Condition text to validate
    pub condition: Option<String>,
    /// Action text to validate
    pub action: Option<String>,
}

/// Result of a check operation
#[derive(Debug)]
pub struct CheckResult {
    pub condition: Option<Condition>,
    pub action: Option<Action>,
}

/// Parse the given condition and/or action without running them
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.condition.is_none() && options.action.is_none() {
        return Err(CliError::NothingToCheck);
    }

    let condition = options
        .condition
        .as_deref()
        .map(parse_condition)
        .transpose()
        .map_err(CliError::Condition)?;
    let action = options
        .action
        .as_deref()
        .map(parse_action)
        .transpose()
        .map_err(CliError::Action)?;

    Ok(CheckResult { condition, action })
}

/// Evaluate a condition against a YAML/JSON document
pub fn execute_eval(condition: &str, input: Option<&str>) -> Result<bool, CliError> {
    let condition = parse_condition(condition).map_err(CliError::Condition)?;
    let input = input.ok_or(CliError::NoInput)?;
    let document = parse_document(input)?;
    Ok(Evaluator::new().evaluate(&condition, &document.data))
}
