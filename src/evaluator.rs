use std::cmp::Ordering;

use chrono::{Local, NaiveDateTime};

use crate::{
    ast::{CompareOp, Condition, Literal},
    value::Value,
};

/// Condition interpreter.
///
/// Evaluation is total: missing fields, type mismatches and empty arrays all
/// resolve to `false` (or "absent") instead of raising an error, and the
/// document is only ever borrowed immutably.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    /// Clock value used for `NOW` and `TODAY`
    now: NaiveDateTime,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

impl Evaluator {
    /// Evaluator reading the local clock once, at construction.
    pub fn new() -> Self {
        Evaluator {
            now: Local::now().naive_local(),
        }
    }

    /// Evaluator with a fixed clock, for reproducible results.
    pub fn at(now: NaiveDateTime) -> Self {
        Evaluator { now }
    }

    pub fn now(&self) -> &NaiveDateTime {
        &self.now
    }

    /// Resolve a literal against this evaluator's clock.
    pub fn literal(&self, literal: &Literal) -> Value {
        literal.resolve(&self.now)
    }

    /// Evaluates a condition with `root` as the evaluation root.
    ///
    /// # Examples
    ///
    /// ```
    /// use metarule::{parse_condition, Evaluator, Value};
    /// use metarule::value::Map;
    ///
    /// let mut doc = Map::new();
    /// doc.insert("status".to_string(), Value::from("draft"));
    /// let doc = Value::Object(doc);
    ///
    /// let cond = parse_condition("status = \"draft\" AND NOT HAS reviewed").unwrap();
    /// assert!(Evaluator::new().evaluate(&cond, &doc));
    /// ```
    pub fn evaluate(&self, condition: &Condition, root: &Value) -> bool {
        match condition {
            Condition::Comparison { path, op, value } => match path.resolve(root) {
                Some(actual) => compare(actual, *op, &self.literal(value)),
                None => false,
            },
            Condition::Exists { path, negated } => path.resolve(root).is_some() != *negated,
            Condition::Contains { path, value } => match path.resolve(root) {
                Some(actual) => contains(actual, &self.literal(value)),
                None => false,
            },
            Condition::In { path, values } => match path.resolve(root) {
                Some(actual) => values.iter().any(|v| actual.loose_eq(&self.literal(v))),
                None => false,
            },
            Condition::Any { path, condition } => match path.resolve(root) {
                Some(Value::Array(items)) => items.iter().enumerate().any(|(i, item)| {
                    let matched = self.evaluate(condition, item);
                    log::trace!("ANY {}[{}] -> {}", path, i, matched);
                    matched
                }),
                _ => false,
            },
            Condition::And(left, right) => self.evaluate(left, root) && self.evaluate(right, root),
            Condition::Or(left, right) => self.evaluate(left, root) || self.evaluate(right, root),
            Condition::Not(inner) => !self.evaluate(inner, root),
            Condition::Truthy(path) => path.resolve(root).is_some_and(Value::is_truthy),
        }
    }
}

/// Apply a comparison operator to a present value.
///
/// Numeric when both sides look numeric; otherwise `=`/`!=` are structural
/// and ordering only applies between two strings.
pub fn compare(actual: &Value, op: CompareOp, expected: &Value) -> bool {
    if let (Some(a), Some(b)) = (actual.as_number(), expected.as_number()) {
        return match op {
            CompareOp::Equal => a == b,
            CompareOp::NotEqual => a != b,
            CompareOp::LessThan => a < b,
            CompareOp::LessEqual => a <= b,
            CompareOp::GreaterThan => a > b,
            CompareOp::GreaterEqual => a >= b,
        };
    }

    match op {
        CompareOp::Equal => actual == expected,
        CompareOp::NotEqual => actual != expected,
        _ => {
            let ordering = match (actual, expected) {
                (Value::String(a), Value::String(b)) => a.cmp(b),
                _ => return false,
            };
            match op {
                CompareOp::LessThan => ordering == Ordering::Less,
                CompareOp::LessEqual => ordering != Ordering::Greater,
                CompareOp::GreaterThan => ordering == Ordering::Greater,
                CompareOp::GreaterEqual => ordering != Ordering::Less,
                CompareOp::Equal | CompareOp::NotEqual => unreachable!("equality handled above"),
            }
        }
    }
}

/// `CONTAINS`: array membership by structural equality, or substring test.
pub fn contains(actual: &Value, needle: &Value) -> bool {
    match actual {
        Value::Array(items) => items.contains(needle),
        Value::String(s) => s.contains(needle.as_text().as_str()),
        _ => false,
    }
}
