use chrono::NaiveDateTime;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use thiserror::Error;

use crate::{
    ast::{Action, CollectionOp, CollectionVerb, Condition, Literal, MoveDestination, Operation, SortOrder},
    evaluator::Evaluator,
    output::{format_number, to_compact},
    path::{Path, PathError},
    structural::{self, MoveOutcome, Placement, StructuralError},
    value::Value,
};

/// Outcome of executing an action against one document.
///
/// Errors and warnings are reported as data: `execute` never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// False when an operation failed; later operations were not run
    pub success: bool,
    /// True when `new_data` differs from `original_data`
    pub modified: bool,
    /// One human-readable line per applied change, in execution order
    pub changes: Vec<String>,
    /// Operations that had no effect (joined with `"; "`)
    pub warning: Option<String>,
    /// Message of the operation that failed
    pub error: Option<String>,
    /// The working copy after execution. On failure it still holds the
    /// effects of operations that ran before the failing one.
    pub new_data: Value,
    /// The untouched input document
    pub original_data: Value,
}

/// Failure of a single operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("{verb} requires an array, but '{path}' is {found}")]
    NotAnArray {
        verb: &'static str,
        path: String,
        found: &'static str,
    },

    #[error("{verb} requires an object, but '{path}' is {found}")]
    NotAnObject {
        verb: &'static str,
        path: String,
        found: &'static str,
    },

    #[error("{verb} expects an object value, got {found}")]
    ValueNotAnObject { verb: &'static str, found: &'static str },

    #[error("cannot {verb} '{path}': {value} is not a number")]
    NotNumeric {
        verb: &'static str,
        path: String,
        value: String,
    },

    #[error("cannot rename '{from}' to '{to}': '{to}' already exists")]
    RenameTargetExists { from: String, to: String },

    #[error("cannot rename '{from}' to '{to}': the new path is inside the old one")]
    RenameIntoSelf { from: String, to: String },

    #[error("{verb} on '{path}': {source}")]
    Structural {
        verb: &'static str,
        path: String,
        #[source]
        source: StructuralError,
    },

    #[error("SET on element {index} of '{target}': {source}")]
    ElementWrite {
        target: String,
        index: usize,
        #[source]
        source: PathError,
    },

    #[error("{verb} does not accept a WHERE clause")]
    FilterNotSupported { verb: &'static str },

    #[error("{verb} on '{path}' requires a WHERE clause")]
    FilterRequired { verb: &'static str, path: String },
}

/// Mutable state of one execution
struct Session {
    data: Value,
    changes: Vec<String>,
    warnings: Vec<String>,
}

impl Session {
    fn change(&mut self, text: String) {
        log::debug!("change: {}", text);
        self.changes.push(text);
    }

    fn warn(&mut self, text: String) {
        log::debug!("warning: {}", text);
        self.warnings.push(text);
    }
}

/// Runs actions against documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    evaluator: Evaluator,
}

impl Executor {
    /// Executor reading the local clock once, at construction.
    pub fn new() -> Self {
        Executor {
            evaluator: Evaluator::new(),
        }
    }

    /// Executor with a fixed clock for `NOW` / `TODAY`.
    pub fn at(now: NaiveDateTime) -> Self {
        Executor {
            evaluator: Evaluator::at(now),
        }
    }

    /// Executes every operation in order against a clone of `document`.
    ///
    /// Execution stops at the first failing operation. Mutations made by
    /// earlier operations are kept, not rolled back.
    ///
    /// # Examples
    ///
    /// ```
    /// use metarule::{parse_action, Executor, Value};
    /// use metarule::value::Map;
    ///
    /// let mut doc = Map::new();
    /// doc.insert("status".to_string(), Value::from("draft"));
    /// let doc = Value::Object(doc);
    ///
    /// let action = parse_action("SET status \"published\"").unwrap();
    /// let result = Executor::new().execute(&action, &doc);
    /// assert!(result.success && result.modified);
    /// assert_eq!(result.original_data, doc);
    /// ```
    pub fn execute(&self, action: &Action, document: &Value) -> ExecutionResult {
        let mut session = Session {
            data: document.clone(),
            changes: Vec::new(),
            warnings: Vec::new(),
        };
        let mut error = None;

        for (i, operation) in action.operations.iter().enumerate() {
            log::debug!("operation {}/{}: {:?}", i + 1, action.operations.len(), operation);
            if let Err(e) = self.apply(operation, &mut session) {
                log::debug!("operation {} failed: {}", i + 1, e);
                error = Some(e.to_string());
                break;
            }
        }

        let modified = session.data != *document;
        ExecutionResult {
            success: error.is_none(),
            modified,
            changes: session.changes,
            warning: (!session.warnings.is_empty()).then(|| session.warnings.join("; ")),
            error,
            new_data: session.data,
            original_data: document.clone(),
        }
    }

    fn apply(&self, operation: &Operation, session: &mut Session) -> Result<(), ExecError> {
        match operation {
            Operation::Set { path, value } => self.apply_set(path, value, session),
            Operation::Delete { path } => {
                match path.remove(&mut session.data) {
                    Some(old) => session.change(format!("Deleted {} (was {})", path, to_compact(&old))),
                    None => session.warn(format!("DELETE: '{}' does not exist", path)),
                }
                Ok(())
            }
            Operation::Rename { from, to } => self.apply_rename(from, to, session),
            Operation::Increment { path, amount } => {
                self.apply_step(path, amount.unwrap_or(1.0), "INCREMENT", session)
            }
            Operation::Decrement { path, amount } => {
                self.apply_step(path, -amount.unwrap_or(1.0), "DECREMENT", session)
            }
            Operation::Collection(op) => self.apply_collection(op, session),
        }
    }

    // ========================================
    // Scalar operations
    // ========================================

    fn apply_set(&self, path: &Path, literal: &Literal, session: &mut Session) -> Result<(), ExecError> {
        let value = self.evaluator.literal(literal);
        if path.resolve(&session.data) == Some(&value) {
            return Ok(());
        }
        let rendered = to_compact(&value);
        match path.set(&mut session.data, value)? {
            Some(old) => session.change(format!("Set {}: {} → {}", path, to_compact(&old), rendered)),
            None => session.change(format!("Added {}: {}", path, rendered)),
        }
        Ok(())
    }

    fn apply_rename(&self, from: &Path, to: &Path, session: &mut Session) -> Result<(), ExecError> {
        let Some(value) = from.resolve(&session.data).cloned() else {
            session.warn(format!("RENAME: '{}' does not exist", from));
            return Ok(());
        };
        if from.navigable() == to.navigable() {
            return Ok(());
        }
        if to.navigable().starts_with(from.navigable()) {
            return Err(ExecError::RenameIntoSelf {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        match to.resolve(&session.data) {
            Some(existing) if *existing != value => {
                return Err(ExecError::RenameTargetExists {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
            Some(_) => {
                from.remove(&mut session.data);
            }
            None => {
                if !rename_in_place(from, to, &mut session.data) {
                    to.set(&mut session.data, value)?;
                    from.remove(&mut session.data);
                }
            }
        }
        session.change(format!("Renamed {} → {}", from, to));
        Ok(())
    }

    fn apply_step(&self, path: &Path, delta: f64, verb: &'static str, session: &mut Session) -> Result<(), ExecError> {
        let current = match path.resolve(&session.data) {
            None => 0.0,
            Some(v) => v.as_number().ok_or_else(|| ExecError::NotNumeric {
                verb,
                path: path.to_string(),
                value: to_compact(v),
            })?,
        };

        let updated = match (Decimal::from_f64(current), Decimal::from_f64(delta)) {
            (Some(a), Some(b)) => a.checked_add(b).and_then(|r| r.to_f64()).unwrap_or(current + delta),
            _ => current + delta,
        };

        path.set(&mut session.data, Value::Number(updated))?;
        session.change(format!(
            "{} {}: {} → {}",
            if verb == "INCREMENT" { "Incremented" } else { "Decremented" },
            path,
            format_number(current),
            format_number(updated)
        ));
        Ok(())
    }

    // ========================================
    // Collection operations
    // ========================================

    fn apply_collection(&self, op: &CollectionOp, session: &mut Session) -> Result<(), ExecError> {
        let verb = op.verb.name();
        let target = &op.target;

        let takes_filter = matches!(
            op.verb,
            CollectionVerb::Update(_) | CollectionVerb::Remove(_) | CollectionVerb::MoveWhere(_)
        );
        if op.filter.is_some() && !takes_filter {
            return Err(ExecError::FilterNotSupported { verb });
        }

        if let CollectionVerb::Merge { value, deep } = &op.verb {
            return self.apply_merge(target, value, *deep, session);
        }

        let inserting = matches!(
            op.verb,
            CollectionVerb::Append(_) | CollectionVerb::Prepend(_) | CollectionVerb::Insert { .. }
        );
        match target.resolve(&session.data) {
            None | Some(Value::Null) if inserting => {
                target.set(&mut session.data, Value::Array(Vec::new()))?;
            }
            None => {
                session.warn(format!("{}: '{}' does not exist", verb, target));
                return Ok(());
            }
            Some(Value::Null) => {
                session.warn(format!("{}: '{}' is empty", verb, target));
                return Ok(());
            }
            Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(ExecError::NotAnArray {
                    verb,
                    path: target.to_string(),
                    found: other.type_name(),
                });
            }
        }

        let mut changes = Vec::new();
        let mut warnings = Vec::new();
        let outcome = {
            let Some(Value::Array(items)) = target.resolve_mut(&mut session.data) else {
                return Err(ExecError::NotAnArray {
                    verb,
                    path: target.to_string(),
                    found: "missing",
                });
            };
            self.apply_array_verb(op, items, &mut changes, &mut warnings)
        };
        // elements updated before a failure stay written, so their changes are reported too
        changes.into_iter().for_each(|c| session.change(c));
        warnings.into_iter().for_each(|w| session.warn(w));
        outcome
    }

    fn matches(&self, filter: &Condition, item: &Value) -> bool {
        self.evaluator.evaluate(filter, item)
    }

    fn apply_array_verb(
        &self,
        op: &CollectionOp,
        items: &mut Vec<Value>,
        changes: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> Result<(), ExecError> {
        let target = &op.target;
        let verb = op.verb.name();

        match &op.verb {
            CollectionVerb::Append(literal) => {
                let value = self.evaluator.literal(literal);
                changes.push(format!("Appended {} to {}", to_compact(&value), target));
                items.push(value);
            }
            CollectionVerb::Prepend(literal) => {
                let value = self.evaluator.literal(literal);
                changes.push(format!("Prepended {} to {}", to_compact(&value), target));
                items.insert(0, value);
            }
            CollectionVerb::Insert { value, at } => {
                let value = self.evaluator.literal(value);
                let rendered = to_compact(&value);
                let pos = structural::insert_at(items, value, *at);
                changes.push(format!("Inserted {} into {} at index {}", rendered, target, pos));
            }
            CollectionVerb::RemoveAll(literal) => {
                let values: Vec<Value> = literal.entries().into_iter().map(|l| self.evaluator.literal(l)).collect();
                let removed = structural::remove_all(items, &values);
                if removed == 0 {
                    warnings.push(format!(
                        "REMOVE_ALL: {} not found in '{}'",
                        to_compact(&self.evaluator.literal(literal)),
                        target
                    ));
                } else {
                    changes.push(format!(
                        "Removed {} element(s) equal to {} from {}",
                        removed,
                        to_compact(&self.evaluator.literal(literal)),
                        target
                    ));
                }
            }
            CollectionVerb::Remove(Some(literal)) => {
                let value = self.evaluator.literal(literal);
                if structural::remove_first(items, &value) {
                    changes.push(format!("Removed {} from {}", to_compact(&value), target));
                } else {
                    warnings.push(format!("REMOVE: {} not found in '{}'", to_compact(&value), target));
                }
            }
            CollectionVerb::Remove(None) => {
                let filter = op.filter.as_ref().ok_or_else(|| ExecError::FilterRequired {
                    verb,
                    path: target.to_string(),
                })?;
                let removed = structural::remove_where(items, |item| self.matches(filter, item));
                if removed == 0 {
                    warnings.push(format!("REMOVE: no elements of '{}' matched WHERE", target));
                } else {
                    changes.push(format!("Removed {} matching element(s) from {}", removed, target));
                }
            }
            CollectionVerb::Sort { by, order } => {
                let before = items.clone();
                structural::sort(items, by.as_ref(), *order);
                if *items != before {
                    let direction = match order {
                        SortOrder::Asc => "ascending",
                        SortOrder::Desc => "descending",
                    };
                    match by {
                        Some(field) => changes.push(format!("Sorted {} by {} ({})", target, field, direction)),
                        None => changes.push(format!("Sorted {} ({})", target, direction)),
                    }
                }
            }
            CollectionVerb::MoveIndex { from, to } => {
                let (src, dst) = structural::move_index(items, *from, *to).map_err(|source| ExecError::Structural {
                    verb,
                    path: target.to_string(),
                    source,
                })?;
                if src != dst {
                    changes.push(format!("Moved {}[{}] to index {}", target, src, dst));
                }
            }
            CollectionVerb::MoveWhere(destination) => {
                let filter = op.filter.as_ref().ok_or_else(|| ExecError::FilterRequired {
                    verb,
                    path: target.to_string(),
                })?;
                let before = items.clone();
                let selected = |item: &Value| self.matches(filter, item);
                let at_anchor = |item: &Value| match destination {
                    MoveDestination::After(anchor) | MoveDestination::Before(anchor) => self.matches(anchor, item),
                    MoveDestination::Start | MoveDestination::End => false,
                };
                let (placement, label) = match destination {
                    MoveDestination::Start => (Placement::Start, "start"),
                    MoveDestination::End => (Placement::End, "end"),
                    MoveDestination::After(_) => (Placement::After(&at_anchor), "after anchor"),
                    MoveDestination::Before(_) => (Placement::Before(&at_anchor), "before anchor"),
                };
                match structural::move_where(items, selected, placement) {
                    MoveOutcome::Moved(n) => {
                        if *items != before {
                            changes.push(format!("Moved {} matching element(s) of {} to {}", n, target, label));
                        }
                    }
                    MoveOutcome::NoMatches => {
                        warnings.push(format!("MOVE: no elements of '{}' matched WHERE", target));
                    }
                    MoveOutcome::AnchorNotFound => {
                        warnings.push(format!("MOVE: no element of '{}' matched the {} condition", target, label));
                    }
                }
            }
            CollectionVerb::Deduplicate => {
                let removed = structural::deduplicate(items);
                if removed > 0 {
                    changes.push(format!("Removed {} duplicate(s) from {}", removed, target));
                }
            }
            CollectionVerb::Update(assignments) => {
                let filter = op.filter.as_ref().ok_or_else(|| ExecError::FilterRequired {
                    verb,
                    path: target.to_string(),
                })?;
                self.update_where(target, filter, assignments, items, changes, warnings)?;
            }
            CollectionVerb::Merge { .. } => unreachable!("merge is applied to objects before array resolution"),
        }
        Ok(())
    }

    fn update_where(
        &self,
        target: &Path,
        filter: &Condition,
        assignments: &[(Path, Literal)],
        items: &mut [Value],
        changes: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> Result<(), ExecError> {
        let matched: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.matches(filter, item))
            .map(|(i, _)| i)
            .collect();

        if matched.is_empty() {
            warnings.push(format!("SET: no elements of '{}' matched WHERE", target));
            return Ok(());
        }

        let values: Vec<(&Path, Value)> = assignments
            .iter()
            .map(|(path, literal)| (path, self.evaluator.literal(literal)))
            .collect();

        for index in matched {
            let item = &mut items[index];
            let before = item.clone();
            for (path, value) in &values {
                path.set(item, value.clone())
                    .map_err(|source| ExecError::ElementWrite {
                        target: target.to_string(),
                        index,
                        source,
                    })?;
            }
            if *item != before {
                let fields: Vec<String> = values
                    .iter()
                    .map(|(path, value)| format!("{} = {}", path, to_compact(value)))
                    .collect();
                changes.push(format!("Updated {}[{}]: {}", target, index, fields.join(", ")));
            }
        }
        Ok(())
    }

    fn apply_merge(&self, target: &Path, literal: &Literal, deep: bool, session: &mut Session) -> Result<(), ExecError> {
        let verb = if deep { "MERGE" } else { "MERGE_OVERWRITE" };
        let source = match self.evaluator.literal(literal) {
            Value::Object(map) => map,
            other => {
                return Err(ExecError::ValueNotAnObject {
                    verb,
                    found: other.type_name(),
                });
            }
        };

        match target.resolve_mut(&mut session.data) {
            Some(Value::Object(existing)) => {
                let before = existing.clone();
                if deep {
                    structural::merge_deep(existing, &source);
                } else {
                    structural::merge_shallow(existing, &source);
                }
                if *existing != before {
                    session.change(format!("Merged {} into {}", to_compact(&Value::Object(source)), target));
                }
            }
            None | Some(Value::Null) => {
                let rendered = to_compact(&Value::Object(source.clone()));
                target.set(&mut session.data, Value::Object(source))?;
                session.change(format!("Added {}: {}", target, rendered));
            }
            Some(other) => {
                return Err(ExecError::NotAnObject {
                    verb,
                    path: target.to_string(),
                    found: other.type_name(),
                });
            }
        }
        Ok(())
    }
}

/// Rename a key inside its parent object keeping its position.
/// Returns false when the paths do not share a parent object.
fn rename_in_place(from: &Path, to: &Path, data: &mut Value) -> bool {
    let (Some((from_parent, old_key)), Some((to_parent, new_key))) = (from.split_key(), to.split_key()) else {
        return false;
    };
    if from_parent != to_parent {
        return false;
    }
    let Some(Value::Object(map)) = from_parent.resolve_mut(data) else {
        return false;
    };
    let Some(index) = map.get_index_of(old_key) else {
        return false;
    };
    let Some((_, value)) = map.shift_remove_index(index) else {
        return false;
    };
    map.shift_insert(index, new_key.to_string(), value);
    true
}
