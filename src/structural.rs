//! Array and object primitives used by collection operations.
//!
//! Everything here works on plain values: no AST, no clock, no logging. The
//! executor resolves conditions into predicates before calling in.

use std::cmp::Ordering;

use thiserror::Error;

use crate::{
    ast::SortOrder,
    path::{Path, normalize_index},
    value::{Map, Value},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    #[error("index {index} is out of range for array of length {len}")]
    IndexOutOfRange { index: i64, len: usize },
}

/// Where `INSERT … AT index` places a value in an array of length `len`.
///
/// `0` prepends and `-1` appends; other non-negative indices insert before
/// that position; other negative indices count from the end (`-2` inserts
/// before the last element). The result is clamped to `[0, len]`.
pub fn insert_position(len: usize, index: i64) -> usize {
    if index >= 0 {
        (index as usize).min(len)
    } else {
        let from_end = index.unsigned_abs() as usize - 1;
        len.saturating_sub(from_end)
    }
}

/// Insert `value` following [`insert_position`]; returns the position used.
pub fn insert_at(items: &mut Vec<Value>, value: Value, index: i64) -> usize {
    let pos = insert_position(items.len(), index);
    items.insert(pos, value);
    pos
}

/// Remove every element equal to one of `targets`; returns how many were removed.
pub fn remove_all(items: &mut Vec<Value>, targets: &[Value]) -> usize {
    let before = items.len();
    items.retain(|item| !targets.contains(item));
    before - items.len()
}

/// Remove the first element equal to `target`.
pub fn remove_first(items: &mut Vec<Value>, target: &Value) -> bool {
    match items.iter().position(|item| item == target) {
        Some(pos) => {
            items.remove(pos);
            true
        }
        None => false,
    }
}

/// Remove every element matching `predicate`; returns how many were removed.
pub fn remove_where(items: &mut Vec<Value>, mut predicate: impl FnMut(&Value) -> bool) -> usize {
    let before = items.len();
    items.retain(|item| !predicate(item));
    before - items.len()
}

/// Stable sort, optionally by a field of each element.
///
/// Elements without the field sort lowest. Values of different types use
/// the fixed order of [`Value::sort_cmp`]. `Desc` reverses comparisons
/// rather than the result, so ties keep their original order either way.
pub fn sort(items: &mut Vec<Value>, by: Option<&Path>, order: SortOrder) {
    let mut keyed: Vec<(Option<Value>, Value)> = items
        .drain(..)
        .map(|item| {
            let key = match by {
                Some(path) => path.resolve(&item).cloned(),
                None => Some(item.clone()),
            };
            (key, item)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord = compare_keys(a.as_ref(), b.as_ref());
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    items.extend(keyed.into_iter().map(|(_, item)| item));
}

fn compare_keys(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.sort_cmp(b),
    }
}

/// Move the element at `from` so that it ends up at index `to`.
///
/// Both indices may be negative (counted from the end) and are resolved
/// against the current length. Returns the resolved `(from, to)` pair.
pub fn move_index(items: &mut Vec<Value>, from: i64, to: i64) -> Result<(usize, usize), StructuralError> {
    let len = items.len();
    let src = normalize_index(from, len).ok_or(StructuralError::IndexOutOfRange { index: from, len })?;
    let dst = normalize_index(to, len).ok_or(StructuralError::IndexOutOfRange { index: to, len })?;
    let item = items.remove(src);
    items.insert(dst, item);
    Ok((src, dst))
}

/// Target position for [`move_where`].
pub enum Placement<F> {
    Start,
    End,
    /// After the first remaining element matching the predicate
    After(F),
    /// Before the first remaining element matching the predicate
    Before(F),
}

/// Result of [`move_where`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// This many elements were moved as one block
    Moved(usize),
    /// No element matched the selection
    NoMatches,
    /// The anchor matched no remaining element; the array is unchanged
    AnchorNotFound,
}

/// Extract every element matching `selected` as a block, keeping their
/// relative order, and reinsert the block at `placement`. Elements that are
/// not selected keep their relative order too.
pub fn move_where<S, F>(items: &mut Vec<Value>, selected: S, placement: Placement<F>) -> MoveOutcome
where
    S: Fn(&Value) -> bool,
    F: Fn(&Value) -> bool,
{
    let (block, rest): (Vec<Value>, Vec<Value>) = items.iter().cloned().partition(|item| selected(item));
    if block.is_empty() {
        return MoveOutcome::NoMatches;
    }

    let pos = match &placement {
        Placement::Start => 0,
        Placement::End => rest.len(),
        Placement::After(anchor) => match rest.iter().position(|item| anchor(item)) {
            Some(idx) => idx + 1,
            None => return MoveOutcome::AnchorNotFound,
        },
        Placement::Before(anchor) => match rest.iter().position(|item| anchor(item)) {
            Some(idx) => idx,
            None => return MoveOutcome::AnchorNotFound,
        },
    };

    let moved = block.len();
    let mut result = rest;
    result.splice(pos..pos, block);
    *items = result;
    MoveOutcome::Moved(moved)
}

/// Drop later duplicates, keeping first occurrences in order; returns how many were removed.
pub fn deduplicate(items: &mut Vec<Value>) -> usize {
    let before = items.len();
    let mut kept: Vec<Value> = Vec::with_capacity(before);
    for item in items.drain(..) {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    *items = kept;
    before - items.len()
}

/// Recursive merge: nested objects merge key by key, everything else from
/// `source` (arrays included) replaces the target value.
pub fn merge_deep(target: &mut Map, source: &Map) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => merge_deep(existing, incoming),
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Shallow merge: top-level keys from `source` overwrite, nested objects are replaced wholesale.
pub fn merge_shallow(target: &mut Map, source: &Map) {
    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
}
