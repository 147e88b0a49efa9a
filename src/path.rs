//! Dotted paths into a document.
//!
//! A [`Path`] is parsed from rule text (`metadata.reviewed`, `items.0.name`,
//! `@.unit`) and resolved lazily against whatever document or array element
//! is the evaluation root at that moment.

use std::fmt;

use thiserror::Error;

use crate::value::{Map, Value};

/// A segment in a document path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Object field access by name
    ///
    /// # Examples
    /// - `status` → `Key("status")`
    /// - `metadata.reviewed` → `[Key("metadata"), Key("reviewed")]`
    /// - `"due date"` → `Key("due date")`
    Key(String),

    /// Array element access by position
    ///
    /// Negative indices count from the end (`-1` is the last element).
    /// On an object the index is used as a string key (`"0"`).
    Index(i64),

    /// The current element (`@`)
    ///
    /// Only valid as the first segment; resolves to the evaluation root.
    Current,
}

/// Errors raised while writing through a path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("cannot write '{path}': '{at}' is {found}, not an object")]
    NotAContainer {
        path: String,
        at: String,
        found: &'static str,
    },

    #[error("cannot write '{path}': index {index} is out of range for array of length {len}")]
    IndexOutOfRange { path: String, index: i64, len: usize },

    #[error("cannot write '{path}': the current element cannot be replaced here")]
    CurrentNotWritable { path: String },
}

/// Non-empty sequence of [`PathSegment`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

/// Turn a possibly negative index into a position within `len`.
pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        let idx = index as usize;
        (idx < len).then_some(idx)
    } else {
        let abs = index.unsigned_abs() as usize;
        (abs <= len).then(|| len - abs)
    }
}

impl Path {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Path { segments }
    }

    /// Single-key path
    pub fn key(name: &str) -> Self {
        Path::new(vec![PathSegment::Key(name.to_string())])
    }

    /// Path made only of the current element (`@`)
    pub fn current() -> Self {
        Path::new(vec![PathSegment::Current])
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True when the path addresses the evaluation root itself (`@`).
    pub fn is_current(&self) -> bool {
        self.navigable().is_empty()
    }

    /// Segments without the leading `@`.
    pub(crate) fn navigable(&self) -> &[PathSegment] {
        match self.segments.first() {
            Some(PathSegment::Current) => &self.segments[1..],
            _ => &self.segments,
        }
    }

    /// Read the value at this path. `None` means absent.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in self.navigable() {
            current = step(current, segment)?;
        }
        Some(current)
    }

    /// Mutable counterpart of [`resolve`](Self::resolve).
    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = root;
        for segment in self.navigable() {
            current = step_mut(current, segment)?;
        }
        Some(current)
    }

    /// Write `value` at this path, creating missing intermediate objects.
    ///
    /// A `null` intermediate (an empty YAML field) is replaced by an object.
    /// Returns the previous value, if there was one.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<Option<Value>, PathError> {
        let segments = self.navigable();
        let Some((last, parents)) = segments.split_last() else {
            return Ok(Some(std::mem::replace(root, value)));
        };

        let mut current = root;
        for (depth, segment) in parents.iter().enumerate() {
            if matches!(current, Value::Null) {
                *current = Value::Object(Map::new());
            }
            current = match (current, segment) {
                (Value::Object(map), seg) => {
                    let key = segment_key(seg, self)?;
                    map.entry(key).or_insert_with(|| Value::Object(Map::new()))
                }
                (Value::Array(arr), PathSegment::Index(idx)) => {
                    let len = arr.len();
                    let pos = normalize_index(*idx, len).ok_or_else(|| PathError::IndexOutOfRange {
                        path: self.to_string(),
                        index: *idx,
                        len,
                    })?;
                    &mut arr[pos]
                }
                (other, _) => {
                    return Err(PathError::NotAContainer {
                        path: self.to_string(),
                        at: self.prefix(depth),
                        found: other.type_name(),
                    });
                }
            };
        }

        if matches!(current, Value::Null) {
            *current = Value::Object(Map::new());
        }
        match (current, last) {
            (Value::Object(map), seg) => {
                let key = segment_key(seg, self)?;
                Ok(map.insert(key, value))
            }
            (Value::Array(arr), PathSegment::Index(idx)) => {
                let len = arr.len();
                let pos = normalize_index(*idx, len).ok_or_else(|| PathError::IndexOutOfRange {
                    path: self.to_string(),
                    index: *idx,
                    len,
                })?;
                Ok(Some(std::mem::replace(&mut arr[pos], value)))
            }
            (other, _) => Err(PathError::NotAContainer {
                path: self.to_string(),
                at: self.prefix(parents.len()),
                found: other.type_name(),
            }),
        }
    }

    /// Remove the value at this path. Silent no-op (returns `None`) when absent.
    ///
    /// Object keys are removed with `shift_remove` so the remaining keys
    /// keep their order.
    pub fn remove(&self, root: &mut Value) -> Option<Value> {
        let (last, parents) = self.navigable().split_last()?;
        let parent = Path::new(parents.to_vec()).resolve_mut(root)?;
        match (parent, last) {
            (Value::Object(map), PathSegment::Key(key)) => map.shift_remove(key),
            (Value::Object(map), PathSegment::Index(idx)) => map.shift_remove(&idx.to_string()),
            (Value::Array(arr), PathSegment::Index(idx)) => {
                let pos = normalize_index(*idx, arr.len())?;
                Some(arr.remove(pos))
            }
            _ => None,
        }
    }

    /// Text of the first `len` navigable segments
    fn prefix(&self, len: usize) -> String {
        if len == 0 {
            return "the document root".to_string();
        }
        Path::new(self.navigable()[..len].to_vec()).to_string()
    }

    /// Splits off the last segment, returning the parent path and the final key.
    ///
    /// Returns `None` when the last segment is not an object key.
    pub fn split_key(&self) -> Option<(Path, &str)> {
        let (last, parents) = self.navigable().split_last()?;
        match last {
            PathSegment::Key(key) => Some((Path::new(parents.to_vec()), key.as_str())),
            _ => None,
        }
    }
}

fn segment_key(segment: &PathSegment, path: &Path) -> Result<String, PathError> {
    match segment {
        PathSegment::Key(key) => Ok(key.clone()),
        PathSegment::Index(idx) => Ok(idx.to_string()),
        PathSegment::Current => Err(PathError::CurrentNotWritable {
            path: path.to_string(),
        }),
    }
}

fn step<'a>(value: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Object(map), PathSegment::Index(idx)) => map.get(&idx.to_string()),
        (Value::Array(arr), PathSegment::Index(idx)) => arr.get(normalize_index(*idx, arr.len())?),
        (v, PathSegment::Current) => Some(v),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
        (Value::Object(map), PathSegment::Index(idx)) => map.get_mut(&idx.to_string()),
        (Value::Array(arr), PathSegment::Index(idx)) => {
            let pos = normalize_index(*idx, arr.len())?;
            arr.get_mut(pos)
        }
        (v, PathSegment::Current) => Some(v),
        _ => None,
    }
}

fn is_plain_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        && crate::ast::Keyword::from_ident(key).is_none()
        && !matches!(key, "true" | "false" | "null")
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Key(key) if is_plain_identifier(key) => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, "\"{}\"", key.replace('"', "\\\""))?,
                PathSegment::Index(idx) => write!(f, "{}", idx)?,
                PathSegment::Current => f.write_str("@")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Value {
        let mut meta = Map::new();
        meta.insert("reviewed".into(), Value::Boolean(false));
        let mut root = Map::new();
        root.insert("metadata".into(), Value::Object(meta));
        root.insert(
            "items".into(),
            Value::Array(vec![Value::from("a"), Value::from("b"), Value::from("c")]),
        );
        root.insert("title".into(), Value::from("Notes"));
        Value::Object(root)
    }

    fn path(parts: &[&str]) -> Path {
        Path::new(
            parts
                .iter()
                .map(|p| match p.parse::<i64>() {
                    Ok(n) => PathSegment::Index(n),
                    Err(_) => PathSegment::Key(p.to_string()),
                })
                .collect(),
        )
    }

    #[test]
    fn resolve_nested_and_indices() {
        let doc = doc();
        assert_eq!(path(&["metadata", "reviewed"]).resolve(&doc), Some(&Value::Boolean(false)));
        assert_eq!(path(&["items", "-1"]).resolve(&doc), Some(&Value::from("c")));
        assert_eq!(path(&["items", "3"]).resolve(&doc), None);
        assert_eq!(path(&["title", "sub"]).resolve(&doc), None);
        assert_eq!(Path::current().resolve(&doc), Some(&doc));
    }

    #[test]
    fn set_creates_intermediates() {
        let mut doc = doc();
        let previous = path(&["a", "b", "c"]).set(&mut doc, Value::from(1)).unwrap();
        assert_eq!(previous, None);
        assert_eq!(path(&["a", "b", "c"]).resolve(&doc), Some(&Value::from(1)));
    }

    #[test]
    fn set_through_scalar_fails() {
        let mut doc = doc();
        let err = path(&["title", "x"]).set(&mut doc, Value::Null).unwrap_err();
        assert!(matches!(err, PathError::NotAContainer { found: "string", .. }));
        assert_eq!(err.to_string(), "cannot write 'title.x': 'title' is string, not an object");
    }

    #[test]
    fn remove_keeps_key_order() {
        let mut doc = doc();
        assert_eq!(path(&["metadata"]).remove(&mut doc).map(|v| v.type_name()), Some("object"));
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["items", "title"]);
        assert_eq!(path(&["missing"]).remove(&mut doc), None);
    }

    #[test]
    fn display_quotes_unusual_keys() {
        let p = Path::new(vec![
            PathSegment::Key("due date".into()),
            PathSegment::Index(0),
            PathSegment::Key("END".into()),
        ]);
        assert_eq!(p.to_string(), "\"due date\".0.\"END\"");
    }
}
