use std::{cmp::Ordering, sync::LazyLock};

use indexmap::IndexMap;
use regex::Regex;

/// Object representation used by [`Value::Object`]. Keys keep their insertion order.
pub type Map = IndexMap<String, Value>;

/// A document value as seen by conditions and actions.
///
/// This is the universal representation of metadata documents (usually parsed
/// from YAML front matter) and of literals written inside rule text.
///
/// # Equality
///
/// Equality is structural: two objects are equal when they hold the same keys
/// with equal values, regardless of key order. Numbers compare as `f64`.
///
/// # Examples
///
/// ```
/// use metarule::Value;
/// use metarule::value::Map;
///
/// let mut obj = Map::new();
/// obj.insert("status".to_string(), Value::from("draft"));
/// obj.insert("tags".to_string(), Value::Array(vec![Value::from("work")]));
///
/// let doc = Value::Object(obj);
/// assert!(doc.is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// YAML `null`, `~` or an empty field
    #[default]
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// Number, always floating point
    Number(f64),

    /// UTF-8 string
    String(String),

    /// Ordered array of values
    Array(Vec<Value>),

    /// Object with insertion-ordered string keys
    Object(Map),
}

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("numeric pattern is valid")
});

impl Value {
    /// Check if the value is truthy (for bare-path conditions)
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null => false,
            Boolean(b) => *b,
            Number(n) => *n != 0.0 && !n.is_nan(),
            String(s) => !s.is_empty(),
            Array(arr) => !arr.is_empty(),
            Object(obj) => !obj.is_empty(),
        }
    }

    /// Numeric view of the value.
    ///
    /// Numbers are returned as-is; strings are accepted only when the whole
    /// string is a decimal number (`"42"`, `"-1.5"`, `"2e3"`). Words such as
    /// `"inf"` or `"NaN"` are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) if NUMERIC.is_match(s) => s.parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Get as string slice, only for string values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Text form used for substring checks: strings are taken verbatim,
    /// everything else is rendered compactly.
    pub fn as_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => crate::output::to_compact(other),
        }
    }

    /// Human-readable type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Equality used by conditions: numeric when both sides look numeric,
    /// structural otherwise.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Rank of the value's type in the mixed-type sort order:
    /// null < numbers < strings < booleans < arrays < objects.
    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Number(_) => 1,
            Value::String(_) => 2,
            Value::Boolean(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    /// Total order used by `SORT`.
    ///
    /// Values of the same type compare naturally (arrays element-wise,
    /// objects by entry count). Values of different types compare by
    /// [`type_rank`](Self::type_rank).
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let ord = x.sort_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Value::Object(a), Value::Object(b)) => a.len().cmp(&b.len()),
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::output::to_compact(self))
    }
}
