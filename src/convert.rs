//! JSON / YAML <-> rule Value conversion utilities

use crate::value::{Map, Value};

/// Convert serde_json::Value to a rule Value
pub fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(obj) => Value::Object(obj.into_iter().map(|(k, v)| (k, json_to_value(v))).collect()),
    }
}

/// Convert a rule Value to serde_json::Value
///
/// Whole numbers become JSON integers; NaN and infinities become `null`.
pub fn value_to_json(v: Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(b),
        Value::Number(n) => match whole(n) {
            Some(i) => serde_json::Value::Number(i.into()),
            None => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        },
        Value::String(s) => serde_json::Value::String(s),
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
        Value::Object(obj) => serde_json::Value::Object(obj.into_iter().map(|(k, v)| (k, value_to_json(v))).collect()),
    }
}

/// Convert serde_yaml::Value to a rule Value
///
/// Non-string mapping keys are rendered to text (`1: x` becomes key `"1"`).
/// Tags are dropped and the tagged value kept.
pub fn yaml_to_value(v: serde_yaml::Value) -> Value {
    match v {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Boolean(b),
        serde_yaml::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_value).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                map.insert(yaml_key(k), yaml_to_value(v));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => yaml_to_value(other).as_text(),
    }
}

/// Convert a rule Value to serde_yaml::Value
pub fn value_to_yaml(v: Value) -> serde_yaml::Value {
    match v {
        Value::Null => serde_yaml::Value::Null,
        Value::Boolean(b) => serde_yaml::Value::Bool(b),
        Value::Number(n) => match whole(n) {
            Some(i) => serde_yaml::Value::Number(i.into()),
            None => serde_yaml::Value::Number(n.into()),
        },
        Value::String(s) => serde_yaml::Value::String(s),
        Value::Array(arr) => serde_yaml::Value::Sequence(arr.into_iter().map(value_to_yaml).collect()),
        Value::Object(obj) => serde_yaml::Value::Mapping(
            obj.into_iter()
                .map(|(k, v)| (serde_yaml::Value::String(k), value_to_yaml(v)))
                .collect(),
        ),
    }
}

/// The integer a float holds exactly, if any
fn whole(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15).then_some(n as i64)
}
