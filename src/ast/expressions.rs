use chrono::NaiveDateTime;

use crate::value::{Map, Value};

/// Literal value written in rule text.
///
/// Literals are kept unresolved in the AST so that clock values (`NOW`,
/// `TODAY`) are read at evaluation time rather than at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,

    /// `true` / `false`
    Boolean(bool),

    /// Number literal
    ///
    /// # Example
    /// ```text
    /// 42
    /// -0.5
    /// ```
    Number(f64),

    /// String literal
    String(String),

    /// Array literal
    ///
    /// # Example
    /// ```text
    /// ["work", "draft"]
    /// ```
    Array(Vec<Literal>),

    /// Object literal; keys are identifiers or strings
    ///
    /// # Example
    /// ```text
    /// {reviewed: true, "review date": TODAY}
    /// ```
    Object(Vec<(String, Literal)>),

    /// Current local date and time, `YYYY-MM-DDTHH:MM:SS`
    Now,

    /// Current local date, `YYYY-MM-DD`
    Today,
}

impl Literal {
    /// Resolve the literal into a document value using `now` for clock keywords.
    pub fn resolve(&self, now: &NaiveDateTime) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Array(items) => Value::Array(items.iter().map(|l| l.resolve(now)).collect()),
            Literal::Object(pairs) => {
                let mut map = Map::with_capacity(pairs.len());
                for (key, lit) in pairs {
                    map.insert(key.clone(), lit.resolve(now));
                }
                Value::Object(map)
            }
            Literal::Now => Value::String(now.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Literal::Today => Value::String(now.format("%Y-%m-%d").to_string()),
        }
    }

    /// Entries of a list literal; any other literal is a one-element list.
    pub fn entries(&self) -> Vec<&Literal> {
        match self {
            Literal::Array(items) => items.iter().collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn clock_literals() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(8, 5, 0))
            .unwrap();
        assert_eq!(Literal::Today.resolve(&now), Value::from("2024-03-09"));
        assert_eq!(Literal::Now.resolve(&now), Value::from("2024-03-09T08:05:00"));
    }
}
