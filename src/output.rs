//! Text rendering of document values.
//!
//! Change descriptions in an [`ExecutionResult`](crate::ExecutionResult) and
//! diagnostic messages render values through this module, so the format is
//! part of what callers see.
//!
//! # Features
//!
//! - **Compact output** via [`to_compact()`] - single line, JSON-like
//! - **Pretty output** via [`to_pretty()`] - 2-space indentation
//! - **Insertion order** - object keys are printed in document order
//! - **Whole numbers** - `3.0` prints as `3`
//!
//! # Examples
//!
//! ```
//! use metarule::Value;
//! use metarule::output::to_compact;
//!
//! let value = Value::Array(vec![Value::from("a"), Value::from(2)]);
//! assert_eq!(to_compact(&value), r#"["a",2]"#);
//! ```

use crate::value::{Map, Value};

pub struct ValuePrinter {
    pretty: bool,
}

impl ValuePrinter {
    pub fn new(pretty: bool) -> Self {
        ValuePrinter { pretty }
    }

    pub fn print(&self, value: &Value) -> String {
        self.print_value(value, 0)
    }

    fn print_value(&self, value: &Value, indent: usize) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => format!("\"{}\"", escape_string(s)),
            Value::Array(arr) => self.print_array(arr, indent),
            Value::Object(obj) => self.print_object(obj, indent),
        }
    }

    fn print_array(&self, arr: &[Value], indent: usize) -> String {
        if arr.is_empty() {
            return "[]".to_string();
        }

        if self.pretty {
            let items: Vec<String> = arr
                .iter()
                .map(|v| format!("{}{}", self.indent(indent + 1), self.print_value(v, indent + 1)))
                .collect();
            format!("[\n{}\n{}]", items.join(",\n"), self.indent(indent))
        } else {
            let items: Vec<String> = arr.iter().map(|v| self.print_value(v, indent)).collect();
            format!("[{}]", items.join(","))
        }
    }

    fn print_object(&self, obj: &Map, indent: usize) -> String {
        if obj.is_empty() {
            return "{}".to_string();
        }

        if self.pretty {
            let items: Vec<String> = obj
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}\"{}\": {}",
                        self.indent(indent + 1),
                        escape_string(k),
                        self.print_value(v, indent + 1)
                    )
                })
                .collect();
            format!("{{\n{}\n{}}}", items.join(",\n"), self.indent(indent))
        } else {
            let items: Vec<String> = obj
                .iter()
                .map(|(k, v)| format!("\"{}\":{}", escape_string(k), self.print_value(v, indent)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }
}

/// Whole numbers print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn escape_string(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            '\r' => vec!['\\', 'r'],
            '\t' => vec!['\\', 't'],
            c if c.is_control() => format!("\\u{:04x}", c as u32).chars().collect(),
            c => vec![c],
        })
        .collect()
}

/// Renders a value on a single line.
///
/// # Examples
///
/// ```
/// use metarule::Value;
/// use metarule::output::to_compact;
///
/// assert_eq!(to_compact(&Value::from(3.0)), "3");
/// assert_eq!(to_compact(&Value::from("hi")), "\"hi\"");
/// ```
pub fn to_compact(value: &Value) -> String {
    ValuePrinter::new(false).print(value)
}

/// Renders a value with 2-space indentation, one entry per line.
pub fn to_pretty(value: &Value) -> String {
    ValuePrinter::new(true).print(value)
}
