//! Reading and writing metadata documents
//!
//! Input is YAML (JSON is accepted as a subset). A Markdown file with a
//! `---` delimited front matter block is split: rules see only the front
//! matter and the body is written back untouched.

use super::CliError;
use crate::{
    convert::{value_to_json, value_to_yaml, yaml_to_value},
    value::{Map, Value},
};

/// Output format for the resulting document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// A parsed input document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Front matter (or the whole input) as a rule value
    pub data: Value,
    /// Text after the closing `---`, when the input had front matter
    pub body: Option<String>,
}

/// Split `---` front matter from the rest of the text.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---\n").or_else(|| text.strip_prefix("---\r\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if matches!(line.trim_end(), "---" | "...") {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse YAML/JSON text (optionally front matter plus body) into a [`Document`].
///
/// An empty document is an empty mapping; any other non-mapping is an error.
pub fn parse_document(text: &str) -> Result<Document, CliError> {
    let (yaml, body) = match split_front_matter(text) {
        Some((front, body)) => (front, Some(body.to_string())),
        None => (text, None),
    };

    let data = match yaml_to_value(serde_yaml::from_str(yaml)?) {
        Value::Null => Value::Object(Map::new()),
        obj @ Value::Object(_) => obj,
        other => return Err(CliError::NotAMapping(other.type_name())),
    };
    log::debug!("parsed document with {} top-level field(s)", data.as_object().map_or(0, |o| o.len()));

    Ok(Document { data, body })
}

/// Render a document in the requested format.
///
/// YAML output re-attaches the body behind a front matter block; JSON
/// output contains the data only.
pub fn render_document(data: &Value, body: Option<&str>, format: OutputFormat, pretty: bool) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => {
            let json = value_to_json(data.clone());
            Ok(if pretty {
                serde_json::to_string_pretty(&json)?
            } else {
                serde_json::to_string(&json)?
            })
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&value_to_yaml(data.clone()))?;
            Ok(match body {
                Some(body) => format!("---\n{}---\n{}", yaml, body),
                None => yaml,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_matter_and_body_are_split() {
        let doc = parse_document("---\ntitle: Notes\n---\n# Heading\n").unwrap();
        assert_eq!(doc.body.as_deref(), Some("# Heading\n"));
        assert_eq!(doc.data.as_object().unwrap()["title"], Value::from("Notes"));

        let out = render_document(&doc.data, doc.body.as_deref(), OutputFormat::Yaml, false).unwrap();
        assert_eq!(out, "---\ntitle: Notes\n---\n# Heading\n");
    }

    #[test]
    fn plain_yaml_and_json_inputs() {
        let doc = parse_document("status: draft\n").unwrap();
        assert_eq!(doc.body, None);
        let doc = parse_document("{\"status\": \"draft\"}").unwrap();
        assert_eq!(doc.data.as_object().unwrap()["status"], Value::from("draft"));
        assert_eq!(parse_document("").unwrap().data, Value::Object(Map::new()));
        assert!(matches!(parse_document("- a\n- b\n"), Err(CliError::NotAMapping("array"))));
    }
}
