//! Minimal chat component holder for tab-list display names.
//!
//! Formatting and translation are handled elsewhere; this keeps the parsed component and
//! can flatten it to plain text.

use std::fmt;

use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    component: Value,
}

impl ChatMessage {
    /// Parse a raw JSON chat component.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let component = serde_json::from_str(raw)?;
        Ok(Self { component })
    }

    /// A component rendering exactly `text`.
    pub fn plain(text: &str) -> Self {
        Self {
            component: json!({ "text": "", "extra": [{ "text": text }] }),
        }
    }

    pub fn component(&self) -> &Value {
        &self.component
    }

    /// Concatenated text of the component and all its children.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        flatten(&self.component, &mut out);
        out
    }
}

fn flatten(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(items) => items.iter().for_each(|v| flatten(v, out)),
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                out.push_str(text);
            }
            if let Some(extra) = map.get("extra") {
                flatten(extra, out);
            }
        }
        _ => {}
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_text())
    }
}
