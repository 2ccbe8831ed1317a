// ABOUTME: Shape tags for generic JSON values.
// ABOUTME: Used to report what a field actually held when it fails to decode.

use serde_json::Value;
use std::fmt;

/// The kind of a JSON value, independent of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Text,
    Sequence,
    Mapping,
    Number,
    Boolean,
    Null,
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Shape::Text,
            Value::Array(_) => Shape::Sequence,
            Value::Object(_) => Shape::Mapping,
            Value::Number(_) => Shape::Number,
            Value::Bool(_) => Shape::Boolean,
            Value::Null => Shape::Null,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Text => "text",
            Shape::Sequence => "a list",
            Shape::Mapping => "an object",
            Shape::Number => "a number",
            Shape::Boolean => "a boolean",
            Shape::Null => "null",
        };
        f.write_str(name)
    }
}
