// ABOUTME: Lifecycle command specification and its builder.
// ABOUTME: Accepts a shell-line string or an argument list and yields program + arguments.

use nonempty::NonEmpty;
use serde::ser::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use super::{Shape, Strictness};
use crate::error::{Error, Result};

/// A program and its ordered arguments.
///
/// Always holds at least the program token. The only way to obtain an empty
/// program is a blank command string decoded with [`Strictness::Lenient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: NonEmpty<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: NonEmpty {
                head: program.into(),
                tail: arguments.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Build a command from a raw document value.
    ///
    /// `field` names the key being decoded and appears in errors.
    pub fn from_value(field: &str, value: &Value, strictness: Strictness) -> Result<Self> {
        match value {
            Value::String(line) => Self::from_shell_line(field, line, strictness),
            Value::Array(items) => Self::from_items(field, items),
            other => Err(Error::UnsupportedCommandShape {
                field: field.to_string(),
                shape: Shape::of(other),
            }),
        }
    }

    /// Split a shell line on whitespace.
    pub fn from_shell_line(field: &str, line: &str, strictness: Strictness) -> Result<Self> {
        let mut tokens = line.split_whitespace().map(str::to_string);
        match tokens.next() {
            Some(program) => Ok(Self {
                argv: NonEmpty {
                    head: program,
                    tail: tokens.collect(),
                },
            }),
            None if strictness == Strictness::Lenient => Ok(Self {
                argv: NonEmpty::new(String::new()),
            }),
            None => Err(Error::EmptyCommand {
                field: field.to_string(),
            }),
        }
    }

    fn from_items(field: &str, items: &[Value]) -> Result<Self> {
        let tokens = items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(Error::UnsupportedCommandShape {
                    field: format!("{field}[{i}]"),
                    shape: Shape::of(other),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        NonEmpty::from_vec(tokens)
            .map(|argv| Self { argv })
            .ok_or_else(|| Error::EmptyCommand {
                field: field.to_string(),
            })
    }

    pub fn program(&self) -> &str {
        &self.argv.head
    }

    pub fn arguments(&self) -> &[String] {
        &self.argv.tail
    }

    /// Program followed by arguments.
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        self.argv.iter().map(String::as_str)
    }

    /// True only for a blank command accepted in lenient mode.
    pub fn is_blank(&self) -> bool {
        self.argv.head.is_empty() && self.argv.tail.is_empty()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.head)?;
        for arg in &self.argv.tail {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

// Written as an argument list so that re-decoding preserves every token.
impl Serialize for CommandSpec {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.argv.iter())
    }
}
