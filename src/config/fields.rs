// ABOUTME: Field-by-field access to a decoded JSON object.
// ABOUTME: Normalizes multi-shape values and reports mismatches with the offending key.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::command::CommandSpec;
use super::mount::MountSpec;
use super::{Shape, Strictness};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};

/// A JSON object whose keys are consumed as they are decoded.
///
/// Whatever is left after decoding is returned by [`Fields::finish`].
pub(crate) struct Fields<'a> {
    map: Map<String, Value>,
    prefix: String,
    strictness: Strictness,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Fields<'a> {
    pub fn new(
        map: Map<String, Value>,
        strictness: Strictness,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            map,
            prefix: String::new(),
            strictness,
            diagnostics,
        }
    }

    pub fn map(&self) -> &Map<String, Value> {
        &self.map
    }

    pub fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut *self.diagnostics
    }

    /// Dotted path of `key` relative to the document root.
    pub fn path(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key)
    }

    /// Descend into an object-valued key. Keys are resolved against `key.`.
    pub fn nested(&mut self, key: &str) -> Result<Option<Fields<'_>>> {
        let path = self.path(key);
        match self.map.remove(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Fields {
                map,
                prefix: format!("{path}."),
                strictness: self.strictness,
                diagnostics: &mut *self.diagnostics,
            })),
            Some(other) => Err(Error::type_mismatch(path, "an object", Shape::of(&other))),
        }
    }

    pub fn string(&mut self, key: &str) -> Result<Option<String>> {
        match self.map.remove(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(Error::type_mismatch(self.path(key), "text", Shape::of(&other))),
        }
    }

    pub fn bool(&mut self, key: &str) -> Result<Option<bool>> {
        match self.map.remove(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(Error::type_mismatch(self.path(key), "a boolean", Shape::of(&other))),
        }
    }

    /// A list of text. Absent keys yield an empty list.
    pub fn string_list(&mut self, key: &str) -> Result<Vec<String>> {
        match self.map.remove(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => self.text_items(key, items),
            Some(other) => Err(Error::type_mismatch(self.path(key), "a list", Shape::of(&other))),
        }
    }

    /// A single string or a list of text, normalized to a list.
    pub fn string_or_list(&mut self, key: &str) -> Result<Vec<String>> {
        match self.map.remove(key) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s]),
            Some(Value::Array(items)) => self.text_items(key, items),
            Some(other) => Err(Error::type_mismatch(
                self.path(key),
                "text or a list",
                Shape::of(&other),
            )),
        }
    }

    fn text_items(&self, key: &str, items: Vec<Value>) -> Result<Vec<String>> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s),
                other => Err(Error::type_mismatch(
                    format!("{}[{i}]", self.path(key)),
                    "text",
                    Shape::of(&other),
                )),
            })
            .collect()
    }

    /// A list of ports. Each entry is text such as "3000" or "db:5432".
    pub fn port_list(&mut self, key: &str) -> Result<Vec<String>> {
        match self.map.remove(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => self.port_items(key, items),
            Some(other) => Err(Error::type_mismatch(self.path(key), "a list", Shape::of(&other))),
        }
    }

    /// A single port or a list of ports.
    pub fn port_or_list(&mut self, key: &str) -> Result<Vec<String>> {
        match self.map.remove(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => self.port_items(key, items),
            Some(single) => {
                let path = self.path(key);
                Ok(vec![self.port_text(&path, single)?])
            }
        }
    }

    fn port_items(&mut self, key: &str, items: Vec<Value>) -> Result<Vec<String>> {
        let base = self.path(key);
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| self.port_text(&format!("{base}[{i}]"), item))
            .collect()
    }

    fn port_text(&mut self, path: &str, value: Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) if self.strictness == Strictness::Lenient && n.is_u64() => {
                self.diagnostics.warn(Warning::integer_port(path, &n));
                Ok(n.to_string())
            }
            other => Err(Error::type_mismatch(path, "text", Shape::of(&other))),
        }
    }

    /// A list of mounts, each `--mount` text or an object.
    pub fn mount_list(&mut self, key: &str) -> Result<Vec<MountSpec>> {
        let base = self.path(key);
        match self.map.remove(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| MountSpec::from_value(&format!("{base}[{i}]"), item))
                .collect(),
            Some(other) => Err(Error::type_mismatch(base, "a list", Shape::of(&other))),
        }
    }

    /// An object with arbitrary values. Absent keys yield an empty object.
    pub fn object(&mut self, key: &str) -> Result<Map<String, Value>> {
        match self.map.remove(key) {
            None => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(Error::type_mismatch(self.path(key), "an object", Shape::of(&other))),
        }
    }

    /// An object whose values are each decoded as `T`.
    pub fn typed_map<T: DeserializeOwned>(&mut self, key: &str) -> Result<HashMap<String, T>> {
        let base = self.path(key);
        self.object(key)?
            .into_iter()
            .map(|(name, value)| {
                let entry = decode_typed(&format!("{base}.{name}"), value)?;
                Ok((name, entry))
            })
            .collect()
    }

    /// Any value that `T` knows how to deserialize.
    pub fn typed<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        match self.map.remove(key) {
            None => Ok(None),
            Some(value) => decode_typed(&self.path(key), value).map(Some),
        }
    }

    /// A lifecycle command. Absent keys stay unset.
    pub fn command(&mut self, key: &str) -> Result<Option<CommandSpec>> {
        let Some(value) = self.map.remove(key) else {
            return Ok(None);
        };
        let path = self.path(key);
        let command = CommandSpec::from_value(&path, &value, self.strictness)?;
        if command.is_blank() {
            self.diagnostics.warn(Warning::empty_command(&path));
        }
        Ok(Some(command))
    }

    /// Hand back every key that was not consumed.
    pub fn finish(self) -> Map<String, Value> {
        self.map
    }
}

pub(crate) fn decode_typed<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::TypeMismatch {
        field: path.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_fields<R>(
        value: Value,
        strictness: Strictness,
        f: impl FnOnce(&mut Fields<'_>) -> R,
    ) -> (R, Diagnostics) {
        let Value::Object(map) = value else {
            panic!("test document must be an object");
        };
        let mut diag = Diagnostics::default();
        let result = {
            let mut fields = Fields::new(map, strictness, &mut diag);
            f(&mut fields)
        };
        (result, diag)
    }

    #[test]
    fn string_or_list_wraps_single_string() {
        let (files, _) = with_fields(
            json!({"dockerComposeFile": "docker-compose.yml"}),
            Strictness::Strict,
            |f| f.string_or_list("dockerComposeFile"),
        );
        assert_eq!(files.unwrap(), ["docker-compose.yml"]);
    }

    #[test]
    fn string_list_rejects_scalar() {
        let (result, _) = with_fields(json!({"capAdd": "SYS_PTRACE"}), Strictness::Strict, |f| {
            f.string_list("capAdd")
        });
        match result {
            Err(Error::TypeMismatch { field, reason }) => {
                assert_eq!(field, "capAdd");
                assert_eq!(reason, "expected a list, found text");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn integer_ports_are_rejected_when_strict() {
        let (result, _) = with_fields(json!({"forwardPorts": ["8080", 3000]}), Strictness::Strict, |f| {
            f.port_list("forwardPorts")
        });
        match result {
            Err(Error::TypeMismatch { field, .. }) => assert_eq!(field, "forwardPorts[1]"),
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn integer_ports_become_text_when_lenient() {
        let (result, diag) = with_fields(
            json!({"forwardPorts": ["db:5432", 3000]}),
            Strictness::Lenient,
            |f| f.port_list("forwardPorts"),
        );
        assert_eq!(result.unwrap(), ["db:5432", "3000"]);
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn single_app_port_is_wrapped() {
        let (result, _) = with_fields(json!({"appPort": "8000:8010"}), Strictness::Strict, |f| {
            f.port_or_list("appPort")
        });
        assert_eq!(result.unwrap(), ["8000:8010"]);
    }

    #[test]
    fn object_rejects_list() {
        let (result, _) = with_fields(json!({"containerEnv": ["A=1"]}), Strictness::Strict, |f| {
            f.object("containerEnv")
        });
        assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn mount_list_reports_failing_entry() {
        let (result, _) = with_fields(
            json!({"mounts": ["source=a,target=/a", "type=bind,source=/b"]}),
            Strictness::Strict,
            |f| f.mount_list("mounts"),
        );
        match result {
            Err(Error::TypeMismatch { field, reason }) => {
                assert_eq!(field, "mounts[1]");
                assert!(reason.contains("missing a target"));
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn nested_fields_report_dotted_paths() {
        let (result, _) = with_fields(json!({"build": {"target": 7}}), Strictness::Strict, |f| {
            let mut build = f.nested("build")?.expect("build is present");
            build.string("target")
        });
        match result {
            Err(Error::TypeMismatch { field, .. }) => assert_eq!(field, "build.target"),
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn finish_returns_unconsumed_keys() {
        let Value::Object(map) = json!({"name": "x", "extra": 1}) else {
            unreachable!()
        };
        let mut diag = Diagnostics::default();
        let mut fields = Fields::new(map, Strictness::Strict, &mut diag);
        assert_eq!(fields.string("name").unwrap().as_deref(), Some("x"));

        let rest = fields.finish();
        assert_eq!(rest.len(), 1);
        assert!(rest.contains_key("extra"));
    }
}
