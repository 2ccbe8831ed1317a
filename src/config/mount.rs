// ABOUTME: Mount declarations for containers and features.
// ABOUTME: Parses object form and Docker `--mount` strings like "type=bind,source=/a,target=/b".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Shape;
use super::enums::MountType;
use super::fields::decode_typed;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    #[serde(rename = "type")]
    pub kind: MountType,

    /// Absent for anonymous volumes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub target: String,
}

impl MountSpec {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("mount cannot be empty".to_string());
        }

        let mut kind = None;
        let mut source = None;
        let mut target = None;

        // Parse format: key=value[,key=value...]
        for part in s.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                match part.trim() {
                    "readonly" | "ro" => continue,
                    _ => return Err(format!("invalid mount option: {}", part)),
                }
            };
            match key.trim() {
                "type" => kind = Some(value.parse::<MountType>().unwrap_or_else(|e| match e {})),
                "source" | "src" => source = Some(value.to_string()),
                "target" | "destination" | "dst" => target = Some(value.to_string()),
                // Remaining --mount options (readonly, consistency, ...) do not map onto a MountSpec.
                _ => {}
            }
        }

        let target = target.ok_or_else(|| format!("mount is missing a target: {}", s))?;

        Ok(MountSpec {
            // Docker's own default when `type` is left out.
            kind: kind.unwrap_or(MountType::Volume),
            source,
            target,
        })
    }

    /// Decode one entry of a `mounts` list, either `--mount` text or an object.
    pub fn from_value(field: &str, value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Self::parse(&s).map_err(|reason| Error::TypeMismatch {
                field: field.to_string(),
                reason,
            }),
            value @ Value::Object(_) => decode_typed(field, value),
            other => Err(Error::type_mismatch(
                field,
                "text or an object",
                Shape::of(&other),
            )),
        }
    }
}

/// Serde adapter for `mounts` lists in descriptors decoded through derive.
pub(crate) fn deserialize_mounts<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<MountSpec>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<Value> = Vec::deserialize(deserializer)?;
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| MountSpec::from_value(&format!("mounts[{i}]"), value))
        .collect::<Result<Vec<_>>>()
        .map_err(serde::de::Error::custom)
}
