// ABOUTME: Typed model of devcontainer-feature.json descriptors.
// ABOUTME: Decoded independently of devcontainer.json; features are referenced by id.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::config::{self, MountSpec, OptionType};
use crate::error::{Error, Result};

pub const FEATURE_FILENAME: &str = "devcontainer-feature.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDescriptor {
    /// Must match the directory name the descriptor lives in.
    pub id: String,

    /// Semantic version of the feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "documentationURL"
    )]
    pub documentation_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "licenseURL")]
    pub license_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Options exposed to the install script as environment variables.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, FeatureOption>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub container_env: Map<String, Value>,

    /// Required by features such as docker-in-docker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cap_add: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_opt: Vec<String>,

    /// Script fired at container start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customizations: Option<Value>,

    /// Feature ids (without version) that should be installed before this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub installs_after: Vec<String>,

    /// Ids this feature was previously published under.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legacy_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "config::deserialize_mounts"
    )]
    pub mounts: Vec<MountSpec>,

    /// Keys not modelled above, kept verbatim.
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureOption {
    #[serde(rename = "type")]
    pub kind: OptionType,

    /// Suggested values; free-form input is still allowed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proposals: Vec<String>,

    /// The only values allowed.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "enum")]
    pub allowed: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<OptionDefault>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionDefault {
    Bool(bool),
    Text(String),
}

impl OptionDefault {
    /// The value as handed to the install script.
    pub fn to_env_value(&self) -> String {
        match self {
            OptionDefault::Bool(b) => b.to_string(),
            OptionDefault::Text(s) => s.clone(),
        }
    }
}

impl FeatureDescriptor {
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(Error::MalformedDocument)?;
        let feature: Self = config::decode_typed(config::DOCUMENT_ROOT, value)?;
        for key in feature.additional_properties.keys() {
            tracing::debug!("keeping unrecognized feature key `{}`", key);
        }
        Ok(feature)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = config::read_jsonc(path)?;
        tracing::debug!("decoding feature {}", path.display());
        Self::from_json(&content)
    }

    /// Option defaults keyed by the environment variable the install script sees.
    pub fn default_env(&self) -> HashMap<String, String> {
        self.options
            .iter()
            .filter_map(|(name, option)| {
                option
                    .default
                    .as_ref()
                    .map(|d| (option_env_name(name), d.to_env_value()))
            })
            .collect()
    }
}

/// Option ids become upper-case variables with non-alphanumerics replaced by `_`.
pub fn option_env_name(option_id: &str) -> String {
    let name: String = option_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_names_are_upper_snake_case() {
        assert_eq!(option_env_name("version"), "VERSION");
        assert_eq!(option_env_name("install-tools"), "INSTALL_TOOLS");
        assert_eq!(option_env_name("moby.build"), "MOBY_BUILD");
    }

    #[test]
    fn env_names_never_start_with_a_digit() {
        assert_eq!(option_env_name("3rdParty"), "_3RDPARTY");
    }

    #[test]
    fn defaults_render_as_env_values() {
        assert_eq!(OptionDefault::Bool(true).to_env_value(), "true");
        assert_eq!(OptionDefault::Text("lts".into()).to_env_value(), "lts");
    }
}
