// ABOUTME: Configuration types and decoding for devcontainer.json.
// ABOUTME: Handles origin-variant selection, multi-shape fields, and file discovery.

mod command;
mod defaults;
mod enums;
mod fields;
mod host;
pub mod jsonc;
mod mount;
mod origin;
mod ports;
mod shape;

pub use command::CommandSpec;
pub use defaults::ResolvedSettings;
pub use enums::{
    MountType, OnAutoForward, OptionType, PortProtocol, ShutdownAction, UserEnvProbe, WaitFor,
};
pub use host::{GpuRequirement, HostRequirement};
pub use mount::MountSpec;
pub use origin::{
    BuildSpec, Compose, ContainerOptions, DirectImage, DockerfileBuild, OriginKind, OriginVariant,
};
pub use ports::PortAttribute;
pub use shape::Shape;

pub(crate) use fields::decode_typed;
pub(crate) use mount::deserialize_mounts;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use fields::Fields;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".devcontainer/devcontainer.json";
pub const CONFIG_FILENAME_ALT: &str = ".devcontainer.json";

/// Name used in errors about the document as a whole.
pub(crate) const DOCUMENT_ROOT: &str = "<document>";

/// How forgiving the decoder is about inputs older tooling accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Ports must be text and commands must contain at least one token.
    #[default]
    Strict,
    /// Integer ports become text and blank command strings are accepted.
    Lenient,
}

/// A decoded devcontainer.json.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevContainer {
    /// Display name for the dev container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Feature id to feature options.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub features: Map<String, Value>,

    /// Feature ids in the order they should be installed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub override_feature_install_order: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub forward_ports: Vec<String>,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub ports_attributes: HashMap<String, PortAttribute>,

    /// Applied to forwarded ports that match no `portsAttributes` entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_ports_attributes: Option<PortAttribute>,

    #[serde(
        rename = "updateRemoteUserUID",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_remote_user_uid: Option<bool>,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub container_env: Map<String, Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_user: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<MountSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cap_add: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_opt: Vec<String>,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub remote_env: Map<String, Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_user: Option<String>,

    /// Runs on the host before anything else.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialize_command: Option<CommandSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_create_command: Option<CommandSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_content_command: Option<CommandSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_create_command: Option<CommandSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_start_command: Option<CommandSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_attach_command: Option<CommandSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for: Option<WaitFor>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_env_probe: Option<UserEnvProbe>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_requirements: Option<HostRequirement>,

    #[serde(flatten)]
    pub origin: OriginVariant,

    /// Tool-specific settings, one object per tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customizations: Option<Value>,

    /// Top-level keys this crate does not recognize, kept as-is.
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl DevContainer {
    pub fn from_json(json: &str) -> Result<Self> {
        Decoder::new(Strictness::Strict).decode(json)
    }

    /// Read a file, accepting comments and trailing commas.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, &mut Decoder::default())
    }

    pub fn load_with(path: &Path, decoder: &mut Decoder) -> Result<Self> {
        let content = read_jsonc(path)?;
        tracing::debug!("decoding {}", path.display());
        decoder.decode(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        Self::load(&Self::locate(dir)?)
    }

    /// Find the configuration file under `dir`.
    pub fn locate(dir: &Path) -> Result<PathBuf> {
        let candidates = [dir.join(CONFIG_FILENAME), dir.join(CONFIG_FILENAME_ALT)];

        candidates
            .into_iter()
            .find(|path| path.is_file())
            .ok_or_else(|| Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Lifecycle commands in execution order as (key, command), skipping unset ones.
    pub fn lifecycle_commands(&self) -> impl Iterator<Item = (&'static str, &CommandSpec)> {
        [
            ("initializeCommand", &self.initialize_command),
            ("onCreateCommand", &self.on_create_command),
            ("updateContentCommand", &self.update_content_command),
            ("postCreateCommand", &self.post_create_command),
            ("postStartCommand", &self.post_start_command),
            ("postAttachCommand", &self.post_attach_command),
        ]
        .into_iter()
        .filter_map(|(key, cmd)| cmd.as_ref().map(|c| (key, c)))
    }

    /// Apply the defaults that depend on the selected container source.
    pub fn resolved(&self) -> ResolvedSettings {
        ResolvedSettings::resolve(self)
    }
}

pub(crate) fn read_jsonc(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(jsonc::strip(&content))
}

/// Decodes documents and keeps the warnings raised along the way.
///
/// [`Decoder::diagnostics`] holds the warnings of the most recent decode only.
#[derive(Debug, Default)]
pub struct Decoder {
    strictness: Strictness,
    diagnostics: Diagnostics,
}

impl Decoder {
    pub fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn decode(&mut self, json: &str) -> Result<DevContainer> {
        let value: Value = serde_json::from_str(json).map_err(Error::MalformedDocument)?;
        self.decode_value(value)
    }

    pub fn decode_value(&mut self, value: Value) -> Result<DevContainer> {
        self.diagnostics = Diagnostics::default();
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::type_mismatch(
                    DOCUMENT_ROOT,
                    "an object",
                    Shape::of(&other),
                ));
            }
        };

        let mut fields = Fields::new(map, self.strictness, &mut self.diagnostics);
        let origin = OriginVariant::extract(&mut fields)?;

        let config = DevContainer {
            name: fields.string("name")?,
            features: fields.object("features")?,
            override_feature_install_order: fields.string_list("overrideFeatureInstallOrder")?,
            forward_ports: fields.port_list("forwardPorts")?,
            ports_attributes: fields.typed_map("portsAttributes")?,
            other_ports_attributes: fields.typed("otherPortsAttributes")?,
            update_remote_user_uid: fields.bool("updateRemoteUserUID")?,
            container_env: fields.object("containerEnv")?,
            container_user: fields.string("containerUser")?,
            mounts: fields.mount_list("mounts")?,
            init: fields.bool("init")?,
            privileged: fields.bool("privileged")?,
            cap_add: fields.string_list("capAdd")?,
            security_opt: fields.string_list("securityOpt")?,
            remote_env: fields.object("remoteEnv")?,
            remote_user: fields.string("remoteUser")?,
            initialize_command: fields.command("initializeCommand")?,
            on_create_command: fields.command("onCreateCommand")?,
            update_content_command: fields.command("updateContentCommand")?,
            post_create_command: fields.command("postCreateCommand")?,
            post_start_command: fields.command("postStartCommand")?,
            post_attach_command: fields.command("postAttachCommand")?,
            wait_for: fields.typed("waitFor")?,
            user_env_probe: fields.typed("userEnvProbe")?,
            host_requirements: fields.typed("hostRequirements")?,
            customizations: fields.take("customizations"),
            origin,
            additional_properties: Map::new(),
        };

        let additional_properties = fields.finish();
        for key in additional_properties.keys() {
            tracing::debug!("keeping unrecognized key `{}`", key);
        }

        Ok(DevContainer {
            additional_properties,
            ..config
        })
    }
}
