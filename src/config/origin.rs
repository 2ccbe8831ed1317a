// ABOUTME: Container origin variants and the key-presence rules that select one.
// ABOUTME: A document builds from a Dockerfile, uses an image, or starts compose services.

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use super::Shape;
use super::enums::ShutdownAction;
use super::fields::Fields;
use crate::diagnostics::Warning;
use crate::error::{Error, Result};

const DOCKERFILE_KEY: &str = "dockerfile";
const LEGACY_DOCKERFILE_KEY: &str = "dockerFile";

/// Keys owned by each variant. Keys of a non-selected variant are dropped.
const BUILD_KEYS: &[&str] = &["build"];
const IMAGE_KEYS: &[&str] = &["image"];
const COMPOSE_KEYS: &[&str] = &["dockerComposeFile", "service", "runServices"];
const NON_COMPOSE_KEYS: &[&str] = &["appPort", "runArgs", "workspaceMount"];

/// Which container source a document describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginKind {
    DockerfileBuild,
    Compose,
    DirectImage,
}

impl OriginKind {
    /// Pick the variant from key presence alone, in priority order:
    /// Dockerfile build, then compose, then image.
    pub fn detect(document: &Map<String, Value>) -> Result<Self> {
        if let Some(build) = document.get("build") {
            let Value::Object(build) = build else {
                return Err(Error::type_mismatch("build", "an object", Shape::of(build)));
            };
            if build.contains_key(DOCKERFILE_KEY) || build.contains_key(LEGACY_DOCKERFILE_KEY) {
                return Ok(OriginKind::DockerfileBuild);
            }
        }

        if document.contains_key("dockerComposeFile") {
            return Ok(OriginKind::Compose);
        }

        if document.contains_key("image") {
            return Ok(OriginKind::DirectImage);
        }

        Err(Error::MissingOriginVariant)
    }

    /// Whether the variant is started through compose.
    pub fn uses_compose(self) -> bool {
        self == OriginKind::Compose
    }
}

impl fmt::Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginKind::DockerfileBuild => write!(f, "Dockerfile build"),
            OriginKind::Compose => write!(f, "Docker Compose"),
            OriginKind::DirectImage => write!(f, "image"),
        }
    }
}

/// Where the container's filesystem comes from. Exactly one per document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OriginVariant {
    DockerfileBuild(DockerfileBuild),
    Compose(Compose),
    DirectImage(DirectImage),
}

impl OriginVariant {
    pub fn kind(&self) -> OriginKind {
        match self {
            OriginVariant::DockerfileBuild(_) => OriginKind::DockerfileBuild,
            OriginVariant::Compose(_) => OriginKind::Compose,
            OriginVariant::DirectImage(_) => OriginKind::DirectImage,
        }
    }

    pub fn as_dockerfile_build(&self) -> Option<&DockerfileBuild> {
        match self {
            OriginVariant::DockerfileBuild(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_compose(&self) -> Option<&Compose> {
        match self {
            OriginVariant::Compose(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_direct_image(&self) -> Option<&DirectImage> {
        match self {
            OriginVariant::DirectImage(i) => Some(i),
            _ => None,
        }
    }

    /// Settings shared by the Dockerfile and image variants.
    pub fn container_options(&self) -> Option<&ContainerOptions> {
        match self {
            OriginVariant::DockerfileBuild(b) => Some(&b.container),
            OriginVariant::DirectImage(i) => Some(&i.container),
            OriginVariant::Compose(_) => None,
        }
    }

    /// Detect the variant and consume its keys from `fields`.
    pub(crate) fn extract(fields: &mut Fields<'_>) -> Result<Self> {
        let kind = OriginKind::detect(fields.map())?;
        tracing::debug!("container source: {}", kind);

        drop_foreign_keys(fields, kind);

        match kind {
            OriginKind::DockerfileBuild => {
                let build = {
                    let mut nested = fields
                        .nested("build")?
                        .ok_or(Error::MissingOriginVariant)?;
                    BuildSpec::extract(&mut nested)?
                };
                let container = ContainerOptions::extract(fields)?;
                Ok(OriginVariant::DockerfileBuild(DockerfileBuild { build, container }))
            }
            OriginKind::DirectImage => {
                let image = fields.string("image")?.ok_or(Error::MissingOriginVariant)?;
                let container = ContainerOptions::extract(fields)?;
                Ok(OriginVariant::DirectImage(DirectImage { image, container }))
            }
            OriginKind::Compose => Ok(OriginVariant::Compose(Compose::extract(fields)?)),
        }
    }
}

fn drop_foreign_keys(fields: &mut Fields<'_>, kind: OriginKind) {
    let mut foreign: Vec<&str> = Vec::new();
    match kind {
        OriginKind::DockerfileBuild => {
            foreign.extend(IMAGE_KEYS);
            foreign.extend(COMPOSE_KEYS);
        }
        OriginKind::Compose => {
            foreign.extend(BUILD_KEYS);
            foreign.extend(IMAGE_KEYS);
            foreign.extend(NON_COMPOSE_KEYS);
        }
        OriginKind::DirectImage => {
            foreign.extend(BUILD_KEYS);
            foreign.extend(COMPOSE_KEYS);
        }
    }

    for key in foreign {
        if fields.take(key).is_some() {
            let reason = format!("not used by a {} configuration", kind);
            fields.diagnostics().warn(Warning::ignored_key(key, reason));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DockerfileBuild {
    pub build: BuildSpec,
    #[serde(flatten)]
    pub container: ContainerOptions,
}

/// The `build` object of a Dockerfile-based configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
    /// Relative to the folder containing `devcontainer.json`.
    pub dockerfile: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Target stage in a multi-stage build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub args: HashMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cache_from: Vec<String>,

    /// Extra flags passed to the image build.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl BuildSpec {
    fn extract(fields: &mut Fields<'_>) -> Result<Self> {
        let dockerfile = match fields.string(DOCKERFILE_KEY)? {
            Some(path) => path,
            None => {
                let legacy = fields.path(LEGACY_DOCKERFILE_KEY);
                let canonical = fields.path(DOCKERFILE_KEY);
                let path = fields
                    .string(LEGACY_DOCKERFILE_KEY)?
                    .ok_or(Error::MissingOriginVariant)?;
                fields.diagnostics().warn(Warning::legacy_key(&legacy, &canonical));
                path
            }
        };

        let context = fields.string("context")?;
        let target = fields.string("target")?;
        let args = fields.typed_map::<String>("args")?;
        let cache_from = fields.string_or_list("cacheFrom")?;
        let options = fields.string_list("options")?;

        let unknown: Vec<String> = fields.map().keys().map(|k| fields.path(k)).collect();
        for key in unknown {
            fields
                .diagnostics()
                .warn(Warning::ignored_key(&key, "not a recognized build option"));
        }

        Ok(BuildSpec {
            dockerfile,
            context,
            target,
            args,
            cache_from,
            options,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectImage {
    pub image: String,
    #[serde(flatten)]
    pub container: ContainerOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Compose {
    /// Compose files, in the order they are layered.
    pub docker_compose_file: Vec<String>,

    /// The primary service the editor connects to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub run_services: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_folder: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown_action: Option<ShutdownAction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_command: Option<bool>,
}

impl Compose {
    fn extract(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(Compose {
            docker_compose_file: fields.string_or_list("dockerComposeFile")?,
            service: fields.string("service")?,
            run_services: fields.string_list("runServices")?,
            workspace_folder: fields.string("workspaceFolder")?,
            shutdown_action: fields.typed("shutdownAction")?,
            override_command: fields.bool("overrideCommand")?,
        })
    }
}

/// Run settings for containers that are not started through compose.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerOptions {
    /// Ports published on the host, passed to the runtime unchanged.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub app_port: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub run_args: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown_action: Option<ShutdownAction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_command: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_folder: Option<String>,

    /// The `--mount` argument used for the workspace folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_mount: Option<String>,
}

impl ContainerOptions {
    fn extract(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(ContainerOptions {
            app_port: fields.port_or_list("appPort")?,
            run_args: fields.string_list("runArgs")?,
            shutdown_action: fields.typed("shutdownAction")?,
            override_command: fields.bool("overrideCommand")?,
            workspace_folder: fields.string("workspaceFolder")?,
            workspace_mount: fields.string("workspaceMount")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detect(value: Value) -> Result<OriginKind> {
        let Value::Object(map) = value else {
            unreachable!()
        };
        OriginKind::detect(&map)
    }

    #[test]
    fn dockerfile_build_wins_over_everything() {
        let kind = detect(json!({
            "build": {"dockerfile": "Dockerfile"},
            "image": "ubuntu",
            "dockerComposeFile": "compose.yml"
        }));
        assert_eq!(kind.unwrap(), OriginKind::DockerfileBuild);
    }

    #[test]
    fn legacy_dockerfile_spelling_selects_build() {
        let kind = detect(json!({"build": {"dockerFile": "Dockerfile"}}));
        assert_eq!(kind.unwrap(), OriginKind::DockerfileBuild);
    }

    #[test]
    fn compose_wins_over_image() {
        let kind = detect(json!({"dockerComposeFile": ["a.yml"], "image": "ubuntu"}));
        assert_eq!(kind.unwrap(), OriginKind::Compose);
    }

    #[test]
    fn build_without_dockerfile_falls_through() {
        let kind = detect(json!({"build": {"args": {"A": "1"}}, "image": "ubuntu"}));
        assert_eq!(kind.unwrap(), OriginKind::DirectImage);
    }

    #[test]
    fn non_object_build_is_a_type_mismatch() {
        let err = detect(json!({"build": "Dockerfile"})).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { ref field, .. } if field == "build"));
    }

    #[test]
    fn nothing_selected_is_an_error() {
        let err = detect(json!({"name": "empty"})).unwrap_err();
        assert!(matches!(err, Error::MissingOriginVariant));
    }

    #[test]
    fn only_compose_uses_compose() {
        assert!(OriginKind::Compose.uses_compose());
        assert!(!OriginKind::DirectImage.uses_compose());
        assert!(!OriginKind::DockerfileBuild.uses_compose());
    }
}
