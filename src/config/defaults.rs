// ABOUTME: Post-decode defaulting for settings whose default depends on the container source.
// ABOUTME: Kept apart from decoding so a decoded record always reflects what the file said.

use super::DevContainer;
use super::enums::{ShutdownAction, UserEnvProbe, WaitFor};
use super::origin::{DirectImage, DockerfileBuild, OriginVariant};

/// Effective values of settings that have defaults, once a record is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub wait_for: WaitFor,
    pub user_env_probe: UserEnvProbe,
    pub override_command: bool,
    pub shutdown_action: ShutdownAction,
}

impl ResolvedSettings {
    pub fn resolve(config: &DevContainer) -> Self {
        let (override_command, shutdown_action) = match &config.origin {
            OriginVariant::Compose(compose) => {
                (compose.override_command, compose.shutdown_action.clone())
            }
            OriginVariant::DockerfileBuild(DockerfileBuild { container, .. })
            | OriginVariant::DirectImage(DirectImage { container, .. }) => {
                (container.override_command, container.shutdown_action.clone())
            }
        };
        let compose = config.origin.kind().uses_compose();

        ResolvedSettings {
            wait_for: config
                .wait_for
                .clone()
                .unwrap_or(WaitFor::UpdateContentCommand),
            user_env_probe: config
                .user_env_probe
                .clone()
                .unwrap_or(UserEnvProbe::LoginInteractiveShell),
            override_command: override_command.unwrap_or(!compose),
            shutdown_action: shutdown_action.unwrap_or(if compose {
                ShutdownAction::StopCompose
            } else {
                ShutdownAction::StopContainer
            }),
        }
    }
}
