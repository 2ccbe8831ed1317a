// ABOUTME: Port forwarding attributes applied to matching forwarded ports.
// ABOUTME: Keyed by port number, range, or pattern in `portsAttributes`.

use serde::{Deserialize, Serialize};

use super::enums::{OnAutoForward, PortProtocol};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortAttribute {
    /// Label shown in the UI for this port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_auto_forward: Option<OnAutoForward>,

    /// Prompt for elevation when the local port is privileged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevate_if_needed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_local_port: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<PortProtocol>,
}
