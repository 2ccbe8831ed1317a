// ABOUTME: Enumerated string settings used across devcontainer documents.
// ABOUTME: Known values are typed; anything else is kept verbatim in `Other`.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $value:literal $(| $alias:literal)*,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $value,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $($value $(| $alias)* => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(s.parse().unwrap_or_else(|never: Infallible| match never {}))
            }
        }
    };
}

string_enum! {
    /// Lifecycle command the UI waits for before continuing in the background.
    pub enum WaitFor {
        InitializeCommand => "initializeCommand",
        OnCreateCommand => "onCreateCommand",
        UpdateContentCommand => "updateContentCommand",
        PostCreateCommand => "postCreateCommand",
        PostStartCommand => "postStartCommand",
    }
}

string_enum! {
    /// How the remote user's environment is probed.
    pub enum UserEnvProbe {
        None => "none",
        LoginShell => "loginShell",
        LoginInteractiveShell => "loginInteractiveShell" | "loginShellInteractive",
        InteractiveShell => "interactiveShell" | "shellInteractive",
    }
}

string_enum! {
    /// Action taken when the editor disconnects from the primary container.
    pub enum ShutdownAction {
        None => "none",
        StopContainer => "stopContainer",
        StopCompose => "stopCompose",
    }
}

string_enum! {
    /// Action taken when a port is discovered for automatic forwarding.
    pub enum OnAutoForward {
        Notify => "notify",
        OpenBrowser => "openBrowser",
        /// Opens the browser only the first time the port is forwarded in a session.
        OpenBrowserOnce => "openBrowserOnce",
        OpenPreview => "openPreview",
        Silent => "silent",
        /// The port is never forwarded automatically.
        Ignore => "ignore",
    }
}

string_enum! {
    pub enum PortProtocol {
        Http => "http",
        Https => "https",
    }
}

string_enum! {
    pub enum MountType {
        Bind => "bind",
        Volume => "volume",
    }
}

string_enum! {
    /// Value type of a feature option.
    pub enum OptionType {
        Boolean => "boolean",
        String => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!("postStartCommand".parse(), Ok(WaitFor::PostStartCommand));
        assert_eq!("openPreview".parse(), Ok(OnAutoForward::OpenPreview));
        assert_eq!("volume".parse(), Ok(MountType::Volume));
    }

    #[test]
    fn keeps_unknown_values() {
        let action: ShutdownAction = "detach".parse().unwrap();
        assert_eq!(action, ShutdownAction::Other("detach".to_string()));
        assert_eq!(action.to_string(), "detach");
    }

    #[test]
    fn accepts_both_interactive_probe_spellings() {
        assert_eq!(
            "loginShellInteractive".parse(),
            Ok(UserEnvProbe::LoginInteractiveShell)
        );
        assert_eq!(
            UserEnvProbe::LoginInteractiveShell.to_string(),
            "loginInteractiveShell"
        );
    }

    #[test]
    fn serde_uses_string_form() {
        let protocol: PortProtocol = serde_json::from_str("\"https\"").unwrap();
        assert_eq!(protocol, PortProtocol::Https);
        assert_eq!(serde_json::to_string(&protocol).unwrap(), "\"https\"");
    }
}
