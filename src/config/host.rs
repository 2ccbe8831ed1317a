// ABOUTME: Minimum host hardware requirements for a dev container.
// ABOUTME: GPU requirements accept a flag, the "optional" keyword, or a detailed object.

use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,

    /// Amount of RAM with a unit suffix (tb, gb, mb, kb), e.g. "4gb".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,

    /// Disk space with a unit suffix, e.g. "32gb".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<GpuRequirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "GpuEntry")]
pub enum GpuRequirement {
    /// `true` requires a GPU, `false` states none is needed.
    Required(bool),
    /// Use a GPU when one is available.
    Optional,
    Detailed {
        cores: Option<u32>,
        memory: Option<String>,
    },
}

impl GpuRequirement {
    pub fn wants_gpu(&self) -> bool {
        !matches!(self, GpuRequirement::Required(false))
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum GpuEntry {
    Flag(bool),
    Keyword(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cores: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        memory: Option<String>,
    },
}

impl TryFrom<GpuEntry> for GpuRequirement {
    type Error = String;

    fn try_from(entry: GpuEntry) -> Result<Self, Self::Error> {
        match entry {
            GpuEntry::Flag(required) => Ok(GpuRequirement::Required(required)),
            GpuEntry::Keyword(k) if k == "optional" => Ok(GpuRequirement::Optional),
            GpuEntry::Keyword(k) => Err(format!("unknown gpu requirement: {}", k)),
            GpuEntry::Detailed { cores, memory } => Ok(GpuRequirement::Detailed { cores, memory }),
        }
    }
}

impl Serialize for GpuRequirement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entry = match self {
            GpuRequirement::Required(required) => GpuEntry::Flag(*required),
            GpuRequirement::Optional => GpuEntry::Keyword("optional".to_string()),
            GpuRequirement::Detailed { cores, memory } => GpuEntry::Detailed {
                cores: *cores,
                memory: memory.clone(),
            },
        };
        entry.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<HostRequirement, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn parses_sizes_and_cpus() {
        let req = parse(json!({"cpus": 4, "memory": "8gb", "storage": "32gb"})).unwrap();
        assert_eq!(req.cpus, Some(4));
        assert_eq!(req.memory.as_deref(), Some("8gb"));
        assert_eq!(req.storage.as_deref(), Some("32gb"));
        assert!(req.gpu.is_none());
    }

    #[test]
    fn gpu_accepts_every_form() {
        assert_eq!(
            parse(json!({"gpu": true})).unwrap().gpu,
            Some(GpuRequirement::Required(true))
        );
        assert_eq!(
            parse(json!({"gpu": "optional"})).unwrap().gpu,
            Some(GpuRequirement::Optional)
        );
        assert_eq!(
            parse(json!({"gpu": {"cores": 2, "memory": "4gb"}})).unwrap().gpu,
            Some(GpuRequirement::Detailed {
                cores: Some(2),
                memory: Some("4gb".to_string())
            })
        );
    }

    #[test]
    fn gpu_rejects_unknown_keyword() {
        let err = parse(json!({"gpu": "always"})).unwrap_err();
        assert!(err.to_string().contains("always"));
    }

    #[test]
    fn gpu_serializes_back_to_source_form() {
        assert_eq!(
            serde_json::to_value(GpuRequirement::Optional).unwrap(),
            json!("optional")
        );
        assert_eq!(
            serde_json::to_value(GpuRequirement::Required(false)).unwrap(),
            json!(false)
        );
        assert!(!GpuRequirement::Required(false).wants_gpu());
    }
}
