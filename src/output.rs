// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports a human-readable summary and a JSON mode for scripting.

use devconf::config::{DevContainer, GpuRequirement, OriginVariant};
use devconf::feature::FeatureDescriptor;
use serde::Serialize;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly summary
    Normal,
    /// The decoded model as JSON
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Print a decoded devcontainer.json.
    pub fn config(&self, config: &DevContainer) {
        if self.mode == OutputMode::Json {
            self.json(config);
            return;
        }

        println!("Name: {}", config.name.as_deref().unwrap_or("(unnamed)"));
        match &config.origin {
            OriginVariant::DockerfileBuild(b) => {
                println!("Source: Dockerfile {}", b.build.dockerfile);
                if let Some(context) = &b.build.context {
                    println!("Context: {context}");
                }
            }
            OriginVariant::DirectImage(i) => println!("Source: image {}", i.image),
            OriginVariant::Compose(c) => {
                println!("Source: compose {}", c.docker_compose_file.join(", "));
                if let Some(service) = &c.service {
                    println!("Service: {service}");
                }
            }
        }

        if !config.features.is_empty() {
            let ids: Vec<&str> = config.features.keys().map(String::as_str).collect();
            println!("Features: {}", ids.join(", "));
        }
        if !config.forward_ports.is_empty() {
            println!("Forward ports: {}", config.forward_ports.join(", "));
        }
        if let Some(host) = &config.host_requirements {
            if let Some(cpus) = host.cpus {
                println!("CPUs: {cpus}");
            }
            match &host.gpu {
                Some(GpuRequirement::Optional) => println!("GPU: optional"),
                Some(gpu) if gpu.wants_gpu() => println!("GPU: required"),
                _ => {}
            }
        }
        for (key, command) in config.lifecycle_commands() {
            println!("{key}: {command}");
        }

        let resolved = config.resolved();
        println!("Wait for: {}", resolved.wait_for);
        println!("User env probe: {}", resolved.user_env_probe);
        println!("Override command: {}", resolved.override_command);
        println!("Shutdown action: {}", resolved.shutdown_action);

        if !config.additional_properties.is_empty() {
            let keys: Vec<&str> = config
                .additional_properties
                .keys()
                .map(String::as_str)
                .collect();
            println!("Unrecognized keys: {}", keys.join(", "));
        }
    }

    /// Print a decoded devcontainer-feature.json.
    pub fn feature(&self, feature: &FeatureDescriptor) {
        if self.mode == OutputMode::Json {
            self.json(feature);
            return;
        }

        match &feature.version {
            Some(version) => println!("Feature: {} {}", feature.id, version),
            None => println!("Feature: {}", feature.id),
        }
        if let Some(name) = &feature.name {
            println!("Name: {name}");
        }
        if feature.deprecated {
            println!("Deprecated: yes");
        }

        let mut options: Vec<_> = feature.options.iter().collect();
        options.sort_by(|a, b| a.0.cmp(b.0));
        for (id, option) in options {
            match &option.default {
                Some(default) => println!(
                    "Option {id} ({}): default {}",
                    option.kind,
                    default.to_env_value()
                ),
                None => println!("Option {id} ({})", option.kind),
            }
        }
        let mut env: Vec<_> = feature.default_env().into_iter().collect();
        env.sort();
        for (name, value) in env {
            println!("Env {name}={value}");
        }
        if !feature.installs_after.is_empty() {
            println!("Installs after: {}", feature.installs_after.join(", "));
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => self.error(&e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
}
