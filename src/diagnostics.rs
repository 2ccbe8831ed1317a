// ABOUTME: Diagnostics accumulator for non-fatal warnings during decoding.
// ABOUTME: Collects findings that shouldn't fail a decode but should be shown to users.

/// Collects non-fatal warnings while a document is decoded.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during decoding.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a warning for an integer port rendered as text.
    pub fn integer_port(field: &str, port: &serde_json::Number) -> Self {
        Self {
            kind: WarningKind::IntegerPort,
            message: format!("`{field}`: integer port {port} accepted as text"),
        }
    }

    /// Create a warning for a command with no tokens.
    pub fn empty_command(field: &str) -> Self {
        Self {
            kind: WarningKind::EmptyCommand,
            message: format!("`{field}` is empty; accepted as an empty command"),
        }
    }

    /// Create a warning for a key that the selected container source does not use.
    pub fn ignored_key(field: &str, reason: impl AsRef<str>) -> Self {
        Self {
            kind: WarningKind::IgnoredKey,
            message: format!("ignoring `{field}`: {}", reason.as_ref()),
        }
    }

    /// Create a warning for an outdated spelling of a key.
    pub fn legacy_key(field: &str, replacement: &str) -> Self {
        Self {
            kind: WarningKind::LegacyKey,
            message: format!("`{field}` is a legacy spelling of `{replacement}`"),
        }
    }
}

/// Categories of warnings that can occur during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// An integer port was coerced to text (lenient mode only).
    IntegerPort,
    /// A blank command string was accepted (lenient mode only).
    EmptyCommand,
    /// A recognized key was dropped because it does not apply.
    IgnoredKey,
    /// A key used an outdated spelling.
    LegacyKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::empty_command("postCreateCommand"));
        diag.warn(Warning::ignored_key("image", "build takes precedence"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        let port = Warning::integer_port("forwardPorts[0]", &serde_json::Number::from(3000));
        assert_eq!(port.kind, WarningKind::IntegerPort);
        assert!(port.message.contains("3000"));

        let legacy = Warning::legacy_key("build.dockerFile", "build.dockerfile");
        assert_eq!(legacy.kind, WarningKind::LegacyKey);
    }
}
