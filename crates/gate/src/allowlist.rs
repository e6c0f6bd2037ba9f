//! Pre-authentication command allowlisting.
//!
//! Classification rules:
//! - Input is trimmed; an empty string is Blocked.
//! - One leading `/` marker is stripped if present, so both raw chat lines
//!   (`/login hunter2`) and already-parsed command text (`login hunter2`)
//!   classify identically.
//! - The remainder matches an allowlisted command case-insensitively,
//!   either exactly or as `"<cmd> "` followed by arguments.
//!
//! Whether a line counts as a bare chat message (never permitted
//! pre-authentication) is the chat guard's call, not the filter's: the
//! filter only answers "is this text an allowlisted command".

use authward_core::GateConfig;

/// Result of classifying one chat/command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Allowlisted command; the gate lets it through pre-authentication.
    Allowed,
    /// Anything else.
    Blocked,
}

impl Classification {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// The fixed set of command names permitted before authentication.
#[derive(Debug, Clone)]
pub struct CommandAllowlist {
    /// Lowercased command names.
    commands: Vec<String>,
}

impl CommandAllowlist {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            commands: commands
                .into_iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(&config.allowed_commands)
    }

    /// Classify a raw chat line or command string.
    pub fn classify(&self, raw: &str) -> Classification {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Classification::Blocked;
        }

        let command = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let lowered = command.to_lowercase();

        for allowed in &self.commands {
            // Exact command, or command followed by arguments.
            match lowered.strip_prefix(allowed.as_str()) {
                Some("") => return Classification::Allowed,
                Some(rest) if rest.starts_with(' ') => return Classification::Allowed,
                _ => {}
            }
        }
        Classification::Blocked
    }
}

impl Default for CommandAllowlist {
    fn default() -> Self {
        Self::new(authward_core::DEFAULT_ALLOWED_COMMANDS)
    }
}
