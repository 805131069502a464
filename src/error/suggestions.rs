//! Fix suggestions printed by the CLI under an error.

use super::WykopError;
use crate::storage::config::{ENV_KEY, ENV_REFRESH_TOKEN, ENV_SECRET, ENV_TIMEOUT};

/// A fix suggestion for an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixSuggestion {
    /// Copy-paste ready commands, in order of preference.
    pub commands: Vec<String>,
    /// Why the error occurred.
    pub context: String,
}

impl FixSuggestion {
    #[must_use]
    pub fn new(commands: Vec<String>, context: impl Into<String>) -> Self {
        Self {
            commands,
            context: context.into(),
        }
    }

    /// Multi-line rendering for stderr.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.context.clone();
        for command in &self.commands {
            out.push_str("\n  ");
            out.push_str(command);
        }
        out
    }
}

impl WykopError {
    /// Actionable hint for errors the user can fix, if any.
    #[must_use]
    pub fn suggestion(&self) -> Option<FixSuggestion> {
        match self {
            Self::AuthConfig => Some(FixSuggestion::new(
                vec![
                    "wykop --key <KEY> --secret <SECRET> <COMMAND>".to_string(),
                    format!("export {ENV_KEY}=... {ENV_SECRET}=..."),
                    format!("export {ENV_REFRESH_TOKEN}=..."),
                ],
                "No credentials found. Provide an application key and secret, or a refresh token:",
            )),
            Self::Api { code: 401 | 403, .. } => Some(FixSuggestion::new(
                vec!["wykop --key <KEY> --secret <SECRET> connect".to_string()],
                "The service rejected the credentials. Refresh tokens are single use; \
                 obtain a new one through the login URL:",
            )),
            Self::Api { code: 429, .. } => Some(FixSuggestion::new(
                Vec::new(),
                "Rate limited by the service. Wait before retrying.",
            )),
            Self::Timeout(_) => Some(FixSuggestion::new(
                vec![
                    "wykop --timeout 30 <COMMAND>".to_string(),
                    format!("export {ENV_TIMEOUT}=30"),
                ],
                "The request timed out. Raise the timeout:",
            )),
            Self::ConfigParse { path, .. } => Some(FixSuggestion::new(
                Vec::new(),
                format!("Fix or remove the config file at {path}."),
            )),
            _ if self.is_retryable() => Some(FixSuggestion::new(
                Vec::new(),
                "The failure looks transient. Running the command again may succeed.",
            )),
            _ => None,
        }
    }
}
