//! Error types for wykop.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized into five categories:
//! - **Authentication**: missing credentials or a rejected token exchange
//! - **Network**: connection failures and timeouts from the transport
//! - **Configuration**: config file parsing, validation, or missing values
//! - **Api**: the service answered, but the call is classified as failed
//! - **Internal**: I/O, JSON and unclassified errors
//!
//! Each error has a stable error code (e.g., `WYKOP-A001`) for programmatic handling.
//!
//! Transport errors are never retried or rewrapped by the request pipeline;
//! status codes are only turned into [`WykopError::Api`] by the endpoint
//! facade after the call has completed.

pub mod suggestions;

use thiserror::Error;

pub use suggestions::FixSuggestion;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Credentials missing or rejected.
    Authentication,
    /// Transport failures (timeout, connection refused, DNS).
    Network,
    /// Configuration issues (parse errors, invalid values).
    Configuration,
    /// The API answered with a status classified as a failure.
    Api,
    /// Internal errors (I/O, JSON, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication error",
            Self::Network => "Network error",
            Self::Configuration => "Configuration error",
            Self::Api => "API error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Authentication => "A",
            Self::Network => "N",
            Self::Configuration => "C",
            Self::Api => "P",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes used by the `wykop` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Missing or rejected credentials
    AuthError = 2,
    /// Configuration or response parse errors
    ParseError = 3,
    /// Timeout
    Timeout = 4,
    /// The API classified the call as failed
    ApiError = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for wykop operations.
#[derive(Error, Debug)]
pub enum WykopError {
    // ==========================================================================
    // Authentication errors
    // ==========================================================================
    /// Neither a key/secret pair nor a refresh token was supplied.
    #[error("you need to provide key and secret OR refresh_token")]
    AuthConfig,

    // ==========================================================================
    // API errors
    // ==========================================================================
    /// The call completed but its status code was classified as a failure.
    #[error("CODE {code}: {message}")]
    Api { code: u16, message: String },

    // ==========================================================================
    // Network errors
    // ==========================================================================
    /// Request timed out.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// Any other transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Base URL or endpoint path could not be turned into a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error parsing configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    // ==========================================================================
    // Parse errors
    // ==========================================================================
    /// A successful response could not be decoded or lacked a mandatory field.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WykopError {
    /// Build an [`WykopError::Api`] error.
    #[must_use]
    pub fn api(code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Map error to a process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::AuthConfig => ExitCode::AuthError,

            Self::Config(_)
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::InvalidUrl(_)
            | Self::ParseResponse(_) => ExitCode::ParseError,

            Self::Timeout(_) => ExitCode::Timeout,

            Self::Api { .. } => ExitCode::ApiError,

            Self::Network(_) | Self::Io(_) | Self::Json(_) | Self::Other(_) => {
                ExitCode::GeneralError
            }
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthConfig => ErrorCategory::Authentication,

            Self::Timeout(_) | Self::Network(_) => ErrorCategory::Network,

            Self::Config(_)
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::InvalidUrl(_) => ErrorCategory::Configuration,

            Self::Api { .. } | Self::ParseResponse(_) => ErrorCategory::Api,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `WYKOP-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AuthConfig => "WYKOP-A001",

            Self::Timeout(_) => "WYKOP-N001",
            Self::Network(_) => "WYKOP-N099",

            Self::ConfigParse { .. } => "WYKOP-C001",
            Self::ConfigInvalid { .. } => "WYKOP-C002",
            Self::InvalidUrl(_) => "WYKOP-C003",
            Self::Config(_) => "WYKOP-C004",

            Self::Api { .. } => "WYKOP-P001",
            Self::ParseResponse(_) => "WYKOP-P020",

            Self::Io(_) => "WYKOP-X001",
            Self::Json(_) => "WYKOP-X002",
            Self::Other(_) => "WYKOP-X099",
        }
    }

    /// Returns whether retrying the same call could succeed.
    ///
    /// The library itself never retries; this is a hint for callers.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::Api { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// HTTP status code carried by an API error.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias for wykop operations.
pub type Result<T> = std::result::Result<T, WykopError>;
