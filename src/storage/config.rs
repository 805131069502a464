//! Configuration file loading and resolution.
//!
//! Loads configuration from `config.toml` in the platform config directory
//! (`~/.config/wykop/config.toml` on Linux).
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! The refresh token has one more source between environment and config
//! file: the token file written back after every run.
//!
//! ## Environment Variables
//!
//! - `WYKOP_KEY`, `WYKOP_SECRET`: application credentials
//! - `WYKOP_REFRESH_TOKEN`: user refresh token
//! - `WYKOP_TOKEN_FILE`: where the refresh token is persisted
//! - `WYKOP_BASE_URL`: API root
//! - `WYKOP_TIMEOUT`: default request timeout in seconds
//! - `WYKOP_CONFIG`: override config file path

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::paths::AppPaths;
use super::token_file::TokenFile;
use crate::core::connector::{ConnectorConfig, DEFAULT_BASE_URL};
use crate::core::session::{Credentials, parse_base_url};
use crate::error::{Result, WykopError};

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_KEY: &str = "WYKOP_KEY";
pub const ENV_SECRET: &str = "WYKOP_SECRET";
pub const ENV_REFRESH_TOKEN: &str = "WYKOP_REFRESH_TOKEN";
pub const ENV_TOKEN_FILE: &str = "WYKOP_TOKEN_FILE";
pub const ENV_BASE_URL: &str = "WYKOP_BASE_URL";
pub const ENV_TIMEOUT: &str = "WYKOP_TIMEOUT";
pub const ENV_CONFIG: &str = "WYKOP_CONFIG";

/// Accepted range for the request timeout, in seconds.
pub const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=300;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub key: Option<String>,
    pub secret: Option<String>,
    pub refresh_token: Option<String>,
    pub token_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved configuration after merging CLI, env vars, token file and
/// config file.
#[derive(Clone)]
pub struct ResolvedConfig {
    pub key: Option<String>,
    pub secret: Option<String>,
    pub refresh_token: Option<String>,
    /// Where the refresh token is read from and written back to.
    pub token_file: PathBuf,
    pub base_url: String,
    pub timeout: Duration,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ResolvedConfig")
            .field("key", &self.key)
            .field("secret", &redact(&self.secret))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("token_file", &self.token_file)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("sources", &self.sources)
            .finish()
    }
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    pub key: ConfigSource,
    pub secret: ConfigSource,
    pub refresh_token: ConfigSource,
    pub token_file: ConfigSource,
    pub base_url: ConfigSource,
    pub timeout: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from the persisted token file.
    TokenFile,
    /// Value from config file.
    ConfigFile,
    /// Built-in default (or unset).
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::TokenFile => write!(f, "token file"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// First present value among the layers, recording which one won.
fn pick<T>(
    layers: impl IntoIterator<Item = (ConfigSource, Option<T>)>,
    source: &mut ConfigSource,
) -> Option<T> {
    for (layer, value) in layers {
        if value.is_some() {
            *source = layer;
            return value;
        }
    }
    *source = ConfigSource::Default;
    None
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ResolvedConfig {
    /// Resolve configuration from CLI overrides, the process environment,
    /// the token file and the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but is invalid
    /// - The token file exists but cannot be read
    /// - Any resolved value is invalid (e.g., a malformed base URL)
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |name| std::env::var(name).ok())
    }

    /// [`ResolvedConfig::resolve`] with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// See [`ResolvedConfig::resolve`].
    pub fn resolve_with(
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let lookup = |name: &str| non_blank(env(name));
        let config_path = overrides
            .config_path
            .clone()
            .or_else(|| lookup(ENV_CONFIG).map(PathBuf::from));
        let config = match config_path {
            Some(path) => Config::load_from(&path)?,
            None => Config::load()?,
        };
        config.validate()?;

        let mut sources = ConfigSources::default();

        let key = pick(
            [
                (ConfigSource::Cli, non_blank(overrides.key.clone())),
                (ConfigSource::Env, lookup(ENV_KEY)),
                (ConfigSource::ConfigFile, non_blank(config.auth.key.clone())),
            ],
            &mut sources.key,
        );
        let secret = pick(
            [
                (ConfigSource::Cli, non_blank(overrides.secret.clone())),
                (ConfigSource::Env, lookup(ENV_SECRET)),
                (ConfigSource::ConfigFile, non_blank(config.auth.secret.clone())),
            ],
            &mut sources.secret,
        );

        let token_file = pick(
            [
                (ConfigSource::Cli, overrides.token_file.clone()),
                (ConfigSource::Env, lookup(ENV_TOKEN_FILE).map(PathBuf::from)),
                (ConfigSource::ConfigFile, config.auth.token_file.clone()),
            ],
            &mut sources.token_file,
        )
        .unwrap_or_else(|| AppPaths::new().token_file());

        let cli_token = non_blank(overrides.refresh_token.clone());
        let env_token = lookup(ENV_REFRESH_TOKEN);
        let stored_token = if cli_token.is_none() && env_token.is_none() {
            TokenFile::new(&token_file).load()?
        } else {
            None
        };
        let refresh_token = pick(
            [
                (ConfigSource::Cli, cli_token),
                (ConfigSource::Env, env_token),
                (ConfigSource::TokenFile, stored_token),
                (
                    ConfigSource::ConfigFile,
                    non_blank(config.auth.refresh_token.clone()),
                ),
            ],
            &mut sources.refresh_token,
        );

        let base_url = pick(
            [
                (ConfigSource::Cli, non_blank(overrides.base_url.clone())),
                (ConfigSource::Env, lookup(ENV_BASE_URL)),
                (ConfigSource::ConfigFile, config.api.base_url.clone()),
            ],
            &mut sources.base_url,
        )
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        parse_base_url(&base_url).map_err(|e| WykopError::ConfigInvalid {
            key: "base_url".to_string(),
            value: base_url.clone(),
            message: e.to_string(),
        })?;

        let env_timeout = match lookup(ENV_TIMEOUT) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                WykopError::ConfigInvalid {
                    key: ENV_TIMEOUT.to_string(),
                    value: raw.clone(),
                    message: "expected a number of seconds".to_string(),
                }
            })?),
            None => None,
        };
        let timeout_secs = pick(
            [
                (ConfigSource::Cli, overrides.timeout_secs),
                (ConfigSource::Env, env_timeout),
                (ConfigSource::ConfigFile, config.api.timeout_seconds),
            ],
            &mut sources.timeout,
        )
        .unwrap_or(ApiConfig::DEFAULT_TIMEOUT_SECONDS);
        check_timeout(timeout_secs)?;

        Ok(Self {
            key,
            secret,
            refresh_token,
            token_file,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            sources,
        })
    }

    /// Credential form implied by the resolved values.
    ///
    /// # Errors
    ///
    /// Returns [`WykopError::AuthConfig`] when neither a complete key/secret
    /// pair nor a refresh token is configured.
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::from_parts(
            self.key.clone(),
            self.secret.clone(),
            self.refresh_token.clone(),
        )
    }

    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn connector_config(&self) -> Result<ConnectorConfig> {
        Ok(ConnectorConfig::new(&self.base_url)?.with_timeout(self.timeout))
    }

    #[must_use]
    pub fn token_file(&self) -> TokenFile {
        TokenFile::new(&self.token_file)
    }
}

fn check_timeout(secs: u64) -> Result<()> {
    if TIMEOUT_RANGE.contains(&secs) {
        Ok(())
    } else {
        Err(WykopError::ConfigInvalid {
            key: "timeout_seconds".to_string(),
            value: secs.to_string(),
            message: "Timeout must be between 1 and 300 seconds".to_string(),
        })
    }
}

// =============================================================================
// Config file
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credentials and token persistence.
    pub auth: AuthConfig,
    /// Service endpoint settings.
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub key: Option<String>,
    pub secret: Option<String>,
    pub refresh_token: Option<String>,
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    /// Default timeout for requests in seconds.
    pub timeout_seconds: Option<u64>,
}

impl ApiConfig {
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().config_file())
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WykopError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate configuration values.
    ///
    /// Checks that:
    /// - `key` and `secret` are given together
    /// - The base URL is absolute
    /// - Timeout is within 1-300 seconds
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<()> {
        let has = |v: &Option<String>| v.as_ref().is_some_and(|s| !s.trim().is_empty());
        if has(&self.auth.key) != has(&self.auth.secret) {
            return Err(WykopError::Config(
                "auth.key and auth.secret must be set together".to_string(),
            ));
        }

        if let Some(url) = &self.api.base_url {
            parse_base_url(url).map_err(|e| WykopError::ConfigInvalid {
                key: "api.base_url".to_string(),
                value: url.clone(),
                message: e.to_string(),
            })?;
        }

        if let Some(secs) = self.api.timeout_seconds {
            check_timeout(secs)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDir;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    /// Overrides pointing at files inside `dir` so the real user config is
    /// never touched.
    fn isolated(dir: &TestDir) -> ConfigOverrides {
        ConfigOverrides {
            config_path: Some(dir.file("config.toml")),
            ..ConfigOverrides::default()
        }
    }

    fn with_token_file(dir: &TestDir) -> ConfigOverrides {
        ConfigOverrides {
            token_file: Some(dir.file("token")),
            ..isolated(dir)
        }
    }

    #[test]
    fn load_missing_file_returns_default() {
        let config = Config::load_from(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert!(config.auth.key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_valid_toml() {
        let dir = TestDir::new();
        let path = dir.create_file(
            "config.toml",
            r#"
[auth]
key = "k"
secret = "s"

[api]
base_url = "http://localhost:8080/api/v3/"
timeout_seconds = 20
"#,
        );
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.auth.key.as_deref(), Some("k"));
        assert_eq!(config.api.timeout_seconds, Some(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_invalid_toml_returns_parse_error() {
        let dir = TestDir::new();
        let path = dir.create_file("config.toml", "this is not valid toml {{{{");
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, WykopError::ConfigParse { .. }));
    }

    #[test]
    fn validate_rejects_half_credentials() {
        let mut config = Config::default();
        config.auth.key = Some("k".into());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must be set together"));
    }

    #[test]
    fn validate_timeout_bounds() {
        for bad in [0, 301] {
            let mut config = Config::default();
            config.api.timeout_seconds = Some(bad);
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("timeout_seconds"), "{err}");
        }
    }

    #[test]
    fn validate_base_url() {
        let mut config = Config::default();
        config.api.base_url = Some("not a url".into());
        assert!(matches!(
            config.validate(),
            Err(WykopError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let dir = TestDir::new();
        let resolved = ResolvedConfig::resolve_with(&with_token_file(&dir), env_of(&[])).unwrap();
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.timeout, Duration::from_secs(10));
        assert_eq!(resolved.sources.base_url, ConfigSource::Default);
        assert!(matches!(resolved.credentials(), Err(WykopError::AuthConfig)));
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let dir = TestDir::new();
        dir.create_file(
            "config.toml",
            "[auth]\nkey = \"file-key\"\nsecret = \"file-secret\"\n[api]\ntimeout_seconds = 30\n",
        );
        let overrides = ConfigOverrides {
            key: Some("cli-key".into()),
            ..with_token_file(&dir)
        };
        let env = env_of(&[(ENV_KEY, "env-key"), (ENV_SECRET, "env-secret")]);

        let resolved = ResolvedConfig::resolve_with(&overrides, env).unwrap();
        assert_eq!(resolved.key.as_deref(), Some("cli-key"));
        assert_eq!(resolved.sources.key, ConfigSource::Cli);
        assert_eq!(resolved.secret.as_deref(), Some("env-secret"));
        assert_eq!(resolved.sources.secret, ConfigSource::Env);
        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert_eq!(resolved.sources.timeout, ConfigSource::ConfigFile);
    }

    #[test]
    fn refresh_token_falls_back_to_token_file() {
        let dir = TestDir::new();
        dir.create_file("token", "rt-from-file\n");

        let resolved = ResolvedConfig::resolve_with(&with_token_file(&dir), env_of(&[])).unwrap();
        assert_eq!(resolved.refresh_token.as_deref(), Some("rt-from-file"));
        assert_eq!(resolved.sources.refresh_token, ConfigSource::TokenFile);
        assert!(resolved.credentials().unwrap().is_logged_in());

        let env = env_of(&[(ENV_REFRESH_TOKEN, "rt-env")]);
        let resolved = ResolvedConfig::resolve_with(&with_token_file(&dir), env).unwrap();
        assert_eq!(resolved.refresh_token.as_deref(), Some("rt-env"));
    }

    #[test]
    fn config_path_from_env() {
        let dir = TestDir::new();
        let path = dir.create_file("elsewhere.toml", "[api]\nbase_url = \"http://127.0.0.1:9/\"\n");
        let overrides = ConfigOverrides {
            token_file: Some(dir.file("token")),
            ..ConfigOverrides::default()
        };
        let env = env_of(&[(ENV_CONFIG, path.to_str().unwrap())]);
        let resolved = ResolvedConfig::resolve_with(&overrides, env).unwrap();
        assert_eq!(resolved.base_url, "http://127.0.0.1:9/");
        assert_eq!(resolved.sources.base_url, ConfigSource::ConfigFile);
    }

    #[test]
    fn invalid_env_timeout_is_rejected() {
        let dir = TestDir::new();
        let env = env_of(&[(ENV_TIMEOUT, "soon")]);
        let err = ResolvedConfig::resolve_with(&with_token_file(&dir), env).unwrap_err();
        assert!(matches!(err, WykopError::ConfigInvalid { key, .. } if key == ENV_TIMEOUT));
    }

    #[test]
    fn connector_config_uses_resolved_values() {
        let dir = TestDir::new();
        let overrides = ConfigOverrides {
            base_url: Some("http://localhost:1234/api/v3".into()),
            timeout_secs: Some(5),
            ..with_token_file(&dir)
        };
        let resolved = ResolvedConfig::resolve_with(&overrides, env_of(&[])).unwrap();
        let cfg = resolved.connector_config().unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://localhost:1234/api/v3/");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }
}
