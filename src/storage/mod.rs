//! Storage for configuration and the persisted refresh token.

pub mod config;
pub mod paths;
pub mod token_file;

pub use config::{
    ApiConfig, AuthConfig, Config, ConfigOverrides, ConfigSource, ConfigSources, ENV_BASE_URL,
    ENV_CONFIG, ENV_KEY, ENV_REFRESH_TOKEN, ENV_SECRET, ENV_TIMEOUT, ENV_TOKEN_FILE,
    ResolvedConfig,
};
pub use paths::AppPaths;
pub use token_file::TokenFile;
