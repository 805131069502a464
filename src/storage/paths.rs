//! Application paths for config and persisted tokens.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Application paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Configuration directory.
    pub config: PathBuf,
    /// Data directory (refresh token).
    pub data: PathBuf,
}

impl AppPaths {
    #[must_use]
    pub fn new() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("pl", "wykop", "wykop") {
            Self {
                config: proj_dirs.config_dir().to_path_buf(),
                data: proj_dirs.data_dir().to_path_buf(),
            }
        } else {
            // Fallback to home directory
            let home = directories::BaseDirs::new()
                .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf());
            Self {
                config: home.join(".config/wykop"),
                data: home.join(".local/share/wykop"),
            }
        }
    }

    /// Path to `config.toml`.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.toml")
    }

    /// Default location of the persisted refresh token.
    #[must_use]
    pub fn token_file(&self) -> PathBuf {
        self.data.join("refresh_token")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
