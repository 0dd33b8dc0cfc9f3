//! Configuration management for gamelink
//!
//! Config file location:
//! - Linux: ~/.config/gamelink/config.toml
//! - macOS: ~/Library/Application Support/com.gamelink.gamelink/config.toml
//! - Windows: %APPDATA%/gamelink/gamelink/config/config.toml
//!
//! You can override the config location by setting `GAMELINK_CONFIG_PATH`.

use crate::submission::{TargetBase, DEFAULT_HOST, DEFAULT_PORT};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const CONFIG_PATH_ENV: &str = "GAMELINK_CONFIG_PATH";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where external opens point
    #[serde(default)]
    pub target: TargetConfig,

    /// Local web UI
    #[serde(default)]
    pub server: ServerConfig,

    /// Games data behind the game page
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

            let config: Config = toml::from_str(&content).with_context(|| {
                format!("Failed to parse config from {}", config_path.display())
            })?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, toml)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        let proj_dirs = ProjectDirs::from("com", "gamelink", "gamelink")
            .context("Could not determine project directories")?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Create default config file if it doesn't exist
    pub fn init() -> Result<Self> {
        let config = Self::load()?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            config.save()?;
        }

        Ok(config)
    }
}

/// Origin of the game page for external opens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_target_port")]
    pub port: u16,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_target_port(),
        }
    }
}

impl TargetConfig {
    pub fn base(&self) -> TargetBase {
        TargetBase::origin(self.host.clone(), self.port)
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_target_port() -> u16 {
    DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

/// Web UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Open the page in the default browser on start
    #[serde(default = "default_true")]
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            open_browser: true,
        }
    }
}

fn default_server_port() -> u16 {
    3000
}

/// Catalog files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Games CSV (`Title`, `Genre`, `Link`, ...)
    pub games_csv: Option<PathBuf>,

    /// Square distance matrix keyed by title
    pub similarity_csv: Option<PathBuf>,

    /// How many games to recommend
    #[serde(default = "default_recommendations")]
    pub recommendations: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            games_csv: None,
            similarity_csv: None,
            recommendations: default_recommendations(),
        }
    }
}

fn default_recommendations() -> usize {
    5
}
