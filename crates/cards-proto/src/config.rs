use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

/// Environment variable that overrides `source.endpoint`.
pub const ENDPOINT_ENV: &str = "CARDS_ENDPOINT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Where the item list comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

/// External program used to play a video card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_command")]
    pub command: String,
    /// Extra arguments placed before the video URL.
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            args: default_player_args(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_endpoint() -> String {
    "https://app.olimpiadas.app/teste".to_string()
}

fn default_player_command() -> String {
    "mpv".to_string()
}

fn default_player_args() -> Vec<String> {
    vec!["--force-window=immediate".to_string()]
}

fn default_log_filter() -> String {
    "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string()
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    fn apply_env(&mut self) {
        self.override_endpoint(std::env::var(ENDPOINT_ENV).ok());
    }

    /// Blank or missing values leave the configured endpoint alone.
    fn override_endpoint(&mut self, value: Option<String>) {
        if let Some(endpoint) = value {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                self.source.endpoint = endpoint.to_string();
            }
        }
    }
}
