use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::bonding::BondingCurveParams;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub starknet: StarknetConfig,
    #[serde(default)]
    pub bonding: BondingCurveParams,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BackendConfig {
    /// Backend REST API base URL - loaded from env BACKEND_API_URL
    #[serde(default)]
    pub api_url: String,
    /// Sent as `x-api-key` - loaded from env API_KEY
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StarknetConfig {
    /// JSON-RPC endpoint used for `starknet_getClassAt`
    #[serde(default = "default_node_url")]
    pub node_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    /// Agents kept per board.
    #[serde(default = "default_board_size")]
    pub size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_node_url() -> String {
    "https://starknet-sepolia.public.blastapi.io".to_string()
}
fn default_board_size() -> usize {
    5
}
fn default_bind() -> String {
    "127.0.0.1:3030".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StarknetConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            size: default_board_size(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load config from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env();
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a default config with everything taken from the environment.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Secrets and endpoints from the environment win over the file.
    fn apply_env(&mut self) {
        if let Some(url) = env_var("BACKEND_API_URL").or_else(|| env_var("NEXT_PUBLIC_BACKEND_API_URL")) {
            self.backend.api_url = url;
        }
        if let Some(key) = env_var("API_KEY") {
            self.backend.api_key = key;
        }
        if let Some(node) = env_var("NODE_URL") {
            self.starknet.node_url = node;
        }
        if let Some(bind) = env_var("LEFTCURVE_BIND") {
            self.dashboard.bind = bind;
        }
    }

    pub fn has_backend(&self) -> bool {
        !self.backend.api_url.is_empty() && !self.backend.api_key.is_empty()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Serializes tests that touch the process environment.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) const ENV_KEYS: [&str; 5] = [
    "BACKEND_API_URL",
    "NEXT_PUBLIC_BACKEND_API_URL",
    "API_KEY",
    "NODE_URL",
    "LEFTCURVE_BIND",
];
