//! Configuration management
//!
//! Layered: optional TOML file, then `SICBO__*` environment variables
//! (e.g. `SICBO__SERVER__PORT=8080`).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Round-history source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_game_id")]
    pub game_id: String,
    #[serde(default = "default_table_id")]
    pub table_id: String,
    /// Number of rounds requested per fetch
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            game_id: default_game_id(),
            table_id: default_table_id(),
            size: default_size(),
            page: default_page(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Below this many rounds the engine guesses at random
    #[serde(default = "default_min_history")]
    pub min_history: usize,
    /// Rounds scored per predictor when re-weighting
    #[serde(default = "default_performance_lookback")]
    pub performance_lookback: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_history: default_min_history(),
            performance_lookback: default_performance_lookback(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    "https://api.wsmt8g.cc".to_string()
}

fn default_game_id() -> String {
    "ktrng_3932".to_string()
}

fn default_table_id() -> String {
    "39321215743193".to_string()
}

fn default_size() -> u32 {
    120
}

fn default_page() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_min_history() -> usize {
    5
}

fn default_performance_lookback() -> usize {
    10
}

impl Config {
    /// Load configuration from file (if present) and environment
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("SICBO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
