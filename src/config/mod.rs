//! Application configuration
//!
//! Layered: `config/default` then `config/local` (optional) then `APP__*`
//! environment variables, with double underscores separating nesting levels
//! (e.g. `APP__SERVER__PORT=9090`).

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub recognition: RecognitionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `memory` or `postgres`.
    pub backend: String,
    /// Falls back to the `DATABASE_URL` environment variable when unset.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// AES-256 key for credentials at rest; must be exactly 32 bytes.
    pub encryption_key: String,
    /// Per-provider attempt deadline in seconds.
    pub attempt_timeout_secs: u64,
    /// When true, the stored instruction override is ignored and the builtin
    /// locale templates are always used.
    pub force_builtin_template: bool,
    pub pinned: Option<PinnedProviderConfig>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            encryption_key: "default-dev-key-32-bytes-long-!!".to_string(),
            attempt_timeout_secs: 30,
            force_builtin_template: true,
            pinned: None,
        }
    }
}

/// Statically configured first-choice provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PinnedProviderConfig {
    pub id: String,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.1
}

impl AppConfig {
    /// Load configuration from files and environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
