//! Configuration management for trasexp
//!
//! This module handles loading, validation, and management of
//! trasexp configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

/// Currency codes the client knows how to display
pub const SUPPORTED_CURRENCIES: [&str; 4] = ["NGN", "USD", "EUR", "GBP"];

// ==================== Configuration Types ====================

/// Local server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
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

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Finance backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST API, including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:7070/api".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

/// Where the client session is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from("./data/session.json")
}

/// Currency display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency used when the user has no preference
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "NGN".to_string()
}

/// Appearance settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppearanceConfig {
    /// Theme used until the user picks one
    #[serde(default)]
    pub theme: ThemeMode,
    /// Whether the host system prefers a dark color scheme
    #[serde(default)]
    pub system_prefers_dark: bool,
}

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThemeMode {
    #[serde(alias = "light")]
    Light,
    #[serde(alias = "dark")]
    Dark,
    /// Follow the system color scheme
    #[serde(alias = "AUTO", alias = "auto", alias = "system")]
    System,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::System
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" | "auto" => Ok(ThemeMode::System),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "LIGHT"),
            ThemeMode::Dark => write!(f, "DARK"),
            ThemeMode::System => write!(f, "SYSTEM"),
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of recent transactions on the dashboard
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_count: default_recent_count(),
        }
    }
}

fn default_recent_count() -> usize {
    5
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        Self::from_yaml(&content)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound { path }) => {
                log::warn!("Config file {} not found, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let base_url = self.backend.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "backend.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.timeout_secs".to_string(),
                reason: "Timeout must be at least one second".to_string(),
            });
        }

        if !SUPPORTED_CURRENCIES.contains(&self.currency.default_currency.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "currency.default_currency".to_string(),
                reason: format!("Currency must be one of {}", SUPPORTED_CURRENCIES.join(", ")),
            });
        }

        if self.dashboard.recent_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.recent_count".to_string(),
                reason: "Recent transaction count must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Backend base URL without a trailing slash
    pub fn backend_url(&self) -> String {
        self.backend.base_url.trim().trim_end_matches('/').to_string()
    }

    /// Address the local server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
