//! Configuration System
//!
//! Backend origin, endpoint path table, chat defaults and logging.
//! Supports TOML config files and environment variable overrides
//! (file loading needs the `native` feature).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::chat::{DEFAULT_GREETING, DEFAULT_SUGGESTIONS};
use crate::navigator::TRANSITION_DELAY;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend endpoints, relative to the configured origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Signup,
    Logout,
    /// Non-streaming query route; configured but unused by the client
    Query,
    Stream,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::Login => "/auth/login",
            Endpoint::Signup => "/auth/signup",
            Endpoint::Logout => "/auth/logout",
            Endpoint::Query => "/query",
            Endpoint::Stream => "/ws/stream",
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// HTTP origin of the FinanceGPT backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Origin without trailing slash
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Full HTTP URL for an endpoint
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.origin(), endpoint.path())
    }

    /// WebSocket origin inferred from the HTTP origin (http→ws, https→wss)
    pub fn ws_origin(&self) -> String {
        let origin = self.origin();
        if let Some(rest) = origin.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = origin.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            origin.to_string()
        }
    }

    /// Streaming endpoint URL
    pub fn ws_url(&self) -> String {
        format!("{}{}", self.ws_origin(), Endpoint::Stream.path())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Chat screen settings
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Opening assistant message
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Starter suggestions shown under the greeting
    #[serde(default = "default_suggestions")]
    pub suggestions: Vec<String>,

    /// Welcome transition length before the chat opens
    #[serde(default = "default_transition_delay")]
    pub transition_delay_ms: u64,
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

fn default_transition_delay() -> u64 {
    TRANSITION_DELAY.as_millis() as u64
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            suggestions: default_suggestions(),
            transition_delay_ms: default_transition_delay(),
        }
    }
}

impl ChatConfig {
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Apply overrides from a key lookup (the environment, in practice)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FINANCEGPT_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("FINANCEGPT_REQUEST_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = secs;
            }
        }
        if let Some(level) = lookup("FINANCEGPT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("FINANCEGPT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

#[cfg(feature = "native")]
impl Config {
    /// Load configuration from a file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load an explicit file, else the first default location found, else defaults.
    ///
    /// An explicit path that cannot be read is an error; broken files in the
    /// default locations are logged and skipped.
    pub fn load_default(explicit: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_with_env(path)?;
            tracing::info!("Loaded config from {:?}", path);
            return Ok(config);
        }

        let config_paths = [
            dirs::config_dir().map(|p| p.join("financegpt").join("config.toml")),
            Some(PathBuf::from("./financegpt.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# FinanceGPT client configuration
#
# Environment variables override these settings:
# - FINANCEGPT_API_URL
# - FINANCEGPT_REQUEST_TIMEOUT
# - FINANCEGPT_LOG_LEVEL
# - FINANCEGPT_LOG_FORMAT

[api]
# HTTP origin of the FinanceGPT backend.
# The streaming endpoint is derived from it (http -> ws, https -> wss).
base_url = "http://localhost:8000"

# Timeout for login/signup/logout requests in seconds
request_timeout_secs = 30

[chat]
# Opening assistant message
greeting = "Welcome to Finance GPT! Ask me anything about investments, products, or your financial goals."

# Starter suggestions shown under the greeting
suggestions = [
    "which all services do jio finance offer",
    "I am plaaning for some retiral benifits.",
    "i am looking for low risk investments. can you help me?",
]

# How long the welcome screen stays up after login (ms)
transition_delay_ms = 2200

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path (logs go to stderr otherwise)
# file = "/tmp/financegpt.log"
"#
    .to_string()
}
