//! Bot configuration
//!
//! Settings come from an optional YAML file, then environment variables
//! override individual fields. The Discord token is only ever read from the
//! environment.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default location of the YAML config file
pub const CONFIG_FILE: &str = "config/bot.yaml";
pub const DEFAULT_ENDPOINT: &str = "https://stg-api-timesheet.nccsoft.vn/api/services/app/UserPunishment/GetCompanyPunishmentComparisonAsync";
pub const DEFAULT_CLIENT_ID: &str = "Punishment-Bot/1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PREFIX: &str = "*";

pub const ENV_CONFIG_PATH: &str = "BOT_CONFIG";
pub const ENV_DISCORD_TOKEN: &str = "DISCORD_TOKEN";
pub const ENV_PREFIX: &str = "COMMAND_PREFIX";
pub const ENV_ENDPOINT: &str = "PUNISHMENT_API_URL";
pub const ENV_SECRET: &str = "TIMESHEET_SECURITY_CODE";
pub const ENV_CLIENT_ID: &str = "PUNISHMENT_API_CLIENT_ID";
pub const ENV_TIMEOUT_SECS: &str = "PUNISHMENT_API_TIMEOUT_SECS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "PUNISHMENT_API_ACCEPT_INVALID_CERTS";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("DISCORD_TOKEN must be set")]
    MissingToken,
}

/// Settings for the punishment comparison API client
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Comparison endpoint, without the `username` query parameter
    pub endpoint: String,
    /// Shared secret sent as `X-Secret-Key`; empty when unset
    pub secret: String,
    /// Value of the `User-Agent` header
    pub client_id: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Skip TLS certificate validation for the internal timesheet host
    pub accept_invalid_certs: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            secret: String::new(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secret = if self.secret.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("ApiConfig")
            .field("endpoint", &self.endpoint)
            .field("secret", &secret)
            .field("client_id", &self.client_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Apply environment overrides using `lookup` to resolve variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a numeric or boolean override
    /// cannot be parsed.
    pub fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(secret) = lookup(ENV_SECRET) {
            self.secret = secret;
        }
        if let Some(client_id) = lookup(ENV_CLIENT_ID) {
            self.client_id = client_id;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS,
                    value,
                })?;
        }
        if let Some(value) = lookup(ENV_ACCEPT_INVALID_CERTS) {
            self.accept_invalid_certs = parse_flag(ENV_ACCEPT_INVALID_CERTS, value)?;
        }
        Ok(())
    }
}

/// Top level bot configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Prefix for text commands
    pub prefix: String,
    pub api: ApiConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            api: ApiConfig::default(),
        }
    }
}

impl BotConfig {
    /// Load configuration from the YAML file and the process environment
    ///
    /// The file path is taken from `BOT_CONFIG`, falling back to
    /// `config/bot.yaml`. A missing file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// an environment override is malformed.
    pub async fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();
        let path = lookup(ENV_CONFIG_PATH).unwrap_or_else(|| CONFIG_FILE.to_string());
        Self::load_with(Path::new(&path), &lookup).await
    }

    /// Load configuration from `path`, resolving overrides through `lookup`
    ///
    /// # Errors
    ///
    /// See [`BotConfig::load`].
    pub async fn load_with<F>(path: &Path, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::from_yaml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Parse a YAML document, filling missing fields with defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Yaml` on malformed input.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment overrides using `lookup` to resolve variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on a malformed override.
    pub fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup(ENV_PREFIX) {
            self.prefix = prefix;
        }
        self.api.apply_overrides(lookup)
    }
}

/// Read the Discord token from the environment
///
/// # Errors
///
/// Returns `ConfigError::MissingToken` when the variable is unset or blank.
pub fn discord_token() -> Result<String, ConfigError> {
    std::env::var(ENV_DISCORD_TOKEN)
        .ok()
        .filter(|token| !token.trim().is_empty())
        .ok_or(ConfigError::MissingToken)
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}
