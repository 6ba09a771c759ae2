use crate::backend::DEFAULT_ENDPOINT;
use crate::i18n::DEFAULT_LOCALE;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Complete skill configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
}

/// BCO GraphQL backend
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request HTTP timeout; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Token required by the entity listing endpoints; open when unset
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            auth_token: None,
        }
    }
}

/// Locales and translation catalogs
#[derive(Debug, Clone, Deserialize)]
pub struct I18nConfig {
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_locales_dir")]
    pub locales_dir: String,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_locales_dir() -> String {
    "locales".to_string()
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            locales_dir: default_locales_dir(),
        }
    }
}

impl SkillConfig {
    /// Loads `BCO_SKILL_CONFIG` (if set), then applies env var overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("BCO_SKILL_CONFIG") {
            Ok(path) => load_config(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overrides fields from `lookup` (env var name → value).
    ///
    /// - `BCO_GRAPHQL_ENDPOINT`
    /// - `BCO_HTTP_TIMEOUT_SECS`
    /// - `BCO_SKILL_PORT`
    /// - `BCO_SKILL_AUTH_TOKEN` (empty clears it)
    /// - `BCO_SKILL_DEFAULT_LOCALE`
    /// - `BCO_SKILL_LOCALES_DIR`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BCO_GRAPHQL_ENDPOINT") {
            self.backend.endpoint = v;
        }
        if let Some(v) = lookup("BCO_HTTP_TIMEOUT_SECS") {
            self.backend.timeout_secs = v
                .parse()
                .context("BCO_HTTP_TIMEOUT_SECS must be a number of seconds")?;
        }
        if let Some(v) = lookup("BCO_SKILL_PORT") {
            self.server.port = v
                .parse()
                .context("BCO_SKILL_PORT must be a valid port number")?;
        }
        if let Some(v) = lookup("BCO_SKILL_AUTH_TOKEN") {
            self.server.auth_token = Some(v).filter(|t| !t.is_empty());
        }
        if let Some(v) = lookup("BCO_SKILL_DEFAULT_LOCALE") {
            self.i18n.default_locale = v;
        }
        if let Some(v) = lookup("BCO_SKILL_LOCALES_DIR") {
            self.i18n.locales_dir = v;
        }
        Ok(())
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<SkillConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: SkillConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {}", path))?;
    Ok(config)
}
