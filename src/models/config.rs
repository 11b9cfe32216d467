//! Server configuration.
//!
//! Values are layered: `config/default.yaml`, then `config/{APP_ENV}.yaml`,
//! then environment variables prefixed with `APP__` (for example
//! `APP__BACKEND_URL` or `APP__OPERATOR__PASSWORD`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::platform::{EXTENDED_PRESET, Platform, PlatformSet};
use crate::domain::types::{PlatformKey, PlatformLabel, SiteHost, TypeConstraintError};

/// One marketplace declared in configuration instead of a preset.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    pub key: String,
    pub label: String,
    pub site: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl TryFrom<&PlatformConfig> for Platform {
    type Error = TypeConstraintError;

    fn try_from(value: &PlatformConfig) -> Result<Self, Self::Error> {
        Ok(Platform::new(
            PlatformKey::new(value.key.as_str())?,
            PlatformLabel::new(value.label.as_str())?,
            SiteHost::new(value.site.as_str())?,
            &value.aliases,
        ))
    }
}

/// Account allowed into the admin pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatorConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Configuration options of the storefront server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the backend API serving products and link records.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Signs the session and flash cookies. At least 64 bytes.
    pub secret_key: String,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    #[serde(default = "default_platform_preset")]
    pub platform_preset: String,
    /// Replaces the preset when present.
    #[serde(default)]
    pub platforms: Option<Vec<PlatformConfig>>,
    #[serde(default)]
    pub operator: OperatorConfig,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_backend_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_templates_dir() -> String {
    "templates/**/*".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_platform_preset() -> String {
    EXTENDED_PRESET.to_string()
}

impl ServerConfig {
    /// Loads configuration from the `config/` directory and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Marketplace table: the explicit list if configured, else the preset.
    pub fn platform_set(&self) -> Result<PlatformSet, TypeConstraintError> {
        match &self.platforms {
            Some(platforms) => PlatformSet::new(
                platforms
                    .iter()
                    .map(Platform::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => PlatformSet::preset(&self.platform_preset),
        }
    }
}
