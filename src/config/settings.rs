//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

use crate::models::Locale;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub oracle: OracleConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Bot username without the leading `@`, used to build share links.
    pub username: String,
    /// Identifier of the channel users must join before onboarding.
    pub channel_id: i64,
    /// Public invite link for the required channel.
    pub channel_invite_link: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Membership oracle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    /// Upper bound on a single membership check. On timeout the check is
    /// treated as unavailable, which gates the user out.
    pub timeout_seconds: u64,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_locale: Locale,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("REFTRACK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::RefTrackError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                username: String::new(),
                channel_id: 0,
                channel_invite_link: String::new(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/reftrack".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            oracle: OracleConfig { timeout_seconds: 5 },
            i18n: I18nConfig {
                default_locale: Locale::Ar,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/reftrack".to_string(),
            },
        }
    }
}
