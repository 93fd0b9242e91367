//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;

use super::Settings;
use crate::utils::errors::{RefTrackError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_oracle_config(&settings.oracle)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(RefTrackError::Config("Bot token is required".to_string()));
    }

    if config.username.is_empty() {
        return Err(RefTrackError::Config(
            "Bot username is required to build share links".to_string(),
        ));
    }

    if config.channel_id == 0 {
        return Err(RefTrackError::Config(
            "Required channel ID must be configured".to_string(),
        ));
    }

    if Url::parse(&config.channel_invite_link).is_err() {
        return Err(RefTrackError::Config(
            "Channel invite link must be a valid URL".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(RefTrackError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(RefTrackError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(RefTrackError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate oracle configuration
fn validate_oracle_config(config: &super::OracleConfig) -> Result<()> {
    if config.timeout_seconds == 0 {
        return Err(RefTrackError::Config(
            "Oracle timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(RefTrackError::Config(
            "Logging level is required".to_string(),
        ));
    }

    Ok(())
}
