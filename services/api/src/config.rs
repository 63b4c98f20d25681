//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Origin used when formatting shareable session links.
    pub public_origin: String,
    pub openai_api_key: Option<String>,
    /// Model id forwarded to the analysis provider when the client does not
    /// pick one.
    pub analysis_model: String,
    /// Character budget per page for the plain-text document renderer.
    pub page_char_limit: usize,
    /// Artificial latency for the canned analysis backend, in milliseconds.
    pub analysis_delay_ms: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let public_origin = std::env::var("PUBLIC_ORIGIN")
            .unwrap_or_else(|_| format!("http://{}", bind_address));

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        let analysis_model =
            std::env::var("ANALYSIS_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        let page_char_limit = match std::env::var("PAGE_CHAR_LIMIT") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| {
                ConfigError::InvalidValue(
                    "PAGE_CHAR_LIMIT".to_string(),
                    format!("'{}' is not a valid page size", raw),
                )
            })?,
            Err(_) => 3000,
        };

        let analysis_delay_ms = match std::env::var("ANALYSIS_DELAY_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "ANALYSIS_DELAY_MS".to_string(),
                    format!("'{}' is not a valid delay", raw),
                )
            })?,
            Err(_) => 0,
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            public_origin,
            openai_api_key,
            analysis_model,
            page_char_limit,
            analysis_delay_ms,
        })
    }
}
