//! Runtime configuration.
//!
//! Values are resolved from explicit overrides first, then environment
//! variables (optionally loaded from a `.env` file), then defaults.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::engine::{DEFAULT_BASE_URL, EngineError, WolframClient, WolframClientBuilder};

pub const APP_ID_VAR: &str = "WOLFRAM_APP_ID";
pub const BASE_URL_VAR: &str = "WOLFRAM_API_URL";
pub const FORMATS_VAR: &str = "WOLFRAM_FORMATS";
pub const TIMEOUT_VAR: &str = "WOLFRAM_TIMEOUT_SECS";
pub const CLEAR_ON_SUBMIT_VAR: &str = "VOICEASSIST_CLEAR_ON_SUBMIT";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    /// The `.env` file could not be read or parsed
    #[error("Failed to load env file: {0}")]
    EnvFile(#[source] dotenvy::Error),
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    app_id: Option<String>,
    base_url: String,
    formats: Vec<String>,
    timeout: Duration,
    clear_on_submit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            formats: vec!["plaintext".to_string()],
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            clear_on_submit: true,
        }
    }
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the timeout or the
    /// clear-on-submit flag cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let app_id = read_var(APP_ID_VAR);
        let base_url = read_var(BASE_URL_VAR).unwrap_or(defaults.base_url);

        let formats = read_var(FORMATS_VAR)
            .map(|raw| parse_formats(&raw))
            .filter(|formats| !formats.is_empty())
            .unwrap_or(defaults.formats);

        let timeout = match read_var(TIMEOUT_VAR) {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue {
                    var: TIMEOUT_VAR,
                    value: raw.clone(),
                }
            })?),
            None => defaults.timeout,
        };

        let clear_on_submit = match read_var(CLEAR_ON_SUBMIT_VAR) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                var: CLEAR_ON_SUBMIT_VAR,
                value: raw.clone(),
            })?,
            None => defaults.clear_on_submit,
        };

        Ok(Self {
            app_id,
            base_url,
            formats,
            timeout,
            clear_on_submit,
        })
    }

    /// Loads variables from the given `.env` file, then resolves from the environment.
    ///
    /// Variables already set in the process take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvFile` if the file cannot be loaded, or any
    /// error from `from_env`.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        dotenvy::from_path(path).map_err(ConfigError::EnvFile)?;
        Self::from_env()
    }

    /// Overrides the app id when `app_id` is `Some`.
    pub fn with_app_id(mut self, app_id: Option<String>) -> Self {
        if let Some(id) = app_id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty()) {
            self.app_id = Some(id);
        }
        self
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether submitting a new question clears the result list first.
    pub fn clear_on_submit(&self) -> bool {
        self.clear_on_submit
    }

    /// Returns a client builder populated from this configuration.
    pub fn client_builder(&self) -> WolframClientBuilder {
        let mut builder = WolframClientBuilder::new()
            .base_url(self.base_url.clone())
            .timeout(self.timeout);
        if let Some(app_id) = &self.app_id {
            builder = builder.app_id(app_id.clone());
        }
        for format in &self.formats {
            builder = builder.format(format.clone());
        }
        builder
    }

    /// Builds the HTTP client for this configuration.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::MissingAppId` when no app id is configured, or any
    /// other builder error.
    pub fn build_client(&self) -> Result<WolframClient, EngineError> {
        self.client_builder().build()
    }
}

/// Reads a variable, treating unset and blank values alike.
fn read_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Splits a comma-separated format list, dropping empty items.
fn parse_formats(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
