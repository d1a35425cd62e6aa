/// Wolfram|Alpha HTTP client implementation.
///
/// This module provides `WolframClient` for making synchronous HTTP requests to the
/// Full Results API, along with error types and builder patterns for configuration.
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::wire::decode_query_result;
use crate::models::{Query, QueryResult};

/// Default API host used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.wolframalpha.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur while talking to the knowledge engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The response body was not a valid Full Results document
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No application identifier was configured
    #[error("Wolfram|Alpha app id is not set (use --app-id or WOLFRAM_APP_ID)")]
    MissingAppId,
}

impl EngineError {
    fn from_send(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Trait for knowledge engine operations.
///
/// The query pipeline only depends on this trait, so tests can swap in a
/// scripted engine instead of the HTTP client.
pub trait KnowledgeEngine: Send + Sync {
    /// Sends one query to the engine and returns its result.
    ///
    /// A returned `Ok` only means the transport succeeded; the result still
    /// carries the engine's own error and success flags.
    fn perform_query(&self, query: &Query) -> Result<QueryResult, EngineError>;
}

/// Builder for constructing `WolframClient` instances.
///
/// # Examples
///
/// ```
/// use voiceassist::WolframClientBuilder;
///
/// let client = WolframClientBuilder::new()
///     .app_id("DEMO-APPID")
///     .base_url("https://api.wolframalpha.com")
///     .build()
///     .expect("Failed to create client");
///
/// assert_eq!(client.formats(), ["plaintext"]);
/// ```
#[derive(Debug, Default)]
pub struct WolframClientBuilder {
    app_id: Option<String>,
    base_url: Option<String>,
    formats: Vec<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl WolframClientBuilder {
    /// Creates a new `WolframClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application identifier issued by the Wolfram|Alpha developer portal.
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Sets the API host, e.g. "https://api.wolframalpha.com".
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Adds an output format to request (e.g. "plaintext", "image").
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.formats.push(format.into());
        self
    }

    /// Sets the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builds the `WolframClient` with the configured settings.
    ///
    /// If no format was added, only "plaintext" is requested. If no base URL
    /// was set, `DEFAULT_BASE_URL` is used.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::MissingAppId` if the app id is missing or blank,
    /// `EngineError::InvalidUrl` if the base URL does not parse, or
    /// `EngineError::Network` if the HTTP client cannot be created.
    pub fn build(self) -> Result<WolframClient, EngineError> {
        let app_id = self
            .app_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(EngineError::MissingAppId)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| EngineError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let formats = if self.formats.is_empty() {
            vec!["plaintext".to_string()]
        } else {
            self.formats
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .connect_timeout(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
            .build()
            .map_err(EngineError::Network)?;

        Ok(WolframClient {
            client,
            app_id,
            base_url,
            formats,
        })
    }
}

/// Synchronous HTTP client for the Wolfram|Alpha Full Results API.
///
/// Each call to `perform_query` issues exactly one request; nothing is retried.
pub struct WolframClient {
    client: reqwest::blocking::Client,
    app_id: String,
    base_url: String,
    formats: Vec<String>,
}

impl WolframClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the requested output formats.
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Returns the query endpoint URL.
    pub fn query_url(&self) -> String {
        format!("{}/v2/query", self.base_url)
    }
}

impl KnowledgeEngine for WolframClient {
    fn perform_query(&self, query: &Query) -> Result<QueryResult, EngineError> {
        let url = self.query_url();
        let formats = self.formats.join(",");
        debug!(input = query.input(), formats = %formats, "sending query");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("appid", self.app_id.as_str()),
                ("input", query.input()),
                ("format", formats.as_str()),
                ("output", "json"),
            ])
            .send()
            .map_err(EngineError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(EngineError::from_send)?;
        let result = decode_query_result(&body).map_err(EngineError::Serialization)?;

        debug!(
            success = result.is_success,
            error = result.is_error,
            pods = result.pods.len(),
            timing = ?result.timing,
            data_types = ?result.data_types,
            "query answered"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn network_error_variant_creation_and_display() {
        let client = reqwest::blocking::Client::new();
        let reqwest_error = client.get("not-a-valid-url").build().unwrap_err();
        let engine_error = EngineError::Network(reqwest_error);

        let error_msg = format!("{}", engine_error);
        assert!(error_msg.contains("Network error"));
        assert!(engine_error.source().is_some());
    }

    #[test]
    fn timeout_error_displays_plain_message() {
        let client = reqwest::blocking::Client::new();
        let reqwest_error = client.get("http://").build().unwrap_err();
        let engine_error = EngineError::Timeout(reqwest_error);

        assert_eq!(format!("{}", engine_error), "Request timed out");
    }

    #[test]
    fn http_error_variant_with_status_code() {
        let error_msg = format!("{}", EngineError::Http { status: 403 });
        assert!(error_msg.contains("HTTP error"));
        assert!(error_msg.contains("403"));
    }

    #[test]
    fn serialization_error_variant_wraps_serde_errors() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let engine_error = EngineError::Serialization(json_error);

        assert!(format!("{}", engine_error).contains("Serialization error"));
        assert!(engine_error.source().is_some());
    }

    #[test]
    fn builder_new_creates_builder_with_defaults() {
        let builder = WolframClientBuilder::new();
        assert!(builder.app_id.is_none());
        assert!(builder.base_url.is_none());
        assert!(builder.formats.is_empty());
    }

    #[test]
    fn build_requires_app_id() {
        let result = WolframClientBuilder::new().build();
        assert!(matches!(result, Err(EngineError::MissingAppId)));

        let result = WolframClientBuilder::new().app_id("   ").build();
        assert!(matches!(result, Err(EngineError::MissingAppId)));
    }

    #[test]
    fn build_uses_default_url_and_format() {
        let client = WolframClientBuilder::new().app_id("APPID").build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.formats(), ["plaintext"]);
        assert_eq!(client.query_url(), "https://api.wolframalpha.com/v2/query");
    }

    #[test]
    fn build_trims_trailing_slash_from_base_url() {
        let client = WolframClientBuilder::new()
            .app_id("APPID")
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(client.query_url(), "http://localhost:8080/v2/query");
    }

    #[test]
    fn build_keeps_requested_formats_in_order() {
        let client = WolframClientBuilder::new()
            .app_id("APPID")
            .format("plaintext")
            .format("image")
            .build()
            .unwrap();
        assert_eq!(client.formats(), ["plaintext", "image"]);
    }

    #[test]
    fn build_returns_error_if_invalid_url_provided() {
        let result = WolframClientBuilder::new()
            .app_id("APPID")
            .base_url("not-a-valid-url")
            .build();
        assert!(matches!(result, Err(EngineError::InvalidUrl(_))));
    }

    #[test]
    fn trait_can_be_implemented_by_mock_struct() {
        struct MockEngine;

        impl KnowledgeEngine for MockEngine {
            fn perform_query(&self, _query: &Query) -> Result<QueryResult, EngineError> {
                Ok(QueryResult::not_understood())
            }
        }

        let engine: &dyn KnowledgeEngine = &MockEngine;
        let result = engine.perform_query(&Query::new("hello")).unwrap();
        assert!(!result.is_success);
    }

    #[test]
    fn unreachable_host_yields_transport_error() {
        let client = WolframClientBuilder::new()
            .app_id("APPID")
            .base_url("http://127.0.0.1:9")
            .connect_timeout(Duration::from_millis(500))
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let error = client.perform_query(&Query::new("pi")).unwrap_err();
        assert!(
            matches!(error, EngineError::Network(_) | EngineError::Timeout(_)),
            "expected network/timeout error, got: {error}"
        );
    }
}
