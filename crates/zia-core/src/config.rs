//! Configuration structures for ZIA clients.
//!
//! [`ZiaClientConfig`] is the serializable, validated form of everything a
//! [`crate::ServiceClient`] needs besides credentials: where the API lives,
//! TLS and timeout settings, the page size, and the conflict retry policy.

use crate::client::ClientConfig;
use crate::pagination::{Paginator, DEFAULT_PAGE_SIZE};
use crate::retry::{ConflictRetryPolicy, DEFAULT_CONFLICT_INTERVAL_MS, DEFAULT_CONFLICT_MAX_ATTEMPTS};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for a ZIA client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ZiaClientConfig {
    /// API base URL (e.g. `https://zsapi.zscaler.net/api/v1`)
    #[validate(url)]
    pub base_url: String,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Items requested per page by paginated lists
    #[validate(range(min = 1, max = 10000))]
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Optional cap on pages fetched by a single list call
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,

    /// Edit-lock retry settings
    #[validate(nested)]
    #[serde(default)]
    pub conflict_retry: ConflictRetryConfig,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl ZiaClientConfig {
    /// Create a new client configuration with required parameters.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The API base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            ..Self::default()
        };

        config.check()?;
        Ok(config)
    }

    /// Validate, mapping failures to [`Error::ConfigError`].
    ///
    /// # Errors
    ///
    /// Returns an error describing every field that failed validation.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Cap the number of pages per list call.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Set the edit-lock retry settings.
    #[must_use]
    pub const fn with_conflict_retry(mut self, retry: ConflictRetryConfig) -> Self {
        self.conflict_retry = retry;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))
    }

    /// HTTP transport settings derived from this configuration.
    #[must_use]
    pub fn http_config(&self) -> ClientConfig {
        let config = ClientConfig::new()
            .with_timeout(self.timeout())
            .with_tls_verify(self.tls_verify);
        match &self.tls_ca_cert {
            Some(path) => config.with_ca_cert(path.clone()),
            None => config,
        }
    }

    /// Pagination settings derived from this configuration.
    #[must_use]
    pub const fn paginator(&self) -> Paginator {
        let paginator = Paginator::new().with_page_size(self.page_size);
        match self.max_pages {
            Some(max_pages) => paginator.with_max_pages(max_pages),
            None => paginator,
        }
    }

    /// Conflict retry policy derived from this configuration.
    #[must_use]
    pub const fn retry_policy(&self) -> ConflictRetryPolicy {
        self.conflict_retry.policy()
    }
}

impl Default for ZiaClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
            max_pages: None,
            conflict_retry: ConflictRetryConfig::default(),
        }
    }
}

/// Serializable form of [`ConflictRetryPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ConflictRetryConfig {
    /// Maximum attempts, including the first
    #[validate(range(min = 1, max = 20))]
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts in milliseconds
    #[validate(range(max = 60000))]
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

const fn default_max_attempts() -> u32 {
    DEFAULT_CONFLICT_MAX_ATTEMPTS
}

const fn default_interval_ms() -> u64 {
    DEFAULT_CONFLICT_INTERVAL_MS
}

impl ConflictRetryConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }

    /// Set maximum attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the pause in milliseconds.
    #[must_use]
    pub const fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Get the pause as a Duration.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Build the runtime policy.
    #[must_use]
    pub const fn policy(&self) -> ConflictRetryPolicy {
        ConflictRetryPolicy::new()
            .with_max_attempts(self.max_attempts)
            .with_interval(self.interval())
    }
}

impl Default for ConflictRetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_new() {
        let config = ZiaClientConfig::new("https://zsapi.example.net/api/v1").unwrap();
        assert_eq!(config.base_url, "https://zsapi.example.net/api/v1");
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.max_pages, None);
        assert_eq!(config.conflict_retry.max_attempts, 5);
        assert_eq!(config.conflict_retry.interval_ms, 1000);
    }

    #[test]
    fn test_client_config_invalid_url() {
        let result = ZiaClientConfig::new("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ZiaClientConfig::new("https://zsapi.example.net/api/v1")
            .unwrap()
            .with_tls_verify(false)
            .with_timeout(60)
            .with_page_size(500)
            .with_max_pages(20)
            .with_conflict_retry(ConflictRetryConfig::new().with_max_attempts(3));

        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.paginator().page_size(), 500);
        assert_eq!(config.paginator().max_pages(), Some(20));
        assert_eq!(config.retry_policy().max_attempts, 3);
        assert_eq!(config.retry_policy().interval, Duration::from_secs(1));
    }

    #[test]
    fn test_http_config_carries_tls_and_timeout() {
        let config = ZiaClientConfig::default()
            .with_timeout(45)
            .with_tls_verify(false)
            .with_ca_cert("/etc/zia/ca.pem".into());
        let http = config.http_config();
        assert_eq!(http.timeout, Duration::from_secs(45));
        assert!(!http.tls_verify);
        assert_eq!(
            http.tls_ca_cert.as_deref(),
            Some(std::path::Path::new("/etc/zia/ca.pem"))
        );
    }

    #[test]
    fn test_parse_base_url() {
        let config = ZiaClientConfig::new("https://zsapi.example.net:8443/api/v1").unwrap();
        let url = config.parse_base_url().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("zsapi.example.net"));
        assert_eq!(url.port(), Some(8443));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: ZiaClientConfig =
            serde_json::from_str(r#"{"base_url":"https://zsapi.example.net/api/v1"}"#).unwrap();
        assert!(config.tls_verify);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.conflict_retry, ConflictRetryConfig::default());
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_config_serialization_roundtrip_fields() {
        let config = ZiaClientConfig::new("https://zsapi.example.net/api/v1")
            .unwrap()
            .with_page_size(250);

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("max_pages"));
        let deserialized: ZiaClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.base_url, deserialized.base_url);
        assert_eq!(deserialized.page_size, 250);
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = ZiaClientConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_page_size_range() {
        let mut config = ZiaClientConfig::default();
        config.page_size = 0;
        assert!(config.validate().is_err());

        config.page_size = 10_001;
        assert!(config.validate().is_err());

        config.page_size = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_nested_retry() {
        let config = ZiaClientConfig::default()
            .with_conflict_retry(ConflictRetryConfig::new().with_max_attempts(0));
        assert!(config.check().is_err());

        let config = ZiaClientConfig::default()
            .with_conflict_retry(ConflictRetryConfig::new().with_interval_ms(120_000));
        assert!(config.check().is_err());
    }
}
