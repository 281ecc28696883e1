//! Typed request dispatcher and HTTP client settings.
//!
//! [`ServiceClient`] issues exactly one round trip per CRUD call, classifies
//! failures into [`Error`] variants and decodes successful bodies into the
//! caller's type. Pagination and conflict retry are layered on top of it and
//! never happen inside a single dispatch.

use crate::auth::{CredentialSource, StaticToken};
use crate::config::ZiaClientConfig;
use crate::error::{map_status_to_error, ApiError, Error, Result};
use crate::pagination::{Paginator, PAGE_KEY, PAGE_SIZE_KEY};
use crate::query::QueryParams;
use crate::retry::{retry_on_conflict, ConflictRetryPolicy};
use crate::transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// User agent sent when a service crate does not set its own.
pub const DEFAULT_USER_AGENT: &str = concat!("zia-core/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
///
/// Controls the transport only: timeouts, pooling, compression and TLS.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,

    /// Verify TLS certificates
    pub tls_verify: bool,

    /// Extra root certificate (PEM)
    pub tls_ca_cert: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
            tls_verify: true,
            tls_ca_cert: None,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Clone)]
pub struct ServiceClientBuilder {
    base_url: Url,
    user_agent: String,
    http_config: ClientConfig,
    retry_policy: ConflictRetryPolicy,
    paginator: Paginator,
    credentials: Option<Arc<dyn CredentialSource>>,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for ServiceClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClientBuilder")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .field("http_config", &self.http_config)
            .field("retry_policy", &self.retry_policy)
            .field("paginator", &self.paginator)
            .field("credentials", &self.credentials.is_some())
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl ServiceClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!("Invalid base URL `{}`: {err}", base_url.as_ref()))
        })?;

        Ok(Self {
            base_url: url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_config: ClientConfig::new(),
            retry_policy: ConflictRetryPolicy::new(),
            paginator: Paginator::new(),
            credentials: None,
            transport: None,
        })
    }

    /// Create a builder from a validated [`ZiaClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: &ZiaClientConfig) -> Result<Self> {
        config.check()?;
        let builder = Self::new(&config.base_url)?
            .with_http_config(config.http_config())
            .with_retry_policy(config.retry_policy())
            .with_paginator(config.paginator());
        Ok(builder)
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_config = self.http_config.with_timeout(timeout);
        self
    }

    /// Override the conflict retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: ConflictRetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Override the pagination settings.
    #[must_use]
    pub const fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    /// Set the page size used by [`ServiceClient::fetch_all`].
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.paginator = self.paginator.with_page_size(page_size);
        self
    }

    /// Attach a credential source consulted before every request.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Attach a fixed bearer token.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_credentials(Arc::new(StaticToken::new(token)))
    }

    /// Replace the HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(
                self.base_url.clone(),
                &self.user_agent,
                &self.http_config,
            )?),
        };

        Ok(ServiceClient {
            transport,
            base_url: self.base_url,
            credentials: self.credentials,
            retry_policy: self.retry_policy,
            paginator: self.paginator,
        })
    }
}

/// Dispatcher shared by every resource client.
#[derive(Clone)]
pub struct ServiceClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    credentials: Option<Arc<dyn CredentialSource>>,
    retry_policy: ConflictRetryPolicy,
    paginator: Paginator,
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry_policy", &self.retry_policy)
            .field("paginator", &self.paginator)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Construct a client directly from the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be built.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        ServiceClientBuilder::new(base_url)?.build()
    }

    /// Start a builder for the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn builder(base_url: impl AsRef<str>) -> Result<ServiceClientBuilder> {
        ServiceClientBuilder::new(base_url)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Conflict retry policy used by the `*_with_retry` calls.
    #[must_use]
    pub const fn retry_policy(&self) -> &ConflictRetryPolicy {
        &self.retry_policy
    }

    /// Pagination settings used by [`fetch_all`](Self::fetch_all).
    #[must_use]
    pub const fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Read one resource (or one page) from `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a status error for non-success responses and
    /// [`Error::Decode`] if the body does not match `T`.
    pub async fn read<T>(&self, endpoint: &str, query: &QueryParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.dispatch(Method::GET, endpoint, query.pairs().to_vec(), None)
            .await
    }

    /// Create a resource.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub async fn create<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let payload = encode_body(endpoint, body)?;
        self.dispatch(Method::POST, endpoint, Vec::new(), Some(payload))
            .await
    }

    /// Replace a resource with the complete state in `body`.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub async fn update_replace<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let payload = encode_body(endpoint, body)?;
        self.dispatch(Method::PUT, endpoint, Vec::new(), Some(payload))
            .await
    }

    /// Delete a resource.
    ///
    /// Any success response counts; its body is ignored.
    ///
    /// # Errors
    ///
    /// Returns a status error for non-success responses.
    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        self.send_checked(Method::DELETE, endpoint, Vec::new(), None)
            .await
            .map(|_| ())
    }

    /// Read every page of a list endpoint into one collection.
    ///
    /// `filters` must not carry `page` or `pageSize`; the paginator owns them.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error; partial results are discarded.
    pub async fn fetch_all<T>(&self, endpoint: &str, filters: &QueryParams) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        if filters.contains_key(PAGE_KEY) || filters.contains_key(PAGE_SIZE_KEY) {
            return Err(Error::InvalidRequest(format!(
                "filters for `{endpoint}` must not set `{PAGE_KEY}` or `{PAGE_SIZE_KEY}`"
            )));
        }

        self.paginator
            .collect(endpoint, |page| {
                let query = page.apply(filters);
                async move { self.read::<Vec<T>>(endpoint, &query).await }
            })
            .await
    }

    /// List `endpoint` and return the first item whose name equals `name`,
    /// ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when nothing matches, or any error from
    /// [`fetch_all`](Self::fetch_all).
    pub async fn find_by_name<T, F>(
        &self,
        endpoint: &str,
        filters: &QueryParams,
        name: &str,
        name_of: F,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> Option<&str>,
    {
        let items: Vec<T> = self.fetch_all(endpoint, filters).await?;
        items
            .into_iter()
            .find(|item| name_of(item).is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .ok_or_else(|| {
                Error::NotFound(ApiError {
                    status: StatusCode::NOT_FOUND.as_u16(),
                    code: None,
                    message: format!("no item named `{name}` under `{endpoint}`"),
                })
            })
    }

    /// [`create`](Self::create) wrapped in the conflict retry policy.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or the first
    /// non-conflict error.
    pub async fn create_with_retry<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        retry_on_conflict(&self.retry_policy, || self.create(endpoint, body)).await
    }

    /// [`update_replace`](Self::update_replace) wrapped in the conflict retry policy.
    ///
    /// # Errors
    ///
    /// See [`create_with_retry`](Self::create_with_retry).
    pub async fn update_with_retry<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        retry_on_conflict(&self.retry_policy, || self.update_replace(endpoint, body)).await
    }

    /// [`delete`](Self::delete) wrapped in the conflict retry policy.
    ///
    /// # Errors
    ///
    /// See [`create_with_retry`](Self::create_with_retry).
    pub async fn delete_with_retry(&self, endpoint: &str) -> Result<()> {
        retry_on_conflict(&self.retry_policy, || self.delete(endpoint)).await
    }

    async fn dispatch<T>(
        &self,
        method: Method,
        endpoint: &str,
        query: Vec<(&'static str, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send_checked(method, endpoint, query, body).await?;
        decode_body(endpoint, &response)
    }

    /// Send one request and classify a non-success status, without decoding.
    async fn send_checked(
        &self,
        method: Method,
        endpoint: &str,
        query: Vec<(&'static str, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<TransportResponse> {
        let bearer = match &self.credentials {
            Some(source) => Some(source.current_token().await?),
            None => None,
        };

        info!(%method, path = endpoint, ?query, "ZIA request");

        let request = TransportRequest {
            query,
            body,
            bearer,
            ..TransportRequest::new(method, endpoint)
        };
        let response = self.transport.send(request).await?;

        if !response.status.is_success() {
            let err = map_status_to_error(response.status, &response.text());
            if err.should_log() {
                warn!(status = %response.status, path = endpoint, error = %err, "ZIA request failed");
            } else {
                debug!(status = %response.status, path = endpoint, "ZIA request failed");
            }
            return Err(err);
        }

        Ok(response)
    }
}

fn encode_body<B>(endpoint: &str, body: &B) -> Result<serde_json::Value>
where
    B: Serialize + ?Sized,
{
    serde_json::to_value(body).map_err(|err| {
        Error::InvalidRequest(format!("Failed to encode request body for `{endpoint}`: {err}"))
    })
}

fn decode_body<T>(endpoint: &str, response: &TransportResponse) -> Result<T>
where
    T: DeserializeOwned,
{
    if response.status == StatusCode::NO_CONTENT || response.body.is_empty() {
        serde_json::from_value(serde_json::Value::Null).map_err(|err| {
            Error::Decode(format!("Failed to parse empty response for `{endpoint}`: {err}"))
        })
    } else {
        serde_json::from_slice(&response.body).map_err(|err| {
            Error::Decode(format!("Failed to parse response for `{endpoint}`: {err}"))
        })
    }
}
