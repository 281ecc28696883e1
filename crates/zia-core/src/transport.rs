//! The request/response seam under the dispatcher.
//!
//! A [`Transport`] issues exactly one HTTP exchange and hands back the status
//! and raw body. It does not classify statuses, decode bodies, or retry; that
//! all happens in [`crate::client::ServiceClient`].

use crate::client::ClientConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// One outgoing request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Endpoint path relative to the base URL
    pub path: String,
    /// Flattened query pairs
    pub query: Vec<(&'static str, String)>,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
    /// Bearer credential, if any
    pub bearer: Option<SecretString>,
}

impl TransportRequest {
    /// Create a request with no query, body or credential.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Raw response body
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Build a response from a status and body.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as (lossy) UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Issue one request and return its status and body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the exchange.
    ///
    /// # Errors
    ///
    /// Returns an error only when no status was received (timeout, connection
    /// failure, invalid path). Non-success statuses are returned as responses.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build the underlying HTTP client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the CA certificate cannot be loaded or the client
    /// cannot be built.
    pub fn new(base_url: Url, user_agent: &str, config: &ClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(config.timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(10));

        if !config.enable_compression {
            builder = builder.no_gzip();
        }

        if !config.tls_verify {
            warn!("TLS verification disabled for ZIA client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &config.tls_ca_cert {
            debug!("loading CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http, base_url })
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        join_path(&self.base_url, path)
    }
}

/// Join an endpoint path onto a base URL, keeping the base URL's own path.
///
/// # Errors
///
/// Returns [`Error::InvalidEndpoint`] if the result is not a valid URL.
pub fn join_path(base_url: &Url, path: &str) -> Result<Url> {
    let normalized = path.trim_start_matches('/');
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(normalized)
        .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let url = self.build_url(&request.path)?;
        let mut builder = self
            .http
            .request(request.method, url)
            .query(&request.query)
            .header("Accept", "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(Error::from)?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| Error::Http(format!("Failed to read response body: {err}")))?;

        Ok(TransportResponse {
            status,
            body: bytes.to_vec(),
        })
    }
}
