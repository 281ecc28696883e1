//! Asynchronous DLP client.

use crate::models::{DlpDictionary, DlpEngine};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use zia_core::auth::CredentialSource;
use zia_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use zia_core::ids::{DlpDictionaryId, DlpEngineId};
use zia_core::transport::Transport;
use zia_core::{ConflictRetryPolicy, QueryParams, ZiaClientConfig};

const USER_AGENT: &str = concat!("zia-dlp/", env!("CARGO_PKG_VERSION"));

const ENGINES_ENDPOINT: &str = "dlpEngines";
const DICTIONARIES_ENDPOINT: &str = "dlpDictionaries";

/// Builder for [`DlpClient`].
#[derive(Debug, Clone)]
pub struct DlpClientBuilder {
    inner: ServiceClientBuilder,
}

impl DlpClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(base_url)?.with_user_agent(USER_AGENT);
        Ok(Self { inner: builder })
    }

    /// Create a builder from a shared client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &ZiaClientConfig) -> Result<Self> {
        let builder = ServiceClientBuilder::from_config(config)?.with_user_agent(USER_AGENT);
        Ok(Self { inner: builder })
    }

    /// Override the edit-lock retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: ConflictRetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.with_timeout(timeout);
        self
    }

    /// Attach a credential source.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.inner = self.inner.with_credentials(credentials);
        self
    }

    /// Attach a fixed bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Replace the HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.inner = self.inner.with_transport(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<DlpClient> {
        let inner = self.inner.build()?;
        Ok(DlpClient { inner })
    }
}

/// Asynchronous DLP client.
///
/// Every call returns [`zia_core::Error`] on failure; mutations retry
/// edit-lock conflicts under the configured policy first.
#[derive(Debug, Clone)]
pub struct DlpClient {
    inner: ServiceClient,
}

#[allow(clippy::missing_errors_doc)]
impl DlpClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        DlpClientBuilder::new(base_url)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List every DLP engine.
    pub async fn list_engines(&self) -> Result<Vec<DlpEngine>> {
        self.inner
            .fetch_all(ENGINES_ENDPOINT, &QueryParams::new())
            .await
    }

    /// Fetch one DLP engine.
    pub async fn get_engine(&self, id: DlpEngineId) -> Result<DlpEngine> {
        let path = format!("{ENGINES_ENDPOINT}/{id}");
        self.inner.read(&path, &QueryParams::new()).await
    }

    /// Find a DLP engine by name (or predefined engine name), ignoring case.
    pub async fn get_engine_by_name(&self, name: &str) -> Result<DlpEngine> {
        let engines = self.list_engines().await?;
        engines
            .into_iter()
            .find(|engine| {
                engine.name.eq_ignore_ascii_case(name)
                    || engine
                        .predefined_engine_name
                        .as_deref()
                        .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| {
                zia_core::Error::NotFound(zia_core::error::ApiError {
                    status: 404,
                    code: None,
                    message: format!("no DLP engine named `{name}`"),
                })
            })
    }

    /// Create a DLP engine.
    pub async fn create_engine(&self, engine: &DlpEngine) -> Result<DlpEngine> {
        self.inner.create_with_retry(ENGINES_ENDPOINT, engine).await
    }

    /// Replace a DLP engine.
    pub async fn update_engine(&self, id: DlpEngineId, engine: &DlpEngine) -> Result<DlpEngine> {
        let path = format!("{ENGINES_ENDPOINT}/{id}");
        self.inner.update_with_retry(&path, engine).await
    }

    /// Delete a DLP engine.
    pub async fn delete_engine(&self, id: DlpEngineId) -> Result<()> {
        let path = format!("{ENGINES_ENDPOINT}/{id}");
        self.inner.delete_with_retry(&path).await
    }

    /// List every DLP dictionary.
    pub async fn list_dictionaries(&self) -> Result<Vec<DlpDictionary>> {
        self.inner
            .fetch_all(DICTIONARIES_ENDPOINT, &QueryParams::new())
            .await
    }

    /// Fetch one DLP dictionary.
    pub async fn get_dictionary(&self, id: DlpDictionaryId) -> Result<DlpDictionary> {
        let path = format!("{DICTIONARIES_ENDPOINT}/{id}");
        self.inner.read(&path, &QueryParams::new()).await
    }

    /// Find a DLP dictionary by name, ignoring case.
    pub async fn get_dictionary_by_name(&self, name: &str) -> Result<DlpDictionary> {
        self.inner
            .find_by_name(
                DICTIONARIES_ENDPOINT,
                &QueryParams::new(),
                name,
                |dictionary: &DlpDictionary| Some(dictionary.name.as_str()),
            )
            .await
    }

    /// Create a DLP dictionary.
    pub async fn create_dictionary(&self, dictionary: &DlpDictionary) -> Result<DlpDictionary> {
        self.inner
            .create_with_retry(DICTIONARIES_ENDPOINT, dictionary)
            .await
    }

    /// Replace a DLP dictionary.
    pub async fn update_dictionary(
        &self,
        id: DlpDictionaryId,
        dictionary: &DlpDictionary,
    ) -> Result<DlpDictionary> {
        let path = format!("{DICTIONARIES_ENDPOINT}/{id}");
        self.inner.update_with_retry(&path, dictionary).await
    }

    /// Delete a DLP dictionary.
    pub async fn delete_dictionary(&self, id: DlpDictionaryId) -> Result<()> {
        let path = format!("{DICTIONARIES_ENDPOINT}/{id}");
        self.inner.delete_with_retry(&path).await
    }
}
