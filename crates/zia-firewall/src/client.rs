//! Asynchronous firewall filtering rule client.

use crate::models::{FilteringRule, FilteringRuleListParams};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;
use zia_core::auth::CredentialSource;
use zia_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use zia_core::ids::RuleId;
use zia_core::transport::Transport;
use zia_core::{ConflictRetryPolicy, QueryParams, ZiaClientConfig};

const USER_AGENT: &str = concat!("zia-firewall/", env!("CARGO_PKG_VERSION"));

const RULES_ENDPOINT: &str = "firewallFilteringRules";

/// Builder for [`FirewallClient`].
#[derive(Debug, Clone)]
pub struct FirewallClientBuilder {
    inner: ServiceClientBuilder,
}

impl FirewallClientBuilder {
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

    /// Set the page size used when listing rules.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.inner = self.inner.with_page_size(page_size);
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
    pub fn build(self) -> Result<FirewallClient> {
        let inner = self.inner.build()?;
        Ok(FirewallClient { inner })
    }
}

/// Asynchronous firewall filtering rule client.
#[derive(Debug, Clone)]
pub struct FirewallClient {
    inner: ServiceClient,
}

impl FirewallClient {
    /// Construct a client directly from the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be built.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        FirewallClientBuilder::new(base_url)?.build()
    }

    /// Start a builder for the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn builder(base_url: impl AsRef<str>) -> Result<FirewallClientBuilder> {
        FirewallClientBuilder::new(base_url)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List every filtering rule, across all pages.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error.
    pub async fn list_rules(&self, params: &FilteringRuleListParams) -> Result<Vec<FilteringRule>> {
        self.inner.fetch_all(RULES_ENDPOINT, &params.to_query()).await
    }

    /// Fetch a single filtering rule.
    ///
    /// # Errors
    ///
    /// Returns [`zia_core::Error::NotFound`] if the rule does not exist.
    pub async fn get_rule(&self, id: RuleId) -> Result<FilteringRule> {
        let path = format!("{RULES_ENDPOINT}/{id}");
        self.inner.read(&path, &QueryParams::new()).await
    }

    /// Find a filtering rule by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`zia_core::Error::NotFound`] if no rule has that name.
    pub async fn get_rule_by_name(&self, name: &str) -> Result<FilteringRule> {
        debug!(name, "looking up filtering rule by name");
        let params = FilteringRuleListParams {
            search: Some(name.to_string()),
        };
        self.inner
            .find_by_name(RULES_ENDPOINT, &params.to_query(), name, |rule: &FilteringRule| {
                Some(rule.name.as_str())
            })
            .await
    }

    /// Create a filtering rule.
    ///
    /// # Errors
    ///
    /// Returns the upstream error; edit-lock conflicts are retried first.
    pub async fn create_rule(&self, rule: &FilteringRule) -> Result<FilteringRule> {
        self.inner.create_with_retry(RULES_ENDPOINT, rule).await
    }

    /// Replace a filtering rule.
    ///
    /// # Errors
    ///
    /// Returns the upstream error; edit-lock conflicts are retried first.
    pub async fn update_rule(&self, id: RuleId, rule: &FilteringRule) -> Result<FilteringRule> {
        let path = format!("{RULES_ENDPOINT}/{id}");
        self.inner.update_with_retry(&path, rule).await
    }

    /// Delete a filtering rule.
    ///
    /// # Errors
    ///
    /// Returns the upstream error; edit-lock conflicts are retried first.
    pub async fn delete_rule(&self, id: RuleId) -> Result<()> {
        let path = format!("{RULES_ENDPOINT}/{id}");
        self.inner.delete_with_retry(&path).await
    }
}
