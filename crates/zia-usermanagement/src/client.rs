//! Asynchronous user management client.

use crate::models::{Department, Group, NameSearchParams, User, UserListParams};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;
use zia_core::auth::CredentialSource;
use zia_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use zia_core::ids::{DepartmentId, GroupId, UserId};
use zia_core::transport::Transport;
use zia_core::{ConflictRetryPolicy, QueryParams, ZiaClientConfig};

const USER_AGENT: &str = concat!("zia-usermanagement/", env!("CARGO_PKG_VERSION"));

const DEPARTMENTS_ENDPOINT: &str = "departments";
const GROUPS_ENDPOINT: &str = "groups";
const USERS_ENDPOINT: &str = "users";

/// Builder for [`UserManagementClient`].
#[derive(Debug, Clone)]
pub struct UserManagementClientBuilder {
    inner: ServiceClientBuilder,
}

impl UserManagementClientBuilder {
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

    /// Set the page size used by list calls.
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
    pub fn build(self) -> Result<UserManagementClient> {
        let inner = self.inner.build()?;
        Ok(UserManagementClient { inner })
    }
}

/// Asynchronous user management client.
#[derive(Debug, Clone)]
pub struct UserManagementClient {
    inner: ServiceClient,
}

impl UserManagementClient {
    /// Construct a client directly from the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be built.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        UserManagementClientBuilder::new(base_url)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    // Departments

    /// List departments.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error.
    pub async fn list_departments(&self, params: &NameSearchParams) -> Result<Vec<Department>> {
        self.inner
            .fetch_all(DEPARTMENTS_ENDPOINT, &params.to_query())
            .await
    }

    /// Fetch one department.
    ///
    /// # Errors
    ///
    /// Returns [`zia_core::Error::NotFound`] if it does not exist.
    pub async fn get_department(&self, id: DepartmentId) -> Result<Department> {
        let path = format!("{DEPARTMENTS_ENDPOINT}/{id}");
        self.inner.read(&path, &QueryParams::new()).await
    }

    /// Find a department by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`zia_core::Error::NotFound`] if nothing matches.
    pub async fn get_department_by_name(&self, name: &str) -> Result<Department> {
        debug!(name, "looking up department by name");
        self.inner
            .find_by_name(
                DEPARTMENTS_ENDPOINT,
                &NameSearchParams::search(name).to_query(),
                name,
                |dept: &Department| Some(dept.name.as_str()),
            )
            .await
    }

    // Groups

    /// List groups.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error.
    pub async fn list_groups(&self, params: &NameSearchParams) -> Result<Vec<Group>> {
        self.inner
            .fetch_all(GROUPS_ENDPOINT, &params.to_query())
            .await
    }

    /// Fetch one group.
    ///
    /// # Errors
    ///
    /// Returns [`zia_core::Error::NotFound`] if it does not exist.
    pub async fn get_group(&self, id: GroupId) -> Result<Group> {
        let path = format!("{GROUPS_ENDPOINT}/{id}");
        self.inner.read(&path, &QueryParams::new()).await
    }

    /// Find a group by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`zia_core::Error::NotFound`] if nothing matches.
    pub async fn get_group_by_name(&self, name: &str) -> Result<Group> {
        debug!(name, "looking up group by name");
        self.inner
            .find_by_name(
                GROUPS_ENDPOINT,
                &NameSearchParams::search(name).to_query(),
                name,
                |group: &Group| Some(group.name.as_str()),
            )
            .await
    }

    // Users

    /// List users matching the filters.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error.
    pub async fn list_users(&self, params: &UserListParams) -> Result<Vec<User>> {
        self.inner
            .fetch_all(USERS_ENDPOINT, &params.to_query())
            .await
    }

    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns [`zia_core::Error::NotFound`] if it does not exist.
    pub async fn get_user(&self, id: UserId) -> Result<User> {
        let path = format!("{USERS_ENDPOINT}/{id}");
        self.inner.read(&path, &QueryParams::new()).await
    }

    /// Find a user by display name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`zia_core::Error::NotFound`] if nothing matches.
    pub async fn get_user_by_name(&self, name: &str) -> Result<User> {
        let params = UserListParams {
            search: Some(name.to_string()),
            ..UserListParams::default()
        };
        self.inner
            .find_by_name(USERS_ENDPOINT, &params.to_query(), name, |user: &User| {
                Some(user.name.as_str())
            })
            .await
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns the upstream error; edit-lock conflicts are retried first.
    pub async fn create_user(&self, user: &User) -> Result<User> {
        self.inner.create_with_retry(USERS_ENDPOINT, user).await
    }

    /// Replace a user.
    ///
    /// # Errors
    ///
    /// Returns the upstream error; edit-lock conflicts are retried first.
    pub async fn update_user(&self, id: UserId, user: &User) -> Result<User> {
        let path = format!("{USERS_ENDPOINT}/{id}");
        self.inner.update_with_retry(&path, user).await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns the upstream error; edit-lock conflicts are retried first.
    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        let path = format!("{USERS_ENDPOINT}/{id}");
        self.inner.delete_with_retry(&path).await
    }
}
