//! Credential sources.
//!
//! The dispatcher asks a single [`CredentialSource`] for a bearer token before
//! every request. Freshness is decided here, in one place, and the cached
//! token is the only shared mutable state in the runtime.

use crate::error::{Error, Result};
use crate::token::is_expired;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Supplies the bearer token attached to outgoing requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Return a token that is usable right now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`] if no usable token can be produced.
    async fn current_token(&self) -> Result<SecretString>;
}

/// Obtains a brand new token (the login call).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Authenticate and return a fresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails.
    async fn fetch_token(&self) -> Result<SecretString>;
}

/// A fixed token that is never refreshed.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    /// Wrap a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

#[async_trait]
impl CredentialSource for StaticToken {
    async fn current_token(&self) -> Result<SecretString> {
        Ok(self.token.clone())
    }
}

/// Caches the provider's token and refreshes it once it is (nearly) expired.
pub struct CachedTokenSource<P> {
    provider: P,
    slot: Mutex<Option<SecretString>>,
}

impl<P: TokenProvider> CachedTokenSource<P> {
    /// Create an empty cache in front of `provider`.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            slot: Mutex::new(None),
        }
    }

    /// Seed the cache with an existing token.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(SecretString::from(token.into()))),
            ..self
        }
    }

    /// Drop the cached token so the next call logs in again.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

#[async_trait]
impl<P: TokenProvider> CredentialSource for CachedTokenSource<P> {
    async fn current_token(&self) -> Result<SecretString> {
        // Held across the refresh so concurrent callers share one login.
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref() {
            if !is_expired(token.expose_secret()) {
                debug!("reusing cached bearer token");
                return Ok(token.clone());
            }
        }

        info!("bearer token missing or expired, requesting a new one");
        let token = self
            .provider
            .fetch_token()
            .await
            .map_err(|err| match err {
                Error::Credential(_) => err,
                other => Error::Credential(other.to_string()),
            })?;

        *slot = Some(token.clone());
        Ok(token)
    }
}
