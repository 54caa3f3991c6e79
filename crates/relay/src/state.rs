//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::{EmailProvider, ResendClient, ResendError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the configuration and the email
/// provider; the provider is a trait object so tests can substitute it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RelayConfig,
    mailer: Arc<dyn EmailProvider>,
}

impl AppState {
    /// Create state around an arbitrary email provider.
    #[must_use]
    pub fn new(config: RelayConfig, mailer: Arc<dyn EmailProvider>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, mailer }),
        }
    }

    /// Create state backed by the Resend HTTP API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_resend(config: RelayConfig) -> Result<Self, ResendError> {
        let client = ResendClient::new(config.resend.api_url.clone())?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Get a reference to the relay configuration.
    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.inner.config
    }

    /// Get the email provider.
    #[must_use]
    pub fn mailer(&self) -> &dyn EmailProvider {
        self.inner.mailer.as_ref()
    }
}
