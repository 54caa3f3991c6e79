//! Relay transport.
//!
//! Posts a normalized submission to the relay endpoint and hands the reply
//! back to the controller, which decides what it means for the form.

use async_trait::async_trait;
use portfolio_core::{ContactRequest, RelayResponse};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;

/// Errors that can occur while talking to the relay.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay answered with a body that is not a relay response.
    #[error("Unreadable relay response (status {status})")]
    UnreadableBody { status: u16 },

    /// Relay key cannot be used as a header value.
    #[error("Invalid relay key: {0}")]
    InvalidKey(String),
}

/// Reply received from the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub status: StatusCode,
    pub body: RelayResponse,
}

impl RelayReply {
    /// Whether the relay reports the email as sent.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.status.is_success() && self.body.success
    }
}

/// Transport used by the submission controller.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait RelayTransport: Send + Sync + 'static {
    /// Submit one request to the relay.
    ///
    /// Any HTTP status with a readable body is a reply, not an error.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the relay cannot be reached or its body
    /// cannot be read.
    async fn submit(&self, request: &ContactRequest) -> Result<RelayReply, TransportError>;
}

/// Relay transport over HTTP.
#[derive(Clone)]
pub struct HttpRelayTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpRelayTransport {
    /// Create a transport for the configured relay.
    ///
    /// # Errors
    ///
    /// Returns error if the relay key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = &config.relay_key {
            let key = key.expose_secret();
            let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| TransportError::InvalidKey(e.to_string()))?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);

            let mut apikey =
                HeaderValue::from_str(key).map_err(|e| TransportError::InvalidKey(e.to_string()))?;
            apikey.set_sensitive(true);
            headers.insert("apikey", apikey);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: config.relay_url.clone(),
        })
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn submit(&self, request: &ContactRequest) -> Result<RelayReply, TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let body = serde_json::from_slice::<RelayResponse>(&bytes).map_err(|e| {
            tracing::warn!(status = status.as_u16(), error = %e, "Unreadable relay response");
            TransportError::UnreadableBody {
                status: status.as_u16(),
            }
        })?;

        Ok(RelayReply { status, body })
    }
}
