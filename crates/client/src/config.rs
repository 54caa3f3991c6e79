//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PORTFOLIO_RELAY_URL` - Full URL of the relay endpoint
//!
//! ## Optional
//! - `PORTFOLIO_RELAY_KEY` - Key sent as `Authorization: Bearer` and `apikey`
//! - `PORTFOLIO_WHATSAPP_PHONE` - Number used for the post-success deep link
//!   (default: 5515997631368)
//! - `PORTFOLIO_DISPLAY_WINDOW_SECS` - Seconds a success/error status stays
//!   visible (default: 5)
//! - `PORTFOLIO_REQUEST_TIMEOUT_SECS` - Relay request timeout (default: none,
//!   the HTTP client's own behavior applies)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// WhatsApp number of the portfolio owner.
pub const DEFAULT_WHATSAPP_PHONE: &str = "5515997631368";

/// How long a success or error status is shown before reverting to idle.
pub const DEFAULT_DISPLAY_WINDOW: Duration = Duration::from_secs(5);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ClientConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Submission client configuration.
///
/// Implements `Debug` manually to redact the relay key.
#[derive(Clone)]
pub struct ClientConfig {
    /// Relay endpoint
    pub relay_url: Url,
    /// Optional relay key
    pub relay_key: Option<SecretString>,
    /// Deep link target
    pub whatsapp_phone: String,
    /// Status display window
    pub display_window: Duration,
    /// Relay request timeout, unset unless configured
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("relay_url", &self.relay_url.as_str())
            .field("relay_key", &self.relay_key.as_ref().map(|_| "[REDACTED]"))
            .field("whatsapp_phone", &self.whatsapp_phone)
            .field("display_window", &self.display_window)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration for `relay_url` with every other setting defaulted.
    #[must_use]
    pub fn new(relay_url: Url) -> Self {
        Self {
            relay_url,
            relay_key: None,
            whatsapp_phone: DEFAULT_WHATSAPP_PHONE.to_string(),
            display_window: DEFAULT_DISPLAY_WINDOW,
            request_timeout: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ClientConfigError` if the relay URL is missing or any
    /// variable is malformed.
    pub fn from_env() -> Result<Self, ClientConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("PORTFOLIO_RELAY_URL")
            .ok_or_else(|| ClientConfigError::MissingEnvVar("PORTFOLIO_RELAY_URL".to_string()))?;
        let relay_url = parse_relay_url(raw_url.trim())?;

        let mut config = Self::new(relay_url);
        config.relay_key = get("PORTFOLIO_RELAY_KEY").map(SecretString::from);

        if let Some(phone) = get("PORTFOLIO_WHATSAPP_PHONE") {
            if !phone.chars().any(|c| c.is_ascii_digit()) {
                return Err(ClientConfigError::InvalidEnvVar(
                    "PORTFOLIO_WHATSAPP_PHONE".to_string(),
                    "must contain digits".to_string(),
                ));
            }
            config.whatsapp_phone = phone;
        }
        if let Some(secs) = get("PORTFOLIO_DISPLAY_WINDOW_SECS") {
            config.display_window = parse_secs("PORTFOLIO_DISPLAY_WINDOW_SECS", &secs)?;
        }
        if let Some(secs) = get("PORTFOLIO_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Some(parse_secs("PORTFOLIO_REQUEST_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }
}

fn parse_relay_url(raw: &str) -> Result<Url, ClientConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ClientConfigError::InvalidEnvVar("PORTFOLIO_RELAY_URL".to_string(), e.to_string())
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientConfigError::InvalidEnvVar(
            "PORTFOLIO_RELAY_URL".to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration, ClientConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ClientConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
