//! Relay configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `RELAY_HOST` - Bind address (default: 127.0.0.1)
//! - `RELAY_PORT` - Listen port (default: 8787)
//! - `RESEND_API_KEY` - Resend API key. When unset, or when it looks like a
//!   template placeholder, the relay still starts but every submission fails
//!   with "Email service not configured".
//! - `RESEND_API_URL` - Resend send endpoint (default: <https://api.resend.com/emails>)
//! - `CONTACT_SENDER` - From header (default: `Portfólio <onboarding@resend.dev>`)
//! - `CONTACT_RECIPIENT` - Inbox that receives submissions (default: brizivinicius@gmail.com)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `pretty` (default) or `json`

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use portfolio_core::Email;
use secrecy::SecretString;
use thiserror::Error;

/// Resend's send-email endpoint.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Sender identity; Resend's shared onboarding domain.
pub const DEFAULT_SENDER: &str = "Portfólio <onboarding@resend.dev>";

/// Inbox that receives contact submissions.
pub const DEFAULT_RECIPIENT: &str = "brizivinicius@gmail.com";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Words that mark a placeholder key when they make up a whole segment of
/// it (case-insensitive). Segments are separated by `-`, `_` or `.`.
const PLACEHOLDER_WORDS: &[&str] = &[
    "your",
    "changeme",
    "replace",
    "replaceme",
    "placeholder",
    "example",
    "todo",
    "insert",
    "secret",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Relay application configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Email provider configuration
    pub resend: ResendConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Log output format
    pub log_format: LogFormat,
}

/// Resend configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ResendConfig {
    /// API key; `None` means the email service is not configured
    pub api_key: Option<SecretString>,
    /// Why a provided API key was discarded, for the startup log
    pub rejected_key: Option<String>,
    /// Send-email endpoint
    pub api_url: String,
    /// From header, `Name <address>`
    pub sender: String,
    /// Recipient inbox, checked to be a valid address when loaded
    pub recipient: String,
}

impl std::fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendConfig")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("rejected_key", &self.rejected_key)
            .field("api_url", &self.api_url)
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            rejected_key: None,
            api_url: DEFAULT_RESEND_API_URL.to_string(),
            sender: DEFAULT_SENDER.to_string(),
            recipient: DEFAULT_RECIPIENT.to_string(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`RelayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let host = vars
            .or_default("RELAY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("RELAY_HOST".to_string(), e.to_string()))?;
        let port = vars
            .or_default("RELAY_PORT", "8787")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("RELAY_PORT".to_string(), e.to_string()))?;

        let resend = ResendConfig::from_vars(&vars)?;

        let log_format = match vars.optional("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected 'pretty' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            host,
            port,
            resend,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
            log_format,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ResendConfig {
    fn from_vars<F>(vars: &Vars<'_, F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (api_key, rejected_key) = match vars.optional("RESEND_API_KEY") {
            Some(key) => match check_secret_strength(key.trim()) {
                Ok(()) => (Some(SecretString::from(key.trim().to_string())), None),
                Err(reason) => (None, Some(reason)),
            },
            None => (None, None),
        };

        let recipient = vars.or_default("CONTACT_RECIPIENT", DEFAULT_RECIPIENT);
        let recipient = Email::parse(recipient.trim()).map_err(|e| {
            ConfigError::InvalidEnvVar("CONTACT_RECIPIENT".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_key,
            rejected_key,
            recipient: recipient.as_str().to_string(),
            api_url: vars.or_default("RESEND_API_URL", DEFAULT_RESEND_API_URL),
            sender: vars.or_default("CONTACT_SENDER", DEFAULT_SENDER),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup; blank values count as unset.
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // Key length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Detect API keys that are obviously placeholders copied from a template.
///
/// Only whole segments are compared, so random key material that happens to
/// contain a word such as `todo` is accepted.
fn check_secret_strength(secret: &str) -> Result<(), String> {
    let lower = secret.to_lowercase();

    for segment in lower.split(['-', '_', '.']) {
        if PLACEHOLDER_WORDS.contains(&segment) {
            return Err(format!("appears to be a placeholder (contains '{segment}')"));
        }
        if segment.len() >= 3 && segment.chars().all(|c| c == 'x') {
            return Err("appears to be a placeholder (masked with 'x')".to_string());
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8787");
        assert!(config.resend.api_key.is_none());
        assert_eq!(config.resend.api_url, DEFAULT_RESEND_API_URL);
        assert_eq!(config.resend.sender, DEFAULT_SENDER);
        assert_eq!(config.resend.recipient, DEFAULT_RECIPIENT);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_reads_api_key() {
        let config = RelayConfig::from_lookup(lookup(&[(
            "RESEND_API_KEY",
            "re_8fJk2LmQ9zXw4TbN7vRc1Hs",
        )]))
        .unwrap();
        assert_eq!(
            config.resend.api_key.unwrap().expose_secret(),
            "re_8fJk2LmQ9zXw4TbN7vRc1Hs"
        );
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = RelayConfig::from_lookup(lookup(&[("RESEND_API_KEY", "  ")])).unwrap();
        assert!(config.resend.api_key.is_none());
    }

    #[test]
    fn test_placeholder_api_key_is_treated_as_unset() {
        let config =
            RelayConfig::from_lookup(lookup(&[("RESEND_API_KEY", "re_your-api-key")])).unwrap();
        assert!(config.resend.api_key.is_none());
        assert!(config.resend.rejected_key.unwrap().contains("your"));

        let config =
            RelayConfig::from_lookup(lookup(&[("RESEND_API_KEY", "re_xxxxxxxxxxxx")])).unwrap();
        assert!(config.resend.api_key.is_none());
        assert!(config.resend.rejected_key.is_some());
    }

    #[test]
    fn test_random_key_containing_placeholder_words_is_accepted() {
        for key in [
            "re_9TodoQ4kXxxm2Lp7Wv3Nr8Ys",
            "re_K3exampleZq9Rw2Vt7Pn4Ld",
            "re_h8ReplaceU2mQ7sN4vXw9Tk",
        ] {
            let config = RelayConfig::from_lookup(lookup(&[("RESEND_API_KEY", key)])).unwrap();
            assert_eq!(
                config.resend.api_key.as_ref().map(|k| k.expose_secret()),
                Some(key),
                "{key}"
            );
            assert!(config.resend.rejected_key.is_none());
        }
    }

    #[test]
    fn test_low_entropy_api_key_is_rejected() {
        assert!(check_secret_strength("aaaaaaaaaaaaaaaa").is_err());
    }

    #[test]
    fn test_default_resend_config_matches_loaded_defaults() {
        let loaded = RelayConfig::from_lookup(lookup(&[])).unwrap().resend;
        let default = ResendConfig::default();
        assert_eq!(default.recipient, loaded.recipient);
        assert_eq!(default.sender, loaded.sender);
        assert_eq!(default.api_url, loaded.api_url);
        assert!(Email::parse(&default.recipient).is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let result = RelayConfig::from_lookup(lookup(&[("RELAY_PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "RELAY_PORT"));
    }

    #[test]
    fn test_invalid_recipient() {
        let result = RelayConfig::from_lookup(lookup(&[("CONTACT_RECIPIENT", "inbox")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "CONTACT_RECIPIENT"));
    }

    #[test]
    fn test_json_log_format() {
        let config = RelayConfig::from_lookup(lookup(&[("LOG_FORMAT", "json")])).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(RelayConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_resend_config_debug_redacts_key() {
        let config = ResendConfig {
            api_key: Some(SecretString::from("re_super_secret_value")),
            ..ResendConfig::default()
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("re_super_secret_value"));
        assert!(debug_output.contains(DEFAULT_RECIPIENT));
    }
}
