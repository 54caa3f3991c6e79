//! Integration tests for the portfolio contact flow.
//!
//! Each test starts the real relay router on an ephemeral local port, backed
//! by a recording email provider instead of Resend, and talks to it over
//! HTTP, either directly with `reqwest` or through the submission
//! controller.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p portfolio-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use portfolio_client::{ClientConfig, HttpRelayTransport, SubmissionController};
use portfolio_relay::config::RelayConfig;
use portfolio_relay::services::{EmailProvider, OutboundEmail, ResendError, SentEmail};
use portfolio_relay::state::AppState;
use secrecy::SecretString;
use url::Url;

/// A Resend key that passes the relay's placeholder checks.
pub const TEST_API_KEY: &str = "re_8fK2mQ9xLp4vN7sR3tW6yZ1a";

/// Display window used by controllers in these tests.
pub const TEST_DISPLAY_WINDOW: Duration = Duration::from_millis(150);

/// Email provider that records every send instead of calling Resend.
#[derive(Default)]
pub struct RecordingProvider {
    sent: Mutex<Vec<OutboundEmail>>,
    reject_with: Option<u16>,
    delay: Option<Duration>,
}

impl RecordingProvider {
    /// Provider that accepts every email.
    #[must_use]
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Provider that rejects every email with `status`.
    #[must_use]
    pub fn rejecting(status: u16) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            reject_with: Some(status),
            delay: None,
        })
    }

    /// Provider that accepts every email after waiting `delay`.
    #[must_use]
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            reject_with: None,
            delay: Some(delay),
        })
    }

    /// Emails handed to the provider so far, rejected ones included.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of provider calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.sent().len()
    }
}

#[async_trait]
impl EmailProvider for RecordingProvider {
    async fn send(
        &self,
        _api_key: &SecretString,
        email: &OutboundEmail,
    ) -> Result<SentEmail, ResendError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.reject_with {
            Some(status) => Err(ResendError::Api {
                status,
                message: "API key is invalid".to_string(),
            }),
            None => Ok(SentEmail {
                id: Some(uuid::Uuid::new_v4().to_string()),
            }),
        }
    }
}

/// A relay served on a local port.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub provider: Arc<RecordingProvider>,
}

impl TestRelay {
    /// Start the relay. Without `api_key` the email service is unconfigured.
    ///
    /// # Panics
    ///
    /// Panics if the relay cannot be configured or bound.
    pub async fn start(provider: Arc<RecordingProvider>, api_key: Option<&str>) -> Self {
        let config = RelayConfig::from_lookup(|key| match key {
            "RESEND_API_KEY" => api_key.map(str::to_string),
            _ => None,
        })
        .expect("Failed to build relay config");

        let mailer: Arc<dyn EmailProvider> = provider.clone();
        let app = portfolio_relay::app(AppState::new(config, mailer));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, provider }
    }

    /// Relay with a configured key and an accepting provider.
    pub async fn accepting() -> Self {
        Self::start(RecordingProvider::accepting(), Some(TEST_API_KEY)).await
    }

    /// URL of the contact endpoint.
    #[must_use]
    pub fn contact_url(&self) -> String {
        format!("http://{}/send-contact-email", self.addr)
    }

    /// Client configuration pointing at this relay.
    ///
    /// # Panics
    ///
    /// Panics if the contact URL does not parse.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let mut config =
            ClientConfig::new(Url::parse(&self.contact_url()).expect("Invalid relay URL"));
        config.display_window = TEST_DISPLAY_WINDOW;
        config
    }

    /// Submission controller talking to this relay over HTTP.
    ///
    /// # Panics
    ///
    /// Panics if the transport cannot be built.
    #[must_use]
    pub fn controller(&self) -> SubmissionController {
        let config = self.client_config();
        let transport = HttpRelayTransport::new(&config).expect("Failed to build transport");
        SubmissionController::new(Arc::new(transport), config.display_window)
    }
}
