//! Resend API client for transactional email.
//!
//! One call per submission: `POST https://api.resend.com/emails` with a
//! bearer token. The relay never retries; a rejected or failed call is
//! reported to the caller as-is.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when sending through Resend.
#[derive(Debug, Error)]
pub enum ResendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Email payload accepted by Resend's send endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Resend's acknowledgement of an accepted email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SentEmail {
    #[serde(default)]
    pub id: Option<String>,
}

/// Resend error body.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Outbound email transport.
///
/// The API key is passed per call so that a missing credential can be
/// detected before the transport is touched.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync + 'static {
    /// Send one email.
    ///
    /// # Errors
    ///
    /// Returns `ResendError` if the request fails or the provider rejects it.
    async fn send(&self, api_key: &SecretString, email: &OutboundEmail)
    -> Result<SentEmail, ResendError>;
}

/// Resend API client.
#[derive(Clone)]
pub struct ResendClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ResendClient {
    /// Create a new Resend client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ResendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("portfolio-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl EmailProvider for ResendClient {
    async fn send(
        &self,
        api_key: &SecretString,
        email: &OutboundEmail,
    ) -> Result<SentEmail, ResendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(email)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|err| err.message.or(err.name))
                .unwrap_or(body);
            return Err(ResendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // The email was accepted even if the acknowledgement is unreadable
        let sent = response.json::<SentEmail>().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unreadable Resend acknowledgement");
            SentEmail::default()
        });

        Ok(sent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::response::IntoResponse;
    use axum::routing::post;

    use super::*;

    /// Request as seen by the fake Resend endpoint.
    #[derive(Debug, Default, Clone)]
    struct Captured {
        authorization: Option<String>,
        content_type: Option<String>,
        body: Option<serde_json::Value>,
    }

    /// Serve a fake Resend endpoint answering every POST with `status` and
    /// `body`; returns the endpoint URL and the captured request.
    async fn fake_resend(
        status: StatusCode,
        body: &'static str,
    ) -> (String, Arc<Mutex<Captured>>) {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let seen = captured.clone();

        let app = Router::new().route(
            "/emails",
            post(move |headers: HeaderMap, payload: String| {
                let seen = seen.clone();
                async move {
                    let header_str = |name: header::HeaderName| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    *seen.lock().unwrap() = Captured {
                        authorization: header_str(header::AUTHORIZATION),
                        content_type: header_str(header::CONTENT_TYPE),
                        body: serde_json::from_str(&payload).ok(),
                    };
                    (status, body).into_response()
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (format!("http://{addr}/emails"), captured)
    }

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "Portfólio <onboarding@resend.dev>".to_string(),
            to: vec!["inbox@example.com".to_string()],
            subject: "Nova mensagem do portfólio: Jo".to_string(),
            html: "<p>Hi</p>".to_string(),
            text: "Hi".to_string(),
            reply_to: Some("jo@x.com".to_string()),
        }
    }

    fn key() -> SecretString {
        SecretString::from("re_key")
    }

    #[tokio::test]
    async fn test_send_posts_json_with_bearer_key() {
        let (endpoint, captured) = fake_resend(StatusCode::OK, r#"{"id":"email_123"}"#).await;
        let client = ResendClient::new(endpoint).unwrap();

        let sent = client.send(&key(), &email()).await.unwrap();
        assert_eq!(sent.id.as_deref(), Some("email_123"));

        let seen = captured.lock().unwrap().clone();
        assert_eq!(seen.authorization.as_deref(), Some("Bearer re_key"));
        assert_eq!(seen.content_type.as_deref(), Some("application/json"));
        assert_eq!(seen.body, Some(serde_json::to_value(email()).unwrap()));
    }

    #[tokio::test]
    async fn test_send_maps_json_error_message() {
        let (endpoint, _) = fake_resend(
            StatusCode::UNAUTHORIZED,
            r#"{"statusCode":401,"name":"validation_error","message":"API key is invalid"}"#,
        )
        .await;
        let client = ResendClient::new(endpoint).unwrap();

        let err = client.send(&key(), &email()).await.unwrap_err();
        assert!(matches!(
            err,
            ResendError::Api { status: 401, ref message } if message == "API key is invalid"
        ));
    }

    #[tokio::test]
    async fn test_send_falls_back_to_error_name() {
        let (endpoint, _) = fake_resend(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"statusCode":422,"name":"invalid_from_address"}"#,
        )
        .await;
        let client = ResendClient::new(endpoint).unwrap();

        let err = client.send(&key(), &email()).await.unwrap_err();
        assert!(matches!(
            err,
            ResendError::Api { status: 422, ref message } if message == "invalid_from_address"
        ));
    }

    #[tokio::test]
    async fn test_send_keeps_non_json_error_body() {
        let (endpoint, _) = fake_resend(StatusCode::BAD_GATEWAY, "upstream unavailable").await;
        let client = ResendClient::new(endpoint).unwrap();

        let err = client.send(&key(), &email()).await.unwrap_err();
        assert!(matches!(
            err,
            ResendError::Api { status: 502, ref message } if message == "upstream unavailable"
        ));
    }

    #[tokio::test]
    async fn test_send_accepts_unreadable_acknowledgement() {
        let (endpoint, _) = fake_resend(StatusCode::OK, "not json").await;
        let client = ResendClient::new(endpoint).unwrap();

        let sent = client.send(&key(), &email()).await.unwrap();
        assert_eq!(sent, SentEmail::default());
    }

    #[test]
    fn test_outbound_email_payload_shape() {
        let email = OutboundEmail {
            from: "Portfólio <onboarding@resend.dev>".to_string(),
            to: vec!["inbox@example.com".to_string()],
            subject: "Nova mensagem do portfólio: Jo".to_string(),
            html: "<p>Hi</p>".to_string(),
            text: "Hi".to_string(),
            reply_to: None,
        };
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": "Portfólio <onboarding@resend.dev>",
                "to": ["inbox@example.com"],
                "subject": "Nova mensagem do portfólio: Jo",
                "html": "<p>Hi</p>",
                "text": "Hi"
            })
        );
    }

    #[test]
    fn test_api_error_body_prefers_message() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"statusCode":401,"name":"validation_error","message":"API key is invalid"}"#,
        )
        .unwrap();
        assert_eq!(body.message.as_deref(), Some("API key is invalid"));
        assert_eq!(body.name.as_deref(), Some("validation_error"));
    }

    #[test]
    fn test_sent_email_tolerates_missing_id() {
        let sent: SentEmail = serde_json::from_str("{}").unwrap();
        assert_eq!(sent.id, None);
    }
}
