//! Submission controller.
//!
//! Drives one contact form through its submit cycle:
//!
//! ```text
//! Idle -> Submitting -> Success -> (display window) -> Idle
//! Idle -> Submitting -> Error   -> (display window) -> Idle
//! Idle -> Submitting -> Idle                 (validation failed)
//! ```
//!
//! At most one submit is in flight per controller. A submit issued while
//! another is outstanding is ignored, not queued. Each attempt bumps a
//! generation counter so that a revert timer from an earlier attempt never
//! touches a later one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use portfolio_core::{
    ContactRequest, ContactSubmission, FieldErrorSet, FormKind, RawSubmission, SubmissionResult,
    validate,
};
use reqwest::StatusCode;

use crate::hook::SuccessHook;
use crate::transport::{RelayReply, RelayTransport};

/// Status message shown after a successful submit.
pub const SUCCESS_MESSAGE: &str = "Mensagem enviada com sucesso! Entrarei em contato em breve.";

/// Status message shown after a failed submit.
pub const FAILURE_MESSAGE: &str =
    "Erro ao enviar mensagem. Tente novamente ou entre em contato pelo WhatsApp.";

/// Visible status of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    /// A request is in flight; the submit control is disabled.
    Submitting,
    /// The relay sent the email.
    Success(String),
    /// The submit failed; carries the user-facing message.
    Error(String),
}

impl FormStatus {
    /// Whether the submit control accepts input.
    #[must_use]
    pub const fn accepts_submit(&self) -> bool {
        !matches!(self, Self::Submitting)
    }
}

/// Snapshot of a controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub status: FormStatus,
    /// Current form contents; cleared after a successful submit.
    pub form: RawSubmission,
    /// Errors from the last validation, keyed by field.
    pub field_errors: FieldErrorSet,
    /// Result of the last completed attempt.
    pub last_result: Option<SubmissionResult>,
    generation: u64,
}

/// What happened to a submit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submit was in flight; nothing was done.
    Ignored,
    /// The attempt ran to completion.
    Completed(SubmissionResult),
}

/// Contact form submission controller.
///
/// Cheaply cloneable; clones share the same form.
#[derive(Clone)]
pub struct SubmissionController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    state: Mutex<ControllerState>,
    transport: Arc<dyn RelayTransport>,
    hook: Option<Arc<dyn SuccessHook>>,
    display_window: Duration,
}

impl ControllerInner {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SubmissionController {
    /// Create a controller for an empty form.
    #[must_use]
    pub fn new(transport: Arc<dyn RelayTransport>, display_window: Duration) -> Self {
        Self::build(transport, None, display_window)
    }

    /// Create a controller that runs `hook` after every successful submit.
    #[must_use]
    pub fn with_hook(
        transport: Arc<dyn RelayTransport>,
        hook: Arc<dyn SuccessHook>,
        display_window: Duration,
    ) -> Self {
        Self::build(transport, Some(hook), display_window)
    }

    fn build(
        transport: Arc<dyn RelayTransport>,
        hook: Option<Arc<dyn SuccessHook>>,
        display_window: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                state: Mutex::new(ControllerState::default()),
                transport,
                hook,
                display_window,
            }),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.inner.lock().clone()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.inner.lock().status.clone()
    }

    /// Switch between the client and developer forms.
    ///
    /// Clears field errors; the typed values are kept.
    pub fn switch_form(&self, kind: FormKind) {
        let mut state = self.inner.lock();
        state.form.kind = kind;
        state.field_errors = FieldErrorSet::new();
    }

    /// Submit `raw` as the form contents.
    ///
    /// Validates locally first; only valid input reaches the transport,
    /// and then exactly once.
    pub async fn submit(&self, raw: RawSubmission) -> SubmitOutcome {
        let generation = {
            let mut state = self.inner.lock();
            if !state.status.accepts_submit() {
                tracing::debug!("Submit ignored, another submit is in flight");
                return SubmitOutcome::Ignored;
            }
            state.form = raw.clone();
            state.field_errors = FieldErrorSet::new();
            state.status = FormStatus::Submitting;
            state.generation += 1;
            state.generation
        };

        let submission = match validate(&raw) {
            Ok(submission) => submission,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "Submission failed local validation");
                return self.finish_invalid(errors);
            }
        };

        let request = ContactRequest::from(&submission);
        let result = match self.inner.transport.submit(&request).await {
            Ok(reply) => interpret(reply),
            Err(e) => {
                tracing::warn!(error = %e, "Relay request failed");
                SubmissionResult::TransportFailed(e.to_string())
            }
        };

        let status = match &result {
            SubmissionResult::ValidationFailed(errors) => return self.finish_invalid(errors.clone()),
            SubmissionResult::Success { .. } => FormStatus::Success(SUCCESS_MESSAGE.to_string()),
            SubmissionResult::TransportFailed(_) => FormStatus::Error(FAILURE_MESSAGE.to_string()),
        };
        self.finish_timed(generation, result.clone(), status);
        if result.is_success() {
            self.run_hook(&submission);
        }

        SubmitOutcome::Completed(result)
    }

    fn finish_invalid(&self, errors: FieldErrorSet) -> SubmitOutcome {
        let result = SubmissionResult::ValidationFailed(errors.clone());
        let mut state = self.inner.lock();
        state.status = FormStatus::Idle;
        state.field_errors = errors;
        state.last_result = Some(result.clone());
        SubmitOutcome::Completed(result)
    }

    fn finish_timed(&self, generation: u64, result: SubmissionResult, status: FormStatus) {
        {
            let mut state = self.inner.lock();
            if result.is_success() {
                state.form.clear();
            }
            state.status = status;
            state.last_result = Some(result);
        }
        self.schedule_revert(generation);
    }

    fn run_hook(&self, submission: &ContactSubmission) {
        if let Some(hook) = &self.inner.hook
            && let Err(e) = hook.on_success(submission)
        {
            tracing::warn!(error = %e, "Success hook failed");
        }
    }

    /// Return to idle once the display window elapses, unless a newer
    /// attempt has started in the meantime.
    fn schedule_revert(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.display_window).await;
            let mut state = inner.lock();
            if state.generation == generation
                && matches!(state.status, FormStatus::Success(_) | FormStatus::Error(_))
            {
                state.status = FormStatus::Idle;
            }
        });
    }
}

/// Map a relay reply onto a submission result.
fn interpret(reply: RelayReply) -> SubmissionResult {
    if reply.is_sent() {
        return SubmissionResult::Success {
            message: reply
                .body
                .message
                .unwrap_or_else(|| SUCCESS_MESSAGE.to_string()),
        };
    }

    if reply.status == StatusCode::BAD_REQUEST
        && let Some(errors) = reply.body.field_errors
        && !errors.is_empty()
    {
        return SubmissionResult::ValidationFailed(errors);
    }

    let reason = reply
        .body
        .error
        .unwrap_or_else(|| format!("Relay returned {}", reply.status));
    tracing::warn!(status = reply.status.as_u16(), reason = %reason, "Relay rejected submission");
    SubmissionResult::TransportFailed(reason)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use portfolio_core::{Field, RelayResponse};

    use super::*;
    use crate::hook::{HookError, MockSuccessHook};
    use crate::transport::{MockRelayTransport, TransportError};

    const WINDOW: Duration = Duration::from_secs(5);

    fn valid_form() -> RawSubmission {
        RawSubmission::from_fields(
            FormKind::Dev,
            [
                ("name", "Jo"),
                ("email", "jo@x.com"),
                ("message", "Hello there, this is long enough."),
            ],
        )
    }

    fn reply(status: StatusCode, body: RelayResponse) -> Result<RelayReply, TransportError> {
        Ok(RelayReply { status, body })
    }

    fn controller(transport: MockRelayTransport) -> SubmissionController {
        SubmissionController::new(Arc::new(transport), WINDOW)
    }

    /// Let the paused clock run past `d` and the spawned timers fire.
    async fn elapse(d: Duration) {
        tokio::time::sleep(d).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_clears_form_and_reverts() {
        let mut transport = MockRelayTransport::new();
        transport
            .expect_submit()
            .times(1)
            .withf(|request| {
                request.name.as_deref() == Some("Jo")
                    && request.message.as_deref() == Some("Hello there, this is long enough.")
            })
            .returning(|_| reply(StatusCode::OK, RelayResponse::sent("Email enviado com sucesso!")));
        let controller = controller(transport);

        let outcome = controller.submit(valid_form()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Completed(SubmissionResult::Success {
                message: "Email enviado com sucesso!".to_string()
            })
        );
        let state = controller.state();
        assert_eq!(state.status, FormStatus::Success(SUCCESS_MESSAGE.to_string()));
        assert_eq!(
            state.form,
            RawSubmission {
                kind: FormKind::Dev,
                ..RawSubmission::default()
            }
        );

        elapse(Duration::from_millis(4900)).await;
        assert!(matches!(controller.status(), FormStatus::Success(_)));

        elapse(Duration::from_millis(200)).await;
        assert_eq!(controller.status(), FormStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_failure_skips_network() {
        let mut transport = MockRelayTransport::new();
        transport.expect_submit().never();
        let controller = controller(transport);

        let raw = RawSubmission::from_fields(
            FormKind::Dev,
            [("name", "J"), ("email", "not-an-email"), ("message", "short")],
        );
        let outcome = controller.submit(raw.clone()).await;

        let SubmitOutcome::Completed(SubmissionResult::ValidationFailed(errors)) = outcome else {
            panic!("expected validation failure, got {outcome:?}");
        };
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![Field::Name, Field::Email, Field::Message]
        );

        let state = controller.state();
        assert_eq!(state.status, FormStatus::Idle);
        assert_eq!(state.field_errors, errors);
        // Input is kept so the user can fix it
        assert_eq!(state.form, raw);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_failure_shows_error_then_reverts() {
        let mut transport = MockRelayTransport::new();
        transport.expect_submit().times(1).returning(|_| {
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                RelayResponse::failed("Failed to send email"),
            )
        });
        let controller = controller(transport);

        let outcome = controller.submit(valid_form()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Completed(SubmissionResult::TransportFailed(
                "Failed to send email".to_string()
            ))
        );
        let state = controller.state();
        assert_eq!(state.status, FormStatus::Error(FAILURE_MESSAGE.to_string()));
        assert_eq!(state.form, valid_form());

        elapse(WINDOW + Duration::from_millis(1)).await;
        assert_eq!(controller.status(), FormStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_shaped_failure_is_an_error() {
        let mut transport = MockRelayTransport::new();
        transport
            .expect_submit()
            .returning(|_| reply(StatusCode::OK, RelayResponse::failed("quota exceeded")));
        let controller = controller(transport);

        let outcome = controller.submit(valid_form()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Completed(SubmissionResult::TransportFailed("quota exceeded".to_string()))
        );
        assert!(matches!(controller.status(), FormStatus::Error(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_an_error() {
        let mut transport = MockRelayTransport::new();
        transport
            .expect_submit()
            .returning(|_| Err(TransportError::UnreadableBody { status: 502 }));
        let controller = controller(transport);

        let outcome = controller.submit(valid_form()).await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Completed(SubmissionResult::TransportFailed(_))
        ));
        assert_eq!(controller.status(), FormStatus::Error(FAILURE_MESSAGE.to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_field_errors_are_validation_failures() {
        let mut errors = FieldErrorSet::new();
        errors.insert(Field::Message, "Mensagem deve ter pelo menos 10 caracteres");
        let relay_errors = errors.clone();

        let mut transport = MockRelayTransport::new();
        transport.expect_submit().returning(move |_| {
            reply(
                StatusCode::BAD_REQUEST,
                RelayResponse::invalid("Invalid submission", relay_errors.clone()),
            )
        });
        let controller = controller(transport);

        let outcome = controller.submit(valid_form()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Completed(SubmissionResult::ValidationFailed(errors.clone()))
        );
        let state = controller.state();
        assert_eq!(state.status, FormStatus::Idle);
        assert_eq!(state.field_errors, errors);
    }

    /// Transport that takes a while to answer.
    struct SlowTransport;

    #[async_trait]
    impl RelayTransport for SlowTransport {
        async fn submit(&self, _request: &ContactRequest) -> Result<RelayReply, TransportError> {
            tokio::time::sleep(Duration::from_secs(1)).await;
            reply(StatusCode::OK, RelayResponse::sent("ok"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_in_flight_is_ignored() {
        let controller = SubmissionController::new(Arc::new(SlowTransport), WINDOW);

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit(valid_form()).await }
        });
        tokio::task::yield_now().await;
        assert_eq!(controller.status(), FormStatus::Submitting);

        assert_eq!(controller.submit(valid_form()).await, SubmitOutcome::Ignored);

        let outcome = first.await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Completed(SubmissionResult::Success { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_revert_newer_attempt() {
        let mut transport = MockRelayTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_submit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| reply(StatusCode::OK, RelayResponse::sent("ok")));
        transport
            .expect_submit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RelayResponse::failed("Failed to send email"),
                )
            });
        let controller = controller(transport);

        controller.submit(valid_form()).await;
        elapse(Duration::from_secs(3)).await;

        // Resubmitting right away from Success is allowed
        controller.submit(valid_form()).await;
        assert!(matches!(controller.status(), FormStatus::Error(_)));

        // First timer fires at t=5s and must leave the newer error alone
        elapse(Duration::from_secs(3)).await;
        assert!(matches!(controller.status(), FormStatus::Error(_)));

        // Second timer fires at t=8s
        elapse(Duration::from_secs(3)).await;
        assert_eq!(controller.status(), FormStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hook_runs_on_success_only() {
        let mut hook = MockSuccessHook::new();
        hook.expect_on_success()
            .times(1)
            .withf(|submission| submission.name() == "Jo")
            .returning(|_| Ok(()));

        let mut transport = MockRelayTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_submit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| reply(StatusCode::OK, RelayResponse::sent("ok")));
        transport
            .expect_submit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RelayResponse::failed("Failed to send email"),
                )
            });

        let controller =
            SubmissionController::with_hook(Arc::new(transport), Arc::new(hook), WINDOW);
        controller.submit(valid_form()).await;
        controller.submit(valid_form()).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_hook_failure_keeps_success() {
        let mut hook = MockSuccessHook::new();
        hook.expect_on_success()
            .returning(|_| Err(HookError::Open("popup blocked".to_string())));

        let mut transport = MockRelayTransport::new();
        transport
            .expect_submit()
            .returning(|_| reply(StatusCode::OK, RelayResponse::sent("ok")));

        let controller =
            SubmissionController::with_hook(Arc::new(transport), Arc::new(hook), WINDOW);
        let outcome = controller.submit(valid_form()).await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Completed(SubmissionResult::Success { .. })
        ));
        assert!(matches!(controller.status(), FormStatus::Success(_)));
    }

    #[tokio::test]
    async fn test_switch_form_clears_errors() {
        let mut transport = MockRelayTransport::new();
        transport.expect_submit().never();
        let controller = controller(transport);

        controller
            .submit(RawSubmission::from_fields(FormKind::Dev, [("name", "J")]))
            .await;
        assert!(!controller.state().field_errors.is_empty());

        controller.switch_form(FormKind::Client);
        let state = controller.state();
        assert!(state.field_errors.is_empty());
        assert_eq!(state.form.kind, FormKind::Client);
        assert_eq!(state.form.name, "J");
    }
}
