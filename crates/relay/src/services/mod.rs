//! Outbound services for the relay.
//!
//! # Services
//!
//! - `resend` - Resend API client and the `EmailProvider` seam
//! - `email` - Composition of the notification email from a submission

pub mod email;
pub mod resend;

#[cfg(any(test, feature = "mock"))]
pub use resend::MockEmailProvider;
pub use resend::{EmailProvider, OutboundEmail, ResendClient, ResendError, SentEmail};
