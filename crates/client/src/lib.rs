//! Portfolio contact form client.
//!
//! Runs the submit side of the contact flow: local validation, a single
//! request to the relay, the timed success/error status and the WhatsApp
//! follow-up link.
//!
//! # Modules
//!
//! - [`config`] - Relay endpoint and display settings from the environment
//! - [`controller`] - Submission state machine
//! - [`transport`] - Relay transport trait and its HTTP implementation
//! - [`hook`] - Post-success side channel (WhatsApp deep link)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod controller;
pub mod hook;
pub mod transport;

pub use config::{ClientConfig, ClientConfigError};
pub use controller::{ControllerState, FormStatus, SubmissionController, SubmitOutcome};
pub use hook::{DeepLinkHook, HookError, LinkOpener, SuccessHook};
pub use transport::{HttpRelayTransport, RelayReply, RelayTransport, TransportError};
