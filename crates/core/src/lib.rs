//! Portfolio Core - Shared contact form types.
//!
//! This crate provides the types and rules shared by both sides of the
//! contact flow:
//! - `relay` - Server-side function that forwards submissions to Resend
//! - `client` - Submission controller that validates and calls the relay
//! - `cli` - Terminal front-end for the submission controller
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks. Validation runs identically on both sides of the wire,
//! so a client that skips it still cannot get unvalidated input to the email
//! provider.
//!
//! # Modules
//!
//! - [`types`] - Submission, field error set, result and email newtypes
//! - [`validation`] - Field constraints, schema evaluation and sanitation
//! - [`wire`] - JSON request/response bodies of the relay endpoint
//! - [`deep_link`] - WhatsApp deep link construction

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod deep_link;
pub mod types;
pub mod validation;
pub mod wire;

pub use deep_link::WhatsAppLink;
pub use types::*;
pub use validation::{sanitize, validate};
pub use wire::{ContactRequest, RelayResponse};
