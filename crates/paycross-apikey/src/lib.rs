//! API-key signing and secret-at-rest encryption (SPEC_FULL.md §4.7).
//!
//! - [`crypto`] — AES-256-GCM encryption of the secret half, and the
//!   `encryptionKey` config parse helper.
//! - [`signing`] — HMAC-SHA256 request signing and constant-time verify.
//! - [`service`] — [`service::ApiKeyService`], tying both together with the
//!   repository layer.
//! - [`error`] — [`error::ApiKeyError`].

pub mod crypto;
pub mod error;
pub mod service;
pub mod signing;

pub use error::ApiKeyError;
pub use service::{ApiKeyService, NewApiKey};
