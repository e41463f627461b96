//! Bridge Quote & Fallback Engine (SPEC_FULL.md §4.4).
//!
//! - [`view`] — the generic typed view-call helper, shared with the Adapter
//!   Probe.
//! - [`message`] — the ABI-encoded fee-quote message and token normalization.
//! - [`policy`] — `buildBridgeOrder`.
//! - [`engine`] — [`engine::QuoteEngine`], the orchestration itself.
//! - [`error`] — [`error::QuoteError`] and [`error::BridgeDiagnostic`].

pub mod engine;
pub mod error;
pub mod message;
pub mod policy;
pub mod view;

pub use engine::{QuoteEngine, QuoteOutcome};
pub use error::{BridgeDiagnostic, QuoteError};
pub use message::{normalize_token_address, FeeQuoteMessage};
pub use policy::build_bridge_order;
