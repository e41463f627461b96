//! Shared types for the cross-chain payment orchestrator.
//!
//! - [`chain_id`] — CAIP-2 chain identifiers and opaque entity ids.
//! - [`bridge`] — the centralized `BridgeType` enum (SPEC_FULL.md §11).
//! - [`contract`] — `SmartContract`/`Payment`/`PaymentRequest` data-model enums.
//! - [`money`] — exact base-10 amount scaling.
//! - [`timestamp`] — Unix timestamps.
//! - [`error`] — the shared `ErrorKind` taxonomy.

pub mod bridge;
pub mod chain_id;
pub mod contract;
pub mod error;
pub mod money;
pub mod timestamp;

pub use bridge::BridgeType;
pub use chain_id::{Caip2, ChainType, EntityId};
pub use contract::{ContractType, FallbackMode, PaymentEventType, PaymentRequestStatus, PaymentStatus};
pub use error::{ErrorKind, HasErrorKind};
pub use money::ScaledAmount;
pub use timestamp::UnixTimestamp;
