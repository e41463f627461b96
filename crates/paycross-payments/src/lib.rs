//! Payment Lifecycle Coordinator (SPEC_FULL.md §4.6): fee breakdown,
//! calldata/instruction building, and the transactional create/webhook paths.
//!
//! - [`fees`] — platform and bridge fee computation.
//! - [`calldata`] — `createPayment`/`createPaymentWithSlippage`/`approve` EVM calldata.
//! - [`solana_ix`] — the Anchor `create_payment` instruction encoding.
//! - [`vault`] — vault address resolution and address comparison.
//! - [`bridge_selection`] — the deterministic fallback `BridgeType` mapping (SPEC_FULL.md §11).
//! - [`webhook`] — the indexer webhook tagged-sum and status mapping.
//! - [`payment_request`] — the `PaymentRequest` expiry sweep (SPEC_FULL.md §11).
//! - [`coordinator`] — [`coordinator::PaymentLifecycleCoordinator`], tying it all together.
//! - [`error`] — [`error::PaymentError`].

pub mod bridge_selection;
pub mod calldata;
pub mod coordinator;
pub mod error;
pub mod fees;
pub mod payment_request;
pub mod solana_ix;
pub mod vault;
pub mod webhook;

pub use bridge_selection::deterministic_bridge_type;
pub use calldata::{build_approve_call, build_create_payment_call, decode_receiver_bytes, EvmCall};
pub use coordinator::{CreatePaymentInput, PaymentCreationResult, PaymentLifecycleCoordinator};
pub use error::PaymentError;
pub use fees::{compute_bridge_fee, compute_platform_fee, FeeBreakdown, PlatformFeeParams};
pub use payment_request::PaymentRequestService;
pub use webhook::{parse_webhook_payload, WebhookEventKind, WebhookPayload};
