//! Indexer webhook dispatch (SPEC_FULL.md §4.6 step 7, §9).
//!
//! The source system dispatches on a dynamically-typed payload; §9 asks for
//! a tagged sum instead. [`WebhookEventKind`] is that sum: one of the three
//! named event types, or [`WebhookEventKind::Unknown`], which callers must
//! treat as a no-op rather than an error.

use serde::Deserialize;

use paycross_types::{EntityId, PaymentEventType, PaymentStatus};

use crate::error::PaymentError;

/// The indexer's named webhook event types, plus the catch-all for anything
/// else (SPEC_FULL.md §11: "unknown variants are explicitly no-op").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEventKind {
    PaymentCompleted,
    PaymentExecuted,
    RequestPaymentReceived,
    Unknown,
}

impl WebhookEventKind {
    pub fn parse(event_type: &str) -> Self {
        match event_type.trim() {
            "PaymentCompleted" => WebhookEventKind::PaymentCompleted,
            "PaymentExecuted" => WebhookEventKind::PaymentExecuted,
            "RequestPaymentReceived" => WebhookEventKind::RequestPaymentReceived,
            _ => WebhookEventKind::Unknown,
        }
    }
}

/// The fields this crate reads out of an indexer webhook body, regardless of
/// event kind. Extra fields in the payload are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWebhookPayload {
    payment_id: String,
    status: Option<String>,
    dest_tx_hash: Option<String>,
}

/// Parsed webhook body, ready for the Coordinator's transition logic.
#[derive(Debug, Clone)]
pub struct WebhookPayload {
    pub payment_id: EntityId,
    pub status: Option<String>,
    pub dest_tx_hash: Option<String>,
}

pub fn parse_webhook_payload(raw_json: &str) -> Result<WebhookPayload, PaymentError> {
    let raw: RawWebhookPayload =
        serde_json::from_str(raw_json).map_err(|err| PaymentError::InvalidInput(format!("malformed webhook payload: {err}")))?;
    let payment_id = raw
        .payment_id
        .parse::<EntityId>()
        .map_err(|err| PaymentError::InvalidInput(format!("malformed paymentId: {err}")))?;
    Ok(WebhookPayload {
        payment_id,
        status: raw.status,
        dest_tx_hash: raw.dest_tx_hash,
    })
}

/// `"completed"` -> Completed, `"processing"` -> Processing, `"failed"` ->
/// Failed, `"refunded"` -> Refunded, anything else (including absent) ->
/// Pending (SPEC_FULL.md §4.6 step 7).
pub fn map_status(status: Option<&str>) -> PaymentStatus {
    match status.map(str::to_ascii_lowercase).as_deref() {
        Some("completed") => PaymentStatus::Completed,
        Some("processing") => PaymentStatus::Processing,
        Some("failed") => PaymentStatus::Failed,
        Some("refunded") => PaymentStatus::Refunded,
        _ => PaymentStatus::Pending,
    }
}

/// The [`PaymentEventType`] appended for a transition, given the event kind
/// that triggered it and the status the payload's `status` field resolved
/// to. A `status` of `"failed"`/`"refunded"` is authoritative over the kind's
/// usual event (a kind-specific webhook can still report a terminal failure).
pub fn event_type_for(kind: WebhookEventKind, status: PaymentStatus) -> PaymentEventType {
    match status {
        PaymentStatus::Failed => PaymentEventType::Failed,
        PaymentStatus::Refunded => PaymentEventType::Refunded,
        _ => match kind {
            WebhookEventKind::PaymentCompleted => PaymentEventType::Completed,
            WebhookEventKind::PaymentExecuted => PaymentEventType::BridgeSubmitted,
            WebhookEventKind::RequestPaymentReceived => PaymentEventType::SourceConfirmed,
            WebhookEventKind::Unknown => PaymentEventType::Created,
        },
    }
}
