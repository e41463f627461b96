//! `SmartContract.contractType` and related data-model enums (SPEC_FULL.md §3).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role a deployed contract plays in a payment route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    Gateway,
    Router,
    AdapterHyperbridge,
    AdapterCcip,
    AdapterLayerZero,
    Vault,
}

impl ContractType {
    /// The sentinel method an ABI must expose for the ABI Cache to consider
    /// it complete (SPEC_FULL.md §4.2). `None` means "any method at all".
    pub fn sentinel_method(self) -> Option<&'static str> {
        match self {
            ContractType::AdapterHyperbridge => Some("setStateMachineId"),
            ContractType::AdapterCcip => Some("setChainSelector"),
            ContractType::AdapterLayerZero => Some("setRoute"),
            ContractType::Gateway | ContractType::Router | ContractType::Vault => None,
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContractType::Gateway => "Gateway",
            ContractType::Router => "Router",
            ContractType::AdapterHyperbridge => "AdapterHyperbridge",
            ContractType::AdapterCcip => "AdapterCCIP",
            ContractType::AdapterLayerZero => "AdapterLayerZero",
            ContractType::Vault => "Vault",
        };
        write!(f, "{s}")
    }
}

/// `RoutePolicy.fallbackMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackMode {
    Strict,
    AutoFallback,
}

/// `Payment.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Once `Completed` or `Refunded`, status is terminal (SPEC_FULL.md §3).
    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Refunded)
    }
}

/// `PaymentEvent.eventType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentEventType {
    Created,
    SourceConfirmed,
    BridgeSubmitted,
    DestConfirmed,
    Completed,
    Failed,
    Refunded,
}

/// `PaymentRequest.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentRequestStatus {
    Pending,
    Completed,
    Expired,
}
