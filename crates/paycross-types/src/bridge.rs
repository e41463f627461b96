//! Centralized bridge-type enumeration.
//!
//! The source system carried two disagreeing bridge-type mappings: the Probe's
//! `{0: Hyperbridge, 1: CCIP, 2: LayerZero}` and the Coordinator's deterministic
//! selection naming "Hyperlane" for Solana routes. This type is the single
//! source of truth both components share (see SPEC_FULL.md §9's third open
//! question and §11).

use serde::{Deserialize, Serialize};
use std::fmt;

/// On-chain bridge adapter kind, keyed to the `uint8` values `RoutePolicy` and
/// the Router/Gateway contracts use on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BridgeType {
    Hyperbridge = 0,
    Ccip = 1,
    LayerZero = 2,
}

impl BridgeType {
    pub const ALL: [BridgeType; 3] = [BridgeType::Hyperbridge, BridgeType::Ccip, BridgeType::LayerZero];

    /// Parses a raw on-wire bridge type value. Values outside `{0,1,2}` are
    /// rejected; callers that need the "treat as Hyperbridge" fallback from
    /// `buildBridgeOrder` apply that policy explicitly, not here.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(BridgeType::Hyperbridge),
            1 => Some(BridgeType::Ccip),
            2 => Some(BridgeType::LayerZero),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for BridgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BridgeType::Hyperbridge => "hyperbridge",
            BridgeType::Ccip => "ccip",
            BridgeType::LayerZero => "layerzero",
        };
        write!(f, "{name}")
    }
}
