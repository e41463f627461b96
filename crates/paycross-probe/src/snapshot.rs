//! [`ConfigSnapshot`] and the preflight/AutoFix types derived from it
//! (SPEC_FULL.md §4.3).

use alloy_primitives::{Address, Bytes, FixedBytes};
use serde::{Deserialize, Serialize};

use paycross_types::BridgeType;

/// The full on-chain configuration picture for one (sourceChain, destChain)
/// route, assembled from the fixed call sequence in [`crate::probe`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub default_bridge_type: BridgeType,
    /// Indexed by [`BridgeType::as_u8`].
    pub has_adapter: [bool; 3],
    pub adapter_address: [Address; 3],

    pub hyperbridge_configured: bool,
    pub hyperbridge_state_machine_id: FixedBytes<32>,
    pub hyperbridge_destination_contract: Address,

    pub ccip_chain_selector: u64,
    pub ccip_destination_adapter: Address,

    pub layer_zero_configured: bool,
    pub layer_zero_dst_eid: u32,
    pub layer_zero_peer: FixedBytes<32>,
    pub layer_zero_options_hex: String,

    pub policy_executable: bool,
    pub preflight: [PreflightRow; 3],
}

/// One row of `{ready, errorCode, adapterAddress, extras}` per bridge type
/// (SPEC_FULL.md §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightRow {
    pub bridge_type: BridgeType,
    pub ready: bool,
    pub error_code: PreflightErrorCode,
    pub adapter_address: Address,
    pub extras: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreflightErrorCode {
    None,
    AdapterNotRegistered,
    HyperbridgeNotConfigured,
    CcipNotConfigured,
    LayerZeroNotConfigured,
    FeeQuoteFailed,
}

impl PreflightErrorCode {
    /// The wire string this error code maps to (SPEC_FULL.md §4.3: errorCode
    /// ∈ {`ADAPTER_NOT_REGISTERED`, ..., `""`}).
    pub fn as_str(self) -> &'static str {
        match self {
            PreflightErrorCode::None => "",
            PreflightErrorCode::AdapterNotRegistered => "ADAPTER_NOT_REGISTERED",
            PreflightErrorCode::HyperbridgeNotConfigured => "HYPERBRIDGE_NOT_CONFIGURED",
            PreflightErrorCode::CcipNotConfigured => "CCIP_NOT_CONFIGURED",
            PreflightErrorCode::LayerZeroNotConfigured => "LAYERZERO_NOT_CONFIGURED",
            PreflightErrorCode::FeeQuoteFailed => "FEE_QUOTE_FAILED",
        }
    }
}

/// Helper used by [`crate::probe`] to turn a raw view-call `bytes` return
/// into the hex string the snapshot reports.
pub fn hex_of(bytes: &Bytes) -> String {
    alloy_primitives::hex::encode_prefixed(bytes.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_strings_match_the_wire_vocabulary() {
        assert_eq!(PreflightErrorCode::None.as_str(), "");
        assert_eq!(
            PreflightErrorCode::AdapterNotRegistered.as_str(),
            "ADAPTER_NOT_REGISTERED"
        );
        assert_eq!(
            PreflightErrorCode::FeeQuoteFailed.as_str(),
            "FEE_QUOTE_FAILED"
        );
    }
}
