//! The ABI-encoded fee-quote message (SPEC_FULL.md §4.4):
//! `tuple(bytes32 paymentId, address receiver, address sourceToken, address
//! destToken, uint256 amount, string destChainId, uint256 minAmountOut)`.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use std::str::FromStr;

/// The provisional quote message passed to `quotePaymentFeeSafe` /
/// `quotePaymentFee`. At quote time a payment row does not exist yet (quoting
/// happens before the Coordinator's unit-of-work in the control flow, SPEC_FULL.md
/// §2), so `payment_id` is the caller-supplied provisional id (zero if none
/// has been minted yet) rather than a persisted row's id.
#[derive(Debug, Clone)]
pub struct FeeQuoteMessage {
    pub payment_id: [u8; 32],
    pub receiver: Address,
    pub source_token: Address,
    pub dest_token: Address,
    pub amount: U256,
    pub dest_chain_id: String,
    pub min_amount_out: U256,
}

impl FeeQuoteMessage {
    /// ABI-encodes the message tuple (`abi_encode_params`, matching the
    /// `bytes message` argument shape Router expects, not a top-level call).
    pub fn encode(&self) -> Bytes {
        let tuple = DynSolValue::Tuple(vec![
            DynSolValue::FixedBytes(FixedBytes::<32>::from(self.payment_id), 32),
            DynSolValue::Address(self.receiver),
            DynSolValue::Address(self.source_token),
            DynSolValue::Address(self.dest_token),
            DynSolValue::Uint(self.amount, 256),
            DynSolValue::String(self.dest_chain_id.clone()),
            DynSolValue::Uint(self.min_amount_out, 256),
        ]);
        Bytes::from(tuple.abi_encode_params())
    }
}

/// Normalizes a token address string for on-wire use: empty, `"native"`, and
/// anything that doesn't parse as a hex address all collapse to the zero
/// address (SPEC_FULL.md §4.4).
pub fn normalize_token_address(token: &str) -> Address {
    let trimmed = token.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("native") {
        return Address::ZERO;
    }
    Address::from_str(trimmed).unwrap_or(Address::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_empty_and_native_and_garbage_to_zero_address() {
        assert_eq!(normalize_token_address(""), Address::ZERO);
        assert_eq!(normalize_token_address("native"), Address::ZERO);
        assert_eq!(normalize_token_address("NATIVE"), Address::ZERO);
        assert_eq!(normalize_token_address("not-hex"), Address::ZERO);
    }

    #[test]
    fn parses_a_valid_hex_address() {
        let addr = normalize_token_address("0x00000000000000000000000000000000001234");
        assert_ne!(addr, Address::ZERO);
    }

    #[test]
    fn encodes_message_to_a_nonempty_byte_string() {
        let message = FeeQuoteMessage {
            payment_id: [0u8; 32],
            receiver: Address::ZERO,
            source_token: Address::ZERO,
            dest_token: Address::ZERO,
            amount: U256::from(1000u64),
            dest_chain_id: "eip155:8453".to_string(),
            min_amount_out: U256::ZERO,
        };
        let encoded = message.encode();
        assert!(!encoded.is_empty());
    }
}
