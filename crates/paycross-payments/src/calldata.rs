//! EVM calldata building for the payment-creation transaction set
//! (SPEC_FULL.md §4.6 step 6).
//!
//! `createPayment(bytes,bytes,address,address,uint256)` is called when no
//! minimum-out is requested; `createPaymentWithSlippage(bytes,bytes,address,
//! address,uint256,uint256)` is used once `minAmountOut > 0`. Both selectors
//! are given directly by the wire contract rather than derived, so they're
//! recorded here as the literal 4-byte values; `approve`'s selector is the
//! one case we derive from its signature, since ERC-20 `approve` is a fixed
//! well-known interface rather than this system's own ABI surface.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{keccak256, Address, Bytes, U256};
use std::str::FromStr;

use crate::error::PaymentError;

pub const CREATE_PAYMENT_SELECTOR: [u8; 4] = [0x83, 0xf7, 0xca, 0xe3];
pub const CREATE_PAYMENT_WITH_SLIPPAGE_SELECTOR: [u8; 4] = [0xb2, 0x8c, 0x3d, 0x9b];

/// A single transaction the caller must submit, in the order the Coordinator
/// emits them (an `approve` ahead of the payment call, when one is needed).
#[derive(Debug, Clone)]
pub struct EvmCall {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

fn approve_selector() -> [u8; 4] {
    let hash = keccak256("approve(address,uint256)".as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Decodes a receiver string into raw bytes: a 20-byte EVM address iff the
/// string is `0x`-prefixed 40 hex characters, otherwise treated as a raw
/// (non-EVM, e.g. Solana) recipient — base58-decoded if it parses that way,
/// else passed through as UTF-8 bytes (SPEC_FULL.md §4.6 step 6).
pub fn decode_receiver_bytes(receiver: &str) -> Vec<u8> {
    let trimmed = receiver.trim();
    if let Some(hex_part) = trimmed.strip_prefix("0x") {
        if hex_part.len() == 40 {
            if let Ok(bytes) = alloy_primitives::hex::decode(hex_part) {
                return bytes;
            }
        }
    }
    if let Ok(bytes) = bs58::decode(trimmed).into_vec() {
        if !bytes.is_empty() {
            return bytes;
        }
    }
    trimmed.as_bytes().to_vec()
}

fn parse_address(label: &str, value: &str) -> Result<Address, PaymentError> {
    Address::from_str(value.trim())
        .map_err(|err| PaymentError::InvalidInput(format!("{label} is not a valid address: {err}")))
}

/// Builds the `createPayment` / `createPaymentWithSlippage` calldata, picking
/// the selector by whether `min_amount_out` is non-zero.
pub fn build_create_payment_call(
    gateway_address: &str,
    dest_chain_id: &str,
    receiver: &str,
    source_token: &str,
    dest_token: &str,
    amount: U256,
    min_amount_out: U256,
    native_value: U256,
) -> Result<EvmCall, PaymentError> {
    let to = parse_address("gatewayAddress", gateway_address)?;
    let source_token = parse_address("sourceToken", source_token)?;
    let dest_token = parse_address("destToken", dest_token)?;
    let receiver_bytes = decode_receiver_bytes(receiver);
    let dest_chain_bytes = dest_chain_id.as_bytes().to_vec();

    let mut args = vec![
        DynSolValue::Bytes(dest_chain_bytes),
        DynSolValue::Bytes(receiver_bytes),
        DynSolValue::Address(source_token),
        DynSolValue::Address(dest_token),
        DynSolValue::Uint(amount, 256),
    ];
    let selector = if min_amount_out > U256::ZERO {
        args.push(DynSolValue::Uint(min_amount_out, 256));
        CREATE_PAYMENT_WITH_SLIPPAGE_SELECTOR
    } else {
        CREATE_PAYMENT_SELECTOR
    };

    let mut data = Vec::with_capacity(4 + args.len() * 32);
    data.extend_from_slice(&selector);
    data.extend_from_slice(&DynSolValue::Tuple(args).abi_encode_params());

    Ok(EvmCall {
        to,
        data: Bytes::from(data),
        value: native_value,
    })
}

/// Builds the `approve(spender, amount)` call that must precede
/// `createPayment` whenever the source token is non-native and the gateway
/// does not already hold sufficient allowance (SPEC_FULL.md §4.6 step 6).
pub fn build_approve_call(token_address: &str, spender: &str, amount: U256) -> Result<EvmCall, PaymentError> {
    let to = parse_address("sourceToken", token_address)?;
    let spender = parse_address("vaultAddress", spender)?;

    let args = vec![DynSolValue::Address(spender), DynSolValue::Uint(amount, 256)];
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&approve_selector());
    data.extend_from_slice(&DynSolValue::Tuple(args).abi_encode_params());

    Ok(EvmCall {
        to,
        data: Bytes::from(data),
        value: U256::ZERO,
    })
}
