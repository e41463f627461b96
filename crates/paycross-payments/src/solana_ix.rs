//! Anchor instruction-data encoding for Solana-sourced payments
//! (SPEC_FULL.md §4.6 step 6).
//!
//! Anchor instruction data is `discriminator ++ borsh(args)`: the
//! discriminator is the first 8 bytes of `sha256("global:" + methodName)`,
//! and Anchor (borsh) strings are length-prefixed with a little-endian
//! `u32` rather than null-terminated. The encoded instruction is returned
//! base58, the wire format Solana transactions expect.

use paycross_types::EntityId;
use sha2::{Digest, Sha256};

fn anchor_discriminator(method_name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(format!("global:{method_name}").as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Decodes an address-shaped string into a 32-byte field: a base58 Solana
/// pubkey is used as-is, a `0x`-prefixed 20-byte EVM address is right-aligned
/// (left-padded with zeros) into the 32 bytes, and anything else is
/// truncated-or-padded to exactly 32 bytes so the instruction always has a
/// fixed-width field.
pub fn to_32_bytes(input: &str) -> [u8; 32] {
    let trimmed = input.trim();
    if let Some(hex_part) = trimmed.strip_prefix("0x") {
        if hex_part.len() == 40 {
            if let Ok(bytes) = alloy_primitives::hex::decode(hex_part) {
                let mut out = [0u8; 32];
                out[12..].copy_from_slice(&bytes);
                return out;
            }
        }
    }
    if let Ok(bytes) = bs58::decode(trimmed).into_vec() {
        if bytes.len() == 32 {
            let mut out = [0u8; 32];
            out.copy_from_slice(&bytes);
            return out;
        }
    }
    let raw = trimmed.as_bytes();
    let mut out = [0u8; 32];
    let len = raw.len().min(32);
    out[..len].copy_from_slice(&raw[..len]);
    out
}

fn anchor_string(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(4 + bytes.len());
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
    out
}

/// Builds the base58-encoded `create_payment` Anchor instruction: `discriminator
/// ++ paymentId(32) ++ anchorString(destChainId) ++ destToken(32) ++
/// amount(u64 LE) ++ receiver(32)`.
pub fn build_create_payment_instruction(
    payment_id: EntityId,
    dest_chain_id: &str,
    dest_token: &str,
    amount: u64,
    receiver: &str,
) -> String {
    let mut data = Vec::new();
    data.extend_from_slice(&anchor_discriminator("create_payment"));

    let mut payment_id_bytes = [0u8; 32];
    payment_id_bytes[16..].copy_from_slice(&payment_id.0.to_be_bytes());
    data.extend_from_slice(&payment_id_bytes);

    data.extend_from_slice(&anchor_string(dest_chain_id));
    data.extend_from_slice(&to_32_bytes(dest_token));
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend_from_slice(&to_32_bytes(receiver));

    bs58::encode(data).into_string()
}
