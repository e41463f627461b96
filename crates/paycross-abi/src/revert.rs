//! Revert Decoder (SPEC_FULL.md §4.5): a static `selector -> {name, formatter}`
//! table, no reflection.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{hex, keccak256};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A decoded EVM revert: the 4-byte selector that identified it, the
/// registered error name (or `"unknown"`), and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRevert {
    pub selector: String,
    pub name: String,
    pub message: String,
}

type Formatter = fn(&[DynSolValue]) -> String;

struct RevertSpec {
    name: &'static str,
    arg_types: Vec<DynSolType>,
    formatter: Formatter,
}

fn selector_of(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn format_error_string(args: &[DynSolValue]) -> String {
    args.first()
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn format_panic(args: &[DynSolValue]) -> String {
    let code = args
        .first()
        .and_then(|v| v.as_uint())
        .map(|(u, _bits)| u.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!("panic code: {code}")
}

fn format_route_not_configured(args: &[DynSolValue]) -> String {
    args.first().and_then(|v| v.as_str()).unwrap_or("").to_string()
}

fn format_insufficient_native_fee(args: &[DynSolValue]) -> String {
    let required = args
        .first()
        .and_then(|v| v.as_uint())
        .map(|(u, _)| u.to_string())
        .unwrap_or_default();
    let available = args
        .get(1)
        .and_then(|v| v.as_uint())
        .map(|(u, _)| u.to_string())
        .unwrap_or_default();
    format!("required {required}, available {available}")
}

static REGISTRY: Lazy<HashMap<[u8; 4], RevertSpec>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        [0x08, 0xc3, 0x79, 0xa0],
        RevertSpec {
            name: "Error",
            arg_types: vec![DynSolType::String],
            formatter: format_error_string,
        },
    );
    m.insert(
        [0x4e, 0x48, 0x7b, 0x71],
        RevertSpec {
            name: "Panic",
            arg_types: vec![DynSolType::Uint(256)],
            formatter: format_panic,
        },
    );
    m.insert(
        selector_of("RouteNotConfigured(string)"),
        RevertSpec {
            name: "RouteNotConfigured",
            arg_types: vec![DynSolType::String],
            formatter: format_route_not_configured,
        },
    );
    m.insert(
        selector_of("InsufficientNativeFee(uint256,uint256)"),
        RevertSpec {
            name: "InsufficientNativeFee",
            arg_types: vec![DynSolType::Uint(256), DynSolType::Uint(256)],
            formatter: format_insufficient_native_fee,
        },
    );
    m
});

/// Decodes raw revert data (4-byte selector + ABI-encoded args) against the
/// registered selector table. Unknown selectors decode to `{selector,
/// message: "execution_reverted"}` (SPEC_FULL.md §4.5).
pub fn decode(data: &[u8]) -> DecodedRevert {
    if data.len() < 4 {
        return DecodedRevert {
            selector: hex::encode_prefixed(data),
            name: "unknown".to_string(),
            message: "execution_reverted".to_string(),
        };
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&data[..4]);
    let selector_hex = hex::encode_prefixed(selector);
    let payload = &data[4..];

    match REGISTRY.get(&selector) {
        Some(spec) => {
            let decoded_tuple = DynSolType::Tuple(spec.arg_types.clone()).abi_decode_params(payload);
            match decoded_tuple {
                Ok(DynSolValue::Tuple(values)) => DecodedRevert {
                    selector: selector_hex,
                    name: spec.name.to_string(),
                    message: (spec.formatter)(&values),
                },
                _ => DecodedRevert {
                    selector: selector_hex,
                    name: spec.name.to_string(),
                    message: "execution_reverted".to_string(),
                },
            }
        }
        None => DecodedRevert {
            selector: selector_hex,
            name: "unknown".to_string(),
            message: "execution_reverted".to_string(),
        },
    }
}

static HEX_BLOB: Lazy<Regex> = Lazy::new(|| Regex::new(r"0x[0-9a-fA-F]{8,}").unwrap());

/// Extracts the first hex blob of length >= 10 (`"0x"` plus 8 hex digits,
/// i.e. at least a selector) from free-form RPC error text and decodes it.
/// Used when the RPC error has no structured `data` field (SPEC_FULL.md §4.5).
pub fn decode_from_error_text(text: &str) -> Option<DecodedRevert> {
    let matched = HEX_BLOB.find(text)?.as_str();
    let bytes = hex::decode(matched).ok()?;
    Some(decode(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_dyn_abi::DynSolValue;

    fn encode_error_string(message: &str) -> Vec<u8> {
        let mut out = [0x08u8, 0xc3, 0x79, 0xa0].to_vec();
        out.extend(DynSolValue::Tuple(vec![DynSolValue::String(message.to_string())]).abi_encode_params());
        out
    }

    #[test]
    fn decodes_error_string() {
        let data = encode_error_string("RouteNotConfigured");
        let decoded = decode(&data);
        assert_eq!(decoded.name, "Error");
        assert_eq!(decoded.message, "RouteNotConfigured");
        assert_eq!(decoded.selector, "0x08c379a0");
    }

    #[test]
    fn decodes_panic_code() {
        let mut data = [0x4e, 0x48, 0x7b, 0x71].to_vec();
        data.extend(DynSolValue::Tuple(vec![DynSolValue::Uint(
            alloy_primitives::U256::from(0x11u64),
            256,
        )])
        .abi_encode_params());
        let decoded = decode(&data);
        assert_eq!(decoded.name, "Panic");
        assert_eq!(decoded.message, "panic code: 17");
    }

    #[test]
    fn unknown_selector_falls_back_to_generic_message() {
        let data = [0xde, 0xad, 0xbe, 0xef];
        let decoded = decode(&data);
        assert_eq!(decoded.name, "unknown");
        assert_eq!(decoded.message, "execution_reverted");
        assert_eq!(decoded.selector, "0xdeadbeef");
    }

    #[test]
    fn extracts_revert_data_from_free_form_error_text() {
        let data = encode_error_string("boom");
        let text = format!("execution reverted: {}", hex::encode_prefixed(&data));
        let decoded = decode_from_error_text(&text).unwrap();
        assert_eq!(decoded.name, "Error");
        assert_eq!(decoded.message, "boom");
    }

    #[test]
    fn decodes_custom_registered_errors() {
        let mut data = selector_of("RouteNotConfigured(string)").to_vec();
        data.extend(
            DynSolValue::Tuple(vec![DynSolValue::String("no route".to_string())]).abi_encode_params(),
        );
        let decoded = decode(&data);
        assert_eq!(decoded.name, "RouteNotConfigured");
        assert_eq!(decoded.message, "no route");
    }
}
