//! The generic typed view-call helper (SPEC_FULL.md §4.3): pack args against
//! an ABI function, issue `eth_call`, unpack the typed result. Shared by the
//! Quote Engine's own Router calls and, via re-export, by the Adapter Probe's
//! Gateway/Router/adapter calls — one packing/unpacking path for both.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes};
use std::str::FromStr;

use paycross_chain::EvmRpcClient;

/// Failure of a single typed view call. Distinct from [`crate::error::QuoteError`]
/// so callers can tell an empty (`0x`) result — which §4.4 step 4 treats as
/// "fall through to the legacy method", not a hard failure — apart from a
/// genuine pack/call/decode failure.
#[derive(Debug, thiserror::Error)]
pub enum ViewCallError {
    #[error("failed to pack arguments for {0:?}: {1}")]
    Pack(String, String),
    #[error("rpc call failed: {0}")]
    Call(String),
    /// The call returned `0x`. Not automatically an error: some callers
    /// (legacy-fallback probing) treat this as "method unsupported".
    #[error("contract returned an empty result")]
    Empty,
    #[error("failed to decode return value: {0}")]
    Decode(String),
}

/// Packs `args` against `abi`'s `function_name` overload, calls `address` on
/// `client`, and unpacks the result against the function's declared outputs.
pub async fn call_view(
    client: &dyn EvmRpcClient,
    abi: &JsonAbi,
    address: &str,
    function_name: &str,
    args: Vec<DynSolValue>,
) -> Result<Vec<DynSolValue>, ViewCallError> {
    let function = abi
        .function(function_name)
        .and_then(|overloads| overloads.first())
        .ok_or_else(|| {
            ViewCallError::Pack(function_name.to_string(), "function not found in ABI".into())
        })?;

    let to = Address::from_str(address)
        .map_err(|err| ViewCallError::Pack(function_name.to_string(), err.to_string()))?;

    let selector = function.selector();
    let mut data = Vec::with_capacity(4 + args.len() * 32);
    data.extend_from_slice(selector.as_slice());
    data.extend_from_slice(&DynSolValue::Tuple(args).abi_encode_params());

    let result = client
        .eth_call(to, Bytes::from(data))
        .await
        .map_err(|err| ViewCallError::Call(err.to_string()))?;

    if result.is_empty() {
        return Err(ViewCallError::Empty);
    }

    let output_types = function
        .outputs
        .iter()
        .map(|param| {
            DynSolType::parse(&param.ty)
                .map_err(|err| ViewCallError::Decode(format!("{}: {err}", param.ty)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match DynSolType::Tuple(output_types).abi_decode_params(&result) {
        Ok(DynSolValue::Tuple(values)) => Ok(values),
        Ok(other) => Ok(vec![other]),
        Err(err) => Err(ViewCallError::Decode(err.to_string())),
    }
}

/// Helpers for pulling a typed value out of a decoded output tuple by index,
/// used throughout the Quote Engine and Probe to avoid repeating `.get(n)`
/// match arms at every call site.
pub fn bool_at(values: &[DynSolValue], index: usize) -> Option<bool> {
    values.get(index).and_then(|v| v.as_bool())
}

pub fn address_at(values: &[DynSolValue], index: usize) -> Option<Address> {
    values.get(index).and_then(|v| v.as_address())
}

pub fn uint_at(values: &[DynSolValue], index: usize) -> Option<alloy_primitives::U256> {
    values.get(index).and_then(|v| v.as_uint()).map(|(u, _bits)| u)
}

pub fn string_at(values: &[DynSolValue], index: usize) -> Option<String> {
    values.get(index).and_then(|v| v.as_str()).map(|s| s.to_string())
}

pub fn bytes_at(values: &[DynSolValue], index: usize) -> Option<Bytes> {
    values
        .get(index)
        .and_then(|v| v.as_fixed_bytes().map(|(b, _)| Bytes::copy_from_slice(b)).or_else(|| v.as_bytes().map(Bytes::copy_from_slice)))
}
