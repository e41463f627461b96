//! Process-embedded canonical ABIs (SPEC_FULL.md §4.2).
//!
//! The source swaps process-wide mutable ABI constants in its tests. §9's
//! "Module-level mutable ABI variables for testing" design note asks us to
//! replace that with a [`PlatformAbis`] value injected at construction
//! instead — the concurrent cache contract (see [`crate::cache`]) stays
//! independent of how the fallback ABIs themselves are supplied.

use alloy_json_abi::JsonAbi;
use once_cell::sync::Lazy;
use paycross_types::ContractType;
use std::sync::Arc;

use crate::error::AbiError;

const GATEWAY_ABI_JSON: &str = r#"[
  {"type":"function","name":"defaultBridgeTypes","stateMutability":"view",
   "inputs":[{"name":"destChainId","type":"string"}],
   "outputs":[{"name":"","type":"uint8"}]},
  {"type":"function","name":"gatewayVault","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"address"}]},
  {"type":"function","name":"createPayment","stateMutability":"nonpayable",
   "inputs":[
     {"name":"destChainId","type":"bytes"},
     {"name":"receiver","type":"bytes"},
     {"name":"sourceToken","type":"address"},
     {"name":"destToken","type":"address"},
     {"name":"amount","type":"uint256"}
   ], "outputs":[]},
  {"type":"function","name":"createPaymentWithSlippage","stateMutability":"nonpayable",
   "inputs":[
     {"name":"destChainId","type":"bytes"},
     {"name":"receiver","type":"bytes"},
     {"name":"sourceToken","type":"address"},
     {"name":"destToken","type":"address"},
     {"name":"amount","type":"uint256"},
     {"name":"minAmountOut","type":"uint256"}
   ], "outputs":[]},
  {"type":"function","name":"payRequest","stateMutability":"nonpayable",
   "inputs":[{"name":"requestId","type":"bytes32"}], "outputs":[]}
]"#;

const ROUTER_ABI_JSON: &str = r#"[
  {"type":"function","name":"hasAdapter","stateMutability":"view",
   "inputs":[{"name":"destChainId","type":"string"},{"name":"bridgeType","type":"uint8"}],
   "outputs":[{"name":"","type":"bool"}]},
  {"type":"function","name":"getAdapter","stateMutability":"view",
   "inputs":[{"name":"destChainId","type":"string"},{"name":"bridgeType","type":"uint8"}],
   "outputs":[{"name":"","type":"address"}]},
  {"type":"function","name":"isRouteConfigured","stateMutability":"view",
   "inputs":[{"name":"destChainId","type":"string"},{"name":"bridgeType","type":"uint8"}],
   "outputs":[{"name":"","type":"bool"}]},
  {"type":"function","name":"quotePaymentFeeSafe","stateMutability":"view",
   "inputs":[
     {"name":"destChainId","type":"string"},
     {"name":"bridgeType","type":"uint8"},
     {"name":"message","type":"bytes"}
   ],
   "outputs":[
     {"name":"ok","type":"bool"},
     {"name":"fee","type":"uint256"},
     {"name":"reason","type":"string"}
   ]},
  {"type":"function","name":"quotePaymentFee","stateMutability":"view",
   "inputs":[
     {"name":"destChainId","type":"string"},
     {"name":"bridgeType","type":"uint8"},
     {"name":"message","type":"bytes"}
   ],
   "outputs":[{"name":"","type":"uint256"}]}
]"#;

const ADAPTER_HYPERBRIDGE_ABI_JSON: &str = r#"[
  {"type":"function","name":"setStateMachineId","stateMutability":"nonpayable",
   "inputs":[{"name":"stateMachineId","type":"bytes32"}], "outputs":[]},
  {"type":"function","name":"isConfigured","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"bool"}]},
  {"type":"function","name":"stateMachineId","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"bytes32"}]},
  {"type":"function","name":"destinationContract","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"address"}]}
]"#;

const ADAPTER_CCIP_ABI_JSON: &str = r#"[
  {"type":"function","name":"setChainSelector","stateMutability":"nonpayable",
   "inputs":[{"name":"chainSelector","type":"uint64"}], "outputs":[]},
  {"type":"function","name":"chainSelector","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"uint64"}]},
  {"type":"function","name":"destinationAdapter","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"address"}]}
]"#;

const ADAPTER_LAYERZERO_ABI_JSON: &str = r#"[
  {"type":"function","name":"setRoute","stateMutability":"nonpayable",
   "inputs":[
     {"name":"dstEid","type":"uint32"},
     {"name":"peer","type":"bytes32"},
     {"name":"options","type":"bytes"}
   ], "outputs":[]},
  {"type":"function","name":"isConfigured","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"bool"}]},
  {"type":"function","name":"dstEid","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"uint32"}]},
  {"type":"function","name":"peer","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"bytes32"}]},
  {"type":"function","name":"options","stateMutability":"view",
   "inputs":[], "outputs":[{"name":"","type":"bytes"}]}
]"#;

const VAULT_ABI_JSON: &str = r#"[
  {"type":"function","name":"approve","stateMutability":"nonpayable",
   "inputs":[{"name":"spender","type":"address"},{"name":"amount","type":"uint256"}],
   "outputs":[{"name":"","type":"bool"}]}
]"#;

fn parse(json: &str) -> JsonAbi {
    serde_json::from_str(json).expect("canonical ABI literal is valid JSON-ABI")
}

static CANONICAL_GATEWAY: Lazy<Arc<JsonAbi>> = Lazy::new(|| Arc::new(parse(GATEWAY_ABI_JSON)));
static CANONICAL_ROUTER: Lazy<Arc<JsonAbi>> = Lazy::new(|| Arc::new(parse(ROUTER_ABI_JSON)));
static CANONICAL_ADAPTER_HYPERBRIDGE: Lazy<Arc<JsonAbi>> =
    Lazy::new(|| Arc::new(parse(ADAPTER_HYPERBRIDGE_ABI_JSON)));
static CANONICAL_ADAPTER_CCIP: Lazy<Arc<JsonAbi>> =
    Lazy::new(|| Arc::new(parse(ADAPTER_CCIP_ABI_JSON)));
static CANONICAL_ADAPTER_LAYERZERO: Lazy<Arc<JsonAbi>> =
    Lazy::new(|| Arc::new(parse(ADAPTER_LAYERZERO_ABI_JSON)));
static CANONICAL_VAULT: Lazy<Arc<JsonAbi>> = Lazy::new(|| Arc::new(parse(VAULT_ABI_JSON)));

/// The set of built-in canonical ABIs, one per [`ContractType`]. Constructed
/// once from the embedded JSON literals above via [`PlatformAbis::builtin`];
/// tests construct their own variant to exercise the fallback path without
/// touching process-wide state.
#[derive(Debug, Clone)]
pub struct PlatformAbis {
    gateway: Arc<JsonAbi>,
    router: Arc<JsonAbi>,
    adapter_hyperbridge: Arc<JsonAbi>,
    adapter_ccip: Arc<JsonAbi>,
    adapter_layerzero: Arc<JsonAbi>,
    vault: Arc<JsonAbi>,
}

impl PlatformAbis {
    /// The real, process-embedded canonical ABI set.
    pub fn builtin() -> Self {
        Self {
            gateway: CANONICAL_GATEWAY.clone(),
            router: CANONICAL_ROUTER.clone(),
            adapter_hyperbridge: CANONICAL_ADAPTER_HYPERBRIDGE.clone(),
            adapter_ccip: CANONICAL_ADAPTER_CCIP.clone(),
            adapter_layerzero: CANONICAL_ADAPTER_LAYERZERO.clone(),
            vault: CANONICAL_VAULT.clone(),
        }
    }

    pub fn for_contract_type(&self, contract_type: ContractType) -> Arc<JsonAbi> {
        match contract_type {
            ContractType::Gateway => self.gateway.clone(),
            ContractType::Router => self.router.clone(),
            ContractType::AdapterHyperbridge => self.adapter_hyperbridge.clone(),
            ContractType::AdapterCcip => self.adapter_ccip.clone(),
            ContractType::AdapterLayerZero => self.adapter_layerzero.clone(),
            ContractType::Vault => self.vault.clone(),
        }
    }

    /// Parses `json` as the fallback ABI for one contract type; used by
    /// tests that want a fallback variant other than [`builtin`](Self::builtin).
    pub fn with_override(
        mut self,
        contract_type: ContractType,
        json: &str,
    ) -> Result<Self, AbiError> {
        let parsed = Arc::new(
            serde_json::from_str::<JsonAbi>(json)
                .map_err(|err| AbiError::InvalidInput(err.to_string()))?,
        );
        match contract_type {
            ContractType::Gateway => self.gateway = parsed,
            ContractType::Router => self.router = parsed,
            ContractType::AdapterHyperbridge => self.adapter_hyperbridge = parsed,
            ContractType::AdapterCcip => self.adapter_ccip = parsed,
            ContractType::AdapterLayerZero => self.adapter_layerzero = parsed,
            ContractType::Vault => self.vault = parsed,
        }
        Ok(self)
    }
}

/// Whether `abi` declares at least one function overload named `name`.
pub fn has_method(abi: &JsonAbi, name: &str) -> bool {
    abi.function(name).map(|fns| !fns.is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_abis_expose_their_sentinel_methods() {
        let abis = PlatformAbis::builtin();
        assert!(has_method(
            &abis.for_contract_type(ContractType::AdapterHyperbridge),
            "setStateMachineId"
        ));
        assert!(has_method(
            &abis.for_contract_type(ContractType::AdapterCcip),
            "setChainSelector"
        ));
        assert!(has_method(
            &abis.for_contract_type(ContractType::AdapterLayerZero),
            "setRoute"
        ));
        assert!(!has_method(
            &abis.for_contract_type(ContractType::Gateway),
            "doesNotExist"
        ));
    }
}
