//! ABI Cache & Fallback Resolver orchestration (SPEC_FULL.md §4.2).
//!
//! The source embeds this resolver as a mixin into every component that
//! needs ABIs; §9 asks for it to be a shared service held by each consumer
//! instead. [`AbiResolver`] is that service — constructed once, handed to
//! the Probe and Quote Engine as `Arc<AbiResolver>`.

use alloy_json_abi::JsonAbi;
use paycross_repo::SmartContractRepository;
use paycross_types::{ContractType, EntityId};
use std::sync::Arc;

use crate::cache::{AbiCache, CachedAbi};
use crate::canonical::{has_method, PlatformAbis};
use crate::error::AbiError;

/// Whether a parsed ABI counts as "complete" for `contract_type`: has the
/// sentinel method if one is required, or has any function at all otherwise
/// (SPEC_FULL.md §4.2).
fn abi_is_complete(abi: &JsonAbi, contract_type: ContractType) -> bool {
    match contract_type.sentinel_method() {
        Some(sentinel) => has_method(abi, sentinel),
        None => !abi.functions.is_empty(),
    }
}

pub struct AbiResolver {
    contracts: Arc<dyn SmartContractRepository>,
    cache: AbiCache,
    platform_abis: PlatformAbis,
}

impl AbiResolver {
    pub fn new(contracts: Arc<dyn SmartContractRepository>, platform_abis: PlatformAbis) -> Self {
        Self {
            contracts,
            cache: AbiCache::new(),
            platform_abis,
        }
    }

    /// `resolveABI(chainId, contractType) -> (parsedABI, contractAddress)`.
    #[tracing::instrument(skip(self), err)]
    pub async fn resolve_abi(
        &self,
        chain_id: EntityId,
        contract_type: ContractType,
    ) -> Result<(Arc<JsonAbi>, String), AbiError> {
        if let Some(cached) = self.cache.get(chain_id, contract_type) {
            return Ok((cached.abi, cached.contract_address));
        }

        let contract = self
            .contracts
            .get_active_contract(chain_id, contract_type)
            .await?;

        let abi = match &contract.abi {
            Some(json) => {
                let parsed: JsonAbi = serde_json::from_str(json)
                    .map_err(|err| AbiError::InvalidInput(err.to_string()))?;
                if abi_is_complete(&parsed, contract_type) {
                    Arc::new(parsed)
                } else {
                    tracing::warn!(
                        %chain_id,
                        %contract_type,
                        sentinel = contract_type.sentinel_method().unwrap_or("<any>"),
                        "registry ABI is missing its sentinel method; falling back to canonical ABI"
                    );
                    self.platform_abis.for_contract_type(contract_type)
                }
            }
            None => {
                tracing::warn!(%chain_id, %contract_type, "registry contract has no ABI; falling back to canonical ABI");
                self.platform_abis.for_contract_type(contract_type)
            }
        };

        self.cache.insert(
            chain_id,
            contract_type,
            CachedAbi {
                abi: abi.clone(),
                contract_address: contract.address.clone(),
            },
        );

        Ok((abi, contract.address))
    }

    /// `resolveABIWithFallback(...) -> parsedABI`, discarding the address.
    pub async fn resolve_abi_with_fallback(
        &self,
        chain_id: EntityId,
        contract_type: ContractType,
    ) -> Result<Arc<JsonAbi>, AbiError> {
        self.resolve_abi(chain_id, contract_type)
            .await
            .map(|(abi, _address)| abi)
    }

    pub fn evict_chain(&self, chain_id: EntityId) {
        self.cache.evict_chain(chain_id);
    }
}
