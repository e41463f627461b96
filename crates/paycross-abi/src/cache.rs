//! The concurrency-safe ABI cache (SPEC_FULL.md §4.2, §5, §8 property 2).
//!
//! Many-reader / occasional-writer: entries are immutable once inserted and
//! replaced atomically on update, so there is no locking needed on the read
//! path. Keyed by `(chainId, contractType)`.

use alloy_json_abi::JsonAbi;
use dashmap::DashMap;
use paycross_types::{ContractType, EntityId};
use std::sync::Arc;

/// A cached, fully-parsed ABI plus the contract address it was resolved
/// against, so `resolveABI` never has to re-hit the contract registry on a
/// cache hit (SPEC_FULL.md §8 property 2: "issue the DB fetch at most once").
#[derive(Debug, Clone)]
pub struct CachedAbi {
    pub abi: Arc<JsonAbi>,
    pub contract_address: String,
}

#[derive(Default)]
pub struct AbiCache {
    entries: DashMap<(EntityId, ContractType), CachedAbi>,
}

impl AbiCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, chain_id: EntityId, contract_type: ContractType) -> Option<CachedAbi> {
        self.entries.get(&(chain_id, contract_type)).map(|e| e.clone())
    }

    /// Inserts or atomically replaces the cached entry for this key.
    pub fn insert(&self, chain_id: EntityId, contract_type: ContractType, entry: CachedAbi) {
        self.entries.insert((chain_id, contract_type), entry);
    }

    /// Evicts every cached entry for a chain, used when the contract
    /// registry for that chain is updated (SPEC_FULL.md §3: "evicted only on
    /// contract registry update").
    pub fn evict_chain(&self, chain_id: EntityId) {
        self.entries.retain(|(id, _), _| *id != chain_id);
    }
}
