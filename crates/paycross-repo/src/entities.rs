//! Persisted entities the repository contracts read and write (SPEC_FULL.md §3).
//!
//! These are plain data structs; the repository traits in [`crate::repos`] are
//! the only contract the orchestrator core has with a persistence driver —
//! how these are actually stored is out of scope (§1).

use paycross_types::{
    BridgeType, Caip2, ChainType, ContractType, EntityId, FallbackMode, PaymentEventType,
    PaymentRequestStatus, PaymentStatus, UnixTimestamp,
};

/// A single RPC endpoint on a [`Chain`], in the order they should be tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    pub url: String,
    pub active: bool,
}

/// `Chain` (SPEC_FULL.md §3): `caip2 = chainType.namespace + ":" + chainRef` is
/// deterministic and unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: EntityId,
    pub chain_type: ChainType,
    pub chain_ref: String,
    pub rpc_endpoints: Vec<RpcEndpoint>,
}

impl Chain {
    pub fn caip2(&self) -> Caip2 {
        Caip2::for_chain(self.chain_type, &self.chain_ref)
    }

    /// Active endpoints, in the stored order — the order the RPC client pool
    /// must walk for its ranked failover (SPEC_FULL.md §2.3).
    pub fn active_endpoints(&self) -> impl Iterator<Item = &RpcEndpoint> {
        self.rpc_endpoints.iter().filter(|e| e.active)
    }
}

/// `SmartContract` (SPEC_FULL.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartContract {
    pub id: EntityId,
    pub chain_id: EntityId,
    pub contract_type: ContractType,
    pub address: String,
    pub abi: Option<String>,
    pub is_active: bool,
}

/// `RoutePolicy` (SPEC_FULL.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    pub source_chain_id: EntityId,
    pub dest_chain_id: EntityId,
    pub default_bridge_type: u8,
    pub fallback_mode: FallbackMode,
    pub fallback_order: Vec<u8>,
}

/// `FeeConfig` resolved by `FeeConfigRepository::getByChainAndToken` — decimal
/// strings on the wire, per SPEC_FULL.md §6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeConfig {
    pub fixed_base_fee: String,
    pub platform_fee_percent: String,
    pub min_fee: String,
    pub max_fee: Option<String>,
}

/// `Payment` (SPEC_FULL.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: EntityId,
    pub source_chain_id: EntityId,
    pub dest_chain_id: EntityId,
    pub source_token: String,
    pub dest_token: String,
    pub source_amount: u128,
    pub fee_amount: u128,
    pub total_charged: u128,
    pub receiver: String,
    pub bridge_id: Option<BridgeType>,
    pub status: PaymentStatus,
    pub created_at: UnixTimestamp,
}

impl Payment {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// `PaymentEvent` (SPEC_FULL.md §3): append-only, ordered by `createdAt`
/// within a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEvent {
    pub id: EntityId,
    pub payment_id: EntityId,
    pub event_type: PaymentEventType,
    pub chain_id: Option<EntityId>,
    pub created_at: UnixTimestamp,
}

/// `PaymentRequest` (SPEC_FULL.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub id: EntityId,
    pub merchant_id: EntityId,
    pub wallet_address: String,
    pub chain_id: EntityId,
    pub network_id: Caip2,
    pub token_address: String,
    pub amount: u128,
    pub decimals: u8,
    pub status: PaymentRequestStatus,
    pub expires_at: UnixTimestamp,
}

impl PaymentRequest {
    pub fn is_overdue(&self, now: UnixTimestamp) -> bool {
        matches!(self.status, PaymentRequestStatus::Pending) && now.0 >= self.expires_at.0
    }
}

/// `ApiKey` (SPEC_FULL.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub id: EntityId,
    pub user_id: EntityId,
    pub key_hash: String,
    pub secret_encrypted: String,
    pub secret_masked: String,
    pub is_active: bool,
    pub last_used_at: Option<UnixTimestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(chain_type: ChainType, chain_ref: &str) -> Chain {
        Chain {
            id: EntityId::from_u128(1),
            chain_type,
            chain_ref: chain_ref.to_string(),
            rpc_endpoints: vec![
                RpcEndpoint {
                    url: "https://rpc-1.example".into(),
                    active: true,
                },
                RpcEndpoint {
                    url: "https://rpc-2.example".into(),
                    active: false,
                },
            ],
        }
    }

    #[test]
    fn chain_caip2_is_deterministic() {
        let c = chain(ChainType::Evm, "8453");
        assert_eq!(c.caip2().to_string(), "eip155:8453");
    }

    #[test]
    fn active_endpoints_filters_inactive() {
        let c = chain(ChainType::Svm, "devnet");
        let active: Vec<_> = c.active_endpoints().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].url, "https://rpc-1.example");
    }

    #[test]
    fn payment_request_overdue_only_when_pending_and_expired() {
        let mut request = PaymentRequest {
            id: EntityId::from_u128(1),
            merchant_id: EntityId::from_u128(2),
            wallet_address: "0xabc".into(),
            chain_id: EntityId::from_u128(3),
            network_id: Caip2::new("eip155", "8453"),
            token_address: "0xtoken".into(),
            amount: 1_000,
            decimals: 6,
            status: PaymentRequestStatus::Pending,
            expires_at: UnixTimestamp(1_000),
        };
        assert!(request.is_overdue(UnixTimestamp(1_000)));
        assert!(!request.is_overdue(UnixTimestamp(999)));
        request.status = PaymentRequestStatus::Completed;
        assert!(!request.is_overdue(UnixTimestamp(2_000)));
    }
}
