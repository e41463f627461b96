//! The Bridge Quote & Fallback Engine (SPEC_FULL.md §4.4).

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;
use std::sync::Arc;

use paycross_abi::AbiResolver;
use paycross_chain::RpcClientPool;
use paycross_repo::{ChainRepository, RoutePolicyRepository};
use paycross_types::{BridgeType, ContractType, EntityId};

use crate::error::{BridgeDiagnostic, QuoteError};
use crate::message::FeeQuoteMessage;
use crate::policy::build_bridge_order;
use crate::view::{self, ViewCallError};

/// The result of a successful fee quote: which bridge type answered, the
/// fee it quoted, and the diagnostics recorded for any bridge types that
/// were tried and skipped before it.
#[derive(Debug, Clone)]
pub struct QuoteOutcome {
    pub bridge_type: BridgeType,
    pub fee: U256,
    pub skipped: Vec<BridgeDiagnostic>,
}

pub struct QuoteEngine {
    chains: Arc<dyn ChainRepository>,
    route_policies: Arc<dyn RoutePolicyRepository>,
    abi_resolver: Arc<AbiResolver>,
    rpc_pool: Arc<RpcClientPool>,
}

impl QuoteEngine {
    pub fn new(
        chains: Arc<dyn ChainRepository>,
        route_policies: Arc<dyn RoutePolicyRepository>,
        abi_resolver: Arc<AbiResolver>,
        rpc_pool: Arc<RpcClientPool>,
    ) -> Self {
        Self {
            chains,
            route_policies,
            abi_resolver,
            rpc_pool,
        }
    }

    /// `getBridgeFeeQuote(source, dest, sourceToken, destToken, amount,
    /// minOut) -> fee` (SPEC_FULL.md §4.4).
    ///
    /// `payment_id` and `receiver` feed the quote `message`; at quote time no
    /// payment row exists yet, so callers pass whatever provisional id/receiver
    /// the in-flight `createPayment` call is using.
    #[tracing::instrument(skip(self, message), err)]
    pub async fn get_bridge_fee_quote(
        &self,
        source_chain_id: EntityId,
        dest_chain_id: EntityId,
        message: FeeQuoteMessage,
    ) -> Result<QuoteOutcome, QuoteError> {
        let source_chain = self.chains.get_by_id(source_chain_id).await?;
        let dest_chain = self.chains.get_by_id(dest_chain_id).await?;
        let dest_caip2 = dest_chain.caip2().to_string();

        let policy = self
            .route_policies
            .get_by_route(source_chain_id, dest_chain_id)
            .await?;
        let order = build_bridge_order(policy.as_ref());

        let (router_abi, router_address) = self
            .abi_resolver
            .resolve_abi(source_chain_id, ContractType::Router)
            .await?;
        let client = self.rpc_pool.client_for_chain(&source_chain)?;

        let mut skipped = Vec::with_capacity(order.len());
        for bridge_type in order {
            match self
                .quote_bridge_fee_by_type(
                    client.as_ref(),
                    &router_abi,
                    &router_address,
                    &dest_caip2,
                    bridge_type,
                    &message,
                )
                .await
            {
                Ok(fee) => {
                    return Ok(QuoteOutcome {
                        bridge_type,
                        fee,
                        skipped,
                    })
                }
                Err(diagnostic) => {
                    tracing::debug!(%bridge_type, reason = %diagnostic.reason, "bridge quote attempt skipped");
                    skipped.push(diagnostic);
                }
            }
        }

        tracing::warn!(attempted = skipped.len(), "every bridge in the fallback order failed to quote a usable fee");
        Err(QuoteError::InvalidFeeQuote { diagnostics: skipped })
    }

    /// Quotes a single, caller-chosen bridge type directly, skipping policy
    /// resolution and the fallback walk. Used by the Adapter Probe to derive
    /// `policyExecutable` (SPEC_FULL.md §4.3), which needs "the fee quote for
    /// the default bridge" specifically, not a fallback-adjusted one.
    #[tracing::instrument(skip(self, message), err)]
    pub async fn quote_fee_for_bridge(
        &self,
        source_chain_id: EntityId,
        dest_chain_id: EntityId,
        bridge_type: BridgeType,
        message: &FeeQuoteMessage,
    ) -> Result<U256, QuoteError> {
        let source_chain = self.chains.get_by_id(source_chain_id).await?;
        let dest_chain = self.chains.get_by_id(dest_chain_id).await?;
        let dest_caip2 = dest_chain.caip2().to_string();

        let (router_abi, router_address) = self
            .abi_resolver
            .resolve_abi(source_chain_id, ContractType::Router)
            .await?;
        let client = self.rpc_pool.client_for_chain(&source_chain)?;

        self.quote_bridge_fee_by_type(
            client.as_ref(),
            &router_abi,
            &router_address,
            &dest_caip2,
            bridge_type,
            message,
        )
        .await
        .map_err(|diagnostic| QuoteError::InvalidFeeQuote {
            diagnostics: vec![diagnostic],
        })
    }

    /// `quoteBridgeFeeByType` (SPEC_FULL.md §4.4): the four-step per-bridge
    /// probe. Returns the diagnostic to record rather than a generic error so
    /// the fallback walk above can keep going.
    async fn quote_bridge_fee_by_type(
        &self,
        client: &dyn paycross_chain::EvmRpcClient,
        router_abi: &alloy_json_abi::JsonAbi,
        router_address: &str,
        dest_caip2: &str,
        bridge_type: BridgeType,
        message: &FeeQuoteMessage,
    ) -> Result<U256, BridgeDiagnostic> {
        let bridge_arg = DynSolValue::Uint(U256::from(bridge_type.as_u8()), 8);

        let route_configured = view::call_view(
            client,
            router_abi,
            router_address,
            "isRouteConfigured",
            vec![DynSolValue::String(dest_caip2.to_string()), bridge_arg.clone()],
        )
        .await
        .map_err(|err| diagnostic(bridge_type, err))?;
        if !view::bool_at(&route_configured, 0).unwrap_or(false) {
            return Err(BridgeDiagnostic {
                bridge_type,
                reason: "RouteNotConfigured".to_string(),
            });
        }

        let has_adapter = view::call_view(
            client,
            router_abi,
            router_address,
            "hasAdapter",
            vec![DynSolValue::String(dest_caip2.to_string()), bridge_arg.clone()],
        )
        .await
        .map_err(|err| diagnostic(bridge_type, err))?;
        if !view::bool_at(&has_adapter, 0).unwrap_or(false) {
            return Err(BridgeDiagnostic {
                bridge_type,
                reason: "AdapterMissing".to_string(),
            });
        }

        let encoded_message = message.encode();
        let safe_quote = view::call_view(
            client,
            router_abi,
            router_address,
            "quotePaymentFeeSafe",
            vec![
                DynSolValue::String(dest_caip2.to_string()),
                bridge_arg.clone(),
                DynSolValue::Bytes(encoded_message.to_vec()),
            ],
        )
        .await;

        match safe_quote {
            Ok(values) => {
                let ok = view::bool_at(&values, 0).unwrap_or(false);
                let fee = view::uint_at(&values, 1).unwrap_or(U256::ZERO);
                let reason = view::string_at(&values, 2).unwrap_or_default();
                if !ok {
                    return Err(BridgeDiagnostic { bridge_type, reason });
                }
                if fee > U256::ZERO {
                    return Ok(fee);
                }
                return Err(BridgeDiagnostic {
                    bridge_type,
                    reason: "safe quote returned a zero fee".to_string(),
                });
            }
            Err(ViewCallError::Empty) => {
                // Legacy router: quotePaymentFeeSafe is unimplemented, fall through.
            }
            Err(err) => return Err(diagnostic(bridge_type, err)),
        }

        let legacy_quote = view::call_view(
            client,
            router_abi,
            router_address,
            "quotePaymentFee",
            vec![
                DynSolValue::String(dest_caip2.to_string()),
                bridge_arg,
                DynSolValue::Bytes(encoded_message.to_vec()),
            ],
        )
        .await
        .map_err(|err| diagnostic(bridge_type, err))?;

        let fee = view::uint_at(&legacy_quote, 0).unwrap_or(U256::ZERO);
        if fee > U256::ZERO {
            Ok(fee)
        } else {
            Err(BridgeDiagnostic {
                bridge_type,
                reason: "legacy quote returned a non-positive fee".to_string(),
            })
        }
    }
}

/// Builds a [`BridgeDiagnostic`] from a view-call failure, decoding any embedded
/// revert data so the diagnostic carries `decoded_revert=...` when available
/// (SPEC_FULL.md §4.4: "A decoded revert name/message becomes part of the
/// returned error").
fn diagnostic(bridge_type: BridgeType, err: ViewCallError) -> BridgeDiagnostic {
    let reason = match &err {
        ViewCallError::Call(msg) => match paycross_abi::decode_from_error_text(msg) {
            Some(decoded) => format!(
                "{msg} (decoded_revert={}, selector={})",
                decoded.name, decoded.selector
            ),
            None => msg.clone(),
        },
        other => other.to_string(),
    };
    BridgeDiagnostic { bridge_type, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes};
    use async_trait::async_trait;
    use paycross_chain::{EvmRpcClient, RpcCallError};
    use paycross_repo::entities::{Chain, RoutePolicy, RpcEndpoint, SmartContract};
    use paycross_repo::RepoError;
    use paycross_types::{ChainType, FallbackMode};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn encode_tuple(values: Vec<DynSolValue>) -> Bytes {
        Bytes::from(DynSolValue::Tuple(values).abi_encode_params())
    }

    struct ScriptedClient {
        responses: Vec<Result<Bytes, String>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EvmRpcClient for ScriptedClient {
        async fn eth_call(&self, _to: Address, _data: Bytes) -> Result<Bytes, RpcCallError> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            match self
                .responses
                .get(index)
                .expect("scripted client called more times than expected")
            {
                Ok(bytes) => Ok(bytes.clone()),
                Err(msg) => Err(RpcCallError::Transport(msg.clone())),
            }
        }
    }

    struct FakeChainRepo(HashMap<EntityId, Chain>);

    #[async_trait]
    impl ChainRepository for FakeChainRepo {
        async fn get_by_id(&self, id: EntityId) -> Result<Chain, RepoError> {
            self.0.get(&id).cloned().ok_or(RepoError::NotFound)
        }
        async fn get_by_chain_ref(&self, _chain_ref: &str) -> Result<Chain, RepoError> {
            Err(RepoError::NotFound)
        }
        async fn get_by_caip2(&self, _caip2: &str) -> Result<Chain, RepoError> {
            Err(RepoError::NotFound)
        }
        async fn get_all(&self) -> Result<Vec<Chain>, RepoError> {
            Ok(self.0.values().cloned().collect())
        }
    }

    struct FakeRoutePolicyRepo(Option<RoutePolicy>);

    #[async_trait]
    impl RoutePolicyRepository for FakeRoutePolicyRepo {
        async fn get_by_route(
            &self,
            _source_chain_id: EntityId,
            _dest_chain_id: EntityId,
        ) -> Result<Option<RoutePolicy>, RepoError> {
            Ok(self.0.clone())
        }
    }

    struct FakeContractRepo(SmartContract);

    #[async_trait]
    impl paycross_repo::SmartContractRepository for FakeContractRepo {
        async fn get_active_contract(
            &self,
            _chain_id: EntityId,
            _contract_type: ContractType,
        ) -> Result<SmartContract, RepoError> {
            Ok(self.0.clone())
        }
        async fn get_by_chain(&self, _chain_id: EntityId) -> Result<Vec<SmartContract>, RepoError> {
            Ok(vec![])
        }
        async fn get_filtered(
            &self,
            _chain_id: Option<EntityId>,
            _contract_type: Option<ContractType>,
        ) -> Result<Vec<SmartContract>, RepoError> {
            Ok(vec![])
        }
    }

    fn source_chain() -> Chain {
        Chain {
            id: EntityId::from_u128(1),
            chain_type: ChainType::Evm,
            chain_ref: "1".into(),
            rpc_endpoints: vec![RpcEndpoint {
                url: "https://rpc-source.example".into(),
                active: true,
            }],
        }
    }

    fn dest_chain() -> Chain {
        Chain {
            id: EntityId::from_u128(2),
            chain_type: ChainType::Evm,
            chain_ref: "8453".into(),
            rpc_endpoints: vec![],
        }
    }

    fn router_contract() -> SmartContract {
        SmartContract {
            id: EntityId::from_u128(10),
            chain_id: EntityId::from_u128(1),
            contract_type: ContractType::Router,
            address: "0x0000000000000000000000000000000000dead".into(),
            abi: None,
            is_active: true,
        }
    }

    fn message() -> FeeQuoteMessage {
        FeeQuoteMessage {
            payment_id: [0u8; 32],
            receiver: Address::ZERO,
            source_token: Address::ZERO,
            dest_token: Address::ZERO,
            amount: U256::from(1_000u64),
            dest_chain_id: "eip155:8453".to_string(),
            min_amount_out: U256::ZERO,
        }
    }

    fn engine(client: ScriptedClient, policy: Option<RoutePolicy>) -> QuoteEngine {
        let mut chains = HashMap::new();
        chains.insert(source_chain().id, source_chain());
        chains.insert(dest_chain().id, dest_chain());

        let rpc_pool = Arc::new(RpcClientPool::new());
        rpc_pool.inject("https://rpc-source.example", Arc::new(client));

        let abi_resolver = Arc::new(AbiResolver::new(
            Arc::new(FakeContractRepo(router_contract())),
            paycross_abi::PlatformAbis::builtin(),
        ));

        QuoteEngine::new(
            Arc::new(FakeChainRepo(chains)),
            Arc::new(FakeRoutePolicyRepo(policy)),
            abi_resolver,
            rpc_pool,
        )
    }

    fn route_policy(default: u8, mode: FallbackMode, order: Vec<u8>) -> RoutePolicy {
        RoutePolicy {
            source_chain_id: EntityId::from_u128(1),
            dest_chain_id: EntityId::from_u128(2),
            default_bridge_type: default,
            fallback_mode: mode,
            fallback_order: order,
        }
    }

    /// S1: happy path quote on the first bridge tried, one RPC round trip
    /// (3 calls: isRouteConfigured, hasAdapter, quotePaymentFeeSafe), bridge 1
    /// never probed.
    #[tokio::test]
    async fn s1_happy_quote_accepts_first_bridge() {
        let client = ScriptedClient {
            responses: vec![
                Ok(encode_tuple(vec![DynSolValue::Bool(true)])), // isRouteConfigured(0)
                Ok(encode_tuple(vec![DynSolValue::Bool(true)])), // hasAdapter(0)
                Ok(encode_tuple(vec![
                    DynSolValue::Bool(true),
                    DynSolValue::Uint(U256::from(100u64), 256),
                    DynSolValue::String(String::new()),
                ])), // quotePaymentFeeSafe(0)
            ],
            calls: AtomicUsize::new(0),
        };
        let policy = route_policy(0, FallbackMode::AutoFallback, vec![1]);
        let engine = engine(client, Some(policy));

        let outcome = engine
            .get_bridge_fee_quote(EntityId::from_u128(1), EntityId::from_u128(2), message())
            .await
            .unwrap();

        assert_eq!(outcome.fee, U256::from(100u64));
        assert_eq!(outcome.bridge_type, BridgeType::Hyperbridge);
        assert!(outcome.skipped.is_empty());
    }

    /// S2: bridge 0's route is not configured, falls back to bridge 1 which
    /// quotes 150.
    #[tokio::test]
    async fn s2_falls_back_to_second_bridge_in_order() {
        let client = ScriptedClient {
            responses: vec![
                Ok(encode_tuple(vec![DynSolValue::Bool(false)])), // bridge 0 isRouteConfigured = false
                Ok(encode_tuple(vec![DynSolValue::Bool(true)])), // bridge 1 isRouteConfigured
                Ok(encode_tuple(vec![DynSolValue::Bool(true)])), // bridge 1 hasAdapter
                Ok(encode_tuple(vec![
                    DynSolValue::Bool(true),
                    DynSolValue::Uint(U256::from(150u64), 256),
                    DynSolValue::String(String::new()),
                ])), // bridge 1 quotePaymentFeeSafe
            ],
            calls: AtomicUsize::new(0),
        };
        let policy = route_policy(0, FallbackMode::AutoFallback, vec![1]);
        let engine = engine(client, Some(policy));

        let outcome = engine
            .get_bridge_fee_quote(EntityId::from_u128(1), EntityId::from_u128(2), message())
            .await
            .unwrap();

        assert_eq!(outcome.fee, U256::from(150u64));
        assert_eq!(outcome.bridge_type, BridgeType::Ccip);
        assert_eq!(outcome.skipped.len(), 1);
    }

    /// S3: safe quote returns empty (`0x`), legacy `quotePaymentFee` returns
    /// 100.
    #[tokio::test]
    async fn s3_falls_through_to_legacy_quote_on_empty_safe_quote() {
        let client = ScriptedClient {
            responses: vec![
                Ok(encode_tuple(vec![DynSolValue::Bool(true)])), // isRouteConfigured
                Ok(encode_tuple(vec![DynSolValue::Bool(true)])), // hasAdapter
                Ok(Bytes::new()),                                // quotePaymentFeeSafe -> 0x
                Ok(encode_tuple(vec![DynSolValue::Uint(U256::from(100u64), 256)])), // legacy
            ],
            calls: AtomicUsize::new(0),
        };
        let policy = route_policy(0, FallbackMode::Strict, vec![]);
        let engine = engine(client, Some(policy));

        let outcome = engine
            .get_bridge_fee_quote(EntityId::from_u128(1), EntityId::from_u128(2), message())
            .await
            .unwrap();

        assert_eq!(outcome.fee, U256::from(100u64));
    }

    /// S4: a revert's decoded name and selector are folded into the diagnostic.
    #[tokio::test]
    async fn s4_revert_is_decoded_into_the_diagnostic() {
        let revert_data = {
            let mut data = vec![0x08, 0xc3, 0x79, 0xa0];
            data.extend(
                DynSolValue::Tuple(vec![DynSolValue::String("RouteNotConfigured".to_string())])
                    .abi_encode_params(),
            );
            data
        };
        let error_text = format!(
            "execution reverted: {}",
            alloy_primitives::hex::encode_prefixed(&revert_data)
        );
        let client = ScriptedClient {
            responses: vec![Err(error_text)],
            calls: AtomicUsize::new(0),
        };
        let policy = route_policy(0, FallbackMode::Strict, vec![]);
        let engine = engine(client, Some(policy));

        let err = engine
            .get_bridge_fee_quote(EntityId::from_u128(1), EntityId::from_u128(2), message())
            .await
            .unwrap_err();

        match err {
            QuoteError::InvalidFeeQuote { diagnostics } => {
                assert_eq!(diagnostics.len(), 1);
                assert!(diagnostics[0].reason.contains("decoded_revert=RouteNotConfigured"));
                assert!(diagnostics[0].reason.contains("selector=0x08c379a0"));
            }
            other => panic!("expected InvalidFeeQuote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn all_bridges_failing_yields_invalid_fee_quote() {
        let client = ScriptedClient {
            responses: vec![Ok(encode_tuple(vec![DynSolValue::Bool(false)]))],
            calls: AtomicUsize::new(0),
        };
        let policy = route_policy(0, FallbackMode::Strict, vec![]);
        let engine = engine(client, Some(policy));

        let err = engine
            .get_bridge_fee_quote(EntityId::from_u128(1), EntityId::from_u128(2), message())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::InvalidFeeQuote { .. }));
    }
}
