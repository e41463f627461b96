//! The Payment Lifecycle Coordinator (SPEC_FULL.md §4.6): `createPayment`
//! and `processIndexerWebhook`, the two operations that own a payment's
//! state machine end to end.

use std::sync::Arc;

use alloy_primitives::{Address, U256};

use paycross_abi::AbiResolver;
use paycross_chain::{ChainResolver, RpcClientPool};
use paycross_quote::message::{normalize_token_address, FeeQuoteMessage};
use paycross_quote::QuoteEngine;
use paycross_repo::entities::{Payment, PaymentEvent};
use paycross_repo::{
    run_in_transaction, ChainRepository, FeeConfigRepository, PaymentEventRepository,
    PaymentRepository, RepoError, RoutePolicyRepository, SmartContractRepository, UnitOfWork,
};
use paycross_types::{
    BridgeType, ChainType, ContractType, EntityId, PaymentEventType, PaymentStatus, ScaledAmount,
    UnixTimestamp,
};

use crate::bridge_selection::deterministic_bridge_type;
use crate::calldata::{self, EvmCall};
use crate::error::PaymentError;
use crate::fees::{self, FeeBreakdown, PlatformFeeParams};
use crate::solana_ix;
use crate::vault;
use crate::webhook::{self, WebhookEventKind};

/// Caller-supplied fields for a new payment, in the shape the (out-of-scope)
/// API boundary is expected to pass through after request validation
/// (SPEC_FULL.md §2).
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    pub source_chain_input: String,
    pub dest_chain_input: String,
    pub source_token: String,
    pub dest_token: String,
    pub amount: String,
    pub decimals: u8,
    pub receiver: String,
    pub min_amount_out: Option<String>,
    pub merchant_discount: Option<String>,
}

/// Everything `createPayment` hands back: the persisted row, the fee math
/// behind `totalCharged`, and the transaction(s) the caller must submit.
#[derive(Debug, Clone)]
pub struct PaymentCreationResult {
    pub payment: Payment,
    pub fee_breakdown: FeeBreakdown,
    pub bridge_type: Option<BridgeType>,
    pub evm_calls: Vec<EvmCall>,
    pub solana_instruction_base58: Option<String>,
}

pub struct PaymentLifecycleCoordinator {
    chain_resolver: Arc<ChainResolver>,
    chains: Arc<dyn ChainRepository>,
    contracts: Arc<dyn SmartContractRepository>,
    abi_resolver: Arc<AbiResolver>,
    rpc_pool: Arc<RpcClientPool>,
    quote_engine: Arc<QuoteEngine>,
    route_policies: Arc<dyn RoutePolicyRepository>,
    fee_configs: Arc<dyn FeeConfigRepository>,
    payments: Arc<dyn PaymentRepository>,
    payment_events: Arc<dyn PaymentEventRepository>,
    uow: Arc<dyn UnitOfWork>,
}

impl PaymentLifecycleCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_resolver: Arc<ChainResolver>,
        chains: Arc<dyn ChainRepository>,
        contracts: Arc<dyn SmartContractRepository>,
        abi_resolver: Arc<AbiResolver>,
        rpc_pool: Arc<RpcClientPool>,
        quote_engine: Arc<QuoteEngine>,
        route_policies: Arc<dyn RoutePolicyRepository>,
        fee_configs: Arc<dyn FeeConfigRepository>,
        payments: Arc<dyn PaymentRepository>,
        payment_events: Arc<dyn PaymentEventRepository>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            chain_resolver,
            chains,
            contracts,
            abi_resolver,
            rpc_pool,
            quote_engine,
            route_policies,
            fee_configs,
            payments,
            payment_events,
            uow,
        }
    }

    /// `createPayment(userId, input)` (SPEC_FULL.md §4.6): validate, resolve
    /// chains, decide the bridge, compute the fee breakdown, persist the
    /// `Payment` row plus its `Created` event under one transaction, then
    /// build the transaction(s) the caller must submit.
    #[tracing::instrument(skip(self, input), err)]
    pub async fn create_payment(&self, input: CreatePaymentInput) -> Result<PaymentCreationResult, PaymentError> {
        if input.receiver.trim().is_empty() {
            return Err(PaymentError::InvalidInput("receiver must not be empty".to_string()));
        }

        let amount = ScaledAmount::from_human_decimal(&input.amount, input.decimals)
            .map_err(|err| PaymentError::InvalidInput(err.to_string()))?;

        let (source_chain_id, _source_caip2) = self.chain_resolver.resolve_any(&input.source_chain_input).await?;
        let (dest_chain_id, dest_caip2) = self.chain_resolver.resolve_any(&input.dest_chain_input).await?;
        let source_chain = self.chains.get_by_id(source_chain_id).await?;
        let same_chain = source_chain_id == dest_chain_id;

        let (bridge_type, quoted_fee) = self
            .decide_bridge(source_chain_id, dest_chain_id, same_chain, &source_chain, &input, &amount)
            .await?;

        let fee_config = match self
            .fee_configs
            .get_by_chain_and_token(source_chain_id, &input.source_token)
            .await
        {
            Ok(config) => config,
            Err(RepoError::NotFound) => paycross_repo::entities::FeeConfig {
                fixed_base_fee: fees::DEFAULT_FIXED_BASE_FEE.to_string(),
                platform_fee_percent: fees::DEFAULT_PERCENTAGE_FEE.to_string(),
                min_fee: "0".to_string(),
                max_fee: None,
            },
            Err(other) => return Err(other.into()),
        };

        let platform_fee = fees::compute_platform_fee(&PlatformFeeParams {
            amount_decimal: amount.as_decimal(),
            decimals: input.decimals,
            fixed_base_fee: &fee_config.fixed_base_fee,
            percentage_fee: &fee_config.platform_fee_percent,
            min_fee: &fee_config.min_fee,
            max_fee: fee_config.max_fee.as_deref(),
            merchant_discount: input.merchant_discount.as_deref(),
        })?;
        let bridge_fee = fees::compute_bridge_fee(
            same_chain,
            quoted_fee.map(u256_to_u128_saturating),
            fees::DEFAULT_BRIDGE_FEE_FLAT,
            input.decimals,
        )?;
        let fee_breakdown = FeeBreakdown::new(amount.smallest_unit, platform_fee, bridge_fee);

        let now = UnixTimestamp::try_now().map_err(|err| PaymentError::InvalidInput(err.to_string()))?;
        let draft = Payment {
            id: EntityId::from_u128(0),
            source_chain_id,
            dest_chain_id,
            source_token: input.source_token.clone(),
            dest_token: input.dest_token.clone(),
            source_amount: amount.smallest_unit,
            fee_amount: fee_breakdown.fee_amount,
            total_charged: fee_breakdown.total_charged,
            receiver: input.receiver.clone(),
            bridge_id: bridge_type,
            status: PaymentStatus::Pending,
            created_at: now,
        };

        let payments = self.payments.clone();
        let payment_events = self.payment_events.clone();
        let uow_for_body = self.uow.clone();
        let created_payment = run_in_transaction(self.uow.as_ref(), move |tx| async move {
            let created = payments.create(tx, draft).await?;
            let locked = uow_for_body.with_lock(tx).await?;
            payment_events
                .create(
                    locked,
                    PaymentEvent {
                        id: EntityId::from_u128(0),
                        payment_id: created.id,
                        event_type: PaymentEventType::Created,
                        chain_id: Some(source_chain_id),
                        created_at: created.created_at,
                    },
                )
                .await?;
            Ok::<Payment, PaymentError>(created)
        })
        .await?;

        let (evm_calls, solana_instruction_base58) = if source_chain.chain_type == ChainType::Evm {
            let evm_calls = self
                .build_evm_calls(&source_chain, &input, &created_payment, &dest_caip2.to_string(), &fee_breakdown)
                .await?;
            (evm_calls, None)
        } else {
            let instruction = solana_ix::build_create_payment_instruction(
                created_payment.id,
                &dest_caip2.to_string(),
                &input.dest_token,
                u128_to_u64_saturating(created_payment.source_amount),
                &input.receiver,
            );
            (vec![], Some(instruction))
        };

        Ok(PaymentCreationResult {
            payment: created_payment,
            fee_breakdown,
            bridge_type,
            evm_calls,
            solana_instruction_base58,
        })
    }

    /// Resolves `(bridgeType, quotedFee)` for the route: `None` same-chain;
    /// a policy-driven fallback walk when a [`RoutePolicy`] row exists;
    /// otherwise the deterministic mapping from [`deterministic_bridge_type`].
    /// Solana-sourced routes have no EVM Router to quote against, so they
    /// always fall through to the configured flat bridge fee (documented in
    /// DESIGN.md).
    ///
    /// [`RoutePolicy`]: paycross_repo::entities::RoutePolicy
    async fn decide_bridge(
        &self,
        source_chain_id: EntityId,
        dest_chain_id: EntityId,
        same_chain: bool,
        source_chain: &paycross_repo::entities::Chain,
        input: &CreatePaymentInput,
        amount: &ScaledAmount,
    ) -> Result<(Option<BridgeType>, Option<U256>), PaymentError> {
        if same_chain {
            return Ok((None, None));
        }
        if source_chain.chain_type == ChainType::Svm {
            let dest_chain = self.chains.get_by_id(dest_chain_id).await?;
            return Ok((
                Some(deterministic_bridge_type(source_chain.chain_type, dest_chain.chain_type)),
                None,
            ));
        }

        let message = self.fee_quote_message(input, amount)?;
        let policy = self.route_policies.get_by_route(source_chain_id, dest_chain_id).await?;
        if policy.is_some() {
            let outcome = self
                .quote_engine
                .get_bridge_fee_quote(source_chain_id, dest_chain_id, message)
                .await?;
            Ok((Some(outcome.bridge_type), Some(outcome.fee)))
        } else {
            let dest_chain = self.chains.get_by_id(dest_chain_id).await?;
            let bridge_type = deterministic_bridge_type(source_chain.chain_type, dest_chain.chain_type);
            let fee = self
                .quote_engine
                .quote_fee_for_bridge(source_chain_id, dest_chain_id, bridge_type, &message)
                .await?;
            Ok((Some(bridge_type), Some(fee)))
        }
    }

    fn fee_quote_message(&self, input: &CreatePaymentInput, amount: &ScaledAmount) -> Result<FeeQuoteMessage, PaymentError> {
        let min_out = match &input.min_amount_out {
            Some(value) => {
                let scaled = ScaledAmount::from_human_decimal(value, input.decimals)
                    .map_err(|err| PaymentError::InvalidInput(err.to_string()))?;
                U256::from(scaled.smallest_unit)
            }
            None => U256::ZERO,
        };
        Ok(FeeQuoteMessage {
            payment_id: [0u8; 32],
            receiver: receiver_address_or_zero(&input.receiver),
            source_token: normalize_token_address(&input.source_token),
            dest_token: normalize_token_address(&input.dest_token),
            amount: U256::from(amount.smallest_unit),
            dest_chain_id: input.dest_chain_input.clone(),
            min_amount_out: min_out,
        })
    }

    async fn build_evm_calls(
        &self,
        source_chain: &paycross_repo::entities::Chain,
        input: &CreatePaymentInput,
        payment: &Payment,
        dest_caip2: &str,
        fee_breakdown: &FeeBreakdown,
    ) -> Result<Vec<EvmCall>, PaymentError> {
        let (gateway_abi, gateway_address) = self
            .abi_resolver
            .resolve_abi(source_chain.id, ContractType::Gateway)
            .await?;

        let min_out = match &input.min_amount_out {
            Some(value) => {
                let scaled = ScaledAmount::from_human_decimal(value, input.decimals)
                    .map_err(|err| PaymentError::InvalidInput(err.to_string()))?;
                U256::from(scaled.smallest_unit)
            }
            None => U256::ZERO,
        };

        let source_token_address = normalize_token_address(&input.source_token);
        let native_value = if source_token_address == Address::ZERO && fee_breakdown.bridge_fee > 0 {
            U256::from(fee_breakdown.bridge_fee)
        } else {
            U256::ZERO
        };

        let mut calls = Vec::with_capacity(2);
        if source_token_address != Address::ZERO {
            let vault_address =
                vault::resolve_vault_address(self.contracts.as_ref(), self.rpc_pool.as_ref(), source_chain, &gateway_abi, &gateway_address)
                    .await?;
            calls.push(calldata::build_approve_call(
                &input.source_token,
                &vault_address.to_string(),
                U256::from(payment.total_charged),
            )?);
        }

        calls.push(calldata::build_create_payment_call(
            &gateway_address,
            dest_caip2,
            &input.receiver,
            &input.source_token,
            &input.dest_token,
            U256::from(payment.source_amount),
            min_out,
            native_value,
        )?);

        Ok(calls)
    }

    /// `processIndexerWebhook(eventType, rawJson)` (SPEC_FULL.md §4.6 step 7):
    /// parse by event type, load the payment under lock, apply the status
    /// transition, append the corresponding event. Unknown event types are
    /// no-ops, not errors.
    #[tracing::instrument(skip(self, raw_json), err)]
    pub async fn process_indexer_webhook(&self, event_type: &str, raw_json: &str) -> Result<(), PaymentError> {
        let kind = WebhookEventKind::parse(event_type);
        if kind == WebhookEventKind::Unknown {
            tracing::debug!(event_type, "ignoring unrecognized indexer webhook event type");
            return Ok(());
        }

        let payload = webhook::parse_webhook_payload(raw_json)?;
        let new_status = webhook::map_status(payload.status.as_deref());
        let event_type_to_record = webhook::event_type_for(kind, new_status);

        let payments = self.payments.clone();
        let payment_events = self.payment_events.clone();
        let uow_for_body = self.uow.clone();

        run_in_transaction(self.uow.as_ref(), move |tx| async move {
            let locked = uow_for_body.with_lock(tx).await?;
            let payment = payments.get_by_id(locked, payload.payment_id).await?;

            if new_status == PaymentStatus::Refunded {
                payments.mark_refunded(locked, payment.id).await?;
            } else {
                payments.update_status(locked, payment.id, new_status).await?;
            }
            if let Some(dest_tx_hash) = &payload.dest_tx_hash {
                payments.update_dest_tx_hash(locked, payment.id, dest_tx_hash).await?;
            }

            let chain_id = match event_type_to_record {
                PaymentEventType::SourceConfirmed | PaymentEventType::BridgeSubmitted => Some(payment.source_chain_id),
                PaymentEventType::DestConfirmed | PaymentEventType::Completed => Some(payment.dest_chain_id),
                _ => None,
            };
            let now = UnixTimestamp::try_now().map_err(|err| PaymentError::InvalidInput(err.to_string()))?;
            payment_events
                .create(
                    locked,
                    PaymentEvent {
                        id: EntityId::from_u128(0),
                        payment_id: payment.id,
                        event_type: event_type_to_record,
                        chain_id,
                        created_at: now,
                    },
                )
                .await?;
            Ok::<(), PaymentError>(())
        })
        .await
    }
}

fn receiver_address_or_zero(receiver: &str) -> Address {
    let bytes = calldata::decode_receiver_bytes(receiver);
    if bytes.len() == 20 {
        Address::from_slice(&bytes)
    } else {
        Address::ZERO
    }
}

fn u256_to_u128_saturating(value: U256) -> u128 {
    u128::try_from(value).unwrap_or(u128::MAX)
}

fn u128_to_u64_saturating(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_dyn_abi::DynSolValue;
    use alloy_primitives::Bytes;
    use async_trait::async_trait;
    use paycross_abi::PlatformAbis;
    use paycross_chain::{EvmRpcClient, RpcCallError};
    use paycross_repo::entities::{Chain, FeeConfig, RoutePolicy, RpcEndpoint, SmartContract};
    use paycross_repo::ApiKeyRepository;
    use paycross_types::FallbackMode;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeChainRepo(Mutex<HashMap<EntityId, Chain>>);

    #[async_trait]
    impl ChainRepository for FakeChainRepo {
        async fn get_by_id(&self, id: EntityId) -> Result<Chain, RepoError> {
            self.0.lock().unwrap().get(&id).cloned().ok_or(RepoError::NotFound)
        }
        async fn get_by_chain_ref(&self, _chain_ref: &str) -> Result<Chain, RepoError> {
            Err(RepoError::NotFound)
        }
        async fn get_by_caip2(&self, _caip2: &str) -> Result<Chain, RepoError> {
            Err(RepoError::NotFound)
        }
        async fn get_all(&self) -> Result<Vec<Chain>, RepoError> {
            Ok(self.0.lock().unwrap().values().cloned().collect())
        }
    }

    struct FakeContractRepo(SmartContract);

    #[async_trait]
    impl SmartContractRepository for FakeContractRepo {
        async fn get_active_contract(&self, _chain_id: EntityId, _contract_type: ContractType) -> Result<SmartContract, RepoError> {
            Ok(self.0.clone())
        }
        async fn get_by_chain(&self, _chain_id: EntityId) -> Result<Vec<SmartContract>, RepoError> {
            Ok(vec![])
        }
        async fn get_filtered(&self, _chain_id: Option<EntityId>, _contract_type: Option<ContractType>) -> Result<Vec<SmartContract>, RepoError> {
            Ok(vec![])
        }
    }

    struct FakeRoutePolicyRepo;

    #[async_trait]
    impl RoutePolicyRepository for FakeRoutePolicyRepo {
        async fn get_by_route(&self, _source_chain_id: EntityId, _dest_chain_id: EntityId) -> Result<Option<RoutePolicy>, RepoError> {
            Ok(None)
        }
    }

    struct FakeFeeConfigRepo;

    #[async_trait]
    impl FeeConfigRepository for FakeFeeConfigRepo {
        async fn get_by_chain_and_token(&self, _chain_id: EntityId, _token_id: &str) -> Result<FeeConfig, RepoError> {
            Err(RepoError::NotFound)
        }
    }

    #[derive(Default)]
    struct FakePaymentRepo {
        rows: Mutex<Vec<Payment>>,
        next_id: Mutex<u128>,
    }

    #[async_trait]
    impl PaymentRepository for FakePaymentRepo {
        async fn create(&self, _tx: paycross_repo::UnlockedTx, mut payment: Payment) -> Result<Payment, RepoError> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            payment.id = EntityId::from_u128(*next_id);
            self.rows.lock().unwrap().push(payment.clone());
            Ok(payment)
        }
        async fn get_by_id(&self, _tx: paycross_repo::LockedTx, id: EntityId) -> Result<Payment, RepoError> {
            self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned().ok_or(RepoError::NotFound)
        }
        async fn update_status(&self, _tx: paycross_repo::LockedTx, id: EntityId, status: PaymentStatus) -> Result<(), RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|p| p.id == id).ok_or(RepoError::NotFound)?;
            row.status = status;
            Ok(())
        }
        async fn update_dest_tx_hash(&self, _tx: paycross_repo::LockedTx, _id: EntityId, _dest_tx_hash: &str) -> Result<(), RepoError> {
            Ok(())
        }
        async fn mark_refunded(&self, _tx: paycross_repo::LockedTx, id: EntityId) -> Result<(), RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|p| p.id == id).ok_or(RepoError::NotFound)?;
            row.status = PaymentStatus::Refunded;
            Ok(())
        }
        async fn get_by_user_id(&self, _user_id: EntityId, _limit: u32, _offset: u32) -> Result<Vec<Payment>, RepoError> {
            Ok(vec![])
        }
    }

    #[derive(Default)]
    struct FakePaymentEventRepo {
        events: Mutex<Vec<PaymentEvent>>,
        next_id: Mutex<u128>,
    }

    #[async_trait]
    impl PaymentEventRepository for FakePaymentEventRepo {
        async fn create(&self, _tx: paycross_repo::LockedTx, mut event: PaymentEvent) -> Result<PaymentEvent, RepoError> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            event.id = EntityId::from_u128(*next_id);
            self.events.lock().unwrap().push(event.clone());
            Ok(event)
        }
        async fn get_by_payment_id(&self, payment_id: EntityId) -> Result<Vec<PaymentEvent>, RepoError> {
            Ok(self.events.lock().unwrap().iter().filter(|e| e.payment_id == payment_id).cloned().collect())
        }
    }

    struct FakeUow {
        next_id: Mutex<u64>,
    }

    #[async_trait]
    impl UnitOfWork for FakeUow {
        async fn begin(&self) -> Result<paycross_repo::UnlockedTx, RepoError> {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            Ok(paycross_repo::UnlockedTx(id))
        }
        async fn commit(&self, _tx: paycross_repo::UnlockedTx) -> Result<(), RepoError> {
            Ok(())
        }
        async fn rollback(&self, _tx: paycross_repo::UnlockedTx) -> Result<(), RepoError> {
            Ok(())
        }
        async fn with_lock(&self, tx: paycross_repo::UnlockedTx) -> Result<paycross_repo::LockedTx, RepoError> {
            Ok(paycross_repo::LockedTx(tx.0))
        }
    }

    fn evm_chain(id: u128, chain_ref: &str) -> Chain {
        Chain {
            id: EntityId::from_u128(id),
            chain_type: ChainType::Evm,
            chain_ref: chain_ref.to_string(),
            rpc_endpoints: vec![RpcEndpoint {
                url: format!("https://rpc-{id}.example"),
                active: true,
            }],
        }
    }

    fn gateway_contract(chain_id: u128) -> SmartContract {
        SmartContract {
            id: EntityId::from_u128(900 + chain_id),
            chain_id: EntityId::from_u128(chain_id),
            contract_type: ContractType::Gateway,
            address: "0x0000000000000000000000000000000000c0de".into(),
            abi: None,
            is_active: true,
        }
    }

    #[allow(clippy::type_complexity)]
    fn coordinator() -> (
        PaymentLifecycleCoordinator,
        Arc<FakePaymentRepo>,
        Arc<FakePaymentEventRepo>,
        Arc<RpcClientPool>,
    ) {
        let mut chains = HashMap::new();
        chains.insert(EntityId::from_u128(1), evm_chain(1, "1"));
        chains.insert(EntityId::from_u128(2), evm_chain(2, "8453"));
        let chain_repo = Arc::new(FakeChainRepo(Mutex::new(chains)));

        let contracts = Arc::new(FakeContractRepo(gateway_contract(1)));
        let rpc_pool = Arc::new(RpcClientPool::new());
        let abi_resolver = Arc::new(AbiResolver::new(contracts.clone(), PlatformAbis::builtin()));
        let quote_engine = Arc::new(QuoteEngine::new(
            chain_repo.clone(),
            Arc::new(FakeRoutePolicyRepo),
            abi_resolver.clone(),
            rpc_pool.clone(),
        ));

        let payments = Arc::new(FakePaymentRepo::default());
        let payment_events = Arc::new(FakePaymentEventRepo::default());
        let uow = Arc::new(FakeUow { next_id: Mutex::new(1) });

        let coordinator = PaymentLifecycleCoordinator::new(
            Arc::new(ChainResolver::new(chain_repo.clone())),
            chain_repo,
            contracts,
            abi_resolver,
            rpc_pool.clone(),
            quote_engine,
            Arc::new(FakeRoutePolicyRepo),
            Arc::new(FakeFeeConfigRepo),
            payments.clone(),
            payment_events.clone(),
            uow,
        );
        (coordinator, payments, payment_events, rpc_pool)
    }

    #[tokio::test]
    async fn same_chain_payment_uses_the_plain_selector_with_no_bridge() {
        let (coordinator, payments, payment_events, _rpc_pool) = coordinator();
        let input = CreatePaymentInput {
            source_chain_input: "1".to_string(),
            dest_chain_input: "1".to_string(),
            source_token: "".to_string(),
            dest_token: "0x0000000000000000000000000000000000bbbb".to_string(),
            amount: "10".to_string(),
            decimals: 6,
            receiver: "0x000000000000000000000000000000000012ab".to_string(),
            min_amount_out: None,
            merchant_discount: None,
        };

        let result = coordinator.create_payment(input).await.unwrap();
        assert!(result.bridge_type.is_none());
        assert_eq!(result.fee_breakdown.bridge_fee, 0);
        assert_eq!(result.evm_calls.len(), 1);
        assert_eq!(&result.evm_calls[0].data[..4], &calldata::CREATE_PAYMENT_SELECTOR);
        assert_eq!(payments.rows.lock().unwrap().len(), 1);
        assert_eq!(payment_events.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn non_native_source_token_prepends_an_approve_call() {
        let (coordinator, _payments, _events, _rpc_pool) = coordinator();
        let input = CreatePaymentInput {
            source_chain_input: "1".to_string(),
            dest_chain_input: "1".to_string(),
            source_token: "0x0000000000000000000000000000000000aaaa".to_string(),
            dest_token: "0x0000000000000000000000000000000000bbbb".to_string(),
            amount: "10".to_string(),
            decimals: 6,
            receiver: "0x000000000000000000000000000000000012ab".to_string(),
            min_amount_out: None,
            merchant_discount: None,
        };

        let result = coordinator.create_payment(input).await.unwrap();
        assert_eq!(result.evm_calls.len(), 2);
        let approve_selector = alloy_primitives::keccak256("approve(address,uint256)".as_bytes());
        assert_eq!(&result.evm_calls[0].data[..4], &approve_selector[..4]);
        assert_eq!(&result.evm_calls[1].data[..4], &calldata::CREATE_PAYMENT_SELECTOR);
    }

    #[tokio::test]
    async fn min_amount_out_selects_the_slippage_variant() {
        let (coordinator, _payments, _events, _rpc_pool) = coordinator();
        let input = CreatePaymentInput {
            source_chain_input: "1".to_string(),
            dest_chain_input: "1".to_string(),
            source_token: "".to_string(),
            dest_token: "0x0000000000000000000000000000000000bbbb".to_string(),
            amount: "10".to_string(),
            decimals: 6,
            receiver: "0x000000000000000000000000000000000012ab".to_string(),
            min_amount_out: Some("1".to_string()),
            merchant_discount: None,
        };

        let result = coordinator.create_payment(input).await.unwrap();
        assert_eq!(&result.evm_calls[0].data[..4], &calldata::CREATE_PAYMENT_WITH_SLIPPAGE_SELECTOR);
    }

    #[tokio::test]
    async fn unknown_webhook_event_type_is_a_no_op() {
        let (coordinator, _payments, events, _rpc_pool) = coordinator();
        coordinator.process_indexer_webhook("SomeOtherEvent", "{}").await.unwrap();
        assert!(events.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn payment_completed_webhook_marks_the_payment_completed() {
        let (coordinator, payments, events, _rpc_pool) = coordinator();
        let input = CreatePaymentInput {
            source_chain_input: "1".to_string(),
            dest_chain_input: "1".to_string(),
            source_token: "".to_string(),
            dest_token: "0x0000000000000000000000000000000000bbbb".to_string(),
            amount: "10".to_string(),
            decimals: 6,
            receiver: "0x000000000000000000000000000000000012ab".to_string(),
            min_amount_out: None,
            merchant_discount: None,
        };
        let created = coordinator.create_payment(input).await.unwrap();

        let raw_json = format!(r#"{{"paymentId":"{}","status":"completed"}}"#, created.payment.id);
        coordinator.process_indexer_webhook("PaymentCompleted", &raw_json).await.unwrap();

        let stored = payments
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == created.payment.id)
            .cloned()
            .unwrap();
        assert_eq!(stored.status, PaymentStatus::Completed);
        assert_eq!(events.events.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn refunded_webhook_routes_through_mark_refunded() {
        let (coordinator, payments, _events, _rpc_pool) = coordinator();
        let input = CreatePaymentInput {
            source_chain_input: "1".to_string(),
            dest_chain_input: "1".to_string(),
            source_token: "".to_string(),
            dest_token: "0x0000000000000000000000000000000000bbbb".to_string(),
            amount: "10".to_string(),
            decimals: 6,
            receiver: "0x000000000000000000000000000000000012ab".to_string(),
            min_amount_out: None,
            merchant_discount: None,
        };
        let created = coordinator.create_payment(input).await.unwrap();

        let raw_json = format!(r#"{{"paymentId":"{}","status":"refunded"}}"#, created.payment.id);
        coordinator.process_indexer_webhook("PaymentCompleted", &raw_json).await.unwrap();

        let stored = payments
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == created.payment.id)
            .cloned()
            .unwrap();
        assert_eq!(stored.status, PaymentStatus::Refunded);
    }

    struct ScriptedClient {
        responses: Vec<Bytes>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EvmRpcClient for ScriptedClient {
        async fn eth_call(&self, _to: Address, _data: Bytes) -> Result<Bytes, RpcCallError> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.responses[index].clone())
        }
    }

    fn encode_tuple(values: Vec<DynSolValue>) -> Bytes {
        Bytes::from(DynSolValue::Tuple(values).abi_encode_params())
    }

    #[tokio::test]
    async fn cross_chain_evm_to_evm_route_with_no_policy_quotes_through_ccip() {
        let (coordinator, _payments, _events, rpc_pool) = coordinator();

        let client = ScriptedClient {
            responses: vec![
                encode_tuple(vec![DynSolValue::Bool(true)]), // isRouteConfigured
                encode_tuple(vec![DynSolValue::Bool(true)]), // hasAdapter
                encode_tuple(vec![
                    DynSolValue::Bool(true),
                    DynSolValue::Uint(U256::from(77u64), 256),
                    DynSolValue::String(String::new()),
                ]), // quotePaymentFeeSafe
            ],
            calls: AtomicUsize::new(0),
        };
        rpc_pool.inject("https://rpc-1.example", Arc::new(client));

        let input = CreatePaymentInput {
            source_chain_input: "1".to_string(),
            dest_chain_input: "2".to_string(),
            source_token: "".to_string(),
            dest_token: "0x0000000000000000000000000000000000bbbb".to_string(),
            amount: "10".to_string(),
            decimals: 6,
            receiver: "0x000000000000000000000000000000000012ab".to_string(),
            min_amount_out: None,
            merchant_discount: None,
        };

        let result = coordinator.create_payment(input).await.unwrap();
        assert_eq!(result.bridge_type, Some(BridgeType::Ccip));
        assert_eq!(result.fee_breakdown.bridge_fee, 77);
    }

    #[allow(dead_code)]
    fn unused_repo_bound_check(_x: &dyn ApiKeyRepository) {}
    #[allow(dead_code)]
    fn unused_fallback_mode_check(_x: FallbackMode) {}
}
