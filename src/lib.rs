//! Cross-chain payment orchestrator core (SPEC_FULL.md §1-§9): chain
//! resolution, ABI caching, adapter probing, bridge fee quoting, and payment
//! lifecycle coordination, wired together behind one [`OrchestratorCore`]
//! facade.
//!
//! This crate does not implement persistence drivers or an HTTP boundary
//! (SPEC_FULL.md §1 Non-goals: "No HTTP/REST handlers ... No persistence
//! driver implementations"). Callers supply `Arc<dyn Repository>` and
//! `Arc<RpcClientPool>` instances — built from whatever storage and RPC
//! configuration their deployment uses — and this crate wires them into the
//! component services described in SPEC_FULL.md §4.

pub mod config;
pub mod error;

use std::sync::Arc;

use paycross_abi::{AbiResolver, PlatformAbis};
use paycross_apikey::ApiKeyService;
use paycross_chain::{ChainResolver, RpcClientPool};
use paycross_payments::PaymentLifecycleCoordinator;
use paycross_probe::AdapterProbe;
use paycross_quote::QuoteEngine;
use paycross_repo::{
    ApiKeyRepository, ChainRepository, FeeConfigRepository, PaymentEventRepository,
    PaymentRepository, RoutePolicyRepository, SmartContractRepository, UnitOfWork,
};

pub use error::OrchestratorError;

/// The repository and unit-of-work implementations this crate depends on,
/// bundled for [`OrchestratorCore::new`]. Their concrete drivers are out of
/// scope here (SPEC_FULL.md §1); this struct is the injection seam.
pub struct OrchestratorRepos {
    pub chains: Arc<dyn ChainRepository>,
    pub contracts: Arc<dyn SmartContractRepository>,
    pub route_policies: Arc<dyn RoutePolicyRepository>,
    pub fee_configs: Arc<dyn FeeConfigRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub payment_events: Arc<dyn PaymentEventRepository>,
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pub uow: Arc<dyn UnitOfWork>,
}

/// Every domain service named in SPEC_FULL.md §4, wired together once and
/// shared behind `Arc` the way the Probe, Quote Engine, and Coordinator
/// already expect to be handed their collaborators.
pub struct OrchestratorCore {
    pub chain_resolver: Arc<ChainResolver>,
    pub abi_resolver: Arc<AbiResolver>,
    pub rpc_pool: Arc<RpcClientPool>,
    pub quote_engine: Arc<QuoteEngine>,
    pub adapter_probe: Arc<AdapterProbe>,
    pub payment_coordinator: Arc<PaymentLifecycleCoordinator>,
    pub api_key_service: Arc<ApiKeyService>,
}

impl OrchestratorCore {
    /// Builds the full service graph. `encryption_key` must already be the
    /// parsed 32-byte key (see `paycross_apikey::crypto::parse_encryption_key`);
    /// parsing from the config's `encryptionKey` string is the binary's job,
    /// not this constructor's, so this type stays testable without a real
    /// secret on hand.
    pub fn new(repos: OrchestratorRepos, rpc_pool: Arc<RpcClientPool>, encryption_key: [u8; 32]) -> Self {
        let chain_resolver = Arc::new(ChainResolver::new(repos.chains.clone()));
        let abi_resolver = Arc::new(AbiResolver::new(repos.contracts.clone(), PlatformAbis::builtin()));
        let quote_engine = Arc::new(QuoteEngine::new(
            repos.chains.clone(),
            repos.route_policies.clone(),
            abi_resolver.clone(),
            rpc_pool.clone(),
        ));
        let adapter_probe = Arc::new(AdapterProbe::new(
            chain_resolver.clone(),
            abi_resolver.clone(),
            rpc_pool.clone(),
            quote_engine.clone(),
        ));
        let payment_coordinator = Arc::new(PaymentLifecycleCoordinator::new(
            chain_resolver.clone(),
            repos.chains.clone(),
            repos.contracts.clone(),
            abi_resolver.clone(),
            rpc_pool.clone(),
            quote_engine.clone(),
            repos.route_policies.clone(),
            repos.fee_configs.clone(),
            repos.payments.clone(),
            repos.payment_events.clone(),
            repos.uow.clone(),
        ));
        let api_key_service = Arc::new(ApiKeyService::new(repos.api_keys.clone(), encryption_key));

        Self {
            chain_resolver,
            abi_resolver,
            rpc_pool,
            quote_engine,
            adapter_probe,
            payment_coordinator,
            api_key_service,
        }
    }
}
