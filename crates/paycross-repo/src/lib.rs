//! Repository and unit-of-work trait contracts consumed by the orchestrator
//! core (SPEC_FULL.md §6). Persistence drivers are out of scope (§1); this
//! crate defines only the shape of the contract.

pub mod entities;
pub mod repos;

pub use entities::{
    ApiKey, Chain, FeeConfig, Payment, PaymentEvent, PaymentRequest, RoutePolicy, RpcEndpoint,
    SmartContract,
};
pub use repos::{
    run_in_transaction, ApiKeyRepository, ChainRepository, FeeConfigRepository, LockedTx,
    PaymentEventRepository, PaymentRepository, RepoError, RoutePolicyRepository,
    SmartContractRepository, UnitOfWork, UnlockedTx,
};
