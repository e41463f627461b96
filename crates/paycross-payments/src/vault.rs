//! Vault address resolution for the `approve` step (SPEC_FULL.md §4.6 step
//! 6): prefer a registered [`ContractType::Vault`] row; fall back to the
//! Gateway's own `gatewayVault()` view when none is registered.
//!
//! Address comparisons throughout this module are case-insensitive — EVM
//! addresses are hex and checksumming is a display convention, not an
//! identity one (an Open Question this crate resolves; see DESIGN.md).

use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use std::str::FromStr;

use paycross_chain::RpcClientPool;
use paycross_repo::entities::Chain;
use paycross_repo::{RepoError, SmartContractRepository};
use paycross_types::ContractType;
use paycross_quote::view;

use crate::error::PaymentError;

/// Case-insensitive address equality (SPEC_FULL.md Open Question, resolved
/// in DESIGN.md): EVM addresses differ only in checksum casing, never in
/// identity.
pub fn addresses_equal(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Resolves the vault address a token `approve` should target.
#[tracing::instrument(skip(contracts, rpc_pool, chain, gateway_abi), err)]
pub async fn resolve_vault_address(
    contracts: &dyn SmartContractRepository,
    rpc_pool: &RpcClientPool,
    chain: &Chain,
    gateway_abi: &JsonAbi,
    gateway_address: &str,
) -> Result<Address, PaymentError> {
    match contracts.get_active_contract(chain.id, ContractType::Vault).await {
        Ok(contract) => Address::from_str(contract.address.trim())
            .map_err(|err| PaymentError::InvalidInput(format!("registered vault address is invalid: {err}"))),
        Err(RepoError::NotFound) => {
            tracing::debug!(chain_id = %chain.id, "no registered vault contract; querying gatewayVault()");
            let client = rpc_pool.client_for_chain(chain).map_err(PaymentError::from)?;
            let result = view::call_view(client.as_ref(), gateway_abi, gateway_address, "gatewayVault", vec![])
                .await
                .map_err(|err| PaymentError::InvalidInput(format!("gatewayVault() call failed: {err}")))?;
            view::address_at(&result, 0)
                .ok_or_else(|| PaymentError::InvalidInput("gatewayVault() returned no address".to_string()))
        }
        Err(other) => Err(other.into()),
    }
}
