//! Chain Resolver (SPEC_FULL.md §4.1).
//!
//! `resolve_any` accepts whatever format a caller at the (out-of-scope) API
//! boundary happened to pass — an opaque entity id, a raw chain reference, or
//! a CAIP-2 string — and normalizes it to `(EntityId, Caip2)` so nothing
//! downstream has to care which format the caller used.

use paycross_repo::{entities::Chain, ChainRepository};
use paycross_types::{Caip2, EntityId};
use std::sync::Arc;

use crate::error::ChainError;

/// Resolves external chain identifiers against a [`ChainRepository`].
pub struct ChainResolver {
    repo: Arc<dyn ChainRepository>,
}

impl ChainResolver {
    pub fn new(repo: Arc<dyn ChainRepository>) -> Self {
        Self { repo }
    }

    /// `resolveAny(input) -> (chainId, caip2)` (SPEC_FULL.md §4.1).
    ///
    /// Tries, in order: opaque id, verbatim CAIP-2 lookup, then a
    /// namespace-stripped raw-reference lookup. Fails only once all three
    /// attempts have missed.
    #[tracing::instrument(skip(self), err)]
    pub async fn resolve_any(&self, input: &str) -> Result<(EntityId, Caip2), ChainError> {
        let trimmed = input.trim();

        if let Ok(id) = trimmed.parse::<EntityId>() {
            if let Ok(chain) = self.repo.get_by_id(id).await {
                return Ok((chain.id, chain.caip2()));
            }
        }

        if let Ok(chain) = self.repo.get_by_caip2(trimmed).await {
            return Ok((chain.id, chain.caip2()));
        }

        if let Some((_namespace, raw_ref)) = Caip2::strip_known_namespace(trimmed) {
            if let Ok(chain) = self.repo.get_by_chain_ref(raw_ref).await {
                return Ok((chain.id, chain.caip2()));
            }
        }

        Err(ChainError::InvalidInput(input.to_string()))
    }

    pub async fn get_by_id(&self, id: EntityId) -> Result<Chain, ChainError> {
        Ok(self.repo.get_by_id(id).await?)
    }
}
