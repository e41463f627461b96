//! [`ChainError`] and [`RpcCallError`] (SPEC_FULL.md §7).

use paycross_repo::RepoError;
use paycross_types::{ErrorKind, HasErrorKind};

/// Failures from the Chain Resolver (SPEC_FULL.md §4.1).
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// None of the resolver's three lookup attempts succeeded.
    #[error("{0:?} does not resolve to a known chain")]
    InvalidInput(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl HasErrorKind for ChainError {
    fn kind(&self) -> ErrorKind {
        match self {
            ChainError::InvalidInput(_) => ErrorKind::InvalidInput,
            ChainError::Repo(err) => err.kind(),
        }
    }
}

/// Failures from the EVM RPC client pool (SPEC_FULL.md §2 item 3, §4.3).
#[derive(Debug, thiserror::Error)]
pub enum RpcCallError {
    #[error("chain {0:?} has no usable RPC endpoint")]
    NoEndpoints(String),
    #[error("rpc transport error: {0}")]
    Transport(String),
}

impl HasErrorKind for RpcCallError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::CallFailed
    }
}
