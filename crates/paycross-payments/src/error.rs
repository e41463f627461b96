//! [`PaymentError`] (SPEC_FULL.md §4.6, §7).

use paycross_abi::AbiError;
use paycross_chain::{ChainError, RpcCallError};
use paycross_quote::QuoteError;
use paycross_repo::RepoError;
use paycross_types::{ErrorKind, HasErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("rpc call failed: {0}")]
    CallFailed(String),
}

impl From<RpcCallError> for PaymentError {
    fn from(err: RpcCallError) -> Self {
        PaymentError::CallFailed(err.to_string())
    }
}

impl HasErrorKind for PaymentError {
    fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::InvalidInput(_) => ErrorKind::InvalidInput,
            PaymentError::Chain(err) => err.kind(),
            PaymentError::Abi(err) => err.kind(),
            PaymentError::Quote(err) => err.kind(),
            PaymentError::Repo(err) => err.kind(),
            PaymentError::CallFailed(_) => ErrorKind::CallFailed,
        }
    }
}
