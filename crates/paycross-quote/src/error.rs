//! [`QuoteError`] (SPEC_FULL.md §4.4, §7).

use paycross_abi::AbiError;
use paycross_chain::{ChainError, RpcCallError};
use paycross_repo::RepoError;
use paycross_types::{BridgeType, ErrorKind, HasErrorKind};

use crate::view::ViewCallError;

/// Per-bridge diagnostic recorded while walking the fallback order
/// (SPEC_FULL.md §4.4: "the engine fails with `InvalidFeeQuote` carrying
/// per-bridge diagnostics").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeDiagnostic {
    pub bridge_type: BridgeType,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("rpc call failed: {0}")]
    CallFailed(String),
    #[error("failed to decode contract return value: {0}")]
    DecodeFailed(String),
    /// Every bridge type in the fallback order failed to produce a positive
    /// fee; carries one diagnostic per attempted bridge, in order.
    #[error("no bridge in the fallback order produced a usable fee quote: {diagnostics:?}")]
    InvalidFeeQuote { diagnostics: Vec<BridgeDiagnostic> },
}

impl From<RpcCallError> for QuoteError {
    fn from(err: RpcCallError) -> Self {
        QuoteError::CallFailed(err.to_string())
    }
}

impl From<ViewCallError> for QuoteError {
    fn from(err: ViewCallError) -> Self {
        match err {
            ViewCallError::Pack(_, msg) => QuoteError::InvalidInput(msg),
            ViewCallError::Call(msg) => QuoteError::CallFailed(msg),
            ViewCallError::Empty => QuoteError::DecodeFailed("empty (0x) result".to_string()),
            ViewCallError::Decode(msg) => QuoteError::DecodeFailed(msg),
        }
    }
}

impl HasErrorKind for QuoteError {
    fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::InvalidInput(_) => ErrorKind::InvalidInput,
            QuoteError::Chain(err) => err.kind(),
            QuoteError::Abi(err) => err.kind(),
            QuoteError::Repo(err) => err.kind(),
            QuoteError::CallFailed(_) => ErrorKind::CallFailed,
            QuoteError::DecodeFailed(_) => ErrorKind::DecodeFailed,
            QuoteError::InvalidFeeQuote { .. } => ErrorKind::InvalidFeeQuote,
        }
    }
}
