//! [`ProbeError`] (SPEC_FULL.md §4.3, §7).

use paycross_abi::AbiError;
use paycross_chain::ChainError;
use paycross_quote::view::ViewCallError;
use paycross_types::{ErrorKind, HasErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error("failed to pack arguments: {0}")]
    InvalidInput(String),
    #[error("rpc call failed: {0}")]
    CallFailed(String),
    #[error("failed to decode contract return value: {0}")]
    DecodeFailed(String),
}

impl From<ViewCallError> for ProbeError {
    fn from(err: ViewCallError) -> Self {
        match err {
            ViewCallError::Pack(_, msg) => ProbeError::InvalidInput(msg),
            ViewCallError::Call(msg) => ProbeError::CallFailed(msg),
            ViewCallError::Empty => ProbeError::DecodeFailed("empty (0x) result".to_string()),
            ViewCallError::Decode(msg) => ProbeError::DecodeFailed(msg),
        }
    }
}

impl HasErrorKind for ProbeError {
    fn kind(&self) -> ErrorKind {
        match self {
            ProbeError::Chain(err) => err.kind(),
            ProbeError::Abi(err) => err.kind(),
            ProbeError::InvalidInput(_) => ErrorKind::InvalidInput,
            ProbeError::CallFailed(_) => ErrorKind::CallFailed,
            ProbeError::DecodeFailed(_) => ErrorKind::DecodeFailed,
        }
    }
}
