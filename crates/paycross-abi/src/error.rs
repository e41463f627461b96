//! [`AbiError`] (SPEC_FULL.md §4.2, §7).

use paycross_repo::RepoError;
use paycross_types::{ErrorKind, HasErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    /// Malformed ABI JSON on a contract registry row.
    #[error("invalid ABI JSON: {0}")]
    InvalidInput(String),
    /// Cache miss with no usable fallback.
    #[error("no ABI available for this chain/contract type")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl HasErrorKind for AbiError {
    fn kind(&self) -> ErrorKind {
        match self {
            AbiError::InvalidInput(_) => ErrorKind::InvalidInput,
            AbiError::NotFound => ErrorKind::NotFound,
            AbiError::Repo(err) => err.kind(),
        }
    }
}
