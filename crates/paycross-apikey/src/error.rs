//! [`ApiKeyError`] (SPEC_FULL.md §4.7, §7).

use paycross_repo::RepoError;
use paycross_types::{ErrorKind, HasErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum ApiKeyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
    /// Encrypt/decrypt or key-derivation failure.
    #[error("cryptographic operation failed: {0}")]
    Crypto(String),
}

impl HasErrorKind for ApiKeyError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiKeyError::InvalidInput(_) => ErrorKind::InvalidInput,
            ApiKeyError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiKeyError::Repo(err) => err.kind(),
            ApiKeyError::Crypto(_) => ErrorKind::Transient,
        }
    }
}
