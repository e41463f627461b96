//! [`OrchestratorError`], the root error enum (SPEC_FULL.md §10.2): wraps
//! every component crate's error with `#[from]` and exposes the shared
//! [`ErrorKind`] taxonomy so an (out-of-scope) HTTP boundary can map to a
//! stable status code without matching on crate-specific variants.

use paycross_abi::AbiError;
use paycross_apikey::ApiKeyError;
use paycross_chain::ChainError;
use paycross_payments::PaymentError;
use paycross_probe::ProbeError;
use paycross_quote::QuoteError;
use paycross_repo::RepoError;
use paycross_types::{ErrorKind, HasErrorKind};

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    ApiKey(#[from] ApiKeyError),
}

impl HasErrorKind for OrchestratorError {
    fn kind(&self) -> ErrorKind {
        match self {
            OrchestratorError::Config(_) => ErrorKind::InvalidInput,
            OrchestratorError::Repo(err) => err.kind(),
            OrchestratorError::Chain(err) => err.kind(),
            OrchestratorError::Abi(err) => err.kind(),
            OrchestratorError::Probe(err) => err.kind(),
            OrchestratorError::Quote(err) => err.kind(),
            OrchestratorError::Payment(err) => err.kind(),
            OrchestratorError::ApiKey(err) => err.kind(),
        }
    }
}
