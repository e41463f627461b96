//! ABI caching with canonical fallback, and EVM revert-data decoding
//! (SPEC_FULL.md §4.2, §4.5).
//!
//! - [`canonical`] — the built-in [`canonical::PlatformAbis`] fallback set.
//! - [`cache`] — the concurrency-safe `(chainId, contractType) -> ABI` cache.
//! - [`resolver`] — [`resolver::AbiResolver`], the `resolveABI` /
//!   `resolveABIWithFallback` orchestration.
//! - [`revert`] — the static selector-table revert decoder.
//! - [`error`] — [`error::AbiError`].

pub mod cache;
pub mod canonical;
pub mod error;
pub mod resolver;
pub mod revert;

pub use cache::{AbiCache, CachedAbi};
pub use canonical::PlatformAbis;
pub use error::AbiError;
pub use resolver::AbiResolver;
pub use revert::{decode as decode_revert, decode_from_error_text, DecodedRevert};
