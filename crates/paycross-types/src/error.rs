//! Shared error-kind taxonomy (SPEC_FULL.md §7).
//!
//! Each component crate defines its own `thiserror::Error` enum for the
//! failures it can actually produce; every variant also reports an
//! [`ErrorKind`] so a caller at the (out-of-scope) HTTP boundary can map to a
//! stable status code without matching on crate-specific variants.

use std::fmt;

/// A stable, user-facing error classification. Distinct from the exception
/// hierarchy of any one component: this is a result tag, not a type to
/// `match` deeply on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed identifier, failed ABI type construction, amount parse
    /// failure, decimals mismatch.
    InvalidInput,
    /// Chain / contract / payment not resolvable.
    NotFound,
    /// Timestamp drift, bad signature, inactive key.
    Unauthorized,
    /// Ownership mismatch (e.g. revoking someone else's key).
    Forbidden,
    /// Wallet already bound to another user.
    Conflict,
    /// RPC error (transport or contract revert).
    CallFailed,
    /// Empty or malformed contract return.
    DecodeFailed,
    /// Every bridge in the fallback order failed to produce a positive fee.
    InvalidFeeQuote,
    /// Retriable internal failure (e.g. encryption randomness exhaustion).
    Transient,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::CallFailed => "call_failed",
            ErrorKind::DecodeFailed => "decode_failed",
            ErrorKind::InvalidFeeQuote => "invalid_fee_quote",
            ErrorKind::Transient => "transient",
        };
        write!(f, "{s}")
    }
}

/// Implemented by every component error enum so the taxonomy is queryable
/// without downcasting.
pub trait HasErrorKind {
    fn kind(&self) -> ErrorKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display_is_snake_case() {
        assert_eq!(ErrorKind::InvalidFeeQuote.to_string(), "invalid_fee_quote");
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
    }
}
