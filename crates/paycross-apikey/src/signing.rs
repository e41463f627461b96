//! HMAC-SHA256 request signing (SPEC_FULL.md §4.7).

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// `sha256Hex(publicKey)`, the `ApiKey.keyHash` derivation.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// `hmacSha256Hex(secret, timestamp ∥ method ∥ path ∥ bodyHash)`.
pub fn sign(secret: &str, timestamp: u64, method: &str, path: &str, body_hash: &str) -> String {
    let message = format!("{timestamp}{method}{path}{body_hash}");
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts a key of any length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison of a computed signature against the one a
/// caller supplied, both hex-encoded.
pub fn verify(expected_hex: &str, provided_hex: &str) -> bool {
    let (Ok(expected), Ok(provided)) = (hex::decode(expected_hex), hex::decode(provided_hex)) else {
        return false;
    };
    expected.ct_eq(&provided).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_is_deterministic_and_verify_round_trips() {
        let sig = sign("secret", 1_700_000_000, "POST", "/v1/payments", "abc123");
        assert!(verify(&sig, &sig));
    }

    #[test]
    fn verify_rejects_a_tampered_signature() {
        let sig = sign("secret", 1_700_000_000, "POST", "/v1/payments", "abc123");
        let other = sign("secret", 1_700_000_000, "POST", "/v1/payments", "abc124");
        assert!(!verify(&sig, &other));
    }

    #[test]
    fn verify_rejects_malformed_hex() {
        assert!(!verify("deadbeef", "not-hex"));
    }

    #[test]
    fn sha256_hex_is_deterministic() {
        assert_eq!(sha256_hex("pk_live_abc"), sha256_hex("pk_live_abc"));
        assert_ne!(sha256_hex("pk_live_abc"), sha256_hex("pk_live_abd"));
    }
}
