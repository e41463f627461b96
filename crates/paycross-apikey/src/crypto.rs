//! AES-256-GCM encryption at rest for the secret half of an API key
//! (SPEC_FULL.md §4.7) and the `encryptionKey` config parse helper (§6).

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

use crate::error::ApiKeyError;

const NONCE_LEN: usize = 12;

/// Encrypts `plaintext` under `key`, returning `hex(nonce || ciphertext)`.
pub fn encrypt_secret(plaintext: &str, key: &[u8; 32]) -> Result<String, ApiKeyError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|err| ApiKeyError::Crypto(err.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|err| ApiKeyError::Crypto(err.to_string()))?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend_from_slice(&ciphertext);
    Ok(hex::encode(combined))
}

/// Reverses [`encrypt_secret`].
pub fn decrypt_secret(encoded: &str, key: &[u8; 32]) -> Result<String, ApiKeyError> {
    let combined = hex::decode(encoded).map_err(|err| ApiKeyError::Crypto(err.to_string()))?;
    if combined.len() < NONCE_LEN {
        return Err(ApiKeyError::Crypto(
            "ciphertext shorter than the nonce".to_string(),
        ));
    }
    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|err| ApiKeyError::Crypto(err.to_string()))?;
    let nonce = Nonce::from_slice(nonce_bytes);
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|err| ApiKeyError::Crypto(err.to_string()))?;
    String::from_utf8(plaintext).map_err(|err| ApiKeyError::Crypto(err.to_string()))
}

/// Parses the `encryptionKey` config value: a 64-character hex string
/// (32 bytes), or — accepted but discouraged — a raw 32-byte string
/// (SPEC_FULL.md §6).
pub fn parse_encryption_key(raw: &str) -> Result<[u8; 32], ApiKeyError> {
    let trimmed = raw.trim();
    if trimmed.len() == 64 {
        let bytes = hex::decode(trimmed).map_err(|err| ApiKeyError::Crypto(err.to_string()))?;
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(key)
    } else if trimmed.len() == 32 {
        tracing::warn!("encryptionKey given as a raw 32-byte string, not 64-character hex; accepted but discouraged");
        let mut key = [0u8; 32];
        key.copy_from_slice(trimmed.as_bytes());
        Ok(key)
    } else {
        Err(ApiKeyError::InvalidInput(format!(
            "encryptionKey must be 64 hex characters or a raw 32-byte string, got {} characters",
            trimmed.len()
        )))
    }
}
