//! API-key lifecycle: creation and both validation paths (SPEC_FULL.md §4.7).

use rand::RngCore;
use std::sync::Arc;

use paycross_repo::{entities::ApiKey, ApiKeyRepository};
use paycross_types::{EntityId, UnixTimestamp};

use crate::crypto::{decrypt_secret, encrypt_secret};
use crate::error::ApiKeyError;
use crate::signing::{self, sha256_hex};

/// Request-signature drift tolerance (SPEC_FULL.md §4.7): `|now - timestamp| > 300s` rejects.
const MAX_CLOCK_DRIFT_SECONDS: u64 = 300;

/// A newly minted key pair: the persisted row plus the one-time plaintext
/// secret (SPEC_FULL.md §4.7: "Plaintext is returned exactly once").
#[derive(Debug, Clone)]
pub struct NewApiKey {
    pub key: ApiKey,
    pub public_key: String,
    pub secret_key: String,
}

pub struct ApiKeyService {
    repo: Arc<dyn ApiKeyRepository>,
    encryption_key: [u8; 32],
}

impl ApiKeyService {
    pub fn new(repo: Arc<dyn ApiKeyRepository>, encryption_key: [u8; 32]) -> Self {
        Self { repo, encryption_key }
    }

    fn random_hex32() -> String {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Creates a key pair for `user_id`. Persist: `keyHash = sha256(publicKey)`,
    /// `secretEncrypted = AES-256-GCM(secretKey)`, `secretMasked = "****" +
    /// secret[-4:]`.
    #[tracing::instrument(skip(self), err)]
    pub async fn create_key(&self, user_id: EntityId) -> Result<NewApiKey, ApiKeyError> {
        let public_key = format!("pk_live_{}", Self::random_hex32());
        let secret_key = format!("sk_live_{}", Self::random_hex32());

        let key_hash = sha256_hex(&public_key);
        let secret_encrypted = encrypt_secret(&secret_key, &self.encryption_key)?;
        let secret_masked = format!("****{}", &secret_key[secret_key.len().saturating_sub(4)..]);

        let record = ApiKey {
            id: EntityId::from_u128(0),
            user_id,
            key_hash,
            secret_encrypted,
            secret_masked,
            is_active: true,
            last_used_at: None,
        };
        let key = self.repo.create(record).await?;

        Ok(NewApiKey {
            key,
            public_key,
            secret_key,
        })
    }

    /// Validates a request authenticated by `public_key`'s signature. Rejects
    /// on clock drift, missing/inactive key, or signature mismatch; updates
    /// `lastUsedAt` on success.
    #[tracing::instrument(skip(self, signature), err)]
    pub async fn authenticate(
        &self,
        public_key: &str,
        timestamp: UnixTimestamp,
        method: &str,
        path: &str,
        body_hash: &str,
        signature: &str,
    ) -> Result<ApiKey, ApiKeyError> {
        let now = UnixTimestamp::try_now()
            .map_err(|err| ApiKeyError::Crypto(err.to_string()))?;
        if now.abs_diff(timestamp) > MAX_CLOCK_DRIFT_SECONDS {
            return Err(ApiKeyError::Unauthorized("request timestamp outside the allowed window".to_string()));
        }

        let key_hash = sha256_hex(public_key);
        let key = self.repo.get_by_key_hash(&key_hash).await?;
        self.verify_against(&key, timestamp, method, path, body_hash, signature)
            .await?;
        self.repo.touch_last_used(key.id, now).await?;
        Ok(key)
    }

    /// JWT-companion validation: tries every active key belonging to `user_id`
    /// in turn, tolerating an in-flight key rotation.
    #[tracing::instrument(skip(self, signature), err)]
    pub async fn authenticate_with_rotation(
        &self,
        user_id: EntityId,
        timestamp: UnixTimestamp,
        method: &str,
        path: &str,
        body_hash: &str,
        signature: &str,
    ) -> Result<ApiKey, ApiKeyError> {
        let now = UnixTimestamp::try_now()
            .map_err(|err| ApiKeyError::Crypto(err.to_string()))?;
        if now.abs_diff(timestamp) > MAX_CLOCK_DRIFT_SECONDS {
            return Err(ApiKeyError::Unauthorized("request timestamp outside the allowed window".to_string()));
        }

        let candidates = self.repo.get_active_by_user_id(user_id).await?;
        for key in candidates {
            if self
                .verify_against(&key, timestamp, method, path, body_hash, signature)
                .await
                .is_ok()
            {
                self.repo.touch_last_used(key.id, now).await?;
                return Ok(key);
            }
        }
        Err(ApiKeyError::Unauthorized(
            "no active key for this user validated the signature".to_string(),
        ))
    }

    async fn verify_against(
        &self,
        key: &ApiKey,
        timestamp: UnixTimestamp,
        method: &str,
        path: &str,
        body_hash: &str,
        signature: &str,
    ) -> Result<(), ApiKeyError> {
        if !key.is_active {
            return Err(ApiKeyError::Unauthorized("key is inactive".to_string()));
        }
        let secret = decrypt_secret(&key.secret_encrypted, &self.encryption_key)?;
        let expected = signing::sign(&secret, timestamp.seconds_since_epoch(), method, path, body_hash);
        if signing::verify(&expected, signature) {
            Ok(())
        } else {
            Err(ApiKeyError::Unauthorized("signature mismatch".to_string()))
        }
    }

    pub async fn revoke(&self, id: EntityId) -> Result<(), ApiKeyError> {
        Ok(self.repo.set_active(id, false).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use paycross_repo::RepoError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApiKeyRepo {
        keys: Mutex<Vec<ApiKey>>,
        next_id: Mutex<u128>,
    }

    #[async_trait]
    impl ApiKeyRepository for FakeApiKeyRepo {
        async fn create(&self, mut key: ApiKey) -> Result<ApiKey, RepoError> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            key.id = EntityId::from_u128(*next_id);
            self.keys.lock().unwrap().push(key.clone());
            Ok(key)
        }

        async fn get_by_key_hash(&self, key_hash: &str) -> Result<ApiKey, RepoError> {
            self.keys
                .lock()
                .unwrap()
                .iter()
                .find(|k| k.key_hash == key_hash)
                .cloned()
                .ok_or(RepoError::NotFound)
        }

        async fn get_active_by_user_id(&self, user_id: EntityId) -> Result<Vec<ApiKey>, RepoError> {
            Ok(self
                .keys
                .lock()
                .unwrap()
                .iter()
                .filter(|k| k.user_id == user_id && k.is_active)
                .cloned()
                .collect())
        }

        async fn touch_last_used(&self, id: EntityId, at: UnixTimestamp) -> Result<(), RepoError> {
            let mut keys = self.keys.lock().unwrap();
            let key = keys.iter_mut().find(|k| k.id == id).ok_or(RepoError::NotFound)?;
            key.last_used_at = Some(at);
            Ok(())
        }

        async fn set_active(&self, id: EntityId, is_active: bool) -> Result<(), RepoError> {
            let mut keys = self.keys.lock().unwrap();
            let key = keys.iter_mut().find(|k| k.id == id).ok_or(RepoError::NotFound)?;
            key.is_active = is_active;
            Ok(())
        }
    }

    fn service() -> (ApiKeyService, Arc<FakeApiKeyRepo>) {
        let repo = Arc::new(FakeApiKeyRepo::default());
        (ApiKeyService::new(repo.clone(), [0x42u8; 32]), repo)
    }

    #[tokio::test]
    async fn created_key_validates_its_own_signature() {
        let (service, _repo) = service();
        let user_id = EntityId::from_u128(7);
        let new_key = service.create_key(user_id).await.unwrap();

        let now = UnixTimestamp::try_now().unwrap();
        let secret = &new_key.secret_key;
        let signature = signing::sign(secret, now.seconds_since_epoch(), "POST", "/v1/payments", "bodyhash");

        let validated = service
            .authenticate(&new_key.public_key, now, "POST", "/v1/payments", "bodyhash", &signature)
            .await
            .unwrap();
        assert_eq!(validated.id, new_key.key.id);
    }

    #[tokio::test]
    async fn stale_timestamp_is_rejected() {
        let (service, _repo) = service();
        let new_key = service.create_key(EntityId::from_u128(1)).await.unwrap();

        let stale = UnixTimestamp(UnixTimestamp::try_now().unwrap().seconds_since_epoch() - 301);
        let signature = signing::sign(&new_key.secret_key, stale.seconds_since_epoch(), "GET", "/x", "h");

        let err = service
            .authenticate(&new_key.public_key, stale, "GET", "/x", "h", &signature)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiKeyError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn revoked_key_is_rejected() {
        let (service, _repo) = service();
        let new_key = service.create_key(EntityId::from_u128(2)).await.unwrap();
        service.revoke(new_key.key.id).await.unwrap();

        let now = UnixTimestamp::try_now().unwrap();
        let signature = signing::sign(&new_key.secret_key, now.seconds_since_epoch(), "GET", "/x", "h");
        let err = service
            .authenticate(&new_key.public_key, now, "GET", "/x", "h", &signature)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiKeyError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn rotation_validation_tries_every_active_key() {
        let (service, _repo) = service();
        let user_id = EntityId::from_u128(3);
        let _old_key = service.create_key(user_id).await.unwrap();
        let new_key = service.create_key(user_id).await.unwrap();

        let now = UnixTimestamp::try_now().unwrap();
        let signature = signing::sign(&new_key.secret_key, now.seconds_since_epoch(), "GET", "/x", "h");

        let validated = service
            .authenticate_with_rotation(user_id, now, "GET", "/x", "h", &signature)
            .await
            .unwrap();
        assert_eq!(validated.id, new_key.key.id);
    }
}
