//! In-memory LTI storage implementation
//!
//! This module provides in-memory implementations for the LTI registration
//! storage traits.

use crate::errors::StorageError;
use crate::lti::types::{PendingRegistration, Platform};
use crate::storage::traits::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

pub type Result<T> = std::result::Result<T, StorageError>;

/// In-memory implementation for LTI registration storage
#[derive(Default)]
pub struct MemoryLtiStorage {
    pending: Mutex<HashMap<String, PendingRegistration>>,
    platforms: Mutex<HashMap<String, Platform>>,
    keys: Mutex<HashMap<String, SigningKeyPair>>,
}

impl MemoryLtiStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a unique platform key from issuer URL and client id
    fn platform_key(url: &str, client_id: &str) -> String {
        format!("{}:{}", url, client_id)
    }
}

#[async_trait]
impl PendingRegistrationStore for MemoryLtiStorage {
    async fn store_pending(&self, pending: &PendingRegistration) -> Result<()> {
        let mut entries = self
            .pending
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        entries.insert(pending.configuration_endpoint.clone(), pending.clone());
        Ok(())
    }

    async fn consume_pending(
        &self,
        configuration_endpoint: &str,
    ) -> Result<Option<PendingRegistration>> {
        let mut entries = self
            .pending
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(entries.remove(configuration_endpoint))
    }
}

#[async_trait]
impl PlatformStore for MemoryLtiStorage {
    async fn store_platform(&self, platform: &Platform) -> Result<()> {
        let mut platforms = self
            .platforms
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        platforms.insert(
            Self::platform_key(&platform.url, &platform.client_id),
            platform.clone(),
        );
        Ok(())
    }

    async fn get_platform(&self, url: &str, client_id: &str) -> Result<Option<Platform>> {
        let platforms = self
            .platforms
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(platforms.get(&Self::platform_key(url, client_id)).cloned())
    }

    async fn platform_exists(&self, url: &str, client_id: &str) -> Result<bool> {
        let platforms = self
            .platforms
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(platforms.contains_key(&Self::platform_key(url, client_id)))
    }

    async fn list_platforms(&self) -> Result<Vec<Platform>> {
        let platforms = self
            .platforms
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(platforms.values().cloned().collect())
    }
}

#[async_trait]
impl KeyStore for MemoryLtiStorage {
    async fn store_key(&self, key: &SigningKeyPair) -> Result<()> {
        let mut keys = self
            .keys
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        keys.insert(key.kid.clone(), key.clone());
        Ok(())
    }

    async fn get_key(&self, kid: &str) -> Result<Option<SigningKeyPair>> {
        let keys = self
            .keys
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(keys.get(kid).cloned())
    }

    async fn list_key_ids(&self) -> Result<Vec<String>> {
        let keys = self
            .keys
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(keys.keys().cloned().collect())
    }
}

impl LtiStorage for MemoryLtiStorage {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lti::types::{AuthConfig, AuthConfigMethod};
    use chrono::Utc;

    fn sample_platform(url: &str, client_id: &str, tool_name: &str) -> Platform {
        Platform {
            url: url.to_string(),
            client_id: client_id.to_string(),
            name: "moodle".to_string(),
            tool_name: tool_name.to_string(),
            authentication_endpoint: format!("{}/auth", url),
            access_token_endpoint: format!("{}/token", url),
            auth_config: AuthConfig {
                method: AuthConfigMethod::JwkSet,
                key: format!("{}/jwks", url),
            },
            kid: "kid-1".to_string(),
            registered_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_pending_registration_is_single_use() {
        let storage = MemoryLtiStorage::new();
        let pending = PendingRegistration::new(
            "https://lms.example/.well-known/cfg".to_string(),
            Some("token-1".to_string()),
        );

        storage.store_pending(&pending).await.unwrap();

        let consumed = storage
            .consume_pending("https://lms.example/.well-known/cfg")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(consumed.registration_token, "token-1");

        // A second consume for the same endpoint finds nothing.
        assert!(storage
            .consume_pending("https://lms.example/.well-known/cfg")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_store_pending_overwrites_prior_entry() {
        let storage = MemoryLtiStorage::new();
        let endpoint = "https://lms.example/.well-known/cfg";

        storage
            .store_pending(&PendingRegistration::new(
                endpoint.to_string(),
                Some("stale".to_string()),
            ))
            .await
            .unwrap();
        storage
            .store_pending(&PendingRegistration::new(
                endpoint.to_string(),
                Some("fresh".to_string()),
            ))
            .await
            .unwrap();

        let consumed = storage.consume_pending(endpoint).await.unwrap().unwrap();
        assert_eq!(consumed.registration_token, "fresh");
        assert!(storage.consume_pending(endpoint).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_stored_as_empty() {
        let storage = MemoryLtiStorage::new();
        let endpoint = "https://lms.example/.well-known/cfg";

        storage
            .store_pending(&PendingRegistration::new(endpoint.to_string(), None))
            .await
            .unwrap();

        let consumed = storage.consume_pending(endpoint).await.unwrap().unwrap();
        assert_eq!(consumed.registration_token, "");
    }

    #[tokio::test]
    async fn test_platform_exists_after_store() {
        let storage = MemoryLtiStorage::new();
        let platform = sample_platform("https://lms.example", "abc123", "My Tool");

        assert!(!storage
            .platform_exists("https://lms.example", "abc123")
            .await
            .unwrap());

        storage.store_platform(&platform).await.unwrap();

        assert!(storage
            .platform_exists("https://lms.example", "abc123")
            .await
            .unwrap());
        let fetched = storage
            .get_platform("https://lms.example", "abc123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.tool_name, "My Tool");

        // Same issuer under a different client id is a distinct record.
        assert!(!storage
            .platform_exists("https://lms.example", "other")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_store_platform_is_last_write_wins() {
        // The store itself gives no conditional insert; the duplicate check
        // lives in the registration service, so two raw writes for the same
        // key silently overwrite. Probes the documented check-then-act race.
        let storage = MemoryLtiStorage::new();

        storage
            .store_platform(&sample_platform("https://lms.example", "abc123", "first"))
            .await
            .unwrap();
        storage
            .store_platform(&sample_platform("https://lms.example", "abc123", "second"))
            .await
            .unwrap();

        let platforms = storage.list_platforms().await.unwrap();
        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].tool_name, "second");
    }

    #[tokio::test]
    async fn test_key_store_roundtrip() {
        let storage = MemoryLtiStorage::new();
        let key = SigningKeyPair {
            kid: "kid-1".to_string(),
            private_key_pem: "private".to_string(),
            public_key_pem: "public".to_string(),
            created_at: Utc::now(),
        };

        storage.store_key(&key).await.unwrap();

        let fetched = storage.get_key("kid-1").await.unwrap().unwrap();
        assert_eq!(fetched.public_key_pem, "public");
        assert_eq!(storage.list_key_ids().await.unwrap(), vec!["kid-1"]);
        assert!(storage.get_key("kid-2").await.unwrap().is_none());
    }
}
