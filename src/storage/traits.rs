//! Storage trait definitions for LTI registration data.
//!
//! Defines async storage interfaces for pending registrations, registered
//! platforms, and tool signing keys that can be implemented by various
//! backend providers. No cross-operation atomicity is guaranteed between
//! the traits; single operations (such as consuming a pending registration)
//! are atomic within a backend.

use crate::errors::StorageError;
use crate::lti::types::{PendingRegistration, Platform};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Tool signing key pair as held by the key store.
///
/// Private key is PKCS#8 PEM, public key SPKI PEM. The public half is
/// convertible to a JWK for later JWKS publication.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct SigningKeyPair {
    /// Opaque key identifier
    pub kid: String,
    /// PKCS#8 PEM encoded private key
    pub private_key_pem: String,
    /// SPKI PEM encoded public key
    pub public_key_pem: String,
    /// Key creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Trait for storing and consuming pending registrations
#[async_trait]
pub trait PendingRegistrationStore: Send + Sync {
    /// Store a pending registration keyed by its configuration endpoint,
    /// overwriting any prior entry for the same endpoint
    async fn store_pending(&self, pending: &PendingRegistration) -> Result<()>;

    /// Retrieve and delete the pending registration for a configuration
    /// endpoint (single-use semantics)
    async fn consume_pending(
        &self,
        configuration_endpoint: &str,
    ) -> Result<Option<PendingRegistration>>;
}

/// Trait for storing and retrieving registered platforms
#[async_trait]
pub trait PlatformStore: Send + Sync {
    /// Store a platform record keyed by `(url, client_id)`
    async fn store_platform(&self, platform: &Platform) -> Result<()>;

    /// Retrieve a platform by issuer URL and client id
    async fn get_platform(&self, url: &str, client_id: &str) -> Result<Option<Platform>>;

    /// Check whether a platform record exists for `(url, client_id)`
    async fn platform_exists(&self, url: &str, client_id: &str) -> Result<bool>;

    /// List all registered platforms
    async fn list_platforms(&self) -> Result<Vec<Platform>>;
}

/// Trait for storing and retrieving tool signing keys
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Store a signing key pair under its key id
    async fn store_key(&self, key: &SigningKeyPair) -> Result<()>;

    /// Retrieve a signing key pair by key id
    async fn get_key(&self, kid: &str) -> Result<Option<SigningKeyPair>>;

    /// List all key ids
    async fn list_key_ids(&self) -> Result<Vec<String>>;
}

/// Combined LTI storage trait
pub trait LtiStorage: PendingRegistrationStore + PlatformStore + KeyStore + Send + Sync {}
