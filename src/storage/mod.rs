//! Trait-based storage abstractions with an in-memory backend.

pub mod inmemory;
pub mod key_provider;
pub mod traits;

// Re-export commonly used types and traits
pub use inmemory::MemoryLtiStorage;
pub use key_provider::{JsonWebKey, KeyPairProvider, RsaKeyPairProvider};
pub use traits::*;

use crate::errors::StorageError;
use std::sync::Arc;

/// Storage backend configuration and factory
#[derive(Clone)]
pub enum StorageBackend {
    Memory,
}

/// Create a storage backend based on configuration
pub fn create_storage_backend(
    backend: StorageBackend,
) -> std::result::Result<Arc<dyn LtiStorage>, StorageError> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryLtiStorage::new())),
    }
}

/// Parse storage backend from configuration string
pub fn parse_storage_backend(
    backend_name: &str,
) -> std::result::Result<StorageBackend, StorageError> {
    match backend_name {
        "memory" => Ok(StorageBackend::Memory),
        _ => Err(StorageError::InvalidData(format!(
            "Unknown storage backend: {}",
            backend_name
        ))),
    }
}
