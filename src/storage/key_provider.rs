//! Tool signing key pair generation backed by the key store.
//!
//! Each completed registration gets its own RSA key pair; the public half is
//! published later through the tool's JWKS document, referenced by `kid`.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::KeyError;
use crate::storage::traits::{KeyStore, SigningKeyPair};

/// RSA key size in bits for RS256 signing keys
const RSA_KEY_SIZE: usize = 2048;

pub type Result<T> = std::result::Result<T, KeyError>;

/// Public JWK representation of a tool signing key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key type (always "RSA")
    pub kty: String,
    /// Public key use (always "sig")
    #[serde(rename = "use")]
    pub key_use: String,
    /// Key id
    pub kid: String,
    /// Algorithm (RS256)
    pub alg: String,
    /// RSA modulus (base64url encoded)
    pub n: String,
    /// RSA exponent (base64url encoded)
    pub e: String,
}

/// Trait for producing fresh tool signing key pairs
#[async_trait]
pub trait KeyPairProvider: Send + Sync {
    /// Generate and store a new signing key pair, returning its fresh `kid`.
    /// Identifiers are never reused across calls.
    async fn generate_key_pair(&self) -> Result<String>;
}

/// Key pair provider generating RSA keys into a [`KeyStore`]
pub struct RsaKeyPairProvider {
    key_store: Arc<dyn KeyStore>,
    key_size_bits: usize,
}

impl RsaKeyPairProvider {
    pub fn new(key_store: Arc<dyn KeyStore>) -> Self {
        Self {
            key_store,
            key_size_bits: RSA_KEY_SIZE,
        }
    }
}

#[async_trait]
impl KeyPairProvider for RsaKeyPairProvider {
    async fn generate_key_pair(&self) -> Result<String> {
        let kid = Uuid::new_v4().to_string();
        let key = generate_signing_key_pair(&kid, self.key_size_bits)?;

        self.key_store
            .store_key(&key)
            .await
            .map_err(|e| KeyError::StorageFailed(e.to_string()))?;

        tracing::debug!(kid = %kid, "generated tool signing key pair");
        Ok(kid)
    }
}

/// Generate an RSA key pair and encode it for storage
fn generate_signing_key_pair(kid: &str, key_size_bits: usize) -> Result<SigningKeyPair> {
    use rand::rngs::OsRng;

    let mut rng = OsRng;
    let private_key = RsaPrivateKey::new(&mut rng, key_size_bits)
        .map_err(|e| KeyError::GenerationFailed(e.to_string()))?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_key_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| KeyError::EncodingFailed(e.to_string()))?
        .to_string();
    let public_key_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| KeyError::EncodingFailed(e.to_string()))?;

    Ok(SigningKeyPair {
        kid: kid.to_string(),
        private_key_pem,
        public_key_pem,
        created_at: Utc::now(),
    })
}

impl SigningKeyPair {
    /// Convert the public half to JWK format for JWKS publication
    pub fn to_jwk(&self) -> Result<JsonWebKey> {
        use rsa::pkcs8::DecodePublicKey;

        let public_key = RsaPublicKey::from_public_key_pem(&self.public_key_pem)
            .map_err(|e| KeyError::EncodingFailed(e.to_string()))?;

        let n = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
        let e = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());

        Ok(JsonWebKey {
            kty: "RSA".to_string(),
            key_use: "sig".to_string(),
            kid: self.kid.clone(),
            alg: "RS256".to_string(),
            n,
            e,
        })
    }
}
