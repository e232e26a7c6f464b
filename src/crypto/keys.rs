//! Per-user key material
//!
//! Every user owns an X25519 key pair minted at registration. The public
//! half seals memory payloads; the private half stays inside the user
//! registry and is only released as a short-lived [`Decryptor`] capability.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Public half of a user's key pair
///
/// Serialized as a base64 string on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPublicKey(PublicKey);

impl UserPublicKey {
    /// Raw 32-byte representation
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Base64 encoding, as exposed in API responses
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0.as_bytes())
    }

    /// Parse a base64-encoded public key
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| Error::Validation(format!("Invalid public key encoding: {}", e)))?;
        let raw: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::Validation("Public key must be 32 bytes".to_string()))?;
        Ok(Self(PublicKey::from(raw)))
    }

    pub(crate) fn inner(&self) -> &PublicKey {
        &self.0
    }
}

impl Serialize for UserPublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for UserPublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Private half of a user's key pair
///
/// Never serialized. The underlying secret is wiped on drop.
pub struct UserPrivateKey(StaticSecret);

impl UserPrivateKey {
    /// Issue a decryption capability backed by this key
    pub fn decryptor(&self) -> Decryptor {
        Decryptor {
            secret: self.0.clone(),
        }
    }
}

impl std::fmt::Debug for UserPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UserPrivateKey(..)")
    }
}

/// A freshly generated X25519 key pair
#[derive(Debug)]
pub struct UserKeyPair {
    pub public: UserPublicKey,
    pub private: UserPrivateKey,
}

impl UserKeyPair {
    /// Generate a key pair from the system RNG
    pub fn generate() -> Result<Self> {
        let mut seed = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| Error::KeyGeneration(format!("System RNG unavailable: {}", e)))?;
        let secret = StaticSecret::from(seed);
        seed.zeroize();
        let public = PublicKey::from(&secret);
        Ok(Self {
            public: UserPublicKey(public),
            private: UserPrivateKey(secret),
        })
    }
}

/// Capability to open one user's sealed memories
///
/// Issued by the user registry for the duration of a single operation;
/// the private key never travels further than this handle.
pub struct Decryptor {
    secret: StaticSecret,
}

impl Decryptor {
    /// Open a sealed blob produced for this user's public key
    pub fn open(&self, sealed: &str) -> Result<Vec<u8>> {
        super::open(&self.secret, sealed)
    }
}
