//! Hybrid encryption for memory payloads
//!
//! Sealing is ECIES-style: a fresh ephemeral X25519 key agrees with the
//! recipient's public key, HKDF-SHA256 turns the shared secret into an
//! AES-256-GCM key, and the sealed blob carries
//! `ephemeral_pub || nonce || ciphertext`, base64-encoded. Each seal uses a
//! new ephemeral key and nonce, so sealing the same plaintext twice never
//! yields the same blob.

pub mod keys;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use keys::UserPublicKey;

/// Largest plaintext the vault will seal, in bytes
pub const MAX_PLAINTEXT_BYTES: usize = 64 * 1024;

const PUBKEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const HKDF_INFO: &[u8] = b"memvault-seal-v1";

/// Derive the symmetric sealing key for one (ephemeral, recipient) pairing
fn derive_key(shared: &[u8], ephemeral: &PublicKey, recipient: &PublicKey) -> Result<[u8; 32]> {
    let mut salt = Vec::with_capacity(PUBKEY_LEN * 2);
    salt.extend_from_slice(ephemeral.as_bytes());
    salt.extend_from_slice(recipient.as_bytes());
    let hk = Hkdf::<Sha256>::new(Some(&salt), shared);
    let mut key = [0u8; 32];
    hk.expand(HKDF_INFO, &mut key)
        .map_err(|e| Error::Encryption(format!("Key derivation failed: {}", e)))?;
    Ok(key)
}

/// Seal a plaintext for a recipient's public key
///
/// Returns the base64-encoded blob `ephemeral_pub || nonce || ciphertext`.
pub fn seal(recipient: &UserPublicKey, plaintext: &[u8]) -> Result<String> {
    if plaintext.len() > MAX_PLAINTEXT_BYTES {
        return Err(Error::Encryption(format!(
            "Plaintext exceeds {} byte limit: {} bytes",
            MAX_PLAINTEXT_BYTES,
            plaintext.len()
        )));
    }

    let mut eph_seed = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut eph_seed)
        .map_err(|e| Error::Encryption(format!("System RNG unavailable: {}", e)))?;
    let ephemeral = StaticSecret::from(eph_seed);
    eph_seed.zeroize();
    let ephemeral_pub = PublicKey::from(&ephemeral);

    let shared = ephemeral.diffie_hellman(recipient.inner());
    let mut key = derive_key(shared.as_bytes(), &ephemeral_pub, recipient.inner())?;
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| Error::Encryption(format!("Failed to create cipher: {}", e)))?;
    key.zeroize();

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| Error::Encryption(format!("System RNG unavailable: {}", e)))?;
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| Error::Encryption(format!("AES-GCM encryption failed: {}", e)))?;

    let mut blob = Vec::with_capacity(PUBKEY_LEN + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(ephemeral_pub.as_bytes());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(blob))
}

/// Open a sealed blob with the recipient's private key
pub fn open(private: &StaticSecret, sealed: &str) -> Result<Vec<u8>> {
    let blob = BASE64
        .decode(sealed)
        .map_err(|e| Error::Decryption(format!("Invalid base64: {}", e)))?;
    if blob.len() < PUBKEY_LEN + NONCE_LEN {
        return Err(Error::Decryption(format!(
            "Sealed blob too short: {} bytes",
            blob.len()
        )));
    }

    let mut eph_raw = [0u8; PUBKEY_LEN];
    eph_raw.copy_from_slice(&blob[..PUBKEY_LEN]);
    let ephemeral_pub = PublicKey::from(eph_raw);
    let recipient_pub = PublicKey::from(private);

    let shared = private.diffie_hellman(&ephemeral_pub);
    let mut key = derive_key(shared.as_bytes(), &ephemeral_pub, &recipient_pub)?;
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| Error::Decryption(format!("Failed to create cipher: {}", e)))?;
    key.zeroize();

    let nonce = Nonce::from_slice(&blob[PUBKEY_LEN..PUBKEY_LEN + NONCE_LEN]);
    cipher
        .decrypt(nonce, &blob[PUBKEY_LEN + NONCE_LEN..])
        .map_err(|_| Error::Decryption("Ciphertext authentication failed".to_string()))
}
