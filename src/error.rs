//! MemVault error types

use thiserror::Error;

/// MemVault error type
#[derive(Error, Debug)]
pub enum Error {
    /// The supplied user id does not resolve to a registered user
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Memory type outside the fixed enumeration
    #[error("Invalid memory type: {0}")]
    InvalidType(String),

    /// Key pair generation failed; registration must not proceed
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Encryption failed (oversized payload, malformed key); the memory is not stored
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (malformed blob or mismatched key); recoverable per record
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Request payload failed a defensive check
    #[error("Validation error: {0}")]
    Validation(String),

    /// Email already registered under another user
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Entity extraction error
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for MemVault operations
pub type Result<T> = std::result::Result<T, Error>;
