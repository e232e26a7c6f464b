//! MemVault - Per-User Encrypted Memory Vault
//!
//! MemVault stores opaque "memory" records under user-controlled encryption
//! keys, scores them against a query context, and returns ranked, decrypted
//! results only to the owning user.
//!
//! ## Architecture
//!
//! ```text
//!                       ┌──────────────────────┐
//!    write path         │     VaultService     │        read path
//!                       └──────────┬───────────┘
//!   content ──► EntityExtractor   │   scan owner ──► RelevanceScorer
//!                   │             │        │   (tags + entities only)
//!                   ▼             │        ▼
//!          seal (X25519 + HKDF    │   threshold > 0.5, rank, truncate
//!           + AES-256-GCM)        │        │
//!                   │             │        ▼
//!                   ▼             │   Decryptor.open per survivor
//!          MemoryBackend.put      │        │
//!                                 │        ▼
//!                                 │   access_count += 1, ranked hits
//! ```
//!
//! Private keys never leave the [`users::UserRegistry`]: sealing needs only
//! the owner's public key, and reading goes through a per-operation
//! [`crypto::keys::Decryptor`] capability issued to the authenticated owner.
//! Relevance scores are computed fresh on every search from unencrypted
//! metadata and are never persisted.
//!
//! ## Modules
//!
//! - [`vault`]: service boundary consumed by the HTTP layer
//! - [`users`]: accounts, preferences, stats, and key custody
//! - [`memory`]: sealed records, extraction, scoring, storage
//! - [`crypto`]: hybrid sealing and per-user key material
//! - [`config`]: configuration management

pub mod config;
pub mod crypto;
pub mod error;
pub mod memory;
pub mod users;
pub mod vault;

pub use config::VaultConfig;
pub use error::{Error, Result};
pub use vault::VaultService;
