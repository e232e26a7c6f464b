//! Users module — accounts, preferences, and key custody
//!
//! Registration mints a per-user X25519 key pair; the registry keeps the
//! private half and issues decryption capabilities only for the
//! authenticated owner.

pub mod registry;
pub mod types;

pub use registry::UserRegistry;
pub use types::{
    PrivacyLevel, RegisterUserRequest, UpdatePreferencesRequest, User, UserPreferences, UserStats,
};
