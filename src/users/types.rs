//! User account types
//!
//! A `User` is the wire-facing profile: identity, public key, usage stats,
//! and preferences. The matching private key is custodied by the registry
//! and never appears on this struct, so serializing a `User` can never leak
//! key material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::keys::UserPublicKey;

/// How aggressively the vault should treat this user's data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    Standard,
    High,
    Maximum,
}

impl Default for PrivacyLevel {
    fn default() -> Self {
        Self::Standard
    }
}

impl std::fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::High => write!(f, "high"),
            Self::Maximum => write!(f, "maximum"),
        }
    }
}

impl std::str::FromStr for PrivacyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "high" => Ok(Self::High),
            "maximum" => Ok(Self::Maximum),
            other => Err(format!("unknown privacy level: {}", other)),
        }
    }
}

/// Usage counters maintained by the vault
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Memories stored by this user
    pub memory_count: u32,
    /// Searches this user has run
    pub interaction_count: u32,
    /// Distinct external services connected
    pub connected_service_count: u32,
}

/// Per-user vault preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub privacy_level: PrivacyLevel,
    pub retention_policy: String,
    pub cross_platform_sync: bool,
}

/// A registered vault user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque user id (UUID v4 string)
    pub id: String,
    /// Normalized unique email
    pub email: String,
    pub display_name: String,
    /// Public half of the user's key pair, base64-encoded
    pub public_key: UserPublicKey,
    pub stats: UserStats,
    pub preferences: UserPreferences,
    pub created_at: DateTime<Utc>,
}

/// Request body for registering a user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub email: String,
    pub display_name: String,
    /// Full preference set; configured defaults apply when omitted
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

/// Partial preference update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub privacy_level: Option<PrivacyLevel>,
    pub retention_policy: Option<String>,
    pub cross_platform_sync: Option<bool>,
}
