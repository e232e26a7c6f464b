//! User registry with private key custody
//!
//! The registry owns the only copy of each user's private key. Everything
//! else in the crate works with public keys or with a [`Decryptor`]
//! capability issued here for the authenticated owner, so neither the
//! storage backend nor the service layer ever handles raw key material.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{RegisterUserRequest, UpdatePreferencesRequest, User, UserPreferences, UserStats};
use crate::config::RegistrationConfig;
use crate::crypto::keys::{Decryptor, UserKeyPair, UserPrivateKey, UserPublicKey};
use crate::error::{Error, Result};

struct UserEntry {
    user: User,
    private_key: UserPrivateKey,
    connected_services: HashSet<String>,
}

/// In-process registry of users and their key pairs
pub struct UserRegistry {
    entries: Arc<RwLock<HashMap<String, UserEntry>>>,
}

impl UserRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a new user
    ///
    /// Key generation runs first: if the RNG fails, no user is persisted.
    /// The email is normalized (trimmed, lower-cased) and must be unique.
    pub async fn register(
        &self,
        request: RegisterUserRequest,
        defaults: &RegistrationConfig,
    ) -> Result<User> {
        let email = normalize_email(&request.email);
        if email.is_empty() {
            return Err(Error::Validation("Email is required".to_string()));
        }
        if !email.contains('@') {
            return Err(Error::Validation(format!("Invalid email address: {}", email)));
        }
        let display_name = request.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(Error::Validation("Display name is required".to_string()));
        }

        let keypair = UserKeyPair::generate()?;
        let preferences = request.preferences.unwrap_or_else(|| UserPreferences {
            privacy_level: defaults.default_privacy_level,
            retention_policy: defaults.default_retention_policy.clone(),
            cross_platform_sync: defaults.cross_platform_sync,
        });

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            display_name,
            public_key: keypair.public,
            stats: UserStats::default(),
            preferences,
            created_at: chrono::Utc::now(),
        };

        let mut entries = self.entries.write().await;
        if entries.values().any(|e| e.user.email == email) {
            return Err(Error::DuplicateEmail(email));
        }
        tracing::debug!("Registered user {} ({})", user.id, user.email);
        entries.insert(
            user.id.clone(),
            UserEntry {
                user: user.clone(),
                private_key: keypair.private,
                connected_services: HashSet::new(),
            },
        );
        Ok(user)
    }

    /// Fetch a user's profile
    pub async fn get(&self, user_id: &str) -> Result<User> {
        self.entries
            .read()
            .await
            .get(user_id)
            .map(|e| e.user.clone())
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))
    }

    /// Public key for sealing payloads addressed to this user
    pub async fn public_key_of(&self, user_id: &str) -> Result<UserPublicKey> {
        self.entries
            .read()
            .await
            .get(user_id)
            .map(|e| e.user.public_key.clone())
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))
    }

    /// Issue a decryption capability for the authenticated owner
    pub async fn decryptor_for(&self, user_id: &str) -> Result<Decryptor> {
        self.entries
            .read()
            .await
            .get(user_id)
            .map(|e| e.private_key.decryptor())
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))
    }

    /// Apply a partial preference update, returning the updated profile
    pub async fn update_preferences(
        &self,
        user_id: &str,
        request: UpdatePreferencesRequest,
    ) -> Result<User> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(user_id)
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;

        if let Some(privacy_level) = request.privacy_level {
            entry.user.preferences.privacy_level = privacy_level;
        }
        if let Some(retention_policy) = request.retention_policy {
            entry.user.preferences.retention_policy = retention_policy;
        }
        if let Some(cross_platform_sync) = request.cross_platform_sync {
            entry.user.preferences.cross_platform_sync = cross_platform_sync;
        }

        Ok(entry.user.clone())
    }

    /// Record a connection to an external service
    ///
    /// The counter moves once per distinct service name; reconnecting an
    /// already-known service is a no-op.
    pub async fn connect_service(&self, user_id: &str, service: &str) -> Result<User> {
        let name = service.trim().to_lowercase();
        if name.is_empty() {
            return Err(Error::Validation("Service name is required".to_string()));
        }

        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(user_id)
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;

        if entry.connected_services.insert(name) {
            entry.user.stats.connected_service_count += 1;
        }
        Ok(entry.user.clone())
    }

    /// Bump the owner's memory counter after a successful create
    pub async fn increment_memory_count(&self, user_id: &str) -> Result<u32> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(user_id)
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;
        entry.user.stats.memory_count += 1;
        Ok(entry.user.stats.memory_count)
    }

    /// Count one user interaction (a search call)
    pub async fn increment_interactions(&self, user_id: &str) -> Result<u32> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(user_id)
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;
        entry.user.stats.interaction_count += 1;
        Ok(entry.user.stats.interaction_count)
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
