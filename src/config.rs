//! MemVault configuration management

use serde::{Deserialize, Serialize};

use crate::users::PrivacyLevel;

/// Main MemVault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Search and listing configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Registration defaults
    #[serde(default)]
    pub registration: RegistrationConfig,
}

/// Search and listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Result cap applied when a list request omits `limit`
    pub default_list_limit: usize,

    /// Result cap applied when a search request omits `limit`
    pub default_search_limit: usize,

    /// Window for the dashboard's recent-activity count, in days
    pub recent_activity_days: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_list_limit: 50,
            default_search_limit: 20,
            recent_activity_days: 7,
        }
    }
}

/// Defaults applied to new users at registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Privacy level assigned when the request does not specify one
    pub default_privacy_level: PrivacyLevel,

    /// Retention policy tag assigned to new users
    pub default_retention_policy: String,

    /// Whether cross-platform sync starts enabled
    pub cross_platform_sync: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            default_privacy_level: PrivacyLevel::Standard,
            default_retention_policy: "standard".to_string(),
            cross_platform_sync: false,
        }
    }
}
