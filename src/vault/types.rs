//! Vault service boundary types
//!
//! The HTTP layer in front of the vault speaks JSON: domain errors are
//! flattened into an `{ "error": { "code", "message" } }` envelope, and the
//! dashboard view merges memory aggregates with user stats. Internal error
//! detail never crosses this boundary.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Error;
use crate::memory::types::MemoryAggregates;
use crate::users::UserStats;

/// API error response envelope
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// API error detail
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: "NOT_FOUND".to_string(),
                message: message.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: "BAD_REQUEST".to_string(),
                message: message.into(),
            },
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message: message.into(),
            },
        }
    }

    pub fn code(&self) -> &str {
        &self.error.code
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::UserNotFound(_) => Self::not_found(err.to_string()),
            Error::InvalidType(_) | Error::Validation(_) | Error::DuplicateEmail(_) => {
                Self::bad_request(err.to_string())
            }
            // Crypto, storage, and serialization detail stays server-side
            _ => Self::internal("Internal error"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error.code, self.error.message)
    }
}

/// Per-user dashboard view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_memories: usize,
    pub by_type: HashMap<String, usize>,
    pub by_source: HashMap<String, usize>,
    pub recent_activity: usize,
    pub total_interactions: u32,
    pub connected_services: u32,
}

impl DashboardSummary {
    pub fn from_parts(aggregates: MemoryAggregates, stats: &UserStats) -> Self {
        Self {
            total_memories: aggregates.total_memories,
            by_type: aggregates.by_type,
            by_source: aggregates.by_source,
            recent_activity: aggregates.recent_activity,
            total_interactions: stats.interaction_count,
            connected_services: stats.connected_service_count,
        }
    }
}
