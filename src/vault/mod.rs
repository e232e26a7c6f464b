//! Vault module — the service boundary over users, keys, and memories
//!
//! [`VaultService`] is what an HTTP layer mounts: owner-scoped operations
//! returning wire-ready types, with domain errors already translated into
//! the `{ error: { code, message } }` envelope.

pub mod service;
pub mod types;

pub use service::VaultService;
pub use types::{ApiError, ApiErrorDetail, DashboardSummary};
