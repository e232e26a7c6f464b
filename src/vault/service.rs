//! Vault service — the boundary the HTTP layer talks to
//!
//! Owns the registry and memory store, applies configured defaults, and
//! translates domain errors into the wire envelope. Handlers pass the
//! authenticated user id; everything below stays owner-scoped.

use std::sync::Arc;

use super::types::{ApiError, DashboardSummary};
use crate::config::VaultConfig;
use crate::error::Error;
use crate::memory::storage::{InMemoryBackend, MemoryBackend};
use crate::memory::store::MemoryStore;
use crate::memory::types::{
    CreateMemoryRequest, ListMemoriesRequest, MemoryPage, MemorySummary, SearchMemoriesRequest,
    SearchResponse,
};
use crate::users::{RegisterUserRequest, UpdatePreferencesRequest, User, UserRegistry};

/// One vault instance: users, keys, and sealed memories
pub struct VaultService {
    registry: Arc<UserRegistry>,
    store: MemoryStore,
    config: VaultConfig,
}

impl VaultService {
    /// Build a vault backed by the in-process reference backend
    pub fn new(config: VaultConfig) -> Result<Self, Error> {
        Self::with_backend(config, Arc::new(InMemoryBackend::new()))
    }

    /// Build a vault over a caller-supplied storage backend
    pub fn with_backend(
        config: VaultConfig,
        backend: Arc<dyn MemoryBackend>,
    ) -> Result<Self, Error> {
        let registry = Arc::new(UserRegistry::new());
        let store = MemoryStore::new(backend, registry.clone(), config.search.clone())?;
        Ok(Self {
            registry,
            store,
            config,
        })
    }

    /// Register a new user, minting their key pair
    pub async fn register_user(&self, request: RegisterUserRequest) -> Result<User, ApiError> {
        self.registry
            .register(request, &self.config.registration)
            .await
            .map_err(ApiError::from)
    }

    /// Fetch a user's profile, stats, and preferences
    pub async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.registry.get(user_id).await.map_err(ApiError::from)
    }

    /// Apply a partial preference update
    pub async fn update_preferences(
        &self,
        user_id: &str,
        request: UpdatePreferencesRequest,
    ) -> Result<User, ApiError> {
        self.registry
            .update_preferences(user_id, request)
            .await
            .map_err(ApiError::from)
    }

    /// Record a connection to an external service
    pub async fn connect_service(&self, user_id: &str, service: &str) -> Result<User, ApiError> {
        self.registry
            .connect_service(user_id, service)
            .await
            .map_err(ApiError::from)
    }

    /// Store a memory for the authenticated owner
    pub async fn create_memory(
        &self,
        user_id: &str,
        request: CreateMemoryRequest,
    ) -> Result<MemorySummary, ApiError> {
        self.store
            .create(user_id, request)
            .await
            .map_err(ApiError::from)
    }

    /// List the owner's memories (metadata only)
    pub async fn list_memories(
        &self,
        user_id: &str,
        request: ListMemoriesRequest,
    ) -> Result<MemoryPage, ApiError> {
        self.store.list(user_id, request).await.map_err(ApiError::from)
    }

    /// Relevance-ranked, decrypted search over the owner's memories
    pub async fn search_memories(
        &self,
        user_id: &str,
        request: SearchMemoriesRequest,
    ) -> Result<SearchResponse, ApiError> {
        self.store
            .search(user_id, request)
            .await
            .map_err(ApiError::from)
    }

    /// Dashboard view: memory aggregates merged with user stats
    pub async fn dashboard(&self, user_id: &str) -> Result<DashboardSummary, ApiError> {
        let user = self.registry.get(user_id).await.map_err(ApiError::from)?;
        let aggregates = self.store.aggregate(user_id).await.map_err(ApiError::from)?;
        Ok(DashboardSummary::from_parts(aggregates, &user.stats))
    }
}
