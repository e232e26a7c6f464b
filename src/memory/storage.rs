//! Storage backend for memory records
//!
//! The vault core is written against the [`MemoryBackend`] trait so the
//! record table can be swapped for a durable implementation without touching
//! store logic. [`InMemoryBackend`] is the process-lifetime reference
//! implementation: a guarded table plus a per-owner insertion log, which is
//! the deterministic scan order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::MemoryRecord;
use crate::error::{Error, Result};

/// Persistence seam for memory records
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    /// Insert a fully-formed record, atomically visible to readers
    async fn put(&self, record: MemoryRecord) -> Result<()>;

    /// Fetch one record by id
    async fn get(&self, id: &Uuid) -> Result<Option<MemoryRecord>>;

    /// All records belonging to an owner, in insertion order
    async fn scan_owner(&self, user_id: &str) -> Result<Vec<MemoryRecord>>;

    /// Increment a record's access count, returning the new value
    async fn record_access(&self, id: &Uuid) -> Result<u32>;

    /// Number of records an owner holds
    async fn owner_len(&self, user_id: &str) -> Result<usize>;
}

#[derive(Default)]
struct Tables {
    records: HashMap<Uuid, MemoryRecord>,
    owner_log: HashMap<String, Vec<Uuid>>,
}

/// In-process reference backend
pub struct InMemoryBackend {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryBackend for InMemoryBackend {
    async fn put(&self, record: MemoryRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        let id = record.id;
        let owner = record.user_id.clone();
        if tables.records.insert(id, record).is_none() {
            tables.owner_log.entry(owner).or_default().push(id);
        }
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<MemoryRecord>> {
        Ok(self.tables.read().await.records.get(id).cloned())
    }

    async fn scan_owner(&self, user_id: &str) -> Result<Vec<MemoryRecord>> {
        let tables = self.tables.read().await;
        let ids = match tables.owner_log.get(user_id) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        Ok(ids
            .iter()
            .filter_map(|id| tables.records.get(id).cloned())
            .collect())
    }

    async fn record_access(&self, id: &Uuid) -> Result<u32> {
        let mut tables = self.tables.write().await;
        let record = tables
            .records
            .get_mut(id)
            .ok_or_else(|| Error::Storage(format!("Record not found: {}", id)))?;
        record.access_count += 1;
        Ok(record.access_count)
    }

    async fn owner_len(&self, user_id: &str) -> Result<usize> {
        let tables = self.tables.read().await;
        Ok(tables.owner_log.get(user_id).map_or(0, |ids| ids.len()))
    }
}
