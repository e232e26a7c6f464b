//! Memory data types and wire shapes
//!
//! A stored memory keeps its content sealed: only the ciphertext, the
//! classification metadata (type, source, tags), and the write-time extracted
//! entities are held in the clear. Wire-facing types use camelCase JSON
//! serialization; relevance scores are computed per search and travel on
//! [`SearchHit`], never on the stored record.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a stored memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Conversation,
    Document,
    Note,
    Insight,
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conversation => write!(f, "conversation"),
            Self::Document => write!(f, "document"),
            Self::Note => write!(f, "note"),
            Self::Insight => write!(f, "insight"),
        }
    }
}

impl std::str::FromStr for MemoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conversation" => Ok(Self::Conversation),
            "document" => Ok(Self::Document),
            "note" => Ok(Self::Note),
            "insight" => Ok(Self::Insight),
            other => Err(format!("unknown memory type: {}", other)),
        }
    }
}

/// Entities pulled out of the plaintext at write time
///
/// Stored unencrypted so search can match against them without opening the
/// sealed payload. Each list is deduplicated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub emails: Vec<String>,
    pub urls: Vec<String>,
    pub dates: Vec<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.urls.is_empty() && self.dates.is_empty()
    }

    /// All entity strings, in extraction order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.emails
            .iter()
            .chain(self.urls.iter())
            .chain(self.dates.iter())
    }
}

/// Per-memory metadata, sealed together with the content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetadata {
    /// External services allowed to read this memory
    #[serde(default)]
    pub allowed_services: Vec<String>,
}

/// The plaintext structure that gets sealed into `MemoryRecord::ciphertext`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPayload {
    pub content: String,
    #[serde(default)]
    pub metadata: MemoryMetadata,
}

/// A stored memory record
///
/// The payload lives only inside `ciphertext`; everything else is metadata
/// safe to scan without the owner's key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: Uuid,
    pub user_id: String,
    pub ciphertext: String,
    pub memory_type: MemoryType,
    pub source: String,
    pub tags: Vec<String>,
    pub entities: ExtractedEntities,
    pub created_at: DateTime<Utc>,
    pub access_count: u32,
}

impl MemoryRecord {
    /// Lower-cased text the scorer may match keywords against
    ///
    /// Content is sealed at scoring time, so only tags and the write-time
    /// entities participate.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();
        parts.extend(self.entities.iter().map(|e| e.to_lowercase()));
        parts.join(" ")
    }

    /// Non-sensitive view of this record
    pub fn summary(&self) -> MemorySummary {
        MemorySummary {
            id: self.id,
            memory_type: self.memory_type,
            source: self.source.clone(),
            tags: self.tags.clone(),
            entities: self.entities.clone(),
            created_at: self.created_at,
            access_count: self.access_count,
        }
    }
}

/// Request body for storing a memory
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemoryRequest {
    pub content: String,
    /// Memory type as a string; re-validated against [`MemoryType`]
    #[serde(rename = "type")]
    pub memory_type: String,
    pub source: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: MemoryMetadata,
}

/// Query parameters for listing memories
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMemoriesRequest {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Equality filter on memory type
    #[serde(rename = "type")]
    pub memory_type: Option<String>,
    /// Equality filter on source
    pub source: Option<String>,
    /// Comma-separated tags; a memory matches if it carries any of them
    pub tags: Option<String>,
}

/// Request body for relevance-ranked search
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMemoriesRequest {
    pub query: String,
    #[serde(default)]
    pub context: Option<SearchContext>,
    pub limit: Option<usize>,
}

/// Optional caller-supplied search context
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContext {
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Additional context fields, accepted but not interpreted
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Non-sensitive memory view returned by create and list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySummary {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    pub source: String,
    pub tags: Vec<String>,
    pub entities: ExtractedEntities,
    pub created_at: DateTime<Utc>,
    pub access_count: u32,
}

/// One decrypted, scored search result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: Uuid,
    pub content: String,
    pub metadata: MemoryMetadata,
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    pub source: String,
    pub tags: Vec<String>,
    pub entities: ExtractedEntities,
    pub created_at: DateTime<Utc>,
    /// Access count after this search's increment
    pub access_count: u32,
    pub score: f64,
}

/// Page of memory summaries
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPage {
    pub memories: Vec<MemorySummary>,
    /// Size of the filtered set before offset/limit
    pub total: usize,
}

/// Ranked search results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total_found: usize,
}

/// Per-owner aggregate counts for the dashboard
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryAggregates {
    pub total_memories: usize,
    pub by_type: HashMap<String, usize>,
    pub by_source: HashMap<String, usize>,
    /// Memories created within the recent-activity window
    pub recent_activity: usize,
}
