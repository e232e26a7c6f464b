//! Memory system — sealed records with relevance-ranked retrieval
//!
//! Content is encrypted at rest under the owner's public key; only tags and
//! write-time extracted entities stay searchable. Retrieval scores recency,
//! access frequency, and keyword overlap, then decrypts just the records
//! that clear the threshold.

pub mod extractor;
pub mod scorer;
pub mod storage;
pub mod store;
pub mod types;

pub use extractor::EntityExtractor;
pub use scorer::{RelevanceScorer, ScoringContext};
pub use storage::{InMemoryBackend, MemoryBackend};
pub use store::MemoryStore;
pub use types::{MemoryRecord, MemoryType};
