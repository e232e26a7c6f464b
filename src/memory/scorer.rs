//! Relevance scoring for memory search
//!
//! A memory's relevance is recomputed from scratch on every search:
//!
//! 1. recency: `max(0, 10 - age_in_days) * 0.1`
//! 2. frequency: `access_count * 0.05`
//! 3. keyword overlap: fraction of context keywords found in the record's
//!    searchable text, `* 5`
//!
//! The sum is clamped to 10.0. Scoring runs before any decryption, so the
//! searchable text is tags plus write-time entities, never the sealed
//! content. Scores are transient: they ride on search results and are never
//! stored.

use chrono::Utc;

use super::types::{MemoryRecord, SearchContext};

/// Weight applied to the recency term
pub const RECENCY_WEIGHT: f64 = 0.1;
/// Weight applied per recorded access
pub const FREQUENCY_WEIGHT: f64 = 0.05;
/// Weight applied to the keyword overlap fraction
pub const KEYWORD_WEIGHT: f64 = 5.0;
/// Upper clamp on the final score
pub const MAX_SCORE: f64 = 10.0;
/// Minimum score (strict) for a memory to appear in search results
pub const SEARCH_THRESHOLD: f64 = 0.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// The lower-cased keywords one search scores against
#[derive(Debug, Clone)]
pub struct ScoringContext {
    keywords: Vec<String>,
}

impl ScoringContext {
    /// Merge the free-text query and any caller-supplied context keywords
    ///
    /// Everything is lower-cased; duplicates keep their first position.
    pub fn build(query: &str, context: Option<&SearchContext>) -> Self {
        let mut keywords: Vec<String> = Vec::new();
        let mut push = |raw: &str| {
            let keyword = raw.trim().to_lowercase();
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        };
        if let Some(ctx) = context {
            for keyword in &ctx.keywords {
                push(keyword);
            }
        }
        for token in query.split_whitespace() {
            push(token);
        }
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Stateless scorer over record metadata
pub struct RelevanceScorer;

impl RelevanceScorer {
    /// Compute the relevance of one record against a scoring context
    pub fn score(record: &MemoryRecord, context: &ScoringContext) -> f64 {
        let recency = Self::recency(record);
        let frequency = f64::from(record.access_count) * FREQUENCY_WEIGHT;
        let keywords = Self::keyword_overlap(record, context);
        (recency + frequency + keywords).min(MAX_SCORE)
    }

    /// Linear decay from 1.0 at creation to 0.0 at ten days old
    fn recency(record: &MemoryRecord) -> f64 {
        let age_seconds = (Utc::now() - record.created_at).num_seconds() as f64;
        let age_days = age_seconds / SECONDS_PER_DAY;
        (10.0 - age_days).max(0.0) * RECENCY_WEIGHT
    }

    fn keyword_overlap(record: &MemoryRecord, context: &ScoringContext) -> f64 {
        if context.is_empty() {
            return 0.0;
        }
        let haystack = record.searchable_text();
        let matched = context
            .keywords()
            .iter()
            .filter(|k| haystack.contains(k.as_str()))
            .count();
        (matched as f64 / context.keywords().len() as f64) * KEYWORD_WEIGHT
    }
}
