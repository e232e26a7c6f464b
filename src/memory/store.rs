//! Memory store orchestration
//!
//! Ties the write and read paths together over an injected backend:
//!
//! - create: validate → extract entities → seal under the owner's public
//!   key → insert the finished record.
//! - list: owner scan → metadata filters → newest-first page. Never touches
//!   access counts.
//! - search: owner scan → score every record against the query context →
//!   strict threshold → rank → decrypt the survivors through the owner's
//!   capability, counting one access per returned hit.
//!
//! Every operation resolves the owner first; records of other users are
//! never scanned, scored, or decrypted.

use std::sync::Arc;

use uuid::Uuid;

use super::extractor::EntityExtractor;
use super::scorer::{RelevanceScorer, ScoringContext, SEARCH_THRESHOLD};
use super::storage::MemoryBackend;
use super::types::{
    CreateMemoryRequest, ListMemoriesRequest, MemoryAggregates, MemoryPage, MemoryPayload,
    MemoryRecord, MemorySummary, MemoryType, SearchHit, SearchMemoriesRequest, SearchResponse,
};
use crate::config::SearchConfig;
use crate::crypto;
use crate::error::{Error, Result};
use crate::users::UserRegistry;

/// Vault memory store over a pluggable backend
pub struct MemoryStore {
    backend: Arc<dyn MemoryBackend>,
    registry: Arc<UserRegistry>,
    extractor: EntityExtractor,
    config: SearchConfig,
}

impl MemoryStore {
    /// Build a store; compiles the entity extraction patterns
    pub fn new(
        backend: Arc<dyn MemoryBackend>,
        registry: Arc<UserRegistry>,
        config: SearchConfig,
    ) -> Result<Self> {
        Ok(Self {
            backend,
            registry,
            extractor: EntityExtractor::new()?,
            config,
        })
    }

    /// Store a new memory for `user_id`, returning its non-sensitive summary
    pub async fn create(
        &self,
        user_id: &str,
        request: CreateMemoryRequest,
    ) -> Result<MemorySummary> {
        let memory_type: MemoryType = request.memory_type.parse().map_err(Error::InvalidType)?;
        if request.content.trim().is_empty() {
            return Err(Error::Validation("Memory content is required".to_string()));
        }
        if request.source.trim().is_empty() {
            return Err(Error::Validation("Memory source is required".to_string()));
        }

        let public_key = self.registry.public_key_of(user_id).await?;
        let entities = self.extractor.extract(&request.content);

        let payload = MemoryPayload {
            content: request.content,
            metadata: request.metadata,
        };
        let plaintext = serde_json::to_vec(&payload)?;
        let ciphertext = crypto::seal(&public_key, &plaintext)?;

        let record = MemoryRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            ciphertext,
            memory_type,
            source: request.source,
            tags: request.tags,
            entities,
            created_at: chrono::Utc::now(),
            access_count: 0,
        };
        let summary = record.summary();

        self.backend.put(record).await?;
        self.registry.increment_memory_count(user_id).await?;
        tracing::debug!("Stored memory {} for user {}", summary.id, user_id);

        Ok(summary)
    }

    /// List an owner's memories, newest first, filtered and paginated
    pub async fn list(&self, user_id: &str, request: ListMemoriesRequest) -> Result<MemoryPage> {
        self.registry.get(user_id).await?;

        let mut records = self.backend.scan_owner(user_id).await?;
        records.retain(|record| matches_filters(record, &request));

        // Stable sort: records arrive in insertion order, which breaks
        // creation-time ties deterministically
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = records.len();
        let offset = request.offset.unwrap_or(0);
        let limit = request.limit.unwrap_or(self.config.default_list_limit);
        let memories: Vec<MemorySummary> = records
            .iter()
            .skip(offset)
            .take(limit)
            .map(MemoryRecord::summary)
            .collect();

        Ok(MemoryPage { memories, total })
    }

    /// Relevance-ranked search over an owner's memories
    ///
    /// Scores run against unencrypted metadata; only records that clear the
    /// threshold get decrypted. Records whose payload cannot be opened are
    /// logged and skipped rather than failing the search.
    pub async fn search(
        &self,
        user_id: &str,
        request: SearchMemoriesRequest,
    ) -> Result<SearchResponse> {
        let decryptor = self.registry.decryptor_for(user_id).await?;
        self.registry.increment_interactions(user_id).await?;

        let context = ScoringContext::build(&request.query, request.context.as_ref());
        let records = self.backend.scan_owner(user_id).await?;
        let scanned = records.len();

        let mut scored: Vec<(f64, MemoryRecord)> = records
            .into_iter()
            .filter_map(|record| {
                let score = RelevanceScorer::score(&record, &context);
                (score > SEARCH_THRESHOLD).then_some((score, record))
            })
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(request.limit.unwrap_or(self.config.default_search_limit));

        let mut results = Vec::with_capacity(scored.len());
        for (score, record) in scored {
            let payload = match decryptor
                .open(&record.ciphertext)
                .and_then(|plaintext| Ok(serde_json::from_slice::<MemoryPayload>(&plaintext)?))
            {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("Skipping unreadable memory {}: {}", record.id, e);
                    continue;
                }
            };
            let access_count = self.backend.record_access(&record.id).await?;
            results.push(SearchHit {
                id: record.id,
                content: payload.content,
                metadata: payload.metadata,
                memory_type: record.memory_type,
                source: record.source,
                tags: record.tags,
                entities: record.entities,
                created_at: record.created_at,
                access_count,
                score,
            });
        }

        tracing::debug!(
            "Search for user {} returned {} of {} memories",
            user_id,
            results.len(),
            scanned
        );
        let total_found = results.len();
        Ok(SearchResponse {
            results,
            total_found,
        })
    }

    /// Aggregate counts over an owner's memories for the dashboard
    pub async fn aggregate(&self, user_id: &str) -> Result<MemoryAggregates> {
        self.registry.get(user_id).await?;

        let records = self.backend.scan_owner(user_id).await?;
        let cutoff = chrono::Utc::now() - chrono::Duration::days(self.config.recent_activity_days);

        let mut aggregates = MemoryAggregates {
            total_memories: records.len(),
            ..Default::default()
        };
        for record in &records {
            *aggregates
                .by_type
                .entry(record.memory_type.to_string())
                .or_insert(0) += 1;
            *aggregates.by_source.entry(record.source.clone()).or_insert(0) += 1;
            if record.created_at > cutoff {
                aggregates.recent_activity += 1;
            }
        }
        Ok(aggregates)
    }
}

fn matches_filters(record: &MemoryRecord, request: &ListMemoriesRequest) -> bool {
    if let Some(ref type_filter) = request.memory_type {
        if record.memory_type.to_string() != *type_filter {
            return false;
        }
    }
    if let Some(ref source) = request.source {
        if record.source != *source {
            return false;
        }
    }
    if let Some(ref tags) = request.tags {
        let wanted: Vec<&str> = tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if !wanted.is_empty() && !wanted.iter().any(|t| record.tags.iter().any(|rt| rt == t)) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistrationConfig;
    use crate::memory::storage::InMemoryBackend;
    use crate::memory::types::SearchContext;
    use crate::users::RegisterUserRequest;
    use chrono::{Duration, Utc};

    struct Fixture {
        store: MemoryStore,
        backend: Arc<InMemoryBackend>,
        registry: Arc<UserRegistry>,
        user_id: String,
    }

    async fn fixture() -> Fixture {
        let backend = Arc::new(InMemoryBackend::new());
        let registry = Arc::new(UserRegistry::new());
        let store = MemoryStore::new(backend.clone(), registry.clone(), SearchConfig::default())
            .unwrap();
        let user = registry
            .register(
                RegisterUserRequest {
                    email: "owner@example.com".to_string(),
                    display_name: "Owner".to_string(),
                    preferences: None,
                },
                &RegistrationConfig::default(),
            )
            .await
            .unwrap();
        Fixture {
            store,
            backend,
            registry,
            user_id: user.id,
        }
    }

    fn create_request(content: &str, source: &str, tags: &[&str]) -> CreateMemoryRequest {
        CreateMemoryRequest {
            content: content.to_string(),
            memory_type: "note".to_string(),
            source: source.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            metadata: Default::default(),
        }
    }

    fn search_request(query: &str) -> SearchMemoriesRequest {
        SearchMemoriesRequest {
            query: query.to_string(),
            context: None,
            limit: None,
        }
    }

    /// Seal a payload for the user and insert a record with a chosen age
    async fn put_backdated(fx: &Fixture, content: &str, tags: &[&str], age_days: i64) -> Uuid {
        let public_key = fx.registry.public_key_of(&fx.user_id).await.unwrap();
        let payload = MemoryPayload {
            content: content.to_string(),
            metadata: Default::default(),
        };
        let plaintext = serde_json::to_vec(&payload).unwrap();
        let record = MemoryRecord {
            id: Uuid::new_v4(),
            user_id: fx.user_id.clone(),
            ciphertext: crypto::seal(&public_key, &plaintext).unwrap(),
            memory_type: MemoryType::Conversation,
            source: "chat-app".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            entities: Default::default(),
            created_at: Utc::now() - Duration::days(age_days),
            access_count: 0,
        };
        let id = record.id;
        fx.backend.put(record).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_create_returns_summary_with_entities() {
        let fx = fixture().await;
        let summary = fx
            .store
            .create(
                &fx.user_id,
                create_request("Meet bob@work.io on 2026-03-15", "mail", &["meeting"]),
            )
            .await
            .unwrap();

        assert_eq!(summary.memory_type, MemoryType::Note);
        assert_eq!(summary.source, "mail");
        assert_eq!(summary.tags, vec!["meeting"]);
        assert_eq!(summary.entities.emails, vec!["bob@work.io"]);
        assert_eq!(summary.entities.dates, vec!["2026-03-15"]);
        assert_eq!(summary.access_count, 0);
    }

    #[tokio::test]
    async fn test_create_seals_content() {
        let fx = fixture().await;
        let summary = fx
            .store
            .create(&fx.user_id, create_request("very private thought", "diary", &[]))
            .await
            .unwrap();

        let stored = fx.backend.get(&summary.id).await.unwrap().unwrap();
        assert!(!stored.ciphertext.contains("very private thought"));
        assert!(!stored.ciphertext.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_type() {
        let fx = fixture().await;
        let mut request = create_request("x", "cli", &[]);
        request.memory_type = "daydream".to_string();
        let result = fx.store.create(&fx.user_id, request).await;
        assert!(matches!(result, Err(Error::InvalidType(_))));
    }

    #[tokio::test]
    async fn test_create_validates_content_and_source() {
        let fx = fixture().await;
        let blank_content = fx
            .store
            .create(&fx.user_id, create_request("   ", "cli", &[]))
            .await;
        assert!(matches!(blank_content, Err(Error::Validation(_))));

        let blank_source = fx.store.create(&fx.user_id, create_request("x", " ", &[])).await;
        assert!(matches!(blank_source, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_unknown_user() {
        let fx = fixture().await;
        let result = fx.store.create("ghost", create_request("x", "cli", &[])).await;
        assert!(matches!(result, Err(Error::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_bumps_memory_count() {
        let fx = fixture().await;
        fx.store
            .create(&fx.user_id, create_request("one", "cli", &[]))
            .await
            .unwrap();
        fx.store
            .create(&fx.user_id, create_request("two", "cli", &[]))
            .await
            .unwrap();

        let user = fx.registry.get(&fx.user_id).await.unwrap();
        assert_eq!(user.stats.memory_count, 2);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let fx = fixture().await;
        put_backdated(&fx, "oldest", &[], 3).await;
        put_backdated(&fx, "middle", &[], 2).await;
        let newest = put_backdated(&fx, "newest", &[], 1).await;

        let page = fx.store.list(&fx.user_id, ListMemoriesRequest::default()).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.memories[0].id, newest);
    }

    #[tokio::test]
    async fn test_list_tie_break_is_insertion_order() {
        let fx = fixture().await;
        let public_key = fx.registry.public_key_of(&fx.user_id).await.unwrap();
        let created_at = Utc::now();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let record = MemoryRecord {
                id: Uuid::new_v4(),
                user_id: fx.user_id.clone(),
                ciphertext: crypto::seal(&public_key, b"{}").unwrap(),
                memory_type: MemoryType::Note,
                source: "cli".to_string(),
                tags: vec![],
                entities: Default::default(),
                created_at,
                access_count: 0,
            };
            ids.push(record.id);
            fx.backend.put(record).await.unwrap();
        }

        let page = fx.store.list(&fx.user_id, ListMemoriesRequest::default()).await.unwrap();
        let listed: Vec<Uuid> = page.memories.iter().map(|m| m.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let fx = fixture().await;
        fx.store
            .create(&fx.user_id, create_request("a", "mail", &["work"]))
            .await
            .unwrap();
        fx.store
            .create(&fx.user_id, create_request("b", "chat", &["home", "errand"]))
            .await
            .unwrap();
        let mut doc = create_request("c", "mail", &[]);
        doc.memory_type = "document".to_string();
        fx.store.create(&fx.user_id, doc).await.unwrap();

        let by_source = fx
            .store
            .list(
                &fx.user_id,
                ListMemoriesRequest {
                    source: Some("mail".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_source.total, 2);

        let by_type = fx
            .store
            .list(
                &fx.user_id,
                ListMemoriesRequest {
                    memory_type: Some("document".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_type.total, 1);

        let by_tags = fx
            .store
            .list(
                &fx.user_id,
                ListMemoriesRequest {
                    tags: Some("errand, missing".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_tags.total, 1);
        assert_eq!(by_tags.memories[0].tags, vec!["home", "errand"]);
    }

    #[tokio::test]
    async fn test_list_unknown_type_filter_matches_nothing() {
        let fx = fixture().await;
        fx.store
            .create(&fx.user_id, create_request("a", "cli", &[]))
            .await
            .unwrap();

        let page = fx
            .store
            .list(
                &fx.user_id,
                ListMemoriesRequest {
                    memory_type: Some("daydream".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.memories.is_empty());
    }

    #[tokio::test]
    async fn test_list_pagination_partitions() {
        let fx = fixture().await;
        for i in 0..5 {
            put_backdated(&fx, &format!("memory {i}"), &[], 5 - i).await;
        }

        let mut seen = Vec::new();
        for offset in [0, 2, 4] {
            let page = fx
                .store
                .list(
                    &fx.user_id,
                    ListMemoriesRequest {
                        limit: Some(2),
                        offset: Some(offset),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(page.total, 5);
            seen.extend(page.memories.iter().map(|m| m.id));
        }

        assert_eq!(seen.len(), 5);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 5, "pages must not overlap");
    }

    #[tokio::test]
    async fn test_list_never_touches_access_counts() {
        let fx = fixture().await;
        let id = put_backdated(&fx, "quiet", &[], 1).await;

        for _ in 0..3 {
            fx.store.list(&fx.user_id, ListMemoriesRequest::default()).await.unwrap();
        }
        let record = fx.backend.get(&id).await.unwrap().unwrap();
        assert_eq!(record.access_count, 0);
    }

    #[tokio::test]
    async fn test_search_decrypts_hits() {
        let fx = fixture().await;
        fx.store
            .create(
                &fx.user_id,
                create_request("Rent is due on the 1st", "chat-app", &["rent"]),
            )
            .await
            .unwrap();

        let response = fx.store.search(&fx.user_id, search_request("rent")).await.unwrap();
        assert_eq!(response.total_found, 1);
        let hit = &response.results[0];
        assert_eq!(hit.content, "Rent is due on the 1st");
        assert_eq!(hit.access_count, 1);
        assert!(hit.score > SEARCH_THRESHOLD);
    }

    #[tokio::test]
    async fn test_search_threshold_is_strict() {
        let fx = fixture().await;
        // 9 days old, no keyword overlap: 0.1 recency only
        put_backdated(&fx, "irrelevant", &["other"], 9).await;

        let response = fx
            .store
            .search(&fx.user_id, search_request("budget"))
            .await
            .unwrap();
        assert_eq!(response.total_found, 0);
    }

    #[tokio::test]
    async fn test_search_orders_by_score() {
        let fx = fixture().await;
        // Keyword match on an old record beats recency on a fresh one
        let keyword_hit = put_backdated(&fx, "about budget", &["budget"], 10).await;
        let fresh = put_backdated(&fx, "fresh note", &["misc"], 0).await;

        let response = fx
            .store
            .search(&fx.user_id, search_request("budget"))
            .await
            .unwrap();
        assert_eq!(response.total_found, 2);
        assert_eq!(response.results[0].id, keyword_hit);
        assert_eq!(response.results[1].id, fresh);
        assert!(response.results[0].score > response.results[1].score);
    }

    #[tokio::test]
    async fn test_search_limit_truncates() {
        let fx = fixture().await;
        for i in 0..4 {
            put_backdated(&fx, &format!("note {i}"), &["topic"], 0).await;
        }

        let request = SearchMemoriesRequest {
            query: "topic".to_string(),
            context: None,
            limit: Some(2),
        };
        let response = fx.store.search(&fx.user_id, request).await.unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.total_found, 2);
    }

    #[tokio::test]
    async fn test_search_context_keywords_participate() {
        let fx = fixture().await;
        put_backdated(&fx, "tax paperwork", &["taxes"], 10).await;

        let request = SearchMemoriesRequest {
            query: "paperwork".to_string(),
            context: Some(SearchContext {
                keywords: vec!["taxes".to_string()],
                extra: Default::default(),
            }),
            limit: None,
        };
        let response = fx.store.search(&fx.user_id, request).await.unwrap();
        // "taxes" matches, "paperwork" does not: 0.5 * 5 = 2.5
        assert_eq!(response.total_found, 1);
        assert!((response.results[0].score - 2.5).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_search_empty_query_returns_recent() {
        let fx = fixture().await;
        put_backdated(&fx, "fresh", &[], 0).await;
        put_backdated(&fx, "stale", &[], 10).await;

        let response = fx.store.search(&fx.user_id, search_request("")).await.unwrap();
        assert_eq!(response.total_found, 1);
        assert_eq!(response.results[0].content, "fresh");
    }

    #[tokio::test]
    async fn test_search_increments_only_returned_hits() {
        let fx = fixture().await;
        let hit = put_backdated(&fx, "budget talk", &["budget"], 10).await;
        let miss = put_backdated(&fx, "unrelated", &["other"], 10).await;

        fx.store.search(&fx.user_id, search_request("budget")).await.unwrap();

        assert_eq!(fx.backend.get(&hit).await.unwrap().unwrap().access_count, 1);
        assert_eq!(fx.backend.get(&miss).await.unwrap().unwrap().access_count, 0);
    }

    #[tokio::test]
    async fn test_search_skips_unreadable_records() {
        let fx = fixture().await;
        let good = put_backdated(&fx, "readable budget notes", &["budget"], 10).await;
        let corrupt = MemoryRecord {
            id: Uuid::new_v4(),
            user_id: fx.user_id.clone(),
            ciphertext: "not even base64 !!!".to_string(),
            memory_type: MemoryType::Note,
            source: "chat-app".to_string(),
            tags: vec!["budget".to_string()],
            entities: Default::default(),
            created_at: Utc::now() - Duration::days(10),
            access_count: 0,
        };
        let corrupt_id = corrupt.id;
        fx.backend.put(corrupt).await.unwrap();

        let response = fx.store.search(&fx.user_id, search_request("budget")).await.unwrap();
        assert_eq!(response.total_found, 1);
        assert_eq!(response.results[0].id, good);
        // Skipped record is never counted as accessed
        assert_eq!(fx.backend.get(&corrupt_id).await.unwrap().unwrap().access_count, 0);
    }

    #[tokio::test]
    async fn test_search_counts_interactions() {
        let fx = fixture().await;
        fx.store.search(&fx.user_id, search_request("anything")).await.unwrap();
        fx.store.search(&fx.user_id, search_request("else")).await.unwrap();

        let user = fx.registry.get(&fx.user_id).await.unwrap();
        assert_eq!(user.stats.interaction_count, 2);
    }

    #[tokio::test]
    async fn test_operations_are_owner_scoped() {
        let fx = fixture().await;
        let other = fx
            .registry
            .register(
                RegisterUserRequest {
                    email: "other@example.com".to_string(),
                    display_name: "Other".to_string(),
                    preferences: None,
                },
                &RegistrationConfig::default(),
            )
            .await
            .unwrap();

        fx.store
            .create(&fx.user_id, create_request("mine", "cli", &["shared-tag"]))
            .await
            .unwrap();
        fx.store
            .create(&other.id, create_request("theirs", "cli", &["shared-tag"]))
            .await
            .unwrap();

        let my_page = fx.store.list(&fx.user_id, ListMemoriesRequest::default()).await.unwrap();
        assert_eq!(my_page.total, 1);

        let my_hits = fx
            .store
            .search(&fx.user_id, search_request("shared-tag"))
            .await
            .unwrap();
        assert_eq!(my_hits.total_found, 1);
        assert_eq!(my_hits.results[0].content, "mine");

        let their_hits = fx
            .store
            .search(&other.id, search_request("shared-tag"))
            .await
            .unwrap();
        assert_eq!(their_hits.results[0].content, "theirs");
    }

    #[tokio::test]
    async fn test_concurrent_mixed_user_isolation() {
        let fx = fixture().await;
        let store = Arc::new(fx.store);
        let mut user_ids = Vec::new();
        for i in 0..4 {
            let user = fx
                .registry
                .register(
                    RegisterUserRequest {
                        email: format!("user{i}@example.com"),
                        display_name: format!("User {i}"),
                        preferences: None,
                    },
                    &RegistrationConfig::default(),
                )
                .await
                .unwrap();
            user_ids.push(user.id);
        }

        let mut handles = Vec::new();
        for (i, user_id) in user_ids.iter().enumerate() {
            for j in 0..5 {
                let store = store.clone();
                let user_id = user_id.clone();
                handles.push(tokio::spawn(async move {
                    store
                        .create(
                            &user_id,
                            CreateMemoryRequest {
                                content: format!("memory {j} of user {i}"),
                                memory_type: "note".to_string(),
                                source: "loadgen".to_string(),
                                tags: vec![format!("user-{i}")],
                                metadata: Default::default(),
                            },
                        )
                        .await
                        .unwrap();
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for (i, user_id) in user_ids.iter().enumerate() {
            let page = store.list(user_id, ListMemoriesRequest::default()).await.unwrap();
            assert_eq!(page.total, 5);
            assert!(page
                .memories
                .iter()
                .all(|m| m.tags == vec![format!("user-{i}")]));
            let user = fx.registry.get(user_id).await.unwrap();
            assert_eq!(user.stats.memory_count, 5);
        }
    }

    #[tokio::test]
    async fn test_aggregate_counts() {
        let fx = fixture().await;
        fx.store
            .create(&fx.user_id, create_request("recent note", "mail", &[]))
            .await
            .unwrap();
        let mut doc = create_request("recent doc", "upload", &[]);
        doc.memory_type = "document".to_string();
        fx.store.create(&fx.user_id, doc).await.unwrap();
        put_backdated(&fx, "ancient", &[], 30).await;

        let aggregates = fx.store.aggregate(&fx.user_id).await.unwrap();
        assert_eq!(aggregates.total_memories, 3);
        assert_eq!(aggregates.by_type.get("note"), Some(&1));
        assert_eq!(aggregates.by_type.get("document"), Some(&1));
        assert_eq!(aggregates.by_type.get("conversation"), Some(&1));
        assert_eq!(aggregates.by_source.get("mail"), Some(&1));
        assert_eq!(aggregates.recent_activity, 2);
    }

    #[tokio::test]
    async fn test_end_to_end_budget_scenario() {
        let fx = fixture().await;
        // An older conversation about budgets and a slightly newer reminder
        let budget = put_backdated(
            &fx,
            "Discussed monthly budget: rent 1200, groceries 400",
            &["budget", "finance"],
            10,
        )
        .await;
        let birthday = put_backdated(
            &fx,
            "Buy a birthday gift for Sam",
            &["shopping", "gift"],
            9,
        )
        .await;

        let response = fx
            .store
            .search(&fx.user_id, search_request("budget"))
            .await
            .unwrap();

        // Only the budget memory clears the threshold: keyword overlap 5.0
        // vs. the reminder's 0.1 recency remainder
        assert_eq!(response.total_found, 1);
        let hit = &response.results[0];
        assert_eq!(hit.id, budget);
        assert_eq!(hit.content, "Discussed monthly budget: rent 1200, groceries 400");
        assert!((hit.score - 5.0).abs() < 1e-3);
        assert_eq!(hit.access_count, 1);

        assert_eq!(fx.backend.get(&birthday).await.unwrap().unwrap().access_count, 0);

        // The excluded memory is still listed normally
        let page = fx.store.list(&fx.user_id, ListMemoriesRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);
    }
}
