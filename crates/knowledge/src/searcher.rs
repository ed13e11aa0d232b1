//! Knowledge search over stored entries.

use classifier_core::KnowledgeFact;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::similarity::cosine_similarity;

/// Tuning knobs for knowledge search.
#[derive(Debug, Clone)]
pub struct SearchPolicy {
    /// Minimum cosine similarity for a semantic hit.
    pub threshold: f32,

    /// Maximum facts returned.
    pub limit: usize,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            limit: 5,
        }
    }
}

/// Searches a building's knowledge entries.
///
/// Semantic search ranks stored embeddings by cosine similarity against the
/// query embedding. When no embedding provider is configured, the provider
/// fails, or no entry clears the threshold, the search degrades to keyword
/// matching ordered by stored priority.
pub struct KnowledgeSearcher {
    pool: SqlitePool,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    policy: SearchPolicy,
}

impl KnowledgeSearcher {
    pub fn new(pool: SqlitePool, embedder: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self {
            pool,
            embedder,
            policy: SearchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SearchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Search a building's knowledge for facts relevant to the query.
    ///
    /// Never fails the caller: degraded paths log and fall through to the
    /// next strategy, and the worst case is an empty list.
    pub async fn search(&self, building_id: &str, query: &str) -> Vec<KnowledgeFact> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        if let Some(embedder) = &self.embedder {
            match self.semantic_search(embedder.as_ref(), building_id, query).await {
                Ok(facts) if !facts.is_empty() => return facts,
                Ok(_) => {
                    debug!(building_id, "No semantic hits above threshold, trying keywords");
                }
                Err(e) => {
                    warn!(building_id, error = %e, "Semantic search failed, trying keywords");
                }
            }
        }

        self.keyword_search(building_id, query).await
    }

    async fn semantic_search(
        &self,
        embedder: &dyn EmbeddingProvider,
        building_id: &str,
        query: &str,
    ) -> Result<Vec<KnowledgeFact>> {
        let query_vector = embedder.embed(query).await?;
        let entries = database::knowledge::list_embedded(&self.pool, building_id).await?;

        let mut scored: Vec<(f32, KnowledgeFact)> = Vec::new();

        for entry in entries {
            let Some(stored) = &entry.embedding else {
                continue;
            };

            let vector: Vec<f32> = match serde_json::from_str(stored) {
                Ok(v) => v,
                Err(e) => {
                    // Bad rows are skipped, not fatal
                    warn!(entry_id = %entry.id, error = %e, "Skipping entry with unreadable embedding");
                    continue;
                }
            };

            let score = cosine_similarity(&query_vector, &vector);
            if score >= self.policy.threshold {
                scored.push((
                    score,
                    KnowledgeFact {
                        question: entry.question,
                        answer: entry.answer,
                        category: entry.category,
                    },
                ));
            }
        }

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.policy.limit);

        debug!(building_id, hits = scored.len(), "Semantic search complete");

        Ok(scored.into_iter().map(|(_, fact)| fact).collect())
    }

    async fn keyword_search(&self, building_id: &str, query: &str) -> Vec<KnowledgeFact> {
        // Whole-query match first, then individual words of 4+ chars
        let mut terms: Vec<&str> = vec![query.trim()];
        terms.extend(query.split_whitespace().filter(|w| w.len() >= 4));

        let mut facts: Vec<KnowledgeFact> = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for term in terms {
            let entries = match database::knowledge::keyword_search(
                &self.pool,
                building_id,
                term,
                self.policy.limit as u32,
            )
            .await
            {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(building_id, error = %e, "Keyword search failed");
                    return facts;
                }
            };

            for entry in entries {
                if seen.contains(&entry.id) {
                    continue;
                }
                seen.push(entry.id.clone());
                facts.push(KnowledgeFact {
                    question: entry.question,
                    answer: entry.answer,
                    category: entry.category,
                });
                if facts.len() >= self.policy.limit {
                    return facts;
                }
            }
        }

        facts
    }
}

/// Embed and store vectors for a building's entries that are missing one.
///
/// Returns the number of entries embedded. Used by ingestion tooling after
/// entries are created.
pub async fn embed_missing(
    pool: &SqlitePool,
    embedder: &dyn EmbeddingProvider,
    building_id: &str,
) -> Result<usize> {
    let entries = database::knowledge::list_for_building(pool, building_id).await?;
    let mut count = 0;

    for entry in entries {
        if entry.embedding.is_some() {
            continue;
        }

        let text = format!("{}\n{}", entry.question, entry.answer);
        let vector = embedder.embed(&text).await?;
        let encoded = serde_json::to_string(&vector)
            .map_err(|e| crate::error::KnowledgeError::Embedding(e.to_string()))?;

        database::knowledge::set_embedding(pool, &entry.id, &encoded).await?;
        count += 1;
    }

    Ok(count)
}
