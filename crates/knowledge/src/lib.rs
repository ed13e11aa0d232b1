//! Tenant-scoped knowledge lookup.
//!
//! Answers "what does this building know that's relevant to this message?"
//! Entries live in the `database` crate; this crate ranks them. Semantic
//! search uses cosine similarity over stored embedding vectors with a
//! threshold floor; keyword matching ordered by stored priority is the
//! degraded path.

mod embedding;
mod error;
mod searcher;
mod similarity;

pub use embedding::{EmbeddingProvider, OpenAiEmbedder, OpenAiEmbedderConfig, StaticEmbedder};
pub use error::{KnowledgeError, Result};
pub use searcher::{embed_missing, KnowledgeSearcher, SearchPolicy};
pub use similarity::cosine_similarity;
