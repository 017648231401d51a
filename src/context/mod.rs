//! Document store trait and implementations.
//!
//! Abstracts the retrieval backend behind the guidance agent so different
//! stores can be swapped at construction time:
//! - `StaticMaintenanceCorpus`: keyword-scored search over a static corpus (current)
//! - `NoOpStore`: returns empty results (development without a corpus)
//! - Future: embedding-based vector search against a managed index

mod corpus;

pub use corpus::StaticMaintenanceCorpus;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One retrieved passage with its source identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passage {
    pub content: String,
    /// Document identifier cited back to the technician, e.g. "SOP-123".
    pub source_id: String,
}

/// Trait for retrieval backends.
///
/// Implementations must be thread-safe (Send + Sync) since the pipeline is
/// shared across async tasks. Ranking may be non-deterministic between calls,
/// but ordering within a single call is stable.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return up to `k` passages most relevant to `query`, best match first.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Passage>>;

    /// Store name for logging and health checks.
    fn store_name(&self) -> &'static str;
}

/// Document store that returns no passages.
///
/// Used when no maintenance corpus is provisioned. "No knowledge" is a valid
/// operational state: the guidance agent degrades to its generic fallback.
pub struct NoOpStore;

#[async_trait]
impl DocumentStore for NoOpStore {
    async fn similarity_search(&self, _query: &str, _k: usize) -> Result<Vec<Passage>> {
        Ok(Vec::new())
    }

    fn store_name(&self) -> &'static str {
        "NoOp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_store_returns_empty() {
        let store = NoOpStore;
        let passages = store.similarity_search("anything", 5).await.unwrap();
        assert!(passages.is_empty());
        assert_eq!(store.store_name(), "NoOp");
    }
}
