//! Per-project data-context cache.
//!
//! Fetching a project's dataset description from the query engine is slow
//! relative to a chat turn, so descriptions are cached per project id.
//! A miss fetches inline; a hit past the TTL returns the stale value
//! immediately and refreshes in the background. The cache is an explicit
//! injectable object -- construct one per server, not per request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use vizier_llm::messages::DataContext;
use vizier_query::{QueryEngine, QueryError};

/// One cached project description.
struct CacheEntry {
    description: String,
    refreshed_at: Instant,
}

/// TTL'd cache of project data contexts. Cheaply cloneable; clones share
/// the same entries.
#[derive(Clone)]
pub struct ContextCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    query: Arc<dyn QueryEngine>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ContextCache {
    /// Create a cache backed by `query` with the given freshness window.
    pub fn new(query: Arc<dyn QueryEngine>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                query,
                ttl,
                entries: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Get the data context for a project.
    ///
    /// Misses fetch inline and propagate fetch errors. Stale hits return
    /// the cached value and spawn a background refresh; concurrent stale
    /// hits may race to refresh, last write wins.
    pub async fn get(&self, project_id: &str) -> Result<DataContext, QueryError> {
        {
            let entries = self.inner.entries.read().await;
            if let Some(entry) = entries.get(project_id) {
                let context = DataContext {
                    project_id: project_id.to_string(),
                    description: entry.description.clone(),
                };

                if entry.refreshed_at.elapsed() > self.inner.ttl {
                    let cache = self.clone();
                    let id = project_id.to_string();
                    tokio::spawn(async move {
                        if let Err(e) = cache.refresh(&id).await {
                            tracing::warn!(project_id = %id, error = %e, "Context refresh failed");
                        }
                    });
                }

                return Ok(context);
            }
        }

        self.refresh(project_id).await
    }

    /// Fetch a fresh description and store it.
    async fn refresh(&self, project_id: &str) -> Result<DataContext, QueryError> {
        let description = self.inner.query.describe(project_id).await?;

        let mut entries = self.inner.entries.write().await;
        entries.insert(
            project_id.to_string(),
            CacheEntry {
                description: description.clone(),
                refreshed_at: Instant::now(),
            },
        );

        tracing::debug!(project_id, "Project context refreshed");

        Ok(DataContext {
            project_id: project_id.to_string(),
            description,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use vizier_core::widget::Row;

    use super::*;

    /// Stub engine counting describe calls.
    struct CountingEngine {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QueryEngine for CountingEngine {
        async fn run(&self, _sql: &str) -> Result<Vec<Row>, QueryError> {
            Ok(Vec::new())
        }

        async fn describe(&self, project_id: &str) -> Result<String, QueryError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{project_id} schema v{call}"))
        }
    }

    fn cache_with_ttl(ttl: Duration) -> (ContextCache, Arc<CountingEngine>) {
        let engine = Arc::new(CountingEngine {
            calls: AtomicUsize::new(0),
        });
        let cache = ContextCache::new(Arc::clone(&engine) as Arc<dyn QueryEngine>, ttl);
        (cache, engine)
    }

    #[tokio::test]
    async fn miss_fetches_inline() {
        let (cache, engine) = cache_with_ttl(Duration::from_secs(300));

        let context = cache.get("p1").await.expect("fetch should succeed");
        assert_eq!(context.description, "p1 schema v0");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fresh_hit_does_not_refetch() {
        let (cache, engine) = cache_with_ttl(Duration::from_secs(300));

        cache.get("p1").await.expect("first fetch");
        let context = cache.get("p1").await.expect("cached fetch");

        assert_eq!(context.description, "p1 schema v0");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_hit_returns_cached_value_and_refreshes() {
        let (cache, engine) = cache_with_ttl(Duration::from_secs(60));

        cache.get("p1").await.expect("first fetch");
        tokio::time::advance(Duration::from_secs(120)).await;

        // Stale hit still serves the old value.
        let context = cache.get("p1").await.expect("stale fetch");
        assert_eq!(context.description, "p1 schema v0");

        // Let the background refresh run to completion.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);

        let context = cache.get("p1").await.expect("refreshed fetch");
        assert_eq!(context.description, "p1 schema v1");
    }

    #[tokio::test]
    async fn projects_are_cached_independently() {
        let (cache, engine) = cache_with_ttl(Duration::from_secs(300));

        let a = cache.get("a").await.expect("fetch a");
        let b = cache.get("b").await.expect("fetch b");

        assert_ne!(a.description, b.description);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    }
}
