//! Result caching for search, document and in-document match results

pub mod clock;
pub mod ttl_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ttl_cache::{CLEANUP_INTERVAL, CacheStats, TtlCache};

use crate::types::{DocumentContent, SearchResultPage, SearchWithinResult};
use std::sync::Arc;
use std::time::Duration;

/// Default time-to-live of every cache namespace
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// The three cache namespaces shared by all tools
///
/// Cheap to clone; clones share the same underlying stores.
#[derive(Clone)]
pub struct MevzuatCaches {
    pub search: Arc<TtlCache<SearchResultPage>>,
    pub documents: Arc<TtlCache<Arc<DocumentContent>>>,
    pub articles: Arc<TtlCache<SearchWithinResult>>,
}

impl MevzuatCaches {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            search: Arc::new(TtlCache::with_clock("search", ttl, Arc::clone(&clock))),
            documents: Arc::new(TtlCache::with_clock("documents", ttl, Arc::clone(&clock))),
            articles: Arc::new(TtlCache::with_clock("articles", ttl, clock)),
        }
    }

    /// Spawn the periodic purge task for every namespace
    pub fn start_cleanup_tasks(&self) {
        Arc::clone(&self.search).start_cleanup_task();
        Arc::clone(&self.documents).start_cleanup_task();
        Arc::clone(&self.articles).start_cleanup_task();
    }

    pub fn clear(&self) {
        self.search.clear();
        self.documents.clear();
        self.articles.clear();
    }
}

impl Default for MevzuatCaches {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

/// Key of an in-document search result
///
/// Keyword and case flag are part of the key so that differing parameters
/// never share an entry.
#[must_use]
pub fn article_key(document_id: &str, keyword: &str, case_sensitive: bool, max_results: usize) -> String {
    format!("articles:{document_id}:{case_sensitive}:{max_results}:{keyword}")
}

/// Key of a full document
#[must_use]
pub fn document_key(scope: &str, document_id: &str) -> String {
    format!("documents:{scope}:{document_id}")
}
