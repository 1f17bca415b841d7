//! Discarding results of searches that were overtaken by a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::adapter::{ExternalImage, SearchAdapter};
use crate::error::SearchResult;

/// What a search produced by the time it finished.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results of the latest search
    Current(Vec<ExternalImage>),
    /// A newer search started while this one was in flight; its result was dropped
    Superseded,
}

impl SearchOutcome {
    pub fn into_current(self) -> Option<Vec<ExternalImage>> {
        match self {
            SearchOutcome::Current(images) => Some(images),
            SearchOutcome::Superseded => None,
        }
    }
}

/// Wraps an adapter so that only the most recently issued search is reported.
///
/// Earlier requests are not cancelled. When they finish, success and failure alike turn
/// into [`SearchOutcome::Superseded`].
pub struct SearchSession {
    adapter: Arc<dyn SearchAdapter>,
    latest: AtomicU64,
}

impl SearchSession {
    pub fn new(adapter: Arc<dyn SearchAdapter>) -> Self {
        Self {
            adapter,
            latest: AtomicU64::new(0),
        }
    }

    pub async fn search(&self, query: &str) -> SearchResult<SearchOutcome> {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.adapter.search(query).await;

        if self.latest.load(Ordering::SeqCst) != token {
            debug!("Dropping superseded search #{} for {:?}", token, query);
            return Ok(SearchOutcome::Superseded);
        }
        result.map(SearchOutcome::Current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Answers each query after a delay taken from the query itself.
    struct DelayedAdapter;

    #[async_trait]
    impl SearchAdapter for DelayedAdapter {
        fn source_name(&self) -> &str {
            "delayed"
        }

        async fn search(&self, query: &str) -> SearchResult<Vec<ExternalImage>> {
            let (delay_ms, id) = query.split_once(':').unwrap();
            tokio::time::sleep(Duration::from_millis(delay_ms.parse().unwrap())).await;
            if id == "fail" {
                return Err(SearchError::Network("boom".to_string()));
            }
            Ok(vec![ExternalImage {
                id: id.to_string(),
                src: String::new(),
                src_small: String::new(),
                prompt: id.to_string(),
                width: 1,
                height: 1,
                gallery: None,
                seed: None,
                model: None,
                guidance: None,
                grid: false,
                nsfw: false,
            }])
        }
    }

    fn session() -> SearchSession {
        SearchSession::new(Arc::new(DelayedAdapter))
    }

    #[tokio::test]
    async fn test_single_search_is_current() {
        let outcome = session().search("0:only").await.unwrap();
        let images = outcome.into_current().unwrap();
        assert_eq!(images[0].id, "only");
    }

    #[tokio::test]
    async fn test_slow_earlier_search_is_superseded() {
        let session = session();
        let slow = session.search("200:slow");
        let fast = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.search("0:fast").await
        };

        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(slow.unwrap(), SearchOutcome::Superseded);
        assert_eq!(fast.unwrap().into_current().unwrap()[0].id, "fast");
    }

    #[tokio::test]
    async fn test_stale_failure_is_superseded() {
        let session = session();
        let stale = session.search("200:fail");
        let fresh = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.search("0:ok").await
        };

        let (stale, fresh) = tokio::join!(stale, fresh);
        assert_eq!(stale.unwrap(), SearchOutcome::Superseded);
        assert!(fresh.is_ok());
    }
}
