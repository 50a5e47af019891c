use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinError;

use crate::data::models::{EntryWithPronunciations, SearchMode};
use crate::data::repositories::DictionaryQueries;
use crate::features::search::engine::SearchEngine;

/// The most recently published search.
#[derive(Debug, Clone, Default)]
pub struct SearchSnapshot {
    pub seq: u64,
    pub query: String,
    pub mode: Option<SearchMode>,
    pub results: Arc<Vec<EntryWithPronunciations>>,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub seq: u64,
    /// A newer search had already been published when this one finished.
    pub superseded: bool,
    pub results: Arc<Vec<EntryWithPronunciations>>,
}

/// Runs searches off the async runtime and keeps only the newest result.
///
/// Every submission gets a sequence number. A finished search is published
/// only if nothing with a higher number got there first, so a slow, stale
/// lookup never overwrites a fresher one.
pub struct SearchCoordinator<Q: ?Sized> {
    engine: SearchEngine<Q>,
    next_seq: AtomicU64,
    latest: watch::Sender<SearchSnapshot>,
}

impl<Q> SearchCoordinator<Q>
where
    Q: DictionaryQueries + ?Sized + 'static,
{
    pub fn new(engine: SearchEngine<Q>) -> Self {
        let (latest, _) = watch::channel(SearchSnapshot::default());
        SearchCoordinator {
            engine,
            next_seq: AtomicU64::new(0),
            latest,
        }
    }

    /// `mode` of `None` stands for a mode the caller did not recognise; it
    /// still takes a sequence number and publishes an empty result.
    pub async fn submit(
        &self,
        query: String,
        mode: Option<SearchMode>,
    ) -> Result<SearchOutcome, JoinError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let results = match mode {
            Some(mode) => {
                let engine = self.engine.clone();
                let q = query.clone();
                tokio::task::spawn_blocking(move || engine.search(&q, mode)).await?
            }
            None => Vec::new(),
        };
        let results = Arc::new(results);

        let published = self.latest.send_if_modified(|current| {
            if current.seq > seq {
                return false;
            }
            *current = SearchSnapshot {
                seq,
                query,
                mode,
                results: Arc::clone(&results),
            };
            true
        });

        if !published {
            log::debug!("Search #{} finished after a newer one, not published", seq);
        }

        Ok(SearchOutcome {
            seq,
            superseded: !published,
            results,
        })
    }

    pub fn latest(&self) -> SearchSnapshot {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.latest.subscribe()
    }
}
