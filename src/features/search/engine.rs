use std::sync::Arc;

use crate::data::models::{EntryWithPronunciations, SearchMode, StoreError};
use crate::data::repositories::DictionaryQueries;
use crate::features::search::phonetic;

pub struct SearchEngine<Q: ?Sized> {
    store: Arc<Q>,
}

impl<Q: ?Sized> Clone for SearchEngine<Q> {
    fn clone(&self) -> Self {
        SearchEngine {
            store: Arc::clone(&self.store),
        }
    }
}

impl<Q> SearchEngine<Q>
where
    Q: DictionaryQueries + ?Sized,
{
    pub fn new(store: Arc<Q>) -> Self {
        SearchEngine { store }
    }

    /// Runs one lookup. A blank query never touches the store, and store
    /// failures come back as an empty list.
    pub fn search(&self, query: &str, mode: SearchMode) -> Vec<EntryWithPronunciations> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let result = match mode {
            SearchMode::Term => self.store.search_by_term(query.trim()),
            SearchMode::Radical => self.store.search_by_radical(query.trim()),
            SearchMode::Phonetic => self.search_phonetic(query),
        };

        result.unwrap_or_else(|e| {
            log::error!("{} search for {:?} failed: {}", mode.as_str(), query, e);
            Vec::new()
        })
    }

    fn search_phonetic(&self, query: &str) -> Result<Vec<EntryWithPronunciations>, StoreError> {
        let normalized = phonetic::normalize_query(query);
        let Some(first) = normalized.chars().next() else {
            return Ok(Vec::new());
        };

        let candidates = self.store.search_by_phonetic_prefix(first.encode_utf8(&mut [0; 4]))?;
        log::debug!(
            "Phonetic prefix {:?} gave {} candidates",
            first,
            candidates.len()
        );

        Ok(phonetic::refine(&normalized, candidates))
    }
}
