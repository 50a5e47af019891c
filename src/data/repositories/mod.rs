pub mod dictionary;
pub mod migrations;

pub use dictionary::{DbPool, SqliteStore};

use crate::data::models::{EntryRecord, EntryWithPronunciations, StoreError};

/// What ingestion needs from storage.
pub trait IngestTarget: Send + Sync {
    fn count(&self) -> Result<i64, StoreError>;

    /// Inserts `records` atomically; either the whole batch lands or none of it.
    fn bulk_insert(&self, records: &[EntryRecord]) -> Result<usize, StoreError>;
}

/// Read side of the dictionary, as consumed by search and the HTTP API.
///
/// All lists come back in store order (ascending entry id), each entry with
/// its pronunciations in insertion order.
pub trait DictionaryQueries: Send + Sync {
    fn search_by_term(&self, prefix: &str) -> Result<Vec<EntryWithPronunciations>, StoreError>;

    fn search_by_radical(&self, radical: &str) -> Result<Vec<EntryWithPronunciations>, StoreError>;

    /// Coarse phonetic lookup: entries having any pronunciation whose bopomofo
    /// starts with `prefix`. Callers refine the result themselves.
    fn search_by_phonetic_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<EntryWithPronunciations>, StoreError>;

    fn get_by_id(&self, id: i32) -> Result<Option<EntryWithPronunciations>, StoreError>;

    fn distinct_radicals(&self) -> Result<Vec<String>, StoreError>;

    fn count(&self) -> Result<i64, StoreError>;
}
