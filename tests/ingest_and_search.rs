use std::io::{Cursor, Read};
use std::sync::Arc;

use serde_json::json;

use moedict::data::models::{FetchError, IngestOutcome, SearchMode, SourceDescriptor};
use moedict::data::repositories::{DictionaryQueries, SqliteStore};
use moedict::features::ingest::sources::select_sources;
use moedict::features::ingest::{IngestOptions, Ingestor, SourceFetcher};
use moedict::features::search::SearchEngine;

/// Serves canned JSON for every source.
struct StaticFetcher(String);

impl SourceFetcher for StaticFetcher {
    fn fetch(&self, _source: &SourceDescriptor) -> Result<Box<dyn Read + Send>, FetchError> {
        Ok(Box::new(Cursor::new(self.0.clone().into_bytes())))
    }
}

fn dictionary_json() -> String {
    json!([
        {
            "title": "八",
            "radical": "八",
            "stroke_count": 2,
            "non_radical_stroke_count": 0,
            "heteronyms": [{"bopomofo": "ㄅㄚ", "pinyin": "bā", "definitions": [{"type": "名", "def": "數目名。"}]}]
        },
        {
            "title": "爸爸",
            "heteronyms": [{"bopomofo": "ㄅㄚˋ　˙ㄅㄚ", "definitions": [{"def": "稱謂。"}]}]
        },
        {
            "title": "拔",
            "radical": "手",
            "heteronyms": [{"bopomofo": "ㄅㄚˊ", "definitions": [{"def": "", "quote": ["《詩經》：「拔」"]}]}]
        },
        {
            "title": "筆",
            "radical": "竹",
            "heteronyms": [{"bopomofo": "ㄅㄧˇ", "definitions": [{"def": "書寫的工具。"}]}]
        },
        {"title": "{[9f4a]}", "heteronyms": [{"bopomofo": "ㄅ", "definitions": [{"def": "x"}]}]},
        {"title": "空", "heteronyms": [{"bopomofo": "ㄎㄨㄥ", "definitions": []}]}
    ])
    .to_string()
}

fn ingested_store() -> Arc<SqliteStore> {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let fetcher = StaticFetcher(dictionary_json());
    let sources = select_sources(&["revised"]).unwrap();
    let options = IngestOptions {
        batch_size: 2,
        progress_cadence: 1,
    };

    let mut reports: Vec<(f32, String)> = Vec::new();
    let mut sink = |progress: f32, message: &str| reports.push((progress, message.to_string()));
    let outcome = Ingestor::new(store.as_ref(), &fetcher, options).run(&sources, &mut sink);

    assert_eq!(outcome, IngestOutcome::Completed { inserted: 4 });
    assert!(reports.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(reports.last().unwrap(), &(1.0, "Dictionary ready".to_string()));

    store
}

#[test]
fn ingestion_persists_only_usable_entries() {
    let store = ingested_store();
    assert_eq!(store.count().unwrap(), 4);

    let pull = store.get_by_id(3).unwrap().unwrap();
    assert_eq!(pull.entry.term, "拔");
    assert_eq!(pull.pronunciations[0].definitions[0].def, "《詩經》：「拔」");
}

#[test]
fn second_run_is_skipped() {
    let store = ingested_store();
    let fetcher = StaticFetcher(String::from("not json"));
    let sources = select_sources(&["revised"]).unwrap();

    let mut calls = 0;
    let mut sink = |_: f32, _: &str| calls += 1;
    let outcome = Ingestor::new(store.as_ref(), &fetcher, IngestOptions::default()).run(&sources, &mut sink);

    assert_eq!(outcome, IngestOutcome::Skipped { existing: 4 });
    assert_eq!(calls, 0);
}

#[test]
fn phonetic_search_over_ingested_data() {
    let engine = SearchEngine::new(ingested_store());

    let results = engine.search("ㄅ", SearchMode::Phonetic);
    let terms: Vec<_> = results.iter().map(|e| e.entry.term.as_str()).collect();
    assert_eq!(terms, vec!["八", "拔", "筆", "爸爸"]);

    let results = engine.search("ㄅㄚ ", SearchMode::Phonetic);
    let terms: Vec<_> = results.iter().map(|e| e.entry.term.as_str()).collect();
    assert_eq!(terms, vec!["八"]);

    let results = engine.search("ㄅㄚˋ ˙", SearchMode::Phonetic);
    let terms: Vec<_> = results.iter().map(|e| e.entry.term.as_str()).collect();
    assert_eq!(terms, vec!["爸爸"]);
}

#[test]
fn term_and_radical_search_over_ingested_data() {
    let engine = SearchEngine::new(ingested_store());

    let terms: Vec<_> = engine
        .search("爸", SearchMode::Term)
        .into_iter()
        .map(|e| e.entry.term)
        .collect();
    assert_eq!(terms, vec!["爸爸"]);

    let radical = engine.search("竹", SearchMode::Radical);
    assert_eq!(radical.len(), 1);
    assert_eq!(radical[0].entry.term, "筆");
}
