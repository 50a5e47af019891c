use serde::{Deserialize, Serialize};

use crate::data::models::EntryWithPronunciations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Term,
    Radical,
    Phonetic,
}

impl SearchMode {
    /// Returns `None` for modes this service does not know.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "term" => Some(SearchMode::Term),
            "radical" => Some(SearchMode::Radical),
            "phonetic" | "bopomofo" | "zhuyin" => Some(SearchMode::Phonetic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Term => "term",
            SearchMode::Radical => "radical",
            SearchMode::Phonetic => "phonetic",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub mode: Option<SearchMode>,
    pub seq: u64,
    pub superseded: bool,
    pub results: Vec<EntryWithPronunciations>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub count: i64,
}
