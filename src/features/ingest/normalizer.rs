use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::data::models::{Definition, EntryRecord, PronunciationRecord};

lazy_static! {
    // Placeholder headwords such as `{[8e40]}` stand for glyphs with no code point.
    static ref PLACEHOLDER_TITLE_RE: Regex = Regex::new(r"^\{\[.*\]\}$").unwrap();
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    title: Option<String>,
    radical: Option<String>,
    stroke_count: Option<i32>,
    non_radical_stroke_count: Option<i32>,
    heteronyms: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawHeteronym {
    bopomofo: Option<String>,
    pinyin: Option<String>,
    definitions: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    #[serde(rename = "type")]
    def_type: Option<String>,
    def: Option<String>,
    example: Option<Vec<String>>,
    quote: Option<Vec<String>>,
    link: Option<Vec<String>>,
}

pub fn is_placeholder_title(title: &str) -> bool {
    PLACEHOLDER_TITLE_RE.is_match(title)
}

/// Flattens one top-level dictionary object into an `EntryRecord`.
///
/// Returns `None` when the entry is a placeholder, has no title, or ends up
/// without any pronunciation carrying a definition. Malformed heteronyms and
/// definitions are dropped one by one.
pub fn normalize_entry(value: Value, source: &str) -> Option<EntryRecord> {
    let raw: RawEntry = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("({}) Dropping malformed entry: {}", source, e);
            return None;
        }
    };

    let title = raw.title.unwrap_or_default();
    if title.trim().is_empty() || is_placeholder_title(&title) {
        return None;
    }

    let pronunciations: Vec<PronunciationRecord> = raw
        .heteronyms
        .unwrap_or_default()
        .into_iter()
        .filter_map(|h| normalize_heteronym(h, &title, source))
        .collect();

    if pronunciations.is_empty() {
        log::debug!("({}) Entry '{}' has no usable definitions, skipped", source, title);
        return None;
    }

    Some(EntryRecord {
        term: title,
        source: source.to_string(),
        radical: raw.radical.filter(|r| !r.trim().is_empty()),
        stroke_count: raw.stroke_count,
        non_radical_stroke_count: raw.non_radical_stroke_count,
        pronunciations,
    })
}

fn normalize_heteronym(value: Value, title: &str, source: &str) -> Option<PronunciationRecord> {
    let raw: RawHeteronym = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("({}) Dropping malformed heteronym of '{}': {}", source, title, e);
            return None;
        }
    };

    let definitions: Vec<Definition> = raw
        .definitions
        .unwrap_or_default()
        .into_iter()
        .filter_map(|d| normalize_definition(d, title, source))
        .collect();

    if definitions.is_empty() {
        return None;
    }

    Some(PronunciationRecord {
        bopomofo: raw.bopomofo,
        pinyin: raw.pinyin,
        definitions,
    })
}

fn normalize_definition(value: Value, title: &str, source: &str) -> Option<Definition> {
    let raw: RawDefinition = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("({}) Dropping malformed definition of '{}': {}", source, title, e);
            return None;
        }
    };

    let quote = raw.quote.filter(|q| !q.is_empty());
    let link = raw.link.filter(|l| !l.is_empty());
    let def = resolve_definition_text(raw.def.as_deref(), quote.as_deref(), link.as_deref())?;

    Some(Definition {
        def_type: raw.def_type,
        def,
        example: raw.example.filter(|e| !e.is_empty()),
        quote,
        link,
    })
}

/// First non-blank of: the explicit text, the joined quotes, the joined links.
pub fn resolve_definition_text(
    def: Option<&str>,
    quote: Option<&[String]>,
    link: Option<&[String]>,
) -> Option<String> {
    if let Some(def) = def.filter(|d| !d.trim().is_empty()) {
        return Some(def.to_string());
    }

    [quote, link]
        .into_iter()
        .flatten()
        .map(|lines| lines.join("\n"))
        .find(|joined| !joined.trim().is_empty())
}
