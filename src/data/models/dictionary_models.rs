use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;

use crate::data::models::definition_models::{decode_definitions, Definition};
use crate::schema::{entries, pronunciations};

/// A dictionary headword row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Entry {
    pub id: i32,
    pub term: String,
    pub source: String,
    pub radical: Option<String>,
    pub stroke_count: Option<i32>,
    pub non_radical_stroke_count: Option<i32>,
}

/// A pronunciation row with its definitions still serialized.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(Entry))]
#[diesel(table_name = pronunciations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PronunciationRow {
    pub id: i32,
    pub entry_id: i32,
    pub bopomofo: Option<String>,
    pub pinyin: Option<String>,
    pub definitions: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = entries)]
pub struct NewEntry<'a> {
    pub term: &'a str,
    pub source: &'a str,
    pub radical: Option<&'a str>,
    pub stroke_count: Option<i32>,
    pub non_radical_stroke_count: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = pronunciations)]
pub struct NewPronunciation<'a> {
    pub entry_id: i32,
    pub bopomofo: Option<&'a str>,
    pub pinyin: Option<&'a str>,
    pub definitions: Option<String>,
}

/// A pronunciation as handed to callers, definitions decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pronunciation {
    pub id: i32,
    pub bopomofo: Option<String>,
    pub pinyin: Option<String>,
    pub definitions: Vec<Definition>,
}

impl From<PronunciationRow> for Pronunciation {
    fn from(row: PronunciationRow) -> Self {
        let definitions = decode_definitions(row.definitions.as_deref());
        Pronunciation {
            id: row.id,
            bopomofo: row.bopomofo,
            pinyin: row.pinyin,
            definitions,
        }
    }
}

/// An entry together with its pronunciations, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryWithPronunciations {
    #[serde(flatten)]
    pub entry: Entry,
    pub pronunciations: Vec<Pronunciation>,
}
