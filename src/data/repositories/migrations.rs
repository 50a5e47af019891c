use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::StoreError;

/// Bumping this wipes existing databases on next start; ingestion refills them.
pub const SCHEMA_VERSION: i32 = 2;

const CREATE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    term TEXT NOT NULL,
    source TEXT NOT NULL,
    radical TEXT,
    stroke_count INTEGER,
    non_radical_stroke_count INTEGER
);
CREATE TABLE IF NOT EXISTS pronunciations (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
    bopomofo TEXT,
    pinyin TEXT,
    definitions TEXT
);
CREATE INDEX IF NOT EXISTS idx_pronunciations_entry_id ON pronunciations(entry_id);
CREATE INDEX IF NOT EXISTS idx_pronunciations_bopomofo ON pronunciations(bopomofo);
CREATE INDEX IF NOT EXISTS idx_entries_term ON entries(term);
CREATE INDEX IF NOT EXISTS idx_entries_radical ON entries(radical);
"#;

const DROP_SCHEMA: &str = r#"
DROP TABLE IF EXISTS pronunciations;
DROP TABLE IF EXISTS entries;
"#;

#[derive(QueryableByName)]
struct UserVersion {
    #[diesel(sql_type = Integer)]
    user_version: i32,
}

pub fn stored_version(conn: &mut SqliteConnection) -> Result<i32, StoreError> {
    let version = diesel::sql_query("PRAGMA user_version").get_result::<UserVersion>(conn)?;
    Ok(version.user_version)
}

/// Brings the schema to `SCHEMA_VERSION`, dropping all data if the stored
/// version differs.
pub fn run(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let current = stored_version(conn)?;
    if current == SCHEMA_VERSION {
        conn.batch_execute(CREATE_SCHEMA)?;
        return Ok(());
    }

    if current != 0 {
        log::warn!(
            "Schema version {} differs from {}, rebuilding the dictionary tables",
            current,
            SCHEMA_VERSION
        );
    }

    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        conn.batch_execute(DROP_SCHEMA)?;
        conn.batch_execute(CREATE_SCHEMA)?;
        conn.batch_execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
    })?;

    Ok(())
}
