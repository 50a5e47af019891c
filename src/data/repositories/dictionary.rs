use diesel::connection::SimpleConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::sql_types::Integer;
use r2d2::{CustomizeConnection, Pool, PooledConnection};

use crate::data::models::{
    encode_definitions, Entry, EntryRecord, EntryWithPronunciations, NewEntry,
    NewPronunciation, Pronunciation, PronunciationRow, StoreError,
};
use crate::data::repositories::{migrations, DictionaryQueries, IngestTarget};
use crate::schema::{entries, pronunciations};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

// Keeps `IN (...)` lists well under SQLite's bound parameter limit.
const LOAD_CHUNK: usize = 900;

#[derive(Debug)]
struct ConnectionPragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Dictionary storage on SQLite.
///
/// Cloning is cheap and shares the underlying pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Opens (or creates) the database at `database_url` and brings its
    /// schema up to date.
    pub fn open(database_url: &str, pool_size: u32) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let mut builder = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_customizer(Box::new(ConnectionPragmas));

        // Every in-memory connection is its own database, so keep exactly one alive.
        if database_url == ":memory:" {
            builder = builder
                .max_size(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let store = SqliteStore {
            pool: builder.build(manager)?,
        };

        let mut conn = store.conn()?;
        migrations::run(&mut conn)?;
        drop(conn);
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:", 1)
    }

    fn conn(&self) -> Result<DbConnection, StoreError> {
        self.pool.get().map_err(|e| {
            log::error!("Failed to get DB connection: {}", e);
            StoreError::Pool(e)
        })
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let mut conn = self.conn()?;
        Ok(entries::table.count().get_result::<i64>(&mut conn)?)
    }
}

impl IngestTarget for SqliteStore {
    fn count(&self) -> Result<i64, StoreError> {
        SqliteStore::count(self)
    }

    fn bulk_insert(&self, records: &[EntryRecord]) -> Result<usize, StoreError> {
        let mut conn = self.conn()?;

        let inserted = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for record in records {
                diesel::insert_into(entries::table)
                    .values(&NewEntry {
                        term: &record.term,
                        source: &record.source,
                        radical: record.radical.as_deref(),
                        stroke_count: record.stroke_count,
                        non_radical_stroke_count: record.non_radical_stroke_count,
                    })
                    .execute(conn)?;

                let entry_id = diesel::select(sql::<Integer>("last_insert_rowid()"))
                    .get_result::<i32>(conn)?;

                let rows: Vec<NewPronunciation> = record
                    .pronunciations
                    .iter()
                    .map(|p| NewPronunciation {
                        entry_id,
                        bopomofo: p.bopomofo.as_deref(),
                        pinyin: p.pinyin.as_deref(),
                        definitions: encode_definitions(&p.definitions),
                    })
                    .collect();

                if !rows.is_empty() {
                    diesel::insert_into(pronunciations::table)
                        .values(&rows)
                        .execute(conn)?;
                }
            }
            Ok(records.len())
        })?;

        Ok(inserted)
    }
}

impl DictionaryQueries for SqliteStore {
    fn search_by_term(&self, prefix: &str) -> Result<Vec<EntryWithPronunciations>, StoreError> {
        let mut conn = self.conn()?;
        let found = entries::table
            .filter(entries::term.like(like_prefix(prefix)).escape('\\'))
            .order(entries::id.asc())
            .select(Entry::as_select())
            .load(&mut conn)?;

        with_pronunciations(&mut conn, found)
    }

    fn search_by_radical(&self, radical: &str) -> Result<Vec<EntryWithPronunciations>, StoreError> {
        let mut conn = self.conn()?;
        let found = entries::table
            .filter(entries::radical.eq(radical))
            .order(entries::id.asc())
            .select(Entry::as_select())
            .load(&mut conn)?;

        with_pronunciations(&mut conn, found)
    }

    fn search_by_phonetic_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<EntryWithPronunciations>, StoreError> {
        let mut conn = self.conn()?;
        let matching_entries = pronunciations::table
            .filter(pronunciations::bopomofo.like(like_prefix(prefix)).escape('\\'))
            .select(pronunciations::entry_id);

        let found = entries::table
            .filter(entries::id.eq_any(matching_entries))
            .order(entries::id.asc())
            .select(Entry::as_select())
            .load(&mut conn)?;

        with_pronunciations(&mut conn, found)
    }

    fn get_by_id(&self, id: i32) -> Result<Option<EntryWithPronunciations>, StoreError> {
        let mut conn = self.conn()?;
        let entry = entries::table
            .find(id)
            .select(Entry::as_select())
            .first(&mut conn)
            .optional()?;

        match entry {
            Some(entry) => Ok(with_pronunciations(&mut conn, vec![entry])?.pop()),
            None => Ok(None),
        }
    }

    fn distinct_radicals(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn()?;
        let radicals = entries::table
            .filter(entries::radical.is_not_null())
            .select(entries::radical)
            .distinct()
            .order(entries::radical.asc())
            .load::<Option<String>>(&mut conn)?;

        Ok(radicals
            .into_iter()
            .flatten()
            .filter(|r| !r.trim().is_empty())
            .collect())
    }

    fn count(&self) -> Result<i64, StoreError> {
        SqliteStore::count(self)
    }
}

fn with_pronunciations(
    conn: &mut SqliteConnection,
    found: Vec<Entry>,
) -> Result<Vec<EntryWithPronunciations>, StoreError> {
    let mut results = Vec::with_capacity(found.len());

    for chunk in found.chunks(LOAD_CHUNK) {
        let rows = PronunciationRow::belonging_to(chunk)
            .select(PronunciationRow::as_select())
            .order(pronunciations::id.asc())
            .load::<PronunciationRow>(conn)?;

        let grouped = rows.grouped_by(chunk);
        results.extend(chunk.iter().cloned().zip(grouped).map(|(entry, rows)| {
            EntryWithPronunciations {
                entry,
                pronunciations: rows.into_iter().map(Pronunciation::from).collect(),
            }
        }));
    }

    Ok(results)
}

/// `LIKE` pattern matching strings that start with `prefix` literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
