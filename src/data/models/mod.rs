pub mod definition_models;
pub mod dictionary_models;
pub mod error_models;
pub mod ingest_models;
pub mod search_models;

pub use definition_models::{decode_definitions, encode_definitions, Definition};
pub use dictionary_models::{
    Entry, EntryWithPronunciations, NewEntry, NewPronunciation,
    Pronunciation, PronunciationRow
};
pub use error_models::{ApiError, ConfigError, FetchError, ParseError, StoreError};
pub use ingest_models::{
    EntryRecord, IngestOutcome, PronunciationRecord,
    SetupPhase, SetupStatus, SourceDescriptor
};
pub use search_models::{SearchMode, SearchParams, SearchResponse, StatsResponse};
