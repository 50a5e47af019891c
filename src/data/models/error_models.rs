use diesel::r2d2::PoolError;
use diesel::result::{ConnectionError, Error as DieselError};
use thiserror::Error;

// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Query(#[from] DieselError),
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
}

// Download errors, never fatal for ingestion
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected response status {0}")]
    HttpStatus(reqwest::StatusCode),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error while reading the dictionary stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed dictionary JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Unknown dictionary source {0:?}")]
    UnknownSource(String),
    #[error("No dictionary sources configured")]
    NoSources,
}

// Errors surfaced by the HTTP layer
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Entry {0} not found")]
    NotFound(i32),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
