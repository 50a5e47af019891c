use std::str::FromStr;
use std::time::Duration;

use crate::data::models::{ConfigError, SourceDescriptor};
use crate::features::ingest::orchestrator::DEFAULT_BATCH_SIZE;
use crate::features::ingest::parser::DEFAULT_PROGRESS_CADENCE;
use crate::features::ingest::sources::{select_sources, DEFAULT_SOURCES};

const DEFAULT_DATABASE_URL: &str = "moedict.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TIMEOUT_SECS: u64 = 600;
const DEFAULT_MAX_RESULTS: usize = 200;
const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub sources: Vec<SourceDescriptor>,
    pub batch_size: usize,
    pub progress_cadence: usize,
    pub http: HttpSettings,
    pub max_results: usize,
    pub pool_size: u32,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let sources = match lookup("DICTIONARY_SOURCES") {
            Some(raw) => {
                let keys: Vec<&str> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .collect();
                select_sources(&keys)?
            }
            None => select_sources(DEFAULT_SOURCES)?,
        };

        let config = Config {
            database_url: text("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr: text("BIND_ADDR", DEFAULT_BIND_ADDR),
            sources,
            batch_size: positive(&lookup, "INGEST_BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
            progress_cadence: positive(&lookup, "PROGRESS_CADENCE", DEFAULT_PROGRESS_CADENCE)?,
            http: HttpSettings {
                user_agent: text("HTTP_USER_AGENT", DEFAULT_USER_AGENT),
                connect_timeout: Duration::from_secs(positive(
                    &lookup,
                    "HTTP_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CONNECT_TIMEOUT_SECS,
                )?),
                timeout: Duration::from_secs(positive(
                    &lookup,
                    "HTTP_TIMEOUT_SECS",
                    DEFAULT_TIMEOUT_SECS,
                )?),
            },
            max_results: positive(&lookup, "SEARCH_MAX_RESULTS", DEFAULT_MAX_RESULTS)?,
            pool_size: positive(&lookup, "DB_POOL_SIZE", DEFAULT_POOL_SIZE)?,
        };

        Ok(config)
    }
}

fn positive<L, N>(lookup: &L, name: &'static str, default: N) -> Result<N, ConfigError>
where
    L: Fn(&str) -> Option<String>,
    N: FromStr + PartialEq + Default,
{
    let Some(raw) = lookup(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };

    match raw.trim().parse::<N>() {
        Ok(n) if n != N::default() => Ok(n),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}
