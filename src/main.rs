use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;

use moedict::config::Config;
use moedict::data::models::SetupStatus;
use moedict::data::repositories::SqliteStore;
use moedict::features::ingest::{self, IngestOptions};
use moedict::features::search::{SearchCoordinator, SearchEngine};
use moedict::handlers::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loaded early so RUST_LOG from .env applies to the logger too.
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("Invalid configuration")?;

    // Database
    let store = SqliteStore::open(&config.database_url, config.pool_size)
        .with_context(|| format!("Failed to open database at {}", config.database_url))?;
    let store = Arc::new(store);

    // First-run ingestion; the server answers while it works.
    let (status_tx, status_rx) = watch::channel(SetupStatus::pending());
    let setup = ingest::spawn_first_run(
        Arc::clone(&store),
        config.sources.clone(),
        config.http.clone(),
        IngestOptions {
            batch_size: config.batch_size,
            progress_cadence: config.progress_cadence,
        },
        status_tx,
    );
    tokio::spawn(async move {
        match setup.await {
            Ok(outcome) => log::info!("Setup finished: {:?}", outcome),
            Err(e) => log::error!("Setup task panicked: {}", e),
        }
    });

    let search = SearchCoordinator::new(SearchEngine::new(Arc::clone(&store)));
    let state = AppState {
        store,
        search: Arc::new(search),
        setup: status_rx,
        max_results: config.max_results,
    };
    let app = handlers::app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    log::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
