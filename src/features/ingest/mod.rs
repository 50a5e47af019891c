pub mod fetch;
pub mod normalizer;
pub mod orchestrator;
pub mod parser;
pub mod sources;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::HttpSettings;
use crate::data::models::{IngestOutcome, SetupStatus, SourceDescriptor};
use crate::data::repositories::IngestTarget;

pub use fetch::{HttpFetcher, SourceFetcher};
pub use orchestrator::{IngestOptions, Ingestor, ProgressSink, NO_RECORDS_MESSAGE};
pub use parser::{parse_entries, ParseOptions, ParseSummary};

/// Runs first-run ingestion on a blocking worker and publishes its progress
/// on `status`. Only the latest status is kept.
///
/// The published status always ends in `Ready` or `Failed`, including when
/// the worker panics.
pub fn spawn_first_run<T>(
    target: Arc<T>,
    sources: Vec<SourceDescriptor>,
    http: HttpSettings,
    options: IngestOptions,
    status: watch::Sender<SetupStatus>,
) -> JoinHandle<IngestOutcome>
where
    T: IngestTarget + 'static,
{
    let status = Arc::new(status);
    let worker_status = Arc::clone(&status);
    let worker = tokio::task::spawn_blocking(move || {
        first_run(target.as_ref(), &sources, &http, options, &worker_status)
    });

    tokio::spawn(async move {
        match worker.await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Dictionary setup task failed: {}", e);
                let message = format!("Error: {}", e);
                status.send_replace(SetupStatus::failed(message.clone()));
                IngestOutcome::Failed { message }
            }
        }
    })
}

fn first_run<T>(
    target: &T,
    sources: &[SourceDescriptor],
    http: &HttpSettings,
    options: IngestOptions,
    status: &watch::Sender<SetupStatus>,
) -> IngestOutcome
where
    T: IngestTarget + ?Sized,
{
    let fetcher = match HttpFetcher::new(http) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            log::error!("Failed to build HTTP client: {}", e);
            let message = format!("Error: {}", e);
            status.send_replace(SetupStatus::failed(message.clone()));
            return IngestOutcome::Failed { message };
        }
    };

    let mut sink = |progress: f32, message: &str| {
        status.send_replace(SetupStatus::running(progress, message));
    };
    let outcome = Ingestor::new(target, &fetcher, options).run(sources, &mut sink);

    status.send_replace(final_status(&outcome));
    outcome
}

fn final_status(outcome: &IngestOutcome) -> SetupStatus {
    match outcome {
        IngestOutcome::Skipped { existing } => {
            SetupStatus::ready(format!("Dictionary loaded ({} entries)", existing))
        }
        IngestOutcome::Completed { inserted } => {
            SetupStatus::ready(format!("Dictionary ready ({} entries added)", inserted))
        }
        IngestOutcome::NoRecords => SetupStatus::failed(NO_RECORDS_MESSAGE),
        IngestOutcome::Failed { message } => SetupStatus::failed(message.clone()),
    }
}
