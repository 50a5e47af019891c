use crate::data::models::{EntryRecord, IngestOutcome, SourceDescriptor, StoreError};
use crate::data::repositories::IngestTarget;
use crate::features::ingest::fetch::SourceFetcher;
use crate::features::ingest::parser::{parse_entries, ParseOptions, DEFAULT_PROGRESS_CADENCE};

pub const DEFAULT_BATCH_SIZE: usize = 5000;

pub const NO_RECORDS_MESSAGE: &str = "No dictionary records could be loaded";

/// Receives `(overall progress, human readable message)` updates.
///
/// Later calls supersede earlier ones; implementations should keep only the
/// latest value.
pub trait ProgressSink {
    fn report(&mut self, progress: f32, message: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(f32, &str),
{
    fn report(&mut self, progress: f32, message: &str) {
        self(progress, message)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub batch_size: usize,
    pub progress_cadence: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            batch_size: DEFAULT_BATCH_SIZE,
            progress_cadence: DEFAULT_PROGRESS_CADENCE,
        }
    }
}

/// Fills an empty store from a list of dictionary sources.
///
/// Blocking; run it on a worker thread.
pub struct Ingestor<'a, T: ?Sized, F: ?Sized> {
    target: &'a T,
    fetcher: &'a F,
    options: IngestOptions,
}

impl<'a, T, F> Ingestor<'a, T, F>
where
    T: IngestTarget + ?Sized,
    F: SourceFetcher + ?Sized,
{
    pub fn new(target: &'a T, fetcher: &'a F, options: IngestOptions) -> Self {
        Ingestor {
            target,
            fetcher,
            options,
        }
    }

    pub fn run<S>(&self, sources: &[SourceDescriptor], sink: &mut S) -> IngestOutcome
    where
        S: ProgressSink + ?Sized,
    {
        match self.target.count() {
            Ok(existing) if existing > 0 => {
                log::info!("Dictionary already holds {} entries, skipping setup", existing);
                return IngestOutcome::Skipped { existing };
            }
            Ok(_) => log::info!("Dictionary is empty, starting first-run setup"),
            Err(e) => return fail(sink, e),
        }

        match self.ingest(sources, sink) {
            Ok(outcome) => outcome,
            Err(e) => fail(sink, e),
        }
    }

    fn ingest<S>(&self, sources: &[SourceDescriptor], sink: &mut S) -> Result<IngestOutcome, StoreError>
    where
        S: ProgressSink + ?Sized,
    {
        let mut records: Vec<EntryRecord> = Vec::new();
        let mut completed = 0.0_f32;

        for source in sources {
            let base = completed;
            let weight = source.progress_weight.max(0.0);
            sink.report(clamp(base), &format!("Downloading {}...", source.label));

            match self.fetcher.fetch(source) {
                Ok(reader) => {
                    let before = records.len();
                    let options = ParseOptions {
                        expected_total: source.approx_record_count,
                        cadence: self.options.progress_cadence,
                    };
                    let message = format!("Parsing {}...", source.label);

                    let parsed = parse_entries(
                        reader,
                        &source.key,
                        options,
                        |record| records.push(record),
                        |fraction| sink.report(clamp(base + weight * fraction), &message),
                    );

                    let kept = records.len() - before;
                    match parsed {
                        Ok(_) => log::info!("{} parsed, {} records", source.label, kept),
                        Err(e) => log::warn!(
                            "{} ended early ({}), keeping {} records",
                            source.label,
                            e,
                            kept
                        ),
                    }
                    if kept == 0 {
                        log::warn!("No records parsed from {}", source.label);
                    }
                }
                Err(e) => log::warn!("Skipping {}: {}", source.label, e),
            }

            completed = base + weight;
        }

        if records.is_empty() {
            log::error!("None of the dictionary sources produced any records");
            sink.report(1.0, NO_RECORDS_MESSAGE);
            return Ok(IngestOutcome::NoRecords);
        }

        let insert_start = clamp(completed);
        sink.report(
            insert_start,
            &format!("Writing {} records to the database...", records.len()),
        );

        let batch_size = self.options.batch_size.max(1);
        let batch_count = records.len().div_ceil(batch_size);
        let mut inserted = 0;

        for (index, batch) in records.chunks(batch_size).enumerate() {
            inserted += self.target.bulk_insert(batch)?;
            log::debug!("Inserted batch {}/{} ({} records)", index + 1, batch_count, batch.len());

            let done = (index + 1) as f32 / batch_count as f32;
            if index + 1 < batch_count {
                sink.report(
                    clamp(insert_start + (1.0 - insert_start) * done),
                    &format!("Writing records to the database ({}/{})...", inserted, records.len()),
                );
            }
        }

        log::info!("Dictionary setup finished, {} entries written", inserted);
        sink.report(1.0, "Dictionary ready");
        Ok(IngestOutcome::Completed { inserted })
    }
}

fn fail<S>(sink: &mut S, error: StoreError) -> IngestOutcome
where
    S: ProgressSink + ?Sized,
{
    log::error!("Dictionary setup failed: {}", error);
    let message = format!("Error: {}", error);
    sink.report(1.0, &message);
    IngestOutcome::Failed { message }
}

fn clamp(progress: f32) -> f32 {
    progress.clamp(0.0, 1.0)
}
