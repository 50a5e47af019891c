use std::fmt;
use std::io::{BufReader, Read};

use serde::de::{Deserializer as _, SeqAccess, Visitor};
use serde_json::Value;

use crate::data::models::{EntryRecord, ParseError};
use crate::features::ingest::normalizer::normalize_entry;

pub const DEFAULT_PROGRESS_CADENCE: usize = 500;

const LOG_EVERY: usize = 5000;

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Rough number of top-level elements in the stream, used only for progress.
    pub expected_total: usize,
    /// Report progress after this many top-level elements.
    pub cadence: usize,
}

impl ParseOptions {
    pub fn new(expected_total: usize) -> Self {
        ParseOptions {
            expected_total,
            cadence: DEFAULT_PROGRESS_CADENCE,
        }
    }

    fn fraction(&self, seen: usize) -> f32 {
        if self.expected_total == 0 {
            return 1.0;
        }
        (seen as f32 / self.expected_total as f32).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Top-level elements read, including dropped ones.
    pub seen: usize,
    pub emitted: usize,
}

struct EntrySeqVisitor<'a, F, P> {
    source: &'a str,
    options: ParseOptions,
    on_entry: &'a mut F,
    on_progress: &'a mut P,
    summary: &'a mut ParseSummary,
}

impl<'de, F, P> Visitor<'de> for EntrySeqVisitor<'_, F, P>
where
    F: FnMut(EntryRecord),
    P: FnMut(f32),
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON array of dictionary entries")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let cadence = self.options.cadence.max(1);

        // One element in memory at a time.
        while let Some(value) = seq.next_element::<Value>()? {
            self.summary.seen += 1;

            if let Some(record) = normalize_entry(value, self.source) {
                self.summary.emitted += 1;
                (self.on_entry)(record);
            }

            if self.summary.seen % cadence == 0 {
                (self.on_progress)(self.options.fraction(self.summary.seen));
            }
            if self.summary.seen % LOG_EVERY == 0 {
                log::debug!("({}) Parsed {} elements...", self.source, self.summary.seen);
            }
        }

        Ok(())
    }
}

/// Streams a JSON array of dictionary entries from `reader`.
///
/// Each surviving entry is handed to `on_entry` as soon as it is read.
/// `on_progress` receives the fraction of `expected_total` seen every
/// `cadence` elements and exactly `1.0` once the stream ends, even when it
/// ends in a syntax error. Records delivered before such an error stay
/// delivered.
pub fn parse_entries<R, F, P>(
    reader: R,
    source: &str,
    options: ParseOptions,
    mut on_entry: F,
    mut on_progress: P,
) -> Result<ParseSummary, ParseError>
where
    R: Read,
    F: FnMut(EntryRecord),
    P: FnMut(f32),
{
    let mut summary = ParseSummary::default();
    let mut de = serde_json::Deserializer::from_reader(BufReader::new(reader));

    let result = (&mut de)
        .deserialize_seq(EntrySeqVisitor {
            source,
            options,
            on_entry: &mut on_entry,
            on_progress: &mut on_progress,
            summary: &mut summary,
        })
        .and_then(|()| de.end());

    on_progress(1.0);

    match result {
        Ok(()) => {
            log::info!(
                "({}) Stream parsed, {} of {} entries kept",
                source,
                summary.emitted,
                summary.seen
            );
            Ok(summary)
        }
        Err(e) => {
            log::error!(
                "({}) Stream parsing stopped after {} elements: {}",
                source,
                summary.seen,
                e
            );
            if e.is_io() {
                Err(ParseError::Io(e.into()))
            } else {
                Err(ParseError::Syntax(e))
            }
        }
    }
}
