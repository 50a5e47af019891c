use crate::data::models::{ConfigError, SourceDescriptor};

/// Share of the overall progress bar spent downloading and parsing; the rest
/// covers database writes.
pub const PARSE_PROGRESS_SHARE: f32 = 0.9;

struct CatalogueEntry {
    key: &'static str,
    url: &'static str,
    label: &'static str,
    approx_record_count: usize,
}

// Record counts are approximate and only drive the progress bar.
const CATALOGUE: &[CatalogueEntry] = &[
    CatalogueEntry {
        key: "revised",
        url: "https://raw.githubusercontent.com/g0v/moedict-data/master/dict-revised.json",
        label: "重編國語辭典",
        approx_record_count: 163_000,
    },
    CatalogueEntry {
        key: "concise",
        url: "https://raw.githubusercontent.com/g0v/moedict-data-tw/master/concised.json",
        label: "國語辭典簡編本",
        approx_record_count: 45_000,
    },
    CatalogueEntry {
        key: "idioms",
        url: "https://raw.githubusercontent.com/g0v/moedict-data-tw/master/idiom.json",
        label: "成語典",
        approx_record_count: 28_000,
    },
];

pub const DEFAULT_SOURCES: &[&str] = &["revised"];

/// Resolves catalogue keys into descriptors, in the given order.
///
/// Weights are split across the selection in proportion to the expected
/// record counts and add up to `PARSE_PROGRESS_SHARE`.
pub fn select_sources<S: AsRef<str>>(keys: &[S]) -> Result<Vec<SourceDescriptor>, ConfigError> {
    let selected = keys
        .iter()
        .map(|key| {
            let key = key.as_ref().trim();
            CATALOGUE
                .iter()
                .find(|entry| entry.key == key)
                .ok_or_else(|| ConfigError::UnknownSource(key.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if selected.is_empty() {
        return Err(ConfigError::NoSources);
    }

    let total: usize = selected.iter().map(|entry| entry.approx_record_count).sum();

    Ok(selected
        .into_iter()
        .map(|entry| SourceDescriptor {
            key: entry.key.to_string(),
            url: entry.url.to_string(),
            label: entry.label.to_string(),
            approx_record_count: entry.approx_record_count,
            progress_weight: PARSE_PROGRESS_SHARE * entry.approx_record_count as f32
                / total.max(1) as f32,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_source_takes_the_whole_parse_share() {
        let sources = select_sources(DEFAULT_SOURCES).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].key, "revised");
        assert!((sources[0].progress_weight - PARSE_PROGRESS_SHARE).abs() < 1e-6);
    }

    #[test]
    fn weights_follow_record_counts_and_keep_order() {
        let sources = select_sources(&["idioms", "revised"]).unwrap();
        let keys: Vec<_> = sources.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["idioms", "revised"]);

        let sum: f32 = sources.iter().map(|s| s.progress_weight).sum();
        assert!((sum - PARSE_PROGRESS_SHARE).abs() < 1e-5);
        assert!(sources[1].progress_weight > sources[0].progress_weight);
    }

    #[test]
    fn unknown_and_empty_selections_are_rejected() {
        assert!(matches!(
            select_sources(&["revised", "nope"]),
            Err(ConfigError::UnknownSource(key)) if key == "nope"
        ));
        assert!(matches!(select_sources::<&str>(&[]), Err(ConfigError::NoSources)));
    }
}
