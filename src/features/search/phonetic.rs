use lazy_static::lazy_static;
use regex::Regex;

use crate::data::models::{EntryWithPronunciations, Pronunciation};

lazy_static! {
    // Unicode-aware, so the ideographic space (U+3000) used between syllables matches too.
    static ref WHITESPACE_RUN_RE: Regex = Regex::new(r"\s+").unwrap();
}

const RISING: char = 'ˊ';
const LOW: char = 'ˇ';
const FALLING: char = 'ˋ';
const NEUTRAL: char = '˙';

pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN_RE.replace_all(text, " ").into_owned()
}

/// Leading whitespace is dropped; a trailing space is kept because it means
/// "this syllable ends here".
pub fn normalize_query(query: &str) -> String {
    normalize_whitespace(query.trim_start())
}

pub fn first_syllable(normalized: &str) -> &str {
    normalized.split(' ').next().unwrap_or_default()
}

/// 1 for first tone (no mark), then rising, low, falling and neutral.
pub fn tone_rank(syllable: &str) -> u8 {
    if syllable.contains(NEUTRAL) {
        5
    } else if syllable.contains(FALLING) {
        4
    } else if syllable.contains(LOW) {
        3
    } else if syllable.contains(RISING) {
        2
    } else {
        1
    }
}

pub fn is_single_syllable(normalized_query: &str) -> bool {
    !normalized_query.trim_end().contains(' ')
}

/// Narrows coarse phonetic candidates down to the pronunciations that
/// actually start with `query`, and ranks single-syllable lookups.
///
/// Entries left without a matching pronunciation are dropped. Multi-syllable
/// queries keep the incoming order.
pub fn refine(query: &str, candidates: Vec<EntryWithPronunciations>) -> Vec<EntryWithPronunciations> {
    let query = normalize_query(query);
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<EntryWithPronunciations> = candidates
        .into_iter()
        .filter_map(|mut candidate| {
            candidate
                .pronunciations
                .retain(|p| pronunciation_matches(p, &query));
            (!candidate.pronunciations.is_empty()).then_some(candidate)
        })
        .collect();

    if is_single_syllable(&query) {
        matches.sort_by_cached_key(rank_key);
    }

    matches
}

fn pronunciation_matches(pronunciation: &Pronunciation, query: &str) -> bool {
    let Some(bopomofo) = pronunciation.bopomofo.as_deref() else {
        return false;
    };

    let mut normalized = normalize_whitespace(bopomofo.trim());
    let exact_syllable = query.ends_with(' ');
    if exact_syllable {
        // The end of the reading is a syllable boundary as well.
        normalized.push(' ');
    }

    if !normalized.starts_with(query) {
        return false;
    }

    // Already implied by the boundary-aware prefix check above.
    !(exact_syllable && overshoots_exact_syllable(first_syllable(&normalized), query))
}

/// A toned syllable exactly one character longer than a space-terminated
/// query is a tone-mark over-match, not the syllable that was asked for.
fn overshoots_exact_syllable(syllable: &str, query: &str) -> bool {
    tone_rank(syllable) != 1 && syllable.chars().count() == query.chars().count() + 1
}

fn rank_key(entry: &EntryWithPronunciations) -> (usize, usize, u8) {
    let reading = entry
        .pronunciations
        .first()
        .and_then(|p| p.bopomofo.as_deref())
        .map(|b| normalize_whitespace(b.trim()))
        .unwrap_or_default();
    let syllable = first_syllable(&reading);

    (
        entry.entry.term.chars().count(),
        syllable.chars().count(),
        tone_rank(syllable),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::Entry;

    fn candidate(id: i32, term: &str, readings: &[&str]) -> EntryWithPronunciations {
        EntryWithPronunciations {
            entry: Entry {
                id,
                term: term.to_string(),
                source: "revised".to_string(),
                radical: None,
                stroke_count: None,
                non_radical_stroke_count: None,
            },
            pronunciations: readings
                .iter()
                .enumerate()
                .map(|(i, b)| Pronunciation {
                    id: id * 10 + i as i32,
                    bopomofo: Some(b.to_string()),
                    pinyin: None,
                    definitions: Vec::new(),
                })
                .collect(),
        }
    }

    fn terms(results: &[EntryWithPronunciations]) -> Vec<&str> {
        results.iter().map(|e| e.entry.term.as_str()).collect()
    }

    #[test]
    fn tone_ranks() {
        assert_eq!(tone_rank("ㄅㄚ"), 1);
        assert_eq!(tone_rank("ㄅㄚˊ"), 2);
        assert_eq!(tone_rank("ㄅㄚˇ"), 3);
        assert_eq!(tone_rank("ㄅㄚˋ"), 4);
        assert_eq!(tone_rank("˙ㄅㄚ"), 5);
    }

    #[test]
    fn whitespace_runs_collapse_to_single_spaces() {
        assert_eq!(normalize_whitespace("ㄏㄨㄛˇ　ㄔㄜ"), "ㄏㄨㄛˇ ㄔㄜ");
        assert_eq!(normalize_whitespace("ㄅ \t\u{3000} ㄆ"), "ㄅ ㄆ");
        assert_eq!(normalize_query("  ㄅ  "), "ㄅ ");
        assert!(is_single_syllable("ㄅ "));
        assert!(!is_single_syllable("ㄅ ㄆ"));
    }

    #[test]
    fn trailing_space_excludes_longer_toned_syllables() {
        let results = refine(
            "ㄅ ",
            vec![
                candidate(1, "筆", &["ㄅㄧˇ"]),
                candidate(2, "ㄅ", &["ㄅ"]),
                candidate(3, "八八", &["ㄅ ㄅ"]),
            ],
        );
        assert_eq!(terms(&results), vec!["ㄅ", "八八"]);
    }

    #[test]
    fn toned_syllable_one_longer_than_an_exact_query_overshoots() {
        // "ㄅ " is two chars; "ㄅㄚˇ" is three and toned.
        assert!(overshoots_exact_syllable("ㄅㄚˇ", "ㄅ "));
        assert!(overshoots_exact_syllable("˙ㄅㄚ", "ㄅ "));
        assert!(!overshoots_exact_syllable("ㄅㄚㄧ", "ㄅ "));
        assert!(!overshoots_exact_syllable("ㄅˇ", "ㄅ "));
        assert!(!overshoots_exact_syllable("ㄅ", "ㄅ "));
    }

    #[test]
    fn without_trailing_space_prefix_matches_longer_syllables() {
        let results = refine("ㄅ", vec![candidate(1, "筆", &["ㄅㄧˇ"]), candidate(2, "ㄅ", &["ㄅ"])]);
        assert_eq!(terms(&results), vec!["ㄅ", "筆"]);
    }

    #[test]
    fn only_matching_pronunciations_survive() {
        let results = refine(
            "ㄏㄤ",
            vec![
                candidate(1, "行", &["ㄒㄧㄥˊ", "ㄏㄤˊ", "ㄒㄧㄥˋ"]),
                candidate(2, "火", &["ㄏㄨㄛˇ"]),
            ],
        );
        assert_eq!(terms(&results), vec!["行"]);
        let readings: Vec<_> = results[0]
            .pronunciations
            .iter()
            .map(|p| p.bopomofo.as_deref().unwrap())
            .collect();
        assert_eq!(readings, vec!["ㄏㄤˊ"]);
    }

    #[test]
    fn single_syllable_results_rank_by_term_length_first() {
        let results = refine(
            "ㄅ",
            vec![
                candidate(1, "八面玲瓏", &["ㄅㄚ ㄇㄧㄢˋ ㄌㄧㄥˊ ㄌㄨㄥˊ"]),
                candidate(2, "爸爸", &["ㄅㄚˋ ˙ㄅㄚ"]),
            ],
        );
        assert_eq!(terms(&results), vec!["爸爸", "八面玲瓏"]);
    }

    #[test]
    fn ties_break_on_syllable_length_then_tone() {
        let results = refine(
            "ㄅㄚ",
            vec![
                candidate(1, "霸", &["ㄅㄚˋ"]),
                candidate(2, "吧", &["˙ㄅㄚ"]),
                candidate(3, "拔", &["ㄅㄚˊ"]),
                candidate(4, "八", &["ㄅㄚ"]),
                candidate(5, "把", &["ㄅㄚˇ"]),
            ],
        );
        // 吧 does not start with ㄅㄚ because the neutral mark leads.
        assert_eq!(terms(&results), vec!["八", "拔", "把", "霸"]);
    }

    #[test]
    fn ordering_is_stable_for_equal_keys() {
        let results = refine(
            "ㄅ",
            vec![candidate(7, "疤", &["ㄅㄚ"]), candidate(3, "巴", &["ㄅㄚ"])],
        );
        assert_eq!(terms(&results), vec!["疤", "巴"]);
    }

    #[test]
    fn multi_syllable_queries_keep_store_order() {
        let results = refine(
            "ㄏㄨㄛˇ　ㄔ",
            vec![
                candidate(1, "火車站", &["ㄏㄨㄛˇ ㄔㄜ ㄓㄢˋ"]),
                candidate(2, "火車", &["ㄏㄨㄛˇ　ㄔㄜ"]),
                candidate(3, "火山", &["ㄏㄨㄛˇ ㄕㄢ"]),
            ],
        );
        assert_eq!(terms(&results), vec!["火車站", "火車"]);
    }

    #[test]
    fn blank_query_and_missing_readings_match_nothing() {
        assert!(refine("   ", vec![candidate(1, "火", &["ㄏㄨㄛˇ"])]).is_empty());

        let mut no_reading = candidate(2, "〇", &["ㄌㄧㄥˊ"]);
        no_reading.pronunciations[0].bopomofo = None;
        assert!(refine("ㄌ", vec![no_reading]).is_empty());
    }
}
