//! Approximate search over a small medical vocabulary.

use crate::common::{build_file_index, char_index_with, reopen_file_index, StoreFixture, VOCABULARY};
use simgram::{Match, Measure, Searcher};

fn strings(matches: &[Match]) -> Vec<&str> {
    matches.iter().map(|m| m.string.as_str()).collect()
}

#[test]
fn test_misspelling_finds_the_closest_terms_first() {
    let index = char_index_with(VOCABULARY);
    let mut searcher = Searcher::new(&index, Measure::Cosine);
    let matches = searcher.search("heart atack", 0.6).unwrap();

    // 8 shared trigrams: 8/sqrt(9*10) and 8/sqrt(9*11)
    assert_eq!(strings(&matches), vec!["heart attack", "heart attacks"]);
    assert!((matches[0].similarity - 8.0 / 90f64.sqrt()).abs() < 1e-12);
    assert!((matches[1].similarity - 8.0 / 99f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_jaccard_counts_the_union() {
    let index = char_index_with(VOCABULARY);
    let mut searcher = Searcher::new(&index, Measure::Jaccard);
    // "diabetic" shares 4 of 8 distinct trigrams; "diabetes mellitus" only
    // 6 of 15 and sits outside the size band.
    let matches = searcher.search("diabetes", 0.5).unwrap();
    assert_eq!(strings(&matches), vec!["diabetes", "diabetic"]);
    assert!((matches[1].similarity - 0.5).abs() < 1e-12);
}

#[test]
fn test_overlap_reaches_into_larger_buckets() {
    let index = char_index_with(VOCABULARY);
    let mut searcher = Searcher::new(&index, Measure::Overlap);
    // Every trigram of "diabetes" is in "diabetes mellitus": a tie at 1.0,
    // broken by string order.
    let matches = searcher.search("diabetes", 0.9).unwrap();
    assert_eq!(strings(&matches), vec!["diabetes", "diabetes mellitus"]);
    assert!(matches.iter().all(|m| (m.similarity - 1.0).abs() < 1e-12));
}

#[test]
fn test_results_are_sorted_best_first() {
    let index = char_index_with(VOCABULARY);
    for measure in Measure::ALL {
        let mut searcher = Searcher::new(&index, measure);
        let matches = searcher.search("kidney failure", 0.2).unwrap();
        for pair in matches.windows(2) {
            assert!(
                pair[0].similarity > pair[1].similarity
                    || (pair[0].similarity == pair[1].similarity && pair[0].string < pair[1].string),
                "{measure}: {:?} before {:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn test_lower_threshold_never_loses_matches() {
    let index = char_index_with(VOCABULARY);
    let mut searcher = Searcher::new(&index, Measure::Dice);
    let strict = searcher.search("kidneys", 0.8).unwrap();
    let loose = searcher.search("kidneys", 0.4).unwrap();
    for m in &strict {
        assert!(loose.contains(m), "{m:?} lost at the lower threshold");
    }
    assert!(loose.len() >= strict.len());
}

#[test]
fn test_limit_keeps_the_best() {
    let index = char_index_with(VOCABULARY);
    let mut searcher = Searcher::new(&index, Measure::Cosine);
    let all = searcher.search("heart attack", 0.3).unwrap();
    let top = searcher.search_limit("heart attack", 0.3, 1).unwrap();
    assert_eq!(top, all[..1].to_vec());
    assert_eq!(top[0].string, "heart attack");
}

#[test]
fn test_search_over_reopened_file_index() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, VOCABULARY);
    let file_index = reopen_file_index(&fixture);
    let memory_index = char_index_with(VOCABULARY);

    for measure in Measure::ALL {
        let from_file = Searcher::new(&file_index, measure).search("kidny", 0.4).unwrap();
        let from_memory = Searcher::new(&memory_index, measure).search("kidny", 0.4).unwrap();
        assert_eq!(from_file, from_memory, "{measure}");
    }
}

#[test]
fn test_matches_serialize_for_output() {
    let index = char_index_with(VOCABULARY);
    let mut searcher = Searcher::new(&index, Measure::Exact);
    let matches = searcher.search("kidney", 1.0).unwrap();
    let json = serde_json::to_value(&matches).unwrap();
    assert_eq!(json, serde_json::json!([{ "string": "kidney", "similarity": 1.0 }]));
}
