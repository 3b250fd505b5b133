//! End-to-end query behavior over small hand-built snapshots.

use super::common::{
    amst_snapshot, approx, city_snapshot, hit, loaded_index, loaded_search, sample_snapshot,
};
use cartosearch::testing::{make_keywords, make_layer};
use cartosearch::{merge_all, rank, IndexSnapshot, OfflineSearch, SearchConfig};

// ============================================================================
// SINGLE TERM
// ============================================================================

#[test]
fn test_prefix_hits_both_keys_for_same_feature() {
    let search = loaded_search(amst_snapshot());

    let results = search.search("amst", 15);

    assert_eq!(results.len(), 2, "amsterdam and amstel both clear the threshold");
    for result in &results {
        assert_eq!(result.title, "Amsterdam");
        assert_eq!(result.layer_title, "Cities");
        assert_eq!(result.group_title, "Places");
    }
    assert!(results[0].first_in_group);
    assert!(!results[1].first_in_group);
}

#[test]
fn test_query_below_min_length_returns_nothing() {
    let search = loaded_search(amst_snapshot());

    assert!(search.search("am", 15).is_empty());
    assert!(search.search("", 15).is_empty());
    assert!(search.search("   a  ", 15).is_empty());
}

#[test]
fn test_min_query_len_is_configurable() {
    let search = OfflineSearch::new(SearchConfig {
        min_query_len: 2,
        ..SearchConfig::default()
    });
    search.load(amst_snapshot());

    assert!(!search.search("am", 15).is_empty());
}

#[test]
fn test_case_does_not_matter() {
    let search = loaded_search(sample_snapshot());

    let upper = search.search("AMSTERDAM", 15);
    let lower = search.search("amsterdam", 15);

    assert_eq!(upper, lower);
    assert_eq!(upper[0].title, "Amsterdam");
}

#[test]
#[cfg(feature = "unicode-normalization")]
fn test_diacritics_are_folded() {
    let search = loaded_search(sample_snapshot());

    let results = search.search("Ámsterdam", 15);

    assert_eq!(results[0].title, "Amsterdam");
}

#[test]
fn test_transposed_letters_still_match() {
    let search = loaded_search(sample_snapshot());

    let results = search.search("amsterdma", 15);

    assert!(!results.is_empty());
    assert_eq!(results[0].title, "Amsterdam");
}

#[test]
fn test_unrelated_query_returns_nothing() {
    let search = loaded_search(sample_snapshot());
    assert!(search.search("xyzzy", 15).is_empty());
}

#[test]
fn test_search_before_load_returns_nothing() {
    let search = OfflineSearch::default();
    assert!(search.search("amsterdam", 15).is_empty());
}

// ============================================================================
// MULTI TERM
// ============================================================================

#[test]
fn test_two_terms_intersect_on_feature() {
    let search = loaded_search(city_snapshot());

    let results = search.search("dam squ", 15);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Dam Square");
    assert_eq!(results[0].full_title(), "Amsterdam >> Landmarks >> Dam Square");
}

#[test]
fn test_short_term_inside_long_query_is_kept() {
    let search = loaded_search(city_snapshot());

    let results = search.search("dam sq", 15);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Dam Square");
}

#[test]
fn test_extra_whitespace_is_ignored() {
    let search = loaded_search(city_snapshot());

    let tidy = search.search_detailed("dam squ", 15);
    let messy = search.search_detailed("  Dam    squ ", 15);

    assert_eq!(messy.terms, vec!["dam", "squ"]);
    assert_eq!(tidy.results, messy.results);
}

#[test]
fn test_terms_without_shared_feature_return_nothing() {
    let search = loaded_search(sample_snapshot());
    assert!(search.search("rotterdam utrecht", 15).is_empty());
}

#[test]
fn test_merge_keeps_only_shared_entry_with_product_score() {
    // "re" and "de" share only (0,1)
    let re = vec![hit(0.6, "re", &[(0, 1)]), hit(0.5, "rem", &[(0, 2)])];
    let de = vec![hit(0.9, "de", &[(0, 1)]), hit(0.7, "den", &[(0, 3)])];

    let merged = merge_all(vec![re, de]);

    assert_eq!(merged.len(), 1);
    assert!(approx(merged[0].score, 0.54));
    assert_eq!(merged[0].entries.len(), 1);
    assert_eq!(merged[0].entries[0].feature_index, 1);

    let index = loaded_index(city_snapshot());
    let ranking = rank(&merged, 15, &index);
    assert_eq!(ranking.results.len(), 1);
    assert_eq!(ranking.results[0].title, "Rembrandtplein");
    assert!(ranking.results[0].first_in_group);
}

// ============================================================================
// LIMITS AND DIAGNOSTICS
// ============================================================================

#[test]
fn test_limit_one_takes_best_hit_only() {
    let merged = vec![
        hit(0.9, "park", &[(1, 0), (1, 1)]),
        hit(0.8, "dam", &[(0, 0), (0, 3)]),
    ];
    let index = loaded_index(city_snapshot());

    let ranking = rank(&merged, 1, &index);

    assert_eq!(ranking.results.len(), 1);
    assert_eq!(ranking.results[0].title, "Vondelpark");
}

#[test]
fn test_limit_applies_to_entries_within_a_hit() {
    let search = loaded_search(city_snapshot());

    assert_eq!(search.search("park", 15).len(), 2);
    let limited = search.search("park", 1);
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].title, "Vondelpark");
}

#[test]
fn test_zero_limit_returns_nothing() {
    let search = loaded_search(city_snapshot());
    assert!(search.search("park", 0).is_empty());
}

#[test]
fn test_default_limit_comes_from_config() {
    let search = OfflineSearch::new(SearchConfig {
        result_limit: 1,
        ..SearchConfig::default()
    });
    search.load(city_snapshot());

    assert_eq!(search.search_default("park").len(), 1);
}

#[test]
fn test_dangling_entries_are_skipped_without_using_limit() {
    let snapshot = IndexSnapshot {
        keyword_index: make_keywords(&[("harbor", &[(0, 9)]), ("harbour", &[(0, 0)])]),
        layers: vec![make_layer("ports", "Ports", "Water", &["Harbour"])],
    };
    let search = loaded_search(snapshot);

    let outcome = search.search_detailed("harbo", 1);

    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].title, "Harbour");
}

#[test]
fn test_repeated_queries_are_identical() {
    let search = loaded_search(city_snapshot());

    let first = search.search_detailed("park", 15);
    let second = search.search_detailed("park", 15);

    assert_eq!(first, second);
}
