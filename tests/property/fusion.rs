//! Multi-term fusion properties.

use super::common::approx;
use cartosearch::{merge, merge_all, Entry, LookupResult};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Entries drawn from a small space so lists actually overlap.
fn entry_strategy() -> impl Strategy<Value = Entry> {
    (0usize..3, 0usize..4).prop_map(|(l, f)| Entry::new(l, f))
}

fn hit_strategy() -> impl Strategy<Value = LookupResult> {
    (
        0.5f64..=1.0,
        "[a-z]{2,6}",
        prop::collection::vec(entry_strategy(), 1..4),
    )
        .prop_map(|(score, key, entries)| LookupResult::new(score, key, entries))
}

fn hit_list_strategy() -> impl Strategy<Value = Vec<LookupResult>> {
    prop::collection::vec(hit_strategy(), 0..8)
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_merge_size_is_bounded(a in hit_list_strategy(), b in hit_list_strategy()) {
        let merged = merge(&a, &b);
        let bound: usize = a.iter().map(|r| r.entries.len()).sum::<usize>()
            * b.iter().map(|r| r.entries.len()).sum::<usize>();
        prop_assert!(merged.len() <= bound);
    }

    #[test]
    fn prop_merged_entries_appear_in_both_inputs(a in hit_list_strategy(), b in hit_list_strategy()) {
        for result in merge(&a, &b) {
            prop_assert_eq!(result.entries.len(), 1);
            let entry = result.entries[0];
            prop_assert!(a.iter().any(|r| r.entries.contains(&entry)));
            prop_assert!(b.iter().any(|r| r.entries.contains(&entry)));
        }
    }

    #[test]
    fn prop_merged_score_is_a_product_of_inputs(a in hit_list_strategy(), b in hit_list_strategy()) {
        for result in merge(&a, &b) {
            let found = a.iter().any(|r1| {
                b.iter().any(|r2| approx(r1.score * r2.score, result.score))
            });
            prop_assert!(found);
            prop_assert!(result.score <= 1.0);
        }
    }

    #[test]
    fn prop_merge_is_sorted(a in hit_list_strategy(), b in hit_list_strategy()) {
        let merged = merge(&a, &b);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn prop_single_term_passes_through(a in hit_list_strategy()) {
        prop_assert_eq!(merge_all(vec![a.clone()]), a);
    }

    #[test]
    fn prop_empty_term_list_empties_fusion(a in hit_list_strategy(), b in hit_list_strategy()) {
        prop_assert!(merge_all(vec![a, Vec::new(), b]).is_empty());
    }
}
