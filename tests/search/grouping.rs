//! Grouping of ranked results under `group >> layer` headers.

use super::common::{hit, loaded_index};
use cartosearch::testing::make_layer;
use cartosearch::{group, rank, IndexSnapshot, KeywordIndex};

fn three_layers() -> IndexSnapshot {
    IndexSnapshot {
        keyword_index: KeywordIndex::new(),
        layers: vec![
            make_layer("schools", "Schools", "Education", &["Erasmus", "Montessori"]),
            make_layer("hospitals", "Hospitals", "Health", &["OLVG", "AMC"]),
            make_layer("clinics", "Clinics", "Health", &["Huisarts"]),
        ],
    }
}

#[test]
fn test_groups_ordered_by_first_appearance() {
    let index = loaded_index(three_layers());
    let merged = vec![
        hit(0.9, "olvg", &[(1, 0)]),
        hit(0.8, "erasmus", &[(0, 0)]),
        hit(0.7, "amc", &[(1, 1)]),
    ];

    let results = rank(&merged, 15, &index).results;

    let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["OLVG", "AMC", "Erasmus"]);
    let firsts: Vec<_> = results.iter().map(|r| r.first_in_group).collect();
    assert_eq!(firsts, vec![true, false, true]);
}

#[test]
fn test_same_group_title_different_layers_are_separate_groups() {
    let index = loaded_index(three_layers());
    let merged = vec![
        hit(0.9, "huisarts", &[(2, 0)]),
        hit(0.8, "olvg", &[(1, 0)]),
    ];

    let results = rank(&merged, 15, &index).results;

    assert_eq!(results[0].group_key(), "Health >> Clinics");
    assert_eq!(results[1].group_key(), "Health >> Hospitals");
    assert!(results.iter().all(|r| r.first_in_group));
}

#[test]
fn test_exactly_one_header_per_group() {
    let index = loaded_index(three_layers());
    let merged = vec![
        hit(0.9, "a", &[(0, 0), (1, 0)]),
        hit(0.8, "b", &[(0, 1), (1, 1)]),
        hit(0.7, "c", &[(2, 0)]),
    ];

    let results = rank(&merged, 15, &index).results;

    let headers: Vec<_> = results
        .iter()
        .filter(|r| r.first_in_group)
        .map(|r| r.group_key())
        .collect();
    assert_eq!(
        headers,
        vec![
            "Education >> Schools",
            "Health >> Hospitals",
            "Health >> Clinics"
        ]
    );
}

#[test]
fn test_group_resets_stale_flags() {
    let index = loaded_index(three_layers());
    let mut results = rank(&[hit(0.9, "a", &[(0, 0), (0, 1)])], 15, &index).results;
    for result in &mut results {
        result.first_in_group = true;
    }

    let regrouped = group(results);

    assert!(regrouped[0].first_in_group);
    assert!(!regrouped[1].first_in_group);
}
