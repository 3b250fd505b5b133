// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy matching: score one query term against every keyword.
//!
//! Two signals, take the better one. Abbreviation scoring rewards typing the
//! start of a word ("amst" → "amsterdam"). Edit similarity forgives typos
//! ("amsterdan" → "amsterdam"). Anything under `ACCEPT_THRESHOLD` is dropped.

mod levenshtein;
mod similarity;

pub use levenshtein::*;
pub use similarity::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::types::{Entry, KeywordIndex, LookupResult};
use crate::utils::sort_by_score_desc;

/// Hits scoring below this are never kept. Fixed, not a tuning knob.
pub const ACCEPT_THRESHOLD: f64 = 0.5;

fn scored_hit(term: &str, (key, entries): &(String, Vec<Entry>)) -> Option<LookupResult> {
    let s = score(term, key);
    (s >= ACCEPT_THRESHOLD).then(|| LookupResult::new(s, key.clone(), entries.clone()))
}

/// Every keyword that matches `term`, best first.
///
/// `term` is expected to be normalized already (see [`crate::normalize`]).
/// Equal scores keep keyword order from the snapshot.
pub fn hits(keywords: &KeywordIndex, term: &str) -> Vec<LookupResult> {
    #[cfg(feature = "parallel")]
    let mut results: Vec<LookupResult> = keywords
        .as_slice()
        .par_iter()
        .filter_map(|pair| scored_hit(term, pair))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let mut results: Vec<LookupResult> = keywords
        .as_slice()
        .iter()
        .filter_map(|pair| scored_hit(term, pair))
        .collect();

    sort_by_score_desc(&mut results);
    results
}
