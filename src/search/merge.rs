// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Multi-term fusion: keep only features every term points at.
//!
//! Two hit lists combine pairwise. Whenever an entry under a hit from the left
//! list addresses the same feature as an entry under a hit from the right list,
//! that feature survives with the product of both scores. Products of values in
//! `[0, 1]` never exceed either factor, so adding a term can only lower a score.
//!
//! Cost is `O(|a|·|b|·entries²)` in the worst case. Per-term lists are already
//! pruned by the acceptance threshold, which keeps this small in practice.

use crate::types::LookupResult;
use crate::utils::sort_by_score_desc;

/// Fuse two hit lists. Output is sorted best first (stable).
pub fn merge(a: &[LookupResult], b: &[LookupResult]) -> Vec<LookupResult> {
    let mut merged = Vec::new();
    for r1 in a {
        for r2 in b {
            for e1 in &r1.entries {
                for e2 in &r2.entries {
                    if e1.same_target(e2) {
                        merged.push(LookupResult {
                            score: r1.score * r2.score,
                            key: format!("{} {}", r1.key, r2.key),
                            entries: vec![*e1],
                        });
                    }
                }
            }
        }
    }
    sort_by_score_desc(&mut merged);
    merged
}

/// Left fold of [`merge`] over per-term hit lists.
///
/// A single list is returned untouched; no lists means no results.
pub fn merge_all(per_term: Vec<Vec<LookupResult>>) -> Vec<LookupResult> {
    let mut lists = per_term.into_iter();
    let Some(first) = lists.next() else {
        return Vec::new();
    };
    lists.fold(first, |acc, next| merge(&acc, &next))
}
