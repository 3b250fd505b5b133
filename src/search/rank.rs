// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: truncate fused hits, then group them for display.
//!
//! Truncation walks hits best first and takes every entry of a hit before
//! moving to the next one. A single strong keyword with many entries can fill
//! the whole page on its own. That is the intended policy, not round-robin.
//!
//! Grouping then reorders the page by `group >> layer`, groups in order of
//! first appearance, results inside a group in ranked order. The first result
//! of each group carries `first_in_group` so a list view can print a header.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::store::LoadedIndex;
use crate::types::{Entry, LookupResult, RankedResult};

/// A page of results plus the number of candidates that pointed nowhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    pub results: Vec<RankedResult>,
    /// Candidates dropped because their entry failed to resolve.
    pub skipped: usize,
}

fn resolve(index: &LoadedIndex, entry: Entry) -> Result<RankedResult> {
    let layer = index.layer_info(entry.layer_index)?;
    let title = index.feature_name(entry.layer_index, entry.feature_index)?;
    Ok(RankedResult {
        title: title.to_string(),
        layer_title: layer.title.clone(),
        group_title: layer.group_title.clone(),
        entry,
        first_in_group: false,
    })
}

/// Take at most `limit` results from `merged` and group them.
///
/// Unresolvable entries are skipped and do not count against `limit`.
pub fn rank(merged: &[LookupResult], limit: usize, index: &LoadedIndex) -> Ranking {
    let mut page = Vec::with_capacity(limit.min(64));
    let mut skipped = 0;

    'outer: for hit in merged {
        for &entry in &hit.entries {
            if page.len() >= limit {
                break 'outer;
            }
            match resolve(index, entry) {
                Ok(result) => page.push(result),
                Err(e) => {
                    debug!(key = %hit.key, error = %e, "skipping unresolvable entry");
                    skipped += 1;
                }
            }
        }
    }

    Ranking {
        results: group(page),
        skipped,
    }
}

/// Stable partition by `group >> layer`, marking the head of each group.
pub fn group(results: Vec<RankedResult>) -> Vec<RankedResult> {
    let mut order: Vec<Vec<RankedResult>> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for result in results {
        let slot = *slots.entry(result.group_key()).or_insert_with(|| {
            order.push(Vec::new());
            order.len() - 1
        });
        order[slot].push(result);
    }

    order
        .into_iter()
        .flat_map(|members| {
            members.into_iter().enumerate().map(|(i, mut result)| {
                result.first_in_group = i == 0;
                result
            })
        })
        .collect()
}
