// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Snapshot validation: find dangling entries before a user does.
//!
//! Loading never rejects a snapshot over these issues. A stale entry only costs
//! the one result that points at it, and ranking already skips those. The report
//! exists for logs and for `cartosearch inspect`.

mod types;

pub use types::*;

use std::collections::HashSet;

use crate::types::IndexSnapshot;

/// Walk every keyword entry and layer, collecting invariant violations.
pub fn validate(snapshot: &IndexSnapshot) -> IndexReport {
    let mut issues = Vec::new();
    let layers = &snapshot.layers;

    let mut seen_ids = HashSet::with_capacity(layers.len());
    for (layer_index, layer) in layers.iter().enumerate() {
        if !seen_ids.insert(layer.id.as_str()) {
            issues.push(InvariantError::DuplicateLayerId {
                layer_index,
                id: layer.id.clone(),
            });
        }
    }

    for (key, entries) in snapshot.keyword_index.iter() {
        if key.trim().is_empty() {
            issues.push(InvariantError::EmptyKeyword);
        }
        for entry in entries {
            match layers.get(entry.layer_index) {
                None => issues.push(InvariantError::LayerOutOfRange {
                    key: key.to_string(),
                    layer_index: entry.layer_index,
                    layer_count: layers.len(),
                }),
                Some(layer) if entry.feature_index >= layer.feature_names.len() => {
                    issues.push(InvariantError::FeatureOutOfRange {
                        key: key.to_string(),
                        layer_index: entry.layer_index,
                        feature_index: entry.feature_index,
                        feature_count: layer.feature_names.len(),
                    })
                }
                Some(_) => {}
            }
        }
    }

    IndexReport {
        keys: snapshot.keyword_index.len(),
        entries: snapshot.keyword_index.entry_count(),
        layers: layers.len(),
        features: layers.iter().map(|l| l.feature_names.len()).sum(),
        issues,
    }
}
