// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// A snapshot invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// Entry under `key` points past the layer table.
    LayerOutOfRange {
        key: String,
        layer_index: usize,
        layer_count: usize,
    },
    /// Entry under `key` points past its layer's feature names.
    FeatureOutOfRange {
        key: String,
        layer_index: usize,
        feature_index: usize,
        feature_count: usize,
    },
    /// Two layers share an id; lookups by id resolve to the first.
    DuplicateLayerId { layer_index: usize, id: String },
    /// A keyword that is empty or whitespace only.
    EmptyKeyword,
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::LayerOutOfRange {
                key,
                layer_index,
                layer_count,
            } => {
                write!(
                    f,
                    "'{}': layer_index {} >= layers.len() {}",
                    key, layer_index, layer_count
                )
            }
            InvariantError::FeatureOutOfRange {
                key,
                layer_index,
                feature_index,
                feature_count,
            } => {
                write!(
                    f,
                    "'{}': feature_index {} >= layers[{}].feature_names.len() {}",
                    key, feature_index, layer_index, feature_count
                )
            }
            InvariantError::DuplicateLayerId { layer_index, id } => {
                write!(f, "layers[{}] repeats id '{}'", layer_index, id)
            }
            InvariantError::EmptyKeyword => write!(f, "empty keyword"),
        }
    }
}

impl std::error::Error for InvariantError {}

/// Summary of a snapshot's shape plus every invariant violation found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub keys: usize,
    pub entries: usize,
    pub layers: usize,
    pub features: usize,
    pub issues: Vec<InvariantError>,
}

impl IndexReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Entries that no accessor can resolve.
    pub fn dangling_entries(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| {
                matches!(
                    issue,
                    InvariantError::LayerOutOfRange { .. } | InvariantError::FeatureOutOfRange { .. }
                )
            })
            .count()
    }
}
