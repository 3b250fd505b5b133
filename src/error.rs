// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the search core.
//!
//! "No results" is never an error. These variants cover the cases where the
//! index itself is missing, unreachable, or pointing at things that don't exist.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    /// No snapshot has been loaded yet, or the last load failed.
    #[error("search index unavailable")]
    IndexUnavailable,

    /// An entry points past the end of the layer table.
    #[error("layer index {layer_index} out of range ({layer_count} layers)")]
    LayerOutOfRange {
        layer_index: usize,
        layer_count: usize,
    },

    /// An entry points past the end of its layer's feature names.
    #[error(
        "feature index {feature_index} out of range for layer {layer_index} ({feature_count} features)"
    )]
    FeatureOutOfRange {
        layer_index: usize,
        feature_index: usize,
        feature_count: usize,
    },

    /// The snapshot could not be fetched.
    #[error("failed to fetch snapshot from {location}: {source}")]
    Transport {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SearchError {
    /// Out-of-range entries: a corrupt snapshot or a stale pointer.
    pub fn is_corrupt_index(&self) -> bool {
        matches!(
            self,
            SearchError::LayerOutOfRange { .. } | SearchError::FeatureOutOfRange { .. }
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            SearchError::IndexUnavailable => "INDEX_UNAVAILABLE",
            SearchError::LayerOutOfRange { .. } | SearchError::FeatureOutOfRange { .. } => {
                "CORRUPT_INDEX"
            }
            SearchError::Transport { .. } => "TRANSPORT_FAILURE",
            SearchError::Json(_) => "JSON_ERROR",
            SearchError::Config(_) => "CONFIG_ERROR",
        }
    }
}
