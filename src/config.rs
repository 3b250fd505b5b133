// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search configuration.
//!
//! Only caller-facing knobs live here. The acceptance threshold and the
//! score-product fusion rule are fixed and deliberately absent.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Results returned when the caller doesn't ask for a specific count.
pub const DEFAULT_RESULT_LIMIT: usize = 15;

/// Queries shorter than this (in characters, after trimming) return nothing.
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// Options passed from a config file or the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Maximum number of results (default: 15)
    pub result_limit: usize,
    /// Minimum query length in characters (default: 3)
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: DEFAULT_RESULT_LIMIT,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

impl SearchConfig {
    /// Read a JSON config file. Missing fields fall back to defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SearchError::Transport {
            location: path.display().to_string(),
            source,
        })?;
        let config: SearchConfig = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_query_len == 0 {
            return Err(SearchError::Config(
                "minQueryLen must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
