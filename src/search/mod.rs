// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query evaluation: terms → fuzzy hits → fusion → ranked page.
//!
//! Everything here is synchronous and works on one immutable index generation.
//! The generation is pinned once per query, so a reload mid-query changes
//! nothing for the caller already running; the next query sees the new index.
//!
//! ```text
//! "dam sq"  ──normalize/split──▶  ["dam", "sq"]
//!                                   │      │
//!                               fuzzy::hits (per term, threshold 0.5)
//!                                   │      │
//!                                   ▼      ▼
//!                              merge::merge_all (score products)
//!                                        │
//!                                  rank::rank (limit, group)
//!                                        │
//!                                        ▼
//!                                Vec<RankedResult>
//! ```

pub mod merge;
pub mod rank;

pub use merge::{merge, merge_all};
pub use rank::{group, rank, Ranking};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::fuzzy;
use crate::store::IndexStore;
use crate::types::{IndexSnapshot, LookupResult, RankedResult};
use crate::utils::query_terms;

/// Everything a query produced, including diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub results: Vec<RankedResult>,
    /// Candidates dropped because their entry pointed outside the snapshot.
    pub skipped: usize,
    /// Normalized terms the query was split into.
    pub terms: Vec<String>,
}

/// Offline search over a shared [`IndexStore`].
#[derive(Debug, Clone)]
pub struct OfflineSearch {
    store: Arc<IndexStore>,
    config: SearchConfig,
}

impl Default for OfflineSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl OfflineSearch {
    /// Create a searcher with its own empty store.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_store(Arc::new(IndexStore::new()), config)
    }

    /// Create a searcher over an existing store (shared with an activation binder).
    pub fn with_store(store: Arc<IndexStore>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn load(&self, snapshot: IndexSnapshot) -> u64 {
        self.store.load(snapshot)
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    /// Search with the configured result limit.
    pub fn search_default(&self, query: &str) -> Vec<RankedResult> {
        self.search(query, self.config.result_limit)
    }

    /// Up to `limit` grouped results for `query`. Never fails: no index or no
    /// matches both come back as an empty list.
    pub fn search(&self, query: &str, limit: usize) -> Vec<RankedResult> {
        let outcome = self.search_detailed(query, limit);
        if outcome.skipped > 0 {
            warn!(
                query,
                skipped = outcome.skipped,
                "search results referenced entries outside the index"
            );
        }
        outcome.results
    }

    /// Like [`search`](Self::search), but also reports skipped entries and terms.
    pub fn search_detailed(&self, query: &str, limit: usize) -> SearchOutcome {
        if query.trim().chars().count() < self.config.min_query_len {
            return SearchOutcome::default();
        }

        let Some(index) = self.store.snapshot() else {
            warn!(query, "search requested before the offline index was loaded");
            return SearchOutcome::default();
        };

        let terms = query_terms(query);
        if terms.is_empty() || limit == 0 {
            return SearchOutcome {
                terms,
                ..SearchOutcome::default()
            };
        }

        let per_term: Vec<Vec<LookupResult>> = terms
            .iter()
            .map(|term| fuzzy::hits(index.keywords(), term))
            .collect();
        let hit_counts: Vec<usize> = per_term.iter().map(Vec::len).collect();

        let merged = merge_all(per_term);
        let ranking = rank(&merged, limit, &index);

        debug!(
            query,
            ?hit_counts,
            merged = merged.len(),
            results = ranking.results.len(),
            "offline search"
        );

        SearchOutcome {
            results: ranking.results,
            skipped: ranking.skipped,
            terms,
        }
    }
}
