// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Offline fuzzy search over map layer keyword snapshots.
//!
//! A dashboard ships a precomputed keyword index next to each project: every
//! keyword maps to the features (by layer and position) it occurs in. This crate
//! answers free-text queries against that snapshot entirely in memory, then
//! turns a picked result into a map selection, loading the owning layer first
//! if it isn't on the map yet.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  store.rs   │────▶│  fuzzy/      │────▶│ search/      │────▶│ search/     │
//! │ (IndexStore,│     │ (score, hits)│     │ merge.rs     │     │ rank.rs     │
//! │ LoadedIndex)│     │              │     │ (merge_all)  │     │ (rank,group)│
//! └─────────────┘     └──────────────┘     └──────────────┘     └─────────────┘
//!        │                                                             │
//!        ▼                                                             ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 activation.rs (ActivationBinder, deferred select)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use cartosearch::{OfflineSearch, SearchConfig, FileSource, snapshot_location};
//!
//! let search = OfflineSearch::new(SearchConfig::default());
//! search.store().load_from(&FileSource::new("public"), &snapshot_location("maps/city/project.json"))?;
//!
//! for result in search.search("dam sq", 15) {
//!     if result.first_in_group {
//!         println!("{} >> {}", result.group_title, result.layer_title);
//!     }
//!     println!("  {}", result);
//! }
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod search;
pub mod store;
pub mod testing;
mod types;
mod utils;
pub mod verify;

// Re-exports for public API
pub use activation::{
    ActivationBinder, ActivationCallback, ActivationHandle, ActivationState, FeatureLookup,
    LayerService, MapService, SelectOutcome, SubscriptionId,
};
pub use config::{SearchConfig, DEFAULT_MIN_QUERY_LEN, DEFAULT_RESULT_LIMIT};
pub use error::{Result, SearchError};
pub use fuzzy::{abbreviation_score, edit_similarity, hits, levenshtein_bounded, score, ACCEPT_THRESHOLD};
pub use search::{group, merge, merge_all, rank, OfflineSearch, Ranking, SearchOutcome};
pub use store::{snapshot_location, FileSource, IndexStore, LoadedIndex, SnapshotSource, SNAPSHOT_FILE_NAME};
pub use types::{Entry, IndexSnapshot, KeywordIndex, LayerInfo, LookupResult, RankedResult};
pub use utils::{normalize, query_terms};
pub use verify::{validate, IndexReport, InvariantError};
