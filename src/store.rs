// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index store: owns the loaded snapshot and swaps it atomically.
//!
//! The store holds at most one `LoadedIndex` generation behind an `Arc`. A query
//! clones the `Arc` once up front and runs entirely against that generation, so
//! a concurrent `load` can never hand it a mix of old keys and new layers.
//!
//! ```ignore
//! let store = IndexStore::new();
//! assert!(!store.is_ready());
//!
//! store.load_from(&FileSource::new("public/data"), "projects/city/offline_search_result.json")?;
//! let index = store.current()?;
//! let name = index.feature_name(0, 2)?;
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::{Result, SearchError};
use crate::types::{IndexSnapshot, KeywordIndex, LayerInfo};
use crate::utils::normalize;
use crate::verify;

/// File the indexer writes next to each project definition.
pub const SNAPSHOT_FILE_NAME: &str = "offline_search_result.json";

const PROJECT_FILE_NAME: &str = "project.json";

// =============================================================================
// LOADED INDEX (one immutable generation)
// =============================================================================

/// One immutable, fully normalized snapshot generation.
#[derive(Debug, Default)]
pub struct LoadedIndex {
    keywords: KeywordIndex,
    layers: Vec<LayerInfo>,
    layer_ids: HashMap<String, usize>,
}

impl LoadedIndex {
    /// Normalize keys and build the layer-id lookup.
    ///
    /// Keys that collapse to the same normalized form are merged; the merged
    /// key keeps the position of its first occurrence.
    pub fn from_snapshot(snapshot: IndexSnapshot) -> Self {
        let keywords = snapshot
            .keyword_index
            .iter()
            .map(|(key, entries)| (normalize(key), entries.to_vec()))
            .collect();

        let mut layer_ids = HashMap::with_capacity(snapshot.layers.len());
        for (i, layer) in snapshot.layers.iter().enumerate() {
            layer_ids.entry(layer.id.clone()).or_insert(i);
        }

        Self {
            keywords,
            layers: snapshot.layers,
            layer_ids,
        }
    }

    pub fn keywords(&self) -> &KeywordIndex {
        &self.keywords
    }

    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }

    pub fn layer_info(&self, layer_index: usize) -> Result<&LayerInfo> {
        self.layers
            .get(layer_index)
            .ok_or(SearchError::LayerOutOfRange {
                layer_index,
                layer_count: self.layers.len(),
            })
    }

    pub fn feature_name(&self, layer_index: usize, feature_index: usize) -> Result<&str> {
        let layer = self.layer_info(layer_index)?;
        layer
            .feature_names
            .get(feature_index)
            .map(String::as_str)
            .ok_or(SearchError::FeatureOutOfRange {
                layer_index,
                feature_index,
                feature_count: layer.feature_names.len(),
            })
    }

    /// Look a layer up by id. First occurrence wins on duplicate ids.
    pub fn find_layer(&self, layer_id: &str) -> Option<(usize, &LayerInfo)> {
        self.layer_ids
            .get(layer_id)
            .map(|&i| (i, &self.layers[i]))
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Shared holder of the current index generation.
///
/// Created empty (not ready). Becomes ready on the first successful `load`.
#[derive(Debug, Default)]
pub struct IndexStore {
    current: RwLock<Option<Arc<LoadedIndex>>>,
    generation: AtomicU64,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current generation. Returns the new generation number.
    pub fn load(&self, snapshot: IndexSnapshot) -> u64 {
        let report = verify::validate(&snapshot);
        if !report.is_clean() {
            warn!(
                issues = report.issues.len(),
                "snapshot has dangling or malformed entries; affected results will be skipped"
            );
        }

        let loaded = Arc::new(LoadedIndex::from_snapshot(snapshot));
        let keys = loaded.keywords().len();
        let layers = loaded.layers().len();

        *self.current.write() = Some(loaded);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        info!(keys, layers, generation, "offline search index loaded");
        generation
    }

    /// Parse and load a JSON snapshot.
    ///
    /// A parse failure leaves the previous generation (or not-ready) in place.
    pub fn load_json(&self, bytes: &[u8]) -> Result<u64> {
        let snapshot = IndexSnapshot::from_json(bytes)?;
        Ok(self.load(snapshot))
    }

    /// Fetch a snapshot through `source` and load it.
    pub fn load_from<S: SnapshotSource + ?Sized>(&self, source: &S, location: &str) -> Result<u64> {
        match source.load_snapshot(location) {
            Ok(snapshot) => Ok(self.load(snapshot)),
            Err(e) => {
                warn!(location, error = %e, "offline search unavailable");
                Err(e)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Number of successful loads since creation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The current generation, if any.
    pub fn snapshot(&self) -> Option<Arc<LoadedIndex>> {
        self.current.read().clone()
    }

    pub fn current(&self) -> Result<Arc<LoadedIndex>> {
        self.snapshot().ok_or(SearchError::IndexUnavailable)
    }

    pub fn layer_info(&self, layer_index: usize) -> Result<LayerInfo> {
        self.current()?.layer_info(layer_index).cloned()
    }

    pub fn feature_name(&self, layer_index: usize, feature_index: usize) -> Result<String> {
        self.current()?
            .feature_name(layer_index, feature_index)
            .map(str::to_string)
    }

    /// Drop the current generation (e.g. when switching projects).
    pub fn reset(&self) {
        *self.current.write() = None;
    }
}

// =============================================================================
// SNAPSHOT TRANSPORT
// =============================================================================

/// Where snapshots come from. Implemented by the host's transport.
pub trait SnapshotSource {
    fn load_snapshot(&self, location: &str) -> Result<IndexSnapshot>;
}

/// Reads snapshots from the local filesystem, relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SnapshotSource for FileSource {
    fn load_snapshot(&self, location: &str) -> Result<IndexSnapshot> {
        let path = self.root.join(location);
        let bytes = fs::read(&path).map_err(|source| SearchError::Transport {
            location: path.display().to_string(),
            source,
        })?;
        Ok(IndexSnapshot::from_json(&bytes)?)
    }
}

/// The snapshot lives next to the project file.
///
/// `maps/city/project.json` → `maps/city/offline_search_result.json`. A URL that
/// doesn't end in `project.json` is treated as the project directory.
pub fn snapshot_location(project_url: &str) -> String {
    match project_url.strip_suffix(PROJECT_FILE_NAME) {
        Some(dir) => format!("{}{}", dir, SNAPSHOT_FILE_NAME),
        None if project_url.is_empty() || project_url.ends_with('/') => {
            format!("{}{}", project_url, SNAPSHOT_FILE_NAME)
        }
        None => format!("{}/{}", project_url, SNAPSHOT_FILE_NAME),
    }
}
