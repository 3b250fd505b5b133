// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of an offline search snapshot.
//!
//! A snapshot is produced by an external indexer: every searchable keyword maps
//! to the features it occurs in, and each feature is addressed positionally as
//! `(layer_index, feature_index)`. Nothing here is mutated after load.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Entry**: `layer_index < layers.len() ∧ feature_index < layers[layer_index].feature_names.len()`
//!   A dangling entry is a corrupt snapshot or a stale pointer. The accessors on
//!   `LoadedIndex` refuse it instead of panicking.
//!
//! - **LookupResult**: `0 ≤ score ≤ 1`. Single-term hits additionally satisfy
//!   `score ≥ ACCEPT_THRESHOLD`.
//!
//! - **KeywordIndex**: keys are unique and keep snapshot order. Tie-breaking in
//!   the matcher depends on that order, so it is preserved through serde.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// ENTRIES AND LAYERS
// =============================================================================

/// Pointer to one feature within one layer, by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub layer_index: usize,
    pub feature_index: usize,
}

impl Entry {
    #[inline]
    pub fn new(layer_index: usize, feature_index: usize) -> Self {
        Self {
            layer_index,
            feature_index,
        }
    }

    /// Do both entries address the same feature?
    #[inline]
    pub fn same_target(&self, other: &Entry) -> bool {
        self.layer_index == other.layer_index && self.feature_index == other.feature_index
    }
}

/// Display metadata for one map layer.
///
/// `feature_names[feature_index]` is the title shown for an [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub group_title: String,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

// =============================================================================
// KEYWORD INDEX
// =============================================================================

/// Keyword → entries mapping in snapshot order.
///
/// Pairs are kept in snapshot order because the matcher walks every key and
/// uses iteration order as the tie-breaker for equal scores. The position map
/// only serves point lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    keys: Vec<(String, Vec<Entry>)>,
    positions: HashMap<String, usize>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keyword, concatenating entries if the key is already present.
    pub fn insert(&mut self, key: String, entries: Vec<Entry>) {
        match self.positions.get(&key) {
            Some(&pos) => self.keys[pos].1.extend(entries),
            None => {
                self.positions.insert(key.clone(), self.keys.len());
                self.keys.push((key, entries));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Entry]> {
        self.positions
            .get(key)
            .map(|&pos| self.keys[pos].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.keys
            .iter()
            .map(|(key, entries)| (key.as_str(), entries.as_slice()))
    }

    pub(crate) fn as_slice(&self) -> &[(String, Vec<Entry>)] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Total number of entries across all keywords.
    pub fn entry_count(&self) -> usize {
        self.keys.iter().map(|(_, entries)| entries.len()).sum()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Entry>)> for KeywordIndex {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Entry>)>>(iter: I) -> Self {
        let mut index = KeywordIndex::new();
        for (key, entries) in iter {
            index.insert(key.into(), entries);
        }
        index
    }
}

impl Serialize for KeywordIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, entries) in &self.keys {
            map.serialize_entry(key, entries)?;
        }
        map.end()
    }
}

struct KeywordIndexVisitor;

impl<'de> Visitor<'de> for KeywordIndexVisitor {
    type Value = KeywordIndex;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from keyword to a list of entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let capacity = access.size_hint().unwrap_or(0);
        let mut index = KeywordIndex {
            keys: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        };
        while let Some((key, entries)) = access.next_entry::<String, Vec<Entry>>()? {
            index.insert(key, entries);
        }
        Ok(index)
    }
}

impl<'de> Deserialize<'de> for KeywordIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(KeywordIndexVisitor)
    }
}

/// The serialized snapshot as produced by the indexer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSnapshot {
    pub keyword_index: KeywordIndex,
    pub layers: Vec<LayerInfo>,
}

impl IndexSnapshot {
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

// =============================================================================
// QUERY-SCOPED RESULTS
// =============================================================================

/// One scored keyword hit (or a fused multi-term hit).
///
/// Transient: produced per query and dropped after ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResult {
    pub score: f64,
    pub key: String,
    pub entries: Vec<Entry>,
}

impl LookupResult {
    pub fn new(score: f64, key: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            score,
            key: key.into(),
            entries,
        }
    }
}

/// What the caller sees for one search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub title: String,
    pub layer_title: String,
    pub group_title: String,
    pub entry: Entry,
    pub first_in_group: bool,
}

impl RankedResult {
    /// Grouping key: `group >> layer`.
    pub fn group_key(&self) -> String {
        format!("{} >> {}", self.group_title, self.layer_title)
    }

    /// Breadcrumb shown in result lists: `group >> layer >> title`.
    pub fn full_title(&self) -> String {
        format!("{} >> {} >> {}", self.group_title, self.layer_title, self.title)
    }
}

impl fmt::Display for RankedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
