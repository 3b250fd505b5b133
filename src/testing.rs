//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides a small canonical snapshot and in-memory fakes for the host
//! collaborators the activation binder talks to.

#![doc(hidden)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::activation::{
    ActivationCallback, FeatureLookup, LayerService, MapService, SubscriptionId,
};
use crate::types::{Entry, IndexSnapshot, KeywordIndex, LayerInfo};

/// Create a layer with the given features.
pub fn make_layer(id: &str, title: &str, group_title: &str, features: &[&str]) -> LayerInfo {
    LayerInfo {
        id: id.to_string(),
        title: title.to_string(),
        group_title: group_title.to_string(),
        feature_names: features.iter().map(|f| f.to_string()).collect(),
    }
}

/// Build a keyword index from `(key, [(layer, feature)])` pairs.
pub fn make_keywords(pairs: &[(&str, &[(usize, usize)])]) -> KeywordIndex {
    pairs
        .iter()
        .map(|(key, entries)| {
            (
                *key,
                entries.iter().map(|&(l, f)| Entry::new(l, f)).collect(),
            )
        })
        .collect()
}

/// Two layers, a handful of Dutch place names.
///
/// Layer 0 `cities`: Rotterdam, Utrecht, Amsterdam.
/// Layer 1 `rivers`: Amstel, Maas.
pub fn sample_snapshot() -> IndexSnapshot {
    IndexSnapshot {
        keyword_index: make_keywords(&[
            ("amsterdam", &[(0, 2)]),
            ("amstel", &[(1, 0)]),
            ("rotterdam", &[(0, 0)]),
            ("utrecht", &[(0, 1)]),
            ("maas", &[(1, 1)]),
        ]),
        layers: vec![
            make_layer("cities", "Cities", "Places", &["Rotterdam", "Utrecht", "Amsterdam"]),
            make_layer("rivers", "Rivers", "Water", &["Amstel", "Maas"]),
        ],
    }
}

type SharedCallback = Arc<dyn Fn() + Send + Sync>;

/// In-memory layer lifecycle that records every interaction.
#[derive(Default)]
pub struct FakeLayers {
    known: HashSet<String>,
    active: Mutex<HashSet<String>>,
    subscriptions: Mutex<Vec<(SubscriptionId, String, SharedCallback)>>,
    next_id: AtomicU64,
    activated: Mutex<Vec<String>>,
    unsubscribed: Mutex<Vec<SubscriptionId>>,
    keep_callbacks: bool,
    fire_on_subscribe: bool,
}

impl FakeLayers {
    pub fn new(layer_ids: &[&str]) -> Self {
        Self {
            known: layer_ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_active(self, layer_id: &str) -> Self {
        self.active.lock().insert(layer_id.to_string());
        self
    }

    /// Keep invoking callbacks after they unsubscribe (a misbehaving event bus).
    pub fn keep_callbacks(mut self) -> Self {
        self.keep_callbacks = true;
        self
    }

    /// Fire the callback from inside `on_activated`, before the id is returned.
    pub fn fire_on_subscribe(mut self) -> Self {
        self.fire_on_subscribe = true;
        self
    }

    /// Mark a layer active and deliver its activation event.
    pub fn emit_activated(&self, layer_id: &str) {
        self.active.lock().insert(layer_id.to_string());
        let callbacks: Vec<SharedCallback> = self
            .subscriptions
            .lock()
            .iter()
            .filter(|(_, layer, _)| layer == layer_id)
            .map(|(_, _, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn activated(&self) -> Vec<String> {
        self.activated.lock().clone()
    }

    pub fn unsubscribed(&self) -> Vec<SubscriptionId> {
        self.unsubscribed.lock().clone()
    }
}

impl LayerService for FakeLayers {
    fn contains_layer(&self, layer_id: &str) -> bool {
        self.known.contains(layer_id)
    }

    fn is_active(&self, layer_id: &str) -> bool {
        self.active.lock().contains(layer_id)
    }

    fn activate(&self, layer_id: &str) {
        self.activated.lock().push(layer_id.to_string());
    }

    fn on_activated(&self, layer_id: &str, callback: ActivationCallback) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let callback: SharedCallback = Arc::from(callback);
        self.subscriptions
            .lock()
            .push((id, layer_id.to_string(), Arc::clone(&callback)));
        if self.fire_on_subscribe {
            callback();
        }
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        self.unsubscribed.lock().push(subscription);
        if !self.keep_callbacks {
            self.subscriptions
                .lock()
                .retain(|(id, _, _)| *id != subscription);
        }
    }
}

/// Features are `(layer_id, feature_index)`. Indices of 1000 and up don't exist.
pub struct FakeFeatures;

pub const MISSING_FEATURE: usize = 1000;

impl FeatureLookup for FakeFeatures {
    type Feature = (String, usize);

    fn find_feature(&self, layer_id: &str, feature_index: usize) -> Option<Self::Feature> {
        (feature_index < MISSING_FEATURE).then(|| (layer_id.to_string(), feature_index))
    }
}

/// Records zoom and selection calls.
#[derive(Default)]
pub struct FakeMap {
    zoomed: Mutex<Vec<(String, usize)>>,
    selected: Mutex<Vec<(String, usize)>>,
}

impl FakeMap {
    pub fn zoomed(&self) -> Vec<(String, usize)> {
        self.zoomed.lock().clone()
    }

    pub fn selected(&self) -> Vec<(String, usize)> {
        self.selected.lock().clone()
    }
}

impl MapService<(String, usize)> for FakeMap {
    fn zoom_to(&self, feature: &(String, usize)) {
        self.zoomed.lock().push(feature.clone());
    }

    fn select_feature(&self, feature: &(String, usize)) {
        self.selected.lock().push(feature.clone());
    }
}
