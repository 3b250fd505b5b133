// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Deferred activation: select a result whose layer may not be loaded yet.
//!
//! A search result points at a feature by `(layer, index)`. If that layer is
//! already on the map, selection is immediate. If not, we ask the host to
//! activate it and subscribe to its activation event; the feature is selected
//! when the event arrives, and the subscription is dropped right after.
//!
//! ```text
//!   select(result)
//!        │
//!        ├── layer gone ──────────────────▶ Unresolved  (no-op)
//!        │
//!        ├── layer active ── select ──────▶ Selected
//!        │
//!        └── layer inactive ── subscribe + activate
//!                               │
//!                               ▼
//!                          Activating ──── event ────▶ Selected
//!                               │
//!                               └──── cancel() ──────▶ Cancelled
//! ```
//!
//! The state lives in one atomic shared by the observer and the returned
//! [`ActivationHandle`]. Only one transition out of `Activating` can win, so an
//! event delivered twice, or racing a cancel, selects at most once. The
//! subscription is released exactly once whichever side wins, including when
//! the host fires the event synchronously inside `on_activated`.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::store::IndexStore;
use crate::types::RankedResult;

/// Host-assigned id for an activation subscription.
pub type SubscriptionId = u64;

/// Observer invoked when a layer reports it has been activated.
pub type ActivationCallback = Box<dyn Fn() + Send + Sync>;

/// The host's layer lifecycle.
pub trait LayerService: Send + Sync {
    /// Is the layer part of the current project?
    fn contains_layer(&self, layer_id: &str) -> bool;

    fn is_active(&self, layer_id: &str) -> bool;

    /// Start loading the layer. Completion is reported through `on_activated`.
    fn activate(&self, layer_id: &str);

    /// Subscribe to activation events for one layer.
    fn on_activated(&self, layer_id: &str, callback: ActivationCallback) -> SubscriptionId;

    fn unsubscribe(&self, subscription: SubscriptionId);
}

/// Resolves positional feature references to the host's feature objects.
pub trait FeatureLookup: Send + Sync {
    type Feature;

    fn find_feature(&self, layer_id: &str, feature_index: usize) -> Option<Self::Feature>;
}

/// The host's map and selection surface.
pub trait MapService<F>: Send + Sync {
    fn zoom_to(&self, feature: &F);
    fn select_feature(&self, feature: &F);
}

/// What `select` did with a result.
#[derive(Debug)]
pub enum SelectOutcome {
    /// The layer no longer exists (or the entry is stale). Nothing happened.
    Unresolved,
    /// The layer was active; the feature was selected immediately.
    Selected,
    /// The layer is being activated; selection happens when it reports in.
    Deferred(ActivationHandle),
}

impl SelectOutcome {
    pub fn handle(&self) -> Option<&ActivationHandle> {
        match self {
            SelectOutcome::Deferred(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Lifecycle of a deferred selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    Activating,
    Selected,
    Cancelled,
}

const ACTIVATING: u8 = 0;
const SELECTED: u8 = 1;
const CANCELLED: u8 = 2;

/// State shared by the observer closure and the caller's handle.
struct Pending {
    state: AtomicU8,
    subscription: Mutex<Option<SubscriptionId>>,
    layers: Arc<dyn LayerService>,
}

impl Pending {
    fn new(layers: Arc<dyn LayerService>) -> Self {
        Self {
            state: AtomicU8::new(ACTIVATING),
            subscription: Mutex::new(None),
            layers,
        }
    }

    /// Try to leave `Activating`. Exactly one caller ever gets `true`.
    fn settle(&self, to: u8) -> bool {
        self.state
            .compare_exchange(ACTIVATING, to, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn state(&self) -> ActivationState {
        match self.state.load(Ordering::SeqCst) {
            ACTIVATING => ActivationState::Activating,
            SELECTED => ActivationState::Selected,
            _ => ActivationState::Cancelled,
        }
    }

    /// Record the subscription id. If the state already settled (the event
    /// fired during registration), release it immediately.
    fn attach(&self, subscription: SubscriptionId) {
        *self.subscription.lock() = Some(subscription);
        if self.state.load(Ordering::SeqCst) != ACTIVATING {
            self.release();
        }
    }

    fn release(&self) {
        let subscription = self.subscription.lock().take();
        if let Some(id) = subscription {
            self.layers.unsubscribe(id);
        }
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("state", &self.state())
            .field("subscription", &*self.subscription.lock())
            .finish()
    }
}

/// Caller-side handle for a deferred selection.
///
/// Dropping the handle does not cancel: the observer stays registered until
/// the layer reports in or `cancel` is called.
#[derive(Debug, Clone)]
pub struct ActivationHandle {
    pending: Arc<Pending>,
}

impl ActivationHandle {
    pub fn state(&self) -> ActivationState {
        self.pending.state()
    }

    pub fn is_pending(&self) -> bool {
        self.state() == ActivationState::Activating
    }

    /// Abandon the selection and release the subscription.
    ///
    /// Returns `false` if the selection already happened or was already cancelled.
    pub fn cancel(&self) -> bool {
        if self.pending.settle(CANCELLED) {
            self.pending.release();
            true
        } else {
            false
        }
    }
}

fn select_feature<F, M>(features: &F, map: &M, layer_id: &str, feature_index: usize)
where
    F: FeatureLookup + ?Sized,
    M: MapService<F::Feature> + ?Sized,
{
    match features.find_feature(layer_id, feature_index) {
        Some(feature) => {
            map.zoom_to(&feature);
            map.select_feature(&feature);
        }
        None => debug!(layer_id, feature_index, "feature not found on activated layer"),
    }
}

/// Turns a selected search result into a map selection.
pub struct ActivationBinder<L, F, M> {
    store: Arc<IndexStore>,
    layers: Arc<L>,
    features: Arc<F>,
    map: Arc<M>,
}

impl<L, F, M> ActivationBinder<L, F, M>
where
    L: LayerService + 'static,
    F: FeatureLookup + 'static,
    M: MapService<F::Feature> + 'static,
{
    pub fn new(store: Arc<IndexStore>, layers: Arc<L>, features: Arc<F>, map: Arc<M>) -> Self {
        Self {
            store,
            layers,
            features,
            map,
        }
    }

    /// Select the feature behind `result`, activating its layer first if needed.
    pub fn select(&self, result: &RankedResult) -> SelectOutcome {
        let entry = result.entry;
        let layer_id = match self.store.layer_info(entry.layer_index) {
            Ok(layer) => layer.id,
            Err(e) => {
                debug!(error = %e, "selected result no longer resolves to a layer");
                return SelectOutcome::Unresolved;
            }
        };

        if !self.layers.contains_layer(&layer_id) {
            debug!(layer_id = %layer_id, "layer removed from project since the index was built");
            return SelectOutcome::Unresolved;
        }

        if self.layers.is_active(&layer_id) {
            select_feature(&*self.features, &*self.map, &layer_id, entry.feature_index);
            return SelectOutcome::Selected;
        }

        let pending = Arc::new(Pending::new(self.layers.clone()));
        let observer: ActivationCallback = {
            let pending = Arc::clone(&pending);
            let features = Arc::clone(&self.features);
            let map = Arc::clone(&self.map);
            let layer_id = layer_id.clone();
            Box::new(move || {
                if pending.settle(SELECTED) {
                    select_feature(&*features, &*map, &layer_id, entry.feature_index);
                    pending.release();
                }
            })
        };

        let subscription = self.layers.on_activated(&layer_id, observer);
        pending.attach(subscription);
        debug!(layer_id = %layer_id, subscription, "deferring selection until layer activates");
        self.layers.activate(&layer_id);

        SelectOutcome::Deferred(ActivationHandle { pending })
    }
}
