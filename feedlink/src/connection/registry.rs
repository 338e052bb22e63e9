//! Identity-keyed set of live subscriptions.

use std::sync::Arc;
use tokio::sync::Mutex;

/// Tracks the subscriptions a client currently believes active.
///
/// Membership is `Arc` pointer identity: the same object cannot appear
/// twice no matter how many concurrent subscribe calls race, and distinct
/// objects with equal descriptors stay distinct. Order of insertion is
/// preserved for positional diagnostics.
pub(crate) struct SubscriptionRegistry<S> {
    entries: Mutex<Vec<Arc<S>>>,
}

impl<S> SubscriptionRegistry<S> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Adds `subscription` unless the same object is already present.
    pub(crate) async fn insert(&self, subscription: Arc<S>) {
        let mut entries = self.entries.lock().await;
        if !entries
            .iter()
            .any(|entry| Arc::ptr_eq(entry, &subscription))
        {
            entries.push(subscription);
        }
    }

    /// Removes by object identity; `false` when the object was absent.
    pub(crate) async fn remove(&self, subscription: &Arc<S>) -> bool {
        let mut entries = self.entries.lock().await;
        match entries
            .iter()
            .position(|entry| Arc::ptr_eq(entry, subscription))
        {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) async fn count(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub(crate) async fn get(&self, index: usize) -> Option<Arc<S>> {
        self.entries.lock().await.get(index).cloned()
    }
}
