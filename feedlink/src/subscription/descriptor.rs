//! Immutable wire parameters of one subscription.

use crate::taxonomy::SubscriptionMode;

/// What to subscribe to and how.
///
/// Fixed for the owning subscription object's lifetime, across every
/// subscribe cycle; there is deliberately no mutation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionDescriptor {
    mode: SubscriptionMode,
    data_adapter: String,
    items: Vec<String>,
    fields: Vec<String>,
    snapshot: bool,
}

impl SubscriptionDescriptor {
    pub fn new(
        mode: SubscriptionMode,
        data_adapter: impl Into<String>,
        items: impl IntoIterator<Item = impl Into<String>>,
        fields: impl IntoIterator<Item = impl Into<String>>,
        snapshot: bool,
    ) -> Self {
        Self {
            mode,
            data_adapter: data_adapter.into(),
            items: items.into_iter().map(Into::into).collect(),
            fields: fields.into_iter().map(Into::into).collect(),
            snapshot,
        }
    }

    pub fn mode(&self) -> SubscriptionMode {
        self.mode
    }

    pub fn data_adapter(&self) -> &str {
        &self.data_adapter
    }

    /// Item names, in subscription order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Field names, in schema order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether an initial snapshot is requested where the mode supports one.
    pub fn snapshot(&self) -> bool {
        self.snapshot
    }
}
