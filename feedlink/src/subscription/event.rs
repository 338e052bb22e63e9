//! Subscription lifecycle and data events.

use crate::mapping::RawFieldUpdate;
use std::sync::Arc;

/// One event on a subscription stream.
///
/// `item == None` marks a lifecycle event: the subscription entered
/// (`subscribed == true`) or left (`subscribed == false`) the subscribed
/// state. `item == Some(_)` marks a data event, and data only flows while
/// subscribed, so `subscribed` is `true` then. The constructors are the
/// only way to build one, which keeps that invariant closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEvent<T> {
    subscribed: bool,
    item: Option<T>,
}

impl<T> SubscriptionEvent<T> {
    /// Lifecycle event: the subscription entered or left the subscribed
    /// state.
    pub fn lifecycle(subscribed: bool) -> Self {
        Self {
            subscribed,
            item: None,
        }
    }

    /// Data event carrying one update.
    pub fn update(item: T) -> Self {
        Self {
            subscribed: true,
            item: Some(item),
        }
    }

    pub fn subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn is_lifecycle(&self) -> bool {
        self.item.is_none()
    }

    pub fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    pub fn into_item(self) -> Option<T> {
        self.item
    }

    /// Swaps the payload type, preserving the lifecycle/data distinction.
    pub fn map_item<U>(self, f: impl FnOnce(T) -> U) -> SubscriptionEvent<U> {
        SubscriptionEvent {
            subscribed: self.subscribed,
            item: self.item.map(f),
        }
    }
}

/// Event shape carried by the raw per-subscription streams.
pub type RawSubscriptionEvent = SubscriptionEvent<Arc<RawFieldUpdate>>;
