//! Typed adapter over a raw subscription stream.

use super::FieldMapper;
use crate::error::SubscriptionError;
use crate::stream::SubscriptionStream;
use crate::subscription::SubscriptionEvent;

/// Runs every data event of a raw stream through one [`FieldMapper`].
///
/// Lifecycle events and terminal errors pass through untouched, so a typed
/// consumer observes the exact event sequence of the raw stream with only
/// the payload type swapped.
pub struct TypedStream<M: FieldMapper> {
    inner: SubscriptionStream,
    mapper: M,
}

impl<M: FieldMapper> TypedStream<M> {
    pub fn new(inner: SubscriptionStream, mapper: M) -> Self {
        Self { inner, mapper }
    }

    /// The next event; `None` once the underlying cycle has finished.
    pub async fn next(
        &mut self,
    ) -> Option<Result<SubscriptionEvent<M::Record>, SubscriptionError>> {
        let item = self.inner.next().await?;
        Some(item.map(|event| event.map_item(|raw| self.mapper.map(&raw))))
    }
}
