//! Resettable multicast for one subscription's event stream.

use crate::error::SubscriptionError;
use crate::subscription::RawSubscriptionEvent;
use crate::subscription::SubscriptionEvent;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::mapping::RawFieldUpdate;

const SUBSCRIPTION_FEED_TAG: &str = "SubscriptionFeed:";

type FeedItem = Result<RawSubscriptionEvent, SubscriptionError>;

/// Where a subscription currently sits in its arm/listen cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecyclePhase {
    /// Fresh channel built, no native listener bound yet.
    Armed,
    /// Native listener bound, events flowing.
    Listening,
    /// Native layer reported termination. Transient: the feed re-arms in the
    /// same critical section.
    Ended,
}

struct FeedCell {
    phase: LifecyclePhase,
    sender: broadcast::Sender<FeedItem>,
}

/// Multicast source for one subscription.
///
/// Native listener registrations are single-use: once the native layer
/// reports termination the registration is spent. The feed therefore
/// completes the current channel on termination and immediately re-arms
/// with a fresh one, which keeps the owning subscription object reusable
/// across any number of subscribe cycles.
pub(crate) struct SubscriptionFeed {
    capacity: usize,
    cell: Mutex<FeedCell>,
}

impl SubscriptionFeed {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            capacity,
            cell: Mutex::new(FeedCell {
                phase: LifecyclePhase::Armed,
                sender,
            }),
        }
    }

    /// Attaches a consumer to the current cycle's channel.
    pub(crate) async fn subscribe(&self) -> SubscriptionStream {
        SubscriptionStream {
            receiver: Some(self.cell.lock().await.sender.subscribe()),
        }
    }

    pub(crate) async fn phase(&self) -> LifecyclePhase {
        self.cell.lock().await.phase
    }

    /// Flips `Armed` to `Listening`. Returns `false` when the feed is
    /// already listening, in which case the caller must not bind another
    /// native listener.
    pub(crate) async fn begin_listening(&self) -> bool {
        let mut cell = self.cell.lock().await;
        match cell.phase {
            LifecyclePhase::Armed => {
                cell.phase = LifecyclePhase::Listening;
                debug!("{SUBSCRIPTION_FEED_TAG} armed -> listening");
                true
            }
            LifecyclePhase::Listening | LifecyclePhase::Ended => false,
        }
    }

    /// Publishes an entered/left-subscribed lifecycle event.
    pub(crate) async fn emit_lifecycle(&self, subscribed: bool) {
        let cell = self.cell.lock().await;
        let event = SubscriptionEvent::lifecycle(subscribed);
        if cell.sender.send(Ok(event)).is_err() {
            debug!(
                "{SUBSCRIPTION_FEED_TAG} no consumers for lifecycle event (subscribed {subscribed})"
            );
        }
    }

    /// Publishes one data event.
    pub(crate) async fn emit_update(&self, update: Arc<RawFieldUpdate>) {
        let cell = self.cell.lock().await;
        if cell.sender.send(Ok(SubscriptionEvent::update(update))).is_err() {
            debug!("{SUBSCRIPTION_FEED_TAG} no consumers for data event");
        }
    }

    /// Ends the cycle after the native layer reported full unsubscription:
    /// emits the final `subscribed = false` lifecycle event, completes the
    /// stream for every consumer and re-arms with a fresh channel.
    pub(crate) async fn end(&self) {
        let mut cell = self.cell.lock().await;
        let event = SubscriptionEvent::lifecycle(false);
        if cell.sender.send(Ok(event)).is_err() {
            debug!("{SUBSCRIPTION_FEED_TAG} no consumers for final lifecycle event");
        }
        self.rearm(&mut cell);
    }

    /// Ends the cycle with a classified terminal error, then re-arms.
    pub(crate) async fn fail(&self, error: SubscriptionError) {
        let mut cell = self.cell.lock().await;
        warn!("{SUBSCRIPTION_FEED_TAG} terminating event stream: {error}");
        if cell.sender.send(Err(error)).is_err() {
            debug!("{SUBSCRIPTION_FEED_TAG} no consumers for terminal error");
        }
        self.rearm(&mut cell);
    }

    fn rearm(&self, cell: &mut FeedCell) {
        cell.phase = LifecyclePhase::Ended;
        debug!("{SUBSCRIPTION_FEED_TAG} listening -> ended");
        // Swapping the sender completes every attached consumer once drained.
        let (sender, _) = broadcast::channel(self.capacity);
        cell.sender = sender;
        cell.phase = LifecyclePhase::Armed;
        debug!("{SUBSCRIPTION_FEED_TAG} ended -> armed, fresh channel in place");
    }
}

/// Consumer view of one subscription cycle's event stream.
pub struct SubscriptionStream {
    receiver: Option<broadcast::Receiver<FeedItem>>,
}

impl SubscriptionStream {
    /// The next event; `None` once the cycle has finished.
    ///
    /// A consumer that falls behind the channel capacity skips to the oldest
    /// retained event and keeps going; the skip is logged.
    pub async fn next(&mut self) -> Option<Result<RawSubscriptionEvent, SubscriptionError>> {
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.recv().await {
                Ok(item) => return Some(item),
                Err(broadcast::error::RecvError::Closed) => {
                    self.receiver = None;
                    return None;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("{SUBSCRIPTION_FEED_TAG} consumer lagged, skipped {skipped} events");
                }
            }
        }
    }
}
