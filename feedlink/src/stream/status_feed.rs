//! Behavior-semantics multicast for canonical connection status.

use crate::error::ConnectionError;
use crate::taxonomy::ConnectionState;
use tokio::sync::broadcast;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const STATUS_FEED_TAG: &str = "StatusFeed:";

type StatusItem = Result<ConnectionState, ConnectionError>;

struct StatusCell {
    current: ConnectionState,
    terminated: Option<ConnectionError>,
    sender: broadcast::Sender<StatusItem>,
}

/// Multicast source of canonical connection states with latest-value replay.
///
/// A new consumer immediately observes the current state, then every later
/// transition in arrival order. Relaying a state equal to the current one is
/// suppressed, so callers may forward native wire statuses verbatim without
/// producing duplicate events.
pub(crate) struct StatusFeed {
    capacity: usize,
    cell: Mutex<StatusCell>,
}

impl StatusFeed {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            capacity,
            cell: Mutex::new(StatusCell {
                current: ConnectionState::Disconnected,
                terminated: None,
                sender,
            }),
        }
    }

    /// Attaches a consumer.
    ///
    /// On a feed already terminated by a session error the stream replays
    /// that error and finishes; the next connect re-arms the feed.
    pub(crate) async fn subscribe(&self) -> StatusStream {
        let cell = self.cell.lock().await;
        if let Some(error) = &cell.terminated {
            return StatusStream {
                replay: Some(Err(error.clone())),
                receiver: None,
            };
        }
        StatusStream {
            replay: Some(Ok(cell.current)),
            receiver: Some(cell.sender.subscribe()),
        }
    }

    pub(crate) async fn current(&self) -> ConnectionState {
        self.cell.lock().await.current
    }

    /// Publishes a state transition. Returns `false` when `state` equals the
    /// current state and nothing was emitted.
    pub(crate) async fn relay(&self, state: ConnectionState) -> bool {
        let mut cell = self.cell.lock().await;
        if cell.current == state {
            debug!("{STATUS_FEED_TAG} suppressed repeat of current state {state}");
            return false;
        }
        debug!("{STATUS_FEED_TAG} {} -> {}", cell.current, state);
        cell.current = state;
        if cell.sender.send(Ok(state)).is_err() {
            debug!("{STATUS_FEED_TAG} no consumers attached for {state}");
        }
        true
    }

    /// Terminates the current stream with a classified session error.
    ///
    /// Attached consumers drain their pending items, observe the error and
    /// finish. The feed stays terminated until [`StatusFeed::rearm`] runs on
    /// the next connect; `current` is left untouched because only the native
    /// closed callback may produce `Disconnected`.
    pub(crate) async fn fail(&self, error: ConnectionError) {
        let mut cell = self.cell.lock().await;
        if cell.terminated.is_some() {
            warn!("{STATUS_FEED_TAG} dropping session error on terminated feed: {error}");
            return;
        }
        warn!("{STATUS_FEED_TAG} terminating status stream: {error}");
        if cell.sender.send(Err(error.clone())).is_err() {
            debug!("{STATUS_FEED_TAG} no consumers attached for terminal error");
        }
        cell.terminated = Some(error);
        // Swapping the sender completes every attached consumer once drained.
        let (sender, _) = broadcast::channel(self.capacity);
        cell.sender = sender;
    }

    /// Clears a terminal error so a fresh connect can publish again.
    pub(crate) async fn rearm(&self) {
        let mut cell = self.cell.lock().await;
        if cell.terminated.take().is_some() {
            debug!("{STATUS_FEED_TAG} re-armed after terminal error");
        }
    }
}

/// Consumer view of a status feed.
pub struct StatusStream {
    replay: Option<StatusItem>,
    receiver: Option<broadcast::Receiver<StatusItem>>,
}

impl StatusStream {
    /// The next status item; `None` once the stream has finished.
    ///
    /// A consumer that falls behind the channel capacity skips to the oldest
    /// retained item and keeps going; the skip is logged.
    pub async fn next(&mut self) -> Option<Result<ConnectionState, ConnectionError>> {
        if let Some(item) = self.replay.take() {
            return Some(item);
        }
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.recv().await {
                Ok(item) => return Some(item),
                Err(broadcast::error::RecvError::Closed) => {
                    self.receiver = None;
                    return None;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("{STATUS_FEED_TAG} consumer lagged, skipped {skipped} items");
                }
            }
        }
    }
}
