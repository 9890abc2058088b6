//! Broadcast hub — the relay's single serialization point.
//!
//! DESIGN
//! ======
//! One mutex guards both the canvas history and the subscriber set, so a
//! subscribe (snapshot + register) is atomic with respect to every publish:
//! an operation is either in the snapshot a new subscriber replays or in its
//! live queue, never both and never neither. Because all publishes pass
//! through the same lock, every subscriber observes the same global order.
//!
//! The hub is constructed once in `main` and shared by `Arc` — there is no
//! process-wide singleton, so tests can run hubs in isolation.
//!
//! BACKPRESSURE
//! ============
//! Outbound queues are bounded. A subscriber whose queue is full at fan-out
//! time is removed on the spot; its writer task observes the closed channel
//! and the session tears down. This bounds relay memory at the cost of
//! disconnecting clients that cannot keep up.

use std::collections::HashMap;

use shapes::ShapeOp;
use tokio::sync::{Mutex, mpsc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::history::CanvasHistory;

/// Capacity of each subscriber's outbound queue.
const OUTBOUND_QUEUE_DEPTH: usize = 256;

/// Handed to a session by [`BroadcastHub::subscribe`].
pub struct Subscription {
    pub id: Uuid,
    /// Ordered history snapshot, delivered before any live event.
    pub replay: Vec<ShapeOp>,
    /// Live events published after the subscription point, in publish order.
    pub rx: mpsc::Receiver<ShapeOp>,
}

pub struct BroadcastHub {
    inner: Mutex<HubInner>,
}

struct HubInner {
    history: CanvasHistory,
    subscribers: HashMap<Uuid, mpsc::Sender<ShapeOp>>,
}

impl BroadcastHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HubInner { history: CanvasHistory::new(), subscribers: HashMap::new() }),
        }
    }

    /// Atomically capture the current history snapshot and register a new
    /// live subscriber.
    pub async fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_DEPTH);
        let id = Uuid::new_v4();

        let mut inner = self.inner.lock().await;
        let replay = inner.history.snapshot();
        inner.subscribers.insert(id, tx);
        info!(subscriber = %id, replay = replay.len(), subscribers = inner.subscribers.len(), "subscribed");

        Subscription { id, replay, rx }
    }

    /// Accept one operation: apply it to history, then fan it out to every
    /// current subscriber — including the one whose session published it,
    /// matching the reference relay's echo behavior.
    pub async fn publish(&self, op: ShapeOp) {
        let mut inner = self.inner.lock().await;
        inner.history.apply(&op);

        let mut stalled = Vec::new();
        for (id, tx) in &inner.subscribers {
            match tx.try_send(op.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = %id, "outbound queue full, disconnecting");
                    stalled.push(*id);
                }
                // Writer already gone; racing teardown will deregister too.
                Err(mpsc::error::TrySendError::Closed(_)) => stalled.push(*id),
            }
        }
        for id in &stalled {
            inner.subscribers.remove(id);
        }

        info!(kind = op.kind(), history = inner.history.len(), subscribers = inner.subscribers.len(), "published");
    }

    /// Remove a subscriber from the fan-out set. Idempotent: the hub may
    /// already have dropped the entry on overflow or a racing teardown.
    pub async fn unsubscribe(&self, id: Uuid) {
        let mut inner = self.inner.lock().await;
        if inner.subscribers.remove(&id).is_some() {
            info!(subscriber = %id, remaining = inner.subscribers.len(), "unsubscribed");
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.inner.lock().await.subscribers.len()
    }

    pub async fn history_len(&self) -> usize {
        self.inner.lock().await.history.len()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "hub_test.rs"]
mod tests;
