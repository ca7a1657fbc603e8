//! Fruit Queue
//!
//! The bounded, insertion-ordered set of fruits currently on screen. Every
//! operation takes the queue's own mutex for its whole pass, so spawn, sweep and
//! consume never observe each other half-done. Expiry events are published only
//! after the lock has been released.

use crate::channel::{EventPublisher, FruitExpired};
use crate::types::{Fruit, FruitKind, TimeSource, Timestamp, FRUIT_ID_RANGE};
use core::time::Duration;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// State guarded by the queue lock
#[derive(Debug, Default)]
pub(crate) struct QueueState {
    pub(crate) fruits: Vec<Fruit>,
    last_stamp: Option<Timestamp>,
}

impl QueueState {
    /// Spawn stamps are strictly increasing in call order, even within one millisecond
    fn next_stamp(&mut self, now: Timestamp) -> Timestamp {
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    /// Remove the fruit at `index`, keeping the others in order
    pub(crate) fn remove(&mut self, index: usize) -> Option<Fruit> {
        if index < self.fruits.len() {
            Some(self.fruits.remove(index))
        } else {
            None
        }
    }
}

/// Bounded queue of on-screen fruits
pub struct FruitQueue {
    state: Mutex<QueueState>,
    capacity: usize,
    clock: Arc<dyn TimeSource>,
    publisher: EventPublisher,
}

impl FruitQueue {
    pub fn new(capacity: usize, clock: Arc<dyn TimeSource>, publisher: EventPublisher) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            capacity,
            clock,
            publisher,
        }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().await
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.fruits.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Copy of the fruits currently on screen, in queue order
    pub async fn snapshot(&self) -> Vec<Fruit> {
        self.state.lock().await.fruits.clone()
    }

    /// Fill every free slot with a random fruit stamped now
    ///
    /// Returns the number of fruits added; zero when the queue is already full.
    pub async fn spawn(&self) -> usize {
        let mut state = self.state.lock().await;

        let free = self.capacity.saturating_sub(state.fruits.len());
        debug!(
            "Available slots: {} out of {} free for fruits",
            free, self.capacity
        );
        if free == 0 {
            info!(
                "No slot available: {}/{} fruits on screen",
                state.fruits.len(),
                self.capacity
            );
            return 0;
        }

        let mut rng = rand::thread_rng();
        for _ in 0..free {
            let kind = FruitKind::ALL[rng.gen_range(0..FruitKind::ALL.len())];
            let id = rng.gen_range(0..FRUIT_ID_RANGE);
            let stamp = state.next_stamp(self.clock.now());
            info!("Dropping fruit {} (id {}) at {}", kind, id, stamp);
            state.fruits.push(Fruit::new(kind, stamp, id));
        }
        free
    }

    /// Remove every fruit older than `threshold` at `now`
    ///
    /// One `FruitExpired` is published per removed fruit, carrying the index it had
    /// before the sweep. Survivors keep their relative order. Returns the number of
    /// fruits removed.
    pub async fn sweep_expired(&self, now: Timestamp, threshold: Duration) -> usize {
        let expired = {
            let mut state = self.state.lock().await;
            let mut expired = Vec::new();
            let mut retained = Vec::with_capacity(state.fruits.len());

            for (index, fruit) in std::mem::take(&mut state.fruits).into_iter().enumerate() {
                if fruit.is_expired(now, threshold) {
                    expired.push(FruitExpired {
                        kind: fruit.kind,
                        index,
                        fruit_id: fruit.id,
                    });
                } else {
                    retained.push(fruit);
                }
            }
            state.fruits = retained;
            expired
        };

        let removed = expired.len();
        if removed > 0 {
            debug!("Sweep removed {} expired fruits", removed);
        }
        for event in expired {
            if let Err(e) = self.publisher.publish(event.into()).await {
                warn!("Dropping expiry notification: {}", e);
            }
        }
        removed
    }

    /// Remove and return the fruit at `index`
    ///
    /// An index past the end (the queue shrank since it was chosen) is a no-op.
    /// `SessionState::cut_fruit` does the same removal through the shared
    /// `QueueState::remove` while it also holds the registry lock.
    pub async fn consume(&self, index: usize) -> Option<Fruit> {
        let fruit = self.state.lock().await.remove(index);
        if fruit.is_none() {
            debug!("Consume at stale index {} ignored", index);
        }
        fruit
    }
}
