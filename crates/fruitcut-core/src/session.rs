//! Shared Session State
//!
//! Bundles the fruit queue, the player registry and the producer side of the event
//! bus. Cheap to clone; clones share the same structures. The cut operation is the
//! only place that holds both locks, always queue first, then registry.

use crate::channel::{create_event_bus, EventPublisher, EventReceivers, FruitCut};
use crate::config::SessionConfig;
use crate::queue::FruitQueue;
use crate::registry::{record_cut, PlayerRegistry};
use crate::types::{PlayerId, TimeSource};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct SessionState {
    queue: Arc<FruitQueue>,
    registry: Arc<PlayerRegistry>,
    publisher: EventPublisher,
    clock: Arc<dyn TimeSource>,
    config: Arc<SessionConfig>,
}

impl SessionState {
    /// Create the shared structures and the event bus feeding the coordinator
    pub fn new(config: SessionConfig, clock: Arc<dyn TimeSource>) -> (Self, EventReceivers) {
        let (publisher, receivers) = create_event_bus(&config.channels);
        let queue = FruitQueue::new(
            config.max_fruits_on_screen,
            clock.clone(),
            publisher.clone(),
        );
        let registry = PlayerRegistry::new(config.max_players, publisher.clone());

        let state = Self {
            queue: Arc::new(queue),
            registry: Arc::new(registry),
            publisher,
            clock,
            config: Arc::new(config),
        };
        (state, receivers)
    }

    pub fn queue(&self) -> &FruitQueue {
        &self.queue
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Sweep the queue against the session clock and configured threshold
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        self.queue
            .sweep_expired(now, self.config.expiry_threshold())
            .await
    }

    /// Have `player` cut the fruit at `index`
    ///
    /// Both targets are checked under both locks; if the player has left or the
    /// index is stale nothing changes and nothing is published.
    pub async fn cut_fruit(&self, player: &PlayerId, index: usize) -> Option<FruitCut> {
        debug!("Player {} is cutting a fruit", player);

        let cut = {
            let mut queue = self.queue.lock().await;
            let mut players = self.registry.write().await;

            if !players.contains_key(player) {
                debug!("Player {} left before cutting", player);
                return None;
            }
            let Some(fruit) = queue.remove(index) else {
                debug!("Fruit index {} is stale, cut dropped", index);
                return None;
            };
            let total_cut = record_cut(&mut players, player, fruit.kind)?;

            FruitCut {
                player: player.clone(),
                fruit,
                total_cut,
            }
        };

        info!(
            "Player {} cut the fruit {} (id {})",
            cut.player, cut.fruit.kind, cut.fruit.id
        );
        if let Err(e) = self.publisher.publish(cut.clone().into()).await {
            warn!("Dropping cut notification: {}", e);
        }
        Some(cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ManualTimeSource, Player, Timestamp};
    use core::time::Duration;

    fn test_state() -> (SessionState, EventReceivers, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(Timestamp::new(50_000)));
        let (state, rx) = SessionState::new(SessionConfig::testing(), clock.clone());
        (state, rx, clock)
    }

    #[tokio::test]
    async fn test_cut_updates_player_and_queue() {
        let (state, mut rx, _clock) = test_state();
        let id = PlayerId::new("Earth_3");
        let _ = state.registry().join(Player::new(id.clone())).await;
        state.queue().spawn().await;
        let before = state.queue().snapshot().await;

        let cut = state.cut_fruit(&id, 2).await.expect("cut succeeds");
        assert_eq!(cut.fruit, before[2]);
        assert_eq!(cut.total_cut, 1);

        let player = state.registry().get(&id).await.expect("still registered");
        assert_eq!(player.total_cut, 1);
        assert_eq!(player.cut_fruits, vec![before[2].kind]);
        assert_eq!(state.queue().len().await, before.len() - 1);

        let event = rx.cut.try_recv().expect("cut event");
        assert_eq!(event.player, id);
    }

    #[tokio::test]
    async fn test_cut_by_departed_player_leaves_queue_alone() {
        let (state, mut rx, _clock) = test_state();
        state.queue().spawn().await;
        let len = state.queue().len().await;

        assert!(state.cut_fruit(&PlayerId::new("Mars_0"), 0).await.is_none());
        assert_eq!(state.queue().len().await, len);
        assert!(rx.cut.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cut_on_empty_queue_is_noop() {
        let (state, mut rx, _clock) = test_state();
        let id = PlayerId::new("Venus_1");
        let _ = state.registry().join(Player::new(id.clone())).await;

        assert!(state.cut_fruit(&id, 0).await.is_none());
        let player = state.registry().get(&id).await.unwrap();
        assert_eq!(player.total_cut, 0);
        assert!(player.cut_fruits.is_empty());
        assert!(rx.cut.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sweep_uses_session_clock() {
        let (state, mut rx, clock) = test_state();
        state.queue().spawn().await;
        let spawned = state.queue().len().await;

        assert_eq!(state.sweep_expired().await, 0);
        clock.advance(Duration::from_millis(state.config().expiry_threshold_ms + 100));
        assert_eq!(state.sweep_expired().await, spawned);

        assert_eq!(rx.drain_ready().len(), spawned);
    }

    #[tokio::test]
    async fn test_concurrent_cuts_of_last_fruit() {
        let (state, mut rx, _clock) = test_state();
        let a = PlayerId::new("Saturn_1");
        let b = PlayerId::new("Saturn_2");
        let _ = state.registry().join(Player::new(a.clone())).await;
        let _ = state.registry().join(Player::new(b.clone())).await;
        state.queue().spawn().await;
        let last = state.queue().len().await - 1;

        let first = tokio::spawn({
            let state = state.clone();
            async move { state.cut_fruit(&a, last).await }
        });
        let second = tokio::spawn({
            let state = state.clone();
            async move { state.cut_fruit(&b, last).await }
        });

        let outcomes = [first.await.unwrap(), second.await.unwrap()];
        assert_eq!(outcomes.iter().filter(|o| o.is_some()).count(), 1);
        rx.drain_ready();
        let total: u32 = state
            .registry()
            .snapshot()
            .await
            .iter()
            .map(|p| p.total_cut)
            .sum();
        assert_eq!(total, 1);
    }
}
