//! Event Bus Utilities
//!
//! Four bounded tokio mpsc channels, one per event kind. Any number of producers
//! hold an [`EventPublisher`]; a single consumer owns the [`EventReceivers`].
//! A full channel makes the publishing task wait for room; callers release
//! their locks before publishing so waiting never stalls unrelated mutation.

use super::communication::{FruitCut, FruitExpired, PlayerJoined, PlayerLeft, SessionEvent};
use crate::config::ChannelConfig;
use crate::errors::{FruitcutError, FruitcutResult};
use tokio::sync::mpsc;

pub type JoinSender = mpsc::Sender<PlayerJoined>;
pub type JoinReceiver = mpsc::Receiver<PlayerJoined>;
pub type LeaveSender = mpsc::Sender<PlayerLeft>;
pub type LeaveReceiver = mpsc::Receiver<PlayerLeft>;
pub type ExpirySender = mpsc::Sender<FruitExpired>;
pub type ExpiryReceiver = mpsc::Receiver<FruitExpired>;
pub type CutSender = mpsc::Sender<FruitCut>;
pub type CutReceiver = mpsc::Receiver<FruitCut>;

// ----------------------------------------------------------------------------
// Channel Creation
// ----------------------------------------------------------------------------

/// Create the four bounded event channels
pub fn create_event_bus(config: &ChannelConfig) -> (EventPublisher, EventReceivers) {
    let (join_tx, join_rx) = mpsc::channel(config.join_buffer_size);
    let (leave_tx, leave_rx) = mpsc::channel(config.leave_buffer_size);
    let (expiry_tx, expiry_rx) = mpsc::channel(config.expiry_buffer_size);
    let (cut_tx, cut_rx) = mpsc::channel(config.cut_buffer_size);

    (
        EventPublisher {
            joined: join_tx,
            left: leave_tx,
            expired: expiry_tx,
            cut: cut_tx,
        },
        EventReceivers {
            joined: join_rx,
            left: leave_rx,
            expired: expiry_rx,
            cut: cut_rx,
        },
    )
}

// ----------------------------------------------------------------------------
// Publisher
// ----------------------------------------------------------------------------

/// Producer side of the bus
#[derive(Debug, Clone)]
pub struct EventPublisher {
    joined: JoinSender,
    left: LeaveSender,
    expired: ExpirySender,
    cut: CutSender,
}

impl EventPublisher {
    /// Publish an event, waiting for room on its channel
    pub async fn publish(&self, event: SessionEvent) -> FruitcutResult<()> {
        let delivered = match event {
            SessionEvent::PlayerJoined(e) => self.joined.send(e).await.is_ok(),
            SessionEvent::PlayerLeft(e) => self.left.send(e).await.is_ok(),
            SessionEvent::FruitExpired(e) => self.expired.send(e).await.is_ok(),
            SessionEvent::FruitCut(e) => self.cut.send(e).await.is_ok(),
        };

        if delivered {
            Ok(())
        } else {
            Err(FruitcutError::channel_error(
                "Event receiver dropped, coordinator is gone",
            ))
        }
    }

    /// Whether the consumer side has been dropped
    pub fn is_closed(&self) -> bool {
        self.joined.is_closed()
    }
}

// ----------------------------------------------------------------------------
// Receivers
// ----------------------------------------------------------------------------

/// Consumer side of the bus, owned by exactly one task
#[derive(Debug)]
pub struct EventReceivers {
    pub joined: JoinReceiver,
    pub left: LeaveReceiver,
    pub expired: ExpiryReceiver,
    pub cut: CutReceiver,
}

impl EventReceivers {
    /// Drain whatever is currently buffered without waiting
    ///
    /// Events come out grouped by channel (joins, departures, expiries, cuts).
    pub fn drain_ready(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(e) = self.joined.try_recv() {
            events.push(e.into());
        }
        while let Ok(e) = self.left.try_recv() {
            events.push(e.into());
        }
        while let Ok(e) = self.expired.try_recv() {
            events.push(e.into());
        }
        while let Ok(e) = self.cut.try_recv() {
            events.push(e.into());
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Fruit, FruitKind, Player, PlayerId, Timestamp};
    use std::time::Duration;
    use tokio::time::timeout;

    fn joined(name: &str) -> SessionEvent {
        PlayerJoined {
            player: Player::new(PlayerId::new(name)),
        }
        .into()
    }

    #[tokio::test]
    async fn test_events_are_routed_to_their_channel() {
        let (publisher, mut receivers) = create_event_bus(&ChannelConfig::uniform(4));

        publisher.publish(joined("Earth_1")).await.unwrap();
        publisher
            .publish(
                FruitCut {
                    player: PlayerId::new("Earth_1"),
                    fruit: Fruit::new(FruitKind::Cherries, Timestamp::new(1), 9),
                    total_cut: 1,
                }
                .into(),
            )
            .await
            .unwrap();

        let received = timeout(Duration::from_millis(100), receivers.joined.recv())
            .await
            .expect("join should arrive")
            .expect("channel open");
        assert_eq!(received.player.id, PlayerId::new("Earth_1"));

        let cut = receivers.cut.try_recv().expect("cut buffered");
        assert_eq!(cut.fruit.kind, FruitKind::Cherries);
        assert!(receivers.left.try_recv().is_err());
        assert!(receivers.expired.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_channel_applies_backpressure_to_producer_only() {
        let (publisher, mut receivers) = create_event_bus(&ChannelConfig::uniform(1));
        publisher.publish(joined("Venus_1")).await.unwrap();

        let blocked = {
            let publisher = publisher.clone();
            tokio::spawn(async move { publisher.publish(joined("Venus_2")).await })
        };

        // The blocked producer does not prevent other kinds of events
        let expired = FruitExpired {
            kind: FruitKind::Apple,
            index: 0,
            fruit_id: 1,
        };
        timeout(Duration::from_millis(100), publisher.publish(expired.into()))
            .await
            .expect("expiry channel has room")
            .unwrap();
        assert!(!blocked.is_finished());

        assert!(receivers.joined.recv().await.is_some());
        timeout(Duration::from_millis(100), blocked)
            .await
            .expect("producer resumes once drained")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_publish_after_consumer_dropped() {
        let (publisher, receivers) = create_event_bus(&ChannelConfig::default());
        drop(receivers);

        assert!(publisher.is_closed());
        assert!(matches!(
            publisher.publish(joined("Saturn_3")).await,
            Err(FruitcutError::Channel { .. })
        ));
    }
}
