//! Property-based tests for the queue and registry invariants
//!
//! Arbitrary interleavings of spawn/consume/sweep and join/leave must never break
//! the queue capacity bound or registry identity uniqueness.

use fruitcut_core::{
    ChannelConfig, FruitQueue, JoinOutcome, ManualTimeSource, Player, PlayerId, PlayerRegistry,
    SessionEvent, TimeSource, Timestamp,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum QueueOp {
    Spawn,
    Consume(usize),
    Advance(u64),
    Sweep,
}

#[derive(Debug, Clone)]
enum RegistryOp {
    Join(usize),
    Leave(usize),
}

fn arb_queue_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        Just(QueueOp::Spawn),
        (0usize..12).prop_map(QueueOp::Consume),
        (0u64..3_000).prop_map(QueueOp::Advance),
        Just(QueueOp::Sweep),
    ]
}

fn arb_registry_op() -> impl Strategy<Value = RegistryOp> {
    prop_oneof![
        (0usize..6).prop_map(RegistryOp::Join),
        (0usize..6).prop_map(RegistryOp::Leave),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}

proptest! {
    /// Property: the queue never holds more fruits than its capacity
    #[test]
    fn queue_never_exceeds_capacity(
        capacity in 1usize..8,
        ops in prop::collection::vec(arb_queue_op(), 1..60),
    ) {
        runtime().block_on(async {
            let clock = Arc::new(ManualTimeSource::new(Timestamp::new(1_000_000)));
            // Buffer large enough that every expiry of the run fits without a consumer
            let (publisher, _receivers) = fruitcut_core::create_event_bus(&ChannelConfig::uniform(1_000));
            let queue = FruitQueue::new(capacity, clock.clone(), publisher);

            for op in ops {
                match op {
                    QueueOp::Spawn => { queue.spawn().await; }
                    QueueOp::Consume(index) => { queue.consume(index).await; }
                    QueueOp::Advance(ms) => clock.advance(Duration::from_millis(ms)),
                    QueueOp::Sweep => {
                        queue.sweep_expired(clock.now(), Duration::from_secs(5)).await;
                    }
                }
                prop_assert!(queue.len().await <= capacity);
            }
            Ok(())
        })?;
    }

    /// Property: the registry never holds duplicate identities and announces each join once
    #[test]
    fn registry_identities_stay_unique(
        ops in prop::collection::vec(arb_registry_op(), 1..60),
    ) {
        runtime().block_on(async {
            let (publisher, mut receivers) = fruitcut_core::create_event_bus(&ChannelConfig::uniform(1_000));
            let registry = PlayerRegistry::new(4, publisher);
            let mut joins = 0usize;

            for op in ops {
                match op {
                    RegistryOp::Join(n) => {
                        let id = PlayerId::synthetic("Earth", n);
                        if registry.join(Player::new(id)).await == JoinOutcome::Joined {
                            joins += 1;
                        }
                    }
                    RegistryOp::Leave(n) => {
                        registry.leave(&PlayerId::synthetic("Earth", n)).await;
                    }
                }

                let snapshot = registry.snapshot().await;
                let unique: HashSet<_> = snapshot.iter().map(|p| p.id.clone()).collect();
                prop_assert_eq!(unique.len(), snapshot.len());
                prop_assert!(snapshot.len() <= registry.capacity());
            }

            let announced = receivers
                .drain_ready()
                .into_iter()
                .filter(|e| matches!(e, SessionEvent::PlayerJoined(_)))
                .count();
            prop_assert_eq!(announced, joins);
            Ok(())
        })?;
    }
}
