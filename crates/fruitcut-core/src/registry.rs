//! Player Registry
//!
//! Active players keyed by identity. Reads (size checks, random picks) share the
//! lock; joins, departures and cut accounting take it exclusively. Join and leave
//! notifications are published after the write lock is released.
//!
//! Membership changes and their notifications are therefore not atomic. When the
//! join channel is full, a player can be removed and its `PlayerLeft` delivered
//! while its `PlayerJoined` still waits for room, so the coordinator may log the
//! departure first. Both events are still delivered exactly once.

use crate::channel::{EventPublisher, PlayerJoined, PlayerLeft};
use crate::types::{FruitKind, Player, PlayerId};
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::{debug, warn};

pub(crate) type PlayerMap = HashMap<PlayerId, Player>;

/// Result of a join attempt
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The player was registered and announced
    Joined,
    /// The identity is already taken; the caller should abandon or pick another
    Collision,
    /// The registry is at capacity
    Full,
}

/// Append a cut to a player's stats, returning the new total
pub(crate) fn record_cut(players: &mut PlayerMap, id: &PlayerId, kind: FruitKind) -> Option<u32> {
    players.get_mut(id).map(|player| {
        player.record_cut(kind);
        player.total_cut
    })
}

/// Set of active players
pub struct PlayerRegistry {
    players: RwLock<PlayerMap>,
    capacity: usize,
    publisher: EventPublisher,
}

impl PlayerRegistry {
    pub fn new(capacity: usize, publisher: EventPublisher) -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            capacity,
            publisher,
        }
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, PlayerMap> {
        self.players.write().await
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.players.read().await.is_empty()
    }

    pub async fn contains(&self, id: &PlayerId) -> bool {
        self.players.read().await.contains_key(id)
    }

    pub async fn get(&self, id: &PlayerId) -> Option<Player> {
        self.players.read().await.get(id).cloned()
    }

    /// Copy of every registered player, sorted by identity
    pub async fn snapshot(&self) -> Vec<Player> {
        let mut players: Vec<Player> = self.players.read().await.values().cloned().collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        players
    }

    /// Register a player unless the identity is taken or the registry is full
    pub async fn join(&self, player: Player) -> JoinOutcome {
        let outcome = {
            let mut players = self.players.write().await;
            if players.contains_key(&player.id) {
                JoinOutcome::Collision
            } else if players.len() >= self.capacity {
                JoinOutcome::Full
            } else {
                players.insert(player.id.clone(), player.clone());
                JoinOutcome::Joined
            }
        };

        match outcome {
            JoinOutcome::Joined => {
                if let Err(e) = self.publisher.publish(PlayerJoined { player }.into()).await {
                    warn!("Dropping join notification: {}", e);
                }
            }
            JoinOutcome::Collision => debug!("Identity {} already registered", player.id),
            JoinOutcome::Full => debug!("Registry full, {} not admitted", player.id),
        }
        outcome
    }

    /// Remove a player, announcing the final stats
    pub async fn leave(&self, id: &PlayerId) -> Option<Player> {
        let removed = self.players.write().await.remove(id);

        if let Some(player) = &removed {
            let event = PlayerLeft {
                player: player.clone(),
            };
            if let Err(e) = self.publisher.publish(event.into()).await {
                warn!("Dropping departure notification: {}", e);
            }
        }
        removed
    }

    /// Credit a cut fruit to a player
    ///
    /// Returns `false` when the player has already left. `SessionState::cut_fruit`
    /// credits through the shared `record_cut` helper under both locks instead.
    pub async fn record_consumption(&self, id: &PlayerId, kind: FruitKind) -> bool {
        let mut players = self.players.write().await;
        record_cut(&mut players, id, kind).is_some()
    }

    /// Uniformly random member of the current membership
    pub async fn random_active_member(&self) -> Option<Player> {
        let players = self.players.read().await;
        if players.is_empty() {
            return None;
        }
        let members: Vec<&Player> = players.values().collect();
        let pick = rand::thread_rng().gen_range(0..members.len());
        Some(members[pick].clone())
    }

    /// First member in iteration order, with no fairness guarantee
    pub async fn any_member(&self) -> Option<Player> {
        self.players.read().await.values().next().cloned()
    }
}
