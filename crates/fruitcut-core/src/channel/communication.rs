//! Session Event Types
//!
//! Every state change worth reporting travels through the bus as one of these
//! events. Each carries enough data for the coordinator to react without reading
//! shared state again.

use crate::types::{Fruit, FruitKind, Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A player was registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerJoined {
    pub player: Player,
}

/// A player was removed, with the stats they held at removal time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLeft {
    pub player: Player,
}

/// An uncut fruit aged out of the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitExpired {
    pub kind: FruitKind,
    /// Position of the fruit in the queue before the sweep removed anything
    pub index: usize,
    pub fruit_id: u16,
}

/// A player cut a fruit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitCut {
    pub player: PlayerId,
    pub fruit: Fruit,
    /// The player's cumulative count including this cut
    pub total_cut: u32,
}

/// Any event carried by the bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    PlayerJoined(PlayerJoined),
    PlayerLeft(PlayerLeft),
    FruitExpired(FruitExpired),
    FruitCut(FruitCut),
}

impl From<PlayerJoined> for SessionEvent {
    fn from(event: PlayerJoined) -> Self {
        SessionEvent::PlayerJoined(event)
    }
}

impl From<PlayerLeft> for SessionEvent {
    fn from(event: PlayerLeft) -> Self {
        SessionEvent::PlayerLeft(event)
    }
}

impl From<FruitExpired> for SessionEvent {
    fn from(event: FruitExpired) -> Self {
        SessionEvent::FruitExpired(event)
    }
}

impl From<FruitCut> for SessionEvent {
    fn from(event: FruitCut) -> Self {
        SessionEvent::FruitCut(event)
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::PlayerJoined(e) => write!(f, "PlayerJoined({})", e.player.id),
            SessionEvent::PlayerLeft(e) => write!(
                f,
                "PlayerLeft({}, total={})",
                e.player.id, e.player.total_cut
            ),
            SessionEvent::FruitExpired(e) => {
                write!(f, "FruitExpired({} at {})", e.kind, e.index)
            }
            SessionEvent::FruitCut(e) => {
                write!(f, "FruitCut({} by {})", e.fruit.kind, e.player)
            }
        }
    }
}
