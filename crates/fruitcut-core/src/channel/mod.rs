//! Channel Module
//!
//! The event bus between the session structures and the coordinator:
//! - `communication`: the event types carried by the bus
//! - `utils`: channel construction, the publisher handle and the receiver set

pub mod communication;
pub mod utils;

pub use communication::{FruitCut, FruitExpired, PlayerJoined, PlayerLeft, SessionEvent};

pub use crate::config::ChannelConfig;

pub use utils::{
    create_event_bus, CutReceiver, CutSender, EventPublisher, EventReceivers, ExpiryReceiver,
    ExpirySender, JoinReceiver, JoinSender, LeaveReceiver, LeaveSender,
};
