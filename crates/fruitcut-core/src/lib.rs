//! Fruitcut Core
//!
//! Shared state and messaging primitives for a simulated multiplayer fruit-cutting
//! session:
//! - `FruitQueue`: bounded on-screen fruits with spawn, expiry sweep and consume
//! - `PlayerRegistry`: active players and their cut statistics
//! - `channel`: the four bounded event channels feeding the coordinator
//! - `SessionState`: the queue, registry and publisher bundled for the runtime
//!
//! The scheduling and coordination live in `fruitcut-runtime`.

pub mod channel;
pub mod config;
pub mod errors;
pub mod queue;
pub mod registry;
pub mod session;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use channel::{
    create_event_bus, EventPublisher, EventReceivers, FruitCut, FruitExpired, PlayerJoined,
    PlayerLeft, SessionEvent,
};
pub use config::{ArrivalConfig, ChannelConfig, DeparturePolicy, SessionConfig, TimerConfig};
pub use errors::{FruitcutError, FruitcutResult};
pub use queue::FruitQueue;
pub use registry::{JoinOutcome, PlayerRegistry};
pub use session::SessionState;
pub use types::{
    Fruit, FruitKind, ManualTimeSource, Player, PlayerId, TimeSource, Timestamp, PLANETS,
};
