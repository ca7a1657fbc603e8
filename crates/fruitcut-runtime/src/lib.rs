//! Fruitcut Runtime
//!
//! Drives a session built from `fruitcut-core`:
//! - `Scheduler`: the five periodic session timers
//! - `CoordinatorTask`: the single loop consuming the event bus and the timers
//! - `tasks`: synthetic arrivals, departures and cut attempts
//! - `SessionBuilder` / `SessionHandle`: start, inspect and stop a session

pub mod builder;
pub mod clock;
pub mod coordinator;
pub mod scheduler;
pub mod tasks;

pub use builder::{SessionBuilder, SessionHandle};
pub use clock::TokioTimeSource;
pub use coordinator::{CoordinatorTask, SessionReport};
pub use scheduler::{Scheduler, TimerKind};

// Re-export core types for convenience
pub use fruitcut_core::{
    DeparturePolicy, Fruit, FruitKind, FruitcutError, FruitcutResult, Player, PlayerId,
    SessionConfig, SessionEvent, SessionState,
};
