//! Session clock backed by the tokio timer
//!
//! Fruit timestamps must advance in step with the scheduler's intervals, including
//! when tokio time is paused in tests, so the clock reads tokio's `Instant` and
//! anchors it to the wall clock once at construction.

use fruitcut_core::{TimeSource, Timestamp};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct TokioTimeSource {
    wall_base: Timestamp,
    instant_base: Instant,
}

impl TokioTimeSource {
    pub fn new() -> Self {
        Self {
            wall_base: Timestamp::now(),
            instant_base: Instant::now(),
        }
    }
}

impl Default for TokioTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for TokioTimeSource {
    fn now(&self) -> Timestamp {
        self.wall_base + self.instant_base.elapsed().as_millis() as u64
    }
}
