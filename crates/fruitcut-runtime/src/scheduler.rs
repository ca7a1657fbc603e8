//! Session Scheduler
//!
//! Five independent periodic timers. `next` waits for whichever fires first; the
//! timers never wait on each other and a slow reaction only delays later ticks of
//! the same timer.

use fruitcut_core::TimerConfig;
use std::fmt;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// Which timer fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    ExpirySweep,
    Spawn,
    CutAttempt,
    Arrival,
    Departure,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerKind::ExpirySweep => "expiry-sweep",
            TimerKind::Spawn => "spawn",
            TimerKind::CutAttempt => "cut-attempt",
            TimerKind::Arrival => "arrival",
            TimerKind::Departure => "departure",
        };
        f.write_str(name)
    }
}

/// First tick one full period after creation, like a plain ticker
fn periodic(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

pub struct Scheduler {
    expiry_sweep: Interval,
    spawn: Interval,
    cut_attempt: Interval,
    arrival: Interval,
    departure: Interval,
}

impl Scheduler {
    /// Start all five timers; must be called from within a tokio runtime
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            expiry_sweep: periodic(config.expiry_sweep()),
            spawn: periodic(config.spawn()),
            cut_attempt: periodic(config.cut_attempt()),
            arrival: periodic(config.arrival()),
            departure: periodic(config.departure()),
        }
    }

    /// Wait for the next timer firing
    ///
    /// Cancel safe: dropping the future loses no tick.
    pub async fn next(&mut self) -> TimerKind {
        tokio::select! {
            _ = self.expiry_sweep.tick() => TimerKind::ExpirySweep,
            _ = self.spawn.tick() => TimerKind::Spawn,
            _ = self.cut_attempt.tick() => TimerKind::CutAttempt,
            _ = self.arrival.tick() => TimerKind::Arrival,
            _ = self.departure.tick() => TimerKind::Departure,
        }
    }
}
