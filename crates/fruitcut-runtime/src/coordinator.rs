//! Coordinator Task
//!
//! The single consumer of the event bus and the only driver of the scheduler.
//! One biased `select!` serializes everything: the cancellation signal first, then
//! the four event channels, then the timers. Each reaction runs to completion
//! before the next one is picked; only the cut and arrival work it spawns runs
//! alongside.
//!
//! Draining channels ahead of timers also keeps the inline sweep and departure
//! from ever waiting on their own (just emptied) channels.

use crate::scheduler::{Scheduler, TimerKind};
use crate::tasks;
use fruitcut_core::{
    EventReceivers, FruitCut, FruitExpired, FruitcutResult, PlayerJoined, PlayerLeft,
    SessionState,
};
use tokio::sync::watch;
use tracing::{debug, info};

/// Counters accumulated by the coordinator over one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub players_joined: u64,
    pub players_left: u64,
    pub fruits_spawned: u64,
    pub fruits_expired: u64,
    pub fruits_cut: u64,
    pub timer_firings: u64,
}

pub struct CoordinatorTask {
    state: SessionState,
    receivers: EventReceivers,
    scheduler: Scheduler,
    shutdown: watch::Receiver<bool>,
    report: SessionReport,
}

impl CoordinatorTask {
    /// Create the coordinator; its timers start counting immediately
    pub fn new(
        state: SessionState,
        receivers: EventReceivers,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let scheduler = Scheduler::new(&state.config().timers);
        Self {
            state,
            receivers,
            scheduler,
            shutdown,
            report: SessionReport::default(),
        }
    }

    /// Run until the shutdown signal is raised or its sender is dropped
    pub async fn run(mut self) -> FruitcutResult<SessionReport> {
        info!("Fruit cutting session started");

        while !*self.shutdown.borrow() {
            tokio::select! {
                biased;

                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        debug!("Shutdown sender dropped");
                        break;
                    }
                }

                Some(event) = self.receivers.joined.recv() => self.on_player_joined(event),
                Some(event) = self.receivers.left.recv() => self.on_player_left(event),
                Some(event) = self.receivers.expired.recv() => self.on_fruit_expired(event),
                Some(event) = self.receivers.cut.recv() => self.on_fruit_cut(event),

                kind = self.scheduler.next() => self.on_timer(kind).await,
            }
        }

        info!("Fruit cutting session stopped: {:?}", self.report);
        Ok(self.report)
    }

    fn on_player_joined(&mut self, event: PlayerJoined) {
        self.report.players_joined += 1;
        info!("New player joined: {}", event.player.id);
    }

    fn on_player_left(&mut self, event: PlayerLeft) {
        self.report.players_left += 1;
        let player = event.player;
        info!(
            "Player left: {} | Total fruits cut: {} | Fruits: [{}]",
            player.id,
            player.total_cut,
            player.cut_glyphs()
        );
    }

    fn on_fruit_expired(&mut self, event: FruitExpired) {
        self.report.fruits_expired += 1;
        info!(
            "Timeout! Removing uncut fruit {} (id {}) from slot {}",
            event.kind, event.fruit_id, event.index
        );
    }

    fn on_fruit_cut(&mut self, event: FruitCut) {
        self.report.fruits_cut += 1;
        info!(
            "{} has cut {} fruits so far (latest {})",
            event.player, event.total_cut, event.fruit.kind
        );
    }

    async fn on_timer(&mut self, kind: TimerKind) {
        self.report.timer_firings += 1;
        debug!("Timer fired: {}", kind);

        match kind {
            TimerKind::ExpirySweep => {
                self.state.sweep_expired().await;
            }
            TimerKind::Spawn => {
                self.report.fruits_spawned += self.state.queue().spawn().await as u64;
            }
            TimerKind::CutAttempt => {
                // Fire and forget: the outcome comes back over the cut channel
                let _ = tasks::attempt_cut(&self.state).await;
            }
            TimerKind::Arrival => {
                let _ = tasks::spawn_arrival_burst(self.state.clone());
            }
            TimerKind::Departure => {
                tasks::simulate_departure(&self.state).await;
            }
        }
    }
}
