//! Session Builder API
//!
//! Builder-style setup for consumers (CLI, tests): validate the configuration,
//! create the shared state and event bus, spawn the coordinator and hand back a
//! handle that can inspect and stop the session.

use crate::clock::TokioTimeSource;
use crate::coordinator::{CoordinatorTask, SessionReport};
use fruitcut_core::{
    Fruit, FruitcutError, FruitcutResult, Player, SessionConfig, SessionState, TimeSource,
};
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle, time::Duration};
use tracing::{info, warn};

/// How long `shutdown` waits for the coordinator to acknowledge
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

// ----------------------------------------------------------------------------
// Session Builder
// ----------------------------------------------------------------------------

pub struct SessionBuilder {
    config: SessionConfig,
    clock: Option<Arc<dyn TimeSource>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            clock: None,
        }
    }

    /// Set the session configuration
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default tokio-backed clock
    pub fn with_time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration and start the coordinator
    pub async fn build_and_start(self) -> FruitcutResult<SessionHandle> {
        self.config.validate()?;
        info!(
            "Building session: {} players max, {} fruits on screen",
            self.config.max_players, self.config.max_fruits_on_screen
        );

        let clock: Arc<dyn TimeSource> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(TokioTimeSource::new()),
        };
        let (state, receivers) = SessionState::new(self.config, clock);
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);

        let coordinator = CoordinatorTask::new(state.clone(), receivers, shutdown_receiver);
        let coordinator_handle = tokio::spawn(coordinator.run());

        Ok(SessionHandle {
            state,
            shutdown_sender,
            coordinator_handle: Some(coordinator_handle),
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Session Handle
// ----------------------------------------------------------------------------

/// Handle to a running session
///
/// Dropping the handle also stops the coordinator.
pub struct SessionHandle {
    state: SessionState,
    shutdown_sender: watch::Sender<bool>,
    coordinator_handle: Option<JoinHandle<FruitcutResult<SessionReport>>>,
}

impl SessionHandle {
    /// Shared state of the session
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current players, sorted by identity
    pub async fn players(&self) -> Vec<Player> {
        self.state.registry().snapshot().await
    }

    /// Fruits currently on screen
    pub async fn fruits(&self) -> Vec<Fruit> {
        self.state.queue().snapshot().await
    }

    pub fn is_running(&self) -> bool {
        self.coordinator_handle
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Signal cancellation and wait for the coordinator's report
    ///
    /// Spawned cut and arrival tasks are not waited for.
    pub async fn shutdown(&mut self) -> FruitcutResult<SessionReport> {
        let handle = self
            .coordinator_handle
            .take()
            .ok_or(FruitcutError::Shutdown)?;

        info!("Shutting down session");
        // An error only means the coordinator has already exited
        let _ = self.shutdown_sender.send(true);

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await {
            Ok(joined) => joined?,
            Err(_) => {
                warn!("Coordinator did not stop within {:?}", SHUTDOWN_TIMEOUT);
                Err(FruitcutError::Shutdown)
            }
        }
    }
}
