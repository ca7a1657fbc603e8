//! Simulation tasks
//!
//! The reactions behind the arrival, cut-attempt and departure timers. Arrivals and
//! cuts run as unsupervised spawned tasks; their only channel back to the
//! coordinator is the event bus. Nobody waits for them at shutdown, and whatever
//! they touch after a player has gone turns into a no-op.

use fruitcut_core::{
    DeparturePolicy, FruitCut, JoinOutcome, Player, PlayerId, SessionState, PLANETS,
};
use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info};

// ----------------------------------------------------------------------------
// Synthetic Arrivals
// ----------------------------------------------------------------------------

/// Draw a candidate identity `<planet>_<n>` with `n` in `[0, max_suffix)`
pub fn random_identity(max_suffix: usize) -> PlayerId {
    let mut rng = rand::thread_rng();
    let planet = PLANETS[rng.gen_range(0..PLANETS.len())];
    let suffix = rng.gen_range(0..max_suffix.max(1));
    PlayerId::synthetic(planet, suffix)
}

/// Try to register one synthetic player
///
/// A collision abandons the attempt; there is no retry.
pub async fn attempt_arrival(state: SessionState) -> JoinOutcome {
    let id = random_identity(state.config().max_players);
    let outcome = state.registry().join(Player::new(id.clone())).await;

    match outcome {
        JoinOutcome::Joined => info!("Player id generated: {}", id),
        JoinOutcome::Collision => {
            info!("Player id {} already exists, abandoning this arrival", id)
        }
        JoinOutcome::Full => info!("Registry filled up before {} could join", id),
    }
    outcome
}

/// Launch one arrival burst in the background
pub fn spawn_arrival_burst(state: SessionState) -> JoinHandle<()> {
    tokio::spawn(arrival_burst(state))
}

/// Start `arrivals_per_burst` join attempts, spaced apart, if the registry has room
///
/// The size check is a plain read; a burst that races other joins past capacity is
/// stopped by the registry itself.
pub async fn arrival_burst(state: SessionState) {
    debug!("Initiating arrival burst");

    let size = state.registry().len().await;
    if size >= state.registry().capacity() {
        info!("No available slots to join at the moment");
        return;
    }

    let arrivals = state.config().arrivals.clone();
    for attempt in 0..arrivals.arrivals_per_burst {
        tokio::spawn(attempt_arrival(state.clone()));
        if attempt + 1 < arrivals.arrivals_per_burst {
            tokio::time::sleep(arrivals.arrival_spacing()).await;
        }
    }
}

// ----------------------------------------------------------------------------
// Cut Attempts
// ----------------------------------------------------------------------------

/// Pick a random player and a random fruit index, then cut in a spawned task
///
/// Returns the handle of the spawned cut, or `None` when there was nobody to cut
/// or nothing to cut. The selection may be stale by the time the task runs.
pub async fn attempt_cut(state: &SessionState) -> Option<JoinHandle<Option<FruitCut>>> {
    let Some(player) = state.registry().random_active_member().await else {
        info!("No players available for fruit cutting at the moment");
        return None;
    };

    let len = state.queue().len().await;
    if len == 0 {
        debug!("No fruit on screen for {} to cut", player.id);
        return None;
    }

    info!("Attempting to cut a fruit for {}", player.id);
    let index = rand::thread_rng().gen_range(0..len);
    let state = state.clone();
    Some(tokio::spawn(async move {
        state.cut_fruit(&player.id, index).await
    }))
}

// ----------------------------------------------------------------------------
// Synthetic Departures
// ----------------------------------------------------------------------------

/// Remove one player when more than one is present
pub async fn simulate_departure(state: &SessionState) -> Option<Player> {
    debug!("Simulating player leave");

    if state.registry().len().await <= 1 {
        return None;
    }

    let candidate = match state.config().departure_policy {
        DeparturePolicy::Arbitrary => state.registry().any_member().await,
        DeparturePolicy::Uniform => state.registry().random_active_member().await,
    }?;

    state.registry().leave(&candidate.id).await
}
