//! Session runner for the CLI
//!
//! Starts a session, waits for Ctrl-C or the configured duration, shuts the
//! session down and logs the final scoreboard.

use crate::config::AppConfig;
use crate::error::Result;
use fruitcut_runtime::{SessionBuilder, SessionHandle, SessionReport};
use std::time::Duration;
use tracing::info;

pub struct FruitcutApp {
    config: AppConfig,
}

impl FruitcutApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run a session until interrupted or `duration` elapses
    pub async fn run(self, duration: Option<Duration>) -> Result<SessionReport> {
        info!("Fruit Cutting App Started!");

        let mut session = SessionBuilder::new()
            .with_config(self.config.session.clone())
            .build_and_start()
            .await?;

        match duration {
            Some(duration) => {
                info!("Running for {:?}", duration);
                tokio::select! {
                    _ = tokio::time::sleep(duration) => {}
                    signal = tokio::signal::ctrl_c() => signal?,
                }
            }
            None => {
                info!("Running until Ctrl-C");
                tokio::signal::ctrl_c().await?;
            }
        }

        log_scoreboard(&session).await;
        let report = session.shutdown().await?;
        info!(
            "Session summary: {} joined, {} left, {} spawned, {} cut, {} expired",
            report.players_joined,
            report.players_left,
            report.fruits_spawned,
            report.fruits_cut,
            report.fruits_expired
        );
        Ok(report)
    }
}

async fn log_scoreboard(session: &SessionHandle) {
    let players = session.players().await;
    if players.is_empty() {
        info!("No players left on the scoreboard");
        return;
    }

    info!("Final scoreboard ({} players):", players.len());
    for player in players {
        info!(
            "  {} | Total fruits cut: {} | Fruits: [{}]",
            player.id,
            player.total_cut,
            player.cut_glyphs()
        );
    }
}
