//! Fruitcut CLI Configuration
//!
//! Layered the usual way: built-in defaults, then an optional TOML file, then
//! command-line overrides. Validation runs once every layer is applied.
//! `--fast` replaces the timing values (timers, arrival spacing, expiry
//! threshold) with the ten-times-faster preset, whatever the file said.
//!
//! ```toml
//! verbose = true
//!
//! [session]
//! max_players = 12
//! departure_policy = "uniform"
//!
//! [session.timers]
//! spawn_ms = 2500
//! ```

use crate::cli::Cli;
use crate::error::{CliError, Result};
use fruitcut_core::{DeparturePolicy, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration for the CLI application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Enable verbose logging output
    pub verbose: bool,

    /// Session tunables
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CliError::Config(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply command line overrides on top of the loaded values
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if cli.verbose {
            self.verbose = true;
        }
        if cli.fast {
            let fast = SessionConfig::fast();
            self.session.timers = fast.timers;
            self.session.arrivals.arrival_spacing_ms = fast.arrivals.arrival_spacing_ms;
            self.session.expiry_threshold_ms = fast.expiry_threshold_ms;
        }
        if let Some(max_players) = cli.max_players {
            self.session.max_players = max_players;
        }
        if let Some(max_fruits) = cli.max_fruits {
            self.session.max_fruits_on_screen = max_fruits;
            // Keep the expiry channel able to hold a full sweep
            if self.session.channels.expiry_buffer_size < max_fruits {
                self.session.channels.expiry_buffer_size = max_fruits;
            }
        }
        if cli.uniform_departures {
            self.session.departure_policy = DeparturePolicy::Uniform;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.session.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [session]
            max_players = 12
            departure_policy = "uniform"

            [session.timers]
            spawn_ms = 2500
            "#,
        )
        .expect("valid toml");

        assert!(!config.verbose);
        assert_eq!(config.session.max_players, 12);
        assert_eq!(config.session.departure_policy, DeparturePolicy::Uniform);
        assert_eq!(config.session.timers.spawn_ms, 2500);
        assert_eq!(config.session.timers.cut_attempt_ms, 1000);
        assert_eq!(config.session.max_fruits_on_screen, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let result = AppConfig::from_toml_str("[session]\nmax_players = \"many\"");
        assert!(matches!(result, Err(CliError::TomlParsing(_))));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = AppConfig::default();
        let cli = Cli::parse_from(["fruitcut", "-v", "--max-fruits", "12", "--max-players", "3"]);
        config.apply_overrides(&cli);

        assert!(config.verbose);
        assert_eq!(config.session.max_players, 3);
        assert_eq!(config.session.max_fruits_on_screen, 12);
        assert_eq!(config.session.channels.expiry_buffer_size, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fast_preset_keeps_capacities_from_file() {
        let mut config = AppConfig::from_toml_str(
            r#"
            [session]
            max_players = 7

            [session.timers]
            spawn_ms = 9000
            "#,
        )
        .expect("valid toml");
        let cli = Cli::parse_from(["fruitcut", "--fast"]);
        config.apply_overrides(&cli);

        let fast = SessionConfig::fast();
        assert_eq!(config.session.max_players, 7);
        assert_eq!(config.session.timers, fast.timers);
        assert_eq!(config.session.timers.spawn_ms, 500);
        assert_eq!(config.session.arrivals.arrival_spacing_ms, 200);
        assert_eq!(config.session.expiry_threshold_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let mut config = AppConfig::default();
        let cli = Cli::parse_from(["fruitcut", "--max-players", "0"]);
        config.apply_overrides(&cli);

        assert!(matches!(config.validate(), Err(CliError::Core(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::load_from_file("/definitely/not/here/fruitcut.toml");
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
