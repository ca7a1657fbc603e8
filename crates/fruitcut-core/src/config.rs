//! Session Configuration
//!
//! All tunables of a session live here: capacities, timer periods, arrival pacing
//! and the event channel buffer sizes. Durations are stored as milliseconds so the
//! structures map directly onto flat TOML keys.

use crate::errors::{FruitcutError, FruitcutResult};
use core::time::Duration;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Defaults
// ----------------------------------------------------------------------------

/// Maximum concurrent players, also the bound of the synthetic identity suffix
pub const DEFAULT_MAX_PLAYERS: usize = 20;
/// Maximum fruits visible at once
pub const DEFAULT_MAX_FRUITS_ON_SCREEN: usize = 5;
/// Age after which an uncut fruit is swept away
pub const DEFAULT_EXPIRY_THRESHOLD_MS: u64 = 5_000;
/// Buffer size shared by the four event channels
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 10;

// ----------------------------------------------------------------------------
// Timer Configuration
// ----------------------------------------------------------------------------

/// Periods of the five independent session timers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Expiry sweep period
    pub expiry_sweep_ms: u64,
    /// Fruit spawn period
    pub spawn_ms: u64,
    /// Cut attempt period
    pub cut_attempt_ms: u64,
    /// Synthetic arrival period
    pub arrival_ms: u64,
    /// Synthetic departure period
    pub departure_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            expiry_sweep_ms: 3_000,
            spawn_ms: 5_000,
            cut_attempt_ms: 1_000,
            arrival_ms: 2_000,
            departure_ms: 10_000,
        }
    }
}

impl TimerConfig {
    pub fn expiry_sweep(&self) -> Duration {
        Duration::from_millis(self.expiry_sweep_ms)
    }

    pub fn spawn(&self) -> Duration {
        Duration::from_millis(self.spawn_ms)
    }

    pub fn cut_attempt(&self) -> Duration {
        Duration::from_millis(self.cut_attempt_ms)
    }

    pub fn arrival(&self) -> Duration {
        Duration::from_millis(self.arrival_ms)
    }

    pub fn departure(&self) -> Duration {
        Duration::from_millis(self.departure_ms)
    }

    fn validate(&self) -> FruitcutResult<()> {
        let periods = [
            ("expiry_sweep_ms", self.expiry_sweep_ms),
            ("spawn_ms", self.spawn_ms),
            ("cut_attempt_ms", self.cut_attempt_ms),
            ("arrival_ms", self.arrival_ms),
            ("departure_ms", self.departure_ms),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(FruitcutError::config_error(format!(
                    "Timer period {} cannot be zero",
                    name
                )));
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Arrival Configuration
// ----------------------------------------------------------------------------

/// Pacing of synthetic arrival bursts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Join attempts launched per arrival firing
    pub arrivals_per_burst: usize,
    /// Delay between two join attempts of the same burst
    pub arrival_spacing_ms: u64,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            arrivals_per_burst: 5,
            arrival_spacing_ms: 2_000,
        }
    }
}

impl ArrivalConfig {
    pub fn arrival_spacing(&self) -> Duration {
        Duration::from_millis(self.arrival_spacing_ms)
    }
}

// ----------------------------------------------------------------------------
// Channel Configuration
// ----------------------------------------------------------------------------

/// Buffer sizes of the four event channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Buffer size for player joined notifications
    pub join_buffer_size: usize,
    /// Buffer size for player left notifications
    pub leave_buffer_size: usize,
    /// Buffer size for fruit expired notifications
    pub expiry_buffer_size: usize,
    /// Buffer size for fruit cut notifications
    pub cut_buffer_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl ChannelConfig {
    /// Same buffer size for every channel
    pub fn uniform(size: usize) -> Self {
        Self {
            join_buffer_size: size,
            leave_buffer_size: size,
            expiry_buffer_size: size,
            cut_buffer_size: size,
        }
    }

    /// Create configuration optimized for testing
    pub fn testing() -> Self {
        Self::uniform(100)
    }
}

// ----------------------------------------------------------------------------
// Departure Policy
// ----------------------------------------------------------------------------

/// How the synthetic departure picks the player that leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeparturePolicy {
    /// First member in the registry's iteration order
    #[default]
    Arbitrary,
    /// Uniform draw over the current membership
    Uniform,
}

// ----------------------------------------------------------------------------
// Session Configuration
// ----------------------------------------------------------------------------

/// Complete configuration of one arcade session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Registry capacity and exclusive bound of synthetic identity suffixes
    pub max_players: usize,
    /// Queue capacity
    pub max_fruits_on_screen: usize,
    /// Age (strictly) beyond which a fruit expires
    pub expiry_threshold_ms: u64,
    pub timers: TimerConfig,
    pub arrivals: ArrivalConfig,
    pub channels: ChannelConfig,
    pub departure_policy: DeparturePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            max_fruits_on_screen: DEFAULT_MAX_FRUITS_ON_SCREEN,
            expiry_threshold_ms: DEFAULT_EXPIRY_THRESHOLD_MS,
            timers: TimerConfig::default(),
            arrivals: ArrivalConfig::default(),
            channels: ChannelConfig::default(),
            departure_policy: DeparturePolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Short timers and roomy channels for tests
    pub fn testing() -> Self {
        Self {
            timers: TimerConfig {
                expiry_sweep_ms: 30,
                spawn_ms: 50,
                cut_attempt_ms: 10,
                arrival_ms: 20,
                departure_ms: 100,
            },
            arrivals: ArrivalConfig {
                arrivals_per_burst: 2,
                arrival_spacing_ms: 5,
            },
            channels: ChannelConfig::testing(),
            expiry_threshold_ms: 50,
            ..Self::default()
        }
    }

    /// Every timer ten times faster than the default
    pub fn fast() -> Self {
        let defaults = Self::default();
        Self {
            expiry_threshold_ms: defaults.expiry_threshold_ms / 10,
            timers: TimerConfig {
                expiry_sweep_ms: defaults.timers.expiry_sweep_ms / 10,
                spawn_ms: defaults.timers.spawn_ms / 10,
                cut_attempt_ms: defaults.timers.cut_attempt_ms / 10,
                arrival_ms: defaults.timers.arrival_ms / 10,
                departure_ms: defaults.timers.departure_ms / 10,
            },
            arrivals: ArrivalConfig {
                arrival_spacing_ms: defaults.arrivals.arrival_spacing_ms / 10,
                ..defaults.arrivals.clone()
            },
            ..defaults
        }
    }

    pub fn expiry_threshold(&self) -> Duration {
        Duration::from_millis(self.expiry_threshold_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> FruitcutResult<()> {
        if self.max_players == 0 {
            return Err(FruitcutError::config_error("max_players cannot be zero"));
        }
        if self.max_fruits_on_screen == 0 {
            return Err(FruitcutError::config_error(
                "max_fruits_on_screen cannot be zero",
            ));
        }

        let channels = &self.channels;
        if channels.join_buffer_size == 0
            || channels.leave_buffer_size == 0
            || channels.cut_buffer_size == 0
        {
            return Err(FruitcutError::config_error(
                "Event buffer sizes cannot be zero",
            ));
        }
        // A single sweep may expire the whole queue while the coordinator is the one
        // running it, so the expiry channel must hold a full queue worth of events.
        if channels.expiry_buffer_size < self.max_fruits_on_screen {
            return Err(FruitcutError::config_error(format!(
                "expiry_buffer_size ({}) must be at least max_fruits_on_screen ({})",
                channels.expiry_buffer_size, self.max_fruits_on_screen
            )));
        }

        self.timers.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_players, 20);
        assert_eq!(config.max_fruits_on_screen, 5);
        assert_eq!(config.expiry_threshold(), Duration::from_secs(5));
        assert_eq!(config.timers.cut_attempt(), Duration::from_secs(1));
        assert_eq!(config.departure_policy, DeparturePolicy::Arbitrary);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(SessionConfig::testing().validate().is_ok());

        let fast = SessionConfig::fast();
        assert!(fast.validate().is_ok());
        assert_eq!(fast.timers.spawn_ms, 500);
        assert_eq!(fast.arrivals.arrivals_per_burst, 5);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = SessionConfig {
            max_players: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FruitcutError::Configuration { .. })
        ));

        let config = SessionConfig {
            max_fruits_on_screen: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expiry_buffer_must_hold_full_queue() {
        let mut config = SessionConfig::default();
        config.max_fruits_on_screen = 8;
        config.channels.expiry_buffer_size = 4;
        assert!(config.validate().is_err());

        config.channels.expiry_buffer_size = 8;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timer_rejected() {
        let mut config = SessionConfig::default();
        config.timers.departure_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("departure_ms"));
    }
}
