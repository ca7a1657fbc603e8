//! Core types for the Fruitcut session
//!
//! Players, fruits and the clock abstraction shared by the queue, the registry and
//! the runtime. Identities use newtypes so a player name cannot be confused with a
//! plain string elsewhere in the API.

use core::fmt;
use core::ops::{Add, Sub};
use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

// ----------------------------------------------------------------------------
// Player Identifier
// ----------------------------------------------------------------------------

/// Planet prefixes used for synthetic player identities
pub const PLANETS: [&str; 8] = [
    "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
];

/// Identity of a player, unique within a registry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Build a synthetic identity of the form `<planet>_<suffix>`
    pub fn synthetic(planet: &str, suffix: usize) -> Self {
        Self(format!("{}_{}", planet, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ----------------------------------------------------------------------------
// Fruit Kinds
// ----------------------------------------------------------------------------

/// The fixed alphabet of fruit labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Orange,
    Banana,
    Grapes,
    Melon,
    Watermelon,
    Avocado,
    Strawberry,
    Cherries,
    Pineapple,
    Pie,
}

impl FruitKind {
    /// Every kind, in glyph-table order
    pub const ALL: [FruitKind; 11] = [
        FruitKind::Apple,
        FruitKind::Orange,
        FruitKind::Banana,
        FruitKind::Grapes,
        FruitKind::Melon,
        FruitKind::Watermelon,
        FruitKind::Avocado,
        FruitKind::Strawberry,
        FruitKind::Cherries,
        FruitKind::Pineapple,
        FruitKind::Pie,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            FruitKind::Apple => "🍎",
            FruitKind::Orange => "🍊",
            FruitKind::Banana => "🍌",
            FruitKind::Grapes => "🍇",
            FruitKind::Melon => "🍈",
            FruitKind::Watermelon => "🍉",
            FruitKind::Avocado => "🥑",
            FruitKind::Strawberry => "🍓",
            FruitKind::Cherries => "🍒",
            FruitKind::Pineapple => "🍍",
            FruitKind::Pie => "🥧",
        }
    }
}

impl fmt::Display for FruitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

// ----------------------------------------------------------------------------
// Fruit
// ----------------------------------------------------------------------------

/// Upper bound (exclusive) for randomly drawn fruit ids
pub const FRUIT_ID_RANGE: u16 = 1000;

/// A timed consumable sitting in the on-screen queue
///
/// `id` is random and may collide with another fruit's id; it only shows up in logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fruit {
    pub kind: FruitKind,
    pub spawned_at: Timestamp,
    pub id: u16,
}

impl Fruit {
    pub fn new(kind: FruitKind, spawned_at: Timestamp, id: u16) -> Self {
        Self {
            kind,
            spawned_at,
            id,
        }
    }

    /// Whether the fruit has been on screen for longer than `threshold` at `now`
    pub fn is_expired(&self, now: Timestamp, threshold: Duration) -> bool {
        now - self.spawned_at > threshold.as_millis() as u64
    }
}

// ----------------------------------------------------------------------------
// Player
// ----------------------------------------------------------------------------

/// A participant and the fruits they have cut so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub total_cut: u32,
    pub cut_fruits: Vec<FruitKind>,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            total_cut: 0,
            cut_fruits: Vec::new(),
        }
    }

    pub(crate) fn record_cut(&mut self, kind: FruitKind) {
        self.total_cut += 1;
        self.cut_fruits.push(kind);
    }

    /// Glyphs of every fruit cut, in cut order
    pub fn cut_glyphs(&self) -> String {
        self.cut_fruits.iter().map(|kind| kind.glyph()).collect()
    }
}

// ----------------------------------------------------------------------------
// Timestamp
// ----------------------------------------------------------------------------

/// Milliseconds since the UNIX epoch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Add<u64> for Timestamp {
    type Output = Timestamp;

    fn add(self, other: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(other))
    }
}

impl Sub for Timestamp {
    type Output = u64;

    fn sub(self, other: Timestamp) -> u64 {
        self.0.saturating_sub(other.0)
    }
}

impl Timestamp {
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as u64)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs_of_day = (self.0 / 1000) % 86_400;
        write!(
            f,
            "{:02}:{:02}:{:02}",
            secs_of_day / 3600,
            (secs_of_day / 60) % 60,
            secs_of_day % 60
        )
    }
}

// ----------------------------------------------------------------------------
// Time Source
// ----------------------------------------------------------------------------

/// Clock abstraction so spawn and expiry can be driven deterministically in tests
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Manually advanced clock
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    millis: AtomicU64,
}

impl ManualTimeSource {
    pub fn new(start: Timestamp) -> Self {
        Self {
            millis: AtomicU64::new(start.as_millis()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp(self.millis.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_player_id_format() {
        let id = PlayerId::synthetic(PLANETS[3], 17);
        assert_eq!(id.as_str(), "Mars_17");
        assert_eq!(id.to_string(), "Mars_17");
    }

    #[test]
    fn test_fruit_expiry_boundary() {
        let fruit = Fruit::new(FruitKind::Apple, Timestamp::new(10_000), 7);
        let threshold = Duration::from_secs(5);

        assert!(!fruit.is_expired(Timestamp::new(15_000), threshold));
        assert!(fruit.is_expired(Timestamp::new(15_001), threshold));
        // Clock skew backwards never expires anything
        assert!(!fruit.is_expired(Timestamp::new(1_000), threshold));
    }

    #[test]
    fn test_player_records_cuts_in_order() {
        let mut player = Player::new(PlayerId::new("Venus_2"));
        player.record_cut(FruitKind::Banana);
        player.record_cut(FruitKind::Pie);

        assert_eq!(player.total_cut, 2);
        assert_eq!(player.cut_fruits, vec![FruitKind::Banana, FruitKind::Pie]);
        assert_eq!(player.cut_glyphs(), "🍌🥧");
    }

    #[test]
    fn test_manual_time_source() {
        let clock = ManualTimeSource::new(Timestamp::new(1_000));
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Timestamp::new(1_250));
        // Reading does not move the clock
        assert_eq!(clock.now(), Timestamp::new(1_250));
    }

    #[test]
    fn test_timestamp_display_is_time_of_day() {
        // 01:02:03 past midnight
        let ts = Timestamp::new((3600 + 120 + 3) * 1000);
        assert_eq!(ts.to_string(), "01:02:03");
    }
}
