//! Game Service State
//!
//! Documents stored in the `leaderboard` and `destroyed_ships` collections.
//! Field names match what the game client reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Leaderboard partition
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    Free,
    Competitive,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Free, GameMode::Competitive];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Free => "FREE",
            GameMode::Competitive => "COMPETITIVE",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGameMode(pub String);

impl fmt::Display for UnknownGameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game mode {:?}", self.0)
    }
}

impl std::error::Error for UnknownGameMode {}

impl FromStr for GameMode {
    type Err = UnknownGameMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownGameMode(s.to_string()))
    }
}

/// Non-negative number that may be integral or fractional
///
/// Integral values go back out on the wire as JSON integers, so a score
/// submitted as `100` is reported as `100`, not `100.0`.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[serde(transparent)]
pub struct Numeric(f64);

impl Numeric {
    /// Largest integer f64 represents exactly
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    /// `None` for negative, NaN or infinite values
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    fn as_integer(&self) -> Option<u64> {
        (self.0.fract() == 0.0 && self.0 <= Self::MAX_EXACT).then_some(self.0 as u64)
    }
}

impl From<u32> for Numeric {
    fn from(value: u32) -> Self {
        Self(value as f64)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integer() {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Binary encodings always carry the raw f64
        match self.as_integer() {
            Some(n) if serializer.is_human_readable() => serializer.serialize_u64(n),
            _ => serializer.serialize_f64(self.0),
        }
    }
}

/// One player's best run in one game mode
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LeaderboardEntry {
    /// Player wallet address
    pub address: String,
    pub score: Numeric,
    pub combo: u64,
    pub game_mode: GameMode,
    /// Set by the server on every insert or update
    pub timestamp: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn belongs_to(&self, address: &str, game_mode: &str) -> bool {
        self.address == address && self.game_mode.as_str() == game_mode
    }
}

/// A ship destroyed in play
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DestroyedShipEvent {
    /// Owner address
    pub address: String,
    /// Ship token id
    #[serde(rename = "id_ship")]
    pub ship_id: Numeric,
}
