//! Game Service - leaderboard, destroyed-ship log and ship visuals
//!
//! Stateless services over injected `game_store` collections:
//! - `LeaderboardService`: score submission, per-mode boards, user rank
//! - `DestroyedShipLog`: append-only destruction events per address
//! - `visual`: random sprite/colour parameters for ship rendering

pub mod destroyed_ships;
pub mod error;
pub mod leaderboard;
pub mod model;
pub mod validation;
pub mod visual;

#[cfg(test)]
mod tests;

pub use destroyed_ships::DestroyedShipLog;
pub use error::{ServiceError, ServiceResult};
pub use leaderboard::{LeaderboardService, RankedEntry, SubmitOutcome};
pub use model::{DestroyedShipEvent, GameMode, LeaderboardEntry, Numeric};
pub use validation::{ScoreSubmission, ShipDestruction};
pub use visual::{Palette, Rgb, ShipVisual, VisualProfile};
