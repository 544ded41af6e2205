//! HTTP handlers
//!
//! Each handler validates its input, makes one service call and shapes the
//! JSON the game client expects.

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use game_service::{
    model::{DestroyedShipEvent, LeaderboardEntry},
    visual::Rgb,
    DestroyedShipLog, LeaderboardService, RankedEntry, ScoreSubmission, ShipDestruction,
    SubmitOutcome, VisualProfile,
};
use game_store::{DocumentId, Stored};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Context shared across handlers
#[derive(Clone)]
pub struct ApiContext {
    pub leaderboard: LeaderboardService,
    pub destroyed_ships: DestroyedShipLog,
}

impl ApiContext {
    pub fn new(leaderboard: LeaderboardService, destroyed_ships: DestroyedShipLog) -> Self {
        Self {
            leaderboard,
            destroyed_ships,
        }
    }
}

// ============ Response Types ============

/// Hangar ship visual
#[derive(Debug, Serialize, Deserialize)]
pub struct HangarVisualResponse {
    pub sprite_id: u8,
    pub color_base: Rgb,
    pub color_shadow: Rgb,
}

/// Bazaar ship visual
#[derive(Debug, Serialize, Deserialize)]
pub struct BazaarShipResponse {
    pub sprite: u8,
    pub light: Rgb,
    pub mid: Rgb,
    pub dark: Rgb,
}

#[derive(Debug, Serialize)]
pub struct SubmitScoreResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub outcome: SubmitOutcome,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DestroyShipResponse {
    pub message: String,
    pub id: String,
}

// ============ Handlers ============

/// GET /generate_visual
pub async fn handle_generate_visual() -> Json<HangarVisualResponse> {
    let visual = VisualProfile::HANGAR.generate(&mut rand::thread_rng());

    Json(HangarVisualResponse {
        sprite_id: visual.sprite_id,
        color_base: visual.color(0),
        color_shadow: visual.color(1),
    })
}

/// GET /generateShip
pub async fn handle_generate_ship() -> Json<BazaarShipResponse> {
    let visual = VisualProfile::BAZAAR.generate(&mut rand::thread_rng());

    Json(BazaarShipResponse {
        sprite: visual.sprite_id,
        light: visual.color(0),
        mid: visual.color(1),
        dark: visual.color(2),
    })
}

/// GET /leaderboard/:game_mode
pub async fn handle_get_leaderboard(
    State(ctx): State<Arc<ApiContext>>,
    Path(game_mode): Path<String>,
) -> Result<Json<Vec<Stored<LeaderboardEntry>>>, ApiError> {
    tracing::debug!("Leaderboard requested for {}", game_mode);
    let board = ctx.leaderboard.leaderboard(&game_mode)?;
    Ok(Json(board))
}

/// GET /leaderboard/user/:address/:game_mode
pub async fn handle_get_user_rank(
    State(ctx): State<Arc<ApiContext>>,
    Path((address, game_mode)): Path<(String, String)>,
) -> Result<Json<RankedEntry>, ApiError> {
    tracing::debug!("Rank requested for {} in {}", address, game_mode);
    let ranked = ctx.leaderboard.user_rank(&address, &game_mode)?;
    Ok(Json(ranked))
}

/// POST /submit_score
pub async fn handle_submit_score(
    State(ctx): State<Arc<ApiContext>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitScoreResponse>, ApiError> {
    let Json(body) = body?;
    let submission = ScoreSubmission::from_json(&body)?;
    let outcome = ctx.leaderboard.submit_score(submission)?;

    Ok(Json(SubmitScoreResponse {
        message: outcome.message(),
        outcome,
    }))
}

/// POST /destroy_ship
pub async fn handle_destroy_ship(
    State(ctx): State<Arc<ApiContext>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DestroyShipResponse>, ApiError> {
    let Json(body) = body?;
    let destruction = ShipDestruction::from_json(&body)?;
    let id: DocumentId = ctx.destroyed_ships.record(destruction)?;

    Ok(Json(DestroyShipResponse {
        message: "Ship destruction recorded".to_string(),
        id: id.to_string(),
    }))
}

/// GET /user/:address/ships_destroyed
pub async fn handle_get_destroyed_ships(
    State(ctx): State<Arc<ApiContext>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<Stored<DestroyedShipEvent>>>, ApiError> {
    let events = ctx.destroyed_ships.list(&address)?;
    Ok(Json(events))
}

/// GET /health
pub async fn handle_get_health() -> Json<&'static str> {
    Json("ok")
}
