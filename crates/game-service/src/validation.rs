//! Request validation
//!
//! Turns raw JSON bodies into typed requests. Presence of every required
//! field is checked first, then field types in declaration order; the first
//! failure is reported by name.

use crate::error::{ServiceError, ServiceResult};
use crate::model::{GameMode, Numeric};
use serde_json::{Map, Value};

/// Validated `POST /submit_score` body
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreSubmission {
    pub address: String,
    pub score: Numeric,
    pub combo: u64,
    pub game_mode: GameMode,
}

/// Validated `POST /destroy_ship` body
#[derive(Clone, Debug, PartialEq)]
pub struct ShipDestruction {
    pub address: String,
    pub ship_id: Numeric,
}

const SCORE_FIELDS: [&str; 4] = ["address", "score", "combo", "game_mode"];
const DESTROY_FIELDS: [&str; 2] = ["address", "id_ship"];

impl ScoreSubmission {
    pub fn from_json(body: &Value) -> ServiceResult<Self> {
        let fields = require_fields(body, &SCORE_FIELDS)?;

        let address = address_field(fields)?;
        let score = non_negative_number(fields, "score")?;
        let combo = fields["combo"]
            .as_u64()
            .ok_or_else(|| ServiceError::invalid("combo must be a non-negative integer"))?;
        let game_mode = fields["game_mode"]
            .as_str()
            .and_then(|mode| mode.parse::<GameMode>().ok())
            .ok_or_else(|| ServiceError::invalid("game_mode must be FREE or COMPETITIVE"))?;

        Ok(Self {
            address,
            score,
            combo,
            game_mode,
        })
    }
}

impl ShipDestruction {
    pub fn from_json(body: &Value) -> ServiceResult<Self> {
        let fields = require_fields(body, &DESTROY_FIELDS)?;

        let address = address_field(fields)?;
        let ship_id = non_negative_number(fields, "id_ship")?;

        Ok(Self { address, ship_id })
    }
}

fn require_fields<'a>(body: &'a Value, required: &[&str]) -> ServiceResult<&'a Map<String, Value>> {
    let fields = body
        .as_object()
        .ok_or_else(|| ServiceError::invalid("Request body must be a JSON object"))?;

    match required.iter().find(|name| !fields.contains_key(**name)) {
        Some(missing) => Err(ServiceError::missing_field(missing)),
        None => Ok(fields),
    }
}

fn address_field(fields: &Map<String, Value>) -> ServiceResult<String> {
    fields["address"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ServiceError::invalid("address must be a string"))
}

fn non_negative_number(fields: &Map<String, Value>, name: &str) -> ServiceResult<Numeric> {
    fields[name]
        .as_f64()
        .and_then(Numeric::new)
        .ok_or_else(|| ServiceError::invalid(format!("{} must be a non-negative number", name)))
}
