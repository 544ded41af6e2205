//! Player flows through the services

use std::sync::Arc;

use game_store::{Collection, MemoryCollection, SledStore, DESTROYED_SHIPS_COLLECTION, LEADERBOARD_COLLECTION};
use serde_json::json;
use tempfile::tempdir;

use crate::{
    model::{DestroyedShipEvent, LeaderboardEntry, Numeric},
    validation::{ScoreSubmission, ShipDestruction},
    DestroyedShipLog, LeaderboardService, ServiceError, SubmitOutcome,
};

/// Helper to validate and submit a raw body
fn submit(service: &LeaderboardService, body: serde_json::Value) -> Result<SubmitOutcome, ServiceError> {
    service.submit_score(ScoreSubmission::from_json(&body)?)
}

fn run_score_scenario(service: &LeaderboardService) {
    let outcome = submit(service, json!({"address": "0xA", "score": 100, "combo": 5, "game_mode": "FREE"})).unwrap();
    assert!(matches!(outcome, SubmitOutcome::Created { .. }));

    let outcome = submit(service, json!({"address": "0xA", "score": 90, "combo": 7, "game_mode": "FREE"})).unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Skipped {
            existing_score: Numeric::from(100),
            submitted_score: Numeric::from(90),
        }
    );

    let outcome = submit(service, json!({"address": "0xA", "score": 150, "combo": 8, "game_mode": "FREE"})).unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Updated {
            previous_score: Numeric::from(100),
            new_score: Numeric::from(150),
        }
    );

    let ranked = service.user_rank("0xA", "FREE").unwrap();
    assert_eq!(ranked.rank, 1);
    assert_eq!(ranked.entry.doc.score, Numeric::from(150));
    assert_eq!(ranked.entry.doc.combo, 8);
}

fn run_ship_scenario(log: &DestroyedShipLog) {
    let body = json!({"address": "0xA", "id_ship": 3});
    log.record(ShipDestruction::from_json(&body).unwrap()).unwrap();

    let events = log.list("0xA").unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].doc.ship_id, Numeric::from(3));
    assert_eq!(events[0].doc.address, "0xA");
}

#[test]
fn test_score_scenario_in_memory() {
    let service = LeaderboardService::new(Arc::new(MemoryCollection::<LeaderboardEntry>::new(LEADERBOARD_COLLECTION)));
    run_score_scenario(&service);
}

#[test]
fn test_ship_scenario_in_memory() {
    let log = DestroyedShipLog::new(Arc::new(MemoryCollection::<DestroyedShipEvent>::new(DESTROYED_SHIPS_COLLECTION)));
    run_ship_scenario(&log);
}

#[test]
fn test_scenarios_on_sled() {
    let dir = tempdir().unwrap();
    let store = SledStore::open(dir.path(), "neon_void").unwrap();

    let entries = store.collection::<LeaderboardEntry>(LEADERBOARD_COLLECTION).unwrap();
    let events = store.collection::<DestroyedShipEvent>(DESTROYED_SHIPS_COLLECTION).unwrap();

    run_score_scenario(&LeaderboardService::new(Arc::new(entries)));
    run_ship_scenario(&DestroyedShipLog::new(Arc::new(events)));
}

#[test]
fn test_leaderboard_survives_restart() {
    let dir = tempdir().unwrap();

    {
        let store = SledStore::open(dir.path(), "neon_void").unwrap();
        let entries = store.collection::<LeaderboardEntry>(LEADERBOARD_COLLECTION).unwrap();
        let service = LeaderboardService::new(Arc::new(entries));
        submit(&service, json!({"address": "0xA", "score": 12.5, "combo": 1, "game_mode": "COMPETITIVE"})).unwrap();
        submit(&service, json!({"address": "0xB", "score": 40, "combo": 2, "game_mode": "COMPETITIVE"})).unwrap();
        store.flush().unwrap();
    }

    let store = SledStore::open(dir.path(), "neon_void").unwrap();
    let entries = store.collection::<LeaderboardEntry>(LEADERBOARD_COLLECTION).unwrap();
    let service = LeaderboardService::new(Arc::new(entries));

    let board = service.leaderboard("COMPETITIVE").unwrap();
    let scores: Vec<f64> = board.iter().map(|e| e.doc.score.get()).collect();
    assert_eq!(scores, vec![40.0, 12.5]);
    assert_eq!(service.user_rank("0xA", "COMPETITIVE").unwrap().rank, 2);
}

#[test]
fn test_invalid_body_never_reaches_store() {
    let entries = Arc::new(MemoryCollection::<LeaderboardEntry>::new(LEADERBOARD_COLLECTION));
    let service = LeaderboardService::new(entries.clone());

    let err = submit(&service, json!({"address": "0xA", "score": 100, "game_mode": "FREE"})).unwrap_err();
    assert_eq!(err, ServiceError::InvalidArgument("Missing required field: combo".to_string()));
    assert!(entries.is_empty().unwrap());
}

#[test]
fn test_concurrent_first_submissions_create_one_entry() {
    let entries = Arc::new(MemoryCollection::<LeaderboardEntry>::new(LEADERBOARD_COLLECTION));
    let service = LeaderboardService::new(entries.clone());

    let handles: Vec<_> = (0..32u32)
        .map(|i| {
            let service = service.clone();
            std::thread::spawn(move || {
                submit(&service, json!({"address": "0xRace", "score": i, "combo": 1, "game_mode": "FREE"})).unwrap()
            })
        })
        .collect();

    let outcomes: Vec<SubmitOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let created = outcomes
        .iter()
        .filter(|o| matches!(o, SubmitOutcome::Created { .. }))
        .count();
    assert_eq!(created, 1);
    assert_eq!(entries.len().unwrap(), 1);

    // The best score always wins, whatever the interleaving
    let ranked = service.user_rank("0xRace", "FREE").unwrap();
    assert_eq!(ranked.entry.doc.score, Numeric::from(31));
}

#[test]
fn test_concurrent_first_submissions_on_sled() {
    let dir = tempdir().unwrap();
    let store = SledStore::open(dir.path(), "neon_void").unwrap();
    let entries = Arc::new(store.collection::<LeaderboardEntry>(LEADERBOARD_COLLECTION).unwrap());
    let service = LeaderboardService::new(entries.clone());

    let handles: Vec<_> = (0..16u32)
        .map(|i| {
            let service = service.clone();
            std::thread::spawn(move || {
                submit(&service, json!({"address": "0xRace", "score": i, "combo": 1, "game_mode": "COMPETITIVE"})).unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(entries.len().unwrap(), 1);
    assert_eq!(service.leaderboard("COMPETITIVE").unwrap()[0].doc.score, Numeric::from(15));
}
