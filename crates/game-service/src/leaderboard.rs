//! Leaderboard Service
//!
//! Keeps one entry per (address, game mode): a new score replaces the stored
//! one only when strictly greater. Boards are sorted by score, highest first,
//! and a player's rank is their 1-based position on that board.

use crate::error::{ServiceError, ServiceResult};
use crate::model::{GameMode, LeaderboardEntry, Numeric};
use crate::validation::ScoreSubmission;
use chrono::Utc;
use game_store::{Collection, DocumentId, Stored, Upsert, WriteOp};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

const UPDATE_FAILED: &str = "Failed to update score";
const SUBMIT_FAILED: &str = "Failed to submit score";

/// An entry together with its position on the board
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RankedEntry {
    #[serde(flatten)]
    pub entry: Stored<LeaderboardEntry>,
    pub rank: usize,
}

/// What `submit_score` did with the submission
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitOutcome {
    /// First entry for this address and mode
    Created { id: DocumentId },
    /// Stored score was beaten
    Updated {
        previous_score: Numeric,
        new_score: Numeric,
    },
    /// Stored score was equal or higher; nothing written
    Skipped {
        existing_score: Numeric,
        submitted_score: Numeric,
    },
}

impl SubmitOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SubmitOutcome::Created { .. } => "Score submitted successfully",
            SubmitOutcome::Updated { .. } => "Score updated successfully",
            SubmitOutcome::Skipped { .. } => "Score not updated: existing score is higher or equal",
        }
    }
}

fn by_score_desc(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .get()
        .partial_cmp(&a.score.get())
        .unwrap_or(Ordering::Equal)
}

#[derive(Clone)]
pub struct LeaderboardService {
    entries: Arc<dyn Collection<LeaderboardEntry>>,
}

impl LeaderboardService {
    pub fn new(entries: Arc<dyn Collection<LeaderboardEntry>>) -> Self {
        Self { entries }
    }

    /// All entries for `game_mode`, highest score first
    ///
    /// The mode is not validated: an unknown mode is simply an empty board.
    /// Equal scores keep insertion order.
    pub fn leaderboard(&self, game_mode: &str) -> ServiceResult<Vec<Stored<LeaderboardEntry>>> {
        self.entries
            .find_sorted(&|e: &LeaderboardEntry| e.game_mode.as_str() == game_mode, &by_score_desc)
            .map_err(|e| {
                tracing::error!("Failed to load {} leaderboard: {}", game_mode, e);
                ServiceError::Internal(e.to_string())
            })
    }

    /// The caller's entry and rank within `game_mode`
    pub fn user_rank(&self, address: &str, game_mode: &str) -> ServiceResult<RankedEntry> {
        let entry = self
            .entries
            .find_one(&|e: &LeaderboardEntry| e.belongs_to(address, game_mode))
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound("User not found in leaderboard".to_string()))?;

        // Only checked once an entry exists
        let mode: GameMode = game_mode
            .parse()
            .map_err(|_| ServiceError::invalid("Invalid game mode"))?;

        let board = self.leaderboard(mode.as_str())?;
        let position = board
            .iter()
            .position(|candidate| candidate.id == entry.id)
            .ok_or_else(|| {
                tracing::error!("Entry {} missing from its own {} board", entry.id, mode);
                ServiceError::Internal("Could not determine rank".to_string())
            })?;

        Ok(RankedEntry {
            entry,
            rank: position + 1,
        })
    }

    /// Record a run, keeping only the best score per address and mode
    pub fn submit_score(&self, submission: ScoreSubmission) -> ServiceResult<SubmitOutcome> {
        let ScoreSubmission {
            address,
            score,
            combo,
            game_mode,
        } = submission;

        let now = Utc::now();
        let candidate = LeaderboardEntry {
            address: address.clone(),
            score,
            combo,
            game_mode,
            timestamp: now,
        };

        let outcome = self.entries.upsert_where(
            &|e: &LeaderboardEntry| e.address == address && e.game_mode == game_mode,
            candidate,
            &|existing: &LeaderboardEntry| {
                (score.get() > existing.score.get()).then(|| LeaderboardEntry {
                    score,
                    combo,
                    timestamp: now,
                    ..existing.clone()
                })
            },
        );

        match outcome {
            Ok(Upsert::Inserted(id)) => {
                tracing::info!("New {} entry for {}: score {}", game_mode, address, score);
                Ok(SubmitOutcome::Created { id })
            }
            Ok(Upsert::Updated { previous }) => {
                tracing::info!(
                    "Updated {} entry for {}: {} -> {}",
                    game_mode,
                    address,
                    previous.doc.score,
                    score
                );
                Ok(SubmitOutcome::Updated {
                    previous_score: previous.doc.score,
                    new_score: score,
                })
            }
            Ok(Upsert::Unchanged { existing }) => {
                tracing::debug!(
                    "Kept {} entry for {}: {} >= {}",
                    game_mode,
                    address,
                    existing.doc.score,
                    score
                );
                Ok(SubmitOutcome::Skipped {
                    existing_score: existing.doc.score,
                    submitted_score: score,
                })
            }
            Err(e) => {
                tracing::error!("Score submission for {} failed: {}", address, e);
                let message = match e.write_op() {
                    Some(WriteOp::Update) => UPDATE_FAILED,
                    _ => SUBMIT_FAILED,
                };
                Err(ServiceError::Internal(message.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_store::MemoryCollection;

    fn service() -> (LeaderboardService, Arc<MemoryCollection<LeaderboardEntry>>) {
        let entries = Arc::new(MemoryCollection::new("leaderboard"));
        (LeaderboardService::new(entries.clone()), entries)
    }

    fn submission(address: &str, score: u32, combo: u64, game_mode: GameMode) -> ScoreSubmission {
        ScoreSubmission {
            address: address.to_string(),
            score: Numeric::from(score),
            combo,
            game_mode,
        }
    }

    #[test]
    fn test_first_submission_creates() {
        let (service, entries) = service();

        let outcome = service.submit_score(submission("0xA", 100, 5, GameMode::Free)).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Created { .. }));
        assert_eq!(entries.len().unwrap(), 1);

        // Same address in another mode is a separate entry
        let outcome = service.submit_score(submission("0xA", 10, 1, GameMode::Competitive)).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Created { .. }));
        assert_eq!(entries.len().unwrap(), 2);
    }

    #[test]
    fn test_higher_score_updates_in_place() {
        let (service, entries) = service();
        let SubmitOutcome::Created { id } = service.submit_score(submission("0xA", 100, 5, GameMode::Free)).unwrap() else {
            panic!("expected a new entry");
        };
        let before = entries.find_one(&|_| true).unwrap().unwrap();

        let outcome = service.submit_score(submission("0xA", 150, 9, GameMode::Free)).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Updated {
                previous_score: Numeric::from(100),
                new_score: Numeric::from(150),
            }
        );

        let after = entries.find_one(&|_| true).unwrap().unwrap();
        assert_eq!(after.id, id);
        assert_eq!(after.doc.score, Numeric::from(150));
        assert_eq!(after.doc.combo, 9);
        assert!(after.doc.timestamp >= before.doc.timestamp);
        assert_eq!(entries.len().unwrap(), 1);
    }

    #[test]
    fn test_equal_or_lower_score_skips() {
        let (service, entries) = service();
        service.submit_score(submission("0xA", 100, 5, GameMode::Free)).unwrap();
        let stored = entries.find_one(&|_| true).unwrap().unwrap();

        for score in [100, 90] {
            let outcome = service.submit_score(submission("0xA", score, 50, GameMode::Free)).unwrap();
            assert_eq!(
                outcome,
                SubmitOutcome::Skipped {
                    existing_score: Numeric::from(100),
                    submitted_score: Numeric::from(score),
                }
            );
        }

        assert_eq!(entries.find_one(&|_| true).unwrap().unwrap(), stored);
    }

    #[test]
    fn test_leaderboard_sorted_and_partitioned() {
        let (service, _) = service();
        service.submit_score(submission("0xA", 50, 1, GameMode::Free)).unwrap();
        service.submit_score(submission("0xB", 300, 1, GameMode::Free)).unwrap();
        service.submit_score(submission("0xC", 999, 1, GameMode::Competitive)).unwrap();
        service.submit_score(submission("0xD", 120, 1, GameMode::Free)).unwrap();

        let board = service.leaderboard("FREE").unwrap();
        let addresses: Vec<&str> = board.iter().map(|e| e.doc.address.as_str()).collect();
        assert_eq!(addresses, vec!["0xB", "0xD", "0xA"]);

        let competitive = service.leaderboard("COMPETITIVE").unwrap();
        assert_eq!(competitive.len(), 1);
        assert_eq!(competitive[0].doc.address, "0xC");
    }

    #[test]
    fn test_unknown_mode_is_empty_board() {
        let (service, _) = service();
        service.submit_score(submission("0xA", 50, 1, GameMode::Free)).unwrap();
        assert!(service.leaderboard("RANKED").unwrap().is_empty());
        assert!(service.leaderboard("free").unwrap().is_empty());
    }

    #[test]
    fn test_user_rank() {
        let (service, _) = service();
        service.submit_score(submission("0xA", 10, 1, GameMode::Free)).unwrap();
        service.submit_score(submission("0xB", 30, 1, GameMode::Free)).unwrap();
        service.submit_score(submission("0xC", 20, 1, GameMode::Free)).unwrap();

        assert_eq!(service.user_rank("0xB", "FREE").unwrap().rank, 1);
        assert_eq!(service.user_rank("0xC", "FREE").unwrap().rank, 2);
        let ranked = service.user_rank("0xA", "FREE").unwrap();
        assert_eq!(ranked.rank, 3);
        assert_eq!(ranked.entry.doc.address, "0xA");
    }

    #[test]
    fn test_ties_rank_by_position() {
        let (service, _) = service();
        service.submit_score(submission("0xA", 40, 1, GameMode::Free)).unwrap();
        service.submit_score(submission("0xB", 40, 1, GameMode::Free)).unwrap();

        assert_eq!(service.user_rank("0xA", "FREE").unwrap().rank, 1);
        assert_eq!(service.user_rank("0xB", "FREE").unwrap().rank, 2);
    }

    #[test]
    fn test_rank_errors() {
        let (service, _) = service();
        service.submit_score(submission("0xA", 40, 1, GameMode::Free)).unwrap();

        assert_eq!(
            service.user_rank("0xZ", "FREE").unwrap_err(),
            ServiceError::NotFound("User not found in leaderboard".to_string())
        );
        // Existence is checked before the mode, so an unknown mode reads as not found
        assert_eq!(
            service.user_rank("0xA", "RANKED").unwrap_err(),
            ServiceError::NotFound("User not found in leaderboard".to_string())
        );
        assert!(matches!(
            service.user_rank("0xA", "COMPETITIVE"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_outcome_json() {
        let outcome = SubmitOutcome::Updated {
            previous_score: Numeric::from(100),
            new_score: Numeric::from(150),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({"action": "UPDATED", "previous_score": 100, "new_score": 150})
        );

        let outcome = SubmitOutcome::Skipped {
            existing_score: Numeric::from(100),
            submitted_score: Numeric::from(90),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({"action": "SKIPPED", "existing_score": 100, "submitted_score": 90})
        );
    }
}
