//! Game Store - document collections for the game backend
//!
//! This crate provides the persistence adapter used by the services:
//! - A `Collection` trait: insert, filtered find, sort, update-by-id and an
//!   atomic conditional upsert
//! - In-memory collections backed by DashMap
//! - Disk-backed collections using the sled embedded database

pub mod collection;
pub mod document;
pub mod memory;
pub mod persistence;

pub use collection::{Collection, StoreError, StoreResult, Upsert, WriteOp};
pub use document::{DocumentId, Stored};
pub use memory::MemoryCollection;
pub use persistence::{SledCollection, SledStore};

/// Collection holding leaderboard entries
pub const LEADERBOARD_COLLECTION: &str = "leaderboard";

/// Collection holding destroyed-ship events
pub const DESTROYED_SHIPS_COLLECTION: &str = "destroyed_ships";
