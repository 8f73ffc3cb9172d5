//! Persistence layer (JSON snapshots on local disk).

pub mod json_store;

pub use json_store::{JsonStore, PersistError, TrainingSnapshot};

/// Snapshot file names inside the data directory.
pub mod files {
    /// Session id -> session record
    pub const TRAININGS: &str = "trainings.json";
    /// Session id -> participant array
    pub const PARTICIPANTS: &str = "participants.json";
}
