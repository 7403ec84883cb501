pub mod sqlite;

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::{
    player::{PlayerRecord, ScoreSubmission, UpsertOutcome},
    types::{Level, TimestampMs},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("blocking task failed: {0}")]
    Join(String),
    #[error("{0}")]
    Message(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence boundary for player records.
///
/// Implementations must make `upsert` atomic per identity: concurrent
/// submissions for one identity never lose a play and never lower the level.
/// Methods may block; async callers run them on the blocking pool.
pub trait PlayerStore: Send + Sync {
    fn upsert(&self, sub: &ScoreSubmission) -> StoreResult<UpsertOutcome>;
    fn find_by_identity(&self, identity: &str) -> StoreResult<Option<PlayerRecord>>;
    fn count_with_level_greater_than(&self, level: Level) -> StoreResult<u64>;
    /// Highest levels first; ties go to the earlier update.
    fn top_by_level_descending(&self, limit: usize) -> StoreResult<Vec<PlayerRecord>>;
    fn count_all(&self) -> StoreResult<u64>;
    /// `None` when the store is empty.
    fn average_level(&self) -> StoreResult<Option<f64>>;
    fn top_level(&self) -> StoreResult<Option<PlayerRecord>> {
        Ok(self.top_by_level_descending(1)?.into_iter().next())
    }
    fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}

pub(crate) fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
