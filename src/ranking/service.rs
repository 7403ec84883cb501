use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    persist::{PlayerStore, StoreError, StoreResult},
    player::{ScoreSubmission, ValidationError, normalize_identity},
    types::{DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT, TOP_TIER_SIZE, is_top_tier},
};

use super::outcome::{
    LeaderboardPage, LeaderboardStats, PlayerLookup, RankedPlayer, SubmitKind, SubmitOutcome,
};

#[derive(Debug, Error)]
pub enum RankingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stateless front for the ranking rules. Cheap to clone; every call goes
/// straight to the store.
#[derive(Clone)]
pub struct RankingService {
    store: Arc<dyn PlayerStore>,
}

impl RankingService {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    pub async fn get_leaderboard(&self, limit: Option<u32>) -> Result<LeaderboardPage, RankingError> {
        let limit = clamp_limit(limit);
        let (records, total) = self
            .blocking(move |store| {
                let records = store.top_by_level_descending(limit as usize)?;
                let total = store.count_all()?;
                Ok((records, total))
            })
            .await?;

        let entries = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| RankedPlayer {
                rank: idx as u64 + 1,
                record,
            })
            .collect::<Vec<_>>();

        debug!(limit, returned = entries.len(), total, "leaderboard window");
        Ok(LeaderboardPage { entries, total })
    }

    pub async fn submit_score(&self, sub: ScoreSubmission) -> Result<SubmitOutcome, RankingError> {
        let submitted_level = sub.level;
        let (upserted, higher) = self
            .blocking(move |store| {
                let upserted = store.upsert(&sub)?;
                let higher = store.count_with_level_greater_than(upserted.current.level)?;
                Ok((upserted, higher))
            })
            .await?;

        let kind = match &upserted.previous {
            None => SubmitKind::Created,
            Some(prev) if submitted_level > prev.level => SubmitKind::Improved {
                previous_best: prev.level,
            },
            Some(_) => SubmitKind::NotImproved {
                submitted_level,
                current_best: upserted.current.level,
            },
        };
        let rank = higher + 1;

        let outcome = SubmitOutcome {
            record: upserted.current,
            rank,
            is_top_tier: is_top_tier(rank),
            kind,
        };

        match outcome.kind {
            SubmitKind::Created => info!(
                identity = %outcome.record.identity,
                level = outcome.record.level,
                rank,
                "new player"
            ),
            SubmitKind::Improved { previous_best } => info!(
                identity = %outcome.record.identity,
                level = outcome.record.level,
                previous_best,
                rank,
                "new personal best"
            ),
            SubmitKind::NotImproved { .. } => debug!(
                identity = %outcome.record.identity,
                submitted_level,
                current_best = outcome.record.level,
                "play recorded"
            ),
        }

        Ok(outcome)
    }

    pub async fn get_player(&self, identity: &str) -> Result<PlayerLookup, RankingError> {
        let identity = normalize_identity(identity)?;
        let lookup_id = identity.clone();
        let found = self
            .blocking(move |store| {
                let Some(record) = store.find_by_identity(&lookup_id)? else {
                    return Ok(None);
                };
                let higher = store.count_with_level_greater_than(record.level)?;
                Ok(Some((record, higher + 1)))
            })
            .await?;

        Ok(match found {
            Some((record, rank)) => PlayerLookup::Found {
                record,
                rank,
                is_top_tier: is_top_tier(rank),
            },
            None => {
                debug!(%identity, "player not found");
                PlayerLookup::NotFound { identity }
            }
        })
    }

    pub async fn get_stats(&self) -> Result<LeaderboardStats, RankingError> {
        let (total_players, top, average) = self
            .blocking(|store| {
                let total = store.count_all()?;
                let top = store.top_level()?;
                let average = store.average_level()?;
                Ok((total, top, average))
            })
            .await?;

        let (highest_level, top_player) = match top {
            Some(rec) => (rec.level, Some(rec.identity)),
            None => (0, None),
        };

        Ok(LeaderboardStats {
            total_players,
            highest_level,
            top_player,
            average_level: average.map(round_one_decimal).unwrap_or(0.0),
            competitors_in_top_tier: total_players.min(TOP_TIER_SIZE),
        })
    }

    /// Store liveness for health reporting.
    pub async fn is_healthy(&self) -> bool {
        self.blocking(|store| store.ping()).await.is_ok()
    }

    /// Flushes the store before the process exits.
    pub async fn shutdown(&self) -> Result<(), RankingError> {
        self.blocking(|store| store.flush()).await?;
        Ok(())
    }

    async fn blocking<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn PlayerStore) -> StoreResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

/// Resolves a requested window size into `1..=MAX_LEADERBOARD_LIMIT`.
pub fn clamp_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => DEFAULT_LEADERBOARD_LIMIT,
        Some(n) => n.min(MAX_LEADERBOARD_LIMIT),
    }
}

fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
