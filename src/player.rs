//! Player record, validated submission, and the max-wins mutation rule.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    Level, MAX_IDENTITY_CHARS, MAX_LEVEL, MIN_LEVEL, PlayCount, TimestampMs, UpdateSeq,
};

/// Client-fault input errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Identity was missing or blank after trimming.
    #[error("Username is required")]
    MissingIdentity,
    /// Level was missing.
    #[error("Level is required")]
    MissingLevel,
    /// Level was not an integer in the accepted range.
    #[error("Level must be an integer between 1 and 1000")]
    InvalidLevel,
}

/// Authoritative stored state for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Unique, case-sensitive player key.
    pub identity: String,
    /// Best level ever submitted.
    pub level: Level,
    /// Optional avatar reference.
    pub display_image: Option<String>,
    /// Number of accepted submissions.
    pub play_count: PlayCount,
    /// Time of the most recent submission.
    pub last_updated_ms: TimestampMs,
    /// Time of the first submission.
    pub created_at_ms: TimestampMs,
    /// Store sequence of the most recent submission; orders same-millisecond ties.
    pub update_seq: UpdateSeq,
}

/// Validated score submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    /// Trimmed and truncated identity.
    pub identity: String,
    /// Submitted level, already range checked.
    pub level: Level,
    /// Replacement avatar; `None` keeps whatever is stored.
    pub display_image: Option<String>,
}

impl ScoreSubmission {
    /// Validates raw input into a submission.
    pub fn new(
        identity: &str,
        level: i64,
        display_image: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let identity = normalize_identity(identity)?;
        let level = validate_level(level)?;
        let display_image = display_image
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(Self {
            identity,
            level,
            display_image,
        })
    }
}

/// Trims `raw` and truncates it to [`MAX_IDENTITY_CHARS`] characters.
pub fn normalize_identity(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingIdentity);
    }
    Ok(trimmed.chars().take(MAX_IDENTITY_CHARS).collect())
}

/// Checks that `level` lies in [`MIN_LEVEL`]..=[`MAX_LEVEL`].
pub fn validate_level(level: i64) -> Result<Level, ValidationError> {
    if level < i64::from(MIN_LEVEL) || level > i64::from(MAX_LEVEL) {
        return Err(ValidationError::InvalidLevel);
    }
    Level::try_from(level).map_err(|_| ValidationError::InvalidLevel)
}

impl PlayerRecord {
    /// Builds the record for a first-ever submission.
    pub fn create(sub: &ScoreSubmission, now_ms: TimestampMs, seq: UpdateSeq) -> Self {
        Self {
            identity: sub.identity.clone(),
            level: sub.level,
            display_image: sub.display_image.clone(),
            play_count: 1,
            last_updated_ms: now_ms,
            created_at_ms: now_ms,
            update_seq: seq,
        }
    }

    /// Applies a repeat submission in place.
    ///
    /// Level only ever rises, the image is only replaced by a non-empty one,
    /// and every call counts as one play.
    pub fn apply_submission(&mut self, sub: &ScoreSubmission, now_ms: TimestampMs, seq: UpdateSeq) {
        self.level = self.level.max(sub.level);
        if let Some(image) = &sub.display_image {
            self.display_image = Some(image.clone());
        }
        self.play_count += 1;
        self.last_updated_ms = now_ms;
        self.update_seq = seq;
    }
}

/// Result of an atomic upsert: the state before and after the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Record before the write; `None` when the identity was unseen.
    pub previous: Option<PlayerRecord>,
    /// Record after the write.
    pub current: PlayerRecord,
}

/// Leaderboard ordering: level descending, then earlier update first.
pub fn leaderboard_order(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    b.level
        .cmp(&a.level)
        .then(a.last_updated_ms.cmp(&b.last_updated_ms))
        .then(a.update_seq.cmp(&b.update_seq))
}
