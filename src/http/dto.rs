//! JSON request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{OffsetDateTime, macros::format_description};

use crate::{
    persist::now_ms,
    player::{PlayerRecord, ScoreSubmission, ValidationError},
    ranking::outcome::{
        LeaderboardPage, LeaderboardStats, PlayerLookup, RankedPlayer, SubmitKind, SubmitOutcome,
    },
    types::{DEFAULT_AVATAR, Level, PlayCount, TimestampMs},
};

/// Body of `POST /api/leaderboard/update`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub username: Option<String>,
    pub level: Option<Value>,
    pub profile_picture: Option<String>,
}

impl UpdateRequest {
    pub fn into_submission(self) -> Result<ScoreSubmission, ValidationError> {
        let username = self.username.unwrap_or_default();
        let level = parse_level(self.level.as_ref())?;
        ScoreSubmission::new(&username, level, self.profile_picture.as_deref())
    }
}

/// Accepts a JSON integer or an integer-valued string.
fn parse_level(raw: Option<&Value>) -> Result<i64, ValidationError> {
    match raw {
        None | Some(Value::Null) => Err(ValidationError::MissingLevel),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or(ValidationError::InvalidLevel),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::MissingLevel),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidLevel),
        Some(_) => Err(ValidationError::InvalidLevel),
    }
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<String>,
}

impl LeaderboardQuery {
    /// Unparseable or non-positive values fall back to the default window.
    pub fn requested_limit(&self) -> Option<u32> {
        let n = self.limit.as_deref()?.trim().parse::<i64>().ok()?;
        if n <= 0 {
            return None;
        }
        Some(u32::try_from(n).unwrap_or(u32::MAX))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u64,
    pub username: String,
    pub level: Level,
    pub games_played: PlayCount,
    pub last_updated: String,
    pub avatar: String,
}

impl From<RankedPlayer> for LeaderboardEntry {
    fn from(row: RankedPlayer) -> Self {
        let RankedPlayer { rank, record } = row;
        Self {
            rank,
            last_updated: format_ms(record.last_updated_ms),
            avatar: avatar_or_default(&record),
            username: record.identity,
            level: record.level,
            games_played: record.play_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub data: Vec<LeaderboardEntry>,
    pub total: u64,
    pub timestamp: String,
}

impl From<LeaderboardPage> for LeaderboardResponse {
    fn from(page: LeaderboardPage) -> Self {
        Self {
            success: true,
            data: page.entries.into_iter().map(LeaderboardEntry::from).collect(),
            total: page.total,
            timestamp: now_iso(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitData {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_best: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_best: Option<Level>,
    pub rank: u64,
    pub is_in_top20: bool,
    pub games_played: PlayCount,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub new_record: bool,
    pub message: &'static str,
    pub data: SubmitData,
}

impl From<SubmitOutcome> for SubmitResponse {
    fn from(out: SubmitOutcome) -> Self {
        let new_record = out.is_new_record();
        let mut data = SubmitData {
            username: out.record.identity,
            level: None,
            previous_best: None,
            submitted_level: None,
            current_best: None,
            rank: out.rank,
            is_in_top20: out.is_top_tier,
            games_played: out.record.play_count,
        };
        let message = match out.kind {
            SubmitKind::Created => {
                data.level = Some(out.record.level);
                "New player created!"
            }
            SubmitKind::Improved { previous_best } => {
                data.level = Some(out.record.level);
                data.previous_best = Some(previous_best);
                "New personal best!"
            }
            SubmitKind::NotImproved {
                submitted_level,
                current_best,
            } => {
                data.submitted_level = Some(submitted_level);
                data.current_best = Some(current_best);
                "Score recorded, but not a new personal best"
            }
        };
        Self {
            success: true,
            new_record,
            message,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub username: String,
    pub level: Level,
    pub rank: Option<u64>,
    pub is_in_top20: bool,
    pub avatar: Option<String>,
    pub games_played: PlayCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<PlayerLookup> for PlayerData {
    fn from(lookup: PlayerLookup) -> Self {
        match lookup {
            PlayerLookup::Found {
                record,
                rank,
                is_top_tier,
            } => Self {
                avatar: Some(avatar_or_default(&record)),
                created_at: Some(format_ms(record.created_at_ms)),
                last_played: Some(format_ms(record.last_updated_ms)),
                username: record.identity,
                level: record.level,
                rank: Some(rank),
                is_in_top20: is_top_tier,
                games_played: record.play_count,
                message: None,
            },
            PlayerLookup::NotFound { identity } => Self {
                username: identity,
                level: 0,
                rank: None,
                is_in_top20: false,
                avatar: None,
                games_played: 0,
                created_at: None,
                last_played: None,
                message: Some("Player not found"),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub total_players: u64,
    pub highest_level: Level,
    pub top_player: Option<String>,
    pub average_level: f64,
    pub competitors_in_top20: u64,
}

impl From<LeaderboardStats> for StatsData {
    fn from(s: LeaderboardStats) -> Self {
        Self {
            total_players: s.total_players,
            highest_level: s.highest_level,
            top_player: s.top_player,
            average_level: s.average_level,
            competitors_in_top20: s.competitors_in_top_tier,
        }
    }
}

/// `{success: true, data}` wrapper.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

fn avatar_or_default(record: &PlayerRecord) -> String {
    record
        .display_image
        .clone()
        .unwrap_or_else(|| DEFAULT_AVATAR.to_string())
}

/// Renders a millisecond timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_ms(ms: TimestampMs) -> String {
    let format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
        .ok()
        .and_then(|dt| dt.format(&format).ok())
        .unwrap_or_default()
}

pub fn now_iso() -> String {
    format_ms(now_ms())
}
