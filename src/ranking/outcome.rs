use crate::{
    player::PlayerRecord,
    types::{Level, PlayCount},
};

/// One leaderboard row with its positional rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPlayer {
    /// 1-based position within the window.
    pub rank: u64,
    /// Stored record.
    pub record: PlayerRecord,
}

/// A capped leaderboard window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardPage {
    /// Rows in leaderboard order.
    pub entries: Vec<RankedPlayer>,
    /// Number of players in the store, not the window size.
    pub total: u64,
}

/// How a submission related to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    /// First submission for this identity.
    Created,
    /// Submission beat the stored best.
    Improved {
        /// Best level before this submission.
        previous_best: Level,
    },
    /// Submission was recorded as a play only.
    NotImproved {
        /// Level carried by the submission.
        submitted_level: Level,
        /// Stored best, unchanged.
        current_best: Level,
    },
}

/// Result of a score submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Record after the write.
    pub record: PlayerRecord,
    /// Rank of the stored level after the write.
    pub rank: u64,
    /// Whether `rank` is inside the top-tier window.
    pub is_top_tier: bool,
    /// Branch taken by the update rule.
    pub kind: SubmitKind,
}

impl SubmitOutcome {
    /// True for a first submission or a new personal best.
    pub fn is_new_record(&self) -> bool {
        !matches!(self.kind, SubmitKind::NotImproved { .. })
    }

    /// Number of plays recorded so far.
    pub fn play_count(&self) -> PlayCount {
        self.record.play_count
    }
}

/// Point lookup result. An unknown player is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerLookup {
    /// Player exists.
    Found {
        /// Stored record.
        record: PlayerRecord,
        /// Rank derived from the number of strictly higher levels.
        rank: u64,
        /// Whether `rank` is inside the top-tier window.
        is_top_tier: bool,
    },
    /// No record for this identity.
    NotFound {
        /// Normalised identity that was looked up.
        identity: String,
    },
}

/// Aggregate leaderboard statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardStats {
    /// Number of stored players.
    pub total_players: u64,
    /// Highest stored level, 0 when empty.
    pub highest_level: Level,
    /// Holder of the highest level.
    pub top_player: Option<String>,
    /// Mean level rounded to one decimal, 0 when empty.
    pub average_level: f64,
    /// `min(total_players, TOP_TIER_SIZE)`.
    pub competitors_in_top_tier: u64,
}
