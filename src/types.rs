//! Shared primitive types and leaderboard limits.

/// Player level; valid submissions fall in [`MIN_LEVEL`]..=[`MAX_LEVEL`].
pub type Level = u32;
/// Number of accepted submissions for a player.
pub type PlayCount = u64;
/// Timestamp in milliseconds since the Unix epoch.
pub type TimestampMs = u64;
/// Monotonic store mutation sequence number.
pub type UpdateSeq = u64;

/// Lowest level a submission may carry.
pub const MIN_LEVEL: Level = 1;
/// Highest level a submission may carry.
pub const MAX_LEVEL: Level = 1000;
/// Identities longer than this many characters are truncated.
pub const MAX_IDENTITY_CHARS: usize = 50;
/// Ranks at or below this value count as top-tier.
pub const TOP_TIER_SIZE: u64 = 20;
/// Leaderboard window used when the caller does not ask for one.
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 20;
/// Hard cap on the leaderboard window.
pub const MAX_LEADERBOARD_LIMIT: u32 = 50;
/// Avatar reported for players that never supplied a display image.
pub const DEFAULT_AVATAR: &str = "https://www.gravatar.com/avatar/?d=mp&s=128";

/// Returns true when `rank` falls inside the top-tier window.
pub fn is_top_tier(rank: u64) -> bool {
    (1..=TOP_TIER_SIZE).contains(&rank)
}
