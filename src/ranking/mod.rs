//! Ranking service: score-update policy, rank derivation, leaderboard windows, stats.

/// Response values produced by the service.
pub mod outcome;
/// Service operations over a [`crate::persist::PlayerStore`].
pub mod service;
