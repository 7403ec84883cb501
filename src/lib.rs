//! Level leaderboard service: max-wins score updates, derived ranks, and a
//! small HTTP/JSON surface, over a pluggable player store.
//!
//! # Examples
//!
//! In-memory usage with [`core::store::MemoryPlayerStore`]:
//! ```
//! use std::sync::Arc;
//!
//! use levelboard::{
//!     core::store::MemoryPlayerStore,
//!     player::ScoreSubmission,
//!     ranking::service::RankingService,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let service = RankingService::new(Arc::new(MemoryPlayerStore::new()));
//! let sub = ScoreSubmission::new("alice", 12, None).expect("valid");
//! let outcome = service.submit_score(sub).await.expect("submit");
//! assert_eq!(outcome.rank, 1);
//! assert!(outcome.is_new_record());
//! # }
//! ```
//!
//! Serving with a SQLite store:
//! ```no_run
//! use std::sync::Arc;
//!
//! use levelboard::{http, persist::sqlite::SqlitePlayerStore, ranking::service::RankingService};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = SqlitePlayerStore::open("leaderboard.db").expect("open sqlite");
//! let service = RankingService::new(Arc::new(store));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.expect("bind");
//! axum::serve(listener, http::router(service.clone())).await.expect("serve");
//! service.shutdown().await.expect("flush");
//! # }
//! ```

/// Process configuration from the environment.
pub mod config;
/// In-memory reference store.
pub mod core;
/// HTTP/JSON surface.
pub mod http;
/// Store abstraction and SQLite implementation.
pub mod persist;
/// Player records and the update rule.
pub mod player;
/// Ranking service and its response values.
pub mod ranking;
/// Shared primitive types and limits.
pub mod types;
