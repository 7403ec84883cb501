//! HTTP/JSON surface over the ranking service.

/// Request and response bodies.
pub mod dto;
/// Error-to-response mapping.
pub mod error;
/// Route handlers.
pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};

use crate::ranking::service::RankingService;

/// Public routes, as listed by the banner and the 404 body.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("health", "GET /health"),
    ("leaderboard", "GET /api/leaderboard?limit=20"),
    ("updateScore", "POST /api/leaderboard/update"),
    ("player", "GET /api/player/:username"),
    ("stats", "GET /api/stats"),
];

/// Builds the application router.
///
/// A known path hit with an unsupported method gets the same 404 body as an
/// unknown path.
pub fn router(service: RankingService) -> Router {
    Router::new()
        .route("/", get(handlers::banner).fallback(handlers::not_found))
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .route(
            "/api/leaderboard",
            get(handlers::leaderboard).fallback(handlers::not_found),
        )
        .route(
            "/api/leaderboard/update",
            post(handlers::update_score).fallback(handlers::not_found),
        )
        .route(
            "/api/player/:username",
            get(handlers::player).fallback(handlers::not_found),
        )
        .route("/api/stats", get(handlers::stats).fallback(handlers::not_found))
        .fallback(handlers::not_found)
        .with_state(service)
}
