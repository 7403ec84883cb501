use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::ranking::service::RankingService;

use super::{
    ENDPOINTS,
    dto::{
        DataEnvelope, HealthResponse, LeaderboardQuery, LeaderboardResponse, PlayerData,
        StatsData, SubmitResponse, UpdateRequest, now_iso,
    },
    error::ApiError,
};

pub async fn banner() -> Json<Value> {
    let endpoints: serde_json::Map<String, Value> = ENDPOINTS
        .iter()
        .map(|(name, route)| ((*name).to_string(), Value::from(*route)))
        .collect();
    Json(json!({
        "message": "Game Leaderboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    }))
}

pub async fn health(State(service): State<RankingService>) -> Json<HealthResponse> {
    let database = if service.is_healthy().await {
        "connected"
    } else {
        "disconnected"
    };
    Json(HealthResponse {
        status: "OK",
        database,
        timestamp: now_iso(),
    })
}

pub async fn leaderboard(
    State(service): State<RankingService>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let page = service.get_leaderboard(query.requested_limit()).await?;
    Ok(Json(page.into()))
}

pub async fn update_score(
    State(service): State<RankingService>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(req) = body.map_err(|rej| ApiError::BadRequest(rej.body_text()))?;
    let sub = req.into_submission()?;
    let outcome = service.submit_score(sub).await?;
    Ok(Json(outcome.into()))
}

pub async fn player(
    State(service): State<RankingService>,
    Path(username): Path<String>,
) -> Result<Json<DataEnvelope<PlayerData>>, ApiError> {
    let lookup = service.get_player(&username).await?;
    Ok(Json(DataEnvelope::ok(lookup.into())))
}

pub async fn stats(
    State(service): State<RankingService>,
) -> Result<Json<DataEnvelope<StatsData>>, ApiError> {
    let stats = service.get_stats().await?;
    Ok(Json(DataEnvelope::ok(stats.into())))
}

pub async fn not_found() -> impl IntoResponse {
    let available: Vec<&str> = ENDPOINTS.iter().map(|(_, route)| *route).collect();
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Endpoint not found",
            "availableEndpoints": available,
        })),
    )
}
