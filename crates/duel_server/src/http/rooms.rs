//! Health and room lookup endpoints.

use super::AppState;
use super::error::ApiError;
use crate::coordinator::CoordinatorStats;
use crate::error::RoomError;
use crate::room::RoomSnapshot;
use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Server time.
    pub timestamp: DateTime<Utc>,
    /// Registry counters.
    #[serde(flatten)]
    pub stats: CoordinatorStats,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let coordinator = state.coordinator();
    Json(Health {
        status: "ok",
        timestamp: coordinator.now(),
        stats: coordinator.stats(),
    })
}

/// `GET /api/rooms/{code}`
#[instrument(skip(state))]
pub async fn room_snapshot(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<RoomSnapshot>, ApiError> {
    state
        .coordinator()
        .snapshot(&code)
        .map(Json)
        .ok_or(ApiError::Room(RoomError::RoomNotFound))
}
