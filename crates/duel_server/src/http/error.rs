//! HTTP error responses.

use crate::error::RoomError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::warn;

/// Rejection of an HTTP request, rendered as `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ApiError {
    /// Board missing, wrong length or containing unknown symbols.
    #[display("Invalid board")]
    InvalidBoard,

    /// Analyzed cell missing, out of range or occupied.
    #[display("Invalid move")]
    InvalidMove,

    /// The engine had no empty cell to choose.
    #[display("No valid moves available")]
    NoValidMoves,

    /// Room lookup or coordination failure.
    #[display("{}", _0)]
    Room(RoomError),

    /// The engine task failed.
    #[display("{}", _0)]
    Internal(String),
}

impl std::error::Error for ApiError {}

impl From<RoomError> for ApiError {
    fn from(error: RoomError) -> Self {
        ApiError::Room(error)
    }
}

impl ApiError {
    /// Status code for this rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBoard | ApiError::InvalidMove | ApiError::NoValidMoves => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Room(RoomError::RoomNotFound | RoomError::GameNotFound) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Room(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, error = %self, "Request rejected");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
