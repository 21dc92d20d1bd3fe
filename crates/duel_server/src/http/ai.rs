//! Stateless engine endpoints.

use super::AppState;
use super::error::ApiError;
use axum::Json;
use axum::extract::State;
use duel_tictactoe::{Board, Difficulty, Player, analyze_move, select_move};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

/// Body of `POST /api/ai/move`.
///
/// Fields are loosely typed so that shape problems map to the documented
/// error messages rather than a generic rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    #[serde(default)]
    board: Option<Value>,
    #[serde(default)]
    difficulty: Option<Value>,
    #[serde(default)]
    ai_player: Option<Player>,
    #[serde(default)]
    human_player: Option<Player>,
}

/// Response of `POST /api/ai/move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Chosen cell.
    #[serde(rename = "move")]
    pub cell: usize,
    /// Difficulty actually used, after clamping.
    pub difficulty: Difficulty,
}

/// Body of `POST /api/ai/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    board: Option<Value>,
    #[serde(default, rename = "move")]
    played: Option<Value>,
    #[serde(default)]
    player: Option<Player>,
    #[serde(default)]
    opponent: Option<Player>,
}

/// Response of `POST /api/ai/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Whether the played cell is the search's first best move.
    pub is_optimal: bool,
    /// Best move, or -1 on a full board.
    pub optimal_move: i64,
    /// Human-readable grade.
    pub evaluation: String,
}

fn parse_board(value: Option<Value>) -> Result<Board, ApiError> {
    let value = value.ok_or(ApiError::InvalidBoard)?;
    serde_json::from_value(value).map_err(|_| ApiError::InvalidBoard)
}

/// `POST /api/ai/move`: picks a move for `aiPlayer`.
#[instrument(skip(state, request))]
pub async fn ai_move(
    State(state): State<AppState>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let board = parse_board(request.board)?;
    let difficulty = request
        .difficulty
        .as_ref()
        .and_then(Value::as_f64)
        .map(Difficulty::from)
        .unwrap_or(*state.default_difficulty());
    let ai = request.ai_player.unwrap_or(Player::O);
    let human = request.human_player.unwrap_or(Player::X);

    let cell = tokio::task::spawn_blocking(move || {
        let mut rng = rand::rng();
        select_move(&board, difficulty, ai, human, &mut rng)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Failed to calculate AI move: {}", e)))?
    .ok_or(ApiError::NoValidMoves)?;

    debug!(cell, %difficulty, ?ai, "Engine move");
    Ok(Json(MoveResponse { cell, difficulty }))
}

/// `POST /api/ai/analyze`: grades a move against perfect play.
#[instrument(skip(request))]
pub async fn analyze(
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let board = parse_board(request.board)?;
    let played = request
        .played
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|cell| usize::try_from(cell).ok())
        .filter(|cell| board.is_empty(*cell))
        .ok_or(ApiError::InvalidMove)?;
    let player = request.player.unwrap_or(Player::X);
    let opponent = request.opponent.unwrap_or(Player::O);

    let analysis =
        tokio::task::spawn_blocking(move || analyze_move(&board, played, player, opponent))
                .await
            .map_err(|e| ApiError::Internal(format!("Failed to analyze move: {}", e)))?;

    debug!(played, evaluation = %analysis.evaluation, "Move analyzed");
    Ok(Json(AnalyzeResponse {
        is_optimal: analysis.is_optimal,
        optimal_move: analysis.optimal_move.map_or(-1, |cell| cell as i64),
        evaluation: analysis.evaluation.to_string(),
    }))
}
