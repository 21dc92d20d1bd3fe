//! HTTP and WebSocket surface.

mod ai;
mod error;
mod rooms;
mod ws;

pub use ai::{AnalyzeRequest, AnalyzeResponse, MoveRequest, MoveResponse, ai_move, analyze};
pub use error::ApiError;
pub use rooms::{Health, health, room_snapshot};
pub use ws::{dispatch, ws_handler};

use crate::config::ServerConfig;
use crate::coordinator::RoomCoordinator;
use crate::room::ParticipantId;
use axum::Router;
use axum::routing::{get, post};
use derive_getters::Getters;
use duel_tictactoe::Difficulty;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

/// Shared handler state.
#[derive(Debug, Clone, Getters)]
pub struct AppState {
    coordinator: RoomCoordinator,
    default_difficulty: Difficulty,
    #[getter(skip)]
    next_participant: Arc<AtomicU64>,
}

impl AppState {
    /// Wraps a coordinator for the router.
    pub fn new(coordinator: RoomCoordinator, default_difficulty: Difficulty) -> Self {
        Self {
            coordinator,
            default_difficulty,
            next_participant: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Allocates an id for a new connection.
    pub fn next_participant_id(&self) -> ParticipantId {
        let n = self.next_participant.fetch_add(1, Ordering::Relaxed);
        format!("player-{}", n)
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/ai/move", post(ai_move))
        .route("/api/ai/analyze", post(analyze))
        .route("/api/rooms/{code}", get(room_snapshot))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

/// Periodically evicts expired rooms on the coordinator's clock.
pub fn spawn_sweeper(coordinator: RoomCoordinator, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = coordinator.sweep_expired(coordinator.now());
            if !evicted.is_empty() {
                debug!(count = evicted.len(), "Evicted expired rooms");
            }
        }
    })
}

/// Binds and serves until Ctrl-C, then clears the coordinator.
#[instrument(skip(config), fields(address = %config.bind_address()))]
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let coordinator = RoomCoordinator::new(&config);
    let app = router(AppState::new(coordinator.clone(), *config.default_difficulty()));
    let sweeper = spawn_sweeper(coordinator.clone(), config.sweep_interval());

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(address = %config.bind_address(), "Server ready");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.abort();
    coordinator.shutdown();
    info!(?result, "Server stopped");
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
