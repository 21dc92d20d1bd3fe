//! WebSocket transport.
//!
//! Each socket becomes one participant. Inbound frames are decoded into
//! [`ClientEvent`]s and dispatched to the coordinator; outbound events are
//! drained from the participant's hub channel by a forwarding task.

use super::AppState;
use crate::coordinator::RoomCoordinator;
use crate::events::{ClientEvent, ServerEvent};
use crate::room::ParticipantId;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, instrument, warn};

/// `GET /ws`
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let participant = state.next_participant_id();
    ws.on_upgrade(move |socket| handle_socket(state, participant, socket))
}

#[instrument(skip(state, socket))]
async fn handle_socket(state: AppState, participant: ParticipantId, socket: WebSocket) {
    info!("WebSocket connected");
    let coordinator = state.coordinator().clone();
    let (mut sender, mut receiver) = socket.split();
    let mut outbound = coordinator.connect(&participant);

    let forward = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, event = event.name(), "Failed to encode event");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                debug!("Socket closed while sending");
                break;
            }
        }
    });

    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => dispatch(&coordinator, &participant, text.as_str()),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "Socket error");
                break;
            }
        }
    }

    coordinator.disconnect(&participant);
    forward.abort();
    info!("WebSocket disconnected");
}

/// Decodes one inbound frame and runs it against the coordinator.
///
/// Rejections, malformed frames included, are reported to the sender only.
#[instrument(skip(coordinator, text))]
pub fn dispatch(coordinator: &RoomCoordinator, participant: &str, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Malformed client event");
            coordinator
                .hub()
                .send(participant, ServerEvent::Error(format!("Malformed message: {}", e)));
            return;
        }
    };
    debug!(?event, "Client event");

    let result = match event {
        ClientEvent::Create(request) => {
            coordinator.create_room(request.mode(), participant, request.difficulty());
            Ok(())
        }
        ClientEvent::Join(code) => coordinator.join_room(&code, participant).map(drop),
        ClientEvent::Move(position) => coordinator.apply_move(participant, position).map(drop),
        ClientEvent::MatchmakingJoin => {
            coordinator.join_queue(participant);
            Ok(())
        }
        ClientEvent::MatchmakingLeave => {
            coordinator.leave_queue(participant);
            Ok(())
        }
    };

    if let Err(e) = result {
        coordinator.report_error(participant, &e);
    }
}
