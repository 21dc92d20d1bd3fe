//! WebSocket event protocol.
//!
//! Frames are JSON objects of the form `{"event": "<name>", "data": <payload>}`.

use crate::room::{GameEnd, GameMode, MoveRecord, ParticipantId, RoomCode, RoomSnapshot};
use duel_tictactoe::Difficulty;
use serde::{Deserialize, Serialize};

/// Payload of `game:create`: either a bare mode or a mode with options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateRoom {
    /// `"AI"`, `"CLASSIC"`, ...
    Mode(GameMode),
    /// `{"mode": "AI", "difficulty": 80}`
    Options {
        /// Requested mode.
        mode: GameMode,
        /// Engine strength for AI rooms.
        #[serde(default)]
        difficulty: Option<Difficulty>,
    },
}

impl CreateRoom {
    /// Requested mode.
    pub fn mode(&self) -> GameMode {
        match self {
            CreateRoom::Mode(mode) | CreateRoom::Options { mode, .. } => *mode,
        }
    }

    /// Requested difficulty, if any.
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            CreateRoom::Mode(_) => None,
            CreateRoom::Options { difficulty, .. } => *difficulty,
        }
    }
}

/// Client to server events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Open a new room.
    #[serde(rename = "game:create")]
    Create(CreateRoom),
    /// Join a room by code.
    #[serde(rename = "game:join")]
    Join(String),
    /// Play a cell in the participant's current room.
    #[serde(rename = "game:move")]
    Move(usize),
    /// Enter the matchmaking queue.
    #[serde(rename = "matchmaking:join")]
    MatchmakingJoin,
    /// Leave the matchmaking queue.
    #[serde(rename = "matchmaking:leave")]
    MatchmakingLeave,
}

/// Server to client notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Sent once per connection with the assigned participant id.
    #[serde(rename = "session:welcome")]
    Welcome(ParticipantId),
    /// The recipient now sits in this room.
    #[serde(rename = "room:joined")]
    RoomJoined(RoomCode),
    /// Full room snapshot.
    #[serde(rename = "game:state")]
    State(Box<RoomSnapshot>),
    /// A move was accepted.
    #[serde(rename = "game:move")]
    MoveApplied(MoveRecord),
    /// The game finished.
    #[serde(rename = "game:end")]
    GameEnded(GameEnd),
    /// A request from the recipient was rejected.
    #[serde(rename = "game:error")]
    Error(String),
    /// A second participant joined the recipient's room.
    #[serde(rename = "room:playerJoined")]
    PlayerJoined(ParticipantId),
    /// The other participant disconnected.
    #[serde(rename = "room:playerLeft")]
    PlayerLeft(ParticipantId),
    /// Matchmaking paired the recipient into this room.
    #[serde(rename = "matchmaking:found")]
    MatchFound(RoomCode),
}

impl ServerEvent {
    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Welcome(_) => "session:welcome",
            ServerEvent::RoomJoined(_) => "room:joined",
            ServerEvent::State(_) => "game:state",
            ServerEvent::MoveApplied(_) => "game:move",
            ServerEvent::GameEnded(_) => "game:end",
            ServerEvent::Error(_) => "game:error",
            ServerEvent::PlayerJoined(_) => "room:playerJoined",
            ServerEvent::PlayerLeft(_) => "room:playerLeft",
            ServerEvent::MatchFound(_) => "matchmaking:found",
        }
    }
}
