//! Multiplayer tic-tac-toe server.
//!
//! # Architecture
//!
//! - **Room**: authoritative per-match state and move validation
//! - **Coordinator**: shared registry of rooms, matchmaking and eviction
//! - **Hub**: fire-and-forget delivery of [`ServerEvent`]s to participants
//! - **HTTP**: engine endpoints, room lookup and the WebSocket transport
//!
//! # Example
//!
//! ```
//! use duel_server::{GameMode, RoomCoordinator, RoomStatus, ServerConfig};
//!
//! let coordinator = RoomCoordinator::new(&ServerConfig::default());
//! let room = coordinator.create_room(GameMode::Classic, "alice", None);
//! let room = coordinator
//!     .join_room(room.room_code.as_str(), "bob")
//!     .unwrap();
//! assert_eq!(room.status, RoomStatus::Active);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod clock;
mod config;
mod coordinator;
mod error;
mod events;
mod eviction;
pub mod http;
mod hub;
mod matchmaking;
mod room;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ServerConfig};
pub use coordinator::{CoordinatorStats, RoomCoordinator};
pub use error::RoomError;
pub use events::{ClientEvent, CreateRoom, ServerEvent};
pub use eviction::EvictionSchedule;
pub use hub::ConnectionHub;
pub use matchmaking::MatchmakingQueue;
pub use room::{
    CODE_LEN, GameEnd, GameMode, MoveApplied, MoveRecord, ParticipantId, Room, RoomCode,
    RoomOutcome, RoomSnapshot, RoomStatus, Winner,
};
