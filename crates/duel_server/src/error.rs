//! Room coordination errors.

/// Rejection of a room or matchmaking request.
///
/// These are reported to the participant that made the request and
/// never broadcast to the rest of the room.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RoomError {
    /// No room has the given join code.
    #[display("Room not found")]
    RoomNotFound,

    /// The room already has two participants, or is an AI room.
    #[display("Room is full")]
    RoomFull,

    /// The participant tried to join a room they already belong to.
    #[display("Already in this room")]
    AlreadyInRoom,

    /// The participant is not in any room.
    #[display("Game not found")]
    GameNotFound,

    /// The room is waiting for an opponent or has finished.
    #[display("Game is not active")]
    GameNotActive,

    /// The participant's mark is not the one to move.
    #[display("Not your turn")]
    NotYourTurn,

    /// Target cell is occupied or outside 0-8.
    #[display("Invalid move at position {}", position)]
    InvalidMove {
        /// Requested cell.
        position: usize,
    },
}

impl std::error::Error for RoomError {}
