//! Authoritative state for a single match.

use crate::error::RoomError;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use duel_tictactoe::{Board, Difficulty, GameResult, Line, Player, check_game_result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a connected participant.
pub type ParticipantId = String;

/// Alphabet for join codes. Upper-case only, so lower-case input can be
/// normalized without ambiguity.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a join code.
pub const CODE_LEN: usize = 6;

/// Human-shareable room join code.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Generates a random code. Uniqueness is the registry's job.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let code = (0..CODE_LEN)
            .map(|_| char::from(CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Normalizes user input: trims whitespace and upper-cases.
    pub fn parse(input: &str) -> Self {
        Self(input.trim().to_ascii_uppercase())
    }

    /// The code as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Game variant requested when creating a room.
///
/// Only [`GameMode::Ai`] changes how the coordinator behaves; the other
/// variants are carried for clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameMode {
    /// Standard two-player game.
    #[default]
    Classic,
    /// Timed variant.
    Speed,
    /// Ultimate variant.
    Ultimate,
    /// Power-up variant.
    PowerUp,
    /// Single participant against the server-hosted engine.
    Ai,
}

/// Lifecycle of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Waiting for a second participant.
    Waiting,
    /// Moves are being accepted.
    Active,
    /// Game over; the room lingers until evicted.
    Finished,
}

/// How a finished room ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomOutcome {
    /// A participant completed a line.
    Win {
        /// Winning mark.
        mark: Player,
        /// Completed line.
        line: Line,
    },
    /// Full board, no line.
    Draw,
    /// A participant left before the game ended. No winner is recorded.
    Abandoned,
}

/// Winner field of snapshots and end-of-game notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// X won.
    X,
    /// O won.
    O,
    /// Nobody won.
    #[serde(rename = "draw")]
    Draw,
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Winner::X,
            Player::O => Winner::O,
        }
    }
}

impl RoomOutcome {
    /// Winner as reported on the wire. Abandoned games have none.
    pub fn winner(&self) -> Option<Winner> {
        match self {
            RoomOutcome::Win { mark, .. } => Some((*mark).into()),
            RoomOutcome::Draw => Some(Winner::Draw),
            RoomOutcome::Abandoned => None,
        }
    }

    /// Completed line, for wins.
    pub fn winning_line(&self) -> Option<Line> {
        match self {
            RoomOutcome::Win { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// A move accepted by a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Cell played.
    pub position: usize,
    /// Mark placed.
    pub player: Player,
    /// When the move was applied.
    pub timestamp: DateTime<Utc>,
}

/// Payload of the end-of-game notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEnd {
    /// Winning mark or draw; `None` when abandoned.
    pub winner: Option<Winner>,
    /// Completed line for wins.
    pub winning_line: Option<Line>,
}

/// Read-only copy of a room, as broadcast to participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Room id.
    pub id: String,
    /// Join code.
    pub room_code: RoomCode,
    /// Game mode.
    pub mode: GameMode,
    /// Lifecycle status.
    pub status: RoomStatus,
    /// Board after the latest move.
    pub board: Board,
    /// Mark to move next.
    pub current_turn: Player,
    /// Participant playing X.
    pub player1_id: ParticipantId,
    /// Participant playing O, once joined.
    pub player2_id: Option<ParticipantId>,
    /// Result, once finished.
    pub winner: Option<Winner>,
    /// Completed line, for wins.
    pub winning_line: Option<Line>,
    /// Accepted moves in order.
    pub moves: Vec<MoveRecord>,
    /// Engine strength for AI rooms.
    pub difficulty: Option<Difficulty>,
    /// Display name of the engine for AI rooms.
    pub ai_name: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// What a successful move did to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveApplied {
    /// The accepted move.
    pub record: MoveRecord,
    /// Board evaluation after the move.
    pub result: GameResult,
}

/// Authoritative state of one match.
///
/// The first participant always plays X; the second, once seated, plays O.
#[derive(Debug, Clone, Getters)]
pub struct Room {
    id: String,
    code: RoomCode,
    mode: GameMode,
    board: Board,
    current_turn: Player,
    player_x: ParticipantId,
    player_o: Option<ParticipantId>,
    status: RoomStatus,
    outcome: Option<RoomOutcome>,
    difficulty: Option<Difficulty>,
    ai_name: Option<String>,
    moves: Vec<MoveRecord>,
    created_at: DateTime<Utc>,
}

impl Room {
    /// Creates a room with the creator seated as X.
    ///
    /// AI rooms start active; others wait for a second participant.
    #[instrument(skip(created_at))]
    pub fn new(
        id: String,
        code: RoomCode,
        mode: GameMode,
        creator: ParticipantId,
        difficulty: Option<Difficulty>,
        ai_name: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let status = if mode == GameMode::Ai {
            RoomStatus::Active
        } else {
            RoomStatus::Waiting
        };
        info!(room_code = %code, ?mode, ?status, "Creating room");
        Self {
            id,
            code,
            mode,
            board: Board::new(),
            current_turn: Player::X,
            player_x: creator,
            player_o: None,
            status,
            outcome: None,
            difficulty,
            ai_name,
            moves: Vec::new(),
            created_at,
        }
    }

    /// Creates an active room for two matched participants.
    pub fn matched(
        id: String,
        code: RoomCode,
        first: ParticipantId,
        second: ParticipantId,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut room = Self::new(id, code, GameMode::Classic, first, None, None, created_at);
        room.player_o = Some(second);
        room.status = RoomStatus::Active;
        room
    }

    /// Whether the participant is seated in this room.
    pub fn has_participant(&self, participant: &str) -> bool {
        self.mark_of(participant).is_some()
    }

    /// Mark bound to the participant.
    pub fn mark_of(&self, participant: &str) -> Option<Player> {
        if self.player_x == participant {
            Some(Player::X)
        } else if self.player_o.as_deref() == Some(participant) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Seated participants, X first.
    pub fn participants(&self) -> Vec<ParticipantId> {
        std::iter::once(self.player_x.clone())
            .chain(self.player_o.clone())
            .collect()
    }

    /// The other seated participant.
    pub fn opponent_of(&self, participant: &str) -> Option<&ParticipantId> {
        match self.mark_of(participant)? {
            Player::X => self.player_o.as_ref(),
            Player::O => Some(&self.player_x),
        }
    }

    /// Whether the server-hosted engine owns the O seat.
    pub fn hosts_ai(&self) -> bool {
        self.mode == GameMode::Ai
    }

    /// Seats a second participant as O and activates the room.
    #[instrument(skip(self), fields(room_code = %self.code))]
    pub fn seat(&mut self, joiner: ParticipantId) -> Result<(), RoomError> {
        if self.has_participant(&joiner) {
            warn!(%joiner, "Participant already in room");
            return Err(RoomError::AlreadyInRoom);
        }
        if self.hosts_ai() || self.player_o.is_some() {
            warn!(%joiner, "Room already has 2 players");
            return Err(RoomError::RoomFull);
        }
        if self.status != RoomStatus::Waiting {
            warn!(%joiner, status = ?self.status, "Room no longer accepting players");
            return Err(RoomError::GameNotActive);
        }

        info!(%joiner, mark = "O", "Seating participant");
        self.player_o = Some(joiner);
        self.status = RoomStatus::Active;
        Ok(())
    }

    /// Applies a participant's move after checking status and turn order.
    #[instrument(skip(self, now), fields(room_code = %self.code))]
    pub fn play(
        &mut self,
        participant: &str,
        position: usize,
        now: DateTime<Utc>,
    ) -> Result<MoveApplied, RoomError> {
        if self.status != RoomStatus::Active {
            warn!(status = ?self.status, "Move on inactive room");
            return Err(RoomError::GameNotActive);
        }

        if self.mark_of(participant) != Some(self.current_turn) {
            warn!(
                participant,
                expected_mark = ?self.current_turn,
                "Participant tried to move out of turn"
            );
            return Err(RoomError::NotYourTurn);
        }

        self.place(self.current_turn, position, now)
    }

    /// Places `mark` for the side to move without a participant check.
    /// Used for the server-hosted engine's replies.
    pub fn place(
        &mut self,
        mark: Player,
        position: usize,
        now: DateTime<Utc>,
    ) -> Result<MoveApplied, RoomError> {
        if self.status != RoomStatus::Active {
            return Err(RoomError::GameNotActive);
        }
        if mark != self.current_turn {
            return Err(RoomError::NotYourTurn);
        }

        let board = self.board.with_mark(position, mark).map_err(|e| {
            warn!(position, error = %e, "Invalid move");
            RoomError::InvalidMove { position }
        })?;

        let record = MoveRecord {
            position,
            player: mark,
            timestamp: now,
        };
        self.board = board;
        self.moves.push(record);

        let result = check_game_result(&self.board);
        match result {
            GameResult::InProgress => {
                self.current_turn = mark.opponent();
            }
            GameResult::Win { mark, line } => {
                self.finish(RoomOutcome::Win { mark, line });
            }
            GameResult::Draw => {
                self.finish(RoomOutcome::Draw);
            }
        }

        debug!(position, ?mark, ?result, "Move applied");
        Ok(MoveApplied { record, result })
    }

    /// Ends an unfinished game with no winner. Returns whether anything changed.
    pub fn abandon(&mut self) -> bool {
        if self.status == RoomStatus::Finished {
            return false;
        }
        info!(room_code = %self.code, "Room abandoned");
        self.finish(RoomOutcome::Abandoned);
        true
    }

    fn finish(&mut self, outcome: RoomOutcome) {
        self.status = RoomStatus::Finished;
        self.outcome = Some(outcome);
    }

    /// Read-only copy for broadcasting.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id.clone(),
            room_code: self.code.clone(),
            mode: self.mode,
            status: self.status,
            board: self.board,
            current_turn: self.current_turn,
            player1_id: self.player_x.clone(),
            player2_id: self.player_o.clone(),
            winner: self.outcome.and_then(|o| o.winner()),
            winning_line: self.outcome.and_then(|o| o.winning_line()),
            moves: self.moves.clone(),
            difficulty: self.difficulty,
            ai_name: self.ai_name.clone(),
            created_at: self.created_at,
        }
    }

    /// End-of-game payload, once finished.
    pub fn game_end(&self) -> Option<GameEnd> {
        self.outcome.map(|outcome| GameEnd {
            winner: outcome.winner(),
            winning_line: outcome.winning_line(),
        })
    }
}
