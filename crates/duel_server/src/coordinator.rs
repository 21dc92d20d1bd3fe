//! Room coordinator: the single owner of rooms, the matchmaking queue and
//! eviction deadlines.
//!
//! Every operation takes the registry lock once and validates, mutates and
//! queues notifications while holding it, so participants never observe a
//! half-applied move. Notifications go out through the [`ConnectionHub`],
//! which never blocks.

use crate::clock::{Clock, SystemClock};
use crate::config::ServerConfig;
use crate::error::RoomError;
use crate::events::ServerEvent;
use crate::eviction::EvictionSchedule;
use crate::hub::ConnectionHub;
use crate::matchmaking::MatchmakingQueue;
use crate::room::{GameMode, MoveApplied, Room, RoomCode, RoomSnapshot, RoomStatus};
use chrono::{DateTime, TimeDelta, Utc};
use duel_tictactoe::{Difficulty, GameResult, Player, random_ai_name, select_move};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, instrument, warn};

/// Mark played by the server-hosted engine in AI rooms.
const AI_MARK: Player = Player::O;

#[derive(Debug)]
struct Registry {
    rooms: HashMap<RoomCode, Room>,
    /// Room codes, oldest first.
    order: Vec<RoomCode>,
    queue: MatchmakingQueue,
    evictions: EvictionSchedule,
    rng: StdRng,
    next_room_id: u64,
}

impl Registry {
    fn new(rng: StdRng) -> Self {
        Self {
            rooms: HashMap::new(),
            order: Vec::new(),
            queue: MatchmakingQueue::new(),
            evictions: EvictionSchedule::new(),
            rng,
            next_room_id: 1,
        }
    }

    fn fresh_code(&mut self) -> RoomCode {
        loop {
            let code = RoomCode::random(&mut self.rng);
            if !self.rooms.contains_key(&code) {
                return code;
            }
            debug!(%code, "Room code collision, regenerating");
        }
    }

    fn fresh_id(&mut self) -> String {
        let id = format!("game-{}", self.next_room_id);
        self.next_room_id += 1;
        id
    }

    fn insert(&mut self, room: Room) {
        let code = room.code().clone();
        self.order.push(code.clone());
        self.rooms.insert(code, room);
    }

    fn remove(&mut self, code: &RoomCode) -> Option<Room> {
        let room = self.rooms.remove(code)?;
        self.order.retain(|kept| kept != code);
        Some(room)
    }

    fn clear(&mut self) {
        self.rooms.clear();
        self.order.clear();
    }

    /// Room the participant plays in: the oldest active one, else the
    /// oldest they sit in.
    fn room_of(&self, participant: &str) -> Option<RoomCode> {
        let mut fallback = None;
        for code in &self.order {
            let Some(room) = self.rooms.get(code) else {
                continue;
            };
            if !room.has_participant(participant) {
                continue;
            }
            if *room.status() == RoomStatus::Active {
                return Some(code.clone());
            }
            fallback.get_or_insert_with(|| code.clone());
        }
        fallback
    }
}

/// Counters describing the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CoordinatorStats {
    /// Rooms in the registry, finished ones included.
    pub rooms: usize,
    /// Rooms accepting moves.
    pub active_rooms: usize,
    /// Participants waiting for a match.
    pub queued: usize,
    /// Rooms awaiting eviction.
    pub pending_evictions: usize,
    /// Open connections.
    pub connections: usize,
}

/// Cheaply cloneable handle to the shared room registry.
#[derive(Debug, Clone)]
pub struct RoomCoordinator {
    registry: Arc<Mutex<Registry>>,
    hub: ConnectionHub,
    clock: Arc<dyn Clock>,
    eviction_delay: TimeDelta,
    default_difficulty: Difficulty,
}

impl RoomCoordinator {
    /// Creates a coordinator on the wall clock.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a coordinator on the given clock.
    #[instrument(skip(config, clock), fields(seed = ?config.rng_seed()))]
    pub fn with_clock(config: &ServerConfig, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.rng_seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_os_rng(),
        };
        info!(
            eviction_delay_secs = config.eviction_delay_secs(),
            default_difficulty = %config.default_difficulty(),
            "Room coordinator ready"
        );
        Self {
            registry: Arc::new(Mutex::new(Registry::new(rng))),
            hub: ConnectionHub::new(),
            clock,
            eviction_delay: config.eviction_delay(),
            default_difficulty: *config.default_difficulty(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Eviction deadline for a room finishing now.
    fn eviction_deadline(&self) -> DateTime<Utc> {
        self.clock
            .now()
            .checked_add_signed(self.eviction_delay)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Current time on the coordinator's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Outbound delivery hub.
    pub fn hub(&self) -> &ConnectionHub {
        &self.hub
    }

    /// Registers a transport endpoint and greets it with its id.
    #[instrument(skip(self))]
    pub fn connect(&self, participant: &str) -> UnboundedReceiver<ServerEvent> {
        let rx = self.hub.register(participant);
        self.hub
            .send(participant, ServerEvent::Welcome(participant.to_string()));
        rx
    }

    /// Reports a rejected request to the participant that made it.
    pub fn report_error(&self, participant: &str, error: &RoomError) {
        self.hub.send(participant, ServerEvent::Error(error.to_string()));
    }

    /// Opens a room with the creator seated as X.
    ///
    /// AI rooms start active with the engine seated as O at `difficulty`
    /// (the configured default when `None`). Other rooms ignore `difficulty`.
    #[instrument(skip(self))]
    pub fn create_room(
        &self,
        mode: GameMode,
        creator: &str,
        difficulty: Option<Difficulty>,
    ) -> RoomSnapshot {
        let mut registry = self.lock();
        let code = registry.fresh_code();
        let id = registry.fresh_id();
        let (difficulty, ai_name) = if mode == GameMode::Ai {
            let name = random_ai_name(&mut registry.rng);
            (
                Some(difficulty.unwrap_or(self.default_difficulty)),
                Some(name.to_string()),
            )
        } else {
            (None, None)
        };

        let room = Room::new(
            id,
            code.clone(),
            mode,
            creator.to_string(),
            difficulty,
            ai_name,
            self.clock.now(),
        );
        let snapshot = room.snapshot();
        registry.insert(room);

        self.hub.send(creator, ServerEvent::RoomJoined(code));
        self.hub
            .send(creator, ServerEvent::State(Box::new(snapshot.clone())));
        snapshot
    }

    /// Seats `joiner` as O in the room with the given join code.
    #[instrument(skip(self))]
    pub fn join_room(&self, code: &str, joiner: &str) -> Result<RoomSnapshot, RoomError> {
        let code = RoomCode::parse(code);
        let mut registry = self.lock();
        let room = registry.rooms.get_mut(&code).ok_or_else(|| {
            warn!(%code, "Room not found");
            RoomError::RoomNotFound
        })?;

        room.seat(joiner.to_string())?;
        let snapshot = room.snapshot();
        let participants = room.participants();

        self.hub.send(joiner, ServerEvent::RoomJoined(code));
        self.hub
            .send_all(&participants, &ServerEvent::PlayerJoined(joiner.to_string()));
        self.hub
            .send_all(&participants, &ServerEvent::State(Box::new(snapshot.clone())));
        Ok(snapshot)
    }

    /// Applies a move for the participant in the room they play in.
    ///
    /// In AI rooms, the engine replies within the same call when the game
    /// is still on. Returns the snapshot after all moves.
    #[instrument(skip(self))]
    pub fn apply_move(
        &self,
        participant: &str,
        position: usize,
    ) -> Result<RoomSnapshot, RoomError> {
        let mut guard = self.lock();
        let registry = &mut *guard;
        let code = registry.room_of(participant).ok_or_else(|| {
            warn!("Participant is not in a room");
            RoomError::GameNotFound
        })?;
        let room = registry
            .rooms
            .get_mut(&code)
            .ok_or(RoomError::GameNotFound)?;

        let applied = room.play(participant, position, self.clock.now())?;
        self.publish_move(room, &mut registry.evictions, applied);

        let engine_to_move = room.hosts_ai()
            && *room.status() == RoomStatus::Active
            && *room.current_turn() == AI_MARK;
        if engine_to_move {
            let difficulty = room.difficulty().unwrap_or(self.default_difficulty);
            if let Some(reply) = select_move(
                room.board(),
                difficulty,
                AI_MARK,
                AI_MARK.opponent(),
                &mut registry.rng,
            ) {
                debug!(reply, %difficulty, "Engine reply");
                let applied = room.place(AI_MARK, reply, self.clock.now())?;
                self.publish_move(room, &mut registry.evictions, applied);
            }
        }

        Ok(room.snapshot())
    }

    /// Emits the notifications for an accepted move and schedules eviction
    /// when it ended the game.
    fn publish_move(&self, room: &Room, evictions: &mut EvictionSchedule, applied: MoveApplied) {
        let participants = room.participants();
        if applied.result != GameResult::InProgress {
            evictions.schedule(room.code(), self.eviction_deadline());
            if let Some(end) = room.game_end() {
                info!(room_code = %room.code(), winner = ?end.winner, "Game over");
                self.hub.send_all(&participants, &ServerEvent::GameEnded(end));
            }
        }
        self.hub
            .send_all(&participants, &ServerEvent::MoveApplied(applied.record));
        self.hub
            .send_all(&participants, &ServerEvent::State(Box::new(room.snapshot())));
    }

    /// Cleans up after a participant's transport closed.
    ///
    /// Removes them from the queue and, for every room they sit in, tells
    /// the other participant once, abandons the game if unfinished and
    /// schedules eviction.
    #[instrument(skip(self))]
    pub fn disconnect(&self, participant: &str) {
        let mut guard = self.lock();
        let registry = &mut *guard;
        if registry.queue.leave(participant) {
            debug!("Removed from matchmaking");
        }

        let deadline = self.eviction_deadline();
        for code in &registry.order {
            let Some(room) = registry.rooms.get_mut(code) else {
                continue;
            };
            if !room.has_participant(participant) {
                continue;
            }
            let abandoned = room.abandon();
            registry.evictions.schedule(room.code(), deadline);

            if let Some(opponent) = room.opponent_of(participant) {
                self.hub
                    .send(opponent, ServerEvent::PlayerLeft(participant.to_string()));
                if abandoned {
                    self.hub
                        .send(opponent, ServerEvent::State(Box::new(room.snapshot())));
                }
            }
        }
        drop(guard);
        self.hub.unregister(participant);
    }

    /// Enters the matchmaking queue. Returns the new room when this join
    /// completed a pair.
    #[instrument(skip(self))]
    pub fn join_queue(&self, participant: &str) -> Option<RoomSnapshot> {
        let mut registry = self.lock();
        registry.queue.join(participant);
        let (first, second) = registry.queue.pop_pair()?;

        let code = registry.fresh_code();
        let id = registry.fresh_id();
        let room = Room::matched(id, code.clone(), first, second, self.clock.now());
        let snapshot = room.snapshot();
        let participants = room.participants();
        info!(%code, ?participants, "Match found");
        registry.insert(room);

        self.hub
            .send_all(&participants, &ServerEvent::MatchFound(code));
        self.hub
            .send_all(&participants, &ServerEvent::State(Box::new(snapshot.clone())));
        Some(snapshot)
    }

    /// Leaves the matchmaking queue. Returns whether the participant was queued.
    #[instrument(skip(self))]
    pub fn leave_queue(&self, participant: &str) -> bool {
        self.lock().queue.leave(participant)
    }

    /// Current state of a room, until it is evicted.
    pub fn snapshot(&self, code: &str) -> Option<RoomSnapshot> {
        self.lock()
            .rooms
            .get(&RoomCode::parse(code))
            .map(Room::snapshot)
    }

    /// Evicts every room whose deadline is at or before `now`.
    #[instrument(skip(self))]
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<RoomCode> {
        let mut registry = self.lock();
        let due = registry.evictions.take_due(now);
        for code in &due {
            if registry.remove(code).is_some() {
                info!(%code, "Room evicted");
            }
        }
        due
    }

    /// Registry counters.
    pub fn stats(&self) -> CoordinatorStats {
        let registry = self.lock();
        CoordinatorStats {
            rooms: registry.rooms.len(),
            active_rooms: registry
                .rooms
                .values()
                .filter(|room| *room.status() == RoomStatus::Active)
                .count(),
            queued: registry.queue.len(),
            pending_evictions: registry.evictions.len(),
            connections: self.hub.len(),
        }
    }

    /// Drops all rooms, queued participants, deadlines and connections.
    #[instrument(skip(self))]
    pub fn shutdown(&self) {
        let mut registry = self.lock();
        info!(rooms = registry.rooms.len(), "Shutting down coordinator");
        registry.clear();
        registry.queue.clear();
        registry.evictions.clear();
        drop(registry);
        self.hub.clear();
    }
}
