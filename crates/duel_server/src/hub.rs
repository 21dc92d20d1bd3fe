//! Outbound delivery to connected participants.

use crate::events::ServerEvent;
use crate::room::ParticipantId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, instrument, trace};

/// Registry of per-participant outbound channels.
///
/// Sending never blocks and never fails from the caller's point of view:
/// events for participants that are gone are dropped.
#[derive(Debug, Clone, Default)]
pub struct ConnectionHub {
    senders: Arc<Mutex<HashMap<ParticipantId, UnboundedSender<ServerEvent>>>>,
}

impl ConnectionHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ParticipantId, UnboundedSender<ServerEvent>>> {
        self.senders.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Opens a channel for the participant, replacing any previous one.
    #[instrument(skip(self))]
    pub fn register(&self, participant: &str) -> UnboundedReceiver<ServerEvent> {
        let (tx, rx) = unbounded_channel();
        self.lock().insert(participant.to_string(), tx);
        debug!("Participant connected");
        rx
    }

    /// Drops the participant's channel.
    #[instrument(skip(self))]
    pub fn unregister(&self, participant: &str) {
        if self.lock().remove(participant).is_some() {
            debug!("Participant disconnected");
        }
    }

    /// Delivers an event to one participant.
    pub fn send(&self, participant: &str, event: ServerEvent) {
        let senders = self.lock();
        match senders.get(participant) {
            Some(tx) => {
                trace!(participant, event = event.name(), "Sending event");
                if tx.send(event).is_err() {
                    debug!(participant, "Receiver dropped, event discarded");
                }
            }
            None => trace!(participant, event = event.name(), "No connection, event discarded"),
        }
    }

    /// Delivers a copy of an event to each participant.
    pub fn send_all(&self, participants: &[ParticipantId], event: &ServerEvent) {
        for participant in participants {
            self.send(participant, event.clone());
        }
    }

    /// Number of open connections.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no participant is connected.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Closes every channel.
    pub fn clear(&self) {
        self.lock().clear();
    }
}
