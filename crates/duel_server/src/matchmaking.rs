//! FIFO matchmaking queue.

use crate::room::ParticipantId;
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Participants waiting for an opponent, oldest first.
#[derive(Debug, Default)]
pub struct MatchmakingQueue {
    waiting: VecDeque<ParticipantId>,
}

impl MatchmakingQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a participant. Returns `false` if already queued.
    #[instrument(skip(self))]
    pub fn join(&mut self, participant: &str) -> bool {
        if self.contains(participant) {
            debug!("Already queued");
            return false;
        }
        self.waiting.push_back(participant.to_string());
        debug!(queued = self.waiting.len(), "Joined matchmaking");
        true
    }

    /// Removes a participant. Returns whether they were queued.
    #[instrument(skip(self))]
    pub fn leave(&mut self, participant: &str) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|p| p != participant);
        before != self.waiting.len()
    }

    /// Dequeues the two oldest participants once two are waiting.
    pub fn pop_pair(&mut self) -> Option<(ParticipantId, ParticipantId)> {
        if self.waiting.len() < 2 {
            return None;
        }
        let first = self.waiting.pop_front()?;
        let second = self.waiting.pop_front()?;
        Some((first, second))
    }

    /// Whether the participant is queued.
    pub fn contains(&self, participant: &str) -> bool {
        self.waiting.iter().any(|p| p == participant)
    }

    /// Waiting participants, oldest first.
    pub fn waiting(&self) -> impl Iterator<Item = &ParticipantId> {
        self.waiting.iter()
    }

    /// Number of waiting participants.
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    /// Whether nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Empties the queue.
    pub fn clear(&mut self) {
        self.waiting.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_is_idempotent() {
        let mut queue = MatchmakingQueue::new();
        assert!(queue.join("a"));
        assert!(!queue.join("a"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_pairs_in_fifo_order() {
        let mut queue = MatchmakingQueue::new();
        queue.join("a");
        assert_eq!(queue.pop_pair(), None);
        queue.join("b");
        queue.join("c");
        assert_eq!(queue.pop_pair(), Some(("a".to_string(), "b".to_string())));
        assert_eq!(queue.waiting().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_leave() {
        let mut queue = MatchmakingQueue::new();
        queue.join("a");
        assert!(queue.leave("a"));
        assert!(!queue.leave("a"));
        assert!(queue.is_empty());
    }
}
