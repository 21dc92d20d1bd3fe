//! Deferred removal of finished rooms.

use crate::room::RoomCode;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Eviction deadlines keyed by room code.
///
/// Each room has at most one pending eviction. Deadlines are compared
/// against a caller-supplied time, so tests drive them with a manual clock.
#[derive(Debug, Default)]
pub struct EvictionSchedule {
    deadlines: HashMap<RoomCode, DateTime<Utc>>,
}

impl EvictionSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules eviction at `at`. Returns `false`, leaving the existing
    /// deadline in place, if the room is already scheduled.
    #[instrument(skip(self))]
    pub fn schedule(&mut self, code: &RoomCode, at: DateTime<Utc>) -> bool {
        if self.deadlines.contains_key(code) {
            debug!("Eviction already scheduled");
            return false;
        }
        self.deadlines.insert(code.clone(), at);
        debug!("Eviction scheduled");
        true
    }

    /// Cancels a pending eviction. Returns whether one existed.
    pub fn cancel(&mut self, code: &RoomCode) -> bool {
        self.deadlines.remove(code).is_some()
    }

    /// Pending deadline for a room.
    pub fn deadline(&self, code: &RoomCode) -> Option<DateTime<Utc>> {
        self.deadlines.get(code).copied()
    }

    /// Removes and returns every room due at `now`, earliest first.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<RoomCode> {
        let mut due: Vec<(DateTime<Utc>, RoomCode)> = self
            .deadlines
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(code, at)| (*at, code.clone()))
            .collect();
        due.sort();
        for (_, code) in &due {
            self.deadlines.remove(code);
        }
        due.into_iter().map(|(_, code)| code).collect()
    }

    /// Number of pending evictions.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Drops every pending eviction.
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_no_double_scheduling() {
        let mut schedule = EvictionSchedule::new();
        let code = RoomCode::parse("AAAAAA");
        let t0 = DateTime::<Utc>::UNIX_EPOCH;

        assert!(schedule.schedule(&code, t0 + TimeDelta::seconds(60)));
        assert!(!schedule.schedule(&code, t0 + TimeDelta::seconds(120)));
        assert_eq!(schedule.deadline(&code), Some(t0 + TimeDelta::seconds(60)));
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_take_due_in_deadline_order() {
        let mut schedule = EvictionSchedule::new();
        let t0 = DateTime::<Utc>::UNIX_EPOCH;
        let late = RoomCode::parse("LATE01");
        let early = RoomCode::parse("EARLY1");
        let never = RoomCode::parse("NEVER1");
        schedule.schedule(&late, t0 + TimeDelta::seconds(30));
        schedule.schedule(&early, t0 + TimeDelta::seconds(10));
        schedule.schedule(&never, t0 + TimeDelta::seconds(90));

        assert!(schedule.take_due(t0).is_empty());
        assert_eq!(schedule.take_due(t0 + TimeDelta::seconds(60)), vec![early, late]);
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut schedule = EvictionSchedule::new();
        let code = RoomCode::parse("ABCDEF");
        schedule.schedule(&code, DateTime::<Utc>::UNIX_EPOCH);
        assert!(schedule.cancel(&code));
        assert!(!schedule.cancel(&code));
        assert!(schedule.take_due(Utc::now()).is_empty());
    }
}
