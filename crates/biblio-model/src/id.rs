//! Entity identity and time collaborators.
//!
//! Every entity in the library (book, saga, collection, volume) is keyed by an
//! [`EntityId`]. Ids are handed out by an [`IdGenerator`] that is constructed
//! explicitly and injected into the transition engine -- there is no
//! process-wide counter, so tests can substitute [`SequentialIds`] for fully
//! deterministic runs.
//!
//! Wall-clock access goes through the [`Clock`] trait for the same reason:
//! actions that omit an explicit timestamp fall back to `clock.now()`, and
//! tests pin that with [`FixedClock`].
//!
//! # Example
//!
//! ```
//! use biblio_model::id::{IdGenerator, SequentialIds};
//!
//! let mut ids = SequentialIds::new();
//! assert_eq!(ids.next_id().value(), 1);
//! assert_eq!(ids.next_id().value(), 2);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch. The legacy export format stores all
/// dates this way, so the whole model sticks to it.
pub type Timestamp = i64;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// Unique numeric id for a library entity.
///
/// Ids are unique across all entity kinds (a book and a saga never share an
/// id when produced by the same generator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Returns the raw numeric value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current wall-clock time.
///
/// The transition engine only reads the clock when an action omits an
/// explicit timestamp; this is one of the two documented impurities of the
/// engine (the other being id generation).
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// A clock pinned to a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

// ---------------------------------------------------------------------------
// IdGenerator
// ---------------------------------------------------------------------------

/// Hands out fresh, never-repeating entity ids.
///
/// Implementations must be monotonic and collision-free even for calls made
/// within the same millisecond.
pub trait IdGenerator {
    /// Returns the next unused id.
    fn next_id(&mut self) -> EntityId;
}

/// Timestamp-based id generator.
///
/// Combines the current epoch-millisecond with an incrementing sub-counter so
/// that ids remain unique (and sortable by creation time) even when several
/// entities are created within the same instant. Each millisecond admits up
/// to 1024 ids; the counter rolls into the timestamp bits beyond that, which
/// still preserves monotonicity.
#[derive(Debug, Clone)]
pub struct ClockIds<C: Clock> {
    clock: C,
    last: EntityId,
}

impl<C: Clock> ClockIds<C> {
    /// Create a generator reading time from the given clock.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: EntityId(0),
        }
    }
}

impl Default for ClockIds<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> IdGenerator for ClockIds<C> {
    fn next_id(&mut self) -> EntityId {
        let candidate = EntityId((self.clock.now().max(0) as u64) << 10);
        // Same-instant calls bump past the previously issued id.
        let id = if candidate <= self.last {
            EntityId(self.last.0 + 1)
        } else {
            candidate
        };
        self.last = id;
        id
    }
}

/// Counter-based generator starting at 1, for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Create a generator whose first id is 1.
    pub fn new() -> Self {
        Self { next: 0 }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_start_at_one() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), EntityId(1));
        assert_eq!(ids.next_id(), EntityId(2));
        assert_eq!(ids.next_id(), EntityId(3));
    }

    #[test]
    fn clock_ids_unique_within_same_instant() {
        let mut ids = ClockIds::new(FixedClock(1_700_000_000_000));
        let mut seen = std::collections::HashSet::new();
        let mut previous = EntityId(0);
        for _ in 0..2048 {
            let id = ids.next_id();
            assert!(id > previous, "ids must be strictly increasing");
            assert!(seen.insert(id), "ids must never repeat");
            previous = id;
        }
    }

    #[test]
    fn clock_ids_follow_advancing_clock() {
        let mut ids = ClockIds::new(FixedClock(1_000));
        let first = ids.next_id();
        assert_eq!(first, EntityId(1_000 << 10));

        // A later instant produces a strictly larger id.
        let mut later = ClockIds::new(FixedClock(2_000));
        assert!(later.next_id() > first);
    }

    #[test]
    fn fixed_clock_is_stable() {
        let clock = FixedClock(42);
        assert_eq!(clock.now(), 42);
        assert_eq!(clock.now(), 42);
    }

    #[test]
    fn entity_id_serializes_transparently() {
        let id = EntityId(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: EntityId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }
}
