#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Bounded lifecycle event bus.
//!
//! Adapted from the memory-backed broadcast bus pattern, but narrowed
//! to a closed, typed [`LifecycleEvent`] enum and a pull-based ring
//! buffer instead of a live broadcast subscription: callers query the
//! log after the fact (`events_since`, `by_type`, paginated `page`)
//! rather than holding an open receiver, which is all the firing
//! history API needs.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use reflexcore_types::{GoalKey, ReflexInstanceId, SkipReason, VerificationOutcome};
use serde::{Deserialize, Serialize};

/// Maximum number of events retained before oldest-first eviction.
pub const MAX_BUFFERED_EVENTS: usize = 500;

/// Maximum age, in milliseconds, before an event is evicted regardless
/// of buffer occupancy (30 minutes).
pub const EVENT_TTL_MS: i64 = 30 * 60 * 1000;

/// The closed set of lifecycle stages a reflex firing passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The hysteresis/threshold gate armed for a drive.
    Triggered {
        /// Correlation id for this firing.
        reflex_instance_id: ReflexInstanceId,
        /// Epoch-ms timestamp.
        at_ms: i64,
    },
    /// Candidate goals were generated for the armed drive.
    CandidatesGenerated {
        /// Correlation id for this firing.
        reflex_instance_id: ReflexInstanceId,
        /// Number of candidates produced.
        candidate_count: usize,
        /// Epoch-ms timestamp.
        at_ms: i64,
    },
    /// A goal was selected from the ranked candidate set.
    GoalSelected {
        /// Correlation id for this firing.
        reflex_instance_id: ReflexInstanceId,
        /// Content-addressed identity of the chosen goal.
        goal_key: GoalKey,
        /// Epoch-ms timestamp.
        at_ms: i64,
    },
    /// A task was formulated from the selected goal.
    TaskFormulated {
        /// Correlation id for this firing.
        reflex_instance_id: ReflexInstanceId,
        /// Content-addressed identity of the goal.
        goal_key: GoalKey,
        /// Epoch-ms timestamp.
        at_ms: i64,
    },
    /// The task was handed to the execution gateway.
    TaskDispatched {
        /// Correlation id for this firing.
        reflex_instance_id: ReflexInstanceId,
        /// Gateway-assigned task identifier.
        task_id: String,
        /// Epoch-ms timestamp.
        at_ms: i64,
    },
    /// Execution reached a terminal state and was verified.
    ExecutionCompleted {
        /// Correlation id for this firing.
        reflex_instance_id: ReflexInstanceId,
        /// Verification outcome computed after completion.
        outcome: VerificationOutcome,
        /// Epoch-ms timestamp.
        at_ms: i64,
    },
    /// The firing was skipped before dispatch.
    Skipped {
        /// Correlation id for this firing.
        reflex_instance_id: ReflexInstanceId,
        /// Why the firing was skipped.
        reason: SkipReason,
        /// Epoch-ms timestamp.
        at_ms: i64,
    },
}

impl LifecycleEvent {
    /// The timestamp carried by every variant.
    #[must_use]
    pub const fn at_ms(&self) -> i64 {
        match self {
            Self::Triggered { at_ms, .. }
            | Self::CandidatesGenerated { at_ms, .. }
            | Self::GoalSelected { at_ms, .. }
            | Self::TaskFormulated { at_ms, .. }
            | Self::TaskDispatched { at_ms, .. }
            | Self::ExecutionCompleted { at_ms, .. }
            | Self::Skipped { at_ms, .. } => *at_ms,
        }
    }

    /// The correlation id carried by every variant.
    #[must_use]
    pub const fn reflex_instance_id(&self) -> ReflexInstanceId {
        match self {
            Self::Triggered {
                reflex_instance_id, ..
            }
            | Self::CandidatesGenerated {
                reflex_instance_id, ..
            }
            | Self::GoalSelected {
                reflex_instance_id, ..
            }
            | Self::TaskFormulated {
                reflex_instance_id, ..
            }
            | Self::TaskDispatched {
                reflex_instance_id, ..
            }
            | Self::ExecutionCompleted {
                reflex_instance_id, ..
            }
            | Self::Skipped {
                reflex_instance_id, ..
            } => *reflex_instance_id,
        }
    }

    /// Short kind tag, stable across serde's `#[serde(tag = "type")]`
    /// representation, for `by_type` queries.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Triggered { .. } => "triggered",
            Self::CandidatesGenerated { .. } => "candidates_generated",
            Self::GoalSelected { .. } => "goal_selected",
            Self::TaskFormulated { .. } => "task_formulated",
            Self::TaskDispatched { .. } => "task_dispatched",
            Self::ExecutionCompleted { .. } => "execution_completed",
            Self::Skipped { .. } => "skipped",
        }
    }
}

/// A bounded, append-only log of lifecycle events.
///
/// Oldest events are evicted first once [`MAX_BUFFERED_EVENTS`] is
/// exceeded, or once an event's age exceeds [`EVENT_TTL_MS`] relative
/// to the timestamp passed to the next `publish`/`sweep` call.
#[derive(Debug, Clone)]
pub struct LifecycleEventLog {
    events: Arc<Mutex<VecDeque<LifecycleEvent>>>,
}

impl LifecycleEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFERED_EVENTS))),
        }
    }

    /// Appends an event, evicting by TTL then by size as needed.
    pub fn publish(&self, event: LifecycleEvent, now_ms: i64) {
        let mut events = self.events.lock();
        events.push_back(event);
        evict(&mut events, now_ms);
    }

    /// Runs the TTL/size eviction sweep without publishing anything.
    pub fn sweep(&self, now_ms: i64) {
        let mut events = self.events.lock();
        evict(&mut events, now_ms);
    }

    /// All events with `at_ms >= since_ms`, oldest first.
    #[must_use]
    pub fn events_since(&self, since_ms: i64) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.at_ms() >= since_ms)
            .cloned()
            .collect()
    }

    /// All events of the given kind tag, oldest first.
    #[must_use]
    pub fn by_type(&self, kind: &str) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.kind() == kind)
            .cloned()
            .collect()
    }

    /// All events for one firing, oldest first.
    #[must_use]
    pub fn by_instance(&self, reflex_instance_id: ReflexInstanceId) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.reflex_instance_id() == reflex_instance_id)
            .cloned()
            .collect()
    }

    /// A page of events, oldest first, for paginated history browsing.
    #[must_use]
    pub fn page(&self, offset: usize, limit: usize) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Current number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether the log is currently empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Default for LifecycleEventLog {
    fn default() -> Self {
        Self::new()
    }
}

fn evict(events: &mut VecDeque<LifecycleEvent>, now_ms: i64) {
    while let Some(front) = events.front() {
        if now_ms.saturating_sub(front.at_ms()) > EVENT_TTL_MS {
            events.pop_front();
        } else {
            break;
        }
    }
    while events.len() > MAX_BUFFERED_EVENTS {
        events.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::{LifecycleEvent, LifecycleEventLog, EVENT_TTL_MS, MAX_BUFFERED_EVENTS};
    use reflexcore_types::ReflexInstanceId;

    fn triggered_at(at_ms: i64) -> LifecycleEvent {
        LifecycleEvent::Triggered {
            reflex_instance_id: ReflexInstanceId::new(),
            at_ms,
        }
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let log = LifecycleEventLog::new();
        for i in 0..MAX_BUFFERED_EVENTS + 10 {
            log.publish(triggered_at(i as i64), i as i64);
        }
        assert_eq!(log.len(), MAX_BUFFERED_EVENTS);
    }

    #[test]
    fn evicts_by_ttl() {
        let log = LifecycleEventLog::new();
        log.publish(triggered_at(0), 0);
        log.sweep(EVENT_TTL_MS + 1);
        assert!(log.is_empty());
    }

    #[test]
    fn events_since_filters_by_timestamp() {
        let log = LifecycleEventLog::new();
        log.publish(triggered_at(100), 100);
        log.publish(triggered_at(200), 200);
        let recent = log.events_since(150);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].at_ms(), 200);
    }

    #[test]
    fn by_type_filters_by_kind_tag() {
        let log = LifecycleEventLog::new();
        log.publish(triggered_at(1), 1);
        assert_eq!(log.by_type("triggered").len(), 1);
        assert_eq!(log.by_type("skipped").len(), 0);
    }
}
