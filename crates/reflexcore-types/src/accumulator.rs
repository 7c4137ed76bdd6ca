//! Per-firing join state held between trigger and completion.
//!
//! The controller keeps one `ReflexAccumulator` per in-flight firing,
//! keyed by [`ReflexInstanceId`], until the firing is either completed
//! and turned into a [`crate::proof::ProofBundle`] or evicted by the
//! TTL/size sweep.

use serde::{Deserialize, Serialize};

use crate::homeostasis::HomeostasisSnapshot;
use crate::identifiers::{GoalKey, ReflexInstanceId};
use crate::need::NeedType;

/// Accumulated state for one reflex firing, from trigger through
/// completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflexAccumulator {
    /// Content-addressed identity of the firing goal.
    pub goal_key: GoalKey,
    /// Fresh per-firing correlation id.
    pub reflex_instance_id: ReflexInstanceId,
    /// When the reflex gate armed, epoch-ms.
    pub triggered_at_ms: i64,
    /// When the candidate task was formulated, epoch-ms.
    pub formulated_at_ms: i64,
    /// When the task was handed to the gateway, if it reached that stage.
    pub task_created_at_ms: Option<i64>,
    /// When execution completed (success, failure, or skip), if it did.
    pub completed_at_ms: Option<i64>,
    /// The homeostasis reading observed at trigger time.
    pub trigger_snapshot: HomeostasisSnapshot,
    /// The specific item the actuator is expected to consume, if any.
    pub candidate_item: Option<String>,
    /// Content hash of `trigger_snapshot`.
    pub homeostasis_digest: String,
    /// Content hash of the candidate set considered at formulation time.
    pub candidate_set_digest: String,
    /// Template name of the fired candidate.
    pub template_name: String,
    /// Need type of the fired candidate.
    pub need_type: NeedType,
}

impl ReflexAccumulator {
    /// Age of this accumulator relative to `now_ms`, in milliseconds.
    #[must_use]
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.triggered_at_ms)
    }

    /// Whether this accumulator has reached the task-dispatch stage.
    #[must_use]
    pub const fn is_dispatched(&self) -> bool {
        self.task_created_at_ms.is_some()
    }

    /// Whether this accumulator has reached a terminal state.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at_ms.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::ReflexAccumulator;
    use crate::homeostasis::HomeostasisSnapshot;
    use crate::identifiers::{GoalKey, ReflexInstanceId};
    use crate::need::NeedType;

    fn accumulator() -> ReflexAccumulator {
        ReflexAccumulator {
            goal_key: GoalKey::from_digest("abc123"),
            reflex_instance_id: ReflexInstanceId::new(),
            triggered_at_ms: 1_000,
            formulated_at_ms: 1_010,
            task_created_at_ms: None,
            completed_at_ms: None,
            trigger_snapshot: HomeostasisSnapshot::new([0.5; 11], 1_000),
            candidate_item: Some("bread".to_owned()),
            homeostasis_digest: "deadbeef".to_owned(),
            candidate_set_digest: "feedface".to_owned(),
            template_name: "consume_food".to_owned(),
            need_type: NeedType::Survival,
        }
    }

    #[test]
    fn age_is_relative_to_trigger_time() {
        let acc = accumulator();
        assert_eq!(acc.age_ms(1_500), 500);
    }

    #[test]
    fn stage_predicates_track_optional_timestamps() {
        let mut acc = accumulator();
        assert!(!acc.is_dispatched());
        assert!(!acc.is_completed());
        acc.task_created_at_ms = Some(1_100);
        assert!(acc.is_dispatched());
        acc.completed_at_ms = Some(1_200);
        assert!(acc.is_completed());
    }
}
