//! Proof bundles: the identity/evidence split that makes reflex firings
//! independently auditable and re-hashable.
//!
//! [`ProofIdentity`] holds only semantic fields: hashing two bundles
//! produced by re-running the same firing under the same conditions
//! must agree, even though their evidence (UUIDs, timestamps) differs.
//! [`ProofEvidence`] holds everything runtime-specific. Neither struct
//! is hashed as a whole; [`crate::canon`]-style canonicalization (see
//! the `reflexcore-canon` crate) hashes `ProofIdentity` alone to derive
//! the bundle hash.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identifiers::GoalKey;
use crate::need::NeedType;
use crate::task::TaskStep;

/// Outcome of executing a task's leaf action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionResult {
    /// The leaf action completed successfully.
    Ok,
    /// The leaf action raised an error.
    Error,
    /// The controller decided not to dispatch the task.
    Skipped,
}

/// Why a candidate firing was skipped rather than dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// An equivalent task was already in flight for the same goal key.
    DeduplicatedExistingTask,
    /// Enqueuing the task raised an exception.
    EnqueueException,
    /// Enqueuing the task returned no handle.
    EnqueueReturnedNull,
}

/// Outcome of post-hoc verification that the execution actually
/// satisfied the need it claimed to address.
///
/// Two independent paths corroborate a success: an executor receipt
/// that directly confirms consumption, or an observed homeostasis
/// delta paired with inventory data. They are not conjunctive — a
/// receipt alone is sufficient even if the level happens to be flat
/// or falling from unrelated concurrent decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// The executor's receipt directly confirms consumption.
    ReceiptConfirmed,
    /// The tracked resource increased and inventory confirms consumption.
    DeltaConfirmed,
    /// The tracked resource increased but inventory data is unavailable.
    IncreasedInventoryUnavailable,
    /// The tracked resource increased but no consumption evidence exists.
    IncreasedWithoutEvidence,
    /// The tracked resource did not increase despite a reported success.
    NoChangeDespiteSuccess,
    /// The tracked resource decreased despite a reported success.
    RegressedDespiteSuccess,
    /// The after-state reading could not be taken at all.
    AfterStateUnavailable,
    /// Execution itself reported failure.
    ExecutionFailed,
    /// The firing was skipped before execution, so nothing to verify.
    SkippedBeforeExecution,
}

impl VerificationOutcome {
    /// Whether this outcome counts as verified for the purposes of a
    /// proof bundle's `goal_closed.success` field.
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::ReceiptConfirmed | Self::DeltaConfirmed)
    }

    /// Stable machine-readable reason string, matching the
    /// specification's literal wording for each outcome.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::ReceiptConfirmed => "receipt_confirms_consumption",
            Self::DeltaConfirmed => "food_increased_with_consumption_evidence",
            Self::IncreasedInventoryUnavailable => "food_increased_but_inventory_data_unavailable",
            Self::IncreasedWithoutEvidence => "food_increased_but_no_consumption_evidence",
            Self::NoChangeDespiteSuccess => "no_change_despite_reported_success",
            Self::RegressedDespiteSuccess => "food_decreased_despite_reported_success",
            Self::AfterStateUnavailable => "after_state_unavailable",
            Self::ExecutionFailed => "execution_reported_failure",
            Self::SkippedBeforeExecution => "skipped_before_execution",
        }
    }
}

/// Before/after resource levels observed around execution, with the
/// delta and the sorted set of items the executor claims to have
/// consumed.
///
/// `resource_after` and `items_consumed` are `None` when that reading
/// could not be taken at all, distinct from `Some` readings that
/// simply show no change or an empty consumption set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationBlock {
    /// Resource level immediately before dispatch.
    pub resource_before: f64,
    /// Resource level immediately after completion, if it could be read.
    pub resource_after: Option<f64>,
    /// `resource_after - resource_before`, if an after-reading exists.
    pub delta: Option<f64>,
    /// Items the executor reports having consumed, sorted for
    /// deterministic hashing. `None` when inventory data is unavailable.
    pub items_consumed: Option<Vec<String>>,
    /// The computed verification outcome.
    pub outcome: VerificationOutcome,
}

impl VerificationBlock {
    /// Builds a verification block, sorting `items_consumed` (if
    /// present) and computing the delta from whichever after-reading
    /// is available.
    #[must_use]
    pub fn new(
        resource_before: f64,
        resource_after: Option<f64>,
        items_consumed: Option<Vec<String>>,
        outcome: VerificationOutcome,
    ) -> Self {
        let items_consumed = items_consumed.map(|mut items| {
            items.sort();
            items
        });
        Self {
            resource_before,
            resource_after,
            delta: resource_after.map(|after| after - resource_before),
            items_consumed,
            outcome,
        }
    }
}

/// The semantic, hash-bearing half of a proof bundle.
///
/// Every field here must be reproducible from a re-run of the same
/// firing under the same world state; runtime artifacts (ids,
/// timestamps) belong in [`ProofEvidence`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofIdentity {
    /// Drive level at trigger time, rounded for hash stability.
    pub trigger_level: f64,
    /// Threshold that was crossed to arm the reflex.
    pub threshold: f64,
    /// Whether all gating preconditions were satisfied.
    pub preconditions_met: bool,
    /// Need type of the fired candidate.
    pub need_type: NeedType,
    /// Template name of the fired candidate.
    pub template_name: String,
    /// Human-readable description of the fired candidate.
    pub description: String,
    /// Ordered task steps (leaf plus args), identical across re-runs.
    pub task_steps: Vec<TaskStep>,
    /// Outcome of executing the task.
    pub execution_result: ExecutionResult,
    /// Verification block, absent when the firing was skipped.
    pub verification: Option<VerificationBlock>,
}

/// The runtime, non-hashed half of a proof bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofEvidence {
    /// Fresh identifier for this proof instance.
    pub proof_id: Uuid,
    /// Content-addressed goal identity this proof was produced for.
    pub goal_id: GoalKey,
    /// Identifier of the dispatched task, as a string (actuator-assigned).
    pub task_id: String,
    /// Content hash of the trigger-time homeostasis snapshot.
    pub homeostasis_digest: String,
    /// Content hash of the candidate set considered at formulation time.
    pub candidate_set_digest: String,
    /// Opaque receipt returned by the execution gateway, if any.
    pub execution_receipt: Option<String>,
    /// The specific item actually observed consumed, if different
    /// bookkeeping from the originally proposed candidate item is kept.
    pub candidate_item_observed: Option<String>,
    /// Wall-clock measurements across the firing's lifecycle.
    pub timing: TimingMeasurements,
    /// Epoch-ms timestamp of the triggering homeostasis reading.
    pub trigger_timestamp_ms: i64,
    /// Reason the firing was skipped, if it was.
    pub skip_reason: Option<SkipReason>,
}

/// Wall-clock timestamps recorded across one firing's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingMeasurements {
    /// When the reflex gate armed.
    pub triggered_ms: i64,
    /// When the candidate task was formulated.
    pub formulated_ms: i64,
    /// When the task was created/dispatched, if it was.
    pub task_created_ms: Option<i64>,
    /// When the firing reached a terminal state, if it did.
    pub completed_ms: Option<i64>,
}

/// The complete auditable record of one reflex firing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofBundle {
    /// Schema version tag, fixed at `"autonomy_proof_v1"`.
    pub schema_version: String,
    /// Content hash of `identity`, computed by `reflexcore-canon`.
    pub bundle_hash: String,
    /// The hash-bearing semantic half.
    pub identity: ProofIdentity,
    /// The runtime evidence half.
    pub evidence: ProofEvidence,
}

impl ProofBundle {
    /// Fixed schema version for every bundle this crate produces.
    pub const SCHEMA_VERSION: &'static str = "autonomy_proof_v1";

    /// Assembles a bundle from its two halves and a precomputed hash.
    ///
    /// The hash itself is computed by `reflexcore-canon` over `identity`;
    /// this constructor only wires the pieces together so the type
    /// dependency stays one-directional (canon depends on types, not
    /// the reverse).
    #[must_use]
    pub fn new(bundle_hash: String, identity: ProofIdentity, evidence: ProofEvidence) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION.to_owned(),
            bundle_hash,
            identity,
            evidence,
        }
    }
}
