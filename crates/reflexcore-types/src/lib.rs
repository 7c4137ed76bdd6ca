#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Shared data model for the reflex core.
//!
//! This crate holds the value types that flow between the needs,
//! evidence, events, gateway, and controller crates: homeostasis
//! snapshots, needs, candidate goals, priority scores, the two
//! identifier types (content-addressed `GoalKey` vs. per-firing
//! `ReflexInstanceId`), the gateway action envelope, and the proof
//! bundle's identity/evidence split.

/// Drives, snapshots, and the `WorldState` capability trait.
pub mod homeostasis;
/// Identified drive instances.
pub mod need;
/// Proposed goals derived from needs.
pub mod goal;
/// Priority scoring components.
pub mod priority;
/// Content-addressed and per-emission identifiers.
pub mod identifiers;
/// Per-firing join state held while awaiting completion.
pub mod accumulator;
/// Task descriptions constructed for dispatch.
pub mod task;
/// Proof identity/evidence split and the `ProofBundle` artifact.
pub mod proof;
/// Origin-tagged dispatch envelope for the execution gateway.
pub mod gateway_action;

pub use accumulator::ReflexAccumulator;
pub use gateway_action::{CorrelationContext, GatewayAction, Origin};
pub use goal::{CandidateGoal, ResourceRequirement};
pub use homeostasis::{Drive, HomeostasisSnapshot, WorldState};
pub use identifiers::{GoalKey, ReflexInstanceId};
pub use need::{sort_by_ordering_key, Need, NeedType};
pub use priority::{rank_descending, PriorityScore, RiskBreakdown};
pub use proof::{
    ExecutionResult, ProofBundle, ProofEvidence, ProofIdentity, SkipReason, TimingMeasurements,
    VerificationBlock, VerificationOutcome,
};
pub use task::{Task, TaskStep, TaskStepMeta};

use thiserror::Error;

/// Errors raised by invariant checks on the shared data model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// An [`Origin`] that requires a task scope was constructed without one.
    #[error("origin {origin:?} requires a task scope but none was supplied")]
    MissingTaskScope {
        /// The offending origin.
        origin: Origin,
    },
}
