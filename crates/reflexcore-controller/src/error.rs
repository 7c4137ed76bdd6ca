//! Controller-level errors.

use reflexcore_canon::CanonError;
use reflexcore_evidence::EvidenceError;
use reflexcore_gateway::GatewayError;
use reflexcore_types::ReflexInstanceId;
use thiserror::Error;

/// Errors raised by the reflex controller's pipeline.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// No accumulator exists for the given firing id, most commonly
    /// because it was already completed or evicted by the TTL sweep.
    #[error("no in-flight accumulator for firing {0}")]
    UnknownFiring(ReflexInstanceId),
    /// Hashing the candidate set or trigger snapshot failed.
    #[error(transparent)]
    Canon(#[from] CanonError),
    /// Dispatch to the execution gateway failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// Proof bundle assembly failed.
    #[error(transparent)]
    Evidence(#[from] EvidenceError),
}
