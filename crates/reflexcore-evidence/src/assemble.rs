//! Proof bundle assembly: hashes [`ProofIdentity`] and wires it
//! together with its runtime evidence.

use reflexcore_canon::CanonError;
use reflexcore_types::{ProofBundle, ProofEvidence, ProofIdentity};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while assembling a proof bundle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvidenceError {
    /// The identity half could not be hashed.
    #[error("failed to hash proof identity: {0}")]
    Hashing(#[from] CanonError),
}

/// Hashes `identity` and assembles a complete [`ProofBundle`].
///
/// `evidence.proof_id` is not part of the hash input: re-running the
/// same firing under the same conditions and the same identity must
/// always produce the same `bundle_hash`, even though a fresh
/// [`Uuid`] is minted for `proof_id` each time.
///
/// # Errors
///
/// Returns [`EvidenceError::Hashing`] if `identity` cannot be
/// canonicalized (for example if it contains a non-finite number).
pub fn assemble(identity: ProofIdentity, mut evidence: ProofEvidence) -> Result<ProofBundle, EvidenceError> {
    let bundle_hash = reflexcore_canon::content_hash(&identity)?;
    if evidence.proof_id == Uuid::nil() {
        evidence.proof_id = Uuid::new_v4();
    }
    Ok(ProofBundle::new(bundle_hash, identity, evidence))
}
