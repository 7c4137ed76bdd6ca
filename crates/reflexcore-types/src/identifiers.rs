//! Two distinct identifier types, kept intentionally non-interchangeable.
//!
//! Replaces the "runtime ID juggling" the specification calls out:
//! ad-hoc string UUIDs and timestamp-derived ids are split into a
//! content-addressed, stable `GoalKey` and a fresh-per-firing
//! `ReflexInstanceId`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content-addressed semantic identity of a goal (need type + template).
/// Stable across re-firings of the same reflex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalKey(String);

impl GoalKey {
    /// Wraps a precomputed lowercase hex digest as a `GoalKey`.
    #[must_use]
    pub fn from_digest(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Returns the digest as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fresh UUID allocated per firing, used to correlate every lifecycle
/// event emitted for one reflex execution. Never reused across firings,
/// even when the `GoalKey` is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReflexInstanceId(Uuid);

impl ReflexInstanceId {
    /// Allocates a fresh instance id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ReflexInstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReflexInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::ReflexInstanceId;

    #[test]
    fn instance_ids_are_fresh_per_construction() {
        let a = ReflexInstanceId::new();
        let b = ReflexInstanceId::new();
        assert_ne!(a, b);
    }
}
