//! Identified drive instances produced by need generation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed taxonomy of need types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedType {
    /// Food, health, or physical integrity.
    Survival,
    /// Threat avoidance or shelter.
    Safety,
    /// Discovery of new locations or information.
    Exploration,
    /// Companionship or cooperative activity.
    Social,
    /// Completion of meaningful objectives.
    Achievement,
    /// Building or expressing novel structures.
    Creativity,
    /// Idle curiosity not tied to a concrete objective.
    Curiosity,
}

/// An identified drive instance with creation/update timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Need {
    /// Unique identifier for this need instance.
    pub id: Uuid,
    /// Type tag drawn from the closed enumeration.
    pub need_type: NeedType,
    /// How strongly this need is felt, in `[0, 1]`.
    pub intensity: f64,
    /// How time-sensitive this need is, in `[0, 1]`.
    pub urgency: f64,
    /// How satisfied this need currently is, in `[0, 1]`.
    pub satisfaction: f64,
    /// Human-readable description used for keyword identification.
    pub description: String,
    /// Epoch-ms creation timestamp.
    pub created_at_ms: i64,
    /// Epoch-ms last-update timestamp.
    pub updated_at_ms: i64,
}

impl Need {
    /// Creates a need with matching creation/update timestamps.
    #[must_use]
    pub fn new(
        need_type: NeedType,
        intensity: f64,
        urgency: f64,
        satisfaction: f64,
        description: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            need_type,
            intensity: intensity.clamp(0.0, 1.0),
            urgency: urgency.clamp(0.0, 1.0),
            satisfaction: satisfaction.clamp(0.0, 1.0),
            description: description.into(),
            created_at_ms: timestamp_ms,
            updated_at_ms: timestamp_ms,
        }
    }

    /// The sort key used to order need lists: intensity plus urgency.
    #[must_use]
    pub fn ordering_key(&self) -> f64 {
        self.intensity + self.urgency
    }
}

/// Sorts needs descending by `intensity + urgency`, matching the
/// specification's invariant for `generateNeeds` output.
pub fn sort_by_ordering_key(needs: &mut [Need]) {
    needs.sort_by(|a, b| {
        b.ordering_key()
            .partial_cmp(&a.ordering_key())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
