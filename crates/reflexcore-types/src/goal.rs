//! Candidate goals proposed by the goal generator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::need::NeedType;

/// A named resource requirement (e.g. an item and minimum quantity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirement {
    /// Inventory item name.
    pub item_name: String,
    /// Minimum quantity required.
    pub min_quantity: u32,
}

/// A proposed goal derived from one or more needs.
///
/// Immutable once emitted: the goal generator creates it, the priority
/// scorer consumes it, nothing mutates it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGoal {
    /// Unique identifier for this candidate instance.
    pub id: Uuid,
    /// Type tag drawn from the need taxonomy.
    pub need_type: NeedType,
    /// Template name identifying the concrete action family (e.g. `"consume_food"`).
    pub template_name: String,
    /// Human-readable description.
    pub description: String,
    /// Heuristic priority assigned at generation time, in `[0, 1]`.
    pub priority: f64,
    /// Estimated cost to pursue this goal.
    pub estimated_cost: f64,
    /// Estimated duration in milliseconds.
    pub estimated_duration_ms: i64,
    /// Optional target location tag.
    pub target_location: Option<String>,
    /// Resources this goal is expected to require.
    pub resource_requirements: Vec<ResourceRequirement>,
    /// The need this candidate was derived from.
    pub source_need_id: Uuid,
    /// A specific resource item the downstream actuator may consume
    /// (e.g. `"bread"`). Excluded from identity hashing: identity is
    /// "eat food", not "eat bread".
    pub candidate_item: Option<String>,
}

impl CandidateGoal {
    /// Creates a candidate goal with the given provenance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        need_type: NeedType,
        template_name: impl Into<String>,
        description: impl Into<String>,
        priority: f64,
        estimated_cost: f64,
        estimated_duration_ms: i64,
        source_need_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            need_type,
            template_name: template_name.into(),
            description: description.into(),
            priority: priority.clamp(0.0, 1.0),
            estimated_cost,
            estimated_duration_ms,
            target_location: None,
            resource_requirements: Vec::new(),
            source_need_id,
            candidate_item: None,
        }
    }

    /// Attaches a target location.
    #[must_use]
    pub fn with_target_location(mut self, location: impl Into<String>) -> Self {
        self.target_location = Some(location.into());
        self
    }

    /// Attaches a resource requirement.
    #[must_use]
    pub fn with_resource(mut self, item_name: impl Into<String>, min_quantity: u32) -> Self {
        self.resource_requirements.push(ResourceRequirement {
            item_name: item_name.into(),
            min_quantity,
        });
        self
    }

    /// Records the specific item the actuator is expected to consume.
    #[must_use]
    pub fn with_candidate_item(mut self, item: impl Into<String>) -> Self {
        self.candidate_item = Some(item.into());
        self
    }
}
