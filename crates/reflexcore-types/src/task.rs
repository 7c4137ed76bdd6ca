//! Task representation handed off to the execution gateway.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Leaf-level metadata attached to a single task step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStepMeta {
    /// The concrete actuator operation this step resolves to, e.g.
    /// `"consume_food"`.
    pub leaf: String,
}

/// One step of a task's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStep {
    /// Step-level metadata, most importantly the actuator leaf.
    pub meta: TaskStepMeta,
    /// Arguments passed to the leaf, ordered for deterministic hashing.
    pub args: BTreeMap<String, Value>,
}

/// A task formulated from a candidate goal and handed to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Human-readable task description.
    pub description: String,
    /// Ordered plan steps.
    pub steps: Vec<TaskStep>,
}

impl Task {
    /// The leaf of the first step, if any steps are present.
    #[must_use]
    pub fn first_leaf(&self) -> Option<&str> {
        self.steps.first().map(|step| step.meta.leaf.as_str())
    }
}
