//! Execution gateway request envelope and origin tagging.

use serde::{Deserialize, Serialize};

use crate::task::Task;
use crate::TypesError;

/// Which subsystem originated a gateway action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The normal task executor.
    Executor,
    /// The reflex controller, firing autonomously.
    Reactive,
    /// The safety override path.
    Safety,
    /// The cognition/planning layer.
    Cognition,
}

/// Correlates a gateway action back to the task it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationContext {
    /// Identifier of the owning task.
    pub task_id: String,
}

/// A request submitted to the execution gateway.
///
/// Enforces at construction that `Executor` and `Reactive` origins carry
/// a task scope and that `Safety` origin never does, matching the
/// specification's invariant for gateway dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayAction {
    /// Which subsystem is submitting this action.
    pub origin: Origin,
    /// The task to execute.
    pub task: Task,
    /// Correlation context, required for `Executor`/`Reactive`, absent
    /// for `Safety`.
    pub scope: Option<CorrelationContext>,
}

impl GatewayAction {
    /// Builds a gateway action, validating the origin/scope invariant.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::MissingTaskScope`] if `origin` requires a
    /// task scope and none was given, or if `origin` is `Safety` and a
    /// scope was given anyway.
    pub fn new(
        origin: Origin,
        task: Task,
        scope: Option<CorrelationContext>,
    ) -> Result<Self, TypesError> {
        let requires_scope = matches!(origin, Origin::Executor | Origin::Reactive);
        if requires_scope && scope.is_none() {
            return Err(TypesError::MissingTaskScope { origin });
        }
        if matches!(origin, Origin::Safety) && scope.is_some() {
            return Err(TypesError::MissingTaskScope { origin });
        }
        Ok(Self {
            origin,
            task,
            scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{GatewayAction, Origin};
    use crate::task::Task;

    fn task() -> Task {
        Task {
            description: "test".to_owned(),
            steps: Vec::new(),
        }
    }

    #[test]
    fn executor_without_scope_is_rejected() {
        let result = GatewayAction::new(Origin::Executor, task(), None);
        assert!(result.is_err());
    }

    #[test]
    fn safety_with_scope_is_rejected() {
        let scope = super::CorrelationContext {
            task_id: "t1".to_owned(),
        };
        let result = GatewayAction::new(Origin::Safety, task(), Some(scope));
        assert!(result.is_err());
    }

    #[test]
    fn safety_without_scope_is_accepted() {
        let result = GatewayAction::new(Origin::Safety, task(), None);
        assert!(result.is_ok());
    }
}
