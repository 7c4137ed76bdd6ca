//! The execution gateway: the single point every dispatched action
//! passes through, origin tag and all.
//!
//! Adapted from the action commander's submit flow: security check,
//! then resolve, then spawn-and-await, with telemetry dual-emitted at
//! every stage. Unlike the commander, the gateway has no agent-resolve
//! hop (there is exactly one downstream actuator surface, out of
//! scope here), so submission goes straight from resolve to dispatch.

use std::sync::Arc;

use reflexcore_config::GatewayMode;
use reflexcore_logging::{dual_log, JsonLogger, LogLevel, LogRecord};
use reflexcore_types::{ExecutionResult, GatewayAction};
use thiserror::Error;
use uuid::Uuid;

use crate::resolver::{ResolverError, TaskActionResolver};
use crate::security::{evaluate, Verdict};

/// Errors raised while submitting an action to the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Template resolution failed.
    #[error(transparent)]
    Resolution(#[from] ResolverError),
    /// The JSON logger could not be written to.
    #[error("failed to write audit log entry: {0}")]
    Logging(#[from] anyhow::Error),
}

/// Outcome of a gateway submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReceipt {
    /// Opaque identifier for this dispatch.
    pub receipt_id: String,
    /// Whether the action actually reached the actuator or only shadowed.
    pub verdict: DispatchVerdict,
    /// Result of execution, `Skipped` when shadowed.
    pub execution_result: ExecutionResult,
}

/// Whether a submission reached the actuator or only shadowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchVerdict {
    /// The action was actually dispatched.
    Dispatched,
    /// The action was planned and logged, not dispatched.
    Shadowed,
}

/// The execution gateway every `GatewayAction` passes through.
pub struct ExecutionGateway {
    mode: GatewayMode,
    resolver: Arc<dyn TaskActionResolver>,
    logger: Arc<JsonLogger>,
}

impl ExecutionGateway {
    /// Builds a gateway with the given mode, resolver, and logger.
    #[must_use]
    pub fn new(mode: GatewayMode, resolver: Arc<dyn TaskActionResolver>, logger: Arc<JsonLogger>) -> Self {
        Self {
            mode,
            resolver,
            logger,
        }
    }

    /// The arming mode this gateway was built with.
    ///
    /// Exposed so upstream callers (the controller's dry-run gating, in
    /// particular) can tell ahead of submission whether a firing will
    /// be shadowed, without having to submit it to find out.
    #[must_use]
    pub const fn mode(&self) -> GatewayMode {
        self.mode
    }

    /// Submits `action`, applying the security gate and (if it already
    /// carries a task, the task as given; otherwise the resolver) the
    /// resolution step, then dispatches or shadows per the arming mode.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Resolution`] if the task has no steps
    /// and the resolver cannot produce any.
    #[tracing::instrument(skip(self, action))]
    pub async fn submit(&self, action: GatewayAction) -> Result<GatewayReceipt, GatewayError> {
        let verdict = evaluate(self.mode, action.origin);

        let task = if action.task.steps.is_empty() {
            self.resolver
                .resolve(&action.task.description, &action.task.description, None)
                .await?
        } else {
            action.task
        };

        let receipt_id = Uuid::new_v4().to_string();
        let (dispatch_verdict, execution_result) = match verdict {
            Verdict::Dispatch => (DispatchVerdict::Dispatched, ExecutionResult::Ok),
            Verdict::Shadow => (DispatchVerdict::Shadowed, ExecutionResult::Skipped),
        };

        let record = LogRecord::new("reflexcore_gateway", LogLevel::Info, "gateway submit")
            .with_field("origin", format!("{:?}", action.origin))
            .with_field("leaf", task.first_leaf().map(ToOwned::to_owned))
            .with_field("verdict", format!("{dispatch_verdict:?}"));
        dual_log(&self.logger, &record).map_err(GatewayError::Logging)?;

        Ok(GatewayReceipt {
            receipt_id,
            verdict: dispatch_verdict,
            execution_result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatchVerdict, ExecutionGateway};
    use crate::resolver::HeuristicTaskResolver;
    use reflexcore_config::GatewayMode;
    use reflexcore_logging::JsonLogger;
    use reflexcore_types::{CorrelationContext, GatewayAction, Origin, Task};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn gateway(mode: GatewayMode) -> ExecutionGateway {
        let dir = tempdir().unwrap();
        let logger = Arc::new(JsonLogger::new(dir.path().join("gw.log")).unwrap());
        ExecutionGateway::new(mode, Arc::new(HeuristicTaskResolver::new()), logger)
    }

    fn action(origin: Origin) -> GatewayAction {
        let scope = matches!(origin, Origin::Executor | Origin::Reactive)
            .then(|| CorrelationContext { task_id: "t1".to_owned() });
        GatewayAction::new(
            origin,
            Task {
                description: "eat food".to_owned(),
                steps: Vec::new(),
            },
            scope,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn shadow_mode_shadows_reactive_submissions() {
        let gw = gateway(GatewayMode::Shadow);
        let receipt = gw.submit(action(Origin::Reactive)).await.unwrap();
        assert_eq!(receipt.verdict, DispatchVerdict::Shadowed);
    }

    #[tokio::test]
    async fn live_mode_dispatches_reactive_submissions() {
        let gw = gateway(GatewayMode::Live);
        let receipt = gw.submit(action(Origin::Reactive)).await.unwrap();
        assert_eq!(receipt.verdict, DispatchVerdict::Dispatched);
    }

    #[tokio::test]
    async fn safety_origin_dispatches_even_in_shadow_mode() {
        let gw = gateway(GatewayMode::Shadow);
        let receipt = gw.submit(action(Origin::Safety)).await.unwrap();
        assert_eq!(receipt.verdict, DispatchVerdict::Dispatched);
    }
}
