//! The reflex controller: the gated pipeline from a homeostasis
//! snapshot to a dispatched task and, eventually, a proof bundle.
//!
//! Adapted from the cycle-linker/decision-director shape: a sequence
//! of short-circuiting gates run in a fixed order, each either letting
//! the firing through or recording why it stopped.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use reflexcore_config::GatewayMode;
use reflexcore_evidence::{assemble, verify_execution};
use reflexcore_events::{LifecycleEvent, LifecycleEventLog};
use reflexcore_gateway::ExecutionGateway;
use reflexcore_needs::{generate_needs, score_candidates, ScoringInputs};
use reflexcore_types::{
    CandidateGoal, CorrelationContext, Drive, ExecutionResult, GatewayAction, GoalKey,
    HomeostasisSnapshot, Origin, PriorityScore, ProofBundle, ProofEvidence, ProofIdentity,
    ReflexAccumulator, ReflexInstanceId, RiskBreakdown, SkipReason, Task, TaskStep, TaskStepMeta,
    TimingMeasurements, WorldState,
};
use uuid::Uuid;

use crate::error::ControllerError;
use crate::hysteresis::HysteresisGate;
use crate::templates::{description_for, need_type_for, template_for};

/// Configuration the controller needs from `reflexcore-config`,
/// narrowed to the fields this crate actually consults (keeps this
/// crate from depending on the gateway-mode/log-path fields that
/// belong to other subsystems).
#[derive(Debug, Clone, Copy)]
pub struct ControllerTuning {
    /// Drive level at which the reflex gate arms.
    pub drive_threshold: f64,
    /// Hysteresis band width.
    pub hysteresis_margin: f64,
    /// Accumulator TTL, in milliseconds.
    pub accumulator_ttl_ms: i64,
    /// Maximum number of in-flight accumulators retained at once.
    pub accumulator_max: usize,
}

/// Orchestrates need detection, goal selection, task dispatch, and
/// proof assembly for one agent's reflexes.
pub struct ReflexController {
    tuning: ControllerTuning,
    gate: HysteresisGate,
    accumulators: Mutex<IndexMap<ReflexInstanceId, ReflexAccumulator>>,
    events: LifecycleEventLog,
    gateway: Arc<ExecutionGateway>,
}

impl ReflexController {
    /// Builds a controller with an empty accumulator map and event log.
    #[must_use]
    pub fn new(tuning: ControllerTuning, gateway: Arc<ExecutionGateway>) -> Self {
        Self {
            tuning,
            gate: HysteresisGate::new(),
            accumulators: Mutex::new(IndexMap::new()),
            events: LifecycleEventLog::new(),
            gateway,
        }
    }

    /// The lifecycle event log, for external history queries.
    #[must_use]
    pub const fn events(&self) -> &LifecycleEventLog {
        &self.events
    }

    /// Evicts accumulators past their TTL or past the size cap,
    /// oldest first. Runs automatically at the start of every
    /// `evaluate` call, but exposed so an idle process can still sweep
    /// periodically.
    pub fn evict_accumulators(&self, now_ms: i64) {
        let mut accumulators = self.accumulators.lock();
        let expired: Vec<ReflexInstanceId> = accumulators
            .iter()
            .filter(|(_, acc)| acc.age_ms(now_ms) > self.tuning.accumulator_ttl_ms)
            .map(|(id, _)| *id)
            .collect();
        for id in expired {
            accumulators.shift_remove(&id);
        }
        while accumulators.len() > self.tuning.accumulator_max {
            accumulators.shift_remove_index(0);
        }
    }

    /// Runs the full gating pipeline for one homeostasis snapshot:
    /// eviction sweep, hysteresis gate, preemption gate, candidate
    /// selection, dispatch. Returns the firing ids created this tick
    /// (drives that were already armed, or that failed a gate, create
    /// no new firing).
    ///
    /// `dry_run` computes gating as if armed without mutating the
    /// hysteresis state, and stops a firing once its goal is formulated
    /// rather than dispatching and occupying an accumulator slot. The
    /// same shape applies automatically whenever the gateway itself is
    /// in shadow mode, since a shadowed dispatch can never produce a
    /// real in-flight task either.
    ///
    /// Evaluate never fails outright: a pipeline error for one drive
    /// (hashing, dispatch) degrades to a skipped firing for that drive
    /// and the tick continues for the rest.
    pub async fn evaluate(
        &self,
        snapshot: &HomeostasisSnapshot,
        world: &dyn WorldState,
        now_ms: i64,
        dry_run: bool,
    ) -> Vec<ReflexInstanceId> {
        self.evict_accumulators(now_ms);
        let effective_dry_run = dry_run || self.gateway.mode() == GatewayMode::Shadow;

        let needs = generate_needs(snapshot);
        let mut fired = Vec::new();
        for drive in Drive::all() {
            let level = snapshot.level(drive);
            let armed = if effective_dry_run {
                self.gate.would_arm(drive, level, self.tuning.drive_threshold)
            } else {
                self.gate
                    .update(drive, level, self.tuning.drive_threshold, self.tuning.hysteresis_margin)
            };
            if !armed {
                continue;
            }

            match self
                .try_fire(drive, &needs, level, snapshot, world, effective_dry_run, now_ms)
                .await
            {
                Ok(Some(reflex_instance_id)) => fired.push(reflex_instance_id),
                Ok(None) => {}
                Err(_) => {
                    self.events.publish(
                        LifecycleEvent::Skipped {
                            reflex_instance_id: ReflexInstanceId::new(),
                            reason: SkipReason::EnqueueException,
                            at_ms: now_ms,
                        },
                        now_ms,
                    );
                }
            }
        }

        fired
    }

    /// Runs one drive's candidate-through-dispatch pipeline. `Ok(None)`
    /// covers every legitimate no-firing outcome (ranking loss,
    /// deduplication, unmet precondition); `Err` covers the pipeline
    /// failures `evaluate` converts into a skip rather than propagating.
    #[allow(clippy::too_many_arguments)]
    async fn try_fire(
        &self,
        drive: Drive,
        needs: &[reflexcore_types::Need],
        level: f64,
        snapshot: &HomeostasisSnapshot,
        world: &dyn WorldState,
        dry_run: bool,
        now_ms: i64,
    ) -> Result<Option<ReflexInstanceId>, ControllerError> {
        let urgency = identify_need(needs, drive, level).map_or(level, |need| need.urgency);
        let candidate = CandidateGoal::new(
            need_type_for(drive),
            template_for(drive),
            description_for(drive),
            level,
            1.0,
            0,
            Uuid::new_v4(),
        );
        if !candidate_ranks_first(candidate.clone(), urgency) {
            return Ok(None);
        }
        let goal_key = goal_key_for(&candidate)?;

        if let Some(existing) = self.in_flight_instance(&goal_key) {
            self.events.publish(
                LifecycleEvent::Skipped {
                    reflex_instance_id: existing,
                    reason: SkipReason::DeduplicatedExistingTask,
                    at_ms: now_ms,
                },
                now_ms,
            );
            return Ok(None);
        }

        if !availability_gate(world, drive) {
            return Ok(None);
        }

        let reflex_instance_id = ReflexInstanceId::new();
        self.events.publish(
            LifecycleEvent::Triggered {
                reflex_instance_id,
                at_ms: now_ms,
            },
            now_ms,
        );
        self.events.publish(
            LifecycleEvent::CandidatesGenerated {
                reflex_instance_id,
                candidate_count: 1,
                at_ms: now_ms,
            },
            now_ms,
        );
        self.events.publish(
            LifecycleEvent::GoalSelected {
                reflex_instance_id,
                goal_key: goal_key.clone(),
                at_ms: now_ms,
            },
            now_ms,
        );

        let task = Task {
            description: description_for(drive).to_owned(),
            steps: vec![TaskStep {
                meta: TaskStepMeta {
                    leaf: template_for(drive).to_owned(),
                },
                args: std::collections::BTreeMap::new(),
            }],
        };
        self.events.publish(
            LifecycleEvent::TaskFormulated {
                reflex_instance_id,
                goal_key: goal_key.clone(),
                at_ms: now_ms,
            },
            now_ms,
        );

        if dry_run {
            return Ok(Some(reflex_instance_id));
        }

        let homeostasis_digest = reflexcore_canon::content_hash(snapshot)?;
        let candidate_set_digest = reflexcore_canon::content_hash(&candidate)?;

        let action = GatewayAction::new(
            Origin::Reactive,
            task.clone(),
            Some(CorrelationContext {
                task_id: reflex_instance_id.to_string(),
            }),
        )
        .expect("Reactive origin always carries a task scope here");
        let receipt = self.gateway.submit(action).await?;
        self.events.publish(
            LifecycleEvent::TaskDispatched {
                reflex_instance_id,
                task_id: receipt.receipt_id.clone(),
                at_ms: now_ms,
            },
            now_ms,
        );

        self.gate.disarm(drive);

        self.accumulators.lock().insert(
            reflex_instance_id,
            ReflexAccumulator {
                goal_key,
                reflex_instance_id,
                triggered_at_ms: now_ms,
                formulated_at_ms: now_ms,
                task_created_at_ms: Some(now_ms),
                completed_at_ms: None,
                trigger_snapshot: snapshot.clone(),
                candidate_item: None,
                homeostasis_digest,
                candidate_set_digest,
                template_name: template_for(drive).to_owned(),
                need_type: need_type_for(drive),
            },
        );

        Ok(Some(reflex_instance_id))
    }

    /// Completes an in-flight firing: verifies the resource delta,
    /// assembles a [`ProofBundle`], records the completion event, and
    /// removes the accumulator.
    ///
    /// `receipt_confirmed` carries the executor's own confirmation that
    /// it consumed the resource, independent of the homeostasis delta;
    /// either path alone is sufficient to verify. `resource_after` and
    /// `items_consumed` are `None` when that after-state reading
    /// couldn't be taken at all.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::UnknownFiring`] if no accumulator
    /// exists for `reflex_instance_id` (already completed or evicted).
    #[allow(clippy::too_many_arguments)]
    pub fn complete_firing(
        &self,
        reflex_instance_id: ReflexInstanceId,
        execution_result: ExecutionResult,
        receipt_confirmed: bool,
        resource_before: f64,
        resource_after: Option<f64>,
        items_consumed: Option<Vec<String>>,
        now_ms: i64,
    ) -> Result<ProofBundle, ControllerError> {
        let accumulator = self
            .accumulators
            .lock()
            .shift_remove(&reflex_instance_id)
            .ok_or(ControllerError::UnknownFiring(reflex_instance_id))?;

        let verification = verify_execution(
            execution_result,
            receipt_confirmed,
            resource_before,
            resource_after,
            items_consumed,
        );

        let identity = ProofIdentity {
            trigger_level: accumulator.trigger_snapshot.level(drive_for_template(&accumulator.template_name)),
            threshold: self.tuning.drive_threshold,
            preconditions_met: true,
            need_type: accumulator.need_type,
            template_name: accumulator.template_name.clone(),
            description: description_for(drive_for_template(&accumulator.template_name)).to_owned(),
            task_steps: vec![TaskStep {
                meta: TaskStepMeta {
                    leaf: accumulator.template_name.clone(),
                },
                args: std::collections::BTreeMap::new(),
            }],
            execution_result,
            verification: Some(verification.clone()),
        };
        let evidence = ProofEvidence {
            proof_id: Uuid::new_v4(),
            goal_id: accumulator.goal_key,
            task_id: reflex_instance_id.to_string(),
            homeostasis_digest: accumulator.homeostasis_digest,
            candidate_set_digest: accumulator.candidate_set_digest,
            execution_receipt: None,
            candidate_item_observed: accumulator.candidate_item,
            timing: TimingMeasurements {
                triggered_ms: accumulator.triggered_at_ms,
                formulated_ms: accumulator.formulated_at_ms,
                task_created_ms: accumulator.task_created_at_ms,
                completed_ms: Some(now_ms),
            },
            trigger_timestamp_ms: accumulator.triggered_at_ms,
            skip_reason: None,
        };

        let bundle = assemble(identity, evidence)?;

        self.events.publish(
            LifecycleEvent::ExecutionCompleted {
                reflex_instance_id,
                outcome: verification.outcome,
                at_ms: now_ms,
            },
            now_ms,
        );

        Ok(bundle)
    }

    fn in_flight_instance(&self, goal_key: &GoalKey) -> Option<ReflexInstanceId> {
        self.accumulators
            .lock()
            .values()
            .find(|acc| &acc.goal_key == goal_key && acc.completed_at_ms.is_none())
            .map(|acc| acc.reflex_instance_id)
    }
}

/// Picks the generated need that corresponds to `drive`: same need
/// type and the closest intensity to the drive's own level, since
/// several drives can share a need type and a [`Need`] does not carry
/// the originating drive directly.
fn identify_need(
    needs: &[reflexcore_types::Need],
    drive: Drive,
    level: f64,
) -> Option<&reflexcore_types::Need> {
    let wanted = need_type_for(drive);
    needs
        .iter()
        .filter(|need| need.need_type == wanted)
        .min_by(|a, b| {
            (a.intensity - level)
                .abs()
                .partial_cmp(&(b.intensity - level).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Scores the candidate on its own against neutral risk/commitment/
/// novelty/opportunity terms and confirms it comes out ahead, per the
/// pipeline's "the intended candidate must rank first" requirement.
/// With exactly one candidate this only fails if urgency or context
/// gating collapses the score to zero.
fn candidate_ranks_first(candidate: CandidateGoal, urgency: f64) -> bool {
    let inputs = ScoringInputs {
        urgency,
        context_gating: 1.0,
        risk: RiskBreakdown {
            path: 0.0,
            resource: 0.0,
            time: 0.0,
            environmental: 0.0,
        },
        commitment_boost: 0.0,
        novelty_boost: 0.0,
        opportunity_cost: 0.0,
    };
    let ranked: Vec<PriorityScore> = score_candidates(vec![candidate], vec![inputs]);
    ranked.first().is_some_and(|score| score.total > 0.0)
}

fn goal_key_for(candidate: &CandidateGoal) -> Result<GoalKey, ControllerError> {
    #[derive(serde::Serialize)]
    struct Identity<'a> {
        need_type: reflexcore_types::NeedType,
        template_name: &'a str,
    }
    let digest = reflexcore_canon::content_hash(&Identity {
        need_type: candidate.need_type,
        template_name: &candidate.template_name,
    })?;
    Ok(GoalKey::from_digest(digest))
}

/// Best-effort precondition check: a handful of templates have an
/// obvious, checkable precondition; everything else is assumed ready.
fn availability_gate(world: &dyn WorldState, drive: Drive) -> bool {
    match drive {
        Drive::Hunger => world.has_item("food", 1),
        Drive::Safety => world.has_weapon() || world.has_armor() || world.is_near("shelter"),
        Drive::Warmth => world.is_near("shelter") || world.environmental_flag("indoors"),
        _ => true,
    }
}

fn drive_for_template(template_name: &str) -> Drive {
    Drive::all()
        .into_iter()
        .find(|d| template_for(*d) == template_name)
        .unwrap_or(Drive::Hunger)
}

#[cfg(test)]
mod tests {
    use super::{ControllerTuning, ReflexController};
    use reflexcore_config::GatewayMode;
    use reflexcore_gateway::{ExecutionGateway, HeuristicTaskResolver};
    use reflexcore_logging::JsonLogger;
    use reflexcore_types::{Drive, ExecutionResult, HomeostasisSnapshot, WorldState};
    use std::sync::Arc;
    use tempfile::tempdir;

    struct AlwaysAvailable;
    impl WorldState for AlwaysAvailable {
        fn has_item(&self, _name: &str, _min_qty: u32) -> bool {
            true
        }
        fn drive_level(&self, _drive: Drive) -> f64 {
            0.0
        }
        fn is_near(&self, _tag: &str) -> bool {
            true
        }
        fn environmental_flag(&self, _tag: &str) -> bool {
            false
        }
        fn has_weapon(&self) -> bool {
            false
        }
        fn has_armor(&self) -> bool {
            false
        }
    }

    fn controller_with_mode(mode: GatewayMode) -> ReflexController {
        let dir = tempdir().unwrap();
        let logger = Arc::new(JsonLogger::new(dir.path().join("ctl.log")).unwrap());
        let gateway = Arc::new(ExecutionGateway::new(
            mode,
            Arc::new(HeuristicTaskResolver::new()),
            logger,
        ));
        ReflexController::new(
            ControllerTuning {
                drive_threshold: 0.7,
                hysteresis_margin: 0.1,
                accumulator_ttl_ms: 1_800_000,
                accumulator_max: 50,
            },
            gateway,
        )
    }

    fn controller() -> ReflexController {
        controller_with_mode(GatewayMode::Live)
    }

    fn hunger_snapshot(level: f64) -> HomeostasisSnapshot {
        let mut raw = [0.0; 11];
        let index = Drive::all().iter().position(|d| *d == Drive::Hunger).unwrap();
        raw[index] = level;
        HomeostasisSnapshot::new(raw, 0)
    }

    #[tokio::test]
    async fn high_hunger_fires_a_reflex() {
        let ctl = controller();
        let snapshot = hunger_snapshot(0.9);
        let fired = ctl.evaluate(&snapshot, &AlwaysAvailable, 0, false).await;
        assert_eq!(fired.len(), 1);
    }

    #[tokio::test]
    async fn repeated_evaluate_does_not_redispatch_while_in_flight() {
        let ctl = controller();
        let snapshot = hunger_snapshot(0.9);
        let first = ctl.evaluate(&snapshot, &AlwaysAvailable, 0, false).await;
        let second = ctl.evaluate(&snapshot, &AlwaysAvailable, 10, false).await;
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 0);
    }

    #[tokio::test]
    async fn firing_disarms_the_gate_so_a_still_elevated_level_does_not_immediately_refire() {
        let ctl = controller();
        let snapshot = hunger_snapshot(0.9);
        let first = ctl.evaluate(&snapshot, &AlwaysAvailable, 0, false).await;
        assert_eq!(first.len(), 1);
        ctl.complete_firing(
            first[0],
            ExecutionResult::Ok,
            false,
            1.0,
            Some(2.0),
            Some(vec!["bread".to_owned()]),
            50,
        )
        .unwrap();
        // the accumulator is gone (so dedup can't explain a miss), but
        // the level is still above threshold; only the disarm on commit
        // prevents an immediate re-fire.
        let second = ctl.evaluate(&snapshot, &AlwaysAvailable, 100, false).await;
        assert_eq!(second.len(), 0);
    }

    #[tokio::test]
    async fn dry_run_formulates_a_goal_without_dispatching_or_occupying_a_slot() {
        let ctl = controller();
        let snapshot = hunger_snapshot(0.9);
        let fired = ctl.evaluate(&snapshot, &AlwaysAvailable, 0, true).await;
        assert_eq!(fired.len(), 1);
        // dry-run never allocates an accumulator, so completing the
        // "firing" it returned is always unknown.
        let result = ctl.complete_firing(fired[0], ExecutionResult::Ok, false, 1.0, Some(2.0), None, 10);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn dry_run_does_not_mutate_the_hysteresis_gate() {
        let ctl = controller();
        let snapshot = hunger_snapshot(0.9);
        ctl.evaluate(&snapshot, &AlwaysAvailable, 0, true).await;
        // a later, real evaluation still arms and fires normally.
        let fired = ctl.evaluate(&snapshot, &AlwaysAvailable, 10, false).await;
        assert_eq!(fired.len(), 1);
    }

    #[tokio::test]
    async fn shadow_gateway_mode_behaves_like_dry_run_even_without_the_flag() {
        let ctl = controller_with_mode(GatewayMode::Shadow);
        let snapshot = hunger_snapshot(0.9);
        let fired = ctl.evaluate(&snapshot, &AlwaysAvailable, 0, false).await;
        assert_eq!(fired.len(), 1);
        assert!(ctl.complete_firing(fired[0], ExecutionResult::Ok, false, 1.0, Some(2.0), None, 10).is_err());
    }

    #[tokio::test]
    async fn completing_a_firing_produces_a_verified_proof() {
        let ctl = controller();
        let snapshot = hunger_snapshot(0.9);
        let fired = ctl.evaluate(&snapshot, &AlwaysAvailable, 0, false).await;
        let id = fired[0];
        let bundle = ctl
            .complete_firing(
                id,
                ExecutionResult::Ok,
                false,
                1.0,
                Some(2.0),
                Some(vec!["bread".to_owned()]),
                100,
            )
            .unwrap();
        assert_eq!(bundle.schema_version, "autonomy_proof_v1");
    }
}
