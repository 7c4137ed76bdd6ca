//! Combines candidate goals with risk/context signals into ranked
//! [`PriorityScore`]s.

use reflexcore_types::{rank_descending, CandidateGoal, PriorityScore, RiskBreakdown};

/// Per-candidate inputs the scorer cannot derive on its own: context
/// gating, risk breakdown, and the three adjustment terms. Produced
/// by the caller from `WorldState` and whatever commitment/novelty
/// bookkeeping it keeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringInputs {
    /// Urgency term for this candidate (independent of its stored priority).
    pub urgency: f64,
    /// Context-gating multiplier, collapsing toward zero when
    /// prerequisites (location, items, safety) are absent.
    pub context_gating: f64,
    /// Risk breakdown across the four sub-dimensions.
    pub risk: RiskBreakdown,
    /// Boost from alignment with active commitments.
    pub commitment_boost: f64,
    /// Boost from time since a similar goal last ran.
    pub novelty_boost: f64,
    /// Penalty from competing candidates and resource/time cost.
    pub opportunity_cost: f64,
}

/// Scores every `(candidate, inputs)` pair and returns them ranked
/// descending by total score.
///
/// # Panics
///
/// Panics if `candidates` and `inputs` have different lengths; the
/// caller is expected to have paired them up already.
#[must_use]
pub fn score_candidates(
    candidates: Vec<CandidateGoal>,
    inputs: Vec<ScoringInputs>,
) -> Vec<PriorityScore> {
    assert_eq!(
        candidates.len(),
        inputs.len(),
        "candidates and inputs must be paired one-to-one"
    );
    let mut scores: Vec<PriorityScore> = candidates
        .into_iter()
        .zip(inputs)
        .map(|(candidate, input)| {
            PriorityScore::compute(
                candidate,
                input.urgency,
                input.context_gating,
                input.risk,
                input.commitment_boost,
                input.novelty_boost,
                input.opportunity_cost,
            )
        })
        .collect();
    rank_descending(&mut scores);
    scores
}

#[cfg(test)]
mod tests {
    use super::{score_candidates, ScoringInputs};
    use reflexcore_types::{CandidateGoal, NeedType, RiskBreakdown};
    use uuid::Uuid;

    fn candidate() -> CandidateGoal {
        CandidateGoal::new(
            NeedType::Survival,
            "consume_food",
            "eat something",
            0.5,
            1.0,
            1_000,
            Uuid::new_v4(),
        )
    }

    fn low_risk_inputs(urgency: f64) -> ScoringInputs {
        ScoringInputs {
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
        }
    }

    #[test]
    fn ranks_higher_urgency_first() {
        let candidates = vec![candidate(), candidate()];
        let inputs = vec![low_risk_inputs(0.2), low_risk_inputs(0.9)];
        let scores = score_candidates(candidates, inputs);
        assert!(scores[0].total >= scores[1].total);
        assert!((scores[0].urgency - 0.9).abs() < f64::EPSILON);
    }
}
