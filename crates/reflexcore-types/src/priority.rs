//! Priority scoring: six orthogonal components combined into one ranking.

use serde::{Deserialize, Serialize};

use crate::goal::CandidateGoal;

/// Aggregated risk across four sub-dimensions, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// Risk of the path/route to the goal.
    pub path: f64,
    /// Risk of running out of a required resource mid-pursuit.
    pub resource: f64,
    /// Risk that the window of opportunity will close in time.
    pub time: f64,
    /// Risk from environmental hazards (weather, hostiles, terrain).
    pub environmental: f64,
}

impl RiskBreakdown {
    /// Weighted aggregate of the four sub-risks, clamped to `[0, 1]`.
    #[must_use]
    pub fn aggregate(&self) -> f64 {
        let weighted =
            self.path * 0.35 + self.resource * 0.25 + self.time * 0.2 + self.environmental * 0.2;
        weighted.clamp(0.0, 1.0)
    }
}

/// A candidate goal annotated with every priority-scoring component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    /// The candidate this score describes.
    pub candidate: CandidateGoal,
    /// Urgency term, after context-specific multipliers.
    pub urgency: f64,
    /// Context-gating term (collapses toward zero when prerequisites are absent).
    pub context_gating: f64,
    /// Risk breakdown.
    pub risk: RiskBreakdown,
    /// Boost from alignment with active promises/projects.
    pub commitment_boost: f64,
    /// Boost from time since a similar goal last ran.
    pub novelty_boost: f64,
    /// Penalty from competing high-priority candidates and resource/time cost.
    pub opportunity_cost: f64,
    /// Final combined score, clamped to `>= 0`.
    pub total: f64,
}

impl PriorityScore {
    /// Combines the six components per the specification's formula:
    /// `urgency * context * (1 - risk) + commitment + novelty - opportunity`,
    /// clamped to `>= 0`.
    #[must_use]
    pub fn compute(
        candidate: CandidateGoal,
        urgency: f64,
        context_gating: f64,
        risk: RiskBreakdown,
        commitment_boost: f64,
        novelty_boost: f64,
        opportunity_cost: f64,
    ) -> Self {
        let total = (urgency * context_gating * (1.0 - risk.aggregate())
            + commitment_boost
            + novelty_boost
            - opportunity_cost)
            .max(0.0);
        Self {
            candidate,
            urgency,
            context_gating,
            risk,
            commitment_boost,
            novelty_boost,
            opportunity_cost,
            total,
        }
    }
}

/// Sorts scores descending by `total`, the specification's ranking order.
pub fn rank_descending(scores: &mut [PriorityScore]) {
    scores.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::{rank_descending, PriorityScore, RiskBreakdown};
    use crate::goal::CandidateGoal;
    use crate::need::NeedType;
    use uuid::Uuid;

    fn candidate(priority: f64) -> CandidateGoal {
        CandidateGoal::new(
            NeedType::Survival,
            "consume_food",
            "eat something",
            priority,
            1.0,
            1_000,
            Uuid::new_v4(),
        )
    }

    #[test]
    fn total_is_never_negative() {
        let risk = RiskBreakdown {
            path: 1.0,
            resource: 1.0,
            time: 1.0,
            environmental: 1.0,
        };
        let score = PriorityScore::compute(candidate(0.5), 0.1, 0.1, risk, 0.0, 0.0, 5.0);
        assert!(score.total >= 0.0);
    }

    #[test]
    fn ranks_descending() {
        let low_risk = RiskBreakdown {
            path: 0.0,
            resource: 0.0,
            time: 0.0,
            environmental: 0.0,
        };
        let mut scores = vec![
            PriorityScore::compute(candidate(0.2), 0.3, 1.0, low_risk, 0.0, 0.0, 0.0),
            PriorityScore::compute(candidate(0.9), 0.9, 1.0, low_risk, 0.0, 0.0, 0.0),
        ];
        rank_descending(&mut scores);
        assert!(scores[0].total >= scores[1].total);
    }
}
