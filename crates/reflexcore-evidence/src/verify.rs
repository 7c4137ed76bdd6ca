//! Post-execution verification: did the world actually change the way
//! the reported execution result claims?

use reflexcore_types::{ExecutionResult, VerificationBlock, VerificationOutcome};

/// Computes the verification outcome for one firing from the observed
/// resource levels and consumption evidence.
///
/// `execution_result` dominates: a skipped or failed firing is never
/// examined for resource movement, since there was no execution to
/// verify in the first place.
///
/// Two corroboration paths are independent, not conjunctive.
/// `receipt_confirmed` alone is sufficient proof even when
/// `resource_after` shows no increase, or isn't available at all — an
/// executor receipt that names what was consumed doesn't need the
/// homeostasis delta to agree, since unrelated concurrent decay can
/// mask a real consumption within the same tick. Absent a receipt, the
/// delta path requires both an after-reading and inventory data;
/// either missing degrades to its own distinct unverified outcome
/// rather than collapsing into one generic "no evidence" bucket.
#[must_use]
pub fn verify_execution(
    execution_result: ExecutionResult,
    receipt_confirmed: bool,
    resource_before: f64,
    resource_after: Option<f64>,
    items_consumed: Option<Vec<String>>,
) -> VerificationBlock {
    let outcome = match execution_result {
        ExecutionResult::Skipped => VerificationOutcome::SkippedBeforeExecution,
        ExecutionResult::Error => VerificationOutcome::ExecutionFailed,
        ExecutionResult::Ok if receipt_confirmed => VerificationOutcome::ReceiptConfirmed,
        ExecutionResult::Ok => match resource_after {
            None => VerificationOutcome::AfterStateUnavailable,
            Some(after) => {
                let delta = after - resource_before;
                if delta > 0.0 {
                    match &items_consumed {
                        Some(items) if !items.is_empty() => VerificationOutcome::DeltaConfirmed,
                        Some(_) => VerificationOutcome::IncreasedWithoutEvidence,
                        None => VerificationOutcome::IncreasedInventoryUnavailable,
                    }
                } else if delta < 0.0 {
                    VerificationOutcome::RegressedDespiteSuccess
                } else {
                    VerificationOutcome::NoChangeDespiteSuccess
                }
            }
        },
    };
    VerificationBlock::new(resource_before, resource_after, items_consumed, outcome)
}

#[cfg(test)]
mod tests {
    use super::verify_execution;
    use reflexcore_types::{ExecutionResult, VerificationOutcome};

    #[test]
    fn increase_with_evidence_is_delta_confirmed() {
        let block = verify_execution(
            ExecutionResult::Ok,
            false,
            1.0,
            Some(2.0),
            Some(vec!["bread".to_owned()]),
        );
        assert_eq!(block.outcome, VerificationOutcome::DeltaConfirmed);
    }

    #[test]
    fn increase_without_evidence_is_flagged() {
        let block = verify_execution(ExecutionResult::Ok, false, 1.0, Some(2.0), Some(Vec::new()));
        assert_eq!(block.outcome, VerificationOutcome::IncreasedWithoutEvidence);
    }

    #[test]
    fn increase_with_inventory_unavailable_is_distinguished() {
        let block = verify_execution(ExecutionResult::Ok, false, 1.0, Some(2.0), None);
        assert_eq!(block.outcome, VerificationOutcome::IncreasedInventoryUnavailable);
    }

    #[test]
    fn no_change_despite_success_is_flagged() {
        let block = verify_execution(ExecutionResult::Ok, false, 1.0, Some(1.0), Some(Vec::new()));
        assert_eq!(block.outcome, VerificationOutcome::NoChangeDespiteSuccess);
    }

    #[test]
    fn regression_despite_success_is_flagged() {
        let block = verify_execution(ExecutionResult::Ok, false, 2.0, Some(1.0), Some(Vec::new()));
        assert_eq!(block.outcome, VerificationOutcome::RegressedDespiteSuccess);
    }

    #[test]
    fn after_state_unavailable_is_its_own_outcome() {
        let block = verify_execution(ExecutionResult::Ok, false, 1.0, None, None);
        assert_eq!(block.outcome, VerificationOutcome::AfterStateUnavailable);
    }

    #[test]
    fn receipt_confirms_even_with_a_flat_delta() {
        let block = verify_execution(ExecutionResult::Ok, true, 1.0, Some(1.0), None);
        assert_eq!(block.outcome, VerificationOutcome::ReceiptConfirmed);
    }

    #[test]
    fn receipt_confirms_even_without_an_after_reading() {
        let block = verify_execution(ExecutionResult::Ok, true, 1.0, None, None);
        assert_eq!(block.outcome, VerificationOutcome::ReceiptConfirmed);
    }

    #[test]
    fn execution_failure_short_circuits() {
        let block = verify_execution(
            ExecutionResult::Error,
            false,
            1.0,
            Some(5.0),
            Some(vec!["bread".to_owned()]),
        );
        assert_eq!(block.outcome, VerificationOutcome::ExecutionFailed);
    }

    #[test]
    fn skip_short_circuits() {
        let block = verify_execution(ExecutionResult::Skipped, false, 1.0, Some(5.0), Some(Vec::new()));
        assert_eq!(block.outcome, VerificationOutcome::SkippedBeforeExecution);
    }
}
