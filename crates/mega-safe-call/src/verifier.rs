//! Verification of raw call outcomes.
//!
//! A failed call never loses its revert data: when the callee returned any, it is re-raised
//! byte for byte in [`SafeCallError::CallFailed`], and the fallback message is only used when
//! the callee returned nothing.

use alloy_primitives::{Address, Bytes};
use tracing::warn;

use crate::{AccountClassifier, CallFailure, CallOutcome, SafeCallError};

/// Verifies a call outcome without looking at the target.
///
/// Returns the return data of a successful call, even when it is empty. Use this for plain value
/// transfers, where a target without code is a valid recipient.
pub fn verify(outcome: CallOutcome, fallback: &str) -> Result<Bytes, SafeCallError> {
    if outcome.success {
        Ok(outcome.output)
    } else {
        Err(call_failed(outcome.output, fallback))
    }
}

/// Verifies a call outcome, additionally rejecting targets without code.
///
/// A successful call with empty return data is ambiguous: the target may be a contract whose
/// function returns nothing, or it may have no code at all. The classifier is consulted only in
/// that case, and a target without code fails with [`SafeCallError::NonContractTarget`].
pub fn verify_with_target_check<C>(
    classifier: &mut C,
    target: Address,
    outcome: CallOutcome,
    fallback: &str,
) -> Result<Bytes, SafeCallError>
where
    C: AccountClassifier + ?Sized,
{
    if !outcome.success {
        return Err(call_failed(outcome.output, fallback));
    }
    if outcome.output.is_empty() && !classifier.is_executable(target)? {
        warn!(
            target: "mega_safe_call::verify",
            callee = %target,
            "Call to account without code"
        );
        return Err(SafeCallError::NonContractTarget { target });
    }
    Ok(outcome.output)
}

fn call_failed(output: Bytes, fallback: &str) -> SafeCallError {
    let failure = CallFailure::from_revert(output, fallback);
    warn!(
        target: "mega_safe_call::verify",
        bubbled = failure.is_bubbled(),
        %failure,
        "Call failed"
    );
    SafeCallError::CallFailed(failure)
}
