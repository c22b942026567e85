use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes, Log, U256};
use mega_safe_call::{CallFailure, SafeCallError, SafeCallEvent};
use serde::Serialize;

/// The result of running a scenario.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// The sending account.
    pub sender: Address,
    /// One entry per operation, in order.
    pub operations: Vec<OperationReport>,
    /// The final balance of every account the scenario mentions.
    pub balances: BTreeMap<Address, U256>,
}

impl Report {
    /// Returns the number of operations that failed.
    pub fn failures(&self) -> usize {
        self.operations.iter().filter(|operation| !operation.ok).count()
    }
}

/// The result of one operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationReport {
    /// The operation name.
    pub op: &'static str,
    /// Whether the operation committed.
    pub ok: bool,
    /// The return data of a call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Bytes>,
    /// The total sent by a batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<U256>,
    /// Why the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
    /// The events delivered on commit.
    pub events: Vec<SafeCallEvent>,
    /// The events as EVM logs emitted by the sender.
    pub logs: Vec<Log>,
}

/// A failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// The error message.
    pub message: String,
    /// The failing batch element, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_index: Option<usize>,
    /// Whether the revert data was bubbled from the callee.
    pub bubbled: bool,
    /// The revert data the operation would surface.
    pub revert_data: Bytes,
    /// The decoded revert reason of a failed call, if readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&SafeCallError> for ErrorReport {
    fn from(error: &SafeCallError) -> Self {
        let failure = error.call_failure();
        Self {
            message: error.to_string(),
            batch_index: error.batch_index(),
            bubbled: failure.is_some_and(CallFailure::is_bubbled),
            revert_data: error.revert_data(),
            reason: failure.and_then(CallFailure::reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::bytes;

    use super::*;

    #[test]
    fn test_batch_error_report() {
        let error = SafeCallError::CallFailed(CallFailure::Bubbled(bytes!("dead"))).at_index(4);

        let report = ErrorReport::from(&error);

        assert_eq!(report.batch_index, Some(4));
        assert!(report.bubbled);
        assert_eq!(report.revert_data, bytes!("dead"));
    }

    #[test]
    fn test_fallback_error_report() {
        let error = SafeCallError::CallFailed(CallFailure::Fallback("nope".to_string()));

        let report = ErrorReport::from(&error);

        assert!(!report.bubbled);
        assert_eq!(report.reason.as_deref(), Some("nope"));
        assert_eq!(report.batch_index, None);
    }
}
