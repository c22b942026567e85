use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// The kind of a low-level call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    /// A state-mutating call that may forward value (`CALL`).
    #[display("call")]
    Call,
    /// A read-only call (`STATICCALL`).
    #[display("staticcall")]
    StaticCall,
    /// A call executing the target's code in the caller's context (`DELEGATECALL`).
    #[display("delegatecall")]
    DelegateCall,
}

impl CallKind {
    /// Whether calls of this kind can forward value.
    pub const fn carries_value(&self) -> bool {
        matches!(self, Self::Call)
    }
}

/// A low-level call to be dispatched across the call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    /// The account being called.
    pub target: Address,
    /// The call data.
    pub input: Bytes,
    /// The forwarded value. Always zero unless `kind` is [`CallKind::Call`].
    pub value: U256,
    /// The call kind.
    pub kind: CallKind,
}

impl CallRequest {
    /// Creates a state-mutating call forwarding `value`.
    pub fn call(target: Address, input: Bytes, value: U256) -> Self {
        Self { target, input, value, kind: CallKind::Call }
    }

    /// Creates a plain value transfer: a mutating call with empty call data.
    pub fn transfer(target: Address, value: U256) -> Self {
        Self::call(target, Bytes::new(), value)
    }

    /// Creates a read-only call.
    pub fn static_call(target: Address, input: Bytes) -> Self {
        Self { target, input, value: U256::ZERO, kind: CallKind::StaticCall }
    }

    /// Creates a call that runs the target's code in the caller's context.
    pub fn delegate_call(target: Address, input: Bytes) -> Self {
        Self { target, input, value: U256::ZERO, kind: CallKind::DelegateCall }
    }
}

/// The raw outcome of a dispatched call.
///
/// `output` holds the return data on success and the revert data on failure. Either may be
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    /// Whether the call succeeded.
    pub success: bool,
    /// Return data or revert data.
    pub output: Bytes,
}

impl CallOutcome {
    /// A successful outcome returning `output`.
    pub fn success(output: impl Into<Bytes>) -> Self {
        Self { success: true, output: output.into() }
    }

    /// A failed outcome carrying revert data `output`.
    pub fn revert(output: impl Into<Bytes>) -> Self {
        Self { success: false, output: output.into() }
    }

    /// A failed outcome without revert data, e.g. an out-of-gas halt.
    pub fn halt() -> Self {
        Self { success: false, output: Bytes::new() }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, bytes};

    use super::*;

    #[test]
    fn test_non_mutating_requests_carry_no_value() {
        let target = address!("0000000000000000000000000000000000100001");
        let request = CallRequest::static_call(target, bytes!("deadbeef"));
        assert_eq!(request.value, U256::ZERO);
        assert!(!request.kind.carries_value());

        let request = CallRequest::delegate_call(target, Bytes::new());
        assert_eq!(request.value, U256::ZERO);
        assert_eq!(request.kind.to_string(), "delegatecall");
    }

    #[test]
    fn test_transfer_is_call_with_empty_input() {
        let target = address!("0000000000000000000000000000000000100001");
        let request = CallRequest::transfer(target, U256::from(7));
        assert_eq!(request.kind, CallKind::Call);
        assert!(request.input.is_empty());
        assert_eq!(request.value, U256::from(7));
    }
}
