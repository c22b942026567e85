//! Error types for safe calls and value transfers.

use core::fmt;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{decode_revert_reason, Revert, SolError};

use crate::ISafeCall;

/// An opaque failure of the host environment, e.g. a database error while reading an account.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HostError(String);

impl HostError {
    /// Creates a new host error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// The data carried by a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// The revert data returned by the callee, byte for byte.
    Bubbled(Bytes),
    /// The callee returned no revert data; the caller-supplied fallback message is used instead.
    Fallback(String),
}

impl CallFailure {
    /// Classifies the revert data of a failed call. Non-empty revert data always wins over the
    /// fallback message.
    pub fn from_revert(output: Bytes, fallback: &str) -> Self {
        if output.is_empty() {
            Self::Fallback(fallback.to_string())
        } else {
            Self::Bubbled(output)
        }
    }

    /// Returns `true` if the failure carries the callee's own revert data.
    pub const fn is_bubbled(&self) -> bool {
        matches!(self, Self::Bubbled(_))
    }

    /// Returns the revert data to re-raise. Bubbled data is returned unchanged; a fallback
    /// message is encoded as `Error(string)`.
    pub fn revert_data(&self) -> Bytes {
        match self {
            Self::Bubbled(output) => output.clone(),
            Self::Fallback(message) => Revert { reason: message.clone() }.abi_encode().into(),
        }
    }

    /// Returns a human-readable reason, if one can be decoded.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Bubbled(output) => match Revert::abi_decode(output, true) {
                Ok(revert) => Some(revert.reason),
                Err(_) => decode_revert_reason(output),
            },
            Self::Fallback(message) => Some(message.clone()),
        }
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.reason()) {
            (_, Some(reason)) => f.write_str(&reason),
            (Self::Bubbled(output), None) => write!(f, "reverted with {output}"),
            (Self::Fallback(message), None) => f.write_str(message),
        }
    }
}

/// Errors raised by safe calls and value transfers.
///
/// Every error aborts the whole operation; nothing is recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SafeCallError {
    /// A recipient or call target is the zero address.
    #[error("zero address is not a valid recipient or call target")]
    ZeroAddress,
    /// The invoking account cannot cover the requested value.
    #[error("insufficient balance: have {balance}, need {needed}")]
    InsufficientBalance {
        /// The balance observed at validation time.
        balance: U256,
        /// The value requested.
        needed: U256,
    },
    /// Paired recipient and amount lists differ in length.
    #[error("length mismatch: {recipients} recipients, {amounts} amounts")]
    LengthMismatch {
        /// The number of recipients.
        recipients: usize,
        /// The number of amounts.
        amounts: usize,
    },
    /// A batch has more recipients than allowed.
    #[error("batch size {size} exceeds the maximum of {max}")]
    BatchSizeExceeded {
        /// The number of recipients in the batch.
        size: usize,
        /// The configured maximum.
        max: usize,
    },
    /// A call succeeded with empty return data, but the target has no code.
    #[error("call to non-contract {target}")]
    NonContractTarget {
        /// The call target.
        target: Address,
    },
    /// A dispatched call failed.
    #[error("call failed: {0}")]
    CallFailed(CallFailure),
    /// A batch element failed; the whole batch is aborted.
    #[error("batch transfer failed at index {index}: {source}")]
    BatchElement {
        /// The zero-based index of the failing element.
        index: usize,
        /// The failure of that element.
        source: Box<SafeCallError>,
    },
    /// The host environment failed.
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl SafeCallError {
    /// Tags `self` with the index of the batch element it occurred at.
    pub fn at_index(self, index: usize) -> Self {
        Self::BatchElement { index, source: Box::new(self) }
    }

    /// Returns the index of the failing batch element, if the error came from a batch element.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            Self::BatchElement { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Returns the underlying error, stripping batch index tags.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::BatchElement { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns the call failure, if the root cause is a failed call.
    pub fn call_failure(&self) -> Option<&CallFailure> {
        match self.root_cause() {
            Self::CallFailed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Encodes the error as revert data.
    ///
    /// A failed call re-raises its callee's revert data unchanged. Batch index tags are not
    /// part of the encoding.
    pub fn revert_data(&self) -> Bytes {
        match self {
            Self::ZeroAddress => ISafeCall::ZeroAddress {}.abi_encode().into(),
            Self::InsufficientBalance { balance, needed } => {
                ISafeCall::InsufficientBalance { balance: *balance, needed: *needed }
                    .abi_encode()
                    .into()
            }
            Self::LengthMismatch { recipients, amounts } => ISafeCall::LengthMismatch {
                recipients: U256::from(*recipients),
                amounts: U256::from(*amounts),
            }
            .abi_encode()
            .into(),
            Self::BatchSizeExceeded { size, max } => ISafeCall::BatchSizeExceeded {
                size: U256::from(*size),
                max: U256::from(*max),
            }
            .abi_encode()
            .into(),
            Self::NonContractTarget { target } => {
                ISafeCall::AddressEmptyCode { target: *target }.abi_encode().into()
            }
            Self::CallFailed(failure) => failure.revert_data(),
            Self::Host(error) => {
                ISafeCall::HostFailure { message: error.message().to_string() }.abi_encode().into()
            }
            Self::BatchElement { source, .. } => source.revert_data(),
        }
    }
}
