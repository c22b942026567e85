//! Constants for safe calls and value transfers.

/// The maximum number of recipients accepted by a single batch transfer, unless overridden by
/// [`SafeCallConfig`](crate::SafeCallConfig).
pub const MAX_BATCH_SIZE: usize = 100;

/// Fallback messages used when a failed call returns no revert data.
pub mod messages {
    /// Fallback for [`function_call`](crate::FunctionCaller::function_call).
    pub const CALL_FAILED: &str = "low-level call failed";
    /// Fallback for [`function_call_with_value`](crate::FunctionCaller::function_call_with_value).
    pub const CALL_WITH_VALUE_FAILED: &str = "low-level call with value failed";
    /// Fallback for [`function_static_call`](crate::FunctionCaller::function_static_call).
    pub const STATIC_CALL_FAILED: &str = "low-level static call failed";
    /// Fallback for [`function_delegate_call`](crate::FunctionCaller::function_delegate_call).
    pub const DELEGATE_CALL_FAILED: &str = "low-level delegate call failed";
}
