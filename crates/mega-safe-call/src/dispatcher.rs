use alloy_primitives::Address;
use tracing::{debug, trace};

use crate::{CallBoundary, CallOutcome, CallRequest, SafeCallError};

/// Dispatches `request` across the call boundary on behalf of `caller` and returns the raw
/// outcome without interpreting it.
///
/// The target must not be the zero address. For a value-carrying call the caller is expected to
/// have checked its balance beforehand; that check is not atomic with the call, and the callee
/// may re-enter `caller` before this returns.
pub fn dispatch<B>(
    boundary: &mut B,
    caller: Address,
    request: &CallRequest,
) -> Result<CallOutcome, SafeCallError>
where
    B: CallBoundary + ?Sized,
{
    if request.target.is_zero() {
        return Err(SafeCallError::ZeroAddress);
    }

    trace!(
        target: "mega_safe_call::dispatch",
        %caller,
        callee = %request.target,
        kind = %request.kind,
        value = %request.value,
        input_len = request.input.len(),
        "Dispatching call"
    );
    let outcome = boundary.invoke(caller, request)?;
    debug!(
        target: "mega_safe_call::dispatch",
        callee = %request.target,
        success = outcome.success,
        output_len = outcome.output.len(),
        "Call returned"
    );
    Ok(outcome)
}
