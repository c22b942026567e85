//! Verified calls into contracts.

use alloy_primitives::{Address, Bytes, U256};

use crate::{
    atomic::atomically, constants::messages, dispatch, ensure_balance, verify_with_target_check,
    CallRequest, Diagnostics, Host, SafeCallError, SafeCallEvent,
};

/// Performs verified calls from a single calling account.
///
/// Unlike a plain value transfer, a call that succeeds with empty return data is only accepted
/// if the target has code. Every call hands control to the target, which may re-enter the
/// caller.
#[derive(Debug, Clone)]
pub struct FunctionCaller<D = ()> {
    caller: Address,
    diagnostics: D,
}

impl<D: Diagnostics> FunctionCaller<D> {
    /// Creates a caller acting as `caller`.
    pub const fn new(caller: Address, diagnostics: D) -> Self {
        Self { caller, diagnostics }
    }

    /// Returns the calling account.
    pub const fn caller(&self) -> Address {
        self.caller
    }

    /// Returns the diagnostics sink.
    pub const fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Consumes the caller, returning the diagnostics sink.
    pub fn into_diagnostics(self) -> D {
        self.diagnostics
    }

    /// Calls `target` with `data` and no value.
    pub fn function_call<H>(
        &mut self,
        host: &mut H,
        target: Address,
        data: Bytes,
    ) -> Result<Bytes, SafeCallError>
    where
        H: Host + ?Sized,
    {
        self.call(host, CallRequest::call(target, data, U256::ZERO), messages::CALL_FAILED)
    }

    /// Calls `target` with `data`, forwarding `value`.
    pub fn function_call_with_value<H>(
        &mut self,
        host: &mut H,
        target: Address,
        data: Bytes,
        value: U256,
    ) -> Result<Bytes, SafeCallError>
    where
        H: Host + ?Sized,
    {
        self.call(host, CallRequest::call(target, data, value), messages::CALL_WITH_VALUE_FAILED)
    }

    /// Calls `target` with `data` in read-only mode.
    pub fn function_static_call<H>(
        &mut self,
        host: &mut H,
        target: Address,
        data: Bytes,
    ) -> Result<Bytes, SafeCallError>
    where
        H: Host + ?Sized,
    {
        self.call(host, CallRequest::static_call(target, data), messages::STATIC_CALL_FAILED)
    }

    /// Runs the code of `target` with `data` in the caller's context.
    pub fn function_delegate_call<H>(
        &mut self,
        host: &mut H,
        target: Address,
        data: Bytes,
    ) -> Result<Bytes, SafeCallError>
    where
        H: Host + ?Sized,
    {
        self.call(host, CallRequest::delegate_call(target, data), messages::DELEGATE_CALL_FAILED)
    }

    /// Dispatches `request` and verifies its outcome against the target, using `fallback` as the
    /// failure message when the target reverts without data.
    ///
    /// A value set on a request that cannot carry one is ignored.
    pub fn call<H>(
        &mut self,
        host: &mut H,
        mut request: CallRequest,
        fallback: &str,
    ) -> Result<Bytes, SafeCallError>
    where
        H: Host + ?Sized,
    {
        if !request.kind.carries_value() {
            request.value = U256::ZERO;
        }
        let caller = self.caller;
        atomically(host, &mut self.diagnostics, |host, events| {
            if request.target.is_zero() {
                return Err(SafeCallError::ZeroAddress);
            }
            if request.kind.carries_value() && !request.value.is_zero() {
                ensure_balance(host, caller, request.value)?;
            }
            let outcome = dispatch(host, caller, &request)?;
            let output = verify_with_target_check(host, request.target, outcome, fallback)?;
            events.push(SafeCallEvent::ContractCalled {
                target: request.target,
                value: request.value,
                payload: request.input,
            });
            Ok(output)
        })
    }
}
