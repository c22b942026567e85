//! Tests for verified contract calls.

use alloy_primitives::{address, bytes, Address, Bytes, U256};
use alloy_sol_types::{Revert, SolError};
use mega_safe_call::{
    constants::messages,
    test_utils::{AccountTable, MemoryHost, Program, RecordingDiagnostics},
    CallFailure, CallKind, CallOutcome, CallRequest, FunctionCaller, SafeCallError,
    SafeCallEvent,
};

const CALLER: Address = address!("0000000000000000000000000000000000100000");
const CONTRACT: Address = address!("0000000000000000000000000000000000100001");
const EOA: Address = address!("0000000000000000000000000000000000100002");

fn caller() -> FunctionCaller<RecordingDiagnostics> {
    FunctionCaller::new(CALLER, RecordingDiagnostics::default())
}

#[test]
fn test_function_call_returns_data_and_emits_event() {
    let output = bytes!("000000000000000000000000000000000000000000000000000000000000002a");
    let mut host =
        MemoryHost::default().contract(CONTRACT, bytes!("00"), Program::Return(output.clone()));
    let mut caller = caller();

    let result = caller.function_call(&mut host, CONTRACT, bytes!("c2985578")).unwrap();

    assert_eq!(result, output);
    assert_eq!(
        caller.diagnostics().events(),
        [SafeCallEvent::ContractCalled {
            target: CONTRACT,
            value: U256::ZERO,
            payload: bytes!("c2985578"),
        }]
    );
}

#[test]
fn test_function_call_to_account_without_code_fails() {
    let mut host = MemoryHost::default();
    let mut caller = caller();

    let error = caller.function_call(&mut host, EOA, bytes!("c2985578")).unwrap_err();

    assert_eq!(error, SafeCallError::NonContractTarget { target: EOA });
    assert_eq!(host.dispatched_calls().len(), 1);
    assert!(caller.diagnostics().events().is_empty());
}

#[test]
fn test_function_call_to_contract_returning_nothing_succeeds() {
    let mut host = MemoryHost::default().account_code(CONTRACT, bytes!("00"));
    let mut caller = caller();

    let result = caller.function_call(&mut host, CONTRACT, Bytes::new()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_function_call_bubbles_revert_data_regardless_of_fallback() {
    let revert_data: Bytes = Revert { reason: "paused".to_string() }.abi_encode().into();
    let mut host = MemoryHost::default().contract(
        CONTRACT,
        bytes!("00"),
        Program::Revert(revert_data.clone()),
    );
    let mut caller = caller();

    for fallback in ["", "custom message"] {
        let request = CallRequest::call(CONTRACT, Bytes::new(), U256::ZERO);
        let error = caller.call(&mut host, request, fallback).unwrap_err();
        assert_eq!(error.revert_data(), revert_data);
        assert_eq!(error.call_failure().and_then(CallFailure::reason).as_deref(), Some("paused"));
    }
}

#[test]
fn test_each_call_kind_has_its_own_fallback() {
    let mut host =
        MemoryHost::default().contract(CONTRACT, bytes!("00"), Program::Revert(Bytes::new()));
    let mut caller = caller();

    let cases = [
        (caller.function_call(&mut host, CONTRACT, Bytes::new()), messages::CALL_FAILED),
        (
            caller.function_static_call(&mut host, CONTRACT, Bytes::new()),
            messages::STATIC_CALL_FAILED,
        ),
        (
            caller.function_delegate_call(&mut host, CONTRACT, Bytes::new()),
            messages::DELEGATE_CALL_FAILED,
        ),
    ];
    for (result, message) in cases {
        assert_eq!(
            result,
            Err(SafeCallError::CallFailed(CallFailure::Fallback(message.to_string())))
        );
    }
}

#[test]
fn test_function_call_with_value_checks_balance_first() {
    let mut host = MemoryHost::default()
        .account_balance(CALLER, U256::from(5))
        .account_code(CONTRACT, bytes!("00"));
    let mut caller = caller();

    let error = caller
        .function_call_with_value(&mut host, CONTRACT, Bytes::new(), U256::from(6))
        .unwrap_err();

    assert_eq!(
        error,
        SafeCallError::InsufficientBalance { balance: U256::from(5), needed: U256::from(6) }
    );
    assert!(host.dispatched_calls().is_empty());
}

#[test]
fn test_function_call_with_value_moves_value() {
    let mut host = MemoryHost::default()
        .account_balance(CALLER, U256::from(5))
        .contract(CONTRACT, bytes!("00"), Program::Return(bytes!("01")));
    let mut caller = caller();

    caller
        .function_call_with_value(&mut host, CONTRACT, bytes!("d0e30db0"), U256::from(5))
        .unwrap();

    assert_eq!(host.balance(CALLER), U256::ZERO);
    assert_eq!(host.balance(CONTRACT), U256::from(5));
    assert_eq!(
        caller.diagnostics().events(),
        [SafeCallEvent::ContractCalled {
            target: CONTRACT,
            value: U256::from(5),
            payload: bytes!("d0e30db0"),
        }]
    );
}

#[test]
fn test_static_call_never_forwards_value() {
    let mut host = MemoryHost::default()
        .account_balance(CALLER, U256::from(5))
        .contract(CONTRACT, bytes!("00"), Program::Return(bytes!("01")));
    let mut caller = caller();

    caller.function_static_call(&mut host, CONTRACT, Bytes::new()).unwrap();

    let dispatched = &host.dispatched_calls()[0];
    assert_eq!(dispatched.request.kind, CallKind::StaticCall);
    assert_eq!(dispatched.request.value, U256::ZERO);
    assert_eq!(host.balance(CALLER), U256::from(5));
}

#[test]
fn test_static_call_that_writes_state_fails() {
    let hook = |table: &mut AccountTable, caller: Address, _: &CallRequest| {
        table.set_balance(caller, U256::ZERO);
        CallOutcome::success(bytes!("01"))
    };
    let mut host = MemoryHost::default()
        .account_balance(CALLER, U256::from(5))
        .contract(CONTRACT, bytes!("00"), Program::Hook(Box::new(hook)));
    let mut caller = caller();

    let error = caller.function_static_call(&mut host, CONTRACT, Bytes::new()).unwrap_err();

    assert_eq!(
        error,
        SafeCallError::CallFailed(CallFailure::Fallback(messages::STATIC_CALL_FAILED.to_string()))
    );
    assert_eq!(host.balance(CALLER), U256::from(5));
}

#[test]
fn test_zero_target_is_rejected_for_every_kind() {
    let mut host = MemoryHost::default();
    let mut caller = caller();

    for request in [
        CallRequest::call(Address::ZERO, Bytes::new(), U256::ZERO),
        CallRequest::static_call(Address::ZERO, Bytes::new()),
        CallRequest::delegate_call(Address::ZERO, Bytes::new()),
    ] {
        assert_eq!(caller.call(&mut host, request, ""), Err(SafeCallError::ZeroAddress));
    }
    assert!(host.dispatched_calls().is_empty());
}

#[test]
fn test_value_on_non_mutating_request_is_dropped() {
    let mut host = MemoryHost::default()
        .account_balance(CALLER, U256::from(5))
        .contract(CONTRACT, bytes!("00"), Program::Return(bytes!("01")));
    let mut caller = caller();

    for kind in [CallKind::StaticCall, CallKind::DelegateCall] {
        let request =
            CallRequest { target: CONTRACT, input: Bytes::new(), value: U256::from(500), kind };
        caller.call(&mut host, request, "").unwrap();
    }

    assert!(host.dispatched_calls().iter().all(|call| call.request.value.is_zero()));
    assert_eq!(host.balance(CALLER), U256::from(5));
    let events = caller.diagnostics().events();
    assert!(events
        .iter()
        .all(|event| matches!(event, SafeCallEvent::ContractCalled { value, .. } if value.is_zero())));
    assert_eq!(events.len(), 2);
}
