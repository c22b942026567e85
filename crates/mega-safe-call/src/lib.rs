//! Verified low-level calls and batched value transfers for the `MegaETH` EVM.
//!
//! The crate sits between an invoking account and the accounts it calls into. It dispatches
//! calls across an explicit [`CallBoundary`], classifies the [`CallOutcome`], and bubbles the
//! original revert data of a failed call unchanged. On top of that,
//! [`ValueTransferCoordinator`] performs single and batched value transfers inside an explicit
//! [`AtomicUnit`], and [`FunctionCaller`] performs verified contract calls.
//!
//! Control crosses into untrusted code on every dispatched call, and that code may re-enter
//! the invoking account. This crate keeps no state across the boundary; callers that cache
//! state must bring their own reentrancy protection.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod atomic;

mod caller;
pub use caller::*;

mod config;
pub use config::*;

mod coordinator;
pub use coordinator::*;

mod diagnostics;
pub use diagnostics::*;

mod dispatcher;
pub use dispatcher::*;

mod error;
pub use error::*;

mod host;
pub use host::*;

mod interface;
pub use interface::ISafeCall;

mod ledger;
pub use ledger::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

mod types;
pub use types::*;

mod verifier;
pub use verifier::*;
