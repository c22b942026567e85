//! The host environment seen by safe calls: balances, code, the call boundary, and the
//! enclosing atomic unit.

use alloy_primitives::{Address, U256};
use auto_impl::auto_impl;

use crate::{CallOutcome, CallRequest, HostError};

/// Read access to account balances.
///
/// Balances are queried immediately before each validation and never cached.
#[auto_impl(&mut, Box)]
pub trait BalanceLedger {
    /// Returns the current balance of `account`. Unknown accounts have a zero balance.
    fn balance_of(&mut self, account: Address) -> Result<U256, HostError>;
}

/// Point-in-time classification of accounts by their code.
///
/// An account reports no code while it is not yet created, while its constructor is still
/// running, and after it has been destroyed. A `false` from [`Self::is_executable`] is therefore
/// not a signal that an account is safe to treat as a plain recipient and must not be used for
/// access control. Its only purpose is to catch calls that "succeeded" with empty return data
/// because the target has no code at all.
#[auto_impl(&mut, Box)]
pub trait AccountClassifier {
    /// Returns the size of the code currently associated with `account`.
    fn code_size(&mut self, account: Address) -> Result<usize, HostError>;

    /// Returns `true` if `account` currently has non-empty code.
    fn is_executable(&mut self, account: Address) -> Result<bool, HostError> {
        Ok(self.code_size(account)? > 0)
    }
}

/// The call boundary: the single point where control transfers to another account's code.
///
/// The callee runs synchronously and may call back into `caller` before returning. Any state the
/// caller mutated before invoking the boundary is visible to such a reentrant call.
#[auto_impl(&mut, Box)]
pub trait CallBoundary {
    /// Executes `request` on behalf of `caller` and returns the raw outcome.
    ///
    /// A reverted or halted callee is reported through [`CallOutcome::success`], not through the
    /// error. The error is reserved for failures of the host itself.
    fn invoke(&mut self, caller: Address, request: &CallRequest) -> Result<CallOutcome, HostError>;
}

/// The enclosing atomic unit of work.
///
/// Every state change made between [`Self::checkpoint`] and the matching
/// [`Self::checkpoint_revert`] is undone, including value moved by calls across the boundary.
/// Checkpoints nest and must be resolved in reverse order of creation.
#[auto_impl(&mut, Box)]
pub trait AtomicUnit {
    /// The checkpoint handle.
    type Checkpoint;

    /// Opens a new checkpoint.
    fn checkpoint(&mut self) -> Self::Checkpoint;

    /// Keeps every change made since `checkpoint`.
    fn checkpoint_commit(&mut self, checkpoint: Self::Checkpoint);

    /// Undoes every change made since `checkpoint`.
    fn checkpoint_revert(&mut self, checkpoint: Self::Checkpoint);
}

/// A complete host: balances, code classification, the call boundary, and atomicity.
pub trait Host: BalanceLedger + AccountClassifier + CallBoundary + AtomicUnit {}

impl<T> Host for T where T: BalanceLedger + AccountClassifier + CallBoundary + AtomicUnit {}
