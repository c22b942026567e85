use core::fmt;

use alloy_primitives::{map::HashMap, Address, Bytes, U256};

use crate::{
    AccountClassifier, AtomicUnit, BalanceLedger, CallBoundary, CallKind, CallOutcome,
    CallRequest, HostError,
};

/// The state of one account in a [`MemoryHost`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryAccount {
    /// The account balance.
    pub balance: U256,
    /// The account code. Empty for externally owned accounts.
    pub code: Bytes,
}

/// The revertible account state of a [`MemoryHost`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountTable {
    accounts: HashMap<Address, MemoryAccount>,
}

impl AccountTable {
    /// Returns the balance of `address`.
    pub fn balance(&self, address: Address) -> U256 {
        self.accounts.get(&address).map(|account| account.balance).unwrap_or_default()
    }

    /// Sets the balance of `address`.
    pub fn set_balance(&mut self, address: Address, balance: U256) {
        self.accounts.entry(address).or_default().balance = balance;
    }

    /// Returns the code of `address`.
    pub fn code(&self, address: Address) -> Bytes {
        self.accounts.get(&address).map(|account| account.code.clone()).unwrap_or_default()
    }

    /// Sets the code of `address`.
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        self.accounts.entry(address).or_default().code = code;
    }

    /// Moves `amount` from `from` to `to`. Returns `false` and changes nothing if `from` cannot
    /// cover it.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let balance = self.balance(from);
        if balance < amount {
            return false;
        }
        self.set_balance(from, balance - amount);
        let credited = self.balance(to).saturating_add(amount);
        self.set_balance(to, credited);
        true
    }
}

/// Custom contract logic. Receives the account state, the caller, and the request. Value has
/// already been moved when it runs, and all of its state changes are reverted if it returns a
/// failed outcome.
pub type CallHook = Box<dyn FnMut(&mut AccountTable, Address, &CallRequest) -> CallOutcome + Send>;

/// The behavior of a contract in a [`MemoryHost`].
pub enum Program {
    /// Succeed with the given return data.
    Return(Bytes),
    /// Revert with the given revert data.
    Revert(Bytes),
    /// Run custom logic, e.g. to re-enter the caller.
    Hook(CallHook),
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Return(output) => f.debug_tuple("Return").field(output).finish(),
            Self::Revert(output) => f.debug_tuple("Revert").field(output).finish(),
            Self::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

/// A call that reached the call boundary of a [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedCall {
    /// The calling account.
    pub caller: Address,
    /// The request.
    pub request: CallRequest,
}

/// An in-memory host for testing.
///
/// Accounts without a program accept every call and return empty data, like an account without
/// code or a contract whose function returns nothing. A failed call reverts the value it moved.
/// A read-only call that changes state fails without data. The dispatch log is not affected by
/// checkpoints.
#[derive(Debug, Default)]
pub struct MemoryHost {
    table: AccountTable,
    programs: HashMap<Address, Program>,
    checkpoints: Vec<AccountTable>,
    dispatched: Vec<DispatchedCall>,
}

impl MemoryHost {
    /// Returns the balance of `address`.
    pub fn balance(&self, address: Address) -> U256 {
        self.table.balance(address)
    }

    /// Returns the account state.
    pub const fn table(&self) -> &AccountTable {
        &self.table
    }

    /// Returns the account state mutably.
    pub fn table_mut(&mut self) -> &mut AccountTable {
        &mut self.table
    }

    /// Returns every call that reached the call boundary, in order.
    pub fn dispatched_calls(&self) -> &[DispatchedCall] {
        &self.dispatched
    }

    /// Returns the number of checkpoints not yet committed or reverted.
    pub fn open_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    /// Sets the balance of an account.
    pub fn set_account_balance(&mut self, address: Address, balance: U256) {
        self.table.set_balance(address, balance);
    }

    /// Sets the balance of an account.
    pub fn account_balance(mut self, address: Address, balance: U256) -> Self {
        self.set_account_balance(address, balance);
        self
    }

    /// Sets the code of an account, without a program.
    pub fn set_account_code(&mut self, address: Address, code: Bytes) {
        self.table.set_code(address, code);
    }

    /// Sets the code of an account, without a program.
    pub fn account_code(mut self, address: Address, code: Bytes) -> Self {
        self.set_account_code(address, code);
        self
    }

    /// Installs a contract with the given code and behavior.
    pub fn set_contract(&mut self, address: Address, code: Bytes, program: Program) {
        self.table.set_code(address, code);
        self.programs.insert(address, program);
    }

    /// Installs a contract with the given code and behavior.
    pub fn contract(mut self, address: Address, code: Bytes, program: Program) -> Self {
        self.set_contract(address, code, program);
        self
    }
}

impl BalanceLedger for MemoryHost {
    fn balance_of(&mut self, account: Address) -> Result<U256, HostError> {
        Ok(self.table.balance(account))
    }
}

impl AccountClassifier for MemoryHost {
    fn code_size(&mut self, account: Address) -> Result<usize, HostError> {
        Ok(self.table.code(account).len())
    }
}

impl CallBoundary for MemoryHost {
    fn invoke(&mut self, caller: Address, request: &CallRequest) -> Result<CallOutcome, HostError> {
        self.dispatched.push(DispatchedCall { caller, request: request.clone() });

        let snapshot = self.table.clone();
        if request.kind.carries_value() &&
            !self.table.transfer(caller, request.target, request.value)
        {
            return Ok(CallOutcome::halt());
        }

        let outcome = match self.programs.get_mut(&request.target) {
            None => CallOutcome::success(Bytes::new()),
            Some(Program::Return(output)) => CallOutcome::success(output.clone()),
            Some(Program::Revert(output)) => CallOutcome::revert(output.clone()),
            Some(Program::Hook(hook)) => hook(&mut self.table, caller, request),
        };

        if !outcome.success {
            self.table = snapshot;
            return Ok(outcome);
        }
        if request.kind == CallKind::StaticCall && self.table != snapshot {
            self.table = snapshot;
            return Ok(CallOutcome::halt());
        }
        Ok(outcome)
    }
}

impl AtomicUnit for MemoryHost {
    type Checkpoint = usize;

    fn checkpoint(&mut self) -> usize {
        self.checkpoints.push(self.table.clone());
        self.checkpoints.len() - 1
    }

    fn checkpoint_commit(&mut self, checkpoint: usize) {
        self.checkpoints.truncate(checkpoint);
    }

    fn checkpoint_revert(&mut self, checkpoint: usize) {
        self.checkpoints.truncate(checkpoint + 1);
        if let Some(table) = self.checkpoints.pop() {
            self.table = table;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, bytes};

    use super::*;

    const CALLER: Address = address!("0000000000000000000000000000000000100000");
    const TARGET: Address = address!("0000000000000000000000000000000000100001");

    #[test]
    fn test_value_moves_on_success_and_reverts_on_failure() {
        let mut host = MemoryHost::default()
            .account_balance(CALLER, U256::from(100))
            .contract(TARGET, bytes!("00"), Program::Revert(bytes!("01")));

        let outcome = host.invoke(CALLER, &CallRequest::transfer(TARGET, U256::from(10))).unwrap();
        assert!(!outcome.success);
        assert_eq!(host.balance(CALLER), U256::from(100));
        assert_eq!(host.balance(TARGET), U256::ZERO);

        let other = address!("0000000000000000000000000000000000100002");
        let outcome = host.invoke(CALLER, &CallRequest::transfer(other, U256::from(10))).unwrap();
        assert!(outcome.success);
        assert_eq!(host.balance(CALLER), U256::from(90));
        assert_eq!(host.balance(other), U256::from(10));
    }

    #[test]
    fn test_insufficient_balance_halts_without_data() {
        let mut host = MemoryHost::default().account_balance(CALLER, U256::from(1));
        let outcome = host.invoke(CALLER, &CallRequest::transfer(TARGET, U256::from(2))).unwrap();
        assert_eq!(outcome, CallOutcome::halt());
        assert_eq!(host.balance(CALLER), U256::from(1));
    }

    #[test]
    fn test_state_changing_static_call_fails() {
        let hook = |table: &mut AccountTable, _: Address, request: &CallRequest| {
            table.set_balance(request.target, U256::from(1));
            CallOutcome::success(Bytes::new())
        };
        let mut host =
            MemoryHost::default().contract(TARGET, bytes!("00"), Program::Hook(Box::new(hook)));
        let outcome = host.invoke(CALLER, &CallRequest::static_call(TARGET, Bytes::new())).unwrap();
        assert_eq!(outcome, CallOutcome::halt());
        assert_eq!(host.balance(TARGET), U256::ZERO);
    }

    #[test]
    fn test_nested_checkpoints() {
        let mut host = MemoryHost::default().account_balance(CALLER, U256::from(1));
        let outer = host.checkpoint();
        host.set_account_balance(CALLER, U256::from(2));
        let inner = host.checkpoint();
        host.set_account_balance(CALLER, U256::from(3));

        host.checkpoint_revert(inner);
        assert_eq!(host.balance(CALLER), U256::from(2));
        host.checkpoint_revert(outer);
        assert_eq!(host.balance(CALLER), U256::from(1));
        assert_eq!(host.open_checkpoints(), 0);
    }
}
