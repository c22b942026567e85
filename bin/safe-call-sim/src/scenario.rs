use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use alloy_primitives::{Address, Bytes, U256};
use mega_safe_call::{
    test_utils::{MemoryHost, Program},
    SafeCallConfig,
};
use serde::{Deserialize, Serialize};

use crate::{Result, SimError};

/// A scripted sequence of operations run by one sender against a set of accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// The account that sends value and issues calls.
    pub sender: Address,
    /// The coordinator configuration.
    #[serde(default)]
    pub config: SafeCallConfig,
    /// The initial accounts.
    #[serde(default)]
    pub accounts: BTreeMap<Address, AccountSpec>,
    /// The operations, run in order.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// The initial state and behavior of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSpec {
    /// The initial balance.
    #[serde(default)]
    pub balance: U256,
    /// The account code. Only its size is observed.
    #[serde(default)]
    pub code: Bytes,
    /// How the account answers calls. Accounts without a behavior accept every call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Behavior>,
}

/// How an account answers calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Behavior {
    /// Succeed with the given return data.
    Return(Bytes),
    /// Revert with the given revert data.
    Revert(Bytes),
}

impl From<Behavior> for Program {
    fn from(behavior: Behavior) -> Self {
        match behavior {
            Behavior::Return(output) => Self::Return(output),
            Behavior::Revert(output) => Self::Revert(output),
        }
    }
}

/// One operation of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Send value to one recipient.
    SendValue {
        /// The receiving account.
        recipient: Address,
        /// The value to send.
        amount: U256,
    },
    /// Send a distinct amount to each recipient.
    SendBatch {
        /// The receiving accounts.
        recipients: Vec<Address>,
        /// The amount for each recipient.
        amounts: Vec<U256>,
    },
    /// Send the same amount to each recipient.
    SendBatchUniform {
        /// The receiving accounts.
        recipients: Vec<Address>,
        /// The amount for every recipient.
        amount: U256,
    },
    /// Call a contract, optionally forwarding value.
    FunctionCall {
        /// The called contract.
        target: Address,
        /// The call data.
        #[serde(default)]
        data: Bytes,
        /// The forwarded value.
        #[serde(default)]
        value: U256,
    },
    /// Call a contract in read-only mode.
    StaticCall {
        /// The called contract.
        target: Address,
        /// The call data.
        #[serde(default)]
        data: Bytes,
    },
}

impl Operation {
    /// Returns the operation name as written in scenario files.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SendValue { .. } => "send_value",
            Self::SendBatch { .. } => "send_batch",
            Self::SendBatchUniform { .. } => "send_batch_uniform",
            Self::FunctionCall { .. } => "function_call",
            Self::StaticCall { .. } => "static_call",
        }
    }
}

impl Scenario {
    /// Loads a scenario from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| SimError::ScenarioRead { file: path.to_path_buf(), source })?;

        let scenario: Self = serde_json::from_str(&content)
            .map_err(|source| SimError::ScenarioParse { file: path.to_path_buf(), source })?;

        Ok(scenario)
    }

    /// Builds the in-memory host holding the initial accounts.
    pub fn build_host(&self) -> MemoryHost {
        let mut host = MemoryHost::default();
        for (&address, account) in &self.accounts {
            host.set_account_balance(address, account.balance);
            match account.behavior.clone() {
                Some(behavior) => host.set_contract(address, account.code.clone(), behavior.into()),
                None => host.set_account_code(address, account.code.clone()),
            }
        }
        host
    }

    /// Returns every account the scenario mentions: the sender, the initial accounts, and every
    /// recipient and target.
    pub fn addresses(&self) -> BTreeSet<Address> {
        let mut addresses: BTreeSet<Address> = self.accounts.keys().copied().collect();
        addresses.insert(self.sender);
        for operation in &self.operations {
            match operation {
                Operation::SendValue { recipient, .. } => {
                    addresses.insert(*recipient);
                }
                Operation::SendBatch { recipients, .. } |
                Operation::SendBatchUniform { recipients, .. } => {
                    addresses.extend(recipients.iter().copied());
                }
                Operation::FunctionCall { target, .. } | Operation::StaticCall { target, .. } => {
                    addresses.insert(*target);
                }
            }
        }
        addresses
    }
}
