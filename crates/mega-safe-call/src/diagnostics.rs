//! Notifications raised by value transfers and contract calls.

use alloy_primitives::{Address, Bytes, Log, U256};
use alloy_sol_types::SolEvent;
use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ISafeCall;

/// A notification raised by a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SafeCallEvent {
    /// Value was sent to a single recipient.
    #[serde(rename_all = "camelCase")]
    ValueSent {
        /// The sending account.
        sender: Address,
        /// The receiving account.
        recipient: Address,
        /// The value sent.
        amount: U256,
    },
    /// A batch transfer completed.
    #[serde(rename_all = "camelCase")]
    BatchValueSent {
        /// The sending account.
        sender: Address,
        /// The number of recipients in the batch.
        recipient_count: usize,
        /// The total value sent.
        total_amount: U256,
    },
    /// A verified contract call completed.
    #[serde(rename_all = "camelCase")]
    ContractCalled {
        /// The called contract.
        target: Address,
        /// The forwarded value.
        value: U256,
        /// The call data.
        payload: Bytes,
    },
}

impl SafeCallEvent {
    /// Converts the event into an EVM log emitted by `emitter`.
    pub fn into_log(self, emitter: Address) -> Log {
        let data = match self {
            Self::ValueSent { sender, recipient, amount } => {
                ISafeCall::ValueSent { sender, recipient, amount }.encode_log_data()
            }
            Self::BatchValueSent { sender, recipient_count, total_amount } => {
                ISafeCall::BatchValueSent {
                    sender,
                    recipientCount: U256::from(recipient_count),
                    totalAmount: total_amount,
                }
                .encode_log_data()
            }
            Self::ContractCalled { target, value, payload } => {
                ISafeCall::ContractCalled { target, value, data: payload }.encode_log_data()
            }
        };
        Log { address: emitter, data }
    }
}

/// A sink for [`SafeCallEvent`]s.
///
/// Delivery is fire-and-forget and ordered. Events of an operation are only delivered once the
/// operation has committed.
#[auto_impl(&mut, Box)]
pub trait Diagnostics {
    /// Receives one event.
    fn emit(&mut self, event: SafeCallEvent);
}

impl Diagnostics for () {
    fn emit(&mut self, _event: SafeCallEvent) {}
}

/// Writes every event as a structured `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&mut self, event: SafeCallEvent) {
        match event {
            SafeCallEvent::ValueSent { sender, recipient, amount } => {
                info!(target: "mega_safe_call::events", %sender, %recipient, %amount, "ValueSent");
            }
            SafeCallEvent::BatchValueSent { sender, recipient_count, total_amount } => {
                info!(
                    target: "mega_safe_call::events",
                    %sender,
                    recipient_count,
                    %total_amount,
                    "BatchValueSent"
                );
            }
            SafeCallEvent::ContractCalled { target, value, payload } => {
                info!(
                    target: "mega_safe_call::events",
                    contract = %target,
                    %value,
                    %payload,
                    "ContractCalled"
                );
            }
        }
    }
}

/// Collects events as EVM logs emitted by a fixed address.
#[derive(Debug, Clone, Default)]
pub struct LogCollector {
    emitter: Address,
    logs: Vec<Log>,
}

impl LogCollector {
    /// Creates a collector attributing every log to `emitter`.
    pub const fn new(emitter: Address) -> Self {
        Self { emitter, logs: Vec::new() }
    }

    /// Returns the collected logs.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Consumes the collector, returning the collected logs.
    pub fn into_logs(self) -> Vec<Log> {
        self.logs
    }
}

impl Diagnostics for LogCollector {
    fn emit(&mut self, event: SafeCallEvent) {
        self.logs.push(event.into_log(self.emitter));
    }
}
