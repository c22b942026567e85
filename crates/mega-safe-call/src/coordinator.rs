//! Single and batched value transfers.

use alloy_primitives::{Address, U256};
use tracing::{debug, warn};

use crate::{
    atomic::atomically, dispatch, ensure_balance, verify, CallRequest, Diagnostics, Host,
    SafeCallConfig, SafeCallError, SafeCallEvent,
};

/// Performs value transfers from a single sending account.
///
/// Each operation runs inside its own checkpoint of the host's [`AtomicUnit`](crate::AtomicUnit):
/// if any step fails, every transfer the operation already made is reverted and none of its
/// events are delivered. The coordinator keeps no state across calls; balances are queried from
/// the host right before they are validated.
#[derive(Debug, Clone)]
pub struct ValueTransferCoordinator<D = ()> {
    sender: Address,
    config: SafeCallConfig,
    diagnostics: D,
}

impl<D: Diagnostics> ValueTransferCoordinator<D> {
    /// Creates a coordinator sending from `sender`.
    pub const fn new(sender: Address, config: SafeCallConfig, diagnostics: D) -> Self {
        Self { sender, config, diagnostics }
    }

    /// Returns the sending account.
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &SafeCallConfig {
        &self.config
    }

    /// Returns the diagnostics sink.
    pub const fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Returns the diagnostics sink mutably.
    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.diagnostics
    }

    /// Consumes the coordinator, returning the diagnostics sink.
    pub fn into_diagnostics(self) -> D {
        self.diagnostics
    }

    /// Sends `amount` to `recipient`.
    ///
    /// The recipient does not need to have code. Control is handed to the recipient's code, if
    /// any, which may re-enter the sender.
    pub fn send_value<H>(
        &mut self,
        host: &mut H,
        recipient: Address,
        amount: U256,
    ) -> Result<(), SafeCallError>
    where
        H: Host + ?Sized,
    {
        let sender = self.sender;
        atomically(host, &mut self.diagnostics, |host, events| {
            if recipient.is_zero() {
                return Err(SafeCallError::ZeroAddress);
            }
            ensure_balance(host, sender, amount)?;
            transfer(host, sender, recipient, amount, events)
        })
    }

    /// Sends `amounts[i]` to `recipients[i]` for every `i`, in order, all or nothing.
    ///
    /// Returns the total amount sent.
    pub fn send_batch<H>(
        &mut self,
        host: &mut H,
        recipients: &[Address],
        amounts: &[U256],
    ) -> Result<U256, SafeCallError>
    where
        H: Host + ?Sized,
    {
        if recipients.len() != amounts.len() {
            warn!(
                target: "mega_safe_call::transfer",
                sender = %self.sender,
                recipients = recipients.len(),
                amounts = amounts.len(),
                "Batch rejected: length mismatch"
            );
            return Err(SafeCallError::LengthMismatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        self.run_batch(host, recipients, Amounts::Paired(amounts))
    }

    /// Sends `amount` to every recipient, in order, all or nothing.
    ///
    /// Returns the total amount sent.
    pub fn send_batch_uniform<H>(
        &mut self,
        host: &mut H,
        recipients: &[Address],
        amount: U256,
    ) -> Result<U256, SafeCallError>
    where
        H: Host + ?Sized,
    {
        self.run_batch(host, recipients, Amounts::Uniform(amount))
    }

    fn run_batch<H>(
        &mut self,
        host: &mut H,
        recipients: &[Address],
        amounts: Amounts<'_>,
    ) -> Result<U256, SafeCallError>
    where
        H: Host + ?Sized,
    {
        let sender = self.sender;
        let max = self.config.max_batch_size;
        atomically(host, &mut self.diagnostics, |host, events| {
            if recipients.len() > max {
                warn!(
                    target: "mega_safe_call::transfer",
                    %sender,
                    size = recipients.len(),
                    max,
                    "Batch rejected: too many recipients"
                );
                return Err(SafeCallError::BatchSizeExceeded { size: recipients.len(), max });
            }
            // Reject zero recipients up front so that no call is dispatched for a batch that is
            // bound to fail.
            if let Some(index) = recipients.iter().position(|recipient| recipient.is_zero()) {
                warn!(
                    target: "mega_safe_call::transfer",
                    %sender,
                    index,
                    "Batch rejected: zero recipient"
                );
                return Err(SafeCallError::ZeroAddress.at_index(index));
            }

            // The balance is checked once against the total. It is not re-checked per element,
            // even though a recipient may re-enter and move the sender's funds.
            let total = amounts.total(recipients.len());
            if let Err(error) = ensure_balance(host, sender, total) {
                warn!(
                    target: "mega_safe_call::transfer",
                    %sender,
                    %total,
                    %error,
                    "Batch rejected: total not covered"
                );
                return Err(error);
            }

            for (index, recipient) in recipients.iter().enumerate() {
                let amount = amounts.get(index);
                if let Err(error) = transfer(host, sender, *recipient, amount, events) {
                    warn!(
                        target: "mega_safe_call::transfer",
                        %sender,
                        index,
                        %recipient,
                        %amount,
                        %error,
                        "Batch transfer aborted"
                    );
                    return Err(error.at_index(index));
                }
            }

            events.push(SafeCallEvent::BatchValueSent {
                sender,
                recipient_count: recipients.len(),
                total_amount: total,
            });
            debug!(
                target: "mega_safe_call::transfer",
                %sender,
                recipients = recipients.len(),
                %total,
                "Batch transfer completed"
            );
            Ok(total)
        })
    }
}

/// Moves `amount` from `sender` to `recipient` with a plain call and records the event.
fn transfer<H>(
    host: &mut H,
    sender: Address,
    recipient: Address,
    amount: U256,
    events: &mut Vec<SafeCallEvent>,
) -> Result<(), SafeCallError>
where
    H: Host + ?Sized,
{
    let outcome = dispatch(host, sender, &CallRequest::transfer(recipient, amount))?;
    verify(outcome, &format!("failed to send {amount} wei to {recipient}"))?;
    events.push(SafeCallEvent::ValueSent { sender, recipient, amount });
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Amounts<'a> {
    Paired(&'a [U256]),
    Uniform(U256),
}

impl Amounts<'_> {
    fn get(&self, index: usize) -> U256 {
        match self {
            Self::Paired(amounts) => amounts[index],
            Self::Uniform(amount) => *amount,
        }
    }

    /// Sums the amounts of the first `len` recipients. An overflowing sum saturates, which no
    /// balance can cover.
    fn total(&self, len: usize) -> U256 {
        match self {
            Self::Paired(amounts) => {
                amounts.iter().fold(U256::ZERO, |total, amount| total.saturating_add(*amount))
            }
            Self::Uniform(amount) => amount.saturating_mul(U256::from(len)),
        }
    }
}
