//! Solidity-facing events and errors of the safe call layer.

#![allow(missing_docs)] // Generated by `sol!`

use alloy_sol_types::sol;

sol! {
    /// Events emitted and errors raised by safe calls and value transfers.
    interface ISafeCall {
        event ValueSent(address indexed sender, address indexed recipient, uint256 amount);
        event BatchValueSent(address indexed sender, uint256 recipientCount, uint256 totalAmount);
        event ContractCalled(address indexed target, uint256 value, bytes data);

        error ZeroAddress();
        error InsufficientBalance(uint256 balance, uint256 needed);
        error LengthMismatch(uint256 recipients, uint256 amounts);
        error BatchSizeExceeded(uint256 size, uint256 max);
        error AddressEmptyCode(address target);
        error HostFailure(string message);
    }
}
