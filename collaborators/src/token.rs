//! Fee token: custody of dispute fees.

use crate::CollaboratorError;
use athena_types::Address;

/// The payment token dispute fees are collected in and paid out of.
pub trait FeeToken: Send {
    /// Pull `amount` from `from` into the engine's custody.
    fn collect(&self, from: &Address, amount: u128) -> Result<(), CollaboratorError>;

    /// Pay `amount` out of the engine's custody to `to`.
    fn pay(&self, to: &Address, amount: u128) -> Result<(), CollaboratorError>;
}
