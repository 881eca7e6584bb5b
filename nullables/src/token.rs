//! Nullable fee token: in-memory balances plus the engine's custody.

use athena_collaborators::{CollaboratorError, FeeToken};
use athena_types::Address;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct TokenState {
    balances: HashMap<Address, u128>,
    custody: u128,
    fail_pay: bool,
}

#[derive(Clone, Default)]
pub struct NullFeeToken {
    state: Arc<Mutex<TokenState>>,
}

impl NullFeeToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&self, to: &Address, amount: u128) {
        *self.state.lock().unwrap().balances.entry(to.clone()).or_insert(0) += amount;
    }

    pub fn balance(&self, who: &Address) -> u128 {
        self.state.lock().unwrap().balances.get(who).copied().unwrap_or(0)
    }

    /// Tokens currently held on the engine's behalf.
    pub fn custody(&self) -> u128 {
        self.state.lock().unwrap().custody
    }

    /// Credit the engine's custody directly, as a treasury top-up would.
    pub fn fund_custody(&self, amount: u128) {
        self.state.lock().unwrap().custody += amount;
    }

    /// Make every payout fail.
    pub fn fail_payments(&self, fail: bool) {
        self.state.lock().unwrap().fail_pay = fail;
    }
}

impl FeeToken for NullFeeToken {
    fn collect(&self, from: &Address, amount: u128) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock().unwrap();
        let available = state.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(CollaboratorError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        state.balances.insert(from.clone(), available - amount);
        state.custody += amount;
        Ok(())
    }

    fn pay(&self, to: &Address, amount: u128) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_pay {
            return Err(CollaboratorError::Unavailable("fee token".into()));
        }
        if state.custody < amount {
            return Err(CollaboratorError::InsufficientFunds {
                needed: amount,
                available: state.custody,
            });
        }
        state.custody -= amount;
        *state.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_then_pay_moves_through_custody() {
        let token = NullFeeToken::new();
        let alice = Address::new("0xa1");
        let bob = Address::new("0xb0");
        token.mint(&alice, 100);

        token.collect(&alice, 60).unwrap();
        assert_eq!(token.custody(), 60);
        token.pay(&bob, 25).unwrap();

        assert_eq!(token.balance(&alice), 40);
        assert_eq!(token.balance(&bob), 25);
        assert_eq!(token.custody(), 35);
    }

    #[test]
    fn funded_custody_covers_payouts_beyond_collections() {
        let token = NullFeeToken::new();
        let bob = Address::new("0xb0");
        assert!(token.pay(&bob, 10).is_err());

        token.fund_custody(10);
        token.pay(&bob, 10).unwrap();
        assert_eq!(token.balance(&bob), 10);
        assert_eq!(token.custody(), 0);
    }

    #[test]
    fn collect_fails_without_balance() {
        let token = NullFeeToken::new();
        let err = token.collect(&Address::new("0xa1"), 1).unwrap_err();
        assert!(matches!(err, CollaboratorError::InsufficientFunds { needed: 1, available: 0 }));
    }
}
