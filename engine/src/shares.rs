//! Proportional-ownership share ledger
//!
//! Mint/burn accounting tied to pool state. This is plain data: the
//! owning pool's lock provides the exclusivity discipline, so the
//! ledger itself carries no interior locking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{error::PoolError, AccountId};

/// Mapping from provider identity to share balance, plus the total
/// supply. `total() == 0` exactly when the owning pool is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLedger {
    balances: BTreeMap<AccountId, u128>,
    total: u128,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u128 {
        self.total
    }

    pub fn balance_of(&self, owner: AccountId) -> u128 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    /// Iterate holders with non-zero balances.
    pub fn holders(&self) -> impl Iterator<Item = (AccountId, u128)> + '_ {
        self.balances.iter().map(|(owner, amount)| (*owner, *amount))
    }

    /// Credit `amount` shares to `owner`.
    pub fn mint(&mut self, owner: AccountId, amount: u128) -> Result<(), PoolError> {
        // Compute both updates before applying either.
        let new_balance = self
            .balance_of(owner)
            .checked_add(amount)
            .ok_or(PoolError::ArithmeticOverflow)?;
        let new_total = self
            .total
            .checked_add(amount)
            .ok_or(PoolError::ArithmeticOverflow)?;
        if amount > 0 {
            self.balances.insert(owner, new_balance);
        }
        self.total = new_total;
        Ok(())
    }

    /// Debit `amount` shares from `owner`.
    pub fn burn(&mut self, owner: AccountId, amount: u128) -> Result<(), PoolError> {
        let balance = self.balance_of(owner);
        if balance < amount {
            return Err(PoolError::InsufficientShareBalance);
        }
        // total >= balance >= amount, so the supply cannot underflow.
        if balance == amount {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, balance - amount);
        }
        self.total -= amount;
        Ok(())
    }
}
