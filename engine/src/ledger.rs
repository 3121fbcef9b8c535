//! Boundary contracts for the asset ledgers backing a pool
//!
//! The engine never reimplements token accounting. It moves value
//! through these traits and treats any reported failure as grounds to
//! abort the whole operation. The in-memory implementations provide
//! standard balance/allowance semantics for tests and the sandbox CLI.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{error::LedgerError, AccountId};

/// Fungible ledger for the traded asset.
pub trait TokenLedger: Send + Sync {
    /// Move `amount` from `from` to `to`. The engine calls this with
    /// the pool's own account as `from` when paying out.
    fn transfer(&self, from: AccountId, to: AccountId, amount: u128) -> Result<(), LedgerError>;

    /// Move `amount` from `owner` to `to`, consuming `spender`'s
    /// allowance. Requires prior authorization of at least `amount`.
    fn transfer_from(
        &self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), LedgerError>;

    /// Authorize `spender` to move up to `amount` of `owner`'s balance.
    fn approve(&self, owner: AccountId, spender: AccountId, amount: u128);

    fn balance_of(&self, account: AccountId) -> u128;

    fn allowance(&self, owner: AccountId, spender: AccountId) -> u128;
}

/// Ledger for the native asset. No allowance table: the native asset
/// moves only by direct transfer.
pub trait NativeLedger: Send + Sync {
    fn transfer(&self, from: AccountId, to: AccountId, amount: u128) -> Result<(), LedgerError>;

    fn balance_of(&self, account: AccountId) -> u128;
}

/// Plain-data state of an [`InMemoryToken`], snapshot for persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub balances: BTreeMap<AccountId, u128>,
    /// owner -> spender -> remaining authorization
    pub allowances: BTreeMap<AccountId, BTreeMap<AccountId, u128>>,
}

/// Reference token ledger holding balances and allowances in memory.
#[derive(Debug, Default)]
pub struct InMemoryToken {
    inner: RwLock<TokenState>,
}

impl InMemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: TokenState) -> Self {
        Self {
            inner: RwLock::new(state),
        }
    }

    /// Credit `amount` to `to` out of thin air. Seeding only; saturates
    /// rather than erroring since callers control the totals.
    pub fn mint(&self, to: AccountId, amount: u128) {
        let mut state = self.inner.write();
        let balance = state.balances.entry(to).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    pub fn snapshot(&self) -> TokenState {
        self.inner.read().clone()
    }
}

fn move_balance(
    balances: &mut BTreeMap<AccountId, u128>,
    from: AccountId,
    to: AccountId,
    amount: u128,
) -> Result<(), LedgerError> {
    if amount == 0 {
        return Ok(());
    }
    let from_balance = balances.get(&from).copied().unwrap_or(0);
    if from_balance < amount {
        return Err(LedgerError::InsufficientBalance);
    }
    let to_balance = balances.get(&to).copied().unwrap_or(0);
    let new_to = if from == to {
        to_balance
    } else {
        to_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?
    };
    balances.insert(from, from_balance - amount);
    balances.insert(to, new_to);
    Ok(())
}

impl TokenLedger for InMemoryToken {
    fn transfer(&self, from: AccountId, to: AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut state = self.inner.write();
        move_balance(&mut state.balances, from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut state = self.inner.write();
        let allowed = state
            .allowances
            .get(&owner)
            .and_then(|per_spender| per_spender.get(&spender))
            .copied()
            .unwrap_or(0);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance);
        }
        move_balance(&mut state.balances, owner, to, amount)?;
        // Only burn the allowance once the balance move has succeeded.
        state
            .allowances
            .entry(owner)
            .or_default()
            .insert(spender, allowed - amount);
        Ok(())
    }

    fn approve(&self, owner: AccountId, spender: AccountId, amount: u128) {
        let mut state = self.inner.write();
        state
            .allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
    }

    fn balance_of(&self, account: AccountId) -> u128 {
        self.inner.read().balances.get(&account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: AccountId, spender: AccountId) -> u128 {
        self.inner
            .read()
            .allowances
            .get(&owner)
            .and_then(|per_spender| per_spender.get(&spender))
            .copied()
            .unwrap_or(0)
    }
}

/// Plain-data state of an [`InMemoryNative`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeState {
    pub balances: BTreeMap<AccountId, u128>,
}

/// Reference native-asset ledger.
#[derive(Debug, Default)]
pub struct InMemoryNative {
    inner: RwLock<NativeState>,
}

impl InMemoryNative {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: NativeState) -> Self {
        Self {
            inner: RwLock::new(state),
        }
    }

    /// Seeding only; see [`InMemoryToken::mint`].
    pub fn mint(&self, to: AccountId, amount: u128) {
        let mut state = self.inner.write();
        let balance = state.balances.entry(to).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    pub fn snapshot(&self) -> NativeState {
        self.inner.read().clone()
    }
}

impl NativeLedger for InMemoryNative {
    fn transfer(&self, from: AccountId, to: AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut state = self.inner.write();
        move_balance(&mut state.balances, from, to, amount)
    }

    fn balance_of(&self, account: AccountId) -> u128 {
        self.inner.read().balances.get(&account).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: AccountId = AccountId(1);
    const BOB: AccountId = AccountId(2);
    const POOL: AccountId = AccountId(9);

    #[test]
    fn transfer_moves_balance() {
        let token = InMemoryToken::new();
        token.mint(ALICE, 100);
        token.transfer(ALICE, BOB, 40).unwrap();
        assert_eq!(token.balance_of(ALICE), 60);
        assert_eq!(token.balance_of(BOB), 40);
    }

    #[test]
    fn transfer_rejects_insufficient_balance() {
        let token = InMemoryToken::new();
        token.mint(ALICE, 10);
        assert_eq!(
            token.transfer(ALICE, BOB, 11),
            Err(LedgerError::InsufficientBalance)
        );
        assert_eq!(token.balance_of(ALICE), 10);
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let token = InMemoryToken::new();
        token.mint(ALICE, 100);
        token.approve(ALICE, POOL, 70);
        token.transfer_from(POOL, ALICE, POOL, 50).unwrap();
        assert_eq!(token.balance_of(POOL), 50);
        assert_eq!(token.allowance(ALICE, POOL), 20);
    }

    #[test]
    fn transfer_from_rejects_unauthorized() {
        let token = InMemoryToken::new();
        token.mint(ALICE, 100);
        assert_eq!(
            token.transfer_from(POOL, ALICE, POOL, 1),
            Err(LedgerError::InsufficientAllowance)
        );
    }

    #[test]
    fn failed_transfer_from_keeps_allowance() {
        let token = InMemoryToken::new();
        token.approve(ALICE, POOL, 50);
        assert_eq!(
            token.transfer_from(POOL, ALICE, POOL, 50),
            Err(LedgerError::InsufficientBalance)
        );
        assert_eq!(token.allowance(ALICE, POOL), 50);
    }

    #[test]
    fn self_transfer_is_identity() {
        let native = InMemoryNative::new();
        native.mint(ALICE, 5);
        native.transfer(ALICE, ALICE, 5).unwrap();
        assert_eq!(native.balance_of(ALICE), 5);
    }

    #[test]
    fn snapshot_round_trip() {
        let token = InMemoryToken::new();
        token.mint(ALICE, 100);
        token.approve(ALICE, POOL, 30);
        let restored = InMemoryToken::with_state(token.snapshot());
        assert_eq!(restored.balance_of(ALICE), 100);
        assert_eq!(restored.allowance(ALICE, POOL), 30);
    }
}
