//! Pool engine: reserve accounting and swap execution
//!
//! Every mutating operation runs whole-operation-exclusive under the
//! pool's write lock: validate and compute on a staged copy of the
//! state, move assets through the external ledgers, then commit the
//! staged state. A rejected operation therefore never leaves a partial
//! update behind, and quotes under the read lock always observe a
//! single consistent reserve pair.

use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;
use pool_model::{mul_div, quote_output};
use serde::{Deserialize, Serialize};

use crate::{
    error::{LedgerError, PoolError},
    ledger::{NativeLedger, TokenLedger},
    shares::ShareLedger,
    AccountId, AssetId,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PoolState {
    native_reserve: u128,
    token_reserve: u128,
    shares: ShareLedger,
}

/// Plain-data view of a pool for persistence and inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub asset: AssetId,
    pub account: AccountId,
    pub native_reserve: u128,
    pub token_reserve: u128,
    pub shares: ShareLedger,
}

/// Reserve pair plus share ledger for one traded-asset market.
///
/// Reserves are tracked explicitly, never re-derived from ledger
/// balances, so pricing always sees the reserve pair as it stood
/// before the current call's inbound value.
pub struct Pool {
    asset: AssetId,
    /// The pool's own account on both ledgers.
    account: AccountId,
    token: Arc<dyn TokenLedger>,
    native: Arc<dyn NativeLedger>,
    state: RwLock<PoolState>,
}

impl Pool {
    /// Create an empty pool for `asset`, holding funds under `account`.
    pub fn new(
        asset: AssetId,
        account: AccountId,
        token: Arc<dyn TokenLedger>,
        native: Arc<dyn NativeLedger>,
    ) -> Self {
        Self {
            asset,
            account,
            token,
            native,
            state: RwLock::new(PoolState::default()),
        }
    }

    /// Rebuild a pool from a previously taken snapshot.
    pub fn restore(
        snapshot: PoolSnapshot,
        token: Arc<dyn TokenLedger>,
        native: Arc<dyn NativeLedger>,
    ) -> Self {
        Self {
            asset: snapshot.asset,
            account: snapshot.account,
            token,
            native,
            state: RwLock::new(PoolState {
                native_reserve: snapshot.native_reserve,
                token_reserve: snapshot.token_reserve,
                shares: snapshot.shares,
            }),
        }
    }

    pub fn asset(&self) -> AssetId {
        self.asset
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    /// `(native_reserve, token_reserve)` at a single logical instant.
    pub fn reserves(&self) -> (u128, u128) {
        let state = self.state.read();
        (state.native_reserve, state.token_reserve)
    }

    pub fn total_shares(&self) -> u128 {
        self.state.read().shares.total()
    }

    pub fn share_balance_of(&self, owner: AccountId) -> u128 {
        self.state.read().shares.balance_of(owner)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.read();
        PoolSnapshot {
            asset: self.asset,
            account: self.account,
            native_reserve: state.native_reserve,
            token_reserve: state.token_reserve,
            shares: state.shares.clone(),
        }
    }

    /// Quote how many tokens a native-asset input would buy right now.
    /// Agrees exactly with [`Pool::swap_native_for_token`] at unchanged
    /// reserves.
    pub fn quote_native_to_token(&self, native_in: u128) -> Result<u128, PoolError> {
        let state = self.state.read();
        Ok(quote_output(
            native_in,
            state.native_reserve,
            state.token_reserve,
        )?)
    }

    /// Quote how much native asset a token input would buy right now.
    pub fn quote_token_to_native(&self, token_in: u128) -> Result<u128, PoolError> {
        let state = self.state.read();
        Ok(quote_output(
            token_in,
            state.token_reserve,
            state.native_reserve,
        )?)
    }

    /// Add liquidity. Returns the shares minted to `provider`.
    ///
    /// On an empty pool the deposit fixes the starting exchange rate
    /// and the share unit is pegged 1:1 to the native amount. On a
    /// non-empty pool the reserve ratio dictates the required token
    /// amount; only that much is pulled, however much was offered.
    pub fn deposit(
        &self,
        provider: AccountId,
        token_offered: u128,
        native_sent: u128,
    ) -> Result<u128, PoolError> {
        let mut state = self.state.write();

        if state.shares.total() == 0 {
            // A token-only deposit would strand tokens behind zero
            // shares; treat any zero-native deposit as a no-op that
            // pulls nothing.
            if native_sent == 0 {
                return Ok(0);
            }
            let minted = native_sent;
            let mut staged = state.clone();
            staged.native_reserve = native_sent;
            staged.token_reserve = token_offered;
            staged.shares.mint(provider, minted)?;

            self.native.transfer(provider, self.account, native_sent)?;
            if let Err(err) =
                self.token
                    .transfer_from(self.account, provider, self.account, token_offered)
            {
                self.compensate(
                    self.native.transfer(self.account, provider, native_sent),
                    "native deposit",
                );
                return Err(err.into());
            }

            *state = staged;
            debug!(
                "{}: initial deposit by {provider}: native={native_sent} tokens={token_offered} minted={minted}",
                self.asset
            );
            return Ok(minted);
        }

        let required = mul_div(native_sent, state.token_reserve, state.native_reserve)?;
        if token_offered < required {
            return Err(PoolError::InsufficientInputForRatio {
                required,
                offered: token_offered,
            });
        }
        let minted = mul_div(native_sent, state.shares.total(), state.native_reserve)?;

        let mut staged = state.clone();
        staged.native_reserve = staged
            .native_reserve
            .checked_add(native_sent)
            .ok_or(PoolError::ArithmeticOverflow)?;
        staged.token_reserve = staged
            .token_reserve
            .checked_add(required)
            .ok_or(PoolError::ArithmeticOverflow)?;
        staged.shares.mint(provider, minted)?;

        self.native.transfer(provider, self.account, native_sent)?;
        if let Err(err) =
            self.token
                .transfer_from(self.account, provider, self.account, required)
        {
            self.compensate(
                self.native.transfer(self.account, provider, native_sent),
                "native deposit",
            );
            return Err(err.into());
        }

        *state = staged;
        debug!(
            "{}: deposit by {provider}: native={native_sent} tokens={required} minted={minted}",
            self.asset
        );
        Ok(minted)
    }

    /// Redeem `share_amount` shares for the provider's pro-rata slice
    /// of both reserves. Returns `(native_out, token_out)`.
    pub fn withdraw(
        &self,
        provider: AccountId,
        share_amount: u128,
    ) -> Result<(u128, u128), PoolError> {
        let mut state = self.state.write();

        if share_amount == 0 {
            return Ok((0, 0));
        }
        if state.shares.balance_of(provider) < share_amount {
            return Err(PoolError::InsufficientShareBalance);
        }

        // total >= share_amount > 0 here, so both divisions are sound,
        // and burning the full supply makes them exact.
        let total = state.shares.total();
        let native_out = mul_div(state.native_reserve, share_amount, total)?;
        let token_out = mul_div(state.token_reserve, share_amount, total)?;

        let mut staged = state.clone();
        staged.shares.burn(provider, share_amount)?;
        staged.native_reserve -= native_out;
        staged.token_reserve -= token_out;

        self.native.transfer(self.account, provider, native_out)?;
        if let Err(err) = self.token.transfer(self.account, provider, token_out) {
            self.compensate(
                self.native.transfer(provider, self.account, native_out),
                "native withdrawal",
            );
            return Err(err.into());
        }

        *state = staged;
        debug!(
            "{}: withdraw by {provider}: shares={share_amount} native={native_out} tokens={token_out}",
            self.asset
        );
        Ok((native_out, token_out))
    }

    /// Swap native asset for tokens. Rejects when the computed output
    /// falls below `min_token_out`.
    pub fn swap_native_for_token(
        &self,
        trader: AccountId,
        native_in: u128,
        min_token_out: u128,
    ) -> Result<u128, PoolError> {
        let mut state = self.state.write();

        // Reserves here are the pre-call pair: the inbound value is
        // only added after quoting.
        let token_out = quote_output(native_in, state.native_reserve, state.token_reserve)?;
        if token_out < min_token_out {
            return Err(PoolError::InsufficientOutput {
                computed: token_out,
                minimum: min_token_out,
            });
        }

        let mut staged = state.clone();
        staged.native_reserve = staged
            .native_reserve
            .checked_add(native_in)
            .ok_or(PoolError::ArithmeticOverflow)?;
        staged.token_reserve -= token_out;

        self.native.transfer(trader, self.account, native_in)?;
        if let Err(err) = self.token.transfer(self.account, trader, token_out) {
            self.compensate(
                self.native.transfer(self.account, trader, native_in),
                "native swap input",
            );
            return Err(err.into());
        }

        *state = staged;
        debug!(
            "{}: swap by {trader}: native_in={native_in} token_out={token_out}",
            self.asset
        );
        Ok(token_out)
    }

    /// Swap tokens for native asset. Requires prior token allowance
    /// from `trader` to the pool account.
    pub fn swap_token_for_native(
        &self,
        trader: AccountId,
        token_in: u128,
        min_native_out: u128,
    ) -> Result<u128, PoolError> {
        let mut state = self.state.write();

        let native_out = quote_output(token_in, state.token_reserve, state.native_reserve)?;
        if native_out < min_native_out {
            return Err(PoolError::InsufficientOutput {
                computed: native_out,
                minimum: min_native_out,
            });
        }

        let mut staged = state.clone();
        staged.token_reserve = staged
            .token_reserve
            .checked_add(token_in)
            .ok_or(PoolError::ArithmeticOverflow)?;
        staged.native_reserve -= native_out;

        self.token
            .transfer_from(self.account, trader, self.account, token_in)?;
        if let Err(err) = self.native.transfer(self.account, trader, native_out) {
            self.compensate(
                self.token.transfer(self.account, trader, token_in),
                "token swap input",
            );
            return Err(err.into());
        }

        *state = staged;
        debug!(
            "{}: swap by {trader}: token_in={token_in} native_out={native_out}",
            self.asset
        );
        Ok(native_out)
    }

    /// Log a compensating transfer that itself failed. At that point
    /// the external ledger is misbehaving; the pool state was never
    /// committed, so the engine stays consistent.
    fn compensate(&self, result: Result<(), LedgerError>, leg: &str) {
        if let Err(err) = result {
            warn!("{}: compensating {leg} transfer failed: {err}", self.asset);
        }
    }
}
