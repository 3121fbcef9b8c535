//! Tidepool Engine - single-pool constant-product AMM accounting
//!
//! A pool tracks two reserves (native asset and one traded token) plus
//! a proportional-ownership share ledger. Liquidity providers deposit
//! both assets and mint shares; traders swap one asset for the other
//! along the fee-adjusted constant-product curve from [`pool_model`].
//!
//! The engine owns no token accounting of its own: assets move through
//! the [`ledger::TokenLedger`] and [`ledger::NativeLedger`] boundary
//! traits, and any transfer failure aborts the whole operation with no
//! surviving state change.

pub mod error;
pub mod ledger;
pub mod pool;
pub mod registry;
pub mod shares;

pub use error::{LedgerError, PoolError};
pub use pool_model::{mul_div, quote_output, FEE_DENOMINATOR, FEE_NUMERATOR};
pub use ledger::{
    InMemoryNative, InMemoryToken, NativeLedger, NativeState, TokenLedger, TokenState,
};
pub use pool::{Pool, PoolSnapshot};
pub use registry::Registry;
pub use shares::ShareLedger;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a balance holder: providers, traders, and pools alike.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct:{}", self.0)
    }
}

/// Identifier of a traded asset; the registry keeps one pool per asset.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct AssetId(pub u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset:{}", self.0)
    }
}
