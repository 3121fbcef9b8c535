//! Error taxonomy for pool operations
//!
//! Every variant is a rejected operation with no partial state change;
//! none of them leave the pool unusable.

use pool_model::CurveError;
use thiserror::Error;

/// Failure reported by an external ledger collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("insufficient allowance")]
    InsufficientAllowance,
    #[error("balance overflow")]
    Overflow,
}

/// A rejected pool operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Deposit offered fewer tokens than the current reserve ratio requires.
    #[error("insufficient token amount: required {required}, offered {offered}")]
    InsufficientInputForRatio { required: u128, offered: u128 },

    /// Swap output fell below the caller's minimum (slippage protection).
    #[error("insufficient output amount: computed {computed}, minimum {minimum}")]
    InsufficientOutput { computed: u128, minimum: u128 },

    /// Withdrawal requested more shares than the provider owns.
    #[error("insufficient share balance")]
    InsufficientShareBalance,

    /// Pricing or swap attempted against a pool with zero reserves.
    #[error("pool has no liquidity")]
    EmptyPool,

    /// An intermediate computation would exceed the representable range.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// An external ledger transfer failed; the operation was aborted
    /// and any already-applied leg compensated.
    #[error("external transfer failed: {0}")]
    ExternalTransferFailed(#[from] LedgerError),

    /// Registry already holds a pool for this asset.
    #[error("pool already exists for asset")]
    PoolExists,

    /// Registry holds no pool for this asset.
    #[error("no pool registered for asset")]
    UnknownPool,
}

impl From<CurveError> for PoolError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::EmptyReserves => PoolError::EmptyPool,
            CurveError::Overflow => PoolError::ArithmeticOverflow,
        }
    }
}
