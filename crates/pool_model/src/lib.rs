//! Pool Model - Pure constant product math (x·y=k) with a 0.3% input fee
//!
//! This crate contains the pricing and proportional-share formulas kept
//! separate from the stateful engine so they stay dependency-light and
//! easy to exercise exhaustively. The engine crate imports these
//! functions directly; no math is duplicated there.

#![no_std]

pub mod math;

pub use math::{mul_div, quote_output};

use uint::construct_uint;

construct_uint! {
    /// 256-bit integer for intermediate products that exceed `u128`.
    pub struct U256(4);
}

/// Fraction of the input retained by the curve: 997/1000 (0.3% fee).
/// Fixed policy constants, deliberately not configurable.
pub const FEE_NUMERATOR: u128 = 997;
pub const FEE_DENOMINATOR: u128 = 1000;

/// Error types for curve computations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// A reserve (or divisor) is zero
    EmptyReserves,
    /// Arithmetic overflow
    Overflow,
}
