//! Fee-adjusted constant product curve

use crate::{CurveError, FEE_DENOMINATOR, FEE_NUMERATOR, U256};

/// Quote the output amount for swapping `input_amount` against a pool
/// holding `input_reserve` / `output_reserve`.
///
/// The fee is deducted from the input before the constant-product
/// division:
///
/// `out = floor(in·997·out_r / (in_r·1000 + in·997))`
///
/// so the reserve product never decreases across a swap. All
/// intermediates are computed in 256 bits; anything unrepresentable is
/// rejected with `CurveError::Overflow`, never wrapped.
///
/// # Errors
/// * `CurveError::EmptyReserves` if either reserve is zero
/// * `CurveError::Overflow` on unrepresentable intermediates
pub fn quote_output(
    input_amount: u128,
    input_reserve: u128,
    output_reserve: u128,
) -> Result<u128, CurveError> {
    if input_reserve == 0 || output_reserve == 0 {
        return Err(CurveError::EmptyReserves);
    }
    if input_amount == 0 {
        return Ok(0);
    }

    let input_with_fee = U256::from(input_amount)
        .checked_mul(U256::from(FEE_NUMERATOR))
        .ok_or(CurveError::Overflow)?;
    let numerator = input_with_fee
        .checked_mul(U256::from(output_reserve))
        .ok_or(CurveError::Overflow)?;
    let denominator = U256::from(input_reserve)
        .checked_mul(U256::from(FEE_DENOMINATOR))
        .ok_or(CurveError::Overflow)?
        .checked_add(input_with_fee)
        .ok_or(CurveError::Overflow)?;

    // out < output_reserve always holds on the curve, so the quotient
    // fits in u128 whenever the inputs do. Guard anyway.
    let out = numerator / denominator;
    if out > U256::from(u128::MAX) {
        return Err(CurveError::Overflow);
    }
    Ok(out.as_u128())
}

/// `floor(a·b / denom)` with a 256-bit intermediate product.
///
/// Used for the proportional-share math (deposit ratio, share mint,
/// pro-rata withdrawal). Truncating division throughout: rounding
/// always favors the pool.
///
/// # Errors
/// * `CurveError::EmptyReserves` if `denom` is zero
/// * `CurveError::Overflow` if the quotient exceeds `u128`
pub fn mul_div(a: u128, b: u128, denom: u128) -> Result<u128, CurveError> {
    if denom == 0 {
        return Err(CurveError::EmptyReserves);
    }
    // The product of two u128 values always fits in 256 bits.
    let product = U256::from(a) * U256::from(b);
    let quotient = product / U256::from(denom);
    if quotient > U256::from(u128::MAX) {
        return Err(CurveError::Overflow);
    }
    Ok(quotient.as_u128())
}
