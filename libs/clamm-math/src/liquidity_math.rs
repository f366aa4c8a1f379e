use clamm_types::{MathError, Q96};
use ethnum::U256;

use crate::dydx_math::{get_dx, get_dy};
use crate::full_math::{mul_div, to_u128};

/// Calculate liquidity from token amounts for a price range
pub fn get_liquidity_for_amounts(
    sqrt_price_x96: u128,
    sqrt_price_lower_x96: u128,
    sqrt_price_upper_x96: u128,
    amount0: u128,
    amount1: u128,
) -> Result<u128, MathError> {
    if sqrt_price_x96 <= sqrt_price_lower_x96 {
        // Current price below range - all token0
        get_liquidity_for_amount0(sqrt_price_lower_x96, sqrt_price_upper_x96, amount0)
    } else if sqrt_price_x96 < sqrt_price_upper_x96 {
        let liquidity0 = get_liquidity_for_amount0(sqrt_price_x96, sqrt_price_upper_x96, amount0)?;
        let liquidity1 = get_liquidity_for_amount1(sqrt_price_lower_x96, sqrt_price_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        // Current price above range - all token1
        get_liquidity_for_amount1(sqrt_price_lower_x96, sqrt_price_upper_x96, amount1)
    }
}

/// L = amount0 * lower * upper / (upper - lower)
fn get_liquidity_for_amount0(
    sqrt_price_lower_x96: u128,
    sqrt_price_upper_x96: u128,
    amount0: u128,
) -> Result<u128, MathError> {
    let span = sqrt_price_upper_x96
        .checked_sub(sqrt_price_lower_x96)
        .ok_or(MathError::PriceOutOfRange)?;
    let intermediate = mul_div(
        U256::from(sqrt_price_lower_x96),
        U256::from(sqrt_price_upper_x96),
        U256::from(Q96),
    )?;
    to_u128(mul_div(U256::from(amount0), intermediate, U256::from(span))?)
}

/// L = amount1 / (upper - lower)
fn get_liquidity_for_amount1(
    sqrt_price_lower_x96: u128,
    sqrt_price_upper_x96: u128,
    amount1: u128,
) -> Result<u128, MathError> {
    let span = sqrt_price_upper_x96
        .checked_sub(sqrt_price_lower_x96)
        .ok_or(MathError::PriceOutOfRange)?;
    to_u128(mul_div(
        U256::from(amount1),
        U256::from(Q96),
        U256::from(span),
    )?)
}

/// Calculate the token amounts backing `liquidity` over a price range.
///
/// Deposits round up and withdrawals round down, both in the pool's favour.
pub fn get_amounts_for_liquidity(
    sqrt_price_x96: u128,
    sqrt_price_lower_x96: u128,
    sqrt_price_upper_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u128, u128), MathError> {
    if sqrt_price_x96 <= sqrt_price_lower_x96 {
        let amount0 = get_dx(liquidity, sqrt_price_lower_x96, sqrt_price_upper_x96, round_up)?;
        Ok((amount0, 0))
    } else if sqrt_price_x96 < sqrt_price_upper_x96 {
        let amount0 = get_dx(liquidity, sqrt_price_x96, sqrt_price_upper_x96, round_up)?;
        let amount1 = get_dy(liquidity, sqrt_price_lower_x96, sqrt_price_x96, round_up)?;
        Ok((amount0, amount1))
    } else {
        let amount1 = get_dy(liquidity, sqrt_price_lower_x96, sqrt_price_upper_x96, round_up)?;
        Ok((0, amount1))
    }
}

/// Add a signed liquidity delta to an unsigned liquidity value
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128, MathError> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(MathError::LiquidityUnderflow)
    } else {
        liquidity
            .checked_add(delta as u128)
            .ok_or(MathError::Overflow)
    }
}
