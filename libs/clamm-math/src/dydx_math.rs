use clamm_types::{MathError, Q96};
use ethnum::U256;

use crate::full_math::{div_rounding_up, mul_div, mul_div_rounding_up, to_u128};

fn sorted(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Amount of token0 held by `liquidity` between two prices.
///
/// Δx = L · 2^96 · (upper - lower) / upper / lower
pub fn get_dx(
    liquidity: u128,
    sqrt_price_a_x96: u128,
    sqrt_price_b_x96: u128,
    round_up: bool,
) -> Result<u128, MathError> {
    let (lower, upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);
    if lower == 0 {
        return Err(MathError::DivisionByZero);
    }

    let numerator = U256::from(liquidity) << 96u32;
    let span = U256::from(upper - lower);
    let amount = if round_up {
        div_rounding_up(
            mul_div_rounding_up(numerator, span, U256::from(upper))?,
            U256::from(lower),
        )?
    } else {
        mul_div(numerator, span, U256::from(upper))? / U256::from(lower)
    };
    to_u128(amount)
}

/// Amount of token1 held by `liquidity` between two prices.
///
/// Δy = L · (upper - lower) / 2^96
pub fn get_dy(
    liquidity: u128,
    sqrt_price_a_x96: u128,
    sqrt_price_b_x96: u128,
    round_up: bool,
) -> Result<u128, MathError> {
    let (lower, upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);
    let (liquidity, span, q96) = (
        U256::from(liquidity),
        U256::from(upper - lower),
        U256::from(Q96),
    );
    let amount = if round_up {
        mul_div_rounding_up(liquidity, span, q96)?
    } else {
        mul_div(liquidity, span, q96)?
    };
    to_u128(amount)
}

/// Price after `amount_in` of token0 is added to the curve (price moves down).
///
/// Rounds up so the pool never hands out more than the input pays for.
pub fn next_price_from_input0(
    sqrt_price_x96: u128,
    liquidity: u128,
    amount_in: u128,
) -> Result<u128, MathError> {
    if amount_in == 0 {
        return Ok(sqrt_price_x96);
    }
    if liquidity == 0 || sqrt_price_x96 == 0 {
        return Err(MathError::DivisionByZero);
    }

    let numerator = U256::from(liquidity) << 96u32;
    let price = U256::from(sqrt_price_x96);

    // L·2^96·P / (L·2^96 + Δx·P)
    let denominator = U256::from(amount_in)
        .checked_mul(price)
        .and_then(|product| product.checked_add(numerator));
    if let Some(denominator) = denominator {
        return to_u128(mul_div_rounding_up(numerator, price, denominator)?);
    }

    // L·2^96 / (L·2^96 / P + Δx)
    let denominator = (numerator / price)
        .checked_add(U256::from(amount_in))
        .ok_or(MathError::Overflow)?;
    to_u128(div_rounding_up(numerator, denominator)?)
}

/// Price after `amount_in` of token1 is added to the curve (price moves up).
///
/// Rounds down, for the same reason.
pub fn next_price_from_input1(
    sqrt_price_x96: u128,
    liquidity: u128,
    amount_in: u128,
) -> Result<u128, MathError> {
    if liquidity == 0 {
        return Err(MathError::DivisionByZero);
    }
    let delta = to_u128(mul_div(
        U256::from(amount_in),
        U256::from(Q96),
        U256::from(liquidity),
    )?)?;
    sqrt_price_x96
        .checked_add(delta)
        .ok_or(MathError::Overflow)
}
