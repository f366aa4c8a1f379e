use clamm_math::{
    fee_growth_delta, get_dx, get_dy, next_price_from_input0, next_price_from_input1,
    price_at_tick, protocol_share, swap_fee_amount,
};
use clamm_types::{MathError, PoolConfig, PoolState, MAX_TICK, MIN_TICK};
use soroban_sdk::{contracttype, log, Address, Env, Vec};

use crate::error::PoolError;
use crate::storage::{get_config, get_state, set_state, MAX_TICK_CROSSINGS_PER_SWAP};
use crate::ticks::{cross_tick, flip_fee_growth, load};
use crate::{events, vault};

/// A tick crossed during a swap, with the fee growth globals at that moment
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TickCrossing {
    pub tick: i32,
    pub fee_growth_global_0_x96: u128,
    pub fee_growth_global_1_x96: u128,
}

/// Outcome of running the swap loop against a snapshot of the pool.
///
/// Nothing is written while computing it; `execute_swap` commits it.
#[derive(Clone, Debug)]
pub struct SwapComputation {
    pub amount_out: u128,
    pub sqrt_price_x96: u128,
    pub liquidity: u128,
    pub nearest_tick: i32,
    /// Fee growth global of the output token after the swap
    pub fee_growth_global_x96: u128,
    /// Protocol share of the fees, in the output token
    pub protocol_fee: u128,
    pub crossings: Vec<TickCrossing>,
}

/// Input needed to reach the next tick, `None` when it exceeds any u128 input
fn step_capacity(amount: Result<u128, MathError>) -> Result<Option<u128>, PoolError> {
    match amount {
        Ok(amount) => Ok(Some(amount)),
        Err(MathError::Overflow) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Walk the curve from the current price, consuming `amount_in`.
///
/// Each step either stays inside the current tick range, or exhausts it,
/// crosses the next linked tick and continues with the liquidity on the
/// other side. Fees are taken from every step's output and credited to the
/// liquidity that was active during that step.
pub fn compute_swap(
    env: &Env,
    config: &PoolConfig,
    state: &PoolState,
    zero_for_one: bool,
    amount_in: u128,
) -> Result<SwapComputation, PoolError> {
    let mut remaining = amount_in;
    let mut amount_out: u128 = 0;
    let mut protocol_fee: u128 = 0;
    let mut sqrt_price_x96 = state.sqrt_price_x96;
    let mut liquidity = state.liquidity;
    let mut nearest_tick = state.nearest_tick;
    let (mut fee_growth_out, fee_growth_in) = if zero_for_one {
        (state.fee_growth_global_1_x96, state.fee_growth_global_0_x96)
    } else {
        (state.fee_growth_global_0_x96, state.fee_growth_global_1_x96)
    };
    let mut crossings: Vec<TickCrossing> = Vec::new(env);

    let mut next_tick = if zero_for_one {
        nearest_tick
    } else {
        load(env, nearest_tick)?.next_tick
    };

    while remaining > 0 {
        let next_price = price_at_tick(next_tick)?;

        let (output, crossed) = if zero_for_one {
            match step_capacity(get_dx(liquidity, next_price, sqrt_price_x96, true))? {
                Some(max_dx) if remaining > max_dx => {
                    let output = get_dy(liquidity, next_price, sqrt_price_x96, false)?;
                    sqrt_price_x96 = next_price;
                    remaining -= max_dx;
                    (output, true)
                }
                _ => {
                    let new_price = next_price_from_input0(sqrt_price_x96, liquidity, remaining)?
                        .clamp(next_price, sqrt_price_x96);
                    let output = get_dy(liquidity, new_price, sqrt_price_x96, false)?;
                    sqrt_price_x96 = new_price;
                    remaining = 0;
                    (output, false)
                }
            }
        } else {
            match step_capacity(get_dy(liquidity, sqrt_price_x96, next_price, true))? {
                Some(max_dy) if remaining > max_dy => {
                    let output = get_dx(liquidity, sqrt_price_x96, next_price, false)?;
                    sqrt_price_x96 = next_price;
                    remaining -= max_dy;
                    (output, true)
                }
                _ => {
                    let new_price = next_price_from_input1(sqrt_price_x96, liquidity, remaining)?
                        .clamp(sqrt_price_x96, next_price);
                    let output = get_dx(liquidity, sqrt_price_x96, new_price, false)?;
                    sqrt_price_x96 = new_price;
                    remaining = 0;
                    (output, false)
                }
            }
        };

        let fee = swap_fee_amount(output, config.swap_fee)?;
        let protocol = protocol_share(fee, config.protocol_fee_bps)?;
        protocol_fee = protocol_fee
            .checked_add(protocol)
            .ok_or(PoolError::Overflow)?;
        fee_growth_out = fee_growth_out.wrapping_add(fee_growth_delta(fee - protocol, liquidity)?);
        amount_out = amount_out
            .checked_add(output - fee)
            .ok_or(PoolError::Overflow)?;

        if !crossed {
            break;
        }

        let boundary = if zero_for_one { MIN_TICK } else { MAX_TICK };
        if next_tick == boundary {
            return Err(PoolError::InsufficientLiquidity);
        }
        if crossings.len() >= MAX_TICK_CROSSINGS_PER_SWAP {
            return Err(PoolError::TooManyTickCrossings);
        }

        let (fee_growth_global_0_x96, fee_growth_global_1_x96) = if zero_for_one {
            (fee_growth_in, fee_growth_out)
        } else {
            (fee_growth_out, fee_growth_in)
        };
        crossings.push_back(TickCrossing {
            tick: next_tick,
            fee_growth_global_0_x96,
            fee_growth_global_1_x96,
        });

        let info = load(env, next_tick)?;
        let (new_liquidity, neighbour) = cross_tick(&info, zero_for_one, liquidity)?;
        log!(env, "tick crossed", next_tick, new_liquidity);
        liquidity = new_liquidity;
        nearest_tick = if zero_for_one { neighbour } else { next_tick };
        next_tick = neighbour;
    }

    Ok(SwapComputation {
        amount_out,
        sqrt_price_x96,
        liquidity,
        nearest_tick,
        fee_growth_global_x96: fee_growth_out,
        protocol_fee,
        crossings,
    })
}

/// Output a swap of `amount_in` would produce right now
pub fn quote(env: &Env, zero_for_one: bool, amount_in: u128) -> Result<u128, PoolError> {
    if amount_in == 0 {
        return Ok(0);
    }
    let config = get_config(env)?;
    let state = get_state(env)?;
    Ok(compute_swap(env, &config, &state, zero_for_one, amount_in)?.amount_out)
}

/// Execute a swap of `amount_in`, already deposited to the pool's vault account
pub fn execute_swap(
    env: &Env,
    zero_for_one: bool,
    amount_in: u128,
    recipient: &Address,
    unwrap_vault: bool,
) -> Result<u128, PoolError> {
    if amount_in == 0 {
        return Ok(0);
    }

    let config = get_config(env)?;
    let mut state = get_state(env)?;
    let result = compute_swap(env, &config, &state, zero_for_one, amount_in)?;

    for crossing in result.crossings.iter() {
        flip_fee_growth(
            env,
            crossing.tick,
            (
                crossing.fee_growth_global_0_x96,
                crossing.fee_growth_global_1_x96,
            ),
        )?;
    }

    state.sqrt_price_x96 = result.sqrt_price_x96;
    state.liquidity = result.liquidity;
    state.nearest_tick = result.nearest_tick;

    let token_out = if zero_for_one {
        state.fee_growth_global_1_x96 = result.fee_growth_global_x96;
        state.protocol_fees_1 = state
            .protocol_fees_1
            .checked_add(result.protocol_fee)
            .ok_or(PoolError::Overflow)?;
        state.reserve0 = vault::claim_deposit(env, &config, &config.token0, state.reserve0, amount_in)?;
        state.reserve1 = state
            .reserve1
            .checked_sub(result.amount_out)
            .ok_or(PoolError::InsufficientReserves)?;
        &config.token1
    } else {
        state.fee_growth_global_0_x96 = result.fee_growth_global_x96;
        state.protocol_fees_0 = state
            .protocol_fees_0
            .checked_add(result.protocol_fee)
            .ok_or(PoolError::Overflow)?;
        state.reserve1 = vault::claim_deposit(env, &config, &config.token1, state.reserve1, amount_in)?;
        state.reserve0 = state
            .reserve0
            .checked_sub(result.amount_out)
            .ok_or(PoolError::InsufficientReserves)?;
        &config.token0
    };

    set_state(env, &state);
    let paid = vault::pay(
        env,
        &config,
        token_out,
        recipient,
        result.amount_out,
        unwrap_vault,
    );

    events::swap(env, recipient, zero_for_one, amount_in, paid);
    events::sync(env, state.reserve0, state.reserve1);
    Ok(paid)
}
