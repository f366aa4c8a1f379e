use clamm_math::{get_amounts_for_liquidity, price_at_tick, tick_at_price};
use clamm_types::{PoolConfig, PoolState};
use soroban_sdk::{Address, Env};

use crate::error::{to_delta, PoolError};
use crate::position::{position_key, take_owed, update_position};
use crate::storage::{get_config, get_position, get_state, set_state};
use crate::ticks::{fee_growth_inside, insert_range, is_active, remove_range};
use crate::{events, vault};

fn globals(state: &PoolState) -> (u128, u128) {
    (state.fee_growth_global_0_x96, state.fee_growth_global_1_x96)
}

fn range_amounts(
    state: &PoolState,
    lower: i32,
    upper: i32,
    amount: u128,
    round_up: bool,
) -> Result<(u128, u128), PoolError> {
    Ok(get_amounts_for_liquidity(
        state.sqrt_price_x96,
        price_at_tick(lower)?,
        price_at_tick(upper)?,
        amount,
        round_up,
    )?)
}

/// Take `amounts` out of the reserves and send them to `to`, returning what
/// `to` received
fn pay_out(
    env: &Env,
    config: &PoolConfig,
    state: &mut PoolState,
    to: &Address,
    amounts: (u128, u128),
    unwrap_vault: bool,
) -> Result<(u128, u128), PoolError> {
    state.reserve0 = state
        .reserve0
        .checked_sub(amounts.0)
        .ok_or(PoolError::InsufficientReserves)?;
    state.reserve1 = state
        .reserve1
        .checked_sub(amounts.1)
        .ok_or(PoolError::InsufficientReserves)?;
    set_state(env, state);

    Ok((
        vault::pay(env, config, &config.token0, to, amounts.0, unwrap_vault),
        vault::pay(env, config, &config.token1, to, amounts.1, unwrap_vault),
    ))
}

/// Add `amount` of liquidity over [lower, upper) for `recipient`.
///
/// The tokens backing it must already sit in the pool's vault account.
pub fn mint(
    env: &Env,
    lower_hint: i32,
    lower: i32,
    upper_hint: i32,
    upper: i32,
    amount: u128,
    recipient: &Address,
) -> Result<u128, PoolError> {
    if amount == 0 {
        return Err(PoolError::ZeroLiquidity);
    }
    let config = get_config(env)?;
    let mut state = get_state(env)?;
    let price_tick = tick_at_price(state.sqrt_price_x96)?;

    state.nearest_tick = insert_range(
        env,
        lower_hint,
        lower,
        upper_hint,
        upper,
        amount,
        globals(&state),
        price_tick,
        state.nearest_tick,
    )?;
    if is_active(lower, upper, state.nearest_tick) {
        state.liquidity = state
            .liquidity
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;
    }

    let inside = fee_growth_inside(env, lower, upper, state.nearest_tick, globals(&state))?;
    let key = position_key(recipient, lower, upper);
    update_position(env, &key, to_delta(amount)?, inside)?;

    let amounts = range_amounts(&state, lower, upper, amount, true)?;
    state.reserve0 = vault::claim_deposit(env, &config, &config.token0, state.reserve0, amounts.0)?;
    state.reserve1 = vault::claim_deposit(env, &config, &config.token1, state.reserve1, amounts.1)?;
    set_state(env, &state);

    events::mint(env, recipient, lower, upper, amount, amounts);
    events::sync(env, state.reserve0, state.reserve1);
    Ok(amount)
}

/// Remove `amount` of liquidity from a position and pay out its tokens plus
/// every fee owed to it.
pub fn burn(
    env: &Env,
    owner: &Address,
    lower: i32,
    upper: i32,
    amount: u128,
    recipient: &Address,
    unwrap_vault: bool,
) -> Result<(u128, u128), PoolError> {
    owner.require_auth();
    if amount == 0 {
        return Err(PoolError::ZeroLiquidity);
    }

    let config = get_config(env)?;
    let mut state = get_state(env)?;
    let key = position_key(owner, lower, upper);
    let existing = get_position(env, &key).ok_or(PoolError::PositionNotFound)?;
    if existing.liquidity < amount {
        return Err(PoolError::InsufficientLiquidity);
    }

    let inside = fee_growth_inside(env, lower, upper, state.nearest_tick, globals(&state))?;
    let mut info = update_position(env, &key, -to_delta(amount)?, inside)?;
    if is_active(lower, upper, state.nearest_tick) {
        state.liquidity = state
            .liquidity
            .checked_sub(amount)
            .ok_or(PoolError::InsufficientLiquidity)?;
    }

    let amounts = range_amounts(&state, lower, upper, amount, false)?;
    let fees = take_owed(env, &key, &mut info);
    let payout = (
        amounts.0.checked_add(fees.0).ok_or(PoolError::Overflow)?,
        amounts.1.checked_add(fees.1).ok_or(PoolError::Overflow)?,
    );

    state.nearest_tick = remove_range(env, lower, upper, amount, state.nearest_tick)?;
    let paid = pay_out(env, &config, &mut state, recipient, payout, unwrap_vault)?;

    events::burn(env, owner, lower, upper, amount, paid, recipient);
    events::sync(env, state.reserve0, state.reserve1);
    Ok(paid)
}

/// Pay out the fees a position has earned so far
pub fn collect(
    env: &Env,
    owner: &Address,
    lower: i32,
    upper: i32,
    recipient: &Address,
    unwrap_vault: bool,
) -> Result<(u128, u128), PoolError> {
    owner.require_auth();

    let config = get_config(env)?;
    let mut state = get_state(env)?;
    let key = position_key(owner, lower, upper);
    let mut info = get_position(env, &key).ok_or(PoolError::PositionNotFound)?;

    // Ticks of a position without liquidity may be gone already
    if info.liquidity > 0 {
        let inside = fee_growth_inside(env, lower, upper, state.nearest_tick, globals(&state))?;
        info = update_position(env, &key, 0, inside)?;
    }
    let owed = take_owed(env, &key, &mut info);
    let paid = pay_out(env, &config, &mut state, recipient, owed, unwrap_vault)?;

    events::collect(env, owner, lower, upper, paid, recipient);
    events::sync(env, state.reserve0, state.reserve1);
    Ok(paid)
}

/// Send the accumulated protocol fees to the configured recipient
pub fn collect_protocol_fee(env: &Env) -> Result<(u128, u128), PoolError> {
    let config = get_config(env)?;
    let mut state = get_state(env)?;

    let fees = (state.protocol_fees_0, state.protocol_fees_1);
    state.protocol_fees_0 = 0;
    state.protocol_fees_1 = 0;
    let paid = pay_out(env, &config, &mut state, &config.fee_recipient, fees, false)?;

    events::protocol_fee(env, paid.0, paid.1);
    events::sync(env, state.reserve0, state.reserve1);
    Ok(paid)
}
