use clamm_math::add_delta;
use clamm_types::{TickInfo, MAX_TICK, MIN_TICK};
use soroban_sdk::{log, Env};

use crate::error::{to_delta, PoolError};
use crate::storage::{get_tick, remove_tick, set_tick};

/// Which end of a position a tick bounds
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Boundary {
    Lower,
    Upper,
}

impl Boundary {
    /// Signed change to `liquidity_net` when `amount` is added at this boundary
    fn net_delta(self, amount: u128) -> Result<i128, PoolError> {
        let amount = to_delta(amount)?;
        Ok(match self {
            Boundary::Lower => amount,
            Boundary::Upper => -amount,
        })
    }
}

fn is_sentinel(tick: i32) -> bool {
    tick == MIN_TICK || tick == MAX_TICK
}

/// Load a tick that must be linked
pub fn load(env: &Env, tick: i32) -> Result<TickInfo, PoolError> {
    get_tick(env, tick).ok_or(PoolError::TickNotLinked)
}

/// Link MIN_TICK and MAX_TICK to each other
pub fn initialize_sentinels(env: &Env) {
    set_tick(env, MIN_TICK, &TickInfo::new(MIN_TICK, MAX_TICK));
    set_tick(env, MAX_TICK, &TickInfo::new(MIN_TICK, MAX_TICK));
}

/// Add `amount` of liquidity at `tick`, linking it after `hint` if needed.
///
/// Returns true when the tick was newly linked. A new tick starts with the
/// current fee growth as its outside value when it lies at or below the
/// price, and zero otherwise.
pub fn upsert_tick(
    env: &Env,
    hint: i32,
    tick: i32,
    boundary: Boundary,
    amount: u128,
    fee_growth_global: (u128, u128),
    price_tick: i32,
) -> Result<bool, PoolError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(PoolError::TickOutOfRange);
    }
    let net_delta = boundary.net_delta(amount)?;

    if let Some(mut info) = get_tick(env, tick) {
        info.liquidity_gross = info
            .liquidity_gross
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;
        info.liquidity_net = info
            .liquidity_net
            .checked_add(net_delta)
            .ok_or(PoolError::Overflow)?;
        set_tick(env, tick, &info);
        return Ok(false);
    }

    let mut previous = get_tick(env, hint).ok_or(PoolError::InvalidTickOrder)?;
    if !(hint < tick && tick < previous.next_tick) {
        return Err(PoolError::InvalidTickOrder);
    }
    let next_tick = previous.next_tick;
    let mut next = load(env, next_tick)?;

    let mut info = TickInfo::new(hint, next_tick);
    info.liquidity_gross = amount;
    info.liquidity_net = net_delta;
    if tick <= price_tick {
        info.fee_growth_outside_0_x96 = fee_growth_global.0;
        info.fee_growth_outside_1_x96 = fee_growth_global.1;
    }

    previous.next_tick = tick;
    next.previous_tick = tick;
    set_tick(env, hint, &previous);
    set_tick(env, next_tick, &next);
    set_tick(env, tick, &info);

    log!(env, "tick linked", tick, hint, next_tick);
    Ok(true)
}

/// Add a position's liquidity at both of its boundaries.
///
/// Returns the nearest tick after insertion: the highest newly linked
/// boundary at or below the price, if it is above the old nearest tick.
#[allow(clippy::too_many_arguments)]
pub fn insert_range(
    env: &Env,
    lower_hint: i32,
    lower: i32,
    upper_hint: i32,
    upper: i32,
    amount: u128,
    fee_growth_global: (u128, u128),
    price_tick: i32,
    nearest_tick: i32,
) -> Result<i32, PoolError> {
    if lower >= upper {
        return Err(PoolError::InvalidTickOrder);
    }
    if lower < MIN_TICK || upper > MAX_TICK {
        return Err(PoolError::TickOutOfRange);
    }

    let lower_linked = upsert_tick(
        env,
        lower_hint,
        lower,
        Boundary::Lower,
        amount,
        fee_growth_global,
        price_tick,
    )?;
    let upper_linked = upsert_tick(
        env,
        upper_hint,
        upper,
        Boundary::Upper,
        amount,
        fee_growth_global,
        price_tick,
    )?;

    let mut nearest = nearest_tick;
    for (linked, tick) in [(lower_linked, lower), (upper_linked, upper)] {
        if linked && tick <= price_tick && tick > nearest {
            nearest = tick;
        }
    }
    Ok(nearest)
}

/// Take `amount` of liquidity off one boundary, unlinking it once unused
fn release_tick(
    env: &Env,
    tick: i32,
    boundary: Boundary,
    amount: u128,
    nearest_tick: i32,
) -> Result<i32, PoolError> {
    let mut info = load(env, tick)?;
    info.liquidity_gross = info
        .liquidity_gross
        .checked_sub(amount)
        .ok_or(PoolError::InsufficientLiquidity)?;
    info.liquidity_net = info
        .liquidity_net
        .checked_sub(boundary.net_delta(amount)?)
        .ok_or(PoolError::Overflow)?;

    if info.liquidity_gross > 0 || is_sentinel(tick) {
        set_tick(env, tick, &info);
        return Ok(nearest_tick);
    }

    let mut previous = load(env, info.previous_tick)?;
    let mut next = load(env, info.next_tick)?;
    previous.next_tick = info.next_tick;
    next.previous_tick = info.previous_tick;
    set_tick(env, info.previous_tick, &previous);
    set_tick(env, info.next_tick, &next);
    remove_tick(env, tick);

    log!(env, "tick unlinked", tick);
    if nearest_tick == tick {
        Ok(info.previous_tick)
    } else {
        Ok(nearest_tick)
    }
}

/// Remove a position's liquidity from both boundaries and return the new nearest tick
pub fn remove_range(
    env: &Env,
    lower: i32,
    upper: i32,
    amount: u128,
    nearest_tick: i32,
) -> Result<i32, PoolError> {
    let nearest = release_tick(env, lower, Boundary::Lower, amount, nearest_tick)?;
    release_tick(env, upper, Boundary::Upper, amount, nearest)
}

/// Active liquidity after the price crosses the tick described by `info`.
///
/// Returns (new_liquidity, neighbour), the neighbour being the next tick to
/// cross in the same direction. Storage is not touched; the fee growth flip
/// happens in [`flip_fee_growth`] once the swap commits.
pub fn cross_tick(
    info: &TickInfo,
    zero_for_one: bool,
    liquidity: u128,
) -> Result<(u128, i32), PoolError> {
    if zero_for_one {
        let delta = info
            .liquidity_net
            .checked_neg()
            .ok_or(PoolError::Overflow)?;
        Ok((add_delta(liquidity, delta)?, info.previous_tick))
    } else {
        Ok((add_delta(liquidity, info.liquidity_net)?, info.next_tick))
    }
}

/// outside <- global - outside, for a tick the price just crossed
pub fn flip_fee_growth(
    env: &Env,
    tick: i32,
    fee_growth_global: (u128, u128),
) -> Result<(), PoolError> {
    let mut info = load(env, tick)?;
    info.fee_growth_outside_0_x96 = fee_growth_global
        .0
        .wrapping_sub(info.fee_growth_outside_0_x96);
    info.fee_growth_outside_1_x96 = fee_growth_global
        .1
        .wrapping_sub(info.fee_growth_outside_1_x96);
    set_tick(env, tick, &info);
    Ok(())
}

/// Fee growth per unit of liquidity accumulated inside [lower, upper)
pub fn fee_growth_inside(
    env: &Env,
    lower: i32,
    upper: i32,
    nearest_tick: i32,
    fee_growth_global: (u128, u128),
) -> Result<(u128, u128), PoolError> {
    let lower_info = load(env, lower)?;
    let upper_info = load(env, upper)?;
    let (global_0, global_1) = fee_growth_global;

    let (below_0, below_1) = if lower <= nearest_tick {
        (
            lower_info.fee_growth_outside_0_x96,
            lower_info.fee_growth_outside_1_x96,
        )
    } else {
        (
            global_0.wrapping_sub(lower_info.fee_growth_outside_0_x96),
            global_1.wrapping_sub(lower_info.fee_growth_outside_1_x96),
        )
    };

    let (above_0, above_1) = if nearest_tick < upper {
        (
            upper_info.fee_growth_outside_0_x96,
            upper_info.fee_growth_outside_1_x96,
        )
    } else {
        (
            global_0.wrapping_sub(upper_info.fee_growth_outside_0_x96),
            global_1.wrapping_sub(upper_info.fee_growth_outside_1_x96),
        )
    };

    Ok((
        global_0.wrapping_sub(below_0).wrapping_sub(above_0),
        global_1.wrapping_sub(below_1).wrapping_sub(above_1),
    ))
}

/// A range earns fees exactly when the nearest tick lies inside it
pub fn is_active(lower: i32, upper: i32, nearest_tick: i32) -> bool {
    lower <= nearest_tick && nearest_tick < upper
}
