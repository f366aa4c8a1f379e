use clamm_math::{add_delta, fees_owed};
use clamm_types::{PositionInfo, PositionKey};
use soroban_sdk::{Address, Env};

use crate::error::PoolError;
use crate::storage::{get_position, set_position};

pub fn position_key(owner: &Address, tick_lower: i32, tick_upper: i32) -> PositionKey {
    PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    }
}

/// Fees earned since the last checkpoint, not yet added to `tokens_owed_*`
pub fn unaccrued_fees(
    info: &PositionInfo,
    fee_growth_inside: (u128, u128),
) -> Result<(u128, u128), PoolError> {
    let owed_0 = fees_owed(
        fee_growth_inside
            .0
            .wrapping_sub(info.fee_growth_inside_0_last_x96),
        info.liquidity,
    )?;
    let owed_1 = fees_owed(
        fee_growth_inside
            .1
            .wrapping_sub(info.fee_growth_inside_1_last_x96),
        info.liquidity,
    )?;
    Ok((owed_0, owed_1))
}

/// Accrue fees into the position, then apply a liquidity delta.
///
/// Creates the position on first use. The record stays after its liquidity
/// is gone and simply stops earning.
pub fn update_position(
    env: &Env,
    key: &PositionKey,
    liquidity_delta: i128,
    fee_growth_inside: (u128, u128),
) -> Result<PositionInfo, PoolError> {
    let mut info = get_position(env, key).unwrap_or_default();

    let (owed_0, owed_1) = unaccrued_fees(&info, fee_growth_inside)?;
    info.tokens_owed_0 = info
        .tokens_owed_0
        .checked_add(owed_0)
        .ok_or(PoolError::Overflow)?;
    info.tokens_owed_1 = info
        .tokens_owed_1
        .checked_add(owed_1)
        .ok_or(PoolError::Overflow)?;

    info.liquidity = add_delta(info.liquidity, liquidity_delta)?;
    info.fee_growth_inside_0_last_x96 = fee_growth_inside.0;
    info.fee_growth_inside_1_last_x96 = fee_growth_inside.1;

    set_position(env, key, &info);
    Ok(info)
}

/// Zero the owed balances and return what they held
pub fn take_owed(env: &Env, key: &PositionKey, info: &mut PositionInfo) -> (u128, u128) {
    let owed = (info.tokens_owed_0, info.tokens_owed_1);
    info.tokens_owed_0 = 0;
    info.tokens_owed_1 = 0;
    set_position(env, key, info);
    owed
}
