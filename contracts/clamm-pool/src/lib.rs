#![no_std]

mod error;
mod events;
mod guard;
mod liquidity;
mod position;
mod storage;
mod swap;
mod ticks;
mod vault;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod testutils;

pub use error::PoolError;
pub use swap::TickCrossing;

use clamm_types::{
    is_valid_fee, PoolConfig, PoolParams, PoolState, PositionInfo, TickInfo, MAX_SQRT_RATIO,
    MIN_SQRT_RATIO,
};
use soroban_sdk::{contract, contractimpl, Address, Env};
use storage::{
    extend_instance_ttl, get_config, get_position as load_position, get_state, get_tick as load_tick,
    is_initialized, set_config, set_state,
};

#[contract]
pub struct ClammPool;

#[contractimpl]
impl ClammPool {
    /// Initialize a new pool at `params.sqrt_price_x96`.
    ///
    /// Called once by the factory that deployed it.
    pub fn initialize(env: Env, params: PoolParams) -> Result<(), PoolError> {
        if is_initialized(&env) {
            return Err(PoolError::AlreadyInitialized);
        }
        params.factory.require_auth();

        if params.token0 >= params.token1 {
            return Err(PoolError::InvalidTokenOrder);
        }
        if !is_valid_fee(params.swap_fee, params.protocol_fee_bps) {
            return Err(PoolError::InvalidFee);
        }
        if !(MIN_SQRT_RATIO..MAX_SQRT_RATIO).contains(&params.sqrt_price_x96) {
            return Err(PoolError::PriceOutOfRange);
        }

        let config = PoolConfig {
            factory: params.factory,
            vault: params.vault,
            token0: params.token0,
            token1: params.token1,
            swap_fee: params.swap_fee,
            protocol_fee_bps: params.protocol_fee_bps,
            fee_recipient: params.fee_recipient,
        };
        set_config(&env, &config);
        set_state(&env, &PoolState::new(params.sqrt_price_x96));
        ticks::initialize_sentinels(&env);
        extend_instance_ttl(&env);
        Ok(())
    }

    /// Add liquidity over [tick_lower, tick_upper) for `recipient`
    ///
    /// # Arguments
    /// * `lower_hint` - A linked tick at or below `tick_lower`, used when it is new
    /// * `upper_hint` - A linked tick at or below `tick_upper`, used when it is new
    /// * `amount` - Liquidity to add; the matching tokens must already be
    ///   deposited to the pool's vault account
    pub fn mint(
        env: Env,
        lower_hint: i32,
        tick_lower: i32,
        upper_hint: i32,
        tick_upper: i32,
        amount: u128,
        recipient: Address,
    ) -> Result<u128, PoolError> {
        guard::with_lock(&env, || {
            liquidity::mint(
                &env,
                lower_hint,
                tick_lower,
                upper_hint,
                tick_upper,
                amount,
                &recipient,
            )
        })
    }

    /// Execute an exact-input swap
    ///
    /// # Arguments
    /// * `zero_for_one` - True if swapping token0 for token1
    /// * `amount_in` - Input amount, already deposited to the pool's vault account
    /// * `recipient` - Address to receive the output
    /// * `unwrap_vault` - Pay out tokens instead of vault shares
    ///
    /// # Returns
    /// The output amount, net of the swap fee
    pub fn swap(
        env: Env,
        zero_for_one: bool,
        amount_in: u128,
        recipient: Address,
        unwrap_vault: bool,
    ) -> Result<u128, PoolError> {
        guard::with_lock(&env, || {
            swap::execute_swap(&env, zero_for_one, amount_in, &recipient, unwrap_vault)
        })
    }

    /// Remove liquidity from the caller's position, paying out tokens and owed fees
    pub fn burn(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
        recipient: Address,
        unwrap_vault: bool,
    ) -> Result<(u128, u128), PoolError> {
        guard::with_lock(&env, || {
            liquidity::burn(
                &env,
                &owner,
                tick_lower,
                tick_upper,
                amount,
                &recipient,
                unwrap_vault,
            )
        })
    }

    /// Collect the fees earned by a position
    pub fn collect(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        recipient: Address,
        unwrap_vault: bool,
    ) -> Result<(u128, u128), PoolError> {
        guard::with_lock(&env, || {
            liquidity::collect(
                &env,
                &owner,
                tick_lower,
                tick_upper,
                &recipient,
                unwrap_vault,
            )
        })
    }

    /// Send accumulated protocol fees to the fee recipient
    pub fn collect_protocol_fee(env: Env) -> Result<(u128, u128), PoolError> {
        guard::with_lock(&env, || liquidity::collect_protocol_fee(&env))
    }

    /// Output of a swap right now, without executing it
    pub fn quote_amount_out(
        env: Env,
        zero_for_one: bool,
        amount_in: u128,
    ) -> Result<u128, PoolError> {
        swap::quote(&env, zero_for_one, amount_in)
    }

    // ========== View functions ==========

    pub fn get_state(env: Env) -> Result<PoolState, PoolError> {
        get_state(&env)
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, PoolError> {
        get_config(&env)
    }

    /// Current √price as Q64.96
    pub fn price(env: Env) -> Result<u128, PoolError> {
        Ok(get_state(&env)?.sqrt_price_x96)
    }

    pub fn liquidity(env: Env) -> Result<u128, PoolError> {
        Ok(get_state(&env)?.liquidity)
    }

    pub fn nearest_tick(env: Env) -> Result<i32, PoolError> {
        Ok(get_state(&env)?.nearest_tick)
    }

    pub fn reserves(env: Env) -> Result<(u128, u128), PoolError> {
        let state = get_state(&env)?;
        Ok((state.reserve0, state.reserve1))
    }

    pub fn fee_growth_global(env: Env) -> Result<(u128, u128), PoolError> {
        let state = get_state(&env)?;
        Ok((state.fee_growth_global_0_x96, state.fee_growth_global_1_x96))
    }

    pub fn protocol_fees(env: Env) -> Result<(u128, u128), PoolError> {
        let state = get_state(&env)?;
        Ok((state.protocol_fees_0, state.protocol_fees_1))
    }

    /// Ledger entry for `tick`, if it is linked
    pub fn get_tick(env: Env, tick: i32) -> Option<TickInfo> {
        load_tick(&env, tick)
    }

    pub fn get_position(env: Env, owner: Address, tick_lower: i32, tick_upper: i32) -> PositionInfo {
        load_position(&env, &position::position_key(&owner, tick_lower, tick_upper))
            .unwrap_or_default()
    }

    /// Fees a position could collect right now
    pub fn position_fees(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<(u128, u128), PoolError> {
        let key = position::position_key(&owner, tick_lower, tick_upper);
        let info = load_position(&env, &key).ok_or(PoolError::PositionNotFound)?;
        if info.liquidity == 0 {
            return Ok((info.tokens_owed_0, info.tokens_owed_1));
        }

        let state = get_state(&env)?;
        let inside = ticks::fee_growth_inside(
            &env,
            tick_lower,
            tick_upper,
            state.nearest_tick,
            (state.fee_growth_global_0_x96, state.fee_growth_global_1_x96),
        )?;
        let (fees_0, fees_1) = position::unaccrued_fees(&info, inside)?;
        Ok((
            info.tokens_owed_0
                .checked_add(fees_0)
                .ok_or(PoolError::Overflow)?,
            info.tokens_owed_1
                .checked_add(fees_1)
                .ok_or(PoolError::Overflow)?,
        ))
    }
}
