use clamm_types::PoolConfig;
use soroban_sdk::{Address, Env, IntoVal, Symbol};

use crate::error::PoolError;

// === Vault calls ===

fn balance_of(env: &Env, vault: &Address, token: &Address) -> u128 {
    env.invoke_contract(
        vault,
        &Symbol::new(env, "balance_of"),
        (token, env.current_contract_address()).into_val(env),
    )
}

fn to_amount(env: &Env, vault: &Address, token: &Address, shares: u128) -> u128 {
    env.invoke_contract(
        vault,
        &Symbol::new(env, "to_amount"),
        (token, shares, false).into_val(env),
    )
}

fn to_shares(env: &Env, vault: &Address, token: &Address, amount: u128) -> u128 {
    env.invoke_contract(
        vault,
        &Symbol::new(env, "to_shares"),
        (token, amount, false).into_val(env),
    )
}

fn invoke_transfer(env: &Env, vault: &Address, token: &Address, to: &Address, shares: u128) {
    env.invoke_contract::<()>(
        vault,
        &Symbol::new(env, "transfer"),
        (token, env.current_contract_address(), to, shares).into_val(env),
    );
}

fn invoke_withdraw(env: &Env, vault: &Address, token: &Address, to: &Address, shares: u128) -> u128 {
    env.invoke_contract(
        vault,
        &Symbol::new(env, "withdraw"),
        (token, env.current_contract_address(), to, shares).into_val(env),
    )
}

/// Underlying amount the vault holds for the pool
pub fn pool_balance(env: &Env, config: &PoolConfig, token: &Address) -> u128 {
    let shares = balance_of(env, &config.vault, token);
    to_amount(env, &config.vault, token, shares)
}

/// Returns `reserve + amount` once the vault shows the pool holding that much.
///
/// Whatever the pool owns beyond its reserves is an unclaimed deposit.
pub fn claim_deposit(
    env: &Env,
    config: &PoolConfig,
    token: &Address,
    reserve: u128,
    amount: u128,
) -> Result<u128, PoolError> {
    if amount == 0 {
        return Ok(reserve);
    }
    let new_reserve = reserve.checked_add(amount).ok_or(PoolError::Overflow)?;
    if new_reserve > pool_balance(env, config, token) {
        return Err(PoolError::InsufficientDeposit);
    }
    Ok(new_reserve)
}

/// Pay `amount` of `token` out of the pool, as vault shares or unwrapped tokens.
///
/// Returns the underlying amount `to` received, which share rounding can
/// leave below `amount`.
pub fn pay(
    env: &Env,
    config: &PoolConfig,
    token: &Address,
    to: &Address,
    amount: u128,
    unwrap_vault: bool,
) -> u128 {
    if amount == 0 {
        return 0;
    }
    let shares = to_shares(env, &config.vault, token, amount);
    if unwrap_vault {
        invoke_withdraw(env, &config.vault, token, to, shares)
    } else {
        invoke_transfer(env, &config.vault, token, to, shares);
        to_amount(env, &config.vault, token, shares)
    }
}
