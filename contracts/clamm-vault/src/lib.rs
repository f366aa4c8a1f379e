#![no_std]

use clamm_math::{mul_div_rounding_up_u128, mul_div_u128};
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, token, Address, Env, Symbol,
};

#[contract]
pub struct ClammVault;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    InvalidAmount = 1,
    InsufficientShares = 2,
    Overflow = 3,
}

/// Underlying tokens held for a token, and the shares issued against them
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Totals {
    pub amount: u128,
    pub shares: u128,
}

/// Storage keys for the vault contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// token -> Totals (Persistent storage)
    Totals(Address),
    /// (token, owner) -> shares (Persistent storage)
    Balance(Address, Address),
}

// TTL constants
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

#[contractimpl]
impl ClammVault {
    /// Pull `amount` of `token` from `from` and credit the shares to `to`
    pub fn deposit(
        env: Env,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<u128, VaultError> {
        from.require_auth();

        let mut totals = get_totals(&env, &token);
        let shares = shares_for(&totals, amount, false)?;
        if shares == 0 {
            return Err(VaultError::InvalidAmount);
        }

        token::Client::new(&env, &token).transfer(
            &from,
            &env.current_contract_address(),
            &to_i128(amount)?,
        );

        totals.amount = totals.amount.checked_add(amount).ok_or(VaultError::Overflow)?;
        totals.shares = totals.shares.checked_add(shares).ok_or(VaultError::Overflow)?;
        set_totals(&env, &token, &totals);
        credit(&env, &token, &to, shares)?;

        env.events().publish(
            (Symbol::new(&env, "deposit"), token, to),
            (from, amount, shares),
        );
        Ok(shares)
    }

    /// Burn `shares` owned by `from` and send the underlying tokens to `to`
    pub fn withdraw(
        env: Env,
        token: Address,
        from: Address,
        to: Address,
        shares: u128,
    ) -> Result<u128, VaultError> {
        from.require_auth();
        if shares == 0 {
            return Err(VaultError::InvalidAmount);
        }

        let mut totals = get_totals(&env, &token);
        let amount = amount_for(&totals, shares, false)?;
        debit(&env, &token, &from, shares)?;

        totals.amount = totals
            .amount
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientShares)?;
        totals.shares = totals
            .shares
            .checked_sub(shares)
            .ok_or(VaultError::InsufficientShares)?;
        set_totals(&env, &token, &totals);

        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &to,
            &to_i128(amount)?,
        );

        env.events().publish(
            (Symbol::new(&env, "withdraw"), token, from),
            (to, amount, shares),
        );
        Ok(amount)
    }

    /// Move shares between two accounts
    pub fn transfer(
        env: Env,
        token: Address,
        from: Address,
        to: Address,
        shares: u128,
    ) -> Result<(), VaultError> {
        from.require_auth();
        if shares == 0 {
            return Ok(());
        }
        debit(&env, &token, &from, shares)?;
        credit(&env, &token, &to, shares)?;

        env.events().publish(
            (Symbol::new(&env, "transfer"), token, from),
            (to, shares),
        );
        Ok(())
    }

    pub fn balance_of(env: Env, token: Address, owner: Address) -> u128 {
        get_balance(&env, &token, &owner)
    }

    pub fn totals(env: Env, token: Address) -> Totals {
        get_totals(&env, &token)
    }

    /// Shares worth `amount` of `token`
    pub fn to_shares(
        env: Env,
        token: Address,
        amount: u128,
        round_up: bool,
    ) -> Result<u128, VaultError> {
        shares_for(&get_totals(&env, &token), amount, round_up)
    }

    /// Amount of `token` that `shares` are worth
    pub fn to_amount(
        env: Env,
        token: Address,
        shares: u128,
        round_up: bool,
    ) -> Result<u128, VaultError> {
        amount_for(&get_totals(&env, &token), shares, round_up)
    }
}

// === Share math ===

fn scale(value: u128, numerator: u128, denominator: u128, round_up: bool) -> Result<u128, VaultError> {
    let scaled = if round_up {
        value.fixed_mul_ceil(numerator, denominator)
    } else {
        value.fixed_mul_floor(numerator, denominator)
    };
    if let Some(scaled) = scaled {
        return Ok(scaled);
    }

    // value * numerator does not fit in u128, redo it with a 256-bit product
    let wide = if round_up {
        mul_div_rounding_up_u128(value, numerator, denominator)
    } else {
        mul_div_u128(value, numerator, denominator)
    };
    wide.map_err(|_| VaultError::Overflow)
}

/// First deposit sets the rate to one share per token
fn shares_for(totals: &Totals, amount: u128, round_up: bool) -> Result<u128, VaultError> {
    if totals.amount == 0 {
        return Ok(amount);
    }
    scale(amount, totals.shares, totals.amount, round_up)
}

fn amount_for(totals: &Totals, shares: u128, round_up: bool) -> Result<u128, VaultError> {
    if totals.shares == 0 {
        return Ok(shares);
    }
    scale(shares, totals.amount, totals.shares, round_up)
}

fn to_i128(amount: u128) -> Result<i128, VaultError> {
    i128::try_from(amount).map_err(|_| VaultError::Overflow)
}

// === Storage ===

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

fn get_totals(env: &Env, token: &Address) -> Totals {
    env.storage()
        .persistent()
        .get(&DataKey::Totals(token.clone()))
        .unwrap_or_default()
}

fn set_totals(env: &Env, token: &Address, totals: &Totals) {
    let key = DataKey::Totals(token.clone());
    env.storage().persistent().set(&key, totals);
    extend_persistent_ttl(env, &key);
}

fn get_balance(env: &Env, token: &Address, owner: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(token.clone(), owner.clone()))
        .unwrap_or(0)
}

fn set_balance(env: &Env, token: &Address, owner: &Address, shares: u128) {
    let key = DataKey::Balance(token.clone(), owner.clone());
    if shares == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &shares);
        extend_persistent_ttl(env, &key);
    }
}

fn credit(env: &Env, token: &Address, owner: &Address, shares: u128) -> Result<(), VaultError> {
    let balance = get_balance(env, token, owner)
        .checked_add(shares)
        .ok_or(VaultError::Overflow)?;
    set_balance(env, token, owner, balance);
    Ok(())
}

fn debit(env: &Env, token: &Address, owner: &Address, shares: u128) -> Result<(), VaultError> {
    let balance = get_balance(env, token, owner)
        .checked_sub(shares)
        .ok_or(VaultError::InsufficientShares)?;
    set_balance(env, token, owner, balance);
    Ok(())
}
