use soroban_sdk::{Address, Env, Symbol};

pub fn mint(
    env: &Env,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amount: u128,
    amounts: (u128, u128),
) {
    env.events().publish(
        (Symbol::new(env, "mint"), owner.clone()),
        (tick_lower, tick_upper, amount, amounts.0, amounts.1),
    );
}

pub fn burn(
    env: &Env,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amount: u128,
    amounts: (u128, u128),
    recipient: &Address,
) {
    env.events().publish(
        (Symbol::new(env, "burn"), owner.clone()),
        (
            tick_lower,
            tick_upper,
            amount,
            amounts.0,
            amounts.1,
            recipient.clone(),
        ),
    );
}

pub fn collect(
    env: &Env,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amounts: (u128, u128),
    recipient: &Address,
) {
    env.events().publish(
        (Symbol::new(env, "collect"), owner.clone()),
        (tick_lower, tick_upper, amounts.0, amounts.1, recipient.clone()),
    );
}

pub fn swap(env: &Env, recipient: &Address, zero_for_one: bool, amount_in: u128, amount_out: u128) {
    env.events().publish(
        (Symbol::new(env, "swap"), recipient.clone()),
        (zero_for_one, amount_in, amount_out),
    );
}

/// Reserves after every balance change
pub fn sync(env: &Env, reserve0: u128, reserve1: u128) {
    env.events()
        .publish((Symbol::new(env, "sync"),), (reserve0, reserve1));
}

pub fn protocol_fee(env: &Env, amount0: u128, amount1: u128) {
    env.events()
        .publish((Symbol::new(env, "protocol_fee"),), (amount0, amount1));
}
