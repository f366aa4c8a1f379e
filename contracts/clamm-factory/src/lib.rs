#![no_std]

use clamm_types::{is_valid_fee, PoolParams};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, Address, BytesN, Env, IntoVal, Symbol,
    Vec,
};

#[contract]
pub struct ClammFactory;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FactoryError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidTokenOrder = 3,
    InvalidFee = 4,
    PoolExists = 5,
}

/// Storage keys for Factory contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address
    Admin,
    /// Pool WASM hash for deployment
    PoolWasmHash,
    /// Custody vault handed to every new pool
    Vault,
    /// Protocol fee recipient
    FeeRecipient,
    /// Protocol share of swap fees (basis points)
    ProtocolFee,
    /// (token0, token1, swap_fee) -> pool address
    Pool(Address, Address, u32),
    /// Total number of pools created
    PoolCount,
    /// Pool address at index
    PoolAt(u32),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Most pools returned by one paginated read
const MAX_PAGE: u32 = 50;

// ============================================================================
// SOROBAN RESOURCE LIMITS
// ============================================================================
// - Read entries per tx: 100 entries
// - Write entries per tx: 50 entries
//
// The pool list is indexed storage (PoolCount + PoolAt) rather than one Vec,
// so no single ledger entry grows with the number of pools. Reads are
// paginated at MAX_PAGE.
// ============================================================================

#[contractimpl]
impl ClammFactory {
    /// Initialize the registry
    pub fn initialize(
        env: Env,
        admin: Address,
        pool_wasm_hash: BytesN<32>,
        vault: Address,
        fee_recipient: Address,
        protocol_fee_bps: u32,
    ) -> Result<(), FactoryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(FactoryError::AlreadyInitialized);
        }
        admin.require_auth();
        if !is_valid_fee(0, protocol_fee_bps) {
            return Err(FactoryError::InvalidFee);
        }

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::PoolWasmHash, &pool_wasm_hash);
        env.storage().instance().set(&DataKey::Vault, &vault);
        env.storage()
            .instance()
            .set(&DataKey::FeeRecipient, &fee_recipient);
        env.storage()
            .instance()
            .set(&DataKey::ProtocolFee, &protocol_fee_bps);
        env.storage().instance().set(&DataKey::PoolCount, &0u32);

        extend_instance_ttl(&env);
        Ok(())
    }

    /// Deploy and initialize a pool for a token pair and swap fee.
    /// Returns the pool contract address.
    pub fn create_pool(
        env: Env,
        token_a: Address,
        token_b: Address,
        swap_fee: u32,
        sqrt_price_x96: u128,
    ) -> Result<Address, FactoryError> {
        let (token0, token1) = sort_tokens(token_a, token_b)?;

        let pool_wasm_hash: BytesN<32> = read_instance(&env, &DataKey::PoolWasmHash)?;
        let vault: Address = read_instance(&env, &DataKey::Vault)?;
        let fee_recipient: Address = read_instance(&env, &DataKey::FeeRecipient)?;
        let protocol_fee_bps: u32 = read_instance(&env, &DataKey::ProtocolFee)?;

        if !is_valid_fee(swap_fee, protocol_fee_bps) {
            return Err(FactoryError::InvalidFee);
        }

        let pool_key = DataKey::Pool(token0.clone(), token1.clone(), swap_fee);
        if env.storage().persistent().has(&pool_key) {
            return Err(FactoryError::PoolExists);
        }

        let pool_count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::PoolCount)
            .unwrap_or(0);

        // Deterministic salt from pool count + fee
        let mut salt_bytes = [0u8; 32];
        salt_bytes[0..4].copy_from_slice(&pool_count.to_be_bytes());
        salt_bytes[4..8].copy_from_slice(&swap_fee.to_be_bytes());
        let salt = BytesN::from_array(&env, &salt_bytes);

        let pool_address = env
            .deployer()
            .with_current_contract(salt)
            .deploy_v2(pool_wasm_hash, ());

        let params = PoolParams {
            factory: env.current_contract_address(),
            vault,
            fee_recipient,
            protocol_fee_bps,
            token0: token0.clone(),
            token1: token1.clone(),
            swap_fee,
            sqrt_price_x96,
        };
        env.invoke_contract::<()>(
            &pool_address,
            &Symbol::new(&env, "initialize"),
            (params,).into_val(&env),
        );

        env.storage().persistent().set(&pool_key, &pool_address);
        extend_persistent_ttl(&env, &pool_key);

        let pool_at_key = DataKey::PoolAt(pool_count);
        env.storage()
            .persistent()
            .set(&pool_at_key, &pool_address);
        extend_persistent_ttl(&env, &pool_at_key);

        env.storage()
            .instance()
            .set(&DataKey::PoolCount, &(pool_count + 1));

        env.events().publish(
            (Symbol::new(&env, "pool_created"),),
            (token0, token1, swap_fee, pool_address.clone()),
        );

        extend_instance_ttl(&env);
        Ok(pool_address)
    }

    /// Get pool address for token pair and swap fee, in either token order
    pub fn get_pool(env: Env, token_a: Address, token_b: Address, swap_fee: u32) -> Option<Address> {
        let (token0, token1) = sort_tokens(token_a, token_b).ok()?;
        env.storage()
            .persistent()
            .get(&DataKey::Pool(token0, token1, swap_fee))
    }

    pub fn get_pool_count(env: Env) -> u32 {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::PoolCount)
            .unwrap_or(0)
    }

    pub fn get_pool_at(env: Env, index: u32) -> Option<Address> {
        env.storage().persistent().get(&DataKey::PoolAt(index))
    }

    /// Up to `limit` pools (capped at MAX_PAGE) starting from `start_index`
    pub fn get_pools_paginated(env: Env, start_index: u32, limit: u32) -> Vec<Address> {
        let pool_count = Self::get_pool_count(env.clone());
        let end_index = start_index
            .saturating_add(limit.min(MAX_PAGE))
            .min(pool_count);

        let mut pools: Vec<Address> = Vec::new(&env);
        for i in start_index..end_index {
            if let Some(pool) = env.storage().persistent().get(&DataKey::PoolAt(i)) {
                pools.push_back(pool);
            }
        }
        pools
    }

    /// Set the protocol fee recipient for pools created from now on
    pub fn set_fee_recipient(env: Env, recipient: Address) -> Result<(), FactoryError> {
        require_admin(&env)?;
        env.storage()
            .instance()
            .set(&DataKey::FeeRecipient, &recipient);
        extend_instance_ttl(&env);
        Ok(())
    }

    /// Set the protocol fee share for pools created from now on
    pub fn set_protocol_fee(env: Env, protocol_fee_bps: u32) -> Result<(), FactoryError> {
        require_admin(&env)?;
        if !is_valid_fee(0, protocol_fee_bps) {
            return Err(FactoryError::InvalidFee);
        }
        env.storage()
            .instance()
            .set(&DataKey::ProtocolFee, &protocol_fee_bps);
        extend_instance_ttl(&env);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, FactoryError> {
        read_instance(&env, &DataKey::Admin)
    }

    pub fn get_pool_wasm_hash(env: Env) -> Result<BytesN<32>, FactoryError> {
        read_instance(&env, &DataKey::PoolWasmHash)
    }

    pub fn get_vault(env: Env) -> Result<Address, FactoryError> {
        read_instance(&env, &DataKey::Vault)
    }

    pub fn get_fee_recipient(env: Env) -> Result<Address, FactoryError> {
        read_instance(&env, &DataKey::FeeRecipient)
    }

    pub fn get_protocol_fee(env: Env) -> Result<u32, FactoryError> {
        read_instance(&env, &DataKey::ProtocolFee)
    }
}

fn sort_tokens(token_a: Address, token_b: Address) -> Result<(Address, Address), FactoryError> {
    if token_a == token_b {
        return Err(FactoryError::InvalidTokenOrder);
    }
    if token_a < token_b {
        Ok((token_a, token_b))
    } else {
        Ok((token_b, token_a))
    }
}

fn read_instance<T>(env: &Env, key: &DataKey) -> Result<T, FactoryError>
where
    T: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(key)
        .ok_or(FactoryError::NotInitialized)
}

fn require_admin(env: &Env) -> Result<(), FactoryError> {
    let admin: Address = read_instance(env, &DataKey::Admin)?;
    admin.require_auth();
    Ok(())
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}
