use clamm_types::{PoolConfig, PoolState, PositionInfo, PositionKey, TickInfo};
use soroban_sdk::{contracttype, Env};

use crate::error::PoolError;

// ============================================================================
// SOROBAN RESOURCE LIMITS
// ============================================================================
// - Write entries per tx: 50 entries
// - Each linked tick is its own persistent entry (~80 bytes)
// - Each position is its own persistent entry (~120 bytes)
// - Config, state and the guard flag live in instance storage
//
// A swap writes one tick entry per crossing. Mint and burn touch at most
// six tick entries (both boundaries and their neighbours) plus a position.
// ============================================================================

/// Maximum number of tick crossings allowed per swap operation.
/// Keeps a swap under Soroban's write entry limit with room for the
/// state update and vault payout.
pub const MAX_TICK_CROSSINGS_PER_SWAP: u32 = 40;

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Pool configuration (Instance storage)
    Config,
    /// Current pool state (Instance storage)
    State,
    /// Set while a mutating call is in progress (Instance storage)
    Locked,
    /// Linked tick: tick_index -> TickInfo (Persistent storage)
    Tick(i32),
    /// Position data: PositionKey -> PositionInfo (Persistent storage)
    Position(PositionKey),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<PoolConfig, PoolError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(PoolError::NotInitialized)
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn get_state(env: &Env) -> Result<PoolState, PoolError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(PoolError::NotInitialized)
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Guard ===

pub fn is_locked(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Locked)
        .unwrap_or(false)
}

pub fn set_locked(env: &Env, locked: bool) {
    if locked {
        env.storage().instance().set(&DataKey::Locked, &true);
    } else {
        env.storage().instance().remove(&DataKey::Locked);
    }
}

// === Tick ===

pub fn get_tick(env: &Env, tick: i32) -> Option<TickInfo> {
    let key = DataKey::Tick(tick);
    let info = env.storage().persistent().get(&key);
    if info.is_some() {
        extend_persistent_ttl(env, &key);
    }
    info
}

pub fn set_tick(env: &Env, tick: i32, info: &TickInfo) {
    let key = DataKey::Tick(tick);
    env.storage().persistent().set(&key, info);
    extend_persistent_ttl(env, &key);
}

pub fn remove_tick(env: &Env, tick: i32) {
    env.storage().persistent().remove(&DataKey::Tick(tick));
}

// === Position ===

pub fn get_position(env: &Env, key: &PositionKey) -> Option<PositionInfo> {
    let data_key = DataKey::Position(key.clone());
    env.storage().persistent().get(&data_key)
}

pub fn set_position(env: &Env, key: &PositionKey, info: &PositionInfo) {
    let data_key = DataKey::Position(key.clone());
    env.storage().persistent().set(&data_key, info);
    extend_persistent_ttl(env, &data_key);
}
