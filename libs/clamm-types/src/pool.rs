use soroban_sdk::{contracttype, Address};

use crate::MIN_TICK;

/// Current pool state - stored in Instance storage for frequent access
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Current √(token1/token0) as Q64.96
    pub sqrt_price_x96: u128,
    /// Liquidity of every position whose range contains the price
    pub liquidity: u128,
    /// Highest linked tick at or below the price
    pub nearest_tick: i32,
    /// Token0 accounted to the pool inside the vault
    pub reserve0: u128,
    /// Token1 accounted to the pool inside the vault
    pub reserve1: u128,
    /// Fee growth global for token0 (Q64.96)
    pub fee_growth_global_0_x96: u128,
    /// Fee growth global for token1 (Q64.96)
    pub fee_growth_global_1_x96: u128,
    /// Protocol fees accumulated for token0
    pub protocol_fees_0: u128,
    /// Protocol fees accumulated for token1
    pub protocol_fees_1: u128,
}

impl PoolState {
    pub fn new(sqrt_price_x96: u128) -> Self {
        Self {
            sqrt_price_x96,
            liquidity: 0,
            nearest_tick: MIN_TICK,
            reserve0: 0,
            reserve1: 0,
            fee_growth_global_0_x96: 0,
            fee_growth_global_1_x96: 0,
            protocol_fees_0: 0,
            protocol_fees_1: 0,
        }
    }
}

/// Pool configuration - immutable after creation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Factory contract address
    pub factory: Address,
    /// Custody vault holding the pool's tokens
    pub vault: Address,
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Swap fee in pips
    pub swap_fee: u32,
    /// Share of the swap fee kept by the protocol, in bps
    pub protocol_fee_bps: u32,
    /// Receiver of the protocol fees
    pub fee_recipient: Address,
}

/// Everything a pool needs at initialization, supplied by the factory
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolParams {
    pub factory: Address,
    pub vault: Address,
    pub fee_recipient: Address,
    pub protocol_fee_bps: u32,
    pub token0: Address,
    pub token1: Address,
    pub swap_fee: u32,
    pub sqrt_price_x96: u128,
}
