use soroban_sdk::{contracttype, Address};

/// Position key for pool-level tracking
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Position info stored in pool contract
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionInfo {
    /// Liquidity in this position
    pub liquidity: u128,
    /// Fee growth inside at last update (token0, Q64.96)
    pub fee_growth_inside_0_last_x96: u128,
    /// Fee growth inside at last update (token1, Q64.96)
    pub fee_growth_inside_1_last_x96: u128,
    /// Uncollected token0 fees
    pub tokens_owed_0: u128,
    /// Uncollected token1 fees
    pub tokens_owed_1: u128,
}
