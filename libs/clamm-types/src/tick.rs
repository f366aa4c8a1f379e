use soroban_sdk::contracttype;

/// A linked tick of the ledger.
///
/// Ticks form a doubly linked list sorted by index, anchored at the
/// `MIN_TICK` and `MAX_TICK` sentinels. A tick is linked exactly when a
/// record is stored for it.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TickInfo {
    /// Next linked tick below (MIN_TICK points to itself)
    pub previous_tick: i32,
    /// Next linked tick above (MAX_TICK points to itself)
    pub next_tick: i32,
    /// Total liquidity of the positions bounded by this tick
    pub liquidity_gross: u128,
    /// Liquidity added to the active total when the price crosses upwards
    pub liquidity_net: i128,
    /// Token0 fee growth on the far side of this tick (Q64.96)
    pub fee_growth_outside_0_x96: u128,
    /// Token1 fee growth on the far side of this tick (Q64.96)
    pub fee_growth_outside_1_x96: u128,
}

impl TickInfo {
    pub fn new(previous_tick: i32, next_tick: i32) -> Self {
        Self {
            previous_tick,
            next_tick,
            ..Self::default()
        }
    }
}
