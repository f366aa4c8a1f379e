use soroban_sdk::contracterror;

/// Failures of the fixed-point and curve math
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MathError {
    /// Result does not fit the output type
    Overflow = 1,
    DivisionByZero = 2,
    /// Tick outside [MIN_TICK, MAX_TICK]
    TickOutOfRange = 3,
    /// √price outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO]
    PriceOutOfRange = 4,
    /// Signed liquidity update would go below zero
    LiquidityUnderflow = 5,
}
