use clamm_types::MathError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolError {
    // Validation
    AlreadyInitialized = 100,
    NotInitialized = 101,
    InvalidTokenOrder = 102,
    InvalidFee = 103,
    InvalidTickOrder = 104,
    TickOutOfRange = 105,
    PriceOutOfRange = 106,
    ZeroLiquidity = 107,

    // Solvency
    InsufficientDeposit = 110,
    InsufficientReserves = 111,

    // Arithmetic
    Overflow = 120,
    DivisionByZero = 121,

    // Liquidity
    InsufficientLiquidity = 130,
    PositionNotFound = 131,
    TooManyTickCrossings = 132,
    TickNotLinked = 133,

    // Concurrency
    Locked = 140,
}

impl From<MathError> for PoolError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => PoolError::Overflow,
            MathError::DivisionByZero => PoolError::DivisionByZero,
            MathError::TickOutOfRange => PoolError::TickOutOfRange,
            MathError::PriceOutOfRange => PoolError::PriceOutOfRange,
            MathError::LiquidityUnderflow => PoolError::InsufficientLiquidity,
        }
    }
}

/// Converts a liquidity amount to the signed delta form used by the ledger
pub fn to_delta(amount: u128) -> Result<i128, PoolError> {
    i128::try_from(amount).map_err(|_| PoolError::Overflow)
}
