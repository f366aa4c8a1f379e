#![no_std]

mod error;
mod pool;
mod position;
mod tick;

pub use error::*;
pub use pool::*;
pub use position::*;
pub use tick::*;

/// Q96 constant (2^96), the scale of every √price and fee growth value
pub const Q96: u128 = 1 << 96;

/// Lowest tick of the ledger, also the left sentinel
pub const MIN_TICK: i32 = -443636;

/// Highest tick of the ledger, also the right sentinel
pub const MAX_TICK: i32 = 443636;

/// √price at MIN_TICK as Q64.96
pub const MIN_SQRT_RATIO: u128 = 18447090764788882728;

/// √price at MAX_TICK as Q64.96, just below u128::MAX
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Swap fees are expressed in pips (hundredths of a basis point)
pub const FEE_DENOMINATOR: u128 = 1_000_000;

/// Highest accepted swap fee: 10%
pub const MAX_SWAP_FEE: u32 = 100_000;

/// Protocol share of the swap fee is expressed in basis points
pub const PROTOCOL_FEE_DENOMINATOR: u128 = 10_000;

/// Highest accepted protocol share: the whole fee
pub const MAX_PROTOCOL_FEE: u32 = 10_000;

/// Returns true when `fee` (pips) and `protocol_fee_bps` are both acceptable
pub fn is_valid_fee(fee: u32, protocol_fee_bps: u32) -> bool {
    fee <= MAX_SWAP_FEE && protocol_fee_bps <= MAX_PROTOCOL_FEE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_bounds() {
        assert!(is_valid_fee(0, 0));
        assert!(is_valid_fee(3000, 2500));
        assert!(is_valid_fee(MAX_SWAP_FEE, MAX_PROTOCOL_FEE));
        assert!(!is_valid_fee(MAX_SWAP_FEE + 1, 0));
        assert!(!is_valid_fee(3000, MAX_PROTOCOL_FEE + 1));
    }

    #[test]
    fn test_sentinels_are_symmetric() {
        assert_eq!(MIN_TICK, -MAX_TICK);
        assert!(MIN_SQRT_RATIO < Q96 && Q96 < MAX_SQRT_RATIO);
    }
}
