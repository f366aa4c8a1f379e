use clamm_types::{MathError, FEE_DENOMINATOR, PROTOCOL_FEE_DENOMINATOR, Q96};
use ethnum::U256;
use soroban_fixed_point_math::FixedPoint;

use crate::full_math::{mul_div, to_u128};

/// Swap fee charged on a step's output, rounded up
pub fn swap_fee_amount(amount_out: u128, fee_pips: u32) -> Result<u128, MathError> {
    amount_out
        .fixed_mul_ceil(fee_pips as u128, FEE_DENOMINATOR)
        .ok_or(MathError::Overflow)
}

/// Protocol's cut of a swap fee, rounded up
pub fn protocol_share(fee: u128, protocol_fee_bps: u32) -> Result<u128, MathError> {
    fee.fixed_mul_ceil(protocol_fee_bps as u128, PROTOCOL_FEE_DENOMINATOR)
        .ok_or(MathError::Overflow)
}

/// Fee per unit of liquidity as Q64.96; nothing accrues without liquidity
pub fn fee_growth_delta(fee: u128, liquidity: u128) -> Result<u128, MathError> {
    if liquidity == 0 {
        return Ok(0);
    }
    to_u128(mul_div(
        U256::from(fee),
        U256::from(Q96),
        U256::from(liquidity),
    )?)
}

/// Tokens earned by `liquidity` over a fee growth difference, rounded down
pub fn fees_owed(fee_growth_delta_x96: u128, liquidity: u128) -> Result<u128, MathError> {
    to_u128(mul_div(
        U256::from(fee_growth_delta_x96),
        U256::from(liquidity),
        U256::from(Q96),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_fee_rounds_up() {
        // 0.3% of 1000 = 3
        assert_eq!(swap_fee_amount(1000, 3000), Ok(3));
        // 0.3% of 1001 = 3.003 -> 4
        assert_eq!(swap_fee_amount(1001, 3000), Ok(4));
        assert_eq!(swap_fee_amount(1, 3000), Ok(1));
        assert_eq!(swap_fee_amount(0, 3000), Ok(0));
        assert_eq!(swap_fee_amount(1000, 0), Ok(0));
    }

    #[test]
    fn test_fee_never_exceeds_output() {
        for amount in [1u128, 7, 999, 1_000_001] {
            assert!(swap_fee_amount(amount, 100_000).unwrap() <= amount);
        }
    }

    #[test]
    fn test_protocol_share() {
        // 25% of 4 = 1
        assert_eq!(protocol_share(4, 2500), Ok(1));
        // 25% of 5 = 1.25 -> 2
        assert_eq!(protocol_share(5, 2500), Ok(2));
        assert_eq!(protocol_share(5, 0), Ok(0));
        assert_eq!(protocol_share(5, 10_000), Ok(5));
    }

    #[test]
    fn test_fee_growth_round_trip() {
        let liquidity = 219653609758424781044;
        let growth = fee_growth_delta(3_000_000_000_000_000, liquidity).unwrap();
        let owed = fees_owed(growth, liquidity).unwrap();
        // Truncation only ever loses dust
        assert!(owed <= 3_000_000_000_000_000);
        assert!(3_000_000_000_000_000 - owed <= 1);
    }

    #[test]
    fn test_fee_growth_without_liquidity() {
        assert_eq!(fee_growth_delta(1_000, 0), Ok(0));
        assert_eq!(fees_owed(0, 1_000), Ok(0));
    }
}
