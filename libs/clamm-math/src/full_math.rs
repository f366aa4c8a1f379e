use clamm_types::MathError;
use ethnum::U256;

const HALF_BITS: u32 = 128;

/// Full 512-bit product of two 256-bit words, returned as (high, low).
///
/// Each factor is split into 128-bit halves so that every partial product
/// fits a `U256`; the cross terms are then folded in with explicit carries.
fn full_mul(a: U256, b: U256) -> (U256, U256) {
    let (a_hi, a_lo) = (a >> HALF_BITS, a & U256::from(u128::MAX));
    let (b_hi, b_lo) = (b >> HALF_BITS, b & U256::from(u128::MAX));

    let lo_lo = a_lo * b_lo;
    let hi_hi = a_hi * b_hi;
    let (cross, cross_carry) = (a_lo * b_hi).overflowing_add(a_hi * b_lo);

    let (low, low_carry) = lo_lo.overflowing_add(cross << HALF_BITS);

    let mut high = hi_hi + (cross >> HALF_BITS);
    if cross_carry {
        high += U256::ONE << HALF_BITS;
    }
    if low_carry {
        high += U256::ONE;
    }
    (high, low)
}

/// Divides the 512-bit value (high, low) by `denominator`.
///
/// Returns (quotient, remainder). Requires `high < denominator`, which is
/// exactly the condition for the quotient to fit 256 bits.
fn div_wide(high: U256, low: U256, denominator: U256) -> (U256, U256) {
    let mut remainder = high;
    let mut quotient = U256::ZERO;
    for bit in (0..256u32).rev() {
        let carry = remainder >> 255u32 == U256::ONE;
        remainder = (remainder << 1u32) | ((low >> bit) & U256::ONE);
        quotient <<= 1u32;
        if carry || remainder >= denominator {
            remainder = remainder.wrapping_sub(denominator);
            quotient |= U256::ONE;
        }
    }
    (quotient, remainder)
}

fn div_rem(a: U256, b: U256, denominator: U256) -> Result<(U256, U256), MathError> {
    if denominator == U256::ZERO {
        return Err(MathError::DivisionByZero);
    }
    let (high, low) = full_mul(a, b);
    if high == U256::ZERO {
        return Ok((low / denominator, low % denominator));
    }
    if high >= denominator {
        return Err(MathError::Overflow);
    }
    Ok(div_wide(high, low, denominator))
}

/// Calculates floor(a * b / denominator) with a 512-bit intermediate
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    div_rem(a, b, denominator).map(|(quotient, _)| quotient)
}

/// Calculates ceil(a * b / denominator) with a 512-bit intermediate
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let (quotient, remainder) = div_rem(a, b, denominator)?;
    if remainder == U256::ZERO {
        Ok(quotient)
    } else {
        quotient.checked_add(U256::ONE).ok_or(MathError::Overflow)
    }
}

/// Unsigned division with rounding up
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, MathError> {
    if b == U256::ZERO {
        return Err(MathError::DivisionByZero);
    }
    let quotient = a / b;
    if a % b == U256::ZERO {
        Ok(quotient)
    } else {
        Ok(quotient + U256::ONE)
    }
}

/// Narrows a 256-bit intermediate back to the u128 API type
pub fn to_u128(value: U256) -> Result<u128, MathError> {
    if value > U256::from(u128::MAX) {
        return Err(MathError::Overflow);
    }
    Ok(value.as_u128())
}

pub fn mul_div_u128(a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    to_u128(mul_div(
        U256::from(a),
        U256::from(b),
        U256::from(denominator),
    )?)
}

pub fn mul_div_rounding_up_u128(a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    to_u128(mul_div_rounding_up(
        U256::from(a),
        U256::from(b),
        U256::from(denominator),
    )?)
}

/// Integer square root (floor) by Newton iteration
pub fn sqrt(value: U256) -> U256 {
    if value < U256::from(2u8) {
        return value;
    }
    let mut x = value;
    let mut y = (value >> 1u32) + (value & U256::ONE);
    while y < x {
        x = y;
        y = (x + value / x) >> 1u32;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn u(x: u128) -> U256 {
        U256::from(x)
    }

    #[test]
    fn test_mul_div_basic() {
        // (10 * 20) / 5 = 40
        assert_eq!(mul_div(u(10), u(20), u(5)), Ok(u(40)));
        assert_eq!(mul_div_u128(10, 20, 5), Ok(40));
    }

    #[test]
    fn test_mul_div_rounds_down() {
        assert_eq!(mul_div_u128(1, 1, 2), Ok(0));
        assert_eq!(mul_div_u128(3, 1, 2), Ok(1));
        assert_eq!(mul_div_u128(5, 1, 3), Ok(1));
    }

    #[test]
    fn test_mul_div_rounding_up() {
        assert_eq!(mul_div_rounding_up_u128(1, 1, 2), Ok(1));
        assert_eq!(mul_div_rounding_up_u128(3, 1, 2), Ok(2));
        // Exact division does not round
        assert_eq!(mul_div_rounding_up_u128(4, 1, 2), Ok(2));
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // MAX * MAX / MAX needs the full 512-bit product
        assert_eq!(mul_div(U256::MAX, U256::MAX, U256::MAX), Ok(U256::MAX));
        // (2^255 * 6) / 3 = 2^256 overflows
        assert_eq!(
            mul_div(U256::ONE << 255u32, u(6), u(3)),
            Err(MathError::Overflow)
        );
        // (2^255 * 6) / 4 = 3 * 2^254
        assert_eq!(
            mul_div(U256::ONE << 255u32, u(6), u(4)),
            Ok(u(3) << 254u32)
        );
    }

    #[test]
    fn test_mul_div_wide_rounding_up() {
        // (MAX * MAX) / (MAX - 1) leaves a remainder and overflows after rounding
        let max = U256::MAX;
        let q = mul_div(max, u(2), max - U256::ONE);
        assert_eq!(q, Ok(u(2)));
        assert_eq!(mul_div_rounding_up(max, u(2), max - U256::ONE), Ok(u(3)));
        assert_eq!(
            mul_div_rounding_up(max, max, U256::ONE),
            Err(MathError::Overflow)
        );
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(mul_div_u128(1, 1, 0), Err(MathError::DivisionByZero));
        assert_eq!(
            mul_div_u128(u128::MAX, u128::MAX, 1),
            Err(MathError::Overflow)
        );
        assert_eq!(mul_div_u128(u128::MAX, u128::MAX, u128::MAX), Ok(u128::MAX));
    }

    #[test]
    fn test_div_rounding_up() {
        assert_eq!(div_rounding_up(u(10), u(3)), Ok(u(4)));
        assert_eq!(div_rounding_up(u(9), u(3)), Ok(u(3)));
        assert_eq!(div_rounding_up(U256::ZERO, u(3)), Ok(U256::ZERO));
        assert_eq!(div_rounding_up(U256::MAX, U256::MAX), Ok(U256::ONE));
        assert_eq!(div_rounding_up(u(1), U256::ZERO), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt(U256::ZERO), U256::ZERO);
        assert_eq!(sqrt(u(1)), u(1));
        assert_eq!(sqrt(u(2)), u(1));
        assert_eq!(sqrt(u(3)), u(1));
        assert_eq!(sqrt(u(4)), u(2));
        assert_eq!(sqrt(u(1u128 << 64)), u(1u128 << 32));
        assert_eq!(sqrt(U256::MAX), U256::from(u128::MAX));
    }

    proptest! {
        #[test]
        fn prop_mul_div_matches_native(a in any::<u64>(), b in any::<u64>(), d in 1u64..) {
            let expected = (a as u128) * (b as u128) / (d as u128);
            prop_assert_eq!(mul_div_u128(a as u128, b as u128, d as u128), Ok(expected));
        }

        #[test]
        fn prop_wide_product_divides_back(a in any::<u128>(), b in 1u128..) {
            // (a * 2^128 + ..) * b / b == a * 2^128 + ..
            let wide = (U256::from(a) << 128u32) | U256::from(b);
            prop_assert_eq!(mul_div(wide, U256::from(b), U256::from(b)), Ok(wide));
        }

        #[test]
        fn prop_rounding_up_is_at_most_one_more(a in any::<u128>(), b in any::<u128>(), d in 1u128..) {
            let down = mul_div(U256::from(a), U256::from(b), U256::from(d)).unwrap();
            let up = mul_div_rounding_up(U256::from(a), U256::from(b), U256::from(d)).unwrap();
            prop_assert!(up == down || up == down + U256::ONE);
        }

        #[test]
        fn prop_sqrt_is_floor(x in any::<u128>()) {
            let r = sqrt(U256::from(x));
            prop_assert!(r * r <= U256::from(x));
            prop_assert!((r + U256::ONE) * (r + U256::ONE) > U256::from(x));
        }
    }
}
