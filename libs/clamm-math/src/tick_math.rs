use clamm_types::{MathError, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use ethnum::U256;

use crate::full_math::{mul_div, sqrt, to_u128};

// √(1.0001^-(2^i)) as Q128.128, for i = 0..=18
const RATIOS: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
];

/// Calculate √(1.0001^tick) · 2^96.
///
/// The ratio is built in Q128.128 by multiplying in one precomputed factor
/// per set bit of |tick|, inverted for positive ticks, then converted to
/// Q64.96 rounding up so that `tick_at_price` is consistent with it.
pub fn price_at_tick(tick: i32) -> Result<u128, MathError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::TickOutOfRange);
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio = U256::ONE << 128u32;
    for (bit, factor) in RATIOS.iter().enumerate() {
        if abs_tick & (1 << bit) != 0 {
            ratio = (ratio * U256::from(*factor)) >> 128u32;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up
    let mut price = ratio >> 32u32;
    if ratio & U256::from(u32::MAX) != U256::ZERO {
        price += U256::ONE;
    }
    to_u128(price)
}

/// Calculate the greatest tick whose price does not exceed `sqrt_price_x96`.
pub fn tick_at_price(sqrt_price_x96: u128) -> Result<i32, MathError> {
    if !(MIN_SQRT_RATIO..=MAX_SQRT_RATIO).contains(&sqrt_price_x96) {
        return Err(MathError::PriceOutOfRange);
    }

    // Invariant: price_at_tick(low) <= sqrt_price < price_at_tick(high + 1)
    let mut low = MIN_TICK;
    let mut high = MAX_TICK;
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if price_at_tick(mid)? <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    Ok(low)
}

/// √(amount1 / amount0) as Q64.96, the price at which the two amounts are worth the same
pub fn encode_price_sqrt(amount1: u128, amount0: u128) -> Result<u128, MathError> {
    let ratio_x192 = mul_div(
        U256::from(amount1),
        U256::ONE << 192u32,
        U256::from(amount0),
    )?;
    to_u128(sqrt(ratio_x192))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clamm_types::Q96;
    use proptest::prelude::*;

    #[test]
    fn test_price_at_tick_zero() {
        // At tick 0, price = 1.0, so √price = 1.0, √price * 2^96 = 2^96
        assert_eq!(price_at_tick(0), Ok(Q96));
    }

    #[test]
    fn test_price_at_tick_adjacent() {
        assert_eq!(price_at_tick(1), Ok(79232123823359799118286999568));
        assert_eq!(price_at_tick(-1), Ok(79224201403219477170569942574));
    }

    #[test]
    fn test_price_at_tick_known_values() {
        assert_eq!(price_at_tick(100), Ok(79625275426524748796330556128));
        assert_eq!(price_at_tick(-100), Ok(78833030112140176575862854579));
        assert_eq!(price_at_tick(10000), Ok(130621891405341611593710811006));
        assert_eq!(price_at_tick(-10000), Ok(48055510970269007215549348797));
        assert_eq!(price_at_tick(-80068), Ok(1446478496690157252386646498));
        assert_eq!(price_at_tick(-69081), Ok(2505415311736066150957655980));
    }

    #[test]
    fn test_tick_bounds() {
        assert_eq!(price_at_tick(MIN_TICK), Ok(MIN_SQRT_RATIO));
        assert_eq!(price_at_tick(MAX_TICK), Ok(MAX_SQRT_RATIO));
        assert_eq!(price_at_tick(MIN_TICK - 1), Err(MathError::TickOutOfRange));
        assert_eq!(price_at_tick(MAX_TICK + 1), Err(MathError::TickOutOfRange));
    }

    #[test]
    fn test_tick_at_price_q96() {
        assert_eq!(tick_at_price(Q96), Ok(0));
        assert_eq!(tick_at_price(Q96 - 1), Ok(-1));
    }

    #[test]
    fn test_tick_at_price_bounds() {
        assert_eq!(tick_at_price(MIN_SQRT_RATIO), Ok(MIN_TICK));
        assert_eq!(tick_at_price(MIN_SQRT_RATIO + 1), Ok(MIN_TICK));
        assert_eq!(tick_at_price(MAX_SQRT_RATIO), Ok(MAX_TICK));
        assert_eq!(tick_at_price(MAX_SQRT_RATIO - 1), Ok(MAX_TICK - 1));
        assert_eq!(tick_at_price(MIN_SQRT_RATIO - 1), Err(MathError::PriceOutOfRange));
        assert_eq!(tick_at_price(MAX_SQRT_RATIO + 1), Err(MathError::PriceOutOfRange));
    }

    #[test]
    fn test_tick_at_price_between_ticks() {
        // 1807174424252647735792883644 sits between ticks -75616 and -75615
        let price = 1807174424252647735792883644;
        assert_eq!(tick_at_price(price), Ok(-75616));
        assert!(price_at_tick(-75616).unwrap() <= price);
        assert!(price_at_tick(-75615).unwrap() > price);
    }

    #[test]
    fn test_encode_price_sqrt() {
        assert_eq!(encode_price_sqrt(1, 1), Ok(Q96));
        assert_eq!(encode_price_sqrt(4, 1), Ok(2 * Q96));
        assert_eq!(encode_price_sqrt(1, 4), Ok(Q96 / 2));
        assert_eq!(encode_price_sqrt(1, 0), Err(MathError::DivisionByZero));
    }

    proptest! {
        #[test]
        fn prop_tick_round_trip(tick in MIN_TICK..=MAX_TICK) {
            let price = price_at_tick(tick).unwrap();
            prop_assert_eq!(tick_at_price(price), Ok(tick));
        }

        #[test]
        fn prop_price_strictly_increasing(tick in MIN_TICK..MAX_TICK) {
            prop_assert!(price_at_tick(tick).unwrap() < price_at_tick(tick + 1).unwrap());
        }

        #[test]
        fn prop_tick_at_price_is_greatest(price in MIN_SQRT_RATIO..MAX_SQRT_RATIO) {
            let tick = tick_at_price(price).unwrap();
            prop_assert!(price_at_tick(tick).unwrap() <= price);
            prop_assert!(price_at_tick(tick + 1).unwrap() > price);
        }
    }
}
