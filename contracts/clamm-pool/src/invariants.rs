// ============================================================================
// LEDGER INVARIANTS
// ============================================================================
//
// Whole-pool consistency checks, run by tests after every scenario.
//
// 1. The tick ledger is a sorted doubly linked list from MIN_TICK to MAX_TICK
// 2. nearest_tick is linked and brackets the price with its successor
// 3. Active liquidity equals the running sum of liquidity_net up to nearest_tick
// 4. liquidity_net sums to zero over the whole ledger
// 5. Reserves cover the protocol fees owed out of them
//
// ============================================================================

use clamm_math::price_at_tick;
use clamm_types::{MAX_TICK, MIN_TICK};
use soroban_sdk::Env;

use crate::storage::{get_state, get_tick};

/// Upper bound on ledger size, stops a corrupted list from looping forever
const MAX_WALK: u32 = 10_000;

pub fn check_all(env: &Env) -> Result<(), &'static str> {
    let state = get_state(env).map_err(|_| "pool not initialized")?;

    let mut tick = MIN_TICK;
    let mut info = get_tick(env, tick).ok_or("MIN_TICK not linked")?;
    if info.previous_tick != MIN_TICK {
        return Err("MIN_TICK must point back to itself");
    }

    let mut running: i128 = 0;
    let mut total: i128 = 0;
    let mut active: Option<i128> = None;
    let mut steps = 0;

    loop {
        total += info.liquidity_net;
        running += info.liquidity_net;
        if tick == state.nearest_tick {
            active = Some(running);
            if price_at_tick(tick).map_err(|_| "bad tick")? > state.sqrt_price_x96 {
                return Err("nearest tick above the price");
            }
            if tick != MAX_TICK
                && price_at_tick(info.next_tick).map_err(|_| "bad tick")? < state.sqrt_price_x96
            {
                return Err("price beyond the tick after nearest");
            }
        }
        if tick != MIN_TICK && tick != MAX_TICK && info.liquidity_gross == 0 {
            return Err("linked tick without liquidity");
        }
        if tick == MAX_TICK {
            break;
        }

        let next = info.next_tick;
        if next <= tick {
            return Err("ticks out of order");
        }
        let next_info = get_tick(env, next).ok_or("next tick not stored")?;
        if next_info.previous_tick != tick {
            return Err("broken back link");
        }

        steps += 1;
        if steps > MAX_WALK {
            return Err("ledger does not terminate");
        }
        tick = next;
        info = next_info;
    }

    if total != 0 {
        return Err("liquidity_net does not sum to zero");
    }
    match active {
        None => return Err("nearest tick not linked"),
        Some(liquidity) if liquidity != state.liquidity as i128 => {
            return Err("active liquidity mismatch");
        }
        Some(_) => {}
    }
    if state.reserve0 < state.protocol_fees_0 || state.reserve1 < state.protocol_fees_1 {
        return Err("protocol fees exceed reserves");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{set_state, set_tick};
    use crate::testutils::{Setup, FIXTURE_LIQUIDITY, FIXTURE_PRICE};

    #[test]
    fn test_fresh_pool_is_consistent() {
        let env = Env::default();
        let setup = Setup::new(&env, FIXTURE_PRICE, 3000, 0);
        setup.assert_invariants();
    }

    #[test]
    fn test_detects_liquidity_mismatch() {
        let env = Env::default();
        let setup = Setup::new(&env, FIXTURE_PRICE, 3000, 0);
        setup.mint_position(MIN_TICK, -80068, -80068, -69081, FIXTURE_LIQUIDITY);

        env.as_contract(&setup.pool.address, || {
            let mut state = get_state(&env).unwrap();
            state.liquidity += 1;
            set_state(&env, &state);
            assert_eq!(check_all(&env), Err("active liquidity mismatch"));
        });
    }

    #[test]
    fn test_detects_broken_link() {
        let env = Env::default();
        let setup = Setup::new(&env, FIXTURE_PRICE, 3000, 0);
        setup.mint_position(MIN_TICK, -80068, -80068, -69081, FIXTURE_LIQUIDITY);

        env.as_contract(&setup.pool.address, || {
            let mut info = get_tick(&env, -69081).unwrap();
            info.previous_tick = MIN_TICK;
            set_tick(&env, -69081, &info);
            assert_eq!(check_all(&env), Err("broken back link"));
        });
    }
}
