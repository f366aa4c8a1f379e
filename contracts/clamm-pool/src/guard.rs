use soroban_sdk::Env;

use crate::error::PoolError;
use crate::storage::{is_locked, set_locked};

/// Runs `f` while holding the pool's single-writer flag.
///
/// The flag is only cleared on success; a failed call is rolled back by the
/// host, which restores the flag together with every other write.
pub fn with_lock<T>(
    env: &Env,
    f: impl FnOnce() -> Result<T, PoolError>,
) -> Result<T, PoolError> {
    if is_locked(env) {
        return Err(PoolError::Locked);
    }
    set_locked(env, true);
    let result = f()?;
    set_locked(env, false);
    Ok(result)
}
