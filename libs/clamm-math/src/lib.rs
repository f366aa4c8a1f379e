#![cfg_attr(not(test), no_std)]

pub mod dydx_math;
pub mod fee_math;
pub mod full_math;
pub mod liquidity_math;
pub mod tick_math;

pub use dydx_math::*;
pub use fee_math::*;
pub use full_math::*;
pub use liquidity_math::*;
pub use tick_math::*;
