//! # Safe Multiplication and Division
//!
//! Overflow-safe `(x * y) / denominator` using 256-bit intermediate
//! arithmetic. Share/asset conversions multiply two `u128` amounts, which
//! does not fit in `u128`.
//!
//! ## Rounding Modes
//!
//! - `Down`: floor. Used for shares issued and assets paid out.
//! - `Up`: ceiling. Used for shares burned and assets charged.

use uint::construct_uint;

use crate::error::{VaultError, VaultResult};

construct_uint! {
    pub struct U256(4);
}

/// Rounding direction for division operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Round towards zero (floor division).
    Down,
    /// Round away from zero (ceiling division).
    Up,
}

/// Performs `(x * y) / denominator` with configurable rounding.
///
/// # Errors
///
/// - [`VaultError::DivisionByZero`] if `denominator` is zero
/// - [`VaultError::ArithmeticOverflow`] if the result does not fit in `u128`
///
/// # Example
///
/// ```
/// use reinvest_vault::vault_standards::mul_div::{mul_div, Rounding};
///
/// // shares = (assets * supply) / total_assets, rounded down
/// assert_eq!(mul_div(100_000, 1_000_000, 500_000, Rounding::Down).unwrap(), 200_000);
/// assert_eq!(mul_div(10, 1, 3, Rounding::Up).unwrap(), 4);
/// ```
pub fn mul_div(x: u128, y: u128, denominator: u128, rounding: Rounding) -> VaultResult<u128> {
    if denominator == 0 {
        return Err(VaultError::DivisionByZero);
    }

    let numerator = U256::from(x) * U256::from(y);
    let denominator = U256::from(denominator);
    let mut result = numerator / denominator;
    let remainder = numerator % denominator;

    if rounding == Rounding::Up && !remainder.is_zero() {
        result += U256::one();
    }

    if result > U256::from(u128::MAX) {
        return Err(VaultError::ArithmeticOverflow);
    }
    Ok(result.as_u128())
}

/// Applies a basis-point haircut: `amount * (10_000 - bps) / 10_000`, rounded down.
pub fn apply_bps_haircut(amount: u128, bps: u16) -> VaultResult<u128> {
    let keep = 10_000u128
        .checked_sub(bps as u128)
        .ok_or(VaultError::ArithmeticOverflow)?;
    mul_div(amount, keep, 10_000, Rounding::Down)
}
