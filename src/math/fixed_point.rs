//! Fixed-point helpers over arbitrary-precision integers.
//!
//! All values are `BigUint`, so nothing here can overflow. Division truncates,
//! which for non-negative integers is the same as flooring.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::constants::SCALE_U64;

/// `10^18`, the fixed-point unit of the stable-swap domain.
pub fn scale() -> BigUint {
    BigUint::from(SCALE_U64)
}

/// `10^exp`.
pub fn pow10(exp: u8) -> BigUint {
    BigUint::from(10u32).pow(exp as u32)
}

pub fn mul(a: &BigUint, b: &BigUint) -> BigUint {
    a * b
}

/// Truncating division. Returns `None` when `b` is zero.
pub fn div(a: &BigUint, b: &BigUint) -> Option<BigUint> {
    if b.is_zero() {
        None
    } else {
        Some(a / b)
    }
}

/// Largest integer whose square does not exceed `n`.
pub fn isqrt(n: &BigUint) -> BigUint {
    n.sqrt()
}

/// Re-express `amount` (with `decimals` fractional digits) in the 18-digit
/// fixed-point domain: `amount * SCALE / 10^decimals`.
pub fn to_scaled(amount: &BigUint, decimals: u8) -> BigUint {
    amount * scale() / pow10(decimals)
}

/// Inverse of [`to_scaled`]: `value * 10^decimals / SCALE`, truncated.
pub fn from_scaled(value: &BigUint, decimals: u8) -> BigUint {
    value * pow10(decimals) / scale()
}
