//! Classic `x * y = k` pricing with the fee taken from the input side.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONSTANT_PRODUCT_FEE_DENOMINATOR, CONSTANT_PRODUCT_FEE_NUMERATOR, STABLE_FEE_DENOMINATOR,
    STABLE_FEE_NUMERATOR,
};
use crate::error::{ensure, PairError, Result};

/// Share of the input that reaches the curve, as `numerator / denominator`.
///
/// Always `0 < numerator <= denominator`; deserialization goes through
/// [`FeeRate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FeeRateParts")]
pub struct FeeRate {
    numerator: u64,
    denominator: u64,
}

#[derive(Deserialize)]
struct FeeRateParts {
    numerator: u64,
    denominator: u64,
}

impl TryFrom<FeeRateParts> for FeeRate {
    type Error = PairError;

    fn try_from(parts: FeeRateParts) -> Result<Self> {
        FeeRate::new(parts.numerator, parts.denominator)
    }
}

impl FeeRate {
    /// 0.3%, the constant-product swap fee.
    pub const CONSTANT_PRODUCT: FeeRate = FeeRate {
        numerator: CONSTANT_PRODUCT_FEE_NUMERATOR,
        denominator: CONSTANT_PRODUCT_FEE_DENOMINATOR,
    };

    /// 0.4%, the stable-swap exact-in fee.
    pub const STABLE: FeeRate = FeeRate {
        numerator: STABLE_FEE_NUMERATOR,
        denominator: STABLE_FEE_DENOMINATOR,
    };

    /// Fails with `InvariantViolation("FEE")` unless `0 < numerator <= denominator`.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self> {
        ensure(numerator > 0 && numerator <= denominator, "FEE")?;
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Apply the fee to `amount`, truncating.
    pub fn apply(&self, amount: &BigUint) -> BigUint {
        amount * self.numerator / self.denominator
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::CONSTANT_PRODUCT
    }
}

/// Output paid for `amount_in`:
/// `a·R_out / (R_in·den + a)` with `a = amount_in·num`.
pub fn output_given_input(
    amount_in: &BigUint,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    fee: FeeRate,
) -> Result<BigUint> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(PairError::InsufficientReserves);
    }
    let amount_in_with_fee = amount_in * fee.numerator;
    let numerator = &amount_in_with_fee * reserve_out;
    let denominator = reserve_in * fee.denominator + &amount_in_with_fee;
    let amount_out = numerator / denominator;
    if amount_out.is_zero() {
        return Err(PairError::InsufficientInputAmount);
    }
    Ok(amount_out)
}

/// Input required to receive `amount_out`, rounded up by one unit so the
/// pool never loses value to truncation.
pub fn input_given_output(
    amount_out: &BigUint,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    fee: FeeRate,
) -> Result<BigUint> {
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(PairError::InsufficientReserves);
    }
    let numerator = reserve_in * amount_out * fee.denominator;
    let denominator = (reserve_out - amount_out) * fee.numerator;
    Ok(numerator / denominator + BigUint::one())
}
