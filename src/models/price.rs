use num_bigint::BigUint;
use serde::Serialize;

use crate::error::{ensure, PairError, Result};
use crate::math::{div, mul, pow10};
use crate::models::{Token, TokenAmount};
use crate::utils::biguint_string;

/// Exact price of `base` in units of `quote`, as `numerator / denominator`
/// over raw (smallest-unit) amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Price {
    pub base: Token,
    pub quote: Token,
    #[serde(with = "biguint_string")]
    pub numerator: BigUint,
    #[serde(with = "biguint_string")]
    pub denominator: BigUint,
}

impl Price {
    /// `denominator` units of `base` trade for `numerator` units of `quote`.
    pub fn new(base: Token, quote: Token, denominator: BigUint, numerator: BigUint) -> Self {
        Self {
            base,
            quote,
            numerator,
            denominator,
        }
    }

    pub fn invert(&self) -> Price {
        Price::new(
            self.quote.clone(),
            self.base.clone(),
            self.numerator.clone(),
            self.denominator.clone(),
        )
    }

    /// Raw ratio as `(numerator, denominator)`.
    pub fn raw(&self) -> (&BigUint, &BigUint) {
        (&self.numerator, &self.denominator)
    }

    /// Ratio in whole-token units, correcting for the two tokens' decimals.
    pub fn adjusted(&self) -> (BigUint, BigUint) {
        (
            &self.numerator * pow10(self.base.decimals),
            &self.denominator * pow10(self.quote.decimals),
        )
    }

    /// Chain two prices: `self` (A in B) times `other` (B in C) is A in C.
    pub fn multiply(&self, other: &Price) -> Result<Price> {
        ensure(self.quote.equals(&other.base), "TOKEN")?;
        Ok(Price::new(
            self.base.clone(),
            other.quote.clone(),
            &self.denominator * &other.denominator,
            &self.numerator * &other.numerator,
        ))
    }

    /// Convert an amount of `base` to `quote` at this price, truncating.
    pub fn quote(&self, amount: &TokenAmount) -> Result<TokenAmount> {
        ensure(amount.token.equals(&self.base), "TOKEN")?;
        let raw = div(&mul(amount.raw(), &self.numerator), &self.denominator)
            .ok_or(PairError::InsufficientReserves)?;
        TokenAmount::new(self.quote.clone(), raw)
    }
}
