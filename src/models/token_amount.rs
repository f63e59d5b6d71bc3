use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::{ensure, PairError, Result};
use crate::models::Token;
use crate::utils::biguint_string;

/// A raw quantity of `token` in its smallest unit, bounded by `2^256 - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TokenAmountParts")]
pub struct TokenAmount {
    pub token: Token,
    #[serde(with = "biguint_string")]
    raw: BigUint,
}

#[derive(Deserialize)]
struct TokenAmountParts {
    token: Token,
    #[serde(with = "biguint_string")]
    raw: BigUint,
}

impl TryFrom<TokenAmountParts> for TokenAmount {
    type Error = PairError;

    fn try_from(parts: TokenAmountParts) -> Result<Self> {
        TokenAmount::new(parts.token, parts.raw)
    }
}

fn max_uint256() -> BigUint {
    (BigUint::from(1u32) << 256u32) - 1u32
}

impl TokenAmount {
    pub fn new(token: Token, raw: BigUint) -> Result<Self> {
        ensure(raw <= max_uint256(), "AMOUNT")?;
        Ok(Self { token, raw })
    }

    pub fn zero(token: Token) -> Self {
        Self {
            token,
            raw: BigUint::zero(),
        }
    }

    pub fn raw(&self) -> &BigUint {
        &self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn add(&self, other: &TokenAmount) -> Result<TokenAmount> {
        ensure(self.token.equals(&other.token), "TOKEN")?;
        TokenAmount::new(self.token.clone(), &self.raw + &other.raw)
    }

    pub fn subtract(&self, other: &TokenAmount) -> Result<TokenAmount> {
        ensure(self.token.equals(&other.token), "TOKEN")?;
        ensure(self.raw >= other.raw, "AMOUNT")?;
        Ok(TokenAmount {
            token: self.token.clone(),
            raw: &self.raw - &other.raw,
        })
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.raw, self.token.symbol_or_address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    fn token(byte: u8) -> Token {
        Token::new(1, Address::from_bytes([byte; 20]), 18)
    }

    #[test]
    fn test_add_and_subtract_same_token() {
        let a = TokenAmount::new(token(1), BigUint::from(70u32)).unwrap();
        let b = TokenAmount::new(token(1), BigUint::from(30u32)).unwrap();
        assert_eq!(a.add(&b).unwrap().raw(), &BigUint::from(100u32));
        assert_eq!(a.subtract(&b).unwrap().raw(), &BigUint::from(40u32));
    }

    #[test]
    fn test_mixed_tokens_are_rejected() {
        let a = TokenAmount::new(token(1), BigUint::from(70u32)).unwrap();
        let b = TokenAmount::new(token(2), BigUint::from(30u32)).unwrap();
        assert_eq!(a.add(&b), Err(PairError::InvariantViolation("TOKEN")));
        assert_eq!(a.subtract(&b), Err(PairError::InvariantViolation("TOKEN")));
    }

    #[test]
    fn test_subtract_below_zero_is_rejected() {
        let a = TokenAmount::new(token(1), BigUint::from(1u32)).unwrap();
        let b = TokenAmount::new(token(1), BigUint::from(2u32)).unwrap();
        assert_eq!(a.subtract(&b), Err(PairError::InvariantViolation("AMOUNT")));
    }

    #[test]
    fn test_uint256_bound() {
        assert!(TokenAmount::new(token(1), max_uint256()).is_ok());
        assert_eq!(
            TokenAmount::new(token(1), max_uint256() + 1u32),
            Err(PairError::InvariantViolation("AMOUNT"))
        );
    }

    #[test]
    fn test_display_and_json() {
        let amount = TokenAmount::new(
            token(1).with_metadata("DAI", "Dai Stablecoin"),
            BigUint::from(5u32),
        )
        .unwrap();
        assert_eq!(amount.to_string(), "5 DAI");

        let json = serde_json::to_value(&amount).unwrap();
        assert_eq!(json["raw"], "5");
        let back: TokenAmount = serde_json::from_value(json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_json_enforces_uint256_bound() {
        let mut json = serde_json::to_value(TokenAmount::zero(token(1))).unwrap();
        json["raw"] = serde_json::Value::String(max_uint256().to_string());
        assert!(serde_json::from_value::<TokenAmount>(json.clone()).is_ok());

        json["raw"] = serde_json::Value::String((max_uint256() + 1u32).to_string());
        let err = serde_json::from_value::<TokenAmount>(json).unwrap_err();
        assert!(err.to_string().contains("AMOUNT"), "{}", err);
    }
}
