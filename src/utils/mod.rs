use std::str::FromStr;

use num_bigint::BigUint;
use sha3::{Digest, Keccak256};

use crate::error::{PairError, Result};

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// Parse a base-10 integer such as `"1000000000000000000"`. Underscores are
/// accepted as digit separators.
pub fn parse_amount(text: &str) -> Result<BigUint> {
    let cleaned = text.trim().replace('_', "");
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PairError::InvalidAmount(text.to_string()));
    }
    BigUint::from_str(&cleaned).map_err(|e| PairError::InvalidAmount(format!("{}: {}", text, e)))
}

/// Decode a 32-byte hash given as hex, with or without `0x`.
pub fn parse_hash32(text: &str) -> Result<[u8; 32]> {
    let body = text.strip_prefix("0x").unwrap_or(text);
    let bytes =
        hex::decode(body).map_err(|e| PairError::InvalidHash(format!("{}: {}", text, e)))?;
    if bytes.len() != 32 {
        return Err(PairError::InvalidHash(format!(
            "{}: hash must be 32 bytes, got {}",
            text,
            bytes.len()
        )));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Serde adapter writing `BigUint` as a decimal string, so JSON consumers
/// never round large amounts through f64.
pub mod biguint_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_amount(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("42").unwrap(), BigUint::from(42u32));
        assert_eq!(
            parse_amount("1_000_000_000_000_000_000").unwrap(),
            BigUint::from(1_000_000_000_000_000_000u64)
        );
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("1.5").is_err());
    }

    #[test]
    fn test_parse_hash32() {
        let hash = parse_hash32(
            "0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f",
        )
        .unwrap();
        assert_eq!(hash[0], 0x96);
        assert_eq!(hash[31], 0x5f);
        assert!(matches!(parse_hash32("0xabcd"), Err(PairError::InvalidHash(_))));
        assert!(matches!(parse_hash32("0xzz"), Err(PairError::InvalidHash(_))));
    }
}
