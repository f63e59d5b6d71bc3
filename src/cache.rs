//! Deterministic pair addresses and the caller-owned memo table for them.

use std::collections::HashMap;

use tracing::trace;

use crate::error::Result;
use crate::models::{Address, Token};
use crate::utils::keccak256;

/// CREATE2 parameters of a pair factory deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairAddressDeriver {
    pub factory: Address,
    pub init_code_hash: [u8; 32],
}

impl PairAddressDeriver {
    pub fn new(factory: Address, init_code_hash: [u8; 32]) -> Self {
        Self {
            factory,
            init_code_hash,
        }
    }

    /// `keccak256(0xff ++ factory ++ keccak256(token0 ++ token1) ++ init_code_hash)[12..]`
    /// for the tokens in canonical order.
    pub fn derive(&self, token_a: &Token, token_b: &Token) -> Result<Address> {
        let (token0, token1) = if token_a.sorts_before(token_b)? {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        let mut packed = [0u8; 40];
        packed[..20].copy_from_slice(token0.address.as_bytes());
        packed[20..].copy_from_slice(token1.address.as_bytes());
        let salt = keccak256(&packed);

        let mut preimage = Vec::with_capacity(85);
        preimage.push(0xff);
        preimage.extend_from_slice(self.factory.as_bytes());
        preimage.extend_from_slice(&salt);
        preimage.extend_from_slice(&self.init_code_hash);
        let hash = keccak256(&preimage);

        let mut out = [0u8; 20];
        out.copy_from_slice(&hash[12..]);
        Ok(Address::from_bytes(out))
    }
}

/// Memoizes [`PairAddressDeriver::derive`]. Grows without bound; callers that
/// see many pairs can [`clear`](Self::clear) it.
#[derive(Debug, Clone)]
pub struct PairAddressCache {
    deriver: PairAddressDeriver,
    entries: HashMap<(Address, Address), Address>,
}

impl PairAddressCache {
    pub fn new(deriver: PairAddressDeriver) -> Self {
        Self {
            deriver,
            entries: HashMap::new(),
        }
    }

    pub fn deriver(&self) -> &PairAddressDeriver {
        &self.deriver
    }

    pub fn get_address(&mut self, token_a: &Token, token_b: &Token) -> Result<Address> {
        let key = if token_a.sorts_before(token_b)? {
            (token_a.address, token_b.address)
        } else {
            (token_b.address, token_a.address)
        };
        if let Some(address) = self.entries.get(&key) {
            return Ok(*address);
        }
        let address = self.deriver.derive(token_a, token_b)?;
        trace!(token0 = %key.0, token1 = %key.1, pair = %address, "derived pair address");
        self.entries.insert(key, address);
        Ok(address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_hash32;

    fn mainnet_v2() -> PairAddressDeriver {
        PairAddressDeriver::new(
            "0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f".parse().unwrap(),
            parse_hash32("0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f")
                .unwrap(),
        )
    }

    fn usdc() -> Token {
        Token::new(1, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".parse().unwrap(), 6)
    }

    fn weth() -> Token {
        Token::new(1, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap(), 18)
    }

    #[test]
    fn test_derive_known_pair_address() {
        let address = mainnet_v2().derive(&usdc(), &weth()).unwrap();
        assert_eq!(
            address.to_string(),
            "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc"
        );
    }

    #[test]
    fn test_derive_is_order_independent() {
        let deriver = mainnet_v2();
        assert_eq!(
            deriver.derive(&usdc(), &weth()).unwrap(),
            deriver.derive(&weth(), &usdc()).unwrap()
        );
    }

    #[test]
    fn test_cache_memoizes_by_canonical_pair() {
        let mut cache = PairAddressCache::new(mainnet_v2());
        assert!(cache.is_empty());
        let first = cache.get_address(&weth(), &usdc()).unwrap();
        let second = cache.get_address(&usdc(), &weth()).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_same_token_is_rejected() {
        let mut cache = PairAddressCache::new(mainnet_v2());
        assert!(cache.get_address(&weth(), &weth()).is_err());
        assert!(cache.is_empty());
    }
}
