use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ensure, PairError, Result};
use crate::utils::keccak256;

/// A 20-byte account address. Byte order is the canonical token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Mixed-case checksum encoding (EIP-55).
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = PairError;

    /// Accepts `0x`-prefixed hex. All-lowercase and all-uppercase input is
    /// taken as-is; mixed case must carry a valid checksum.
    fn from_str(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| PairError::InvalidAddress(format!("{}: missing 0x prefix", s)))?;
        if body.len() != 40 {
            return Err(PairError::InvalidAddress(format!(
                "{}: expected 40 hex digits, got {}",
                s,
                body.len()
            )));
        }
        let decoded =
            hex::decode(body).map_err(|e| PairError::InvalidAddress(format!("{}: {}", s, e)))?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&decoded);
        let address = Address(bytes);

        let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *body {
            return Err(PairError::InvalidAddress(format!("{}: bad checksum", s)));
        }
        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// An ERC20-style token: identity is `(chain_id, address)`, the rest is metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Token {
    pub fn new(chain_id: u64, address: Address, decimals: u8) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: None,
            name: None,
        }
    }

    pub fn with_metadata(mut self, symbol: &str, name: &str) -> Self {
        self.symbol = Some(symbol.to_string());
        self.name = Some(name.to_string());
        self
    }

    /// Same chain and same address; metadata is ignored.
    pub fn equals(&self, other: &Token) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }

    /// Whether `self` comes first in a pair with `other`.
    ///
    /// Both tokens must live on the same chain and be distinct.
    pub fn sorts_before(&self, other: &Token) -> Result<bool> {
        ensure(self.chain_id == other.chain_id, "CHAIN_IDS")?;
        ensure(self.address != other.address, "ADDRESSES")?;
        Ok(self.address < other.address)
    }

    pub fn symbol_or_address(&self) -> String {
        match &self.symbol {
            Some(symbol) => symbol.clone(),
            None => self.address.to_string(),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}
