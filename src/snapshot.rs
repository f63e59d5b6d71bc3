//! JSON pair snapshots, the input format of the command-line front end.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{PairAddressCache, PairAddressDeriver};
use crate::curve::Curve;
use crate::models::{Address, Pair, Token, TokenAmount};
use crate::utils::{biguint_string, parse_hash32};

/// Everything needed to rebuild a [`Pair`]. The liquidity token address is
/// either given directly or derived from `factory` + `init_code_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSnapshot {
    pub token_a: Token,
    #[serde(with = "biguint_string")]
    pub reserve_a: BigUint,
    pub token_b: Token,
    #[serde(with = "biguint_string")]
    pub reserve_b: BigUint,
    #[serde(default)]
    pub curve: Curve,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity_token: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_code_hash: Option<String>,
}

impl PairSnapshot {
    pub fn into_pair(self) -> Result<Pair> {
        let amount_a = TokenAmount::new(self.token_a, self.reserve_a)?;
        let amount_b = TokenAmount::new(self.token_b, self.reserve_b)?;

        let pair = match (self.liquidity_token, self.factory, self.init_code_hash) {
            (Some(address), _, _) => {
                Pair::with_liquidity_address(amount_a, amount_b, self.curve, address)?
            }
            (None, Some(factory), Some(hash)) => {
                let deriver = PairAddressDeriver::new(factory, parse_hash32(&hash)?);
                let mut cache = PairAddressCache::new(deriver);
                Pair::new(amount_a, amount_b, self.curve, &mut cache)?
            }
            _ => {
                return Err(anyhow!(
                    "snapshot needs either liquidity_token or factory + init_code_hash"
                ))
            }
        };
        Ok(pair)
    }
}

/// Read a [`PairSnapshot`] from a JSON file. Curve fees are validated
/// while parsing; errors name the file and what was being read.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<PairSnapshot> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("cannot open pair snapshot {}", path.display()))?;
    let snapshot: PairSnapshot = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a valid pair snapshot", path.display()))?;
    debug!(
        path = %path.display(),
        token_a = %snapshot.token_a.address,
        token_b = %snapshot.token_b.address,
        curve = snapshot.curve.name(),
        "loaded pair snapshot"
    );
    Ok(snapshot)
}
