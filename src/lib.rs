//! # stableswap-pair-rs
//!
//! Exact pricing for two-token liquidity pools. All arithmetic runs on
//! arbitrary-precision integers with an 18-digit fixed-point scale, so quotes
//! match the on-chain contracts bit for bit.
//!
//! ## Curves
//!
//! | Curve | Invariant | Exact-in | Exact-out |
//! |-------|-----------|----------|-----------|
//! | `Curve::StableSwap` | `x·y·(x² + y²) = k` | Newton solve, 0.4% fee | constant product, 0.3% fee |
//! | `Curve::ConstantProduct` | `x·y = k` | closed form, 0.3% fee | closed form, 0.3% fee |
//!
//! ## Quick Start
//!
//! ```rust
//! use num_bigint::BigUint;
//! use stableswap_pair_rs::{Address, Curve, Pair, Token, TokenAmount};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let usdc = Token::new(1, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".parse()?, 6);
//! let dai = Token::new(1, "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse()?, 18);
//!
//! let pair = Pair::with_liquidity_address(
//!     TokenAmount::new(usdc.clone(), BigUint::from(1_000_000_000u64))?,
//!     TokenAmount::new(dai.clone(), BigUint::from(1_000u64) * BigUint::from(10u64).pow(18))?,
//!     Curve::stable_swap(),
//!     Address::from_bytes([0xaa; 20]),
//! )?;
//!
//! let (dai_out, next) = pair.get_output_amount(&TokenAmount::new(usdc, BigUint::from(10_000_000u64))?)?;
//! assert_eq!(dai_out.token, dai);
//! assert!(next.invariant() >= pair.invariant());
//! # Ok(())
//! # }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # exact-in quote against a JSON pair snapshot
//! cargo run --release -- pair.json out 0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48 10000000
//!
//! # liquidity value with the protocol fee switched on
//! cargo run --release -- pair.json value 0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48 1000 500 250000
//! ```

pub mod cache;
pub mod constants;
pub mod curve;
pub mod error;
pub mod math;
pub mod models;
pub mod snapshot;
pub mod utils;

pub use cache::{PairAddressCache, PairAddressDeriver};
pub use curve::{ConstantProductPricer, Curve, Pricer, StableSwapPricer, SwapContext};
pub use error::PairError;
pub use math::FeeRate;
pub use models::{Address, Pair, Price, Token, TokenAmount};
pub use snapshot::{load_from_file, PairSnapshot};
