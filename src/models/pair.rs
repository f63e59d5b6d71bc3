use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;
use tracing::debug;

use crate::cache::PairAddressCache;
use crate::constants::{
    LIQUIDITY_TOKEN_DECIMALS, LIQUIDITY_TOKEN_NAME, LIQUIDITY_TOKEN_SYMBOL, MINIMUM_LIQUIDITY,
    PROTOCOL_FEE_MULTIPLIER,
};
use crate::curve::{Curve, Pricer, SwapContext};
use crate::error::{ensure, PairError, Result};
use crate::math::isqrt;
use crate::models::{Address, Price, Token, TokenAmount};

/// Immutable snapshot of a two-token pool.
///
/// Reserves are kept in canonical token order (`token0` sorts before
/// `token1`). Operations that move reserves return a new `Pair` and leave
/// `self` as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    liquidity_token: Token,
    token_amounts: [TokenAmount; 2],
    curve: Curve,
}

/// Order two amounts by their tokens.
fn sort_amounts(a: TokenAmount, b: TokenAmount) -> Result<[TokenAmount; 2]> {
    if a.token.sorts_before(&b.token)? {
        Ok([a, b])
    } else {
        Ok([b, a])
    }
}

impl Pair {
    /// Build a pair whose liquidity token address comes from `cache`.
    pub fn new(
        amount_a: TokenAmount,
        amount_b: TokenAmount,
        curve: Curve,
        cache: &mut PairAddressCache,
    ) -> Result<Self> {
        let address = cache.get_address(&amount_a.token, &amount_b.token)?;
        Self::with_liquidity_address(amount_a, amount_b, curve, address)
    }

    /// Build a pair with an already-known liquidity token address.
    pub fn with_liquidity_address(
        amount_a: TokenAmount,
        amount_b: TokenAmount,
        curve: Curve,
        liquidity_address: Address,
    ) -> Result<Self> {
        let token_amounts = sort_amounts(amount_a, amount_b)?;
        let liquidity_token = Token::new(
            token_amounts[0].token.chain_id,
            liquidity_address,
            LIQUIDITY_TOKEN_DECIMALS,
        )
        .with_metadata(LIQUIDITY_TOKEN_SYMBOL, LIQUIDITY_TOKEN_NAME);
        Ok(Self {
            liquidity_token,
            token_amounts,
            curve,
        })
    }

    fn with_reserves(&self, amount_a: TokenAmount, amount_b: TokenAmount) -> Result<Self> {
        Ok(Self {
            liquidity_token: self.liquidity_token.clone(),
            token_amounts: sort_amounts(amount_a, amount_b)?,
            curve: self.curve,
        })
    }

    pub fn liquidity_token(&self) -> &Token {
        &self.liquidity_token
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn chain_id(&self) -> u64 {
        self.token0().chain_id
    }

    pub fn token0(&self) -> &Token {
        &self.token_amounts[0].token
    }

    pub fn token1(&self) -> &Token {
        &self.token_amounts[1].token
    }

    pub fn reserve0(&self) -> &TokenAmount {
        &self.token_amounts[0]
    }

    pub fn reserve1(&self) -> &TokenAmount {
        &self.token_amounts[1]
    }

    /// "SYMBOL0/SYMBOL1", falling back to addresses for unnamed tokens.
    pub fn name(&self) -> String {
        format!(
            "{}/{}",
            self.token0().symbol_or_address(),
            self.token1().symbol_or_address()
        )
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        token.equals(self.token0()) || token.equals(self.token1())
    }

    pub fn reserve_of(&self, token: &Token) -> Result<&TokenAmount> {
        ensure(self.involves_token(token), "TOKEN")?;
        Ok(if token.equals(self.token0()) {
            self.reserve0()
        } else {
            self.reserve1()
        })
    }

    fn other_token(&self, token: &Token) -> &Token {
        if token.equals(self.token0()) {
            self.token1()
        } else {
            self.token0()
        }
    }

    /// Mid price of token0 in token1 (`reserve1 / reserve0`).
    pub fn token0_price(&self) -> Price {
        Price::new(
            self.token0().clone(),
            self.token1().clone(),
            self.reserve0().raw().clone(),
            self.reserve1().raw().clone(),
        )
    }

    /// Mid price of token1 in token0 (`reserve0 / reserve1`).
    pub fn token1_price(&self) -> Price {
        Price::new(
            self.token1().clone(),
            self.token0().clone(),
            self.reserve1().raw().clone(),
            self.reserve0().raw().clone(),
        )
    }

    pub fn price_of(&self, token: &Token) -> Result<Price> {
        ensure(self.involves_token(token), "TOKEN")?;
        Ok(if token.equals(self.token0()) {
            self.token0_price()
        } else {
            self.token1_price()
        })
    }

    /// The active curve's invariant at the current reserves.
    pub fn invariant(&self) -> BigUint {
        let (r0, r1) = (self.reserve0(), self.reserve1());
        self.curve.invariant(&SwapContext {
            reserve_in: r0.raw(),
            reserve_out: r1.raw(),
            decimals_in: r0.token.decimals,
            decimals_out: r1.token.decimals,
        })
    }

    fn ensure_reserves(&self) -> Result<()> {
        if self.reserve0().is_zero() || self.reserve1().is_zero() {
            return Err(PairError::InsufficientReserves);
        }
        Ok(())
    }

    /// Exact-in swap: what `input_amount` buys, and the pool after the trade.
    pub fn get_output_amount(&self, input_amount: &TokenAmount) -> Result<(TokenAmount, Pair)> {
        ensure(self.involves_token(&input_amount.token), "TOKEN")?;
        self.ensure_reserves()?;

        let input_reserve = self.reserve_of(&input_amount.token)?;
        let output_token = self.other_token(&input_amount.token);
        let output_reserve = self.reserve_of(output_token)?;

        let raw = self.curve.compute_output(
            input_amount.raw(),
            &SwapContext {
                reserve_in: input_reserve.raw(),
                reserve_out: output_reserve.raw(),
                decimals_in: input_reserve.token.decimals,
                decimals_out: output_token.decimals,
            },
        )?;
        let output_amount = TokenAmount::new(output_token.clone(), raw)?;
        if output_amount.is_zero() {
            return Err(PairError::InsufficientInputAmount);
        }

        let next = self.with_reserves(
            input_reserve.add(input_amount)?,
            output_reserve.subtract(&output_amount)?,
        )?;
        debug!(
            pair = %self.name(),
            curve = self.curve.name(),
            input = %input_amount,
            output = %output_amount,
            "exact-in quote"
        );
        Ok((output_amount, next))
    }

    /// Exact-out swap: what must be paid to receive `output_amount`, and the
    /// pool after the trade.
    pub fn get_input_amount(&self, output_amount: &TokenAmount) -> Result<(TokenAmount, Pair)> {
        ensure(self.involves_token(&output_amount.token), "TOKEN")?;
        self.ensure_reserves()?;
        let output_reserve = self.reserve_of(&output_amount.token)?;
        if output_amount.raw() >= output_reserve.raw() {
            return Err(PairError::InsufficientReserves);
        }

        let input_token = self.other_token(&output_amount.token);
        let input_reserve = self.reserve_of(input_token)?;

        let raw = self.curve.compute_input(
            output_amount.raw(),
            &SwapContext {
                reserve_in: input_reserve.raw(),
                reserve_out: output_reserve.raw(),
                decimals_in: input_token.decimals,
                decimals_out: output_reserve.token.decimals,
            },
        )?;
        let input_amount = TokenAmount::new(input_token.clone(), raw)?;

        let next = self.with_reserves(
            input_reserve.add(&input_amount)?,
            output_reserve.subtract(output_amount)?,
        )?;
        debug!(
            pair = %self.name(),
            curve = self.curve.name(),
            input = %input_amount,
            output = %output_amount,
            "exact-out quote"
        );
        Ok((input_amount, next))
    }

    /// Liquidity tokens minted for depositing `amount_a` and `amount_b`.
    pub fn get_liquidity_minted(
        &self,
        total_supply: &TokenAmount,
        amount_a: &TokenAmount,
        amount_b: &TokenAmount,
    ) -> Result<TokenAmount> {
        ensure(total_supply.token.equals(&self.liquidity_token), "LIQUIDITY")?;
        let [amount0, amount1] = sort_amounts(amount_a.clone(), amount_b.clone())?;
        ensure(
            amount0.token.equals(self.token0()) && amount1.token.equals(self.token1()),
            "TOKEN",
        )?;

        let liquidity = if total_supply.is_zero() {
            let root = isqrt(&(amount0.raw() * amount1.raw()));
            let minimum = BigUint::from(MINIMUM_LIQUIDITY);
            if root <= minimum {
                return Err(PairError::InsufficientInputAmount);
            }
            root - minimum
        } else {
            self.ensure_reserves()?;
            let supply = total_supply.raw();
            let liquidity0 = amount0.raw() * supply / self.reserve0().raw();
            let liquidity1 = amount1.raw() * supply / self.reserve1().raw();
            liquidity0.min(liquidity1)
        };

        if liquidity.is_zero() {
            return Err(PairError::InsufficientInputAmount);
        }
        TokenAmount::new(self.liquidity_token.clone(), liquidity)
    }

    /// Amount of `token` redeemable for `liquidity` out of `total_supply`.
    ///
    /// With `fee_on`, the supply is first grown by the protocol-fee mint that
    /// the pool would perform on its next liquidity event, using `k_last`.
    pub fn get_liquidity_value(
        &self,
        token: &Token,
        total_supply: &TokenAmount,
        liquidity: &TokenAmount,
        fee_on: bool,
        k_last: Option<&BigUint>,
    ) -> Result<TokenAmount> {
        ensure(self.involves_token(token), "TOKEN")?;
        ensure(
            total_supply.token.equals(&self.liquidity_token),
            "TOTAL_SUPPLY",
        )?;
        ensure(liquidity.token.equals(&self.liquidity_token), "LIQUIDITY")?;
        ensure(liquidity.raw() <= total_supply.raw(), "LIQUIDITY")?;

        let adjusted_supply = if fee_on {
            let k_last = k_last.ok_or(PairError::InvariantViolation("K_LAST"))?;
            total_supply.raw() + self.protocol_fee_liquidity(total_supply.raw(), k_last)
        } else {
            total_supply.raw().clone()
        };
        ensure(!adjusted_supply.is_zero(), "TOTAL_SUPPLY")?;

        let reserve = self.reserve_of(token)?;
        TokenAmount::new(
            token.clone(),
            liquidity.raw() * reserve.raw() / adjusted_supply,
        )
    }

    /// Liquidity the protocol would mint to itself for the growth of
    /// `sqrt(k)` since `k_last`: `ts·(√k − √k_last) / (5·√k + √k_last)`.
    fn protocol_fee_liquidity(&self, total_supply: &BigUint, k_last: &BigUint) -> BigUint {
        if k_last.is_zero() {
            return BigUint::zero();
        }
        let root_k = isqrt(&(self.reserve0().raw() * self.reserve1().raw()));
        let root_k_last = isqrt(k_last);
        if root_k <= root_k_last {
            return BigUint::zero();
        }
        let numerator = total_supply * (&root_k - &root_k_last);
        let denominator = root_k * PROTOCOL_FEE_MULTIPLIER + root_k_last;
        numerator / denominator
    }
}
