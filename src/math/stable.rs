//! Stable-swap invariant `x·y·(x² + y²) = k` in 18-decimal fixed point, and
//! the Newton solver that finds the output reserve after a trade.
//!
//! Every `/ SCALE` below truncates on its own. The grouping is part of the
//! pricing contract: reassociating a product changes the result by rounding
//! and would make quotes disagree with other implementations of the curve.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::{debug, trace, warn};

use super::fixed_point::{div, mul, scale, to_scaled};
use crate::constants::MAX_NEWTON_ITERATIONS;

/// Result of a bounded Newton solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewtonOutcome {
    pub y: BigUint,
    /// Steps taken, including the one that met the convergence bound.
    pub iterations: u32,
    /// `false` when the step budget ran out or the derivative vanished.
    pub converged: bool,
}

/// Invariant for raw reserves `x`, `y` carrying `decimals_x` / `decimals_y`
/// fractional digits.
pub fn k(x: &BigUint, y: &BigUint, decimals_x: u8, decimals_y: u8) -> BigUint {
    let s = scale();
    let x = to_scaled(x, decimals_x);
    let y = to_scaled(y, decimals_y);
    let a = (&x * &y) / &s;
    let b = (&x * &x) / &s + (&y * &y) / &s;
    a * b / s
}

/// Invariant as a function of `y` with the other side held at `x0`:
/// `x0·y³ + x0³·y`, both already scaled.
pub fn f(x0: &BigUint, y: &BigUint) -> BigUint {
    let s = scale();
    let y_cubed = ((y * y) / &s * y) / &s;
    let x0_cubed = ((x0 * x0) / &s * x0) / &s;
    (x0 * y_cubed) / &s + (x0_cubed * y) / &s
}

/// `∂f/∂y = 3·x0·y² + x0³`, the Newton step denominator.
pub fn d(x0: &BigUint, y: &BigUint) -> BigUint {
    let s = scale();
    let y_squared = (y * y) / &s;
    let x0_cubed = ((x0 * x0) / &s * x0) / &s;
    (BigUint::from(3u32) * x0 * y_squared) / &s + x0_cubed
}

/// Output-side reserve `y` such that `f(x0, y) ≈ xy`, starting from `y`.
///
/// Best effort: if the iteration budget is exhausted the last iterate is
/// returned as-is.
pub fn get_y(x0: &BigUint, xy: &BigUint, y: &BigUint) -> BigUint {
    solve_y(x0, xy, y).y
}

/// One Newton step from `y` towards `f(x0, y) = xy`. `None` when the
/// derivative vanishes.
fn newton_step(x0: &BigUint, xy: &BigUint, y: &BigUint, s: &BigUint) -> Option<BigUint> {
    let k = f(x0, y);
    let slope = d(x0, y);
    if k < *xy {
        let dy = div(&mul(&(xy - &k), s), &slope)?;
        Some(y + dy)
    } else {
        let dy = div(&mul(&(&k - xy), s), &slope)?;
        if dy > *y {
            warn!(%y, %dy, "newton step overshoots zero, clamping");
            Some(BigUint::zero())
        } else {
            Some(y - dy)
        }
    }
}

/// [`get_y`] with iteration diagnostics.
pub fn solve_y(x0: &BigUint, xy: &BigUint, y: &BigUint) -> NewtonOutcome {
    let s = scale();
    let one = BigUint::one();
    let mut y = y.clone();

    for i in 0..MAX_NEWTON_ITERATIONS {
        let Some(next) = newton_step(x0, xy, &y, &s) else {
            warn!(%x0, %y, "stable-swap derivative vanished, stopping solver");
            return NewtonOutcome {
                y,
                iterations: i,
                converged: false,
            };
        };
        trace!(iteration = i, y = %next, "newton step");

        let delta = if next > y { &next - &y } else { &y - &next };
        y = next;
        if delta <= one {
            return NewtonOutcome {
                y,
                iterations: i + 1,
                converged: true,
            };
        }
    }

    debug!(%x0, %xy, %y, "stable-swap solver hit iteration cap");
    NewtonOutcome {
        y,
        iterations: MAX_NEWTON_ITERATIONS,
        converged: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn e18(n: u64) -> BigUint {
        BigUint::from(n) * scale()
    }

    #[test]
    fn test_k_balanced_pool() {
        // x = y = 1.0 -> 1 * (1 + 1) = 2.0
        let one = e18(1);
        assert_eq!(k(&one, &one, 18, 18), e18(2));
    }

    #[test]
    fn test_k_normalizes_decimals() {
        // 100 USDC (6 decimals) against 100 DAI (18 decimals) is a balanced pool
        let usdc = BigUint::from(100_000_000u64);
        let dai = e18(100);
        assert_eq!(k(&usdc, &dai, 6, 18), k(&dai, &dai, 18, 18));
    }

    #[test]
    fn test_f_matches_k_at_the_reserves() {
        let x = e18(100);
        let y = e18(90);
        // f(x, y) = x·y³ + x³·y = xy(x² + y²); exact here since every
        // intermediate is a whole multiple of SCALE
        assert_eq!(f(&x, &y), k(&x, &y, 18, 18));
    }

    #[test]
    fn test_d_is_partial_derivative() {
        let x0 = e18(2);
        let y = e18(3);
        // 3·2·9 + 8 = 62
        assert_eq!(d(&x0, &y), e18(62));
    }

    #[test]
    fn test_get_y_is_fixed_point_without_trade() {
        let x = e18(100);
        let y = e18(90);
        let xy = k(&x, &y, 18, 18);
        let outcome = solve_y(&x, &xy, &y);
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.y, y);
    }

    #[test]
    fn test_get_y_decreases_output_reserve() {
        let x = e18(100);
        let y = e18(90);
        let xy = k(&x, &y, 18, 18);
        let x0 = &x + e18(1);
        let outcome = solve_y(&x0, &xy, &y);
        assert!(outcome.converged);
        assert!(outcome.y < y);
        // a near-peg stable curve pays out close to 1:1
        let out = &y - &outcome.y;
        assert!(out > e18(1) * 9u32 / 10u32);
        assert!(out < e18(2));
    }

    #[test]
    fn test_solver_stops_when_derivative_vanishes() {
        let outcome = solve_y(&BigUint::zero(), &BigUint::one(), &BigUint::zero());
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 0);
    }

    fn big(n: u128) -> BigUint {
        BigUint::from(n)
    }

    fn residual(x0: &BigUint, xy: &BigUint, y: &BigUint) -> BigUint {
        let value = f(x0, y);
        if value > *xy {
            value - xy
        } else {
            xy - value
        }
    }

    /// Residuals `|f(x0, y) - xy|` before the first step and after each step.
    fn residual_trace(x0: &BigUint, xy: &BigUint, y: &BigUint) -> Vec<BigUint> {
        let s = scale();
        let mut y = y.clone();
        let mut trace = vec![residual(x0, xy, &y)];
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let Some(next) = newton_step(x0, xy, &y, &s) else {
                break;
            };
            trace.push(residual(x0, xy, &next));
            let delta = if next > y { &next - &y } else { &y - &next };
            let done = delta <= BigUint::one();
            y = next;
            if done {
                break;
            }
        }
        trace
    }

    #[test]
    fn test_solver_falls_back_at_iteration_cap() {
        // sub-token reserves: truncation in f() leaves the iterate bouncing
        // between two values 48_283_660 apart
        let reserve_in = big(1_167_230_837_989_631);
        let reserve_out = big(2_303_080_623_901_029);
        let xy = k(&reserve_in, &reserve_out, 18, 18);
        let x0 = &reserve_in + big(449_689_185_097_553);

        let outcome = solve_y(&x0, &xy, &reserve_out);
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, MAX_NEWTON_ITERATIONS);
        assert_eq!(outcome.y, big(1_843_407_405_185_711));
        assert!(residual(&x0, &xy, &outcome.y) <= BigUint::one());
        assert_eq!(get_y(&x0, &xy, &reserve_out), outcome.y);
    }

    #[test]
    fn test_residual_never_grows_between_steps() {
        let cases = [
            (e18(100), e18(90), e18(1)),
            (
                big(1_167_230_837_989_631),
                big(2_303_080_623_901_029),
                big(449_689_185_097_553),
            ),
        ];
        for (reserve_in, reserve_out, amount_in) in cases {
            let xy = k(&reserve_in, &reserve_out, 18, 18);
            let x0 = &reserve_in + &amount_in;
            let trace = residual_trace(&x0, &xy, &reserve_out);
            assert!(trace.len() > 2);
            assert!(trace.windows(2).all(|w| w[1] <= w[0]), "{:?}", trace);
        }
    }

    proptest! {
        #[test]
        fn prop_residual_is_non_increasing(
            reserve_in in 10_000_000_000_000u128..100_000_000_000_000_000u128,
            ratio_bps in 5_000u32..20_000u32,
            input_bps in 1u32..5_000u32,
        ) {
            let reserve_in = BigUint::from(reserve_in);
            let reserve_out = &reserve_in * ratio_bps / 10_000u32;
            let amount_in = &reserve_in * input_bps / 10_000u32;
            let xy = k(&reserve_in, &reserve_out, 18, 18);
            let x0 = &reserve_in + &amount_in;

            let trace = residual_trace(&x0, &xy, &reserve_out);
            prop_assert!(trace.windows(2).all(|w| w[1] <= w[0]));
        }

        #[test]
        fn prop_get_y_converges_and_preserves_invariant(
            reserve_in in 1_000_000_000_000_000_000u128..1_000_000_000_000_000_000_000_000_000_000u128,
            ratio_bps in 5_000u32..20_000u32,
            input_bps in 1u32..5_000u32,
        ) {
            let reserve_in = BigUint::from(reserve_in);
            let reserve_out = &reserve_in * ratio_bps / 10_000u32;
            prop_assume!(!reserve_out.is_zero());
            let amount_in = &reserve_in * input_bps / 10_000u32;

            let xy = k(&reserve_in, &reserve_out, 18, 18);
            let x0 = &reserve_in + &amount_in;
            let outcome = solve_y(&x0, &xy, &reserve_out);

            prop_assert!(outcome.converged);
            prop_assert!(outcome.iterations <= MAX_NEWTON_ITERATIONS);
            prop_assert!(outcome.y <= reserve_out);

            // the solved reserve sits within the convergence slack of the curve
            let slack = BigUint::from(2u32);
            prop_assert!(f(&x0, &(&outcome.y + &slack)) >= xy);
        }
    }
}
