use thiserror::Error;

/// Failures raised by pair pricing and liquidity accounting.
///
/// A failed call never touches the pair it was invoked on; the caller still
/// holds the original snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    /// A reserve is zero, or an exact-out request meets or exceeds the reserve.
    #[error("insufficient reserves")]
    InsufficientReserves,

    /// The trade or mint truncates to nothing under integer rounding.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// Caller broke a precondition (foreign token, mismatched liquidity token, ...).
    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),
}

pub type Result<T> = std::result::Result<T, PairError>;

/// Return `InvariantViolation(tag)` unless `cond` holds.
pub(crate) fn ensure(cond: bool, tag: &'static str) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(PairError::InvariantViolation(tag))
    }
}
