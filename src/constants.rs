/// Fractional digits of the fixed-point domain the stable-swap invariant lives in.
pub const SCALE_DECIMALS: u8 = 18;

/// `10^SCALE_DECIMALS`, fits in a u64.
pub const SCALE_U64: u64 = 1_000_000_000_000_000_000;

/// Liquidity permanently locked by the first mint.
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Upper bound on Newton steps in the stable-swap solver.
pub const MAX_NEWTON_ITERATIONS: u32 = 255;

/// Stable-swap exact-in fee: 99.6% of the input reaches the curve.
pub const STABLE_FEE_NUMERATOR: u64 = 996;
pub const STABLE_FEE_DENOMINATOR: u64 = 1_000;

/// Constant-product fee: 0.3% taken from the input.
pub const CONSTANT_PRODUCT_FEE_NUMERATOR: u64 = 997;
pub const CONSTANT_PRODUCT_FEE_DENOMINATOR: u64 = 1_000;

/// Protocol fee share denominator term: one sixth of growth in sqrt(k).
pub const PROTOCOL_FEE_MULTIPLIER: u64 = 5;

pub const LIQUIDITY_TOKEN_DECIMALS: u8 = 18;
pub const LIQUIDITY_TOKEN_SYMBOL: &str = "UNI-V2";
pub const LIQUIDITY_TOKEN_NAME: &str = "Uniswap V2";
