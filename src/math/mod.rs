pub mod constant_product;
pub mod fixed_point;
pub mod stable;

pub use constant_product::FeeRate;
pub use fixed_point::{div, from_scaled, isqrt, mul, pow10, scale, to_scaled};
pub use stable::NewtonOutcome;
