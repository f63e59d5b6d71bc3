pub mod pair;
pub mod price;
pub mod token;
pub mod token_amount;

pub use pair::Pair;
pub use price::Price;
pub use token::{Address, Token};
pub use token_amount::TokenAmount;
