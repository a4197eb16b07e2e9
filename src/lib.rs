pub mod categories;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod market_data;
pub mod portfolio;
pub mod splits;
pub mod utils;

pub use errors::{Error, Result};
pub use ledger::*;
pub use portfolio::*;
