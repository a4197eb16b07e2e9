pub(crate) mod categories_model;

pub use categories_model::{Category, CategoryConfig, CRYPTO_TICKER_SUFFIX};
