pub(crate) mod market_data_errors;
pub(crate) mod market_data_model;
pub(crate) mod market_data_provider;
pub(crate) mod market_data_traits;

pub use market_data_errors::MarketDataError;
pub use market_data_model::{LatestQuotePair, Quote};
pub use market_data_provider::InMemoryProvider;
pub use market_data_traits::MarketDataProviderTrait;
