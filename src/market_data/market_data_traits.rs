use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use super::market_data_errors::MarketDataError;
use super::market_data_model::{LatestQuotePair, Quote};

/// Seam to the external price collaborator. Lookups may block on network
/// I/O; callers are expected to tolerate per-symbol failures and degrade to
/// missing data instead of aborting.
#[async_trait]
pub trait MarketDataProviderTrait: Send + Sync {
    /// Latest close and prior trading day's close for one symbol.
    async fn get_latest_quote_pair(&self, symbol: &str)
        -> Result<LatestQuotePair, MarketDataError>;

    /// Daily closes for the symbols over `[start_date, end_date]`, keyed by
    /// (symbol, date). Non-trading days simply have no entry.
    async fn get_historical_quotes(
        &self,
        symbols: &HashSet<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HashMap<(String, NaiveDate), Quote>, MarketDataError>;
}
