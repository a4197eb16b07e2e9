use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::market_data_errors::MarketDataError;
use super::market_data_model::{LatestQuotePair, Quote};
use super::market_data_traits::MarketDataProviderTrait;

/// Quote store backed by memory. Embedders preload it with closes from
/// whatever source they use; tests drive it directly.
pub struct InMemoryProvider {
    closes: DashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        InMemoryProvider {
            closes: DashMap::new(),
        }
    }

    pub fn set_close(&self, symbol: &str, date: NaiveDate, close: Decimal) {
        self.closes
            .entry(symbol.to_string())
            .or_default()
            .insert(date, close);
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProviderTrait for InMemoryProvider {
    async fn get_latest_quote_pair(
        &self,
        symbol: &str,
    ) -> Result<LatestQuotePair, MarketDataError> {
        let history = self
            .closes
            .get(symbol)
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))?;
        let mut recent = history.iter().rev();
        let latest = recent
            .next()
            .map(|(date, close)| Quote::new(symbol, *date, *close))
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))?;
        let previous = recent
            .next()
            .map(|(date, close)| Quote::new(symbol, *date, *close));
        Ok(LatestQuotePair { latest, previous })
    }

    async fn get_historical_quotes(
        &self,
        symbols: &HashSet<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HashMap<(String, NaiveDate), Quote>, MarketDataError> {
        let mut quotes = HashMap::new();
        for symbol in symbols {
            if let Some(history) = self.closes.get(symbol) {
                for (date, close) in history.range(start_date..=end_date) {
                    quotes.insert(
                        (symbol.clone(), *date),
                        Quote::new(symbol, *date, *close),
                    );
                }
            }
        }
        Ok(quotes)
    }
}
