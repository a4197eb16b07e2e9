use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::CASH_SYMBOL;

/// Ticker suffix treated as a crypto listing when a symbol has no explicit
/// category override.
pub const CRYPTO_TICKER_SUFFIX: &str = "-USD";

/// Coarse asset classification used for allocation reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Crypto,
    Index,
    #[serde(rename = "Individual Stocks")]
    IndividualStocks,
    Cash,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Crypto => "Crypto",
            Category::Index => "Index",
            Category::IndividualStocks => "Individual Stocks",
            Category::Cash => "Cash",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol-to-category mapping. Resolution order: exact override, cash
/// symbol, crypto ticker suffix, then Individual Stocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    overrides: HashMap<String, Category>,
}

impl CategoryConfig {
    pub fn new(overrides: HashMap<String, Category>) -> Self {
        CategoryConfig { overrides }
    }

    /// Loads the override table from a JSON object, e.g.
    /// `{"MSTR": "Crypto", "VOO": "Index"}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let overrides: HashMap<String, Category> = serde_json::from_str(json)?;
        Ok(CategoryConfig::new(overrides))
    }

    pub fn resolve(&self, symbol: &str) -> Category {
        if let Some(category) = self.overrides.get(symbol) {
            return *category;
        }
        if symbol == CASH_SYMBOL {
            return Category::Cash;
        }
        if symbol.ends_with(CRYPTO_TICKER_SUFFIX) {
            return Category::Crypto;
        }
        Category::IndividualStocks
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        let mut overrides = HashMap::new();
        for symbol in ["BTC-USD", "ETH-USD", "MSTR", "CRCL", "IBIT"] {
            overrides.insert(symbol.to_string(), Category::Crypto);
        }
        for symbol in ["VOO", "QQQM", "QQQ", "BRK-B", "SOXX"] {
            overrides.insert(symbol.to_string(), Category::Index);
        }
        CategoryConfig { overrides }
    }
}
