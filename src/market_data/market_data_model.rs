use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::*;

/// Daily close for a symbol as delivered by the external price source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub close: Decimal,
}

impl Quote {
    pub fn new(symbol: &str, date: NaiveDate, close: Decimal) -> Self {
        Quote {
            symbol: symbol.to_string(),
            date,
            close,
        }
    }
}

/// Latest close plus the prior trading day's close, used for daily-change
/// figures. `previous` is missing for newly listed symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestQuotePair {
    pub latest: Quote,
    pub previous: Option<Quote>,
}
