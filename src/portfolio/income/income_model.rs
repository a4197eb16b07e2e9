use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::*;

/// Dividend income received from one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendSummary {
    pub symbol: String,
    #[serde(with = "decimal_serde")]
    pub total_amount: Decimal,
    pub payment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendReport {
    #[serde(with = "decimal_serde")]
    pub total_dividends: Decimal,
    pub by_symbol: Vec<DividendSummary>,
}
