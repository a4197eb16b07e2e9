use num_traits::Zero;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::constants::DISPLAY_DECIMAL_PRECISION;

use super::income_model::{DividendReport, DividendSummary};

/// Summarizes DIV transactions per symbol with payment counts.
pub struct DividendAggregator;

impl DividendAggregator {
    pub fn summarize(dividends: &HashMap<String, Vec<Decimal>>) -> DividendReport {
        let mut by_symbol: Vec<DividendSummary> = dividends
            .iter()
            .filter(|(_, amounts)| !amounts.is_empty())
            .map(|(symbol, amounts)| DividendSummary {
                symbol: symbol.clone(),
                total_amount: amounts
                    .iter()
                    .sum::<Decimal>()
                    .round_dp(DISPLAY_DECIMAL_PRECISION),
                payment_count: amounts.len(),
            })
            .collect();
        by_symbol.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let total_dividends = by_symbol
            .iter()
            .fold(Decimal::zero(), |acc, summary| acc + summary.total_amount);

        DividendReport {
            total_dividends,
            by_symbol,
        }
    }
}
