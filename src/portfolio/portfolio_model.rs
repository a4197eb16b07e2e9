use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::*;

use super::income::DividendSummary;
use super::snapshot::SoldLotRecord;

/// A valued open position as reported to callers. Price-derived fields are
/// `None` when no quote was available, never zero, so "unknown" cannot be
/// confused with "worthless".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde_option")]
    pub current_price: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub market_value: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub unrealized_pnl: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub pnl_percent: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub prev_close: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub daily_change_amount: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub daily_change_percent: Option<Decimal>,
    pub holding_days: i64,
    #[serde(with = "decimal_serde_option")]
    pub annualized_return: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub weighted_annualized_return: Option<Decimal>,
}

/// Portfolio-wide totals plus the holdings and dividend detail they were
/// derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    #[serde(with = "decimal_serde")]
    pub total_cost_basis: Decimal,
    /// Includes the cash holding.
    #[serde(with = "decimal_serde")]
    pub total_market_value: Decimal,
    /// Securities only.
    #[serde(with = "decimal_serde")]
    pub investment_market_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_unrealized_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_realized_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_pnl_percent: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_dividends: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_fees: Decimal,
    /// Open cost basis plus the cost basis of everything ever sold.
    #[serde(with = "decimal_serde")]
    pub all_time_cost_basis: Decimal,
    #[serde(with = "decimal_serde_option")]
    pub weighted_annualized_return: Option<Decimal>,
    pub holdings: Vec<Holding>,
    pub dividend_summaries: Vec<DividendSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldAssetsReport {
    pub sold_assets: Vec<SoldLotRecord>,
    #[serde(with = "decimal_serde")]
    pub total_cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_proceeds: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_pnl: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unpriced_holding_serializes_unknowns_as_null() {
        let holding = Holding {
            symbol: "AAPL".to_string(),
            quantity: dec!(10),
            avg_cost: dec!(150),
            cost_basis: dec!(1500),
            current_price: None,
            market_value: None,
            unrealized_pnl: None,
            pnl_percent: None,
            prev_close: None,
            daily_change_amount: None,
            daily_change_percent: None,
            holding_days: 365,
            annualized_return: None,
            weighted_annualized_return: None,
        };
        let value = serde_json::to_value(&holding).unwrap();
        assert_eq!(value["costBasis"], "1500");
        // Unknown prices must surface as null, never as zero.
        assert!(value["currentPrice"].is_null());
        assert!(value["marketValue"].is_null());
        assert!(value["unrealizedPnl"].is_null());
    }
}
