use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::utils::decimal_serde::*;

/// Portfolio state valued at the close of one date. `value` is
/// `investment_value` plus the cash balance; without CASH snapshots in the
/// ledger the two are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    pub date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub value: Decimal,
    #[serde(with = "decimal_serde")]
    pub investment_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub cash_value: Decimal,
}

/// One year of the chained annual table. Start values chain from the prior
/// year's end value, so the rows tell a continuous growth story. The
/// percent figure is a Dietz-style approximation: it nets the year's cash
/// flows without weighting them by their exact timing, a known limitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualPerformanceRow {
    pub year: i32,
    #[serde(with = "decimal_serde")]
    pub start_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub end_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub net_invested: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolAmount {
    pub symbol: String,
    #[serde(with = "decimal_serde")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmount {
    pub category: Category,
    #[serde(with = "decimal_serde")]
    pub amount: Decimal,
}

/// Month-by-month invested amounts derived from transactions alone; needs
/// no price data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInvestmentRow {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub net_investment: Decimal,
    pub buys: Vec<SymbolAmount>,
    pub by_category: Vec<CategoryAmount>,
}
