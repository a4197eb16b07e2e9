use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::utils::decimal_serde::*;

/// Per-category aggregate of the valued holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAllocation {
    pub category: Category,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub market_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub daily_change_amount: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl: Decimal,
    #[serde(with = "decimal_serde_option")]
    pub pnl_percent: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub allocation_percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationTotals {
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub market_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub daily_change_amount: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl: Decimal,
    #[serde(with = "decimal_serde_option")]
    pub pnl_percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    pub rows: Vec<CategoryAllocation>,
    pub totals: AllocationTotals,
}
