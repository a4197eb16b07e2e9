use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::QUANTITY_THRESHOLD;
use crate::utils::decimal_serde::*;

pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    let threshold =
        Decimal::from_str_radix(QUANTITY_THRESHOLD, 10).unwrap_or_else(|_| Decimal::new(1, 8));
    quantity.abs() >= threshold
}

/// A discrete acquisition of quantity at a specific unit cost and date.
/// `remaining_quantity` is drawn down by FIFO consumption; the lot is
/// removed from its queue when it reaches zero. Lots are owned exclusively
/// by the [`LotTracker`](super::LotTracker) of their symbol.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: String,
    pub symbol: String,
    pub acquired_date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub unit_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub remaining_quantity: Decimal,
}

impl Lot {
    pub fn remaining_cost_basis(&self) -> Decimal {
        self.remaining_quantity * self.unit_cost
    }
}

/// Aggregated live lots of one symbol, before valuation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionSnapshot {
    pub symbol: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub average_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    /// Acquisition date of the oldest lot that still has remaining quantity.
    pub oldest_acquired: Option<NaiveDate>,
    pub lots: Vec<Lot>,
}

/// Realized outcome of one SELL event. A single record covers all lots the
/// sale consumed; it is never revised by later events.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SoldLotRecord {
    pub id: String,
    pub symbol: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_sell_price: Decimal,
    #[serde(with = "decimal_serde")]
    pub proceeds: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub pnl_percent: Decimal,
    pub sell_date: NaiveDate,
    pub holding_days: i64,
}
