use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};

use crate::constants::{DAYS_PER_YEAR, DECIMAL_PRECISION};
use crate::portfolio::snapshot::Lot;

/// Derives compound annual growth rates for holdings and their lots.
pub struct AnnualizedReturnCalculator;

impl AnnualizedReturnCalculator {
    /// CAGR for a whole holding given its total return and age. Holds under
    /// a year are floored to one year so a short swing does not annualize
    /// into an extreme figure.
    pub fn annualized_return(pnl_percent: Decimal, holding_days: i64) -> Option<Decimal> {
        let years = Self::years_for_calc(holding_days);
        let growth = Decimal::ONE + pnl_percent / Decimal::ONE_HUNDRED;
        if !growth.is_sign_positive() {
            return None;
        }
        growth
            .checked_powd(Decimal::ONE / years)
            .map(|g| ((g - Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(DECIMAL_PRECISION))
    }

    /// Cost-basis-weighted CAGR across the remaining lots, each annualized
    /// over its own age. This respects the acquisition timing of every
    /// tranche instead of treating the position as bought all at once.
    /// Zero-cost lots carry no weight and are skipped.
    pub fn weighted_annualized_return(
        lots: &[Lot],
        current_price: Decimal,
        as_of: NaiveDate,
    ) -> Option<Decimal> {
        let mut weighted_sum = Decimal::ZERO;
        let mut total_weight = Decimal::ZERO;

        for lot in lots {
            if !lot.remaining_quantity.is_sign_positive() {
                continue;
            }
            let cost = lot.remaining_cost_basis();
            if !cost.is_sign_positive() {
                continue;
            }

            let holding_days = (as_of - lot.acquired_date).num_days().max(1);
            let years = Self::years_for_calc(holding_days);
            let growth = lot.remaining_quantity * current_price / cost;
            if !growth.is_sign_positive() {
                continue;
            }
            if let Some(g) = growth.checked_powd(Decimal::ONE / years) {
                let cagr = (g - Decimal::ONE) * Decimal::ONE_HUNDRED;
                weighted_sum += cost * cagr;
                total_weight += cost;
            }
        }

        if total_weight.is_sign_positive() {
            Some((weighted_sum / total_weight).round_dp(DECIMAL_PRECISION))
        } else {
            None
        }
    }

    fn years_for_calc(holding_days: i64) -> Decimal {
        let years = Decimal::from(holding_days.max(0)) / Decimal::from(DAYS_PER_YEAR);
        years.max(Decimal::ONE)
    }
}
