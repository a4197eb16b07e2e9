use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::constants::DECIMAL_PRECISION;

use super::snapshot_model::SoldLotRecord;

/// Slice of a lot consumed by one disposal, in split-adjusted units.
#[derive(Debug, Clone)]
pub(crate) struct ConsumedLot {
    pub acquired_date: NaiveDate,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}

/// Turns the consumed-lot detail of one SELL into its immutable
/// [`SoldLotRecord`].
pub struct RealizedPnlCalculator;

impl RealizedPnlCalculator {
    pub(crate) fn record_sale(
        id: &str,
        symbol: &str,
        consumed: &[ConsumedLot],
        sell_price: Decimal,
        sell_date: NaiveDate,
    ) -> SoldLotRecord {
        let quantity: Decimal = consumed.iter().map(|c| c.quantity).sum();
        let cost_basis: Decimal = consumed.iter().map(|c| c.quantity * c.unit_cost).sum();
        let avg_cost = if quantity.is_zero() {
            Decimal::ZERO
        } else {
            cost_basis / quantity
        };
        let proceeds = sell_price * quantity;
        let pnl = proceeds - cost_basis;
        let pnl_percent = if cost_basis.is_zero() {
            Decimal::ZERO
        } else {
            pnl / cost_basis * Decimal::ONE_HUNDRED
        };
        let holding_days = consumed
            .iter()
            .map(|c| c.acquired_date)
            .min()
            .map(|acquired| (sell_date - acquired).num_days().max(0))
            .unwrap_or(0);

        SoldLotRecord {
            id: id.to_string(),
            symbol: symbol.to_string(),
            quantity,
            avg_cost: avg_cost.round_dp(DECIMAL_PRECISION),
            cost_basis: cost_basis.round_dp(DECIMAL_PRECISION),
            avg_sell_price: sell_price,
            proceeds: proceeds.round_dp(DECIMAL_PRECISION),
            pnl: pnl.round_dp(DECIMAL_PRECISION),
            pnl_percent: pnl_percent.round_dp(DECIMAL_PRECISION),
            sell_date,
            holding_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn single_lot_sale() {
        let consumed = vec![ConsumedLot {
            acquired_date: date("2023-01-10"),
            quantity: dec!(5),
            unit_cost: dec!(150),
        }];
        let record =
            RealizedPnlCalculator::record_sale("s1", "AAPL", &consumed, dec!(200), date("2024-01-10"));

        assert_eq!(record.quantity, dec!(5));
        assert_eq!(record.avg_cost, dec!(150));
        assert_eq!(record.cost_basis, dec!(750));
        assert_eq!(record.proceeds, dec!(1000));
        assert_eq!(record.pnl, dec!(250));
        assert_eq!(record.pnl_percent, dec!(33.333333));
        assert_eq!(record.holding_days, 365);
    }

    #[test]
    fn multi_lot_sale_weights_avg_cost_by_consumed_quantity() {
        let consumed = vec![
            ConsumedLot {
                acquired_date: date("2023-01-10"),
                quantity: dec!(10),
                unit_cost: dec!(100),
            },
            ConsumedLot {
                acquired_date: date("2023-06-10"),
                quantity: dec!(5),
                unit_cost: dec!(130),
            },
        ];
        let record =
            RealizedPnlCalculator::record_sale("s1", "VOO", &consumed, dec!(140), date("2024-01-10"));

        assert_eq!(record.quantity, dec!(15));
        assert_eq!(record.cost_basis, dec!(1650));
        assert_eq!(record.avg_cost, dec!(110));
        assert_eq!(record.proceeds, dec!(2100));
        assert_eq!(record.pnl, dec!(450));
        // Holding days anchor at the earliest consumed lot.
        assert_eq!(record.holding_days, 365);
    }

    #[test]
    fn zero_cost_basis_reports_zero_percent() {
        let consumed = vec![ConsumedLot {
            acquired_date: date("2023-01-10"),
            quantity: dec!(3),
            unit_cost: Decimal::ZERO,
        }];
        let record =
            RealizedPnlCalculator::record_sale("s1", "GIFTED", &consumed, dec!(10), date("2023-02-10"));
        assert_eq!(record.pnl, dec!(30));
        assert_eq!(record.pnl_percent, Decimal::ZERO);
    }
}
