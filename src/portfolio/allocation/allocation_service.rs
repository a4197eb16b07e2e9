use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::categories::{Category, CategoryConfig};

use super::super::portfolio_model::Holding;
use super::allocation_model::{AllocationReport, AllocationTotals, CategoryAllocation};

/// Rolls valued holdings up by category. Unknown market values contribute
/// nothing to the sums, so the rows always reconcile with the portfolio
/// totals computed the same way.
pub struct CategoryAggregator;

impl CategoryAggregator {
    pub fn aggregate(holdings: &[Holding], categories: &CategoryConfig) -> AllocationReport {
        struct Bucket {
            cost_basis: Decimal,
            market_value: Decimal,
            daily_change_amount: Decimal,
            pnl: Decimal,
        }

        let mut buckets: HashMap<Category, Bucket> = HashMap::new();
        for holding in holdings {
            let bucket = buckets
                .entry(categories.resolve(&holding.symbol))
                .or_insert(Bucket {
                    cost_basis: Decimal::ZERO,
                    market_value: Decimal::ZERO,
                    daily_change_amount: Decimal::ZERO,
                    pnl: Decimal::ZERO,
                });
            bucket.cost_basis += holding.cost_basis;
            bucket.market_value += holding.market_value.unwrap_or(Decimal::ZERO);
            bucket.daily_change_amount += holding.daily_change_amount.unwrap_or(Decimal::ZERO);
            bucket.pnl += holding.unrealized_pnl.unwrap_or(Decimal::ZERO);
        }

        let total_market_value: Decimal = buckets.values().map(|b| b.market_value).sum();

        let mut rows: Vec<CategoryAllocation> = buckets
            .into_iter()
            .map(|(category, bucket)| CategoryAllocation {
                category,
                cost_basis: bucket.cost_basis,
                market_value: bucket.market_value,
                daily_change_amount: bucket.daily_change_amount,
                pnl: bucket.pnl,
                pnl_percent: Self::percent_of(bucket.pnl, bucket.cost_basis),
                allocation_percent: Self::percent_of(bucket.market_value, total_market_value),
            })
            .collect();
        rows.sort_by(|a, b| b.market_value.cmp(&a.market_value));

        let totals = AllocationTotals {
            cost_basis: rows.iter().map(|r| r.cost_basis).sum(),
            market_value: total_market_value,
            daily_change_amount: rows.iter().map(|r| r.daily_change_amount).sum(),
            pnl: rows.iter().map(|r| r.pnl).sum(),
            pnl_percent: Self::percent_of(
                rows.iter().map(|r| r.pnl).sum::<Decimal>(),
                rows.iter().map(|r| r.cost_basis).sum::<Decimal>(),
            ),
        };

        AllocationReport { rows, totals }
    }

    fn percent_of(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
        if denominator.is_zero() {
            None
        } else {
            Some(numerator / denominator * Decimal::ONE_HUNDRED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, cost_basis: Decimal, market_value: Option<Decimal>) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            quantity: dec!(1),
            avg_cost: cost_basis,
            cost_basis,
            current_price: market_value,
            market_value,
            unrealized_pnl: market_value.map(|mv| mv - cost_basis),
            pnl_percent: None,
            prev_close: None,
            daily_change_amount: market_value.map(|_| dec!(5)),
            daily_change_percent: None,
            holding_days: 100,
            annualized_return: None,
            weighted_annualized_return: None,
        }
    }

    #[test]
    fn category_market_values_reconcile_with_total() {
        let holdings = vec![
            holding("AAPL", dec!(1000), Some(dec!(1200))),
            holding("BTC-USD", dec!(500), Some(dec!(900))),
            holding("VOO", dec!(2000), Some(dec!(2100))),
            holding("CASH", dec!(300), Some(dec!(300))),
        ];
        let report = CategoryAggregator::aggregate(&holdings, &CategoryConfig::default());

        let row_sum: Decimal = report.rows.iter().map(|r| r.market_value).sum();
        assert_eq!(row_sum, report.totals.market_value);
        assert_eq!(report.totals.market_value, dec!(4500));
        assert_eq!(report.rows.len(), 4);

        let allocation_sum: Decimal = report
            .rows
            .iter()
            .filter_map(|r| r.allocation_percent)
            .sum();
        assert!((allocation_sum - dec!(100)).abs() < dec!(0.0001));
    }

    #[test]
    fn unknown_market_values_do_not_count_as_zero_cost_losses() {
        let holdings = vec![holding("AAPL", dec!(1000), None)];
        let report = CategoryAggregator::aggregate(&holdings, &CategoryConfig::default());
        let row = &report.rows[0];
        assert_eq!(row.cost_basis, dec!(1000));
        assert_eq!(row.market_value, Decimal::ZERO);
        assert_eq!(row.pnl, Decimal::ZERO);
        assert!(row.allocation_percent.is_none());
    }
}
