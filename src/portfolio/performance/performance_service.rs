use chrono::{Datelike, Duration, NaiveDate};
use dashmap::DashMap;
use log::warn;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::categories::{Category, CategoryConfig};
use crate::constants::QUOTE_LOOKBACK_DAYS;
use crate::errors::Result;
use crate::ledger::{Ledger, TransactionKind};
use crate::market_data::{MarketDataProviderTrait, Quote};
use crate::portfolio::snapshot::LotTracker;
use crate::splits::SplitAdjusterTrait;

use super::performance_model::{
    AnnualPerformanceRow, CategoryAmount, MonthlyInvestmentRow, PerformanceSample, SymbolAmount,
};

/// Replays the ledger date by date against historical closes to produce the
/// value/cost-basis time series and its derived tables. Each request
/// recomputes the full series from the ledger snapshot it was handed, so
/// the output is always consistent with one generation.
pub struct PerformanceService {
    market_data: Arc<dyn MarketDataProviderTrait>,
    split_adjuster: Arc<dyn SplitAdjusterTrait>,
}

impl PerformanceService {
    pub fn new(
        market_data: Arc<dyn MarketDataProviderTrait>,
        split_adjuster: Arc<dyn SplitAdjusterTrait>,
    ) -> Self {
        PerformanceService {
            market_data,
            split_adjuster,
        }
    }

    /// One sample per calendar day in `[start_date, end_date]` (defaulting
    /// to first-transaction-date through `as_of`). Days without a close for a symbol
    /// are valued with the most recent close within the lookback window;
    /// cash values at face amount.
    pub async fn historical_values(
        &self,
        ledger: &Ledger,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        as_of: NaiveDate,
    ) -> Result<Vec<PerformanceSample>> {
        if ledger.is_empty() {
            return Ok(Vec::new());
        }
        let start = match start_date.or_else(|| ledger.first_date()) {
            Some(date) => date,
            None => return Ok(Vec::new()),
        };
        let end = end_date.unwrap_or(as_of).min(as_of);
        if end < start {
            return Ok(Vec::new());
        }

        let symbols = ledger.traded_symbols();
        let fetch_start = start - Duration::days(QUOTE_LOOKBACK_DAYS);
        let quotes = match self
            .market_data
            .get_historical_quotes(&symbols, fetch_start, end)
            .await
        {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(
                    "Historical quotes unavailable ({}); series will carry cost basis only",
                    e
                );
                HashMap::new()
            }
        };
        let close_cache: DashMap<(String, NaiveDate), Option<Decimal>> = DashMap::new();

        let mut tracker = LotTracker::new(self.split_adjuster.clone(), as_of);
        let transactions = ledger.transactions();
        let mut next_tx = 0;
        while next_tx < transactions.len() && transactions[next_tx].date < start {
            tracker.apply_transaction(&transactions[next_tx])?;
            next_tx += 1;
        }

        let mut samples = Vec::new();
        let mut current = start;
        while current <= end {
            while next_tx < transactions.len() && transactions[next_tx].date <= current {
                tracker.apply_transaction(&transactions[next_tx])?;
                next_tx += 1;
            }

            let mut investment_value = Decimal::ZERO;
            let mut cost_basis = Decimal::ZERO;
            for position in tracker.positions() {
                cost_basis += position.cost_basis;
                match Self::last_available_close(&position.symbol, current, &quotes, &close_cache)
                {
                    Some(close) => investment_value += position.quantity * close,
                    None => warn!("No close for {} on or before {}", position.symbol, current),
                }
            }
            let cash_value = tracker.cash_balance(current);
            let value = investment_value + cash_value;

            if value > Decimal::ZERO || next_tx > 0 {
                samples.push(PerformanceSample {
                    date: current,
                    value,
                    investment_value,
                    cost_basis,
                    cash_value,
                });
            }
            current = current + Duration::days(1);
        }

        Ok(samples)
    }

    /// Close for the symbol on `date`, forward-filled from the most recent
    /// close within the lookback window.
    fn last_available_close(
        symbol: &str,
        date: NaiveDate,
        quotes: &HashMap<(String, NaiveDate), Quote>,
        cache: &DashMap<(String, NaiveDate), Option<Decimal>>,
    ) -> Option<Decimal> {
        *cache
            .entry((symbol.to_string(), date))
            .or_insert_with(|| {
                (0..=QUOTE_LOOKBACK_DAYS).find_map(|days_back| {
                    quotes
                        .get(&(symbol.to_string(), date - Duration::days(days_back)))
                        .map(|quote| quote.close)
                })
            })
    }

    /// Month-by-month invested amounts from transactions alone.
    pub fn investment_history(
        &self,
        ledger: &Ledger,
        categories: &CategoryConfig,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        as_of: NaiveDate,
    ) -> Result<Vec<MonthlyInvestmentRow>> {
        if ledger.is_empty() {
            return Ok(Vec::new());
        }
        let start = match start_date.or_else(|| ledger.first_date()) {
            Some(date) => date,
            None => return Ok(Vec::new()),
        };
        let end = end_date.unwrap_or(as_of);

        // BUY amounts grouped per month, by symbol and by category.
        struct MonthBucket {
            buys: BTreeMap<String, Decimal>,
            by_category: HashMap<Category, Decimal>,
        }
        let mut months: BTreeMap<String, MonthBucket> = BTreeMap::new();
        for tx in ledger.transactions() {
            if tx.date < start || tx.date > end {
                continue;
            }
            if let TransactionKind::Buy { amount, .. } = &tx.kind {
                let bucket = months
                    .entry(tx.date.format("%Y-%m").to_string())
                    .or_insert_with(|| MonthBucket {
                        buys: BTreeMap::new(),
                        by_category: HashMap::new(),
                    });
                *bucket.buys.entry(tx.symbol.clone()).or_insert(Decimal::ZERO) += *amount;
                *bucket
                    .by_category
                    .entry(categories.resolve(&tx.symbol))
                    .or_insert(Decimal::ZERO) += *amount;
            }
        }

        let mut tracker = LotTracker::new(self.split_adjuster.clone(), as_of);
        let transactions = ledger.transactions();
        let mut next_tx = 0;
        while next_tx < transactions.len() && transactions[next_tx].date < start {
            tracker.apply_transaction(&transactions[next_tx])?;
            next_tx += 1;
        }
        let mut prev_cost_basis = Self::open_cost_basis(&tracker);

        let mut rows = Vec::with_capacity(months.len());
        for (month, bucket) in months {
            let month_end = Self::end_of_month(&month).ok_or_else(|| {
                crate::portfolio::portfolio_errors::CalculatorError::Calculation(format!(
                    "invalid month key {}",
                    month
                ))
            })?;
            while next_tx < transactions.len() && transactions[next_tx].date <= month_end {
                tracker.apply_transaction(&transactions[next_tx])?;
                next_tx += 1;
            }

            let cost_basis = Self::open_cost_basis(&tracker);
            let net_investment = cost_basis - prev_cost_basis;
            prev_cost_basis = cost_basis;

            let buys = bucket
                .buys
                .into_iter()
                .filter(|(_, amount)| amount.is_sign_positive())
                .map(|(symbol, amount)| SymbolAmount { symbol, amount })
                .collect();
            let mut by_category: Vec<CategoryAmount> = bucket
                .by_category
                .into_iter()
                .map(|(category, amount)| CategoryAmount { category, amount })
                .collect();
            by_category.sort_by(|a, b| b.amount.abs().cmp(&a.amount.abs()));

            rows.push(MonthlyInvestmentRow {
                month,
                cost_basis,
                net_investment,
                buys,
                by_category,
            });
        }

        Ok(rows)
    }

    fn open_cost_basis(tracker: &LotTracker) -> Decimal {
        tracker
            .positions()
            .iter()
            .map(|position| position.cost_basis)
            .sum()
    }

    fn end_of_month(month: &str) -> Option<NaiveDate> {
        let (year, month) = month.split_once('-')?;
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        let next_month_start = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(next_month_start - Duration::days(1))
    }
}

/// Chained yearly buckets over a daily series. Year one starts at its
/// starting cost basis; every later year starts at the prior year's end
/// value. Intra-year cash-flow timing is deliberately ignored.
pub fn annual_table(samples: &[PerformanceSample]) -> Vec<AnnualPerformanceRow> {
    let mut rows: Vec<AnnualPerformanceRow> = Vec::new();
    let mut prev_end_value: Option<Decimal> = None;
    let mut prev_cost_basis: Option<Decimal> = None;

    let mut years: BTreeMap<i32, (&PerformanceSample, &PerformanceSample)> = BTreeMap::new();
    for sample in samples {
        years
            .entry(sample.date.year())
            .and_modify(|(first, last)| {
                if sample.date < first.date {
                    *first = sample;
                }
                if sample.date > last.date {
                    *last = sample;
                }
            })
            .or_insert((sample, sample));
    }

    for (year, (first, last)) in years {
        let start_cost_basis = prev_cost_basis.unwrap_or(first.cost_basis);
        let start_value = prev_end_value.unwrap_or(start_cost_basis);
        let net_invested = last.cost_basis - start_cost_basis;
        let pnl = last.value - start_value - net_invested;
        let denominator = start_value + net_invested;
        let pnl_percent = if denominator.is_zero() {
            Decimal::ZERO
        } else {
            pnl / denominator * Decimal::ONE_HUNDRED
        };

        rows.push(AnnualPerformanceRow {
            year,
            start_value,
            end_value: last.value,
            net_invested,
            pnl,
            pnl_percent,
        });

        prev_end_value = Some(last.value);
        prev_cost_basis = Some(last.cost_basis);
    }

    rows
}
