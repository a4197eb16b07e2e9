use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::categories::CategoryConfig;
use crate::constants::CASH_SYMBOL;
use crate::errors::Result;
use crate::ledger::{LedgerStoreTrait, TransactionRecord};
use crate::market_data::MarketDataProviderTrait;
use crate::splits::SplitAdjusterTrait;

use super::allocation::{AllocationReport, CategoryAggregator};
use super::income::{DividendAggregator, DividendReport};
use super::performance::{
    annual_table, AnnualPerformanceRow, MonthlyInvestmentRow, PerformanceSample,
    PerformanceService,
};
use super::portfolio_model::{Holding, PortfolioSummary, SoldAssetsReport};
use super::snapshot::LotTracker;
use super::valuation::Valuator;

type SeriesCacheKey = (u64, Option<NaiveDate>, Option<NaiveDate>, NaiveDate);

/// Front door of the engine. Every call derives its answer from the current
/// ledger generation; nothing here mutates lot state between requests, so
/// calls are safe to issue concurrently with an upload/reload.
pub struct PortfolioService {
    ledger_store: Arc<dyn LedgerStoreTrait>,
    split_adjuster: Arc<dyn SplitAdjusterTrait>,
    categories: CategoryConfig,
    valuator: Valuator,
    performance: PerformanceService,
    // Replayed series keyed by (generation, range, as-of). Entries from
    // older generations are pruned when a newer one is inserted.
    series_cache: DashMap<SeriesCacheKey, Vec<PerformanceSample>>,
}

impl PortfolioService {
    pub fn new(
        ledger_store: Arc<dyn LedgerStoreTrait>,
        market_data: Arc<dyn MarketDataProviderTrait>,
        split_adjuster: Arc<dyn SplitAdjusterTrait>,
        categories: CategoryConfig,
    ) -> Self {
        PortfolioService {
            ledger_store,
            split_adjuster: split_adjuster.clone(),
            categories,
            valuator: Valuator::new(market_data.clone()),
            performance: PerformanceService::new(market_data, split_adjuster),
            series_cache: DashMap::new(),
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn tracker(&self, as_of: NaiveDate) -> Result<LotTracker> {
        let ledger = self.ledger_store.current();
        Ok(LotTracker::replay(
            &ledger,
            self.split_adjuster.clone(),
            as_of,
        )?)
    }

    /// Validates and installs a new transaction set, invalidating every
    /// derived cache. Returns the new generation.
    pub fn replace_transactions(&self, records: &[TransactionRecord]) -> Result<u64> {
        let ledger = self.ledger_store.replace(records)?;
        self.series_cache.clear();
        Ok(ledger.generation())
    }

    /// Current holdings with live valuation, cash included.
    pub async fn holdings(&self) -> Result<Vec<Holding>> {
        let as_of = Self::today();
        let tracker = self.tracker(as_of)?;
        let positions = tracker.positions();
        Ok(self
            .valuator
            .value_positions(&positions, tracker.cash_balance(as_of), as_of)
            .await)
    }

    /// Holdings plus portfolio-wide totals and dividend detail.
    pub async fn summary(&self) -> Result<PortfolioSummary> {
        let as_of = Self::today();
        let tracker = self.tracker(as_of)?;
        let positions = tracker.positions();
        let holdings = self
            .valuator
            .value_positions(&positions, tracker.cash_balance(as_of), as_of)
            .await;

        let investments: Vec<&Holding> =
            holdings.iter().filter(|h| h.symbol != CASH_SYMBOL).collect();
        let cash_value: Decimal = holdings
            .iter()
            .filter(|h| h.symbol == CASH_SYMBOL)
            .filter_map(|h| h.market_value)
            .sum();

        let total_cost_basis: Decimal = investments.iter().map(|h| h.cost_basis).sum();
        let investment_market_value: Decimal =
            investments.iter().filter_map(|h| h.market_value).sum();
        let total_unrealized_pnl: Decimal =
            investments.iter().filter_map(|h| h.unrealized_pnl).sum();

        let sold = tracker.sold_records();
        let total_realized_pnl: Decimal = sold.iter().map(|s| s.pnl).sum();
        let sold_cost_basis: Decimal = sold.iter().map(|s| s.cost_basis).sum();

        let dividend_report = DividendAggregator::summarize(tracker.dividends());

        let all_time_cost_basis = total_cost_basis + sold_cost_basis;
        let total_pnl = total_realized_pnl + total_unrealized_pnl;
        let total_pnl_percent = if all_time_cost_basis.is_sign_positive() {
            total_pnl / all_time_cost_basis * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        // Portfolio-level lot-weighted CAGR. Per-symbol results already
        // weight by lot cost basis, and those weights sum to the position's
        // cost basis, so weighting the symbol results by cost basis gives
        // the portfolio-wide blend.
        let mut weighted_sum = Decimal::ZERO;
        let mut total_weight = Decimal::ZERO;
        for holding in &investments {
            if let Some(weighted) = holding.weighted_annualized_return {
                if holding.cost_basis.is_sign_positive() {
                    weighted_sum += weighted * holding.cost_basis;
                    total_weight += holding.cost_basis;
                }
            }
        }
        let weighted_annualized_return = if total_weight.is_sign_positive() {
            Some(weighted_sum / total_weight)
        } else {
            None
        };

        Ok(PortfolioSummary {
            total_cost_basis,
            total_market_value: investment_market_value + cash_value,
            investment_market_value,
            total_unrealized_pnl,
            total_realized_pnl,
            total_pnl,
            total_pnl_percent,
            total_dividends: dividend_report.total_dividends,
            total_fees: tracker.total_fees(),
            all_time_cost_basis,
            weighted_annualized_return,
            holdings,
            dividend_summaries: dividend_report.by_symbol,
        })
    }

    /// Daily value series over the requested range ("ALL" when unbounded).
    /// Memoized per ledger generation; identical requests against the same
    /// generation return the identical series.
    pub async fn performance(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PerformanceSample>> {
        let ledger = self.ledger_store.current();
        let as_of = Self::today();
        let key = (ledger.generation(), start_date, end_date, as_of);

        if let Some(cached) = self.series_cache.get(&key) {
            debug!(
                "Serving performance series for generation {} from cache",
                ledger.generation()
            );
            return Ok(cached.clone());
        }

        let samples = self
            .performance
            .historical_values(&ledger, start_date, end_date, as_of)
            .await?;
        self.series_cache
            .retain(|(generation, ..), _| *generation == ledger.generation());
        self.series_cache.insert(key, samples.clone());
        Ok(samples)
    }

    /// Chained yearly table over the full series.
    pub async fn annual_performance(&self) -> Result<Vec<AnnualPerformanceRow>> {
        let samples = self.performance(None, None).await?;
        Ok(annual_table(&samples))
    }

    /// Monthly invested amounts; transaction-only, so it works without any
    /// price data.
    pub fn investment_history(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<MonthlyInvestmentRow>> {
        let ledger = self.ledger_store.current();
        self.performance.investment_history(
            &ledger,
            &self.categories,
            start_date,
            end_date,
            Self::today(),
        )
    }

    /// Realized sales with totals.
    pub fn sold_assets(&self) -> Result<SoldAssetsReport> {
        let tracker = self.tracker(Self::today())?;
        let sold_assets = tracker.sold_records().to_vec();
        let total_cost_basis = sold_assets.iter().map(|s| s.cost_basis).sum();
        let total_proceeds = sold_assets.iter().map(|s| s.proceeds).sum();
        let total_pnl = sold_assets.iter().map(|s| s.pnl).sum();
        Ok(SoldAssetsReport {
            sold_assets,
            total_cost_basis,
            total_proceeds,
            total_pnl,
        })
    }

    /// Dividend income per symbol with payment counts.
    pub fn dividends(&self) -> Result<DividendReport> {
        let tracker = self.tracker(Self::today())?;
        Ok(DividendAggregator::summarize(tracker.dividends()))
    }

    /// Category allocation of the valued holdings.
    pub async fn allocations(&self) -> Result<AllocationReport> {
        let holdings = self.holdings().await?;
        Ok(CategoryAggregator::aggregate(&holdings, &self.categories))
    }
}
