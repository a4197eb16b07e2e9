use chrono::NaiveDate;
use futures::future::join_all;
use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::CASH_SYMBOL;
use crate::market_data::{LatestQuotePair, MarketDataProviderTrait};
use crate::portfolio::performance::AnnualizedReturnCalculator;
use crate::portfolio::snapshot::PositionSnapshot;

use super::super::portfolio_model::Holding;

/// Attaches market prices to position snapshots. Quote lookups run per
/// symbol so that one failing symbol degrades to an unpriced holding while
/// the rest value normally.
pub struct Valuator {
    market_data: Arc<dyn MarketDataProviderTrait>,
}

impl Valuator {
    pub fn new(market_data: Arc<dyn MarketDataProviderTrait>) -> Self {
        Valuator { market_data }
    }

    pub async fn value_positions(
        &self,
        positions: &[PositionSnapshot],
        cash_balance: Decimal,
        as_of: NaiveDate,
    ) -> Vec<Holding> {
        let symbols: Vec<String> = positions.iter().map(|p| p.symbol.clone()).collect();
        let quote_pairs = self.fetch_quote_pairs(&symbols).await;

        let mut holdings: Vec<Holding> = positions
            .iter()
            .map(|position| Self::value_position(position, quote_pairs.get(&position.symbol), as_of))
            .collect();

        if cash_balance.is_sign_positive() && !cash_balance.is_zero() {
            holdings.push(Self::cash_holding(cash_balance));
        }
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        holdings
    }

    async fn fetch_quote_pairs(&self, symbols: &[String]) -> HashMap<String, LatestQuotePair> {
        let lookups = symbols.iter().map(|symbol| {
            let market_data = self.market_data.clone();
            async move {
                let result = market_data.get_latest_quote_pair(symbol).await;
                (symbol.clone(), result)
            }
        });

        let mut quote_pairs = HashMap::new();
        for (symbol, result) in join_all(lookups).await {
            match result {
                Ok(pair) => {
                    quote_pairs.insert(symbol, pair);
                }
                Err(e) => {
                    warn!("No quote for {}: {}. Holding stays unpriced.", symbol, e);
                }
            }
        }
        quote_pairs
    }

    fn value_position(
        position: &PositionSnapshot,
        quote_pair: Option<&LatestQuotePair>,
        as_of: NaiveDate,
    ) -> Holding {
        let holding_days = position
            .oldest_acquired
            .map(|acquired| (as_of - acquired).num_days().max(1))
            .unwrap_or(0);

        let mut holding = Holding {
            symbol: position.symbol.clone(),
            quantity: position.quantity,
            avg_cost: position.average_cost,
            cost_basis: position.cost_basis,
            current_price: None,
            market_value: None,
            unrealized_pnl: None,
            pnl_percent: None,
            prev_close: None,
            daily_change_amount: None,
            daily_change_percent: None,
            holding_days,
            annualized_return: None,
            weighted_annualized_return: None,
        };

        let Some(quote_pair) = quote_pair else {
            return holding;
        };

        let price = quote_pair.latest.close;
        let market_value = position.quantity * price;
        let unrealized_pnl = market_value - position.cost_basis;
        holding.current_price = Some(price);
        holding.market_value = Some(market_value);
        holding.unrealized_pnl = Some(unrealized_pnl);
        holding.pnl_percent = if position.cost_basis.is_sign_positive() {
            Some(unrealized_pnl / position.cost_basis * Decimal::ONE_HUNDRED)
        } else {
            // Zero cost basis (gift-only positions): percent is undefined.
            None
        };

        holding.annualized_return = holding
            .pnl_percent
            .and_then(|pnl| AnnualizedReturnCalculator::annualized_return(pnl, holding_days));
        holding.weighted_annualized_return =
            AnnualizedReturnCalculator::weighted_annualized_return(&position.lots, price, as_of);

        if let Some(previous) = &quote_pair.previous {
            if previous.close.is_sign_positive() {
                holding.prev_close = Some(previous.close);
                holding.daily_change_amount = Some((price - previous.close) * position.quantity);
                holding.daily_change_percent =
                    Some((price - previous.close) / previous.close * Decimal::ONE_HUNDRED);
            }
        }

        holding
    }

    /// Cash values at face: price and market value are the balance itself.
    fn cash_holding(cash_balance: Decimal) -> Holding {
        Holding {
            symbol: CASH_SYMBOL.to_string(),
            quantity: Decimal::ONE,
            avg_cost: cash_balance,
            cost_basis: cash_balance,
            current_price: Some(cash_balance),
            market_value: Some(cash_balance),
            unrealized_pnl: Some(Decimal::ZERO),
            pnl_percent: Some(Decimal::ZERO),
            prev_close: None,
            daily_change_amount: Some(Decimal::ZERO),
            daily_change_percent: Some(Decimal::ZERO),
            holding_days: 0,
            annualized_return: None,
            weighted_annualized_return: None,
        }
    }
}
