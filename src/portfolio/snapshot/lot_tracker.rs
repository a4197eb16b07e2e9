use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use crate::ledger::{Ledger, Transaction, TransactionKind};
use crate::portfolio::portfolio_errors::CalculatorError;
use crate::splits::SplitAdjusterTrait;

use super::realized_pnl::{ConsumedLot, RealizedPnlCalculator};
use super::snapshot_model::{is_quantity_significant, Lot, PositionSnapshot, SoldLotRecord};

/// Reconstructs lot-level position state by applying ledger transactions in
/// order. Quantities and unit prices are restated in `as_of` split-adjusted
/// units as they are applied, so the queues always hold comparable numbers.
///
/// Transactions must arrive in non-decreasing date order (the [`Ledger`]
/// guarantees this); each symbol's queue is kept in acquisition order and
/// disposals consume from the front (FIFO).
pub struct LotTracker {
    split_adjuster: Arc<dyn SplitAdjusterTrait>,
    as_of: NaiveDate,
    lots: HashMap<String, VecDeque<Lot>>,
    dividends: HashMap<String, Vec<Decimal>>,
    cash_snapshots: BTreeMap<NaiveDate, Decimal>,
    total_fees: Decimal,
    sold: Vec<SoldLotRecord>,
}

impl LotTracker {
    pub fn new(split_adjuster: Arc<dyn SplitAdjusterTrait>, as_of: NaiveDate) -> Self {
        LotTracker {
            split_adjuster,
            as_of,
            lots: HashMap::new(),
            dividends: HashMap::new(),
            cash_snapshots: BTreeMap::new(),
            total_fees: Decimal::ZERO,
            sold: Vec::new(),
        }
    }

    /// Builds the tracker by replaying a whole ledger.
    pub fn replay(
        ledger: &Ledger,
        split_adjuster: Arc<dyn SplitAdjusterTrait>,
        as_of: NaiveDate,
    ) -> Result<Self, CalculatorError> {
        let mut tracker = LotTracker::new(split_adjuster, as_of);
        for tx in ledger.transactions() {
            tracker.apply_transaction(tx)?;
        }
        Ok(tracker)
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn apply_transaction(&mut self, tx: &Transaction) -> Result<(), CalculatorError> {
        match &tx.kind {
            TransactionKind::Buy {
                quantity,
                unit_price,
                ..
            } => {
                let factor = self.split_factor(tx);
                let unit_cost = Self::adjust_price(*unit_price, factor);
                self.add_lot(&tx.id, &tx.symbol, tx.date, *quantity * factor, unit_cost);
                Ok(())
            }
            TransactionKind::Sell { quantity, unit_price, .. } => {
                let factor = self.split_factor(tx);
                let sell_price = Self::adjust_price(*unit_price, factor);
                let consumed = self.consume_fifo(&tx.symbol, *quantity * factor)?;
                self.sold.push(RealizedPnlCalculator::record_sale(
                    &tx.id, &tx.symbol, &consumed, sell_price, tx.date,
                ));
                Ok(())
            }
            TransactionKind::Dividend { amount } => {
                self.dividends
                    .entry(tx.symbol.clone())
                    .or_default()
                    .push(*amount);
                Ok(())
            }
            TransactionKind::Gift { quantity } => {
                let factor = self.split_factor(tx);
                self.add_lot(&tx.id, &tx.symbol, tx.date, *quantity * factor, Decimal::ZERO);
                Ok(())
            }
            TransactionKind::Fee { amount } => {
                self.total_fees += *amount;
                Ok(())
            }
            TransactionKind::NetworkFee { quantity } => {
                let factor = self.split_factor(tx);
                // Quantity leaves the position; no cash or cost-basis effect.
                self.consume_fifo(&tx.symbol, *quantity * factor)?;
                Ok(())
            }
            TransactionKind::CashBalance { amount } => {
                self.cash_snapshots.insert(tx.date, *amount);
                Ok(())
            }
            TransactionKind::Reconcile { quantity } => {
                let factor = self.split_factor(tx);
                self.reconcile(tx, *quantity * factor)
            }
        }
    }

    fn split_factor(&self, tx: &Transaction) -> Decimal {
        let factor = self
            .split_adjuster
            .adjustment_factor(&tx.symbol, tx.date, self.as_of);
        if factor.is_sign_positive() && !factor.is_zero() {
            factor
        } else {
            warn!(
                "Ignoring non-positive split factor {} for {} on {}",
                factor, tx.symbol, tx.date
            );
            Decimal::ONE
        }
    }

    fn adjust_price(price: Decimal, factor: Decimal) -> Decimal {
        if factor.is_zero() {
            price
        } else {
            price / factor
        }
    }

    fn add_lot(
        &mut self,
        id: &str,
        symbol: &str,
        acquired_date: NaiveDate,
        quantity: Decimal,
        unit_cost: Decimal,
    ) {
        if !quantity.is_sign_positive() {
            warn!(
                "Skipping lot for {} with non-positive quantity {}",
                symbol, quantity
            );
            return;
        }
        self.lots
            .entry(symbol.to_string())
            .or_default()
            .push_back(Lot {
                id: id.to_string(),
                symbol: symbol.to_string(),
                acquired_date,
                quantity,
                unit_cost,
                remaining_quantity: quantity,
            });
    }

    /// Consumes `quantity` from the front of the symbol's queue, oldest lot
    /// first. Fails without touching any lot when the queue holds less than
    /// requested.
    fn consume_fifo(
        &mut self,
        symbol: &str,
        quantity: Decimal,
    ) -> Result<Vec<ConsumedLot>, CalculatorError> {
        if !quantity.is_sign_positive() {
            return Err(CalculatorError::InvalidTransaction(format!(
                "quantity to consume must be positive, got {} for {}",
                quantity, symbol
            )));
        }

        let queue = match self.lots.get_mut(symbol) {
            Some(queue) => queue,
            None => {
                return Err(CalculatorError::Oversell {
                    symbol: symbol.to_string(),
                    requested: quantity,
                    available: Decimal::ZERO,
                })
            }
        };
        let available: Decimal = queue.iter().map(|lot| lot.remaining_quantity).sum();
        if quantity > available {
            return Err(CalculatorError::Oversell {
                symbol: symbol.to_string(),
                requested: quantity,
                available,
            });
        }
        let mut remaining = quantity;
        let mut consumed = Vec::new();

        while remaining > Decimal::ZERO {
            let Some(lot) = queue.front_mut() else { break };
            let take = lot.remaining_quantity.min(remaining);
            consumed.push(ConsumedLot {
                acquired_date: lot.acquired_date,
                quantity: take,
                unit_cost: lot.unit_cost,
            });
            lot.remaining_quantity -= take;
            remaining -= take;
            if !is_quantity_significant(&lot.remaining_quantity) {
                queue.pop_front();
            }
        }
        if queue.is_empty() {
            self.lots.remove(symbol);
        }

        Ok(consumed)
    }

    /// FIX: force the symbol's total quantity to `target`. A shortfall is
    /// covered by a zero-cost lot dated at the FIX transaction; excess is
    /// consumed FIFO.
    fn reconcile(&mut self, tx: &Transaction, target: Decimal) -> Result<(), CalculatorError> {
        let current: Decimal = self
            .lots
            .get(&tx.symbol)
            .map(|queue| queue.iter().map(|lot| lot.remaining_quantity).sum())
            .unwrap_or(Decimal::ZERO);

        if target > current {
            self.add_lot(&tx.id, &tx.symbol, tx.date, target - current, Decimal::ZERO);
        } else if target < current {
            self.consume_fifo(&tx.symbol, current - target)?;
        }
        Ok(())
    }

    /// Snapshot of one symbol's open position, or `None` when nothing
    /// significant remains.
    pub fn position(&self, symbol: &str) -> Option<PositionSnapshot> {
        let queue = self.lots.get(symbol)?;
        let quantity: Decimal = queue.iter().map(|lot| lot.remaining_quantity).sum();
        if !quantity.is_sign_positive() || !is_quantity_significant(&quantity) {
            return None;
        }
        let cost_basis: Decimal = queue.iter().map(|lot| lot.remaining_cost_basis()).sum();
        let oldest_acquired = queue.iter().map(|lot| lot.acquired_date).min();
        Some(PositionSnapshot {
            symbol: symbol.to_string(),
            quantity,
            average_cost: cost_basis / quantity,
            cost_basis,
            oldest_acquired,
            lots: queue.iter().cloned().collect(),
        })
    }

    /// All open positions, sorted by symbol.
    pub fn positions(&self) -> Vec<PositionSnapshot> {
        let mut positions: Vec<PositionSnapshot> = self
            .lots
            .keys()
            .filter_map(|symbol| self.position(symbol))
            .collect();
        positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        positions
    }

    /// Cash balance as of a date: the most recent CASH snapshot on or before
    /// it, zero when none applies.
    pub fn cash_balance(&self, as_of_date: NaiveDate) -> Decimal {
        self.cash_snapshots
            .range(..=as_of_date)
            .next_back()
            .map(|(_, amount)| *amount)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn dividends(&self) -> &HashMap<String, Vec<Decimal>> {
        &self.dividends
    }

    pub fn total_fees(&self) -> Decimal {
        self.total_fees
    }

    pub fn sold_records(&self) -> &[SoldLotRecord] {
        &self.sold
    }
}
