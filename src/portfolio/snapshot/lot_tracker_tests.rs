use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::ledger::{Transaction, TransactionKind};
use crate::portfolio::portfolio_errors::CalculatorError;
use crate::splits::{NoSplitAdjustment, SplitTable};

use super::lot_tracker::LotTracker;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tx(date_str: &str, symbol: &str, kind: TransactionKind) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", symbol, date_str, kind.action().as_str()),
        date: date(date_str),
        symbol: symbol.to_string(),
        kind,
        source: None,
        comment: None,
    }
}

fn buy(date_str: &str, symbol: &str, quantity: Decimal, unit_price: Decimal) -> Transaction {
    tx(
        date_str,
        symbol,
        TransactionKind::Buy {
            quantity,
            unit_price,
            amount: quantity * unit_price,
        },
    )
}

fn sell(date_str: &str, symbol: &str, quantity: Decimal, unit_price: Decimal) -> Transaction {
    tx(
        date_str,
        symbol,
        TransactionKind::Sell {
            quantity,
            unit_price,
            amount: quantity * unit_price,
        },
    )
}

fn tracker(as_of: &str) -> LotTracker {
    LotTracker::new(Arc::new(NoSplitAdjustment), date(as_of))
}

#[test]
fn buy_creates_position() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&buy("2024-01-10", "AAPL", dec!(10), dec!(150)))
        .unwrap();

    let position = tracker.position("AAPL").unwrap();
    assert_eq!(position.quantity, dec!(10));
    assert_eq!(position.average_cost, dec!(150));
    assert_eq!(position.cost_basis, dec!(1500));
    assert_eq!(position.oldest_acquired, Some(date("2024-01-10")));
}

#[test]
fn remaining_lot_quantities_always_sum_to_position_quantity() {
    let mut tracker = tracker("2024-06-01");
    let txs = vec![
        buy("2024-01-10", "VOO", dec!(10), dec!(400)),
        buy("2024-02-10", "VOO", dec!(4), dec!(420)),
        sell("2024-03-01", "VOO", dec!(7), dec!(430)),
        tx(
            "2024-03-15",
            "VOO",
            TransactionKind::Gift { quantity: dec!(2) },
        ),
        sell("2024-04-01", "VOO", dec!(3), dec!(440)),
    ];
    for t in &txs {
        tracker.apply_transaction(t).unwrap();
    }

    let position = tracker.position("VOO").unwrap();
    let lot_sum: Decimal = position.lots.iter().map(|l| l.remaining_quantity).sum();
    assert_eq!(lot_sum, position.quantity);
    assert_eq!(position.quantity, dec!(6));
}

#[test]
fn sell_consumes_oldest_lot_first_and_records_the_sale() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&buy("2023-06-01", "AAPL", dec!(10), dec!(150)))
        .unwrap();
    tracker
        .apply_transaction(&sell("2024-06-01", "AAPL", dec!(5), dec!(200)))
        .unwrap();

    let record = &tracker.sold_records()[0];
    assert_eq!(record.avg_cost, dec!(150));
    assert_eq!(record.cost_basis, dec!(750));
    assert_eq!(record.proceeds, dec!(1000));
    assert_eq!(record.pnl, dec!(250));
    assert_eq!(record.pnl_percent, dec!(33.333333));
    assert_eq!(record.sell_date, date("2024-06-01"));

    let position = tracker.position("AAPL").unwrap();
    assert_eq!(position.quantity, dec!(5));
    assert_eq!(position.cost_basis, dec!(750));
}

#[test]
fn sell_spanning_lots_emits_one_record() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&buy("2024-01-10", "MSFT", dec!(2), dec!(100)))
        .unwrap();
    tracker
        .apply_transaction(&buy("2024-02-10", "MSFT", dec!(4), dec!(130)))
        .unwrap();
    tracker
        .apply_transaction(&sell("2024-03-10", "MSFT", dec!(3), dec!(140)))
        .unwrap();

    assert_eq!(tracker.sold_records().len(), 1);
    let record = &tracker.sold_records()[0];
    assert_eq!(record.quantity, dec!(3));
    // 2 @ 100 from the first lot, 1 @ 130 from the second.
    assert_eq!(record.cost_basis, dec!(330));
    assert_eq!(record.avg_cost, dec!(110));

    let position = tracker.position("MSFT").unwrap();
    assert_eq!(position.quantity, dec!(3));
    assert_eq!(position.lots.len(), 1);
    assert_eq!(position.lots[0].remaining_quantity, dec!(3));
}

#[test]
fn oversell_fails_atomically() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&buy("2024-01-10", "AAPL", dec!(5), dec!(150)))
        .unwrap();

    let err = tracker
        .apply_transaction(&sell("2024-02-10", "AAPL", dec!(8), dec!(160)))
        .unwrap_err();
    match err {
        CalculatorError::Oversell {
            symbol,
            requested,
            available,
        } => {
            assert_eq!(symbol, "AAPL");
            assert_eq!(requested, dec!(8));
            assert_eq!(available, dec!(5));
        }
        other => panic!("expected oversell, got {:?}", other),
    }

    // Lot state is untouched and no sale was recorded.
    let position = tracker.position("AAPL").unwrap();
    assert_eq!(position.quantity, dec!(5));
    assert_eq!(position.lots[0].remaining_quantity, dec!(5));
    assert!(tracker.sold_records().is_empty());
}

#[test]
fn sell_of_unknown_symbol_is_an_oversell() {
    let mut tracker = tracker("2024-06-01");
    let err = tracker
        .apply_transaction(&sell("2024-02-10", "TSLA", dec!(1), dec!(200)))
        .unwrap_err();
    assert!(matches!(err, CalculatorError::Oversell { .. }));
}

#[test]
fn network_fee_reduces_quantity_without_a_sale_record() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&buy("2024-01-10", "ETH-USD", dec!(2), dec!(2500)))
        .unwrap();
    tracker
        .apply_transaction(&tx(
            "2024-02-10",
            "ETH-USD",
            TransactionKind::NetworkFee {
                quantity: dec!(0.05),
            },
        ))
        .unwrap();

    let position = tracker.position("ETH-USD").unwrap();
    assert_eq!(position.quantity, dec!(1.95));
    assert!(tracker.sold_records().is_empty());
}

#[test]
fn gift_lot_has_zero_cost() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&tx(
            "2024-01-10",
            "AAPL",
            TransactionKind::Gift { quantity: dec!(3) },
        ))
        .unwrap();

    let position = tracker.position("AAPL").unwrap();
    assert_eq!(position.quantity, dec!(3));
    assert_eq!(position.cost_basis, Decimal::ZERO);
    assert_eq!(position.average_cost, Decimal::ZERO);
}

#[test]
fn reconcile_adds_missing_quantity_as_zero_cost_lot() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&buy("2024-01-10", "BTC-USD", dec!(0.5), dec!(40000)))
        .unwrap();
    tracker
        .apply_transaction(&tx(
            "2024-03-01",
            "BTC-USD",
            TransactionKind::Reconcile {
                quantity: dec!(0.8),
            },
        ))
        .unwrap();

    let position = tracker.position("BTC-USD").unwrap();
    assert_eq!(position.quantity, dec!(0.8));
    assert_eq!(position.cost_basis, dec!(20000));
    assert_eq!(position.lots.len(), 2);
    assert_eq!(position.lots[1].unit_cost, Decimal::ZERO);
}

#[test]
fn reconcile_trims_excess_quantity_fifo() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&buy("2024-01-10", "BTC-USD", dec!(0.5), dec!(40000)))
        .unwrap();
    tracker
        .apply_transaction(&buy("2024-02-10", "BTC-USD", dec!(0.5), dec!(50000)))
        .unwrap();
    tracker
        .apply_transaction(&tx(
            "2024-03-01",
            "BTC-USD",
            TransactionKind::Reconcile {
                quantity: dec!(0.6),
            },
        ))
        .unwrap();

    let position = tracker.position("BTC-USD").unwrap();
    assert_eq!(position.quantity, dec!(0.6));
    // The older 40k lot went first.
    assert_eq!(position.cost_basis, dec!(29000));
}

#[test]
fn cash_balance_uses_latest_snapshot_on_or_before_date() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&tx(
            "2024-01-01",
            "CASH",
            TransactionKind::CashBalance {
                amount: dec!(1000),
            },
        ))
        .unwrap();
    tracker
        .apply_transaction(&tx(
            "2024-03-01",
            "CASH",
            TransactionKind::CashBalance {
                amount: dec!(2500),
            },
        ))
        .unwrap();

    assert_eq!(tracker.cash_balance(date("2023-12-31")), Decimal::ZERO);
    assert_eq!(tracker.cash_balance(date("2024-02-01")), dec!(1000));
    assert_eq!(tracker.cash_balance(date("2024-06-01")), dec!(2500));
}

#[test]
fn dividends_and_fees_accumulate_without_quantity_effects() {
    let mut tracker = tracker("2024-06-01");
    tracker
        .apply_transaction(&buy("2024-01-10", "VOO", dec!(10), dec!(400)))
        .unwrap();
    tracker
        .apply_transaction(&tx(
            "2024-03-20",
            "VOO",
            TransactionKind::Dividend { amount: dec!(15) },
        ))
        .unwrap();
    tracker
        .apply_transaction(&tx(
            "2024-04-01",
            "VOO",
            TransactionKind::Fee { amount: dec!(2.5) },
        ))
        .unwrap();

    assert_eq!(tracker.position("VOO").unwrap().quantity, dec!(10));
    assert_eq!(tracker.dividends()["VOO"], vec![dec!(15)]);
    assert_eq!(tracker.total_fees(), dec!(2.5));
}

#[test]
fn split_adjustment_restates_quantity_and_unit_cost() {
    let mut splits = SplitTable::new();
    splits.insert("NVDA", date("2024-06-10"), dec!(10));
    let mut tracker = LotTracker::new(Arc::new(splits), date("2024-12-01"));

    tracker
        .apply_transaction(&buy("2024-01-10", "NVDA", dec!(10), dec!(500)))
        .unwrap();

    let position = tracker.position("NVDA").unwrap();
    assert_eq!(position.quantity, dec!(100));
    assert_eq!(position.average_cost, dec!(50));
    // Cost basis is unchanged by the split.
    assert_eq!(position.cost_basis, dec!(5000));
}
