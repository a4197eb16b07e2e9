use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

use super::ledger_constants::*;
use super::ledger_errors::LedgerError;

/// Raw transaction row as delivered by the external ingestion layer.
/// Field requirements depend on the action and are checked when the row is
/// turned into a [`Transaction`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub asset: String,
    pub action: String,
    pub amount: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub ave_price: Option<Decimal>,
    pub source: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Dividend,
    Gift,
    Fee,
    NetworkFee,
    CashBalance,
    Reconcile,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => ACTION_BUY,
            Action::Sell => ACTION_SELL,
            Action::Dividend => ACTION_DIVIDEND,
            Action::Gift => ACTION_GIFT,
            Action::Fee => ACTION_FEE,
            Action::NetworkFee => ACTION_NETWORK_FEE,
            Action::CashBalance => ACTION_CASH_BALANCE,
            Action::Reconcile => ACTION_RECONCILE,
        }
    }

    /// Whether the action changes the quantity of a traded position.
    pub fn affects_quantity(&self) -> bool {
        matches!(
            self,
            Action::Buy | Action::Sell | Action::Gift | Action::NetworkFee | Action::Reconcile
        )
    }
}

impl FromStr for Action {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ACTION_BUY => Ok(Action::Buy),
            ACTION_SELL => Ok(Action::Sell),
            ACTION_DIVIDEND => Ok(Action::Dividend),
            ACTION_GIFT => Ok(Action::Gift),
            ACTION_FEE => Ok(Action::Fee),
            ACTION_NETWORK_FEE => Ok(Action::NetworkFee),
            ACTION_CASH_BALANCE => Ok(Action::CashBalance),
            ACTION_RECONCILE => Ok(Action::Reconcile),
            _ => Err(LedgerError::UnknownAction(s.to_string())),
        }
    }
}

/// Validated transaction payload. Each variant carries only the fields that
/// are legal for its action; anything derivable is derived at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TransactionKind {
    #[serde(rename = "BUY")]
    Buy {
        quantity: Decimal,
        unit_price: Decimal,
        amount: Decimal,
    },
    #[serde(rename = "SELL")]
    Sell {
        quantity: Decimal,
        unit_price: Decimal,
        amount: Decimal,
    },
    #[serde(rename = "DIV")]
    Dividend { amount: Decimal },
    #[serde(rename = "GIFT")]
    Gift { quantity: Decimal },
    #[serde(rename = "FEE")]
    Fee { amount: Decimal },
    #[serde(rename = "GAS")]
    NetworkFee { quantity: Decimal },
    #[serde(rename = "CASH")]
    CashBalance { amount: Decimal },
    #[serde(rename = "FIX")]
    Reconcile { quantity: Decimal },
}

impl TransactionKind {
    pub fn action(&self) -> Action {
        match self {
            TransactionKind::Buy { .. } => Action::Buy,
            TransactionKind::Sell { .. } => Action::Sell,
            TransactionKind::Dividend { .. } => Action::Dividend,
            TransactionKind::Gift { .. } => Action::Gift,
            TransactionKind::Fee { .. } => Action::Fee,
            TransactionKind::NetworkFee { .. } => Action::NetworkFee,
            TransactionKind::CashBalance { .. } => Action::CashBalance,
            TransactionKind::Reconcile { .. } => Action::Reconcile,
        }
    }
}

/// A single validated ledger transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub symbol: String,
    #[serde(flatten)]
    pub kind: TransactionKind,
    pub source: Option<String>,
    pub comment: Option<String>,
}

impl Transaction {
    /// Validates a raw record and builds the tagged transaction for its
    /// action. BUY/SELL need at least two of {amount, quantity, ave_price};
    /// the missing one is derived.
    pub fn from_record(record: &TransactionRecord) -> Result<Self, LedgerError> {
        let action = Action::from_str(record.action.trim())?;
        let symbol = record.asset.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(LedgerError::InvalidTransaction(
                "asset symbol cannot be empty".to_string(),
            ));
        }

        let kind = match action {
            Action::Buy | Action::Sell => {
                let (quantity, unit_price, amount) = Self::resolve_trade_fields(record, action)?;
                if action == Action::Buy {
                    TransactionKind::Buy {
                        quantity,
                        unit_price,
                        amount,
                    }
                } else {
                    TransactionKind::Sell {
                        quantity,
                        unit_price,
                        amount,
                    }
                }
            }
            Action::Dividend => TransactionKind::Dividend {
                amount: Self::require_amount(record, action)?,
            },
            Action::Gift => TransactionKind::Gift {
                quantity: Self::require_quantity(record, action)?,
            },
            Action::Fee => TransactionKind::Fee {
                amount: Self::require_amount(record, action)?,
            },
            Action::NetworkFee => TransactionKind::NetworkFee {
                quantity: Self::require_quantity(record, action)?,
            },
            Action::CashBalance => TransactionKind::CashBalance {
                amount: Self::require_amount(record, action)?,
            },
            Action::Reconcile => TransactionKind::Reconcile {
                quantity: Self::require_quantity(record, action)?,
            },
        };

        Ok(Transaction {
            id: Uuid::new_v4().to_string(),
            date: record.date,
            symbol,
            kind,
            source: record.source.clone(),
            comment: record.comment.clone(),
        })
    }

    pub fn action(&self) -> Action {
        self.kind.action()
    }

    fn require_amount(record: &TransactionRecord, action: Action) -> Result<Decimal, LedgerError> {
        record.amount.ok_or_else(|| {
            LedgerError::InvalidTransaction(format!("{} requires amount", action.as_str()))
        })
    }

    fn require_quantity(
        record: &TransactionRecord,
        action: Action,
    ) -> Result<Decimal, LedgerError> {
        record.quantity.ok_or_else(|| {
            LedgerError::InvalidTransaction(format!("{} requires quantity", action.as_str()))
        })
    }

    fn resolve_trade_fields(
        record: &TransactionRecord,
        action: Action,
    ) -> Result<(Decimal, Decimal, Decimal), LedgerError> {
        let provided = [record.amount, record.quantity, record.ave_price]
            .iter()
            .filter(|v| v.is_some())
            .count();
        if provided < 2 {
            return Err(LedgerError::InvalidTransaction(format!(
                "{} requires at least 2 of: amount, quantity, ave_price",
                action.as_str()
            )));
        }

        match (record.amount, record.quantity, record.ave_price) {
            (Some(amount), Some(quantity), Some(unit_price)) => {
                Ok((quantity, unit_price, amount))
            }
            (None, Some(quantity), Some(unit_price)) => {
                Ok((quantity, unit_price, quantity * unit_price))
            }
            (Some(amount), None, Some(unit_price)) => {
                if unit_price.is_zero() {
                    return Err(LedgerError::InvalidTransaction(format!(
                        "{} cannot derive quantity from a zero ave_price",
                        action.as_str()
                    )));
                }
                Ok((amount / unit_price, unit_price, amount))
            }
            (Some(amount), Some(quantity), None) => {
                if quantity.is_zero() {
                    return Err(LedgerError::InvalidTransaction(format!(
                        "{} cannot derive ave_price from a zero quantity",
                        action.as_str()
                    )));
                }
                Ok((quantity, amount / quantity, amount))
            }
            _ => unreachable!("at least two fields checked above"),
        }
    }
}

/// Immutable, ordered transaction history. A ledger is built once from a
/// validated transaction set and never mutated afterwards; reload/upload
/// installs a whole new ledger with a bumped generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    generation: u64,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub(crate) fn new(generation: u64, mut transactions: Vec<Transaction>) -> Self {
        // Stable sort keeps upload order for same-day transactions.
        transactions.sort_by_key(|t| t.date);
        Ledger {
            generation,
            transactions,
        }
    }

    pub fn empty() -> Self {
        Ledger {
            generation: 0,
            transactions: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.transactions.first().map(|t| t.date)
    }

    /// Symbols that ever had a quantity effect (BUY/SELL/GIFT/GAS/FIX).
    pub fn traded_symbols(&self) -> HashSet<String> {
        self.transactions
            .iter()
            .filter(|t| t.action().affects_quantity())
            .map(|t| t.symbol.clone())
            .collect()
    }
}
