use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while deriving portfolio state from the ledger.
#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("Oversell on {symbol}: requested {requested}, only {available} remaining")]
    Oversell {
        symbol: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Calculation error: {0}")]
    Calculation(String),
}
