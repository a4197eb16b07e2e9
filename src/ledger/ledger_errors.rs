use serde::Serialize;
use thiserror::Error;

/// Custom error type for ledger-related operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Transaction set rejected: {} row(s) failed validation", failures.len())]
    Validation { failures: Vec<RowValidationFailure> },

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// One rejected row of an uploaded transaction set. Row numbers are 1-based
/// and refer to the order the rows were submitted in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowValidationFailure {
    pub row: usize,
    pub asset: String,
    pub message: String,
}

impl From<LedgerError> for String {
    fn from(error: LedgerError) -> Self {
        error.to_string()
    }
}
