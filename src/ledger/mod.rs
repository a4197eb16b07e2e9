pub(crate) mod ledger_constants;
pub(crate) mod ledger_errors;
pub(crate) mod ledger_model;
pub(crate) mod ledger_service;

pub use ledger_constants::*;
pub use ledger_errors::{LedgerError, RowValidationFailure};
pub use ledger_model::{Action, Ledger, Transaction, TransactionKind, TransactionRecord};
pub use ledger_service::{LedgerStore, LedgerStoreTrait};
