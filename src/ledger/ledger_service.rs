use log::{info, warn};
use std::sync::{Arc, RwLock};

use super::ledger_errors::{LedgerError, RowValidationFailure};
use super::ledger_model::{Ledger, Transaction, TransactionRecord};

/// Read side of the ledger store. Readers get an immutable snapshot; the
/// generation on the snapshot identifies the transaction set it was built
/// from and doubles as the invalidation key for anything derived from it.
pub trait LedgerStoreTrait: Send + Sync {
    fn current(&self) -> Arc<Ledger>;
    fn replace(&self, records: &[TransactionRecord]) -> Result<Arc<Ledger>, LedgerError>;
}

/// Holds the current ledger generation behind a `RwLock<Arc<_>>` so that a
/// reload/upload swaps the whole ledger in one step. A reader that cloned
/// the Arc before the swap keeps computing against its own generation.
pub struct LedgerStore {
    inner: RwLock<Arc<Ledger>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        LedgerStore {
            inner: RwLock::new(Arc::new(Ledger::empty())),
        }
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStoreTrait for LedgerStore {
    fn current(&self) -> Arc<Ledger> {
        self.inner.read().unwrap().clone()
    }

    /// Validates the full record set and atomically installs it as the next
    /// generation. Any row failure rejects the whole upload; the prior
    /// generation stays in place and the caller gets every failure at once.
    fn replace(&self, records: &[TransactionRecord]) -> Result<Arc<Ledger>, LedgerError> {
        let mut transactions = Vec::with_capacity(records.len());
        let mut failures = Vec::new();

        for (index, record) in records.iter().enumerate() {
            match Transaction::from_record(record) {
                Ok(tx) => transactions.push(tx),
                Err(e) => failures.push(RowValidationFailure {
                    row: index + 1,
                    asset: record.asset.clone(),
                    message: e.to_string(),
                }),
            }
        }

        if !failures.is_empty() {
            warn!(
                "Rejecting transaction set: {} of {} row(s) invalid",
                failures.len(),
                records.len()
            );
            return Err(LedgerError::Validation { failures });
        }

        let mut guard = self.inner.write().unwrap();
        let next_generation = guard.generation() + 1;
        let ledger = Arc::new(Ledger::new(next_generation, transactions));
        *guard = ledger.clone();
        info!(
            "Installed ledger generation {} with {} transaction(s)",
            next_generation,
            ledger.transactions().len()
        );
        Ok(ledger)
    }
}
