use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Seam to the external split-history collaborator. The engine restates
/// every quantity-bearing transaction in `target_date` units at processing
/// time, so lot state is always expressed split-adjusted.
pub trait SplitAdjusterTrait: Send + Sync {
    /// Cumulative split factor for splits that occurred after
    /// `transaction_date` and on or before `target_date` (e.g. 10 for a
    /// single 10:1 split in between). 1 when nothing applies.
    fn adjustment_factor(
        &self,
        symbol: &str,
        transaction_date: NaiveDate,
        target_date: NaiveDate,
    ) -> Decimal;
}

/// Default adjuster for price sources that already deliver split-adjusted
/// history, or ledgers without splits.
pub struct NoSplitAdjustment;

impl SplitAdjusterTrait for NoSplitAdjustment {
    fn adjustment_factor(&self, _symbol: &str, _from: NaiveDate, _to: NaiveDate) -> Decimal {
        Decimal::ONE
    }
}

/// Split history held as an explicit table, keyed by symbol and split date.
pub struct SplitTable {
    splits: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl SplitTable {
    pub fn new() -> Self {
        SplitTable {
            splits: HashMap::new(),
        }
    }

    pub fn insert(&mut self, symbol: &str, date: NaiveDate, ratio: Decimal) {
        self.splits
            .entry(symbol.to_string())
            .or_default()
            .insert(date, ratio);
    }
}

impl Default for SplitTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SplitAdjusterTrait for SplitTable {
    fn adjustment_factor(
        &self,
        symbol: &str,
        transaction_date: NaiveDate,
        target_date: NaiveDate,
    ) -> Decimal {
        let Some(history) = self.splits.get(symbol) else {
            return Decimal::ONE;
        };
        let mut factor = Decimal::ONE;
        for (&split_date, &ratio) in history {
            if transaction_date < split_date
                && split_date <= target_date
                && ratio.is_sign_positive()
            {
                factor *= ratio;
            }
        }
        factor
    }
}
