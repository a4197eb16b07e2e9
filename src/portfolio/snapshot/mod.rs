pub(crate) mod lot_tracker;
pub(crate) mod realized_pnl;
pub(crate) mod snapshot_model;

#[cfg(test)]
mod lot_tracker_tests;

pub use lot_tracker::LotTracker;
pub use realized_pnl::RealizedPnlCalculator;
pub use snapshot_model::{is_quantity_significant, Lot, PositionSnapshot, SoldLotRecord};
