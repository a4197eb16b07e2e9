pub(crate) mod allocation_model;
pub(crate) mod allocation_service;

pub use allocation_model::{AllocationReport, AllocationTotals, CategoryAllocation};
pub use allocation_service::CategoryAggregator;
