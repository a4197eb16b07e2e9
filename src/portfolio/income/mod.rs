pub(crate) mod income_model;
pub(crate) mod income_service;

pub use income_model::{DividendReport, DividendSummary};
pub use income_service::DividendAggregator;
