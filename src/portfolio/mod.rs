pub mod allocation;
pub mod income;
pub mod performance;
pub mod snapshot;
pub mod valuation;

pub(crate) mod portfolio_errors;
pub(crate) mod portfolio_model;
pub(crate) mod portfolio_service;


pub use portfolio_errors::CalculatorError;
pub use portfolio_model::{Holding, PortfolioSummary, SoldAssetsReport};
pub use portfolio_service::PortfolioService;
