pub(crate) mod performance_model;
pub(crate) mod performance_service;
pub(crate) mod returns_calculator;

pub use performance_model::{
    AnnualPerformanceRow, CategoryAmount, MonthlyInvestmentRow, PerformanceSample, SymbolAmount,
};
pub use performance_service::{annual_table, PerformanceService};
pub use returns_calculator::AnnualizedReturnCalculator;
