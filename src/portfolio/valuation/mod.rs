pub(crate) mod valuation_calculator;

pub use valuation_calculator::Valuator;
