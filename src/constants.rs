/// Symbol used for the cash pseudo-holding
pub const CASH_SYMBOL: &str = "CASH";

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Quantity threshold for significant positions
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// How far back a missing daily close is forward-filled from
pub const QUOTE_LOOKBACK_DAYS: i64 = 30;

/// Days per year used for annualized-return calculations
pub const DAYS_PER_YEAR: i64 = 365;
