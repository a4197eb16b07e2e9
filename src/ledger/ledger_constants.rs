pub const ACTION_BUY: &str = "BUY";
pub const ACTION_SELL: &str = "SELL";
pub const ACTION_DIVIDEND: &str = "DIV";
pub const ACTION_GIFT: &str = "GIFT";
pub const ACTION_FEE: &str = "FEE";
pub const ACTION_NETWORK_FEE: &str = "GAS";
pub const ACTION_CASH_BALANCE: &str = "CASH";
pub const ACTION_RECONCILE: &str = "FIX";
