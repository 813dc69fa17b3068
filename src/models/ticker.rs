use rust_decimal::Decimal;
use serde::Deserialize;

/// Last-trade reference data for a single market.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    pub market: String,
    pub last: Decimal,
    pub change_pct: Decimal,
}
