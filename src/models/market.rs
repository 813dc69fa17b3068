//! Trading pair reference data.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Reference data for a single trading pair.
///
/// Precisions govern both display rounding and the maximum number of
/// fractional digits accepted while typing into the swap form.
#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    /// Market id, the concatenated lowercase units (e.g. `"btcusd"`).
    pub id: String,
    /// Base currency unit, lowercase (e.g. `"btc"`).
    pub base_unit: String,
    /// Quote currency unit, lowercase (e.g. `"usd"`).
    pub quote_unit: String,
    /// Maximum fractional digits for order amounts.
    pub amount_precision: u32,
    /// Maximum fractional digits for order prices.
    pub price_precision: u32,
    /// Minimum order amount in base currency.
    pub min_amount: Decimal,
    /// Minimum order price in quote currency.
    pub min_price: Decimal,
    /// Maximum order price in quote currency, unlimited when absent.
    #[serde(default)]
    pub max_price: Option<Decimal>,
}

impl Market {
    /// Returns the display name, `"BTC/USD"` style.
    pub fn name(&self) -> String {
        format!(
            "{}/{}",
            self.base_unit.to_uppercase(),
            self.quote_unit.to_uppercase()
        )
    }
}
