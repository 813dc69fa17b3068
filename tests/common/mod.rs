//! Shared helpers for integration tests.

use instantex::models::book::PriceLevel;
use instantex::models::market::Market;
use rust_decimal::Decimal;

/// Builds a market with the given precisions and permissive limits.
pub fn market(id: &str, base: &str, quote: &str, amount_precision: u32, price_precision: u32) -> Market {
    Market {
        id: id.to_string(),
        base_unit: base.to_string(),
        quote_unit: quote.to_string(),
        amount_precision,
        price_precision,
        min_amount: Decimal::new(1, amount_precision),
        min_price: Decimal::new(1, price_precision),
        max_price: None,
    }
}

/// The default btcusd test market (amount precision 4, price precision 2).
pub fn btcusd() -> Market {
    market("btcusd", "btc", "usd", 4, 2)
}

/// Builds depth levels from integer `(price, qty)` pairs, best first.
pub fn depth(levels: &[(i64, i64)]) -> Vec<PriceLevel> {
    levels
        .iter()
        .map(|&(price, qty)| PriceLevel::new(Decimal::from(price), Decimal::from(qty)))
        .collect()
}
