//! Trading-pair resolution.
//!
//! The swap form lets the user pick either currency of the trade; which
//! market that lands on, and which side of it, depends on which leg of a
//! known pair the pick matches. [`PairIndex`] builds a bidirectional
//! index over the market list once so each selection is a single map
//! lookup instead of a rescan.

use std::collections::HashMap;

use tracing::debug;

use crate::models::OrderSide;
use crate::models::market::Market;

/// Result of resolving a currency selection against the pair index.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub market: &'a Market,
    /// Buy when the selected target currency is the pair's base unit,
    /// sell when it is the quote unit.
    pub side: OrderSide,
}

/// Bidirectional index from unordered currency pairs to markets.
#[derive(Debug, Clone)]
pub struct PairIndex {
    markets: Vec<Market>,
    by_legs: HashMap<(String, String), usize>,
    by_id: HashMap<String, usize>,
}

/// Normalizes two legs into an order-independent key.
fn leg_key(a: &str, b: &str) -> (String, String) {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a <= b { (a, b) } else { (b, a) }
}

impl PairIndex {
    /// Builds the index from a market list.
    pub fn new(markets: Vec<Market>) -> Self {
        let mut by_legs = HashMap::with_capacity(markets.len());
        let mut by_id = HashMap::with_capacity(markets.len());
        for (i, market) in markets.iter().enumerate() {
            by_legs.insert(leg_key(&market.base_unit, &market.quote_unit), i);
            by_id.insert(market.id.clone(), i);
        }
        Self {
            markets,
            by_legs,
            by_id,
        }
    }

    /// Returns all markets in listing order.
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Looks a market up by id.
    pub fn get(&self, id: &str) -> Option<&Market> {
        self.by_id.get(id).map(|&i| &self.markets[i])
    }

    /// Resolves a currency selection against the other leg of the trade.
    ///
    /// Matching is case-insensitive and order-independent. No match
    /// resolves to `None` and the caller leaves its state unchanged —
    /// the user may be mid-selection with a pair that does not trade.
    pub fn resolve(&self, target: &str, other: &str) -> Option<Resolution<'_>> {
        let Some(&i) = self.by_legs.get(&leg_key(target, other)) else {
            debug!("no market for currency pair {target}/{other}");
            return None;
        };
        let market = &self.markets[i];
        let side = if market.base_unit.eq_ignore_ascii_case(target) {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        };
        Some(Resolution { market, side })
    }

    /// Returns every currency that trades against `currency`, uppercase,
    /// in listing order without duplicates.
    pub fn counter_currencies(&self, currency: &str) -> Vec<String> {
        let currency = currency.to_lowercase();
        let mut out = Vec::new();
        for market in &self.markets {
            let counter = if market.base_unit == currency {
                &market.quote_unit
            } else if market.quote_unit == currency {
                &market.base_unit
            } else {
                continue;
            };
            let upper = counter.to_uppercase();
            if !out.contains(&upper) {
                out.push(upper);
            }
        }
        out
    }

    /// Returns every listed currency, uppercase, quote units first, in
    /// listing order without duplicates.
    pub fn all_currencies(&self) -> Vec<String> {
        let mut out = Vec::new();
        for market in &self.markets {
            let quote = market.quote_unit.to_uppercase();
            if !out.contains(&quote) {
                out.push(quote);
            }
        }
        for market in &self.markets {
            let base = market.base_unit.to_uppercase();
            if !out.contains(&base) {
                out.push(base);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn market(id: &str, base: &str, quote: &str) -> Market {
        Market {
            id: id.to_string(),
            base_unit: base.to_string(),
            quote_unit: quote.to_string(),
            amount_precision: 4,
            price_precision: 2,
            min_amount: dec!(0.001),
            min_price: dec!(0.01),
            max_price: None,
        }
    }

    fn index() -> PairIndex {
        PairIndex::new(vec![
            market("btcusd", "btc", "usd"),
            market("ethusd", "eth", "usd"),
            market("ethbtc", "eth", "btc"),
        ])
    }

    #[test]
    fn resolves_either_leg_order() {
        let idx = index();
        assert_eq!(idx.resolve("btc", "usd").unwrap().market.id, "btcusd");
        assert_eq!(idx.resolve("usd", "btc").unwrap().market.id, "btcusd");
    }

    #[test]
    fn side_follows_the_matched_leg() {
        let idx = index();
        // Target is the quote unit: selling the base for it.
        let usd = idx.resolve("USD", "BTC").unwrap();
        assert_eq!(usd.market.id, "btcusd");
        assert_eq!(usd.side, OrderSide::Sell);

        // Target is the base unit: buying it.
        let btc = idx.resolve("BTC", "USD").unwrap();
        assert_eq!(btc.side, OrderSide::Buy);
    }

    #[test]
    fn unknown_pair_resolves_to_none() {
        let idx = index();
        assert!(idx.resolve("sol", "usd").is_none());
        // usd/usd is not a pair either.
        assert!(idx.resolve("usd", "usd").is_none());
    }

    #[test]
    fn counter_currencies_follow_listing_order() {
        let idx = index();
        assert_eq!(idx.counter_currencies("usd"), vec!["BTC", "ETH"]);
        assert_eq!(idx.counter_currencies("eth"), vec!["USD", "BTC"]);
        assert!(idx.counter_currencies("sol").is_empty());
    }

    #[test]
    fn all_currencies_dedup_quotes_first() {
        let idx = index();
        assert_eq!(idx.all_currencies(), vec!["USD", "BTC", "ETH"]);
    }

    #[test]
    fn lookup_by_id() {
        let idx = index();
        assert_eq!(idx.get("ethbtc").unwrap().base_unit, "eth");
        assert!(idx.get("solusd").is_none());
    }
}
