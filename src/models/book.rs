//! Order book models.

use rust_decimal::Decimal;
use serde::Deserialize;

/// A single price level in the order book.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub qty: Decimal,
}

impl PriceLevel {
    /// Creates a new price level.
    pub fn new(price: Decimal, qty: Decimal) -> Self {
        Self { price, qty }
    }
}

/// Order book snapshot for a single trading pair.
///
/// Both sides are ordered best price first: bids descending, asks
/// ascending.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookSnapshot {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl BookSnapshot {
    /// Returns the highest resting bid, if any.
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Returns the lowest resting ask, if any.
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Returns the bid/ask spread when both sides are populated.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }
}
