//! Shared models for markets, order books, balances, and tickers.
//!
//! All monetary values are [`rust_decimal::Decimal`]; JSON sources carry
//! them as decimal strings.

pub mod balance;
pub mod book;
pub mod market;
pub mod ticker;

use serde::{Deserialize, Serialize};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the wire-format side name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

/// Order kind selected by the form's tab switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Executes immediately at the best available depth prices.
    #[default]
    Market,
    /// Executes only at a user-specified price or better.
    Limit,
}

impl OrderKind {
    /// Returns the wire-format order type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Market => "market",
            OrderKind::Limit => "limit",
        }
    }

    /// Returns the display label used by the form's kind tabs.
    pub fn label(&self) -> &'static str {
        match self {
            OrderKind::Market => "Market price",
            OrderKind::Limit => "Fixed rate",
        }
    }
}
