//! Pre-flight checks applied when a payload is handed to execution.
//!
//! The form itself only gates the submit control; these checks run at
//! hand-off and report every violated constraint as a typed rejection so
//! the caller can surface them however it likes.

use rust_decimal::Decimal;

use crate::form::draft::SubmitPayload;
use crate::models::OrderSide;
use crate::models::market::Market;

/// A single violated order constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRejection {
    /// Order amount is below the market's minimum.
    AmountBelowMinimum { minimum: Decimal },
    /// Order price is below the market's minimum.
    PriceBelowMinimum { minimum: Decimal },
    /// Order price is above the market's configured maximum.
    PriceAboveMaximum { maximum: Decimal },
    /// Available balance cannot cover the order.
    InsufficientBalance {
        available: Decimal,
        required: Decimal,
    },
}

impl std::fmt::Display for OrderRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmountBelowMinimum { minimum } => {
                write!(f, "amount is below the minimum of {minimum}")
            }
            Self::PriceBelowMinimum { minimum } => {
                write!(f, "price is below the minimum of {minimum}")
            }
            Self::PriceAboveMaximum { maximum } => {
                write!(f, "price is above the maximum of {maximum}")
            }
            Self::InsufficientBalance {
                available,
                required,
            } => {
                write!(f, "available {available} cannot cover {required}")
            }
        }
    }
}

/// Checks a payload against the market's order constraints.
///
/// Every violated constraint is reported, not just the first: a buy
/// requires `amount × price` of the quote currency, a sell requires
/// `amount` of the base currency.
pub fn preflight(payload: &SubmitPayload, market: &Market) -> Vec<OrderRejection> {
    let mut rejections = Vec::new();

    if payload.amount < market.min_amount {
        rejections.push(OrderRejection::AmountBelowMinimum {
            minimum: market.min_amount,
        });
    }

    if payload.price < market.min_price {
        rejections.push(OrderRejection::PriceBelowMinimum {
            minimum: market.min_price,
        });
    }

    if let Some(maximum) = market.max_price
        && payload.price > maximum
    {
        rejections.push(OrderRejection::PriceAboveMaximum { maximum });
    }

    let required = match payload.side {
        OrderSide::Buy => payload.amount * payload.price,
        OrderSide::Sell => payload.amount,
    };
    if payload.available < required {
        rejections.push(OrderRejection::InsufficientBalance {
            available: payload.available,
            required,
        });
    }

    rejections
}
