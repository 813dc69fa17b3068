//! Depth-weighted pricing and submit-eligibility gating.
//!
//! A market order has no single price: its cost is the sum of each depth
//! level consumed on the way through the book. These functions derive
//! that cost, the blended per-unit price, and whether the form's submit
//! control is enabled. Everything is recomputed from current inputs on
//! every call — totals are never cached.

use rust_decimal::Decimal;

use crate::form::input::parse_or_zero;
use crate::models::OrderKind;
use crate::models::book::PriceLevel;

/// Computes the quote-currency cost of filling `amount` against `levels`.
///
/// Walks the depth sequence from the best price outward, consuming each
/// level's quantity against the unfilled remainder. Any excess beyond the
/// total available depth is priced at the last level's price — an
/// approximation that degrades gracefully instead of failing when depth
/// runs out.
///
/// Returns zero for a non-positive amount or empty depth.
pub fn market_total(amount: Decimal, levels: &[PriceLevel]) -> Decimal {
    if amount <= Decimal::ZERO || levels.is_empty() {
        return Decimal::ZERO;
    }

    let mut remaining = amount;
    let mut total = Decimal::ZERO;
    let mut last_price = Decimal::ZERO;

    for level in levels {
        if remaining <= Decimal::ZERO {
            break;
        }
        let consumed = remaining.min(level.qty);
        total += level.price * consumed;
        remaining -= consumed;
        last_price = level.price;
    }

    if remaining > Decimal::ZERO {
        total += remaining * last_price;
    }

    total
}

/// Returns the blended per-unit execution price.
///
/// `total / amount` when the amount is positive; otherwise falls back to
/// the standalone last-trade reference price.
pub fn safe_price(total: Decimal, amount: Decimal, reference: Decimal) -> Decimal {
    if amount > Decimal::ZERO {
        total / amount
    } else {
        reference
    }
}

/// Returns the displayed order total for the active order kind.
///
/// Market orders use the depth-walked total; limit orders multiply the
/// entered amount by the entered price, both taken verbatim.
pub fn order_total(
    kind: OrderKind,
    amount: Decimal,
    depth_total: Decimal,
    price_text: &str,
) -> Decimal {
    match kind {
        OrderKind::Market => depth_total,
        OrderKind::Limit => amount * parse_or_zero(price_text),
    }
}

/// Reports whether the submit control must be disabled.
///
/// Disabled when the available balance or amount is non-positive, when a
/// limit order's price text parses to a non-positive value, or when a
/// market order's blended price is non-positive. Evaluated fresh on every
/// render; there is no memory of prior attempts.
pub fn is_submit_disabled(
    amount: Decimal,
    safe_price: Decimal,
    price_text: &str,
    kind: OrderKind,
    available: Decimal,
) -> bool {
    if available <= Decimal::ZERO || amount <= Decimal::ZERO {
        return true;
    }
    match kind {
        OrderKind::Limit => parse_or_zero(price_text) <= Decimal::ZERO,
        OrderKind::Market => safe_price <= Decimal::ZERO,
    }
}
