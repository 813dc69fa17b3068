//! The order draft and its reducer.
//!
//! The draft is an explicit, immutable value replaced wholesale by
//! [`OrderDraft::apply`] on each UI event. Field focus is part of the
//! draft so the precedence between user edits and externally-pushed
//! reference prices is an explicit rule: the Limit price field re-derives
//! from every reference-price change until the user first focuses or
//! edits it, and is never overwritten afterwards.

use rust_decimal::Decimal;

use crate::form::input::{
    fits_precision, format_with_precision, parse_or_zero, sanitize_numeric_input,
};
use crate::models::market::Market;
use crate::models::{OrderKind, OrderSide};

/// Read-only context the reducer needs from the surrounding application.
#[derive(Debug, Clone, Copy)]
pub struct FormContext<'a> {
    /// The active trading pair, carrying both field precisions.
    pub market: &'a Market,
    /// Last-trade reference price, absent before the first tick.
    pub reference: Option<Decimal>,
}

/// A UI event routed through the reducer.
#[derive(Debug, Clone)]
pub enum FormEvent {
    /// Candidate text for the amount field (pre-sanitization).
    Amount(String),
    /// Candidate text for the price field (pre-sanitization).
    Price(String),
    /// Order-kind tab selection.
    SelectKind(OrderKind),
    /// Amount field gained or lost focus.
    FocusAmount(bool),
    /// Price field gained or lost focus.
    FocusPrice(bool),
    /// Externally-pushed reference price update.
    ReferencePrice(Decimal),
}

/// The in-progress, not-yet-submitted order form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub side: OrderSide,
    pub kind: OrderKind,
    /// Amount field text; empty or precision-valid.
    pub amount: String,
    /// Price field text; empty or precision-valid.
    pub price: String,
    pub amount_focused: bool,
    pub price_focused: bool,
    /// Set once the price field has been focused or edited; gates
    /// external reference-price overwrites from then on.
    pub price_edited: bool,
}

/// The payload handed to order execution on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPayload {
    pub side: OrderSide,
    pub kind: OrderKind,
    pub amount: Decimal,
    /// Reference price for market orders, the entered price for limit
    /// orders.
    pub price: Decimal,
    pub available: Decimal,
}

impl OrderDraft {
    /// Creates an empty draft for the given side.
    pub fn new(side: OrderSide) -> Self {
        Self {
            side,
            kind: OrderKind::Market,
            amount: String::new(),
            price: String::new(),
            amount_focused: false,
            price_focused: false,
            price_edited: false,
        }
    }

    /// Applies one event, returning the next draft.
    pub fn apply(&self, event: FormEvent, ctx: &FormContext<'_>) -> Self {
        let mut next = self.clone();
        match event {
            FormEvent::Amount(candidate) => {
                let sanitized = sanitize_numeric_input(&candidate);
                if fits_precision(&sanitized, ctx.market.amount_precision) {
                    next.amount = sanitized;
                }
            }
            FormEvent::Price(candidate) => {
                next.price_edited = true;
                let sanitized = sanitize_numeric_input(&candidate);
                if fits_precision(&sanitized, ctx.market.price_precision) {
                    next.price = sanitized;
                }
            }
            FormEvent::SelectKind(kind) => {
                next.kind = kind;
                // Entering Limit seeds an empty price field from the
                // reference; entering Market leaves the field alone so a
                // prior entry survives the round trip.
                if kind == OrderKind::Limit
                    && next.price.is_empty()
                    && let Some(reference) = ctx.reference
                {
                    next.price =
                        format_with_precision(reference, ctx.market.price_precision);
                }
            }
            FormEvent::FocusAmount(focused) => {
                next.amount_focused = focused;
            }
            FormEvent::FocusPrice(focused) => {
                next.price_focused = focused;
                if focused {
                    next.price_edited = true;
                }
            }
            FormEvent::ReferencePrice(reference) => {
                if next.kind == OrderKind::Limit
                    && !next.price_focused
                    && !next.price_edited
                {
                    let seeded =
                        format_with_precision(reference, ctx.market.price_precision);
                    if seeded != next.price {
                        next.price = seeded;
                    }
                }
            }
        }
        next
    }

    /// Returns the amount field as a decimal, zero when empty or partial.
    pub fn amount_value(&self) -> Decimal {
        parse_or_zero(&self.amount)
    }

    /// Returns the price field as a decimal, zero when empty or partial.
    pub fn price_value(&self) -> Decimal {
        parse_or_zero(&self.price)
    }

    /// Builds the submit payload from the current draft.
    pub fn payload(&self, ctx: &FormContext<'_>, available: Decimal) -> SubmitPayload {
        let price = match self.kind {
            OrderKind::Market => ctx.reference.unwrap_or(Decimal::ZERO),
            OrderKind::Limit => self.price_value(),
        };
        SubmitPayload {
            side: self.side,
            kind: self.kind,
            amount: self.amount_value(),
            price,
            available,
        }
    }

    /// Returns the draft as it stands after a submit: amount and price
    /// cleared, the edit flag reset so the next reference tick may seed
    /// again.
    pub fn reset_after_submit(&self) -> Self {
        Self {
            amount: String::new(),
            price: String::new(),
            price_edited: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn market() -> Market {
        Market {
            id: "btcusd".to_string(),
            base_unit: "btc".to_string(),
            quote_unit: "usd".to_string(),
            amount_precision: 4,
            price_precision: 2,
            min_amount: dec!(0.0001),
            min_price: dec!(1),
            max_price: None,
        }
    }

    fn ctx(market: &Market, reference: Option<Decimal>) -> FormContext<'_> {
        FormContext { market, reference }
    }

    #[test]
    fn accepted_amount_replaces_text() {
        let m = market();
        let draft = OrderDraft::new(OrderSide::Buy)
            .apply(FormEvent::Amount("1.25".to_string()), &ctx(&m, None));
        assert_eq!(draft.amount, "1.25");
    }

    #[test]
    fn over_precise_amount_is_a_no_op() {
        let m = market();
        let draft = OrderDraft::new(OrderSide::Buy)
            .apply(FormEvent::Amount("1.2345".to_string()), &ctx(&m, None))
            .apply(FormEvent::Amount("1.23456".to_string()), &ctx(&m, None));
        assert_eq!(draft.amount, "1.2345");
    }

    #[test]
    fn entering_limit_seeds_empty_price_truncated() {
        let m = market();
        let draft = OrderDraft::new(OrderSide::Buy).apply(
            FormEvent::SelectKind(OrderKind::Limit),
            &ctx(&m, Some(dec!(123.456))),
        );
        assert_eq!(draft.price, "123.45");
    }

    #[test]
    fn entering_market_preserves_price_entry() {
        let m = market();
        let c = ctx(&m, Some(dec!(100)));
        let draft = OrderDraft::new(OrderSide::Buy)
            .apply(FormEvent::SelectKind(OrderKind::Limit), &c)
            .apply(FormEvent::Price("99.5".to_string()), &c)
            .apply(FormEvent::SelectKind(OrderKind::Market), &c)
            .apply(FormEvent::SelectKind(OrderKind::Limit), &c);
        assert_eq!(draft.price, "99.5");
    }

    #[test]
    fn reference_updates_reseed_until_first_touch() {
        let m = market();
        let draft = OrderDraft::new(OrderSide::Buy)
            .apply(
                FormEvent::SelectKind(OrderKind::Limit),
                &ctx(&m, Some(dec!(100))),
            )
            .apply(FormEvent::ReferencePrice(dec!(101.239)), &ctx(&m, None));
        assert_eq!(draft.price, "101.23");
    }

    #[test]
    fn focus_makes_price_sticky() {
        let m = market();
        let c = ctx(&m, Some(dec!(100)));
        let draft = OrderDraft::new(OrderSide::Buy)
            .apply(FormEvent::SelectKind(OrderKind::Limit), &c)
            .apply(FormEvent::FocusPrice(true), &c)
            .apply(FormEvent::FocusPrice(false), &c)
            .apply(FormEvent::ReferencePrice(dec!(250)), &c);
        assert_eq!(draft.price, "100.00");
    }

    #[test]
    fn edit_makes_price_sticky() {
        let m = market();
        let c = ctx(&m, Some(dec!(100)));
        let draft = OrderDraft::new(OrderSide::Buy)
            .apply(FormEvent::SelectKind(OrderKind::Limit), &c)
            .apply(FormEvent::Price("99".to_string()), &c)
            .apply(FormEvent::ReferencePrice(dec!(250)), &c);
        assert_eq!(draft.price, "99");
    }

    #[test]
    fn market_payload_uses_reference_price() {
        let m = market();
        let c = ctx(&m, Some(dec!(100.5)));
        let draft = OrderDraft::new(OrderSide::Buy)
            .apply(FormEvent::Amount("2".to_string()), &c);
        let payload = draft.payload(&c, dec!(1000));
        assert_eq!(payload.kind, OrderKind::Market);
        assert_eq!(payload.amount, dec!(2));
        assert_eq!(payload.price, dec!(100.5));
        assert_eq!(payload.available, dec!(1000));
    }

    #[test]
    fn limit_payload_uses_entered_price() {
        let m = market();
        let c = ctx(&m, Some(dec!(100.5)));
        let draft = OrderDraft::new(OrderSide::Sell)
            .apply(FormEvent::SelectKind(OrderKind::Limit), &c)
            .apply(FormEvent::Price("99.75".to_string()), &c)
            .apply(FormEvent::Amount("2".to_string()), &c);
        let payload = draft.payload(&c, dec!(5));
        assert_eq!(payload.price, dec!(99.75));
        assert_eq!(payload.side, OrderSide::Sell);
    }

    #[test]
    fn submit_resets_fields_and_edit_flag() {
        let m = market();
        let c = ctx(&m, Some(dec!(100)));
        let draft = OrderDraft::new(OrderSide::Buy)
            .apply(FormEvent::SelectKind(OrderKind::Limit), &c)
            .apply(FormEvent::Price("99".to_string()), &c)
            .apply(FormEvent::Amount("1".to_string()), &c)
            .reset_after_submit();
        assert!(draft.amount.is_empty());
        assert!(draft.price.is_empty());
        assert!(!draft.price_edited);
        // The next reference tick may seed again.
        let reseeded = draft.apply(FormEvent::ReferencePrice(dec!(105)), &c);
        assert_eq!(reseeded.price, "105.00");
    }
}
