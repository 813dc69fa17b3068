//! Deterministic local market-data feed and paper execution.
//!
//! Stands in for the remote exchange: generates order books and tickers
//! on a timer from a repeatable price walk, and fills submitted orders
//! locally against the current book, adjusting wallet balances. The UI
//! receives the same shapes it would from a live feed and is unaware the
//! data is synthetic.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::form::draft::SubmitPayload;
use crate::form::pricing::{market_total, safe_price};
use crate::form::submit::{OrderRejection, preflight};
use crate::models::balance::Balance;
use crate::models::book::{BookSnapshot, PriceLevel};
use crate::models::market::Market;
use crate::models::ticker::Ticker;
use crate::models::{OrderKind, OrderSide};

/// Book levels generated per side.
const DEPTH_LEVELS: i64 = 6;

/// Half-period of the triangle price walk, in ticks.
const WALK_HALF_PERIOD: i64 = 24;

/// An update emitted by the feed toward the UI.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Full book snapshot for one market.
    Book { market: String, book: BookSnapshot },
    /// Last-trade reference price for one market.
    Ticker(Ticker),
    /// Full balance snapshot.
    Balances(Vec<Balance>),
}

/// A completed paper fill.
#[derive(Debug, Clone)]
pub struct FillReport {
    pub market: String,
    pub side: OrderSide,
    pub kind: OrderKind,
    pub amount: Decimal,
    /// Blended per-unit price the fill executed at.
    pub price: Decimal,
    /// Quote-currency cost of the fill.
    pub total: Decimal,
}

/// Per-market parameters of the synthetic walk.
#[derive(Debug, Clone)]
struct WalkState {
    /// Session-start mid price.
    base_mid: Decimal,
    /// Price offset per walk step.
    step: Decimal,
    /// Base quantity resting on the first level.
    base_qty: Decimal,
    /// Phase offset so markets do not move in lockstep.
    phase: i64,
}

/// Deterministic market-data generator and paper execution engine.
pub struct MarketFeed {
    markets: Vec<Market>,
    walks: HashMap<String, WalkState>,
    balances: HashMap<String, Decimal>,
    tick: i64,
}

impl MarketFeed {
    /// Creates a feed over the built-in market set with seeded balances.
    pub fn with_default_markets() -> Self {
        Self::new(default_markets(), default_balances())
    }

    /// Creates a feed over the given markets and starting balances.
    pub fn new(markets: Vec<Market>, balances: Vec<Balance>) -> Self {
        let walks = markets
            .iter()
            .enumerate()
            .map(|(i, market)| (market.id.clone(), walk_for(market, i as i64)))
            .collect();
        Self {
            markets,
            walks,
            balances: balances
                .into_iter()
                .map(|b| (b.currency.to_lowercase(), b.balance))
                .collect(),
            tick: 0,
        }
    }

    /// Returns the markets this feed serves.
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Returns the initial events a fresh UI needs before the first tick.
    pub fn bootstrap(&self) -> Vec<FeedEvent> {
        let mut events = vec![FeedEvent::Balances(self.balances_snapshot())];
        for market in &self.markets {
            events.push(self.book_event(market));
            events.push(self.ticker_event(market));
        }
        events
    }

    /// Advances the walk one step and emits fresh books and tickers.
    pub fn tick(&mut self) -> Vec<FeedEvent> {
        self.tick += 1;
        debug!(tick = self.tick, "feed tick");
        let mut events = Vec::with_capacity(self.markets.len() * 2);
        for market in &self.markets {
            events.push(self.book_event(market));
            events.push(self.ticker_event(market));
        }
        events
    }

    /// Fills a submitted order against the current book.
    ///
    /// Market orders execute at the depth-blended price, limit orders at
    /// the entered price. Balances are debited and credited atomically;
    /// a fill that any constraint rejects leaves them untouched.
    ///
    /// # Errors
    ///
    /// Returns every violated order constraint, including insufficient
    /// balance as accounted by the feed itself.
    pub fn execute(
        &mut self,
        payload: &SubmitPayload,
        market: &Market,
    ) -> Result<FillReport, Vec<OrderRejection>> {
        let mut rejections = preflight(payload, market);

        let book = self.book_for(market);
        let levels = match payload.side {
            OrderSide::Buy => &book.asks,
            OrderSide::Sell => &book.bids,
        };

        let (price, total) = match payload.kind {
            OrderKind::Market => {
                let total = market_total(payload.amount, levels);
                (safe_price(total, payload.amount, payload.price), total)
            }
            OrderKind::Limit => (payload.price, payload.amount * payload.price),
        };

        let (debit_currency, debit_amount) = match payload.side {
            OrderSide::Buy => (market.quote_unit.clone(), total),
            OrderSide::Sell => (market.base_unit.clone(), payload.amount),
        };
        let held = self.balance(&debit_currency);
        if held < debit_amount
            && !rejections
                .iter()
                .any(|r| matches!(r, OrderRejection::InsufficientBalance { .. }))
        {
            rejections.push(OrderRejection::InsufficientBalance {
                available: held,
                required: debit_amount,
            });
        }

        if !rejections.is_empty() {
            return Err(rejections);
        }

        let (credit_currency, credit_amount) = match payload.side {
            OrderSide::Buy => (market.base_unit.clone(), payload.amount),
            OrderSide::Sell => (market.quote_unit.clone(), total),
        };
        *self.balances.entry(debit_currency).or_default() -= debit_amount;
        *self.balances.entry(credit_currency).or_default() += credit_amount;

        info!(
            market = %market.id,
            side = payload.side.as_str(),
            kind = payload.kind.as_str(),
            %price,
            %total,
            "paper fill"
        );

        Ok(FillReport {
            market: market.id.clone(),
            side: payload.side,
            kind: payload.kind,
            amount: payload.amount,
            price,
            total,
        })
    }

    /// Returns the current balance snapshot.
    pub fn balances_snapshot(&self) -> Vec<Balance> {
        let mut snapshot: Vec<Balance> = self
            .balances
            .iter()
            .map(|(currency, &balance)| Balance {
                currency: currency.clone(),
                balance,
            })
            .collect();
        snapshot.sort_by(|a, b| a.currency.cmp(&b.currency));
        snapshot
    }

    fn balance(&self, currency: &str) -> Decimal {
        self.balances.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// Current mid price of a market under the triangle walk.
    fn mid(&self, market: &Market) -> Decimal {
        let walk = &self.walks[&market.id];
        let phase = (self.tick + walk.phase).rem_euclid(2 * WALK_HALF_PERIOD);
        // Triangle wave centered on zero: rises for a half period, falls
        // for the next.
        let offset = if phase < WALK_HALF_PERIOD {
            phase - WALK_HALF_PERIOD / 2
        } else {
            3 * WALK_HALF_PERIOD / 2 - phase
        };
        (walk.base_mid + walk.step * Decimal::from(offset))
            .trunc_with_scale(market.price_precision)
    }

    fn ticker_event(&self, market: &Market) -> FeedEvent {
        let walk = &self.walks[&market.id];
        let last = self.mid(market);
        let change_pct = ((last - walk.base_mid) / walk.base_mid * Decimal::ONE_HUNDRED)
            .trunc_with_scale(2);
        FeedEvent::Ticker(Ticker {
            market: market.id.clone(),
            last,
            change_pct,
        })
    }

    fn book_event(&self, market: &Market) -> FeedEvent {
        FeedEvent::Book {
            market: market.id.clone(),
            book: self.book_for(market),
        }
    }

    /// Builds the synthetic book around the current mid price.
    fn book_for(&self, market: &Market) -> BookSnapshot {
        let walk = &self.walks[&market.id];
        let mid = self.mid(market);
        let tick_size = Decimal::new(1, market.price_precision);

        let mut bids = Vec::with_capacity(DEPTH_LEVELS as usize);
        let mut asks = Vec::with_capacity(DEPTH_LEVELS as usize);
        for i in 0..DEPTH_LEVELS {
            let distance = tick_size * Decimal::from(i + 1);
            // Quantity grows away from the touch, with a small parity
            // wiggle so consecutive ticks differ.
            let wiggle = if (self.tick + i) % 2 == 0 {
                walk.base_qty / Decimal::from(4)
            } else {
                Decimal::ZERO
            };
            let qty = (walk.base_qty * Decimal::from(i + 1) + wiggle)
                .trunc_with_scale(market.amount_precision);
            bids.push(PriceLevel::new(mid - distance, qty));
            asks.push(PriceLevel::new(mid + distance, qty));
        }

        BookSnapshot { bids, asks }
    }
}

fn walk_for(market: &Market, index: i64) -> WalkState {
    // Seed the walk from the market's listing defaults.
    let (base_mid, base_qty) = seed_prices(&market.id);
    WalkState {
        base_mid,
        // 0.05% of the mid per step keeps the walk visible but tame.
        step: base_mid * Decimal::new(5, 4),
        base_qty,
        phase: index * 7,
    }
}

/// Session-start mid price and first-level quantity per market.
fn seed_prices(market_id: &str) -> (Decimal, Decimal) {
    match market_id {
        "btcusd" => (Decimal::new(6425000, 2), Decimal::new(25, 2)),
        "ethusd" => (Decimal::new(330550, 2), Decimal::new(180, 2)),
        "ethbtc" => (Decimal::new(514200, 7), Decimal::new(150, 2)),
        "solusd" => (Decimal::new(14525, 2), Decimal::new(4200, 2)),
        _ => (Decimal::ONE_HUNDRED, Decimal::ONE),
    }
}

/// The built-in market set served by the default feed.
pub fn default_markets() -> Vec<Market> {
    vec![
        Market {
            id: "btcusd".to_string(),
            base_unit: "btc".to_string(),
            quote_unit: "usd".to_string(),
            amount_precision: 4,
            price_precision: 2,
            min_amount: Decimal::new(1, 4),
            min_price: Decimal::ONE,
            max_price: Some(Decimal::from(10_000_000)),
        },
        Market {
            id: "ethusd".to_string(),
            base_unit: "eth".to_string(),
            quote_unit: "usd".to_string(),
            amount_precision: 3,
            price_precision: 2,
            min_amount: Decimal::new(1, 3),
            min_price: Decimal::new(1, 2),
            max_price: Some(Decimal::from(1_000_000)),
        },
        Market {
            id: "ethbtc".to_string(),
            base_unit: "eth".to_string(),
            quote_unit: "btc".to_string(),
            amount_precision: 3,
            price_precision: 5,
            min_amount: Decimal::new(1, 3),
            min_price: Decimal::new(1, 5),
            max_price: None,
        },
        Market {
            id: "solusd".to_string(),
            base_unit: "sol".to_string(),
            quote_unit: "usd".to_string(),
            amount_precision: 2,
            price_precision: 3,
            min_amount: Decimal::new(1, 2),
            min_price: Decimal::new(1, 3),
            max_price: Some(Decimal::from(100_000)),
        },
    ]
}

/// Starting wallet balances for the paper session.
pub fn default_balances() -> Vec<Balance> {
    vec![
        Balance {
            currency: "usd".to_string(),
            balance: Decimal::from(25_000),
        },
        Balance {
            currency: "btc".to_string(),
            balance: Decimal::new(75, 2),
        },
        Balance {
            currency: "eth".to_string(),
            balance: Decimal::new(125, 1),
        },
        Balance {
            currency: "sol".to_string(),
            balance: Decimal::from(150),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn feed() -> MarketFeed {
        MarketFeed::with_default_markets()
    }

    fn btcusd(feed: &MarketFeed) -> Market {
        feed.markets()[0].clone()
    }

    fn current_book(feed: &MarketFeed, market: &Market) -> BookSnapshot {
        feed.book_for(market)
    }

    #[test]
    fn walk_is_deterministic() {
        let mut a = feed();
        let mut b = feed();
        for _ in 0..10 {
            a.tick();
            b.tick();
        }
        let m = btcusd(&a);
        assert_eq!(a.mid(&m), b.mid(&m));
    }

    #[test]
    fn books_are_ordered_best_price_first() {
        let mut f = feed();
        f.tick();
        let m = btcusd(&f);
        let book = current_book(&f, &m);
        assert!(book.bids.windows(2).all(|w| w[0].price > w[1].price));
        assert!(book.asks.windows(2).all(|w| w[0].price < w[1].price));
        assert!(book.spread().unwrap() > Decimal::ZERO);
    }

    #[test]
    fn market_buy_debits_quote_credits_base() {
        let mut f = feed();
        let m = btcusd(&f);
        let before_usd = f.balance("usd");
        let before_btc = f.balance("btc");

        let payload = SubmitPayload {
            side: OrderSide::Buy,
            kind: OrderKind::Market,
            amount: dec!(0.01),
            price: f.mid(&m),
            available: before_usd,
        };
        let fill = f.execute(&payload, &m).unwrap();

        assert_eq!(f.balance("usd"), before_usd - fill.total);
        assert_eq!(f.balance("btc"), before_btc + dec!(0.01));
        assert!(fill.price > Decimal::ZERO);
    }

    #[test]
    fn limit_sell_credits_quote_at_entered_price() {
        let mut f = feed();
        let m = btcusd(&f);
        let before_usd = f.balance("usd");

        let payload = SubmitPayload {
            side: OrderSide::Sell,
            kind: OrderKind::Limit,
            amount: dec!(0.5),
            price: dec!(64000),
            available: f.balance("btc"),
        };
        let fill = f.execute(&payload, &m).unwrap();

        assert_eq!(fill.price, dec!(64000));
        assert_eq!(fill.total, dec!(32000));
        assert_eq!(f.balance("usd"), before_usd + dec!(32000));
    }

    #[test]
    fn rejected_order_leaves_balances_untouched() {
        let mut f = feed();
        let m = btcusd(&f);
        let before = f.balances_snapshot();

        let payload = SubmitPayload {
            side: OrderSide::Sell,
            kind: OrderKind::Limit,
            amount: dec!(100),
            price: dec!(64000),
            available: f.balance("btc"),
        };
        let rejections = f.execute(&payload, &m).unwrap_err();
        assert!(
            rejections
                .iter()
                .any(|r| matches!(r, OrderRejection::InsufficientBalance { .. }))
        );
        assert_eq!(f.balances_snapshot().len(), before.len());
        assert_eq!(f.balance("btc"), dec!(0.75));
    }

    #[test]
    fn fills_never_drive_balances_negative() {
        let mut f = feed();
        let m = btcusd(&f);
        // Sell everything, then try to sell more.
        let sell_all = SubmitPayload {
            side: OrderSide::Sell,
            kind: OrderKind::Limit,
            amount: dec!(0.75),
            price: dec!(64000),
            available: f.balance("btc"),
        };
        f.execute(&sell_all, &m).unwrap();
        assert_eq!(f.balance("btc"), Decimal::ZERO);

        let sell_more = SubmitPayload {
            side: OrderSide::Sell,
            kind: OrderKind::Limit,
            amount: dec!(0.01),
            price: dec!(64000),
            available: Decimal::ZERO,
        };
        assert!(f.execute(&sell_more, &m).is_err());
        assert_eq!(f.balance("btc"), Decimal::ZERO);
    }

    #[test]
    fn bootstrap_covers_every_market() {
        let f = feed();
        let events = f.bootstrap();
        let books = events
            .iter()
            .filter(|e| matches!(e, FeedEvent::Book { .. }))
            .count();
        assert_eq!(books, f.markets().len());
        assert!(matches!(events[0], FeedEvent::Balances(_)));
    }
}
