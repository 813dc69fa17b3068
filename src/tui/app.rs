//! Application state for the TUI.

use std::collections::HashMap;
use std::time::Instant;

use rust_decimal::Decimal;

use crate::feed::FillReport;
use crate::form::draft::{FormContext, FormEvent, OrderDraft, SubmitPayload};
use crate::form::pricing;
use crate::models::balance::Balances;
use crate::models::book::{BookSnapshot, PriceLevel};
use crate::models::market::Market;
use crate::models::ticker::Ticker;
use crate::models::OrderSide;
use crate::pairs::PairIndex;

/// How long a status line stays on screen.
const STATUS_TTL_SECS: u64 = 5;

const EMPTY_DEPTH: &[PriceLevel] = &[];

/// Central application state container.
pub struct App {
    // -- Tab State --
    /// List of available tabs.
    pub tabs: Vec<Tab>,
    /// Index of the currently active tab.
    pub active_tab: usize,

    // -- Market State --
    /// Pair index over every listed market.
    pub pairs: PairIndex,
    /// Id of the market the swap form trades on.
    pub current_market_id: String,
    /// Currency the user receives, lowercase.
    pub to: String,
    /// Currency the user pays with, lowercase.
    pub from: String,
    /// Latest book snapshot per market.
    pub books: HashMap<String, BookSnapshot>,
    /// Latest ticker per market.
    pub tickers: HashMap<String, Ticker>,
    /// Wallet balances.
    pub balances: Balances,

    // -- Form State --
    /// The in-progress order draft.
    pub draft: OrderDraft,

    // -- UI State --
    /// Current focus within the active tab.
    pub focus: Focus,
    /// Current input mode.
    pub mode: Mode,
    /// Cursor position within the focused text field.
    pub field_cursor: usize,
    /// Index in the currency selector lists.
    pub selector_index: usize,
    /// Index in the markets listing.
    pub market_index: usize,
    /// Transient status line (clears after a timeout).
    pub status: Option<StatusLine>,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the app over a non-empty market list, opening on
    /// `initial_market` when it exists.
    pub fn new(pairs: PairIndex, initial_market: &str) -> Self {
        let market = pairs
            .get(initial_market)
            .unwrap_or(&pairs.markets()[0])
            .clone();
        Self {
            tabs: vec![Tab::Markets, Tab::Swap],
            active_tab: 1,
            to: market.base_unit.clone(),
            from: market.quote_unit.clone(),
            current_market_id: market.id,
            pairs,
            books: HashMap::new(),
            tickers: HashMap::new(),
            balances: Balances::new(),
            draft: OrderDraft::new(OrderSide::Buy),
            focus: Focus::Amount,
            mode: Mode::Normal,
            field_cursor: 0,
            selector_index: 0,
            market_index: 0,
            status: None,
            should_quit: false,
        }
    }

    /// Returns the currently active tab.
    pub fn current_tab(&self) -> &Tab {
        &self.tabs[self.active_tab]
    }

    /// Switches to the next tab.
    pub fn next_tab(&mut self) {
        self.active_tab = (self.active_tab + 1) % self.tabs.len();
        self.update_focus_for_tab();
    }

    /// Switches to the previous tab.
    pub fn previous_tab(&mut self) {
        self.active_tab = self
            .active_tab
            .checked_sub(1)
            .unwrap_or(self.tabs.len() - 1);
        self.update_focus_for_tab();
    }

    fn update_focus_for_tab(&mut self) {
        self.focus = match self.current_tab() {
            Tab::Markets => Focus::MarketList,
            Tab::Swap => Focus::Amount,
        };
        self.mode = Mode::Normal;
    }

    /// The market the swap form trades on.
    pub fn current_market(&self) -> &Market {
        self.pairs
            .get(&self.current_market_id)
            .unwrap_or(&self.pairs.markets()[0])
    }

    /// Last-trade reference price for the current market.
    pub fn reference_price(&self) -> Option<Decimal> {
        self.tickers.get(&self.current_market_id).map(|t| t.last)
    }

    /// The depth a market order would consume: asks for a buy, bids for
    /// a sell.
    pub fn proposals(&self) -> &[PriceLevel] {
        let Some(book) = self.books.get(&self.current_market_id) else {
            return EMPTY_DEPTH;
        };
        match self.draft.side {
            OrderSide::Buy => &book.asks,
            OrderSide::Sell => &book.bids,
        }
    }

    /// Balance of the currency being spent.
    pub fn available(&self) -> Decimal {
        self.balances.available(&self.from)
    }

    /// Display precision for the available balance: the spend currency
    /// is quote when buying, base when selling.
    pub fn available_precision(&self) -> u32 {
        let market = self.current_market();
        match self.draft.side {
            OrderSide::Buy => market.price_precision,
            OrderSide::Sell => market.amount_precision,
        }
    }

    /// Routes a form event through the draft reducer.
    pub fn dispatch(&mut self, event: FormEvent) {
        let next = {
            let market = self.current_market();
            let ctx = FormContext {
                market,
                reference: self.reference_price(),
            };
            self.draft.apply(event, &ctx)
        };
        self.draft = next;
    }

    /// Quote-currency cost of filling the drafted amount against depth.
    pub fn depth_total(&self) -> Decimal {
        pricing::market_total(self.draft.amount_value(), self.proposals())
    }

    /// Blended per-unit execution price for the drafted amount.
    pub fn safe_price(&self) -> Decimal {
        pricing::safe_price(
            self.depth_total(),
            self.draft.amount_value(),
            self.reference_price().unwrap_or(Decimal::ZERO),
        )
    }

    /// Displayed order total for the active order kind.
    pub fn total(&self) -> Decimal {
        pricing::order_total(
            self.draft.kind,
            self.draft.amount_value(),
            self.depth_total(),
            &self.draft.price,
        )
    }

    /// Whether the submit control is disabled right now.
    pub fn submit_disabled(&self) -> bool {
        pricing::is_submit_disabled(
            self.draft.amount_value(),
            self.safe_price(),
            &self.draft.price,
            self.draft.kind,
            self.available(),
        )
    }

    /// Builds the submit payload from the current draft.
    pub fn submit_payload(&self) -> SubmitPayload {
        let ctx = FormContext {
            market: self.current_market(),
            reference: self.reference_price(),
        };
        self.draft.payload(&ctx, self.available())
    }

    /// Resets the form after a submit was handed off.
    pub fn finish_submit(&mut self) {
        self.draft = self.draft.reset_after_submit();
        self.field_cursor = 0;
    }

    /// Opens the swap form on a market, keeping the selected order kind.
    pub fn select_market(&mut self, id: &str) {
        let Some(market) = self.pairs.get(id) else {
            return;
        };
        self.to = market.base_unit.clone();
        self.from = market.quote_unit.clone();
        self.current_market_id = market.id.clone();
        self.reset_draft(OrderSide::Buy);
    }

    /// Applies a currency-pair resolution: new market, side implied by
    /// the matched leg, re-derived to/from legs.
    pub fn set_trade(&mut self, market_id: &str, side: OrderSide, to: String, from: String) {
        let Some(market) = self.pairs.get(market_id) else {
            return;
        };
        self.current_market_id = market.id.clone();
        self.to = to.to_lowercase();
        self.from = from.to_lowercase();
        self.reset_draft(side);
    }

    /// Replaces the draft for a new market/side, preserving the order
    /// kind so the tab selection survives pair changes.
    fn reset_draft(&mut self, side: OrderSide) {
        let kind = self.draft.kind;
        self.draft = OrderDraft::new(side);
        self.draft.kind = kind;
        self.field_cursor = 0;
    }

    /// Records a fill in the status line.
    pub fn show_fill(&mut self, fill: &FillReport) {
        let market_name = self
            .pairs
            .get(&fill.market)
            .map(|m| m.name())
            .unwrap_or_else(|| fill.market.clone());
        self.show_info(format!(
            "{} {} {} @ {} for {}",
            fill.side.as_str().to_uppercase(),
            fill.amount,
            market_name,
            fill.price,
            fill.total,
        ));
    }

    /// Sets an informational status line.
    pub fn show_info(&mut self, message: impl Into<String>) {
        self.status = Some(StatusLine {
            message: message.into(),
            level: StatusLevel::Info,
            timestamp: Instant::now(),
        });
    }

    /// Sets an error status line.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.status = Some(StatusLine {
            message: message.into(),
            level: StatusLevel::Error,
            timestamp: Instant::now(),
        });
    }

    /// Clears status lines older than the display TTL.
    pub fn clear_stale_status(&mut self) {
        if let Some(ref status) = self.status
            && status.timestamp.elapsed().as_secs() >= STATUS_TTL_SECS
        {
            self.status = None;
        }
    }
}

/// Tab types in the application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tab {
    /// All-markets listing.
    Markets,
    /// The quick-swap order form.
    Swap,
}

impl Tab {
    /// Returns the display title for the tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Markets => "Markets",
            Tab::Swap => "Swap",
        }
    }
}

/// UI focus targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    // Markets tab
    MarketList,

    // Swap tab
    #[default]
    Amount,
    Price,
    ToSelector,
    FromSelector,
}

/// Input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
}

/// Severity of the transient status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// A transient message shown in the status bar.
#[derive(Clone, Debug)]
pub struct StatusLine {
    pub message: String,
    pub level: StatusLevel,
    pub timestamp: Instant,
}
