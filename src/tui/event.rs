//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::feed::FeedEvent;
use crate::form::draft::{FormEvent, SubmitPayload};
use crate::models::{OrderKind, OrderSide};
use crate::tui::input::field;

use super::app::{App, Focus, Mode, Tab};

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI and feed updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),
    /// Market-data update from the feed.
    Feed(FeedEvent),
    /// Request to quit the application.
    Quit,
}

/// Actions that require external handling by the main loop.
#[derive(Debug)]
pub enum Action {
    /// Hand a drafted order to execution.
    Submit(SubmitPayload),
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::Feed(feed_event) => {
            apply_feed(app, feed_event);
            None
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Folds a feed update into application state.
fn apply_feed(app: &mut App, event: FeedEvent) {
    match event {
        FeedEvent::Book { market, book } => {
            app.books.insert(market, book);
        }
        FeedEvent::Ticker(ticker) => {
            let is_current = ticker.market == app.current_market_id;
            let last = ticker.last;
            app.tickers.insert(ticker.market.clone(), ticker);
            // The reference price flows through the reducer so the
            // focus/edit gate decides whether the Limit price re-seeds.
            if is_current {
                app.dispatch(FormEvent::ReferencePrice(last));
            }
        }
        FeedEvent::Balances(snapshot) => {
            app.balances.replace(snapshot);
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.clear_stale_status();
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    // Global keys (work in any mode)
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() && app.mode == Mode::Normal => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Esc => {
            leave_field(app);
            return None;
        }
        _ => {}
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Insert => handle_insert_mode(app, key),
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        // Tab navigation
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.previous_tab();
            } else {
                app.next_tab();
            }
            None
        }
        KeyCode::BackTab => {
            app.previous_tab();
            None
        }

        _ => match app.current_tab().clone() {
            Tab::Markets => handle_markets_tab_keys(app, key),
            Tab::Swap => handle_swap_tab_keys(app, key),
        },
    }
}

/// Handles keys for the markets listing tab.
fn handle_markets_tab_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    let count = app.pairs.markets().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.market_index < count.saturating_sub(1) {
                app.market_index += 1;
            }
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.market_index = app.market_index.saturating_sub(1);
            None
        }
        KeyCode::Enter => {
            if let Some(market) = app.pairs.markets().get(app.market_index) {
                let id = market.id.clone();
                app.select_market(&id);
                app.active_tab = 1;
                app.focus = Focus::Amount;
            }
            None
        }
        _ => None,
    }
}

/// Handles keys for the swap tab.
fn handle_swap_tab_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        // Order-kind tabs
        KeyCode::Char('1') => {
            app.dispatch(FormEvent::SelectKind(OrderKind::Market));
            if app.focus == Focus::Price {
                app.focus = Focus::Amount;
            }
            None
        }
        KeyCode::Char('2') => {
            app.dispatch(FormEvent::SelectKind(OrderKind::Limit));
            None
        }

        // Focus cycle
        KeyCode::Char('j') | KeyCode::Down => {
            app.focus = next_focus(app, app.focus);
            sync_selector_index(app);
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.focus = previous_focus(app, app.focus);
            sync_selector_index(app);
            None
        }

        // Cycle selector candidates
        KeyCode::Char('h') | KeyCode::Left => {
            cycle_selector(app, -1);
            None
        }
        KeyCode::Char('l') | KeyCode::Right => {
            cycle_selector(app, 1);
            None
        }

        // Edit the focused field, or apply the focused selector
        KeyCode::Char('i') => {
            enter_field(app);
            None
        }
        KeyCode::Enter => match app.focus {
            Focus::Amount | Focus::Price => {
                enter_field(app);
                None
            }
            Focus::ToSelector | Focus::FromSelector => {
                apply_selector(app);
                None
            }
            Focus::MarketList => None,
        },

        // Submit
        KeyCode::Char('s') => {
            if app.submit_disabled() {
                return None;
            }
            let payload = app.submit_payload();
            app.finish_submit();
            Some(Action::Submit(payload))
        }

        _ => None,
    }
}

/// Next focus target in the swap form, skipping the price field for
/// market orders.
fn next_focus(app: &App, focus: Focus) -> Focus {
    match focus {
        Focus::Amount => {
            if app.draft.kind == OrderKind::Limit {
                Focus::Price
            } else {
                Focus::ToSelector
            }
        }
        Focus::Price => Focus::ToSelector,
        Focus::ToSelector => Focus::FromSelector,
        Focus::FromSelector => Focus::Amount,
        Focus::MarketList => Focus::MarketList,
    }
}

fn previous_focus(app: &App, focus: Focus) -> Focus {
    match focus {
        Focus::Amount => Focus::FromSelector,
        Focus::Price => Focus::Amount,
        Focus::ToSelector => {
            if app.draft.kind == OrderKind::Limit {
                Focus::Price
            } else {
                Focus::Amount
            }
        }
        Focus::FromSelector => Focus::ToSelector,
        Focus::MarketList => Focus::MarketList,
    }
}

/// Options shown by the focused currency selector.
pub fn selector_options(app: &App) -> Vec<String> {
    match app.focus {
        Focus::ToSelector => app.pairs.all_currencies(),
        Focus::FromSelector => app.pairs.counter_currencies(&app.to),
        _ => Vec::new(),
    }
}

/// Points the selector at the currently-applied currency.
fn sync_selector_index(app: &mut App) {
    let current = match app.focus {
        Focus::ToSelector => app.to.to_uppercase(),
        Focus::FromSelector => app.from.to_uppercase(),
        _ => return,
    };
    let options = selector_options(app);
    app.selector_index = options.iter().position(|c| *c == current).unwrap_or(0);
}

/// Moves the focused selector by `step`, wrapping at the ends.
fn cycle_selector(app: &mut App, step: i64) {
    let options = selector_options(app);
    if options.is_empty() {
        return;
    }
    let len = options.len() as i64;
    let next = (app.selector_index as i64 + step).rem_euclid(len);
    app.selector_index = next as usize;
}

/// Applies the focused selector's candidate through pair resolution.
///
/// A candidate that forms no known pair with the other leg is silently
/// ignored — the user may be mid-selection.
fn apply_selector(app: &mut App) {
    let options = selector_options(app);
    let Some(candidate) = options.get(app.selector_index).cloned() else {
        return;
    };

    match app.focus {
        Focus::ToSelector => {
            let other = app.from.clone();
            if let Some(resolution) = app.pairs.resolve(&candidate, &other) {
                let market = resolution.market;
                let side = resolution.side;
                // The untargeted leg follows from the matched one.
                let from = match side {
                    OrderSide::Buy => market.quote_unit.clone(),
                    OrderSide::Sell => market.base_unit.clone(),
                };
                let id = market.id.clone();
                app.set_trade(&id, side, candidate, from);
            }
        }
        Focus::FromSelector => {
            let to = app.to.clone();
            if let Some(resolution) = app.pairs.resolve(&candidate, &to) {
                // Paying with the base unit means selling it, so the side
                // is the opposite of the target-leg rule.
                let side = match resolution.side {
                    OrderSide::Buy => OrderSide::Sell,
                    OrderSide::Sell => OrderSide::Buy,
                };
                let id = resolution.market.id.clone();
                app.set_trade(&id, side, to, candidate);
            }
        }
        _ => {}
    }
}

/// Enters insert mode on the focused text field.
fn enter_field(app: &mut App) {
    match app.focus {
        Focus::Amount => {
            app.mode = Mode::Insert;
            app.field_cursor = app.draft.amount.len();
            app.dispatch(FormEvent::FocusAmount(true));
        }
        Focus::Price => {
            app.mode = Mode::Insert;
            app.field_cursor = app.draft.price.len();
            app.dispatch(FormEvent::FocusPrice(true));
        }
        _ => {}
    }
}

/// Leaves insert mode, releasing the field's focus flag.
fn leave_field(app: &mut App) {
    if app.mode == Mode::Insert {
        match app.focus {
            Focus::Amount => app.dispatch(FormEvent::FocusAmount(false)),
            Focus::Price => app.dispatch(FormEvent::FocusPrice(false)),
            _ => {}
        }
    }
    app.mode = Mode::Normal;
}

/// Handles keys in insert mode (numeric field editing).
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    let editing_amount = app.focus == Focus::Amount;
    let current = if editing_amount {
        app.draft.amount.clone()
    } else {
        app.draft.price.clone()
    };

    match key.code {
        KeyCode::Enter => {
            leave_field(app);
        }
        KeyCode::Char(c) => {
            let candidate = field::insert_char(&current, app.field_cursor, c);
            dispatch_field(app, editing_amount, candidate);
            let next = field_text(app, editing_amount);
            if next != current {
                app.field_cursor = (app.field_cursor + 1).min(next.len());
            }
        }
        KeyCode::Backspace => {
            if let Some(candidate) = field::remove_before(&current, app.field_cursor) {
                dispatch_field(app, editing_amount, candidate);
                let next = field_text(app, editing_amount);
                if next != current {
                    app.field_cursor = app.field_cursor.saturating_sub(1);
                }
            }
        }
        KeyCode::Left => {
            app.field_cursor = app.field_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            app.field_cursor = (app.field_cursor + 1).min(current.len());
        }
        KeyCode::Home => {
            app.field_cursor = 0;
        }
        KeyCode::End => {
            app.field_cursor = current.len();
        }
        _ => {}
    }
    None
}

fn dispatch_field(app: &mut App, editing_amount: bool, candidate: String) {
    if editing_amount {
        app.dispatch(FormEvent::Amount(candidate));
    } else {
        app.dispatch(FormEvent::Price(candidate));
    }
}

fn field_text(app: &App, editing_amount: bool) -> String {
    if editing_amount {
        app.draft.amount.clone()
    } else {
        app.draft.price.clone()
    }
}
