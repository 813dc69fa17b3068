//! Quick-swap form tab layout and rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;

use crate::form::input::format_with_precision;
use crate::models::{OrderKind, OrderSide};
use crate::tui::app::{App, Focus, Mode};
use crate::tui::components::{status_bar, tab_bar};
use crate::tui::event::selector_options;

/// Renders the swap tab.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
            Constraint::Min(10),   // Form | Book
            Constraint::Length(1), // Keybindings help
        ])
        .split(area);

    tab_bar::render(frame, main_layout[0], app);
    status_bar::render(frame, main_layout[1], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(46), Constraint::Min(30)])
        .split(main_layout[2]);

    render_form(frame, content[0], app);
    render_book(frame, content[1], app);

    render_keybindings(frame, main_layout[3], app);
}

/// Renders the order form panel.
fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Instantex ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let market = app.current_market();
    let mut lines: Vec<Line> = Vec::new();

    // Order-kind tabs
    lines.push(Line::from(vec![
        kind_tab_span(app, OrderKind::Market, "1"),
        Span::raw(" "),
        kind_tab_span(app, OrderKind::Limit, "2"),
    ]));
    lines.push(Line::default());

    // Amount field with the receive-currency selector
    lines.push(field_line(
        app,
        "Amount",
        &app.draft.amount,
        Focus::Amount,
        app.to.to_uppercase(),
    ));

    // Price: an input for limit orders, the blended estimate otherwise
    match app.draft.kind {
        OrderKind::Limit => {
            lines.push(field_line(
                app,
                "Price",
                &app.draft.price,
                Focus::Price,
                app.from.to_uppercase(),
            ));
        }
        OrderKind::Market => {
            let estimate =
                format_with_precision(app.safe_price(), market.price_precision);
            lines.push(Line::from(vec![
                Span::raw(format!("  {:<8} ", "Price")),
                Span::styled(
                    format!("≈ {estimate}"),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("  {}", app.from.to_uppercase())),
            ]));
        }
    }
    lines.push(Line::default());

    // Currency selectors
    lines.push(selector_line(app, "Receive", Focus::ToSelector, &app.to));
    lines.push(selector_line(app, "Pay with", Focus::FromSelector, &app.from));
    lines.push(Line::default());

    // Total, in quote currency; market totals are depth estimates
    let total_precision = market.price_precision + market.amount_precision;
    let total = format_with_precision(app.total(), total_precision);
    let approx = if app.draft.kind == OrderKind::Market {
        "≈ "
    } else {
        ""
    };
    lines.push(Line::from(vec![
        Span::raw(format!("  {:<8} ", "Total")),
        Span::styled(
            format!("{approx}{total}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}", market.quote_unit.to_uppercase())),
    ]));

    // Available balance of the spend currency
    let available = app.available();
    let available_text = if available > Decimal::ZERO {
        format!(
            "{}  {}",
            format_with_precision(available, app.available_precision()),
            app.from.to_uppercase()
        )
    } else {
        String::new()
    };
    lines.push(Line::from(vec![
        Span::raw(format!("  {:<8} ", "Available")),
        Span::styled(available_text, Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::default());

    // Side banner and submit control
    let side_color = match app.draft.side {
        OrderSide::Buy => Color::Green,
        OrderSide::Sell => Color::Red,
    };
    let base = market.base_unit.to_uppercase();
    lines.push(Line::from(Span::styled(
        format!("  {} {}", app.draft.side.as_str().to_uppercase(), base),
        Style::default().fg(side_color).add_modifier(Modifier::BOLD),
    )));

    let submit_style = if app.submit_disabled() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(side_color)
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(" [s] Exchange ", submit_style),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// A span for one order-kind tab, highlighted when active.
fn kind_tab_span(app: &App, kind: OrderKind, key: &str) -> Span<'static> {
    let label = format!(" [{key}] {} ", kind.label());
    if app.draft.kind == kind {
        Span::styled(
            label,
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )
    } else {
        Span::styled(label, Style::default().fg(Color::White))
    }
}

/// A labelled input row with cursor rendering while editing.
fn field_line(
    app: &App,
    label: &str,
    value: &str,
    target: Focus,
    currency: String,
) -> Line<'static> {
    let is_focused = app.focus == target;
    let editing = is_focused && app.mode == Mode::Insert;

    let marker = if is_focused { "▸" } else { " " };
    let label_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::styled(
        format!("{marker} {label:<8} "),
        label_style,
    )];

    if editing {
        let at = app.field_cursor.min(value.len());
        let (before, rest) = value.split_at(at);
        let (cursor_char, after) = match rest.char_indices().nth(1) {
            Some((i, _)) => rest.split_at(i),
            None if rest.is_empty() => (" ", ""),
            None => (rest, ""),
        };
        spans.push(Span::raw(before.to_string()));
        spans.push(Span::styled(
            cursor_char.to_string(),
            Style::default().fg(Color::Black).bg(Color::White),
        ));
        spans.push(Span::raw(after.to_string()));
    } else if value.is_empty() {
        spans.push(Span::styled(
            label.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(value.to_string()));
    }

    spans.push(Span::raw(format!("  {currency}")));
    Line::from(spans)
}

/// A currency selector row; shows the candidate list position when
/// focused.
fn selector_line(app: &App, label: &str, target: Focus, applied: &str) -> Line<'static> {
    let is_focused = app.focus == target;
    let marker = if is_focused { "▸" } else { " " };

    let display = if is_focused {
        let options = selector_options(app);
        match options.get(app.selector_index) {
            Some(candidate) => format!("◂ {candidate} ▸"),
            None => format!("◂ {} ▸", applied.to_uppercase()),
        }
    } else {
        applied.to_uppercase()
    };

    let style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(format!("{marker} {label:<8} "), style),
        Span::styled(display, style),
    ])
}

/// Renders the order book panel; the side a market order would consume
/// carries the focus color.
fn render_book(frame: &mut Frame, area: Rect, app: &App) {
    let market = app.current_market();
    let block = Block::default()
        .title(format!(" Order Book {} ", market.name()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let book = app.books.get(&market.id);
    let mut lines: Vec<Line> = Vec::new();

    let available_height = inner.height.saturating_sub(3) as usize;
    let levels_per_side = (available_height / 2).clamp(1, 10);

    let consuming_asks = app.draft.side == OrderSide::Buy;
    let ask_header_style = if consuming_asks {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red)
    };
    lines.push(Line::from(Span::styled(
        if consuming_asks { "ASK ◂ consuming" } else { "ASK" },
        ask_header_style,
    )));

    if let Some(book) = book {
        let max_qty = book
            .asks
            .iter()
            .chain(book.bids.iter())
            .take(levels_per_side * 2)
            .map(|level| level.qty)
            .max()
            .unwrap_or(Decimal::ONE);

        for ask in book.asks.iter().take(levels_per_side).rev() {
            lines.push(level_line(ask.price, ask.qty, max_qty, Color::Red, market));
        }

        if let Some(spread) = book.spread() {
            lines.push(Line::from(Span::styled(
                format!("─── spread {spread} ───"),
                Style::default().fg(Color::DarkGray),
            )));
        }

        let bid_header_style = if consuming_asks {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(
            if consuming_asks { "BID" } else { "BID ◂ consuming" },
            bid_header_style,
        )));

        for bid in book.bids.iter().take(levels_per_side) {
            lines.push(level_line(bid.price, bid.qty, max_qty, Color::Green, market));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "No data",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// One book level: price, quantity, and a relative-size bar.
fn level_line(
    price: Decimal,
    qty: Decimal,
    max_qty: Decimal,
    color: Color,
    market: &crate::models::market::Market,
) -> Line<'static> {
    let bar_len = ((qty / max_qty) * Decimal::from(15))
        .trunc()
        .to_string()
        .parse::<usize>()
        .unwrap_or(1);
    let bar = "▒".repeat(bar_len.clamp(1, 15));

    Line::from(vec![
        Span::styled(
            format!(
                "{:>14} ",
                format_with_precision(price, market.price_precision)
            ),
            Style::default().fg(color),
        ),
        Span::raw(format!(
            "{:>12} ",
            format_with_precision(qty, market.amount_precision)
        )),
        Span::styled(bar, Style::default().fg(color)),
    ])
}

/// Renders the keybindings help line.
fn render_keybindings(frame: &mut Frame, area: Rect, app: &App) {
    let help = if app.mode == Mode::Insert {
        "type digits [Backspace]delete [←/→]cursor [Enter/Esc]done"
    } else {
        "[1/2]order kind [j/k]focus [h/l]currency [i/Enter]edit [s]exchange [Tab]tab [q]quit"
    };
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
