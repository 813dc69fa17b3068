//! All-markets listing tab.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;

use crate::form::input::format_with_precision;
use crate::tui::app::App;
use crate::tui::components::{status_bar, tab_bar};

/// Renders the markets tab.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
            Constraint::Min(5),    // Market list
            Constraint::Length(1), // Keybindings help
        ])
        .split(area);

    tab_bar::render(frame, main_layout[0], app);
    status_bar::render(frame, main_layout[1], app);
    render_market_list(frame, main_layout[2], app);
    render_keybindings(frame, main_layout[3]);
}

/// Renders the market table with the selection highlight.
fn render_market_list(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Markets ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(
            "  {:<10} {:<10} {:>16} {:>9} {:>12}",
            "Pair", "Id", "Last", "24h", "Min amount"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let max_rows = inner.height.saturating_sub(1) as usize;
    for (i, market) in app.pairs.markets().iter().take(max_rows).enumerate() {
        let is_selected = i == app.market_index;
        let is_current = market.id == app.current_market_id;

        let marker = if is_selected { "▸" } else { " " };
        let row_style = if is_selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else if is_current {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let (last, change) = match app.tickers.get(&market.id) {
            Some(ticker) => (
                format_with_precision(ticker.last, market.price_precision),
                ticker.change_pct,
            ),
            None => ("--".to_string(), Decimal::ZERO),
        };
        let change_color = if is_selected {
            Color::Black
        } else if change >= Decimal::ZERO {
            Color::Green
        } else {
            Color::Red
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("{} {:<10} {:<10} {:>16} ", marker, market.name(), market.id, last),
                row_style,
            ),
            Span::styled(
                format!(
                    "{:>8}%",
                    if change >= Decimal::ZERO {
                        format!("+{change}")
                    } else {
                        change.to_string()
                    }
                ),
                row_style.fg(change_color),
            ),
            Span::styled(format!(" {:>12}", market.min_amount), row_style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Renders the keybindings help line.
fn render_keybindings(frame: &mut Frame, area: Rect) {
    let help = "[j/k]select [Enter]open swap [Tab]switch tab [q]quit";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
