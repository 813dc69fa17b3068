//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::form::input::format_with_precision;
use crate::tui::app::{App, StatusLevel};

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    // Every fill is simulated locally; make that impossible to miss.
    let mut spans = vec![
        Span::styled(" PAPER ", Style::default().fg(Color::Black).bg(Color::Yellow)),
        Span::raw("│"),
    ];

    let market = app.current_market();
    spans.push(Span::styled(
        format!(" {} ", market.name()),
        Style::default().fg(Color::White),
    ));

    if let Some(reference) = app.reference_price() {
        spans.push(Span::styled(
            format!("last {} ", format_with_precision(reference, market.price_precision)),
            Style::default().fg(Color::Cyan),
        ));
    }
    spans.push(Span::raw("│"));

    spans.push(Span::styled(
        format!(
            " {} {} ",
            format_with_precision(app.available(), app.available_precision()),
            app.from.to_uppercase()
        ),
        Style::default().fg(Color::Green),
    ));
    spans.push(Span::raw("│"));

    if let Some(ref status) = app.status {
        let color = match status.level {
            StatusLevel::Info => Color::Green,
            StatusLevel::Error => Color::Red,
        };
        spans.push(Span::styled(
            format!(" {} ", status.message),
            Style::default().fg(color),
        ));
    }

    let tab_info = format!(" {}/{} ", app.active_tab + 1, app.tabs.len());
    spans.push(Span::raw(format!(
        "{:>width$}",
        tab_info,
        width = area.width.saturating_sub(50) as usize
    )));

    let para = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
