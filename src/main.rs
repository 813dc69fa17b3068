use instantex::config::fetch_config;
use instantex::feed::MarketFeed;
use instantex::pairs::PairIndex;
use instantex::tui::event::{self, Action, Event, Message};
use instantex::tui::{App, render, restore_terminal, setup_terminal};
use instantex::{InstantexError, Result};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr so tracing output does not corrupt the TUI.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let app_config = fetch_config()?;

    let mut feed = MarketFeed::with_default_markets();
    let pairs = PairIndex::new(feed.markets().to_vec());
    let mut app = App::new(pairs, &app_config.market);

    for feed_event in feed.bootstrap() {
        event::update(&mut app, Message::Feed(feed_event));
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    event::spawn_event_reader(tx.clone());
    event::spawn_tick_timer(tx, app_config.tick_ms);

    let mut terminal = setup_terminal()?;

    let result = run(&mut terminal, &mut app, &mut feed, &mut rx).await;

    restore_terminal(&mut terminal)?;
    result
}

/// Drives the draw/update loop until the app asks to quit.
async fn run(
    terminal: &mut instantex::tui::Tui,
    app: &mut App,
    feed: &mut MarketFeed,
    rx: &mut mpsc::UnboundedReceiver<Message>,
) -> Result<()> {
    while !app.should_quit {
        terminal
            .draw(|frame| render(frame, app))
            .map_err(|e| InstantexError::Io(format!("draw failed: {e}")))?;

        let Some(message) = rx.recv().await else {
            break;
        };

        // The feed advances on the same timer that refreshes the UI.
        if matches!(message, Message::Input(Event::Tick)) {
            for feed_event in feed.tick() {
                event::update(app, Message::Feed(feed_event));
            }
        }

        if let Some(action) = event::update(app, message) {
            handle_action(app, feed, action);
        }
    }
    Ok(())
}

/// Executes actions the UI cannot perform itself.
fn handle_action(app: &mut App, feed: &mut MarketFeed, action: Action) {
    match action {
        Action::Submit(payload) => {
            let market = app.current_market().clone();
            match feed.execute(&payload, &market) {
                Ok(fill) => {
                    app.show_fill(&fill);
                    event::update(
                        app,
                        Message::Feed(instantex::feed::FeedEvent::Balances(
                            feed.balances_snapshot(),
                        )),
                    );
                }
                Err(rejections) => {
                    let summary = rejections
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; ");
                    tracing::warn!(%summary, "order rejected");
                    app.show_error(summary);
                }
            }
        }
    }
}
