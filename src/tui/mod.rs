//! Terminal user interface for the quick-swap form.
//!
//! Ratatui-based UI: a markets listing tab and the swap tab (order form
//! plus live depth), driven by a tokio message loop.

pub mod app;
pub mod components;
pub mod event;
pub mod input;
pub mod tabs;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
