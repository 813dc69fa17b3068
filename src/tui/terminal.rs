//! Terminal setup and teardown utilities.

use std::fmt::Display;
use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{InstantexError, Result};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

fn io_err(context: &str, e: impl Display) -> InstantexError {
    InstantexError::Io(format!("{context}: {e}"))
}

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and switches to the alternate screen buffer. On any
/// failure after raw mode was enabled, raw mode is dropped again before
/// the error is returned.
///
/// # Errors
///
/// Returns an error if stdout is not a TTY or terminal setup fails.
pub fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(InstantexError::Io(
            "an interactive terminal (TTY) is required".to_string(),
        ));
    }

    enable_raw_mode().map_err(|e| io_err("failed to enable raw mode", e))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(io_err("failed to enter alternate screen", e));
    }

    match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = disable_raw_mode();
            Err(io_err("failed to create terminal", e))
        }
    }
}

/// Restores the terminal to its original state.
///
/// Disables raw mode and returns to the main screen buffer.
///
/// # Errors
///
/// Returns an error if terminal restoration fails.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(|e| io_err("failed to disable raw mode", e))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| io_err("failed to leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| io_err("failed to show cursor", e))?;
    Ok(())
}
