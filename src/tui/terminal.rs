//! Raw-mode terminal lifecycle for the dashboard.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{Result, TradewatchError};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

fn io_error(context: &'static str) -> impl FnOnce(io::Error) -> TradewatchError {
    move |e| TradewatchError::Io(format!("{context}: {e}"))
}

/// Best-effort undo of a half-finished setup.
fn abandon_setup(left_main_screen: bool) {
    if left_main_screen {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
    let _ = disable_raw_mode();
}

/// Puts stdout into raw mode on the alternate screen.
///
/// # Errors
///
/// Fails when stdout is not a TTY or any terminal call fails; whatever was
/// already switched is switched back first.
pub fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(TradewatchError::Io(
            "the dashboard requires an interactive terminal (TTY)".to_string(),
        ));
    }

    enable_raw_mode().map_err(io_error("failed to enable raw mode"))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        abandon_setup(false);
        return Err(io_error("failed to enter alternate screen")(e));
    }

    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        abandon_setup(true);
        io_error("failed to create terminal")(e)
    })
}

/// Leaves raw mode and the alternate screen, and shows the cursor again.
///
/// # Errors
///
/// Returns the first terminal call that fails.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(io_error("failed to disable raw mode"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(io_error("failed to leave alternate screen"))?;
    terminal
        .show_cursor()
        .map_err(io_error("failed to show cursor"))
}
