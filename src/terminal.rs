use std::io::{self, Stdout, stdout};

use crossterm::{cursor, execute, terminal};
use tracing::{debug, warn};

use crate::error::Result;

/// Raw mode + alternate screen for as long as it lives.
pub struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        if let Err(e) = execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e.into());
        }
        debug!("terminal in game mode");
        Ok(Self { out })
    }

    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }

    /// Size of the pixel buffer that fills the screen: one column per cell,
    /// two pixels per row.
    pub fn pixel_size() -> Result<(usize, usize)> {
        let (cols, rows) = terminal::size()?;
        Ok(cells_to_pixels(cols, rows))
    }
}

pub fn cells_to_pixels(cols: u16, rows: u16) -> (usize, usize) {
    (cols as usize, rows as usize * 2)
}

/// Put the terminal back. Safe to call more than once.
pub fn restore() -> io::Result<()> {
    execute!(
        stdout(),
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        match restore() {
            Ok(()) => debug!("terminal restored"),
            Err(e) => warn!("failed to restore terminal: {e}"),
        }
    }
}
