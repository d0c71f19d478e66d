use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Input;

/// Everything the terminal told us during one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameInput {
    pub keys: Input,
    pub quit: bool,
    /// Latest terminal size in cells, if it changed.
    pub resize: Option<(u16, u16)>,
}

impl FrameInput {
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.apply_key(key),
            Event::Resize(cols, rows) => self.resize = Some((cols, rows)),
            _ => {}
        }
    }

    fn apply_key(&mut self, key: KeyEvent) {
        // Terminals reporting releases would otherwise press twice.
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('p') | KeyCode::Char('P') => self.keys.pause = true,
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => self.keys.up = true,
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => self.keys.down = true,
            KeyCode::Enter => self.keys.enter = true,
            _ => {}
        }
    }
}

/// Drain pending terminal events without blocking.
pub fn poll() -> io::Result<FrameInput> {
    let mut frame = FrameInput::default();
    while event::poll(Duration::ZERO)? {
        frame.apply(event::read()?);
    }
    Ok(frame)
}
