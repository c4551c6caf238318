use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::domain::{FilterField, Message, TrackerConfig, TrackerError};
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &TrackerConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, TrackerError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    self.handle_key(key, model.raw_keyevents())
                }
                Event::Resize(width, height) => Some(Message::Resize(width as usize, height as usize)),
                _ => None,
            });
        }
        Ok(None)
    }

    fn handle_key(&self, key: KeyEvent, raw: bool) -> Option<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Message::Quit);
        }
        if raw {
            return Some(Message::RawKey(key));
        }

        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Esc => Some(Message::Exit),
            KeyCode::Enter => Some(Message::Enter),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::MoveUp),
            KeyCode::PageDown => Some(Message::MovePageDown),
            KeyCode::PageUp => Some(Message::MovePageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::MoveBeginning),
            KeyCode::Char('G') | KeyCode::End => Some(Message::MoveEnd),
            KeyCode::Char('a') => Some(Message::OpenForm),
            KeyCode::Char('c') => Some(Message::NextFilterValue(FilterField::Country)),
            KeyCode::Char('C') => Some(Message::PrevFilterValue(FilterField::Country)),
            KeyCode::Char('s') => Some(Message::NextFilterValue(FilterField::Sector)),
            KeyCode::Char('S') => Some(Message::PrevFilterValue(FilterField::Sector)),
            KeyCode::Char('i') => Some(Message::NextFilterValue(FilterField::Interest)),
            KeyCode::Char('I') => Some(Message::PrevFilterValue(FilterField::Interest)),
            KeyCode::Char('r') => Some(Message::ResetFilters),
            KeyCode::Char('e') => Some(Message::Export),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
