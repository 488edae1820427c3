//! Event handling for the stockdesk TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use stockdesk_engine::ViewKind;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Event handler that polls the terminal on a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // crossterm polling is blocking I/O
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    }
                } else {
                    Some(Event::Tick)
                };
                if let Some(e) = event {
                    if tx_clone.send(e).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, waiting until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    Submit,
    /// Quick pick by 0-based slot.
    QuickSelect(usize),
    /// Back to the search section.
    NewSearch,
    Input(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    HistoryPrev,
    HistoryNext,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollTop,
    None,
}

/// Convert a key event to an action for the visible section.
pub fn key_to_action(key: KeyEvent, active: ViewKind) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }

    if let KeyCode::F(n @ 1..=4) = key.code {
        return Action::QuickSelect(usize::from(n - 1));
    }

    match active {
        ViewKind::Search => match key.code {
            KeyCode::Enter => Action::Submit,
            KeyCode::Char(c) => Action::Input(c),
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Delete => Action::Delete,
            KeyCode::Left => Action::CursorLeft,
            KeyCode::Right => Action::CursorRight,
            KeyCode::Home => Action::CursorHome,
            KeyCode::End => Action::CursorEnd,
            KeyCode::Up => Action::HistoryPrev,
            KeyCode::Down => Action::HistoryNext,
            _ => Action::None,
        },
        ViewKind::Loading => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::Help,
            _ => Action::None,
        },
        ViewKind::Report | ViewKind::Error => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::Help,
            KeyCode::Esc | KeyCode::Char('n') => Action::NewSearch,
            KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
            KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::PageDown | KeyCode::Char(' ') => Action::PageDown,
            KeyCode::Home | KeyCode::Char('g') => Action::ScrollTop,
            _ => Action::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for kind in [ViewKind::Search, ViewKind::Loading, ViewKind::Report, ViewKind::Error] {
            assert_eq!(key_to_action(ctrl_c, kind), Action::Quit);
        }
    }

    #[test]
    fn test_search_keys_edit_input() {
        assert_eq!(key_to_action(key(KeyCode::Char('q')), ViewKind::Search), Action::Input('q'));
        assert_eq!(key_to_action(key(KeyCode::Char('?')), ViewKind::Search), Action::Input('?'));
        assert_eq!(key_to_action(key(KeyCode::Enter), ViewKind::Search), Action::Submit);
        assert_eq!(key_to_action(key(KeyCode::Up), ViewKind::Search), Action::HistoryPrev);
    }

    #[test]
    fn test_function_keys_quick_select() {
        assert_eq!(key_to_action(key(KeyCode::F(1)), ViewKind::Search), Action::QuickSelect(0));
        assert_eq!(key_to_action(key(KeyCode::F(4)), ViewKind::Report), Action::QuickSelect(3));
        assert_eq!(key_to_action(key(KeyCode::F(5)), ViewKind::Search), Action::None);
    }

    #[test]
    fn test_report_and_error_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('q')), ViewKind::Report), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Esc), ViewKind::Error), Action::NewSearch);
        assert_eq!(key_to_action(key(KeyCode::Char('n')), ViewKind::Report), Action::NewSearch);
        assert_eq!(key_to_action(key(KeyCode::PageDown), ViewKind::Report), Action::PageDown);
        assert_eq!(key_to_action(key(KeyCode::Home), ViewKind::Report), Action::ScrollTop);
    }

    #[test]
    fn test_loading_ignores_editing() {
        assert_eq!(key_to_action(key(KeyCode::Char('a')), ViewKind::Loading), Action::None);
        assert_eq!(key_to_action(key(KeyCode::Enter), ViewKind::Loading), Action::None);
        assert_eq!(key_to_action(key(KeyCode::Char('?')), ViewKind::Loading), Action::Help);
    }
}
