//! Application state and action handling for the stockdesk TUI.

use crate::event::{key_to_action, Action};
use crate::view::TuiView;
use crossterm::event::KeyEvent;
use std::sync::Arc;
use stockdesk_engine::{Config, Controller, HttpClient, QuickPick, ResearchApi, SubmitOutcome};
use tokio::task::JoinHandle;
use tracing::debug;

/// The TUI application.
///
/// Controller calls run as spawned tasks so the render loop keeps drawing
/// the loading animation while a request is in flight.
pub struct App<A: ResearchApi + 'static = HttpClient> {
    controller: Arc<Controller<A, TuiView>>,
    view: Arc<TuiView>,
    quick_picks: Vec<QuickPick>,
    /// Frame counter, advanced on every tick.
    pub tick: usize,
    pub should_quit: bool,
}

impl<A: ResearchApi + 'static> App<A> {
    /// Create an app driving `api`, configured from `config`.
    pub fn new(api: A, config: &Config) -> Self {
        let view = Arc::new(TuiView::new());
        let controller = Controller::new(api, Arc::clone(&view))
            .with_progress_plan(config.progress_plan())
            .with_report_format(config.report_format());
        Self {
            controller: Arc::new(controller),
            view,
            quick_picks: config.quick_picks.clone(),
            tick: 0,
            should_quit: false,
        }
    }

    pub fn view(&self) -> &Arc<TuiView> {
        &self.view
    }

    pub fn quick_picks(&self) -> &[QuickPick] {
        &self.quick_picks
    }

    /// Refresh the quota display in the background.
    pub fn refresh_quota(&self) -> JoinHandle<()> {
        let controller = Arc::clone(&self.controller);
        tokio::spawn(async move { controller.refresh_quota().await })
    }

    /// Handle a key press. Returns the spawned request, if one was started.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<JoinHandle<SubmitOutcome>> {
        {
            let mut state = self.view.state();
            if state.show_help {
                state.show_help = false;
                return None;
            }
        }
        let active = self.view.state().active;
        self.handle_action(key_to_action(key, active))
    }

    /// Apply an action. Returns the spawned request, if one was started.
    pub fn handle_action(&mut self, action: Action) -> Option<JoinHandle<SubmitOutcome>> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => {
                let mut state = self.view.state();
                state.show_help = !state.show_help;
            }
            Action::Submit => {
                let text = {
                    let mut state = self.view.state();
                    state.input.remember();
                    state.input.content().to_string()
                };
                let controller = Arc::clone(&self.controller);
                return Some(tokio::spawn(async move { controller.submit(&text).await }));
            }
            Action::QuickSelect(slot) => {
                let Some(pick) = self.quick_picks.get(slot) else {
                    debug!(slot, "No quick pick configured for slot");
                    return None;
                };
                let ticker = pick.ticker.clone();
                let controller = Arc::clone(&self.controller);
                return Some(tokio::spawn(
                    async move { controller.quick_select(&ticker).await },
                ));
            }
            Action::NewSearch => self.controller.reset_to_search(),
            Action::Input(ch) => self.view.state().input.insert(ch),
            Action::Backspace => self.view.state().input.backspace(),
            Action::Delete => self.view.state().input.delete(),
            Action::CursorLeft => self.view.state().input.move_left(),
            Action::CursorRight => self.view.state().input.move_right(),
            Action::CursorHome => self.view.state().input.move_home(),
            Action::CursorEnd => self.view.state().input.move_end(),
            Action::HistoryPrev => self.view.state().input.history_prev(),
            Action::HistoryNext => self.view.state().input.history_next(),
            Action::ScrollUp => self.view.state().scroll_by(-1),
            Action::ScrollDown => self.view.state().scroll_by(1),
            Action::PageUp => {
                let mut state = self.view.state();
                let step = state.page_step();
                state.scroll_by(-step);
            }
            Action::PageDown => {
                let mut state = self.view.state();
                let step = state.page_step();
                state.scroll_by(step);
            }
            Action::ScrollTop => self.view.state().report_scroll = 0,
            Action::None => {}
        }
        None
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.view.tick();
    }
}
