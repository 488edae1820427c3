//! Terminal implementation of the controller's [`View`].
//!
//! The controller and the progress task write into a shared [`ViewState`];
//! the render loop reads it every tick.

use crate::ui::widgets::TextInputState;
use std::sync::{Mutex, MutexGuard, PoisonError};
use stockdesk_engine::{
    ErrorNotice, Progress, QuotaLevel, QuotaStatus, ReportCard, View, ViewKind,
};

/// Ticks the invalid-input cue stays visible (about 1.5s at 4 Hz).
pub const INVALID_CUE_TICKS: u8 = 6;

/// Everything the screens render.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// The one visible section.
    pub active: ViewKind,
    pub input: TextInputState,
    pub input_focused: bool,
    /// Remaining ticks of the invalid-input cue.
    pub invalid_ticks: u8,
    pub loading_ticker: String,
    pub progress: Option<Progress>,
    pub report: Option<ReportCard>,
    /// First visible report line.
    pub report_scroll: u16,
    /// Largest useful scroll offset for the last drawn report.
    pub report_max_scroll: u16,
    /// Visible report body height when last drawn.
    pub report_page: u16,
    pub error: Option<ErrorNotice>,
    pub quota: Option<(QuotaStatus, QuotaLevel)>,
    pub show_help: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            input_focused: true,
            ..Self::default()
        }
    }

    pub fn invalid_cue(&self) -> bool {
        self.invalid_ticks > 0
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.report_scroll).saturating_add(delta);
        let clamped = next.clamp(0, i32::from(self.report_max_scroll));
        self.report_scroll = u16::try_from(clamped).unwrap_or(0);
    }

    /// Record the scroll limit of the report as last drawn.
    pub fn set_max_scroll(&mut self, max: u16) {
        self.report_max_scroll = max;
        self.report_scroll = self.report_scroll.min(max);
    }

    /// Scroll distance for PageUp/PageDown, keeping one line of context.
    pub fn page_step(&self) -> i32 {
        i32::from(self.report_page.saturating_sub(1).max(1))
    }
}

/// A [`View`] over shared [`ViewState`].
#[derive(Debug)]
pub struct TuiView {
    state: Mutex<ViewState>,
}

impl Default for TuiView {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiView {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ViewState::new()),
        }
    }

    /// Lock the state for reading or editing.
    pub fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advance time-based state.
    pub fn tick(&self) {
        let mut state = self.state();
        state.invalid_ticks = state.invalid_ticks.saturating_sub(1);
    }
}

impl View for TuiView {
    fn show(&self, kind: ViewKind) {
        let mut state = self.state();
        state.active = kind;
        if kind != ViewKind::Search {
            state.input_focused = false;
        }
    }

    fn set_loading(&self, ticker: &str, progress: &Progress) {
        let mut state = self.state();
        state.loading_ticker = ticker.to_string();
        state.progress = Some(progress.clone());
    }

    fn set_progress(&self, progress: &Progress) {
        self.state().progress = Some(progress.clone());
    }

    fn set_report(&self, card: &ReportCard) {
        let mut state = self.state();
        state.report = Some(card.clone());
        state.report_max_scroll = 0;
    }

    fn set_error(&self, notice: &ErrorNotice) {
        self.state().error = Some(notice.clone());
    }

    fn set_quota(&self, quota: QuotaStatus, level: QuotaLevel) {
        self.state().quota = Some((quota, level));
    }

    fn flag_invalid_input(&self) {
        self.state().invalid_ticks = INVALID_CUE_TICKS;
    }

    fn set_input(&self, text: &str) {
        self.state().input.set(text);
    }

    fn clear_input(&self) {
        self.state().input.clear();
    }

    fn focus_input(&self) {
        self.state().input_focused = true;
    }

    fn scroll_to_top(&self) {
        self.state().report_scroll = 0;
    }

    fn scroll_report_into_view(&self) {
        self.state().report_scroll = 0;
    }
}
