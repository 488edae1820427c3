//! The presentation seam driven by the controller.
//!
//! A front-end implements [`View`]; the controller never touches rendering
//! directly. Content setters only stage data, [`View::show`] decides which
//! single section is visible.

use crate::api::{QuotaStatus, ResearchReport};
use crate::progress::Progress;

/// The four mutually exclusive sections of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewKind {
    /// Initial search (hero) section.
    #[default]
    Search,
    /// Request in flight.
    Loading,
    /// Report rendered.
    Report,
    /// Request rejected or failed.
    Error,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Loading => write!(f, "loading"),
            Self::Report => write!(f, "report"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Visual state of the quota display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaLevel {
    /// Two or more requests left.
    Normal,
    /// Exactly one request left.
    Warning,
    /// Nothing left.
    Empty,
}

impl QuotaLevel {
    /// Classify a quota status.
    pub fn from_status(status: QuotaStatus) -> Self {
        match status.remaining {
            0 => Self::Empty,
            1 => Self::Warning,
            _ => Self::Normal,
        }
    }
}

/// How report content should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Render markdown to rich text.
    #[default]
    Markdown,
    /// Show the raw body as preformatted text.
    Plain,
}

/// Everything the report section needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCard {
    pub ticker: String,
    pub name: Option<String>,
    pub cached: bool,
    /// Server notice shown above the body.
    pub notice: Option<String>,
    /// Raw markdown body.
    pub content: String,
    pub format: ReportFormat,
}

impl ReportCard {
    /// Build a card from a research response.
    pub fn from_report(report: ResearchReport, format: ReportFormat) -> Self {
        Self {
            ticker: report.ticker,
            name: report.name.filter(|n| !n.trim().is_empty()),
            cached: report.cached,
            notice: report.message.filter(|m| !m.trim().is_empty()),
            content: report.content,
            format,
        }
    }

    /// Badge text for the cached flag.
    pub fn badge(&self) -> &'static str {
        if self.cached {
            "Cached report"
        } else {
            "Freshly generated"
        }
    }

    /// Ticker followed by the display name, if any.
    pub fn heading(&self) -> String {
        match &self.name {
            Some(name) if name != &self.ticker => format!("{} {name}", self.ticker),
            _ => self.ticker.clone(),
        }
    }
}

/// Title and message shown in the error section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub title: String,
    pub message: String,
}

impl ErrorNotice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// The UI surface the controller drives.
///
/// Methods take `&self` so a view can be shared with the progress task;
/// implementations use interior mutability.
pub trait View: Send + Sync {
    /// Hide every section, then show `kind`.
    fn show(&self, kind: ViewKind);

    /// Stage the loading section for `ticker`.
    fn set_loading(&self, ticker: &str, progress: &Progress);

    /// Update the progress stages of the loading section.
    fn set_progress(&self, progress: &Progress);

    /// Stage the report section.
    fn set_report(&self, card: &ReportCard);

    /// Stage the error section.
    fn set_error(&self, notice: &ErrorNotice);

    /// Update the quota display.
    fn set_quota(&self, quota: QuotaStatus, level: QuotaLevel);

    /// Transient cue that the input was rejected.
    fn flag_invalid_input(&self);

    /// Replace the input field's text.
    fn set_input(&self, text: &str);

    fn clear_input(&self);

    fn focus_input(&self);

    fn scroll_to_top(&self);

    fn scroll_report_into_view(&self);
}
