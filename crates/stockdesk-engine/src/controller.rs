//! The UI controller.
//!
//! [`Controller`] owns the in-flight flag and drives a [`View`] through the
//! search → loading → report/error transitions. Every transition goes
//! through [`View::show`], so exactly one section is visible at a time.
//!
//! Failures are surfaced once and never retried; the user re-submits.

use crate::api::{ApiError, ResearchApi};
use crate::progress::ProgressPlan;
use crate::view::{ErrorNotice, QuotaLevel, ReportCard, ReportFormat, View, ViewKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Title shown when a rejection carries no error title.
pub const REJECTED_TITLE: &str = "Research request failed";
/// Message shown when a rejection carries no message.
pub const REJECTED_MESSAGE: &str = "The server could not complete this request.";
/// Title shown when the request could not complete.
pub const FAILED_TITLE: &str = "Connection problem";
/// Message shown when the request could not complete.
pub const FAILED_MESSAGE: &str =
    "Could not reach the research service. Check your connection and try again.";

/// What a call to [`Controller::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another request was in flight; nothing happened.
    Ignored,
    /// The input was empty; no request was made.
    Invalid,
    /// A report was shown.
    Delivered { cached: bool },
    /// The server rejected the request.
    Rejected { status: u16 },
    /// The request could not complete.
    Failed,
}

/// Drives the view from user actions and backend responses.
pub struct Controller<A, V> {
    api: A,
    view: Arc<V>,
    plan: ProgressPlan,
    format: ReportFormat,
    in_flight: AtomicBool,
}

impl<A: ResearchApi, V: View + 'static> Controller<A, V> {
    /// Create a controller with the default progress plan and markdown output.
    pub fn new(api: A, view: Arc<V>) -> Self {
        Self {
            api,
            view,
            plan: ProgressPlan::default(),
            format: ReportFormat::Markdown,
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_progress_plan(mut self, plan: ProgressPlan) -> Self {
        self.plan = plan;
        self
    }

    #[must_use]
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    /// Whether a research request is currently outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Research the ticker typed into the input field.
    ///
    /// Ignored while another request is in flight. Empty input only flags
    /// the input field. Otherwise shows the loading section, performs one
    /// research call, shows the report or error, clears the in-flight flag
    /// and finally refreshes the quota.
    pub async fn submit(&self, ticker_text: &str) -> SubmitOutcome {
        if self.is_in_flight() {
            debug!("Submit ignored, request already in flight");
            return SubmitOutcome::Ignored;
        }

        let ticker = ticker_text.trim();
        if ticker.is_empty() {
            self.view.flag_invalid_input();
            return SubmitOutcome::Invalid;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Submit ignored, request already in flight");
            return SubmitOutcome::Ignored;
        }
        let in_flight = InFlight(&self.in_flight);

        info!(ticker, "Requesting research report");
        self.view.set_loading(ticker, &self.plan.initial());
        self.view.show(ViewKind::Loading);
        let progress = self.plan.start(Arc::clone(&self.view));

        let result = self.api.research(ticker).await;
        progress.cancel().await;

        let outcome = match result {
            Ok(report) => {
                let card = ReportCard::from_report(report, self.format);
                info!(ticker = %card.ticker, cached = card.cached, "Report received");
                self.view.set_report(&card);
                self.view.show(ViewKind::Report);
                self.view.scroll_report_into_view();
                SubmitOutcome::Delivered {
                    cached: card.cached,
                }
            }
            Err(ApiError::Rejected { status, body }) => {
                warn!(ticker, status, error = ?body.error, "Research request rejected");
                let title = non_empty(body.error).unwrap_or_else(|| REJECTED_TITLE.to_string());
                let message =
                    non_empty(body.message).unwrap_or_else(|| REJECTED_MESSAGE.to_string());
                self.view.set_error(&ErrorNotice::new(title, message));
                self.view.show(ViewKind::Error);
                SubmitOutcome::Rejected { status }
            }
            Err(e) => {
                warn!(ticker, error = %e, "Research request failed");
                self.view
                    .set_error(&ErrorNotice::new(FAILED_TITLE, FAILED_MESSAGE));
                self.view.show(ViewKind::Error);
                SubmitOutcome::Failed
            }
        };

        drop(in_flight);
        self.refresh_quota().await;
        outcome
    }

    /// Fetch and display the current quota.
    ///
    /// Failures leave the previous display untouched and are only logged.
    pub async fn refresh_quota(&self) {
        match self.api.quota().await {
            Ok(quota) => {
                let level = QuotaLevel::from_status(quota);
                debug!(remaining = quota.remaining, total = quota.total, ?level, "Quota refreshed");
                self.view.set_quota(quota, level);
            }
            Err(e) => warn!(error = %e, "Quota refresh failed"),
        }
    }

    /// Return to the search section with an empty, focused input.
    pub fn reset_to_search(&self) {
        self.view.show(ViewKind::Search);
        self.view.clear_input();
        self.view.focus_input();
        self.view.scroll_to_top();
    }

    /// Fill the input with `ticker` and submit it.
    pub async fn quick_select(&self, ticker: &str) -> SubmitOutcome {
        self.view.set_input(ticker);
        self.submit(ticker).await
    }
}

/// Clears the in-flight flag when dropped, including when `submit` is
/// cancelled mid-request.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
