//! Test doubles for the engine: a recording [`View`] and a scripted
//! [`ResearchApi`].

use crate::api::{ApiError, ApiErrorBody, QuotaStatus, ResearchApi, ResearchReport};
use crate::progress::Progress;
use crate::view::{ErrorNotice, QuotaLevel, ReportCard, View, ViewKind};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A call observed by [`RecordingView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Show(ViewKind),
    Loading(String),
    Progress(usize),
    Report(ReportCard),
    Error(ErrorNotice),
    Quota(QuotaStatus, QuotaLevel),
    InvalidInput,
    SetInput(String),
    ClearInput,
    FocusInput,
    ScrollTop,
    ScrollReport,
}

/// View that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    fn record(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The section made visible by the most recent `show`.
    pub fn visible(&self) -> Option<ViewKind> {
        self.calls().into_iter().rev().find_map(|c| match c {
            ViewCall::Show(kind) => Some(kind),
            _ => None,
        })
    }

    pub fn progress_updates(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ViewCall::Progress(i) => Some(i),
                _ => None,
            })
            .collect()
    }

    pub fn last_report(&self) -> Option<ReportCard> {
        self.calls().into_iter().rev().find_map(|c| match c {
            ViewCall::Report(card) => Some(card),
            _ => None,
        })
    }

    pub fn last_error(&self) -> Option<ErrorNotice> {
        self.calls().into_iter().rev().find_map(|c| match c {
            ViewCall::Error(notice) => Some(notice),
            _ => None,
        })
    }

    pub fn last_quota(&self) -> Option<(QuotaStatus, QuotaLevel)> {
        self.calls().into_iter().rev().find_map(|c| match c {
            ViewCall::Quota(status, level) => Some((status, level)),
            _ => None,
        })
    }
}

impl View for RecordingView {
    fn show(&self, kind: ViewKind) {
        self.record(ViewCall::Show(kind));
    }

    fn set_loading(&self, ticker: &str, _progress: &Progress) {
        self.record(ViewCall::Loading(ticker.to_string()));
    }

    fn set_progress(&self, progress: &Progress) {
        self.record(ViewCall::Progress(progress.active()));
    }

    fn set_report(&self, card: &ReportCard) {
        self.record(ViewCall::Report(card.clone()));
    }

    fn set_error(&self, notice: &ErrorNotice) {
        self.record(ViewCall::Error(notice.clone()));
    }

    fn set_quota(&self, quota: QuotaStatus, level: QuotaLevel) {
        self.record(ViewCall::Quota(quota, level));
    }

    fn flag_invalid_input(&self) {
        self.record(ViewCall::InvalidInput);
    }

    fn set_input(&self, text: &str) {
        self.record(ViewCall::SetInput(text.to_string()));
    }

    fn clear_input(&self) {
        self.record(ViewCall::ClearInput);
    }

    fn focus_input(&self) {
        self.record(ViewCall::FocusInput);
    }

    fn scroll_to_top(&self) {
        self.record(ViewCall::ScrollTop);
    }

    fn scroll_report_into_view(&self) {
        self.record(ViewCall::ScrollReport);
    }
}

/// Scripted answer for `research`.
#[derive(Debug, Clone)]
pub enum MockResearch {
    Report(ResearchReport),
    Reject(u16, ApiErrorBody),
    Fail,
}

impl MockResearch {
    fn into_result(self) -> Result<ResearchReport, ApiError> {
        match self {
            Self::Report(report) => Ok(report),
            Self::Reject(status, body) => Err(ApiError::Rejected { status, body }),
            Self::Fail => Err(transport_failure()),
        }
    }
}

/// A "request failed" error without a network.
pub fn transport_failure() -> ApiError {
    ApiError::Decode(serde_json::from_str::<QuotaStatus>("connection reset").unwrap_err())
}

/// API double returning scripted responses and counting calls.
#[derive(Debug)]
pub struct MockApi {
    research: MockResearch,
    quota: Option<QuotaStatus>,
    gate: Option<Arc<Notify>>,
    research_calls: Mutex<Vec<String>>,
    quota_calls: AtomicUsize,
}

impl MockApi {
    pub fn new(research: MockResearch, quota: Option<QuotaStatus>) -> Self {
        Self {
            research,
            quota,
            gate: None,
            research_calls: Mutex::new(Vec::new()),
            quota_calls: AtomicUsize::new(0),
        }
    }

    /// Hold every `research` call until `gate` is notified.
    #[must_use]
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn research_calls(&self) -> Vec<String> {
        self.research_calls.lock().unwrap().clone()
    }

    pub fn quota_calls(&self) -> usize {
        self.quota_calls.load(Ordering::SeqCst)
    }
}

impl ResearchApi for MockApi {
    fn quota(&self) -> impl Future<Output = Result<QuotaStatus, ApiError>> + Send {
        self.quota_calls.fetch_add(1, Ordering::SeqCst);
        let quota = self.quota;
        async move { quota.ok_or_else(transport_failure) }
    }

    fn research(
        &self,
        ticker: &str,
    ) -> impl Future<Output = Result<ResearchReport, ApiError>> + Send {
        self.research_calls.lock().unwrap().push(ticker.to_string());
        let response = self.research.clone();
        let gate = self.gate.clone();
        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            response.into_result()
        }
    }
}

/// Report fixture.
pub fn report(ticker: &str, cached: bool, content: &str) -> ResearchReport {
    ResearchReport {
        ticker: ticker.to_string(),
        name: None,
        cached,
        content: content.to_string(),
        message: None,
        remaining_quota: None,
    }
}
