//! Wire types for the research backend.
//!
//! This module defines the JSON shapes exchanged with the backend and the
//! [`ResearchApi`] trait the controller talks through.

use serde::{Deserialize, Serialize};
use std::future::Future;

/// Remaining and total research requests for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    /// Requests still available today.
    pub remaining: u32,
    /// Daily allowance.
    pub total: u32,
}

/// A successful research response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchReport {
    /// Ticker as normalized by the server.
    pub ticker: String,

    /// Display name of the security, when the server knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether the report was served from the server-side cache.
    #[serde(default)]
    pub cached: bool,

    /// Report body (markdown).
    pub content: String,

    /// Optional server notice (e.g. whether quota was charged).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Quota left after this request, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_quota: Option<u32>,
}

/// Request body for `POST /api/research`.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchRequest<'a> {
    /// Trimmed ticker text.
    pub ticker: &'a str,
}

/// Error payload returned with non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Short error title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Longer explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Requests left today, when the server reports it with the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_quota: Option<u32>,
}

impl ApiErrorBody {
    /// Build an error body with a title and optional message.
    pub fn new(error: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            error: Some(error.into()),
            message: message.map(str::to_string),
            remaining_quota: None,
        }
    }
}

/// Daily cache statistics from `GET /api/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Reports generated (and therefore cached) today.
    pub cached_reports_today: u64,
    /// Distinct callers that used quota today.
    pub unique_users_today: u64,
}

/// The backend operations the controller depends on.
///
/// [`crate::HttpClient`] is the production implementation; tests supply
/// their own.
pub trait ResearchApi: Send + Sync {
    /// Fetch the caller's current quota.
    fn quota(&self) -> impl Future<Output = Result<QuotaStatus, ApiError>> + Send;

    /// Request a research report for `ticker`.
    fn research(&self, ticker: &str)
        -> impl Future<Output = Result<ResearchReport, ApiError>> + Send;
}

/// Errors returned by [`ResearchApi`] calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("request rejected with HTTP {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Parsed error payload (empty if the body was not JSON).
        body: ApiErrorBody,
    },

    /// The request could not be completed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Whether the server rejected the request (as opposed to the request failing).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
