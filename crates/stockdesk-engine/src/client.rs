//! HTTP implementation of [`ResearchApi`].

use crate::api::{
    ApiError, ApiErrorBody, CacheStats, QuotaStatus, ResearchApi, ResearchReport, ResearchRequest,
};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Client for the research backend.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// `timeout` bounds each whole request; report generation can take
    /// minutes, so callers should be generous.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stockdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch today's cache statistics.
    pub async fn stats(&self) -> Result<CacheStats, ApiError> {
        let response = self.http.get(self.endpoint("/api/stats")).send().await?;
        read_json(response).await
    }
}

impl ResearchApi for HttpClient {
    fn quota(&self) -> impl Future<Output = Result<QuotaStatus, ApiError>> + Send {
        let request = self.http.get(self.endpoint("/api/quota"));
        async move {
            let response = request.send().await?;
            read_json(response).await
        }
    }

    fn research(
        &self,
        ticker: &str,
    ) -> impl Future<Output = Result<ResearchReport, ApiError>> + Send {
        let request = self
            .http
            .post(self.endpoint("/api/research"))
            .json(&ResearchRequest { ticker });
        async move {
            let response = request.send().await?;
            read_json(response).await
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    debug!(status, bytes = body.len(), "Response received");
    decode_response(status, &body)
}

/// Decode a response body according to its status.
///
/// 2xx bodies must decode as `T`. Any other status is a rejection; its body
/// is parsed as [`ApiErrorBody`] when possible and left empty otherwise.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, ApiError> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body).map_err(ApiError::Decode);
    }
    let body = serde_json::from_slice::<ApiErrorBody>(body).unwrap_or_default();
    Err(ApiError::Rejected { status, body })
}
