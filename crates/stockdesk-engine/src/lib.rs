//! stockdesk-engine: Headless engine for the stockdesk research client
//!
//! This crate provides the core logic, independent of any front-end:
//! - Wire types and the HTTP client for the research backend
//! - The UI controller and the view trait it drives
//! - The staged loading animation
//! - Configuration
//! - The daily batch wrapper

pub mod api;
pub mod batch;
pub mod client;
pub mod config;
pub mod controller;
pub mod progress;
#[cfg(test)]
mod testing;
pub mod view;

// Re-export commonly used types
pub use api::{ApiError, ApiErrorBody, CacheStats, QuotaStatus, ResearchApi, ResearchReport};
pub use batch::{log_file_name, run_batch, BatchError, BatchJob, BatchOutcome};
pub use client::HttpClient;
pub use config::{BatchConfig, Config, ConfigError, QuickPick, StageConfig};
pub use controller::{Controller, SubmitOutcome};
pub use progress::{Progress, ProgressHandle, ProgressPlan, Stage, StageStatus};
pub use view::{ErrorNotice, QuotaLevel, ReportCard, ReportFormat, View, ViewKind};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
