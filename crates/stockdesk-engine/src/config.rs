//! Configuration types for the stockdesk client.
//!
//! The configuration lives in a single JSON file. Every field has a
//! default, so a missing file or a partial file is valid.

use crate::batch::BatchJob;
use crate::progress::{ProgressPlan, Stage};
use crate::view::ReportFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration for stockdesk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the research backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout in seconds for a single request. Report generation is slow.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Render report markdown; when false the raw body is shown.
    #[serde(default = "default_true")]
    pub render_markdown: bool,

    /// Loading stages shown while a request is in flight.
    #[serde(default = "default_progress_stages")]
    pub progress_stages: Vec<StageConfig>,

    /// Tickers offered as one-key shortcuts on the search screen.
    #[serde(default = "default_quick_picks")]
    pub quick_picks: Vec<QuickPick>,

    /// Daily batch job settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}

fn default_request_timeout() -> u64 {
    180
}

fn default_true() -> bool {
    true
}

fn default_progress_stages() -> Vec<StageConfig> {
    ProgressPlan::default()
        .stages()
        .iter()
        .map(|stage| StageConfig {
            label: stage.label.clone(),
            offset_ms: u64::try_from(stage.offset.as_millis()).unwrap_or(u64::MAX),
        })
        .collect()
}

fn default_quick_picks() -> Vec<QuickPick> {
    vec![
        QuickPick::new("2330", "TSMC"),
        QuickPick::new("2317", "Hon Hai"),
        QuickPick::new("2454", "MediaTek"),
        QuickPick::new("2603", "Evergreen"),
    ]
}

/// One loading stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub label: String,
    /// Milliseconds after the request starts at which the stage activates.
    pub offset_ms: u64,
}

/// A quick-select shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPick {
    pub ticker: String,
    pub label: String,
}

impl QuickPick {
    pub fn new(ticker: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            label: label.into(),
        }
    }
}

/// Settings for the daily batch wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Command and arguments of the wrapped job.
    #[serde(default = "default_batch_command")]
    pub command_argv: Vec<String>,

    /// Directory that receives the per-day log files.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Log file prefix; files are named `<prefix>_<YYYYMMDD>.log`.
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
}

fn default_batch_command() -> Vec<String> {
    vec!["python3".into(), "main.py".into()]
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_prefix() -> String {
    "cron".into()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            command_argv: default_batch_command(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
        }
    }
}

impl BatchConfig {
    /// Build the job to run, optionally replacing the configured command.
    pub fn job(&self, command_override: Option<Vec<String>>) -> BatchJob {
        BatchJob {
            command_argv: command_override
                .filter(|argv| !argv.is_empty())
                .unwrap_or_else(|| self.command_argv.clone()),
            log_dir: self.log_dir.clone(),
            log_prefix: self.log_prefix.clone(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default config file location (`<config dir>/stockdesk/config.json`).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stockdesk")
            .join("config.json")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn report_format(&self) -> ReportFormat {
        if self.render_markdown {
            ReportFormat::Markdown
        } else {
            ReportFormat::Plain
        }
    }

    /// The loading stages as a plan, ordered by offset.
    pub fn progress_plan(&self) -> ProgressPlan {
        let mut stages: Vec<Stage> = self
            .progress_stages
            .iter()
            .map(|s| Stage::new(s.label.clone(), Duration::from_millis(s.offset_ms)))
            .collect();
        stages.sort_by_key(|s| s.offset);
        ProgressPlan::new(stages)
    }

    /// Look up a quick pick by its 0-based slot.
    pub fn quick_pick(&self, slot: usize) -> Option<&QuickPick> {
        self.quick_picks.get(slot)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
            render_markdown: true,
            progress_stages: default_progress_stages(),
            quick_picks: default_quick_picks(),
            batch: BatchConfig::default(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
