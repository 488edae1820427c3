//! Daily batch wrapper.
//!
//! Runs a scheduled job with its combined stdout/stderr appended to a
//! per-day log file, bracketed by a start timestamp and the exit code.

use chrono::{Local, NaiveDate};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

/// A job to run under the wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    /// Command and arguments.
    pub command_argv: Vec<String>,
    /// Directory for log files.
    pub log_dir: PathBuf,
    /// Log file prefix.
    pub log_prefix: String,
}

/// Result of a wrapped run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Log file the run was appended to.
    pub log_path: PathBuf,
    /// Exit code, or `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl BatchOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Log file name for `date`: `<prefix>_<YYYYMMDD>.log`.
pub fn log_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.log", date.format("%Y%m%d"))
}

/// Run `job`, appending to today's log file.
///
/// Spawn failures are recorded in the log before being returned.
pub async fn run_batch(job: &BatchJob) -> Result<BatchOutcome, BatchError> {
    let (program, args) = job
        .command_argv
        .split_first()
        .ok_or(BatchError::EmptyCommand)?;

    tokio::fs::create_dir_all(&job.log_dir)
        .await
        .map_err(BatchError::Io)?;

    let started = Local::now();
    let log_path = job
        .log_dir
        .join(log_file_name(&job.log_prefix, started.date_naive()));
    let mut log = open_log(&log_path)?;
    writeln!(
        log,
        "=== Batch started at {} ===",
        started.format("%Y-%m-%d %H:%M:%S")
    )
    .map_err(BatchError::Io)?;

    info!(command = %job.command_argv.join(" "), log = %log_path.display(), "Starting batch job");

    let stdout = log.try_clone().map_err(BatchError::Io)?;
    let stderr = log.try_clone().map_err(BatchError::Io)?;
    let status = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .status()
        .await
    {
        Ok(status) => status,
        Err(e) => {
            warn!(error = %e, program = %program, "Failed to start batch job");
            writeln!(log, "Failed to start {program}: {e}").map_err(BatchError::Io)?;
            return Err(BatchError::Spawn(e));
        }
    };

    let exit_code = status.code();
    let written = match exit_code {
        Some(code) => writeln!(log, "Exit code: {code}"),
        None => writeln!(log, "Exit code: signal"),
    };
    written.map_err(BatchError::Io)?;

    info!(exit_code = ?exit_code, "Batch job finished");

    Ok(BatchOutcome {
        log_path,
        exit_code,
    })
}

fn open_log(path: &Path) -> Result<File, BatchError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(BatchError::Io)
}

/// Errors from the batch wrapper.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// No command configured.
    #[error("batch command is empty")]
    EmptyCommand,

    /// I/O error on the log file or directory.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// The wrapped command could not be started.
    #[error("failed to start batch command: {0}")]
    Spawn(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job(dir: &Path, argv: &[&str]) -> BatchJob {
        BatchJob {
            command_argv: argv.iter().map(ToString::to_string).collect(),
            log_dir: dir.join("logs"),
            log_prefix: "cron".into(),
        }
    }

    #[test]
    fn test_log_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(log_file_name("cron", date), "cron_20260307.log");
    }

    #[tokio::test]
    async fn test_empty_command() {
        let temp_dir = TempDir::new().unwrap();
        let result = run_batch(&job(temp_dir.path(), &[])).await;
        assert!(matches!(result, Err(BatchError::EmptyCommand)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_output_and_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(
            temp_dir.path(),
            &["sh", "-c", "echo to-stdout; echo to-stderr >&2; exit 3"],
        );

        let outcome = run_batch(&job).await.unwrap();

        assert_eq!(outcome.exit_code, Some(3));
        assert!(!outcome.success());
        let name = outcome.log_path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("cron_") && name.ends_with(".log"));

        let log = std::fs::read_to_string(&outcome.log_path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert!(lines[0].starts_with("=== Batch started at "));
        assert!(log.contains("to-stdout"));
        assert!(log.contains("to-stderr"));
        assert_eq!(lines.last(), Some(&"Exit code: 3"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_append_to_same_day_log() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(temp_dir.path(), &["true"]);

        let first = run_batch(&job).await.unwrap();
        let second = run_batch(&job).await.unwrap();

        assert_eq!(first.log_path, second.log_path);
        assert!(second.success());
        let log = std::fs::read_to_string(&second.log_path).unwrap();
        assert_eq!(log.matches("=== Batch started at ").count(), 2);
        assert_eq!(log.matches("Exit code: 0").count(), 2);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_logged() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(temp_dir.path(), &["/nonexistent/stockdesk-batch-job"]);

        let result = run_batch(&job).await;

        assert!(matches!(result, Err(BatchError::Spawn(_))));
        let log_dir = temp_dir.path().join("logs");
        let entry = std::fs::read_dir(&log_dir).unwrap().next().unwrap().unwrap();
        let log = std::fs::read_to_string(entry.path()).unwrap();
        assert!(log.contains("Failed to start"));
    }
}
