//! stockdesk CLI: research reports for Taiwan-listed stocks

mod console;

use clap::{Parser, Subcommand};
use console::ConsoleView;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stockdesk_engine::{
    run_batch, Config, Controller, HttpClient, QuotaLevel, ReportFormat, ResearchApi,
    SubmitOutcome,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,stockdesk=debug";

/// AI research reports for Taiwan-listed stocks
#[derive(Parser)]
#[command(name = "stockdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/stockdesk/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Research one ticker and print the report
    Research {
        /// Ticker symbol, e.g. 2330
        ticker: String,

        /// Print the raw report body instead of rendered markdown
        #[arg(long)]
        plain: bool,
    },

    /// Show the remaining research quota
    Quota {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show today's cache statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the daily batch job with output captured to a per-day log
    Batch {
        /// Command to run instead of the configured one
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    let tui_mode = matches!(cli.command, None | Some(Commands::Tui));
    let _log_guard = if tui_mode {
        init_file_logging()
    } else {
        init_stderr_logging();
        None
    };

    if let Some(Commands::Init { force }) = cli.command {
        cmd_init(&config_path, force);
        return;
    }

    let mut config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        None | Some(Commands::Tui) => {
            if let Err(e) = block_on(stockdesk_tui::run_tui(&config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Research { ticker, plain }) => cmd_research(&config, &ticker, plain),
        Some(Commands::Quota { json }) => cmd_quota(&config, json),
        Some(Commands::Stats { json }) => cmd_stats(&config, json),
        Some(Commands::Batch { command }) => cmd_batch(&config, command),
        Some(Commands::Init { .. }) => {}
    }
}

/// Log to a daily file; the terminal belongs to the UI.
fn init_file_logging() -> Option<WorkerGuard> {
    let logs_dir = dirs::data_local_dir()?.join("stockdesk").join("logs");
    std::fs::create_dir_all(&logs_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "stockdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Some(guard)
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn block_on<F: Future>(future: F) -> F::Output {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(future),
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            std::process::exit(1);
        }
    }
}

fn client(config: &Config) -> HttpClient {
    match HttpClient::new(&config.base_url, config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_research(config: &Config, ticker: &str, plain: bool) {
    let format = if plain {
        ReportFormat::Plain
    } else {
        config.report_format()
    };
    let view = Arc::new(ConsoleView::new(std::io::stdout(), std::io::stderr()));
    let controller = Controller::new(client(config), view)
        .with_progress_plan(config.progress_plan())
        .with_report_format(format);

    let outcome = block_on(controller.quick_select(ticker));
    std::process::exit(exit_code(outcome));
}

fn exit_code(outcome: SubmitOutcome) -> i32 {
    match outcome {
        SubmitOutcome::Delivered { .. } => 0,
        SubmitOutcome::Invalid => 2,
        SubmitOutcome::Ignored | SubmitOutcome::Rejected { .. } | SubmitOutcome::Failed => 1,
    }
}

fn cmd_quota(config: &Config, json: bool) {
    let quota = match block_on(client(config).quota()) {
        Ok(quota) => quota,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        print_json(&quota);
        return;
    }

    let note = match QuotaLevel::from_status(quota) {
        QuotaLevel::Normal => "",
        QuotaLevel::Warning => " (last one)",
        QuotaLevel::Empty => " (none left today)",
    };
    println!("{}/{} research requests remaining{note}", quota.remaining, quota.total);
}

fn cmd_stats(config: &Config, json: bool) {
    let stats = match block_on(client(config).stats()) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        print_json(&stats);
        return;
    }

    println!("Reports cached today: {}", stats.cached_reports_today);
    println!("Unique users today:   {}", stats.unique_users_today);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: failed to serialize: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_batch(config: &Config, command: Vec<String>) {
    let job = config.batch.job(Some(command));
    match block_on(run_batch(&job)) {
        Ok(outcome) => {
            println!("Log: {}", outcome.log_path.display());
            std::process::exit(outcome.exit_code.unwrap_or(1));
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_init(config_path: &Path, force: bool) {
    if config_path.exists() && !force {
        println!("Config already exists at {}", config_path.display());
        return;
    }

    match Config::default().save(config_path) {
        Ok(()) => println!("Created {}", config_path.display()),
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}
