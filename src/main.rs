//! Attendance Dashboard - load an attendance workbook and report dashboard metrics.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use attendance_dashboard as app;

use app::acquire::{self, Acquirer};
use app::config::{AppConfig, ConfigLoadResult};
use app::dashboard::{self, DashboardStore, LoadProgress};
use app::export;
use app::pipeline::PipelineOptions;
use app::report::ReportDocument;

/// Attendance spreadsheet dashboard.
#[derive(Parser)]
#[command(name = "attendance-dashboard", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Config file path (overrides --dev)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Load this .xlsx file instead of the configured candidates
    #[arg(long, value_name = "PATH", conflicts_with = "pick")]
    file: Option<PathBuf>,

    /// Choose the workbook with a file picker
    #[arg(long)]
    pick: bool,

    /// Time zone for date/time decomposition ("local" or IANA name)
    #[arg(long, value_name = "TZ")]
    timezone: Option<String>,

    /// Restrict the daily series to one employee and show their summary
    #[arg(long, value_name = "NAME")]
    employee: Option<String>,

    /// Print the dashboard as JSON
    #[arg(long)]
    json: bool,

    /// Write records as CSV (opens a save dialog when no path is given)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    export_csv: Option<Option<PathBuf>>,

    /// Write records as XLSX (opens a save dialog when no path is given)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    export_xlsx: Option<Option<PathBuf>>,

    /// Also write daily-rolling log files to this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_dir.as_deref());

    tracing::info!("Attendance Dashboard starting...");

    let config = load_config(&cli)?;
    let mut options = config.pipeline_options()?;
    if let Some(tz) = &cli.timezone {
        options.zone = tz.parse().map_err(anyhow::Error::msg)?;
    }
    tracing::info!("Time zone: {}, late after {}", options.zone, options.late_after.format("%H:%M"));

    // Create tokio runtime for the workbook read
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let store = DashboardStore::new();
    rt.block_on(load(&cli, &config, options, &store))?;

    let snapshot = store.snapshot();
    if let Some(error) = &snapshot.error {
        bail!("{error}\n\nRun again with --pick or --file <path> to choose a workbook.");
    }
    let state = snapshot.state.as_ref();

    if let Some(employee) = cli.employee.as_deref()
        && !state.roster.iter().any(|name| name == employee)
    {
        tracing::warn!("Employee '{employee}' not found in roster");
    }

    let document = ReportDocument::new(state, cli.employee.as_deref());
    if cli.json {
        println!("{}", document.to_json()?);
    } else {
        print!("{}", document.render());
    }

    if let Some(requested) = &cli.export_csv {
        if let Some(path) = export_path(requested.as_deref(), export::CSV_FILE_NAME) {
            export::write_csv(&state.records, &path)?;
            tracing::info!("CSV written to {}", path.display());
        }
    }
    if let Some(requested) = &cli.export_xlsx {
        let default_name = export::generate_export_filename("attendance");
        if let Some(path) = export_path(requested.as_deref(), &default_name) {
            export::export_records_to_excel(&state.records, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Excel written to {}", path.display());
        }
    }

    Ok(())
}

/// Initialize stderr logging, plus a rolling file when `log_dir` is set.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = || EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "attendance-dashboard.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter())
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    // Determine config path based on mode
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None if cli.dev => {
            tracing::info!("Dev mode: loading config from current directory");
            PathBuf::from("config.toml")
        }
        None => AppConfig::default_path(),
    };
    tracing::info!("Config path: {:?}", config_path);

    let config = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            config
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, writing defaults");
            let config = AppConfig::default();
            if let Err(e) = config.save(&config_path) {
                tracing::warn!("Could not write default config: {e}");
            }
            config
        }
        ConfigLoadResult::Invalid(e) => {
            return Err(e).with_context(|| format!("Invalid config at {}", config_path.display()));
        }
    };

    Ok(config.with_env_overrides())
}

/// Acquire and load the workbook, publishing the outcome into `store`.
async fn load(cli: &Cli, config: &AppConfig, options: PipelineOptions, store: &DashboardStore) -> anyhow::Result<()> {
    if let Some(path) = &cli.file {
        store.begin_load();
        let outcome = acquire::read_local_file(path).await;
        store.publish(outcome.and_then(|workbook| dashboard::load_acquired(&workbook, &options)));
        return Ok(());
    }

    if cli.pick {
        let Some(path) = acquire::pick_local_file() else {
            bail!("No file selected");
        };
        store.begin_load();
        let outcome = acquire::read_local_file(&path).await;
        store.publish(outcome.and_then(|workbook| dashboard::load_acquired(&workbook, &options)));
        return Ok(());
    }

    let acquirer = Acquirer::from_config(&config.source)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(dashboard::run_load_background(acquirer, options, store.clone(), tx));

    while let Some(event) = rx.recv().await {
        match event {
            LoadProgress::Progress { percent, message } => {
                tracing::info!("[{:>3.0}%] {message}", percent * 100.0);
            }
            LoadProgress::Completed { records, timestamp } => {
                tracing::info!("Loaded {records} records at {}", timestamp.format("%H:%M:%S"));
            }
            LoadProgress::Error(message) => tracing::debug!("Load failed: {message}"),
        }
    }

    task.await.context("Load task failed")?;
    Ok(())
}

/// Explicit path, or ask with a save dialog.
fn export_path(requested: Option<&Path>, default_name: &str) -> Option<PathBuf> {
    match requested {
        Some(path) => Some(path.to_path_buf()),
        None => export::show_save_dialog(default_name),
    }
}
