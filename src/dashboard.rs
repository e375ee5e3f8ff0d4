//! Dashboard load orchestration and published state.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use crate::acquire::{AcquiredWorkbook, Acquirer};
use crate::aggregate::{DailyAttendance, DepartmentShare, SummaryStats, aggregate};
use crate::error::Result;
use crate::models::AttendanceRecord;
use crate::pipeline::{self, PipelineOptions};
use crate::workbook;

/// One fully derived dashboard. Never partially updated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub records: Vec<AttendanceRecord>,
    pub roster: Vec<String>,
    pub stats: SummaryStats,
    pub daily: Vec<DailyAttendance>,
    pub departments: Vec<DepartmentShare>,
    /// Rows rejected for a missing name or sign-in.
    pub rejected_rows: usize,
    pub source: Option<String>,
    pub loaded_at: Option<DateTime<Local>>,
}

impl DashboardState {
    /// Aggregate `records` into a complete state.
    pub fn from_records(records: Vec<AttendanceRecord>) -> Self {
        let derived = aggregate(&records);
        Self {
            records,
            roster: derived.roster,
            stats: derived.stats,
            daily: derived.daily,
            departments: derived.departments,
            rejected_rows: 0,
            source: None,
            loaded_at: None,
        }
    }

    /// State with no records, shown before a load and after a failed one.
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Workbook bytes to dashboard, synchronously.
pub fn load_dashboard(bytes: &[u8], options: &PipelineOptions) -> Result<DashboardState> {
    let sheet = workbook::read_first_sheet(bytes)?;
    let report = pipeline::normalize(&sheet, options)?;
    let rejected_rows = report.rejected_count();

    info!(
        "Processed {} valid attendance records out of {} rows",
        report.records.len(),
        report.total_rows
    );

    let mut state = DashboardState::from_records(report.records);
    state.rejected_rows = rejected_rows;
    state.loaded_at = Some(Local::now());
    Ok(state)
}

/// Run the pipeline over an acquired workbook and tag the result with its source.
pub fn load_acquired(acquired: &AcquiredWorkbook, options: &PipelineOptions) -> Result<DashboardState> {
    Ok(load_dashboard(&acquired.bytes, options)?.with_source(acquired.source.clone()))
}

/// What subscribers observe.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub state: Arc<DashboardState>,
    pub loading: bool,
    /// Message of the last failed load; cleared by the next success.
    pub error: Option<String>,
}

/// Holds the current dashboard and broadcasts every transition.
#[derive(Debug, Clone)]
pub struct DashboardStore {
    tx: Arc<watch::Sender<DashboardSnapshot>>,
}

impl DashboardStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DashboardSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.tx.borrow().clone()
    }

    /// Mark a load as in flight; the current state stays visible.
    pub fn begin_load(&self) {
        self.tx.send_modify(|snapshot| snapshot.loading = true);
    }

    /// Replace the state with a load outcome. Failures reset to empty.
    pub fn publish(&self, outcome: Result<DashboardState>) {
        let next = match outcome {
            Ok(state) => DashboardSnapshot {
                state: Arc::new(state),
                loading: false,
                error: None,
            },
            Err(e) => {
                error!("Dashboard load failed: {e}");
                DashboardSnapshot {
                    state: Arc::new(DashboardState::empty()),
                    loading: false,
                    error: Some(e.to_string()),
                }
            }
        };
        self.tx.send_replace(next);
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Load progress events for a background load.
#[derive(Debug, Clone)]
pub enum LoadProgress {
    Progress { percent: f32, message: String },
    Completed { records: usize, timestamp: DateTime<Local> },
    Error(String),
}

/// Acquire and load, reporting `(fraction, message)` along the way.
pub async fn load_with_progress<F>(
    acquirer: &Acquirer,
    options: &PipelineOptions,
    mut on_progress: F,
) -> Result<DashboardState>
where
    F: FnMut(f32, &str),
{
    on_progress(0.0, "Looking for attendance workbook...");
    let acquired = acquirer.acquire().await?;
    on_progress(0.4, &format!("Read {} bytes from {}", acquired.bytes.len(), acquired.source));

    on_progress(0.5, "Processing attendance records...");
    let state = load_acquired(&acquired, options)?;

    on_progress(1.0, &format!("Done! Loaded {} records", state.records.len()));
    Ok(state)
}

/// Run a load in background, publish the outcome and report progress via channel.
pub async fn run_load_background(
    acquirer: Acquirer,
    options: PipelineOptions,
    store: DashboardStore,
    tx: mpsc::UnboundedSender<LoadProgress>,
) {
    store.begin_load();

    let result = load_with_progress(&acquirer, &options, |progress, message| {
        let _ = tx.send(LoadProgress::Progress {
            percent: progress,
            message: message.to_string(),
        });
    })
    .await;

    match &result {
        Ok(state) => {
            let _ = tx.send(LoadProgress::Completed {
                records: state.records.len(),
                timestamp: Local::now(),
            });
        }
        Err(e) => {
            let _ = tx.send(LoadProgress::Error(e.to_string()));
        }
    }
    store.publish(result);
}
