//! Workbook acquisition: configured candidates first, local file selection as fallback.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::error::{AppError, Result};

/// Conventional workbook file name.
pub const WORKBOOK_FILE_NAME: &str = "attendance.xlsx";

/// One place the workbook may live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCandidate {
    Url(String),
    Path(PathBuf),
}

impl SourceCandidate {
    /// `http(s)://` strings are URLs; anything else is a file path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for SourceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Raw workbook bytes and where they came from.
#[derive(Debug, Clone)]
pub struct AcquiredWorkbook {
    pub bytes: Vec<u8>,
    pub source: String,
}

/// Tries each candidate in order until one yields bytes.
pub struct Acquirer {
    client: Client,
    candidates: Vec<SourceCandidate>,
}

impl Acquirer {
    /// Create an acquirer. `timeout` of `None` waits on fetches indefinitely.
    pub fn new(candidates: Vec<SourceCandidate>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            candidates,
        })
    }

    /// Build from the `[source]` config section.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let candidates = config
            .candidates
            .iter()
            .filter(|c| !c.trim().is_empty())
            .map(|c| SourceCandidate::parse(c))
            .collect();
        Self::new(candidates, config.fetch_timeout_secs.map(Duration::from_secs))
    }

    pub fn candidates(&self) -> &[SourceCandidate] {
        &self.candidates
    }

    /// Return the first candidate that can be read.
    ///
    /// A candidate that answers with zero bytes ends the search with an error
    /// rather than falling through to the next one.
    pub async fn acquire(&self) -> Result<AcquiredWorkbook> {
        let mut last_miss = None;

        for candidate in &self.candidates {
            info!("Trying to fetch: {candidate}");
            match self.fetch(candidate).await {
                Ok(bytes) => {
                    if bytes.is_empty() {
                        return Err(AppError::acquisition("Excel file is empty or corrupted"));
                    }
                    info!("File loaded successfully from {candidate}, size: {} bytes", bytes.len());
                    return Ok(AcquiredWorkbook {
                        bytes,
                        source: candidate.to_string(),
                    });
                }
                Err(reason) => {
                    warn!("Failed to fetch from {candidate}: {reason}");
                    last_miss = Some(reason);
                }
            }
        }

        Err(AppError::acquisition(remediation_message(
            &self.candidates,
            last_miss.as_deref(),
        )))
    }

    async fn fetch(&self, candidate: &SourceCandidate) -> std::result::Result<Vec<u8>, String> {
        match candidate {
            SourceCandidate::Url(url) => {
                let response = self.client.get(url).send().await.map_err(|e| e.to_string())?;
                let status = response.status();
                if !status.is_success() {
                    return Err(format!("Response status: {status}"));
                }
                let body = response.bytes().await.map_err(|e| e.to_string())?;
                Ok(body.to_vec())
            }
            SourceCandidate::Path(path) => tokio::fs::read(path).await.map_err(|e| e.to_string()),
        }
    }
}

/// Message shown when no candidate could be read.
pub fn remediation_message(candidates: &[SourceCandidate], last_miss: Option<&str>) -> String {
    let locations: Vec<String> = candidates.iter().map(|c| format!("  • {c}")).collect();
    format!(
        "Failed to load Excel file from any of these locations:\n{locations}\n\n\
         Please ensure:\n\
         1. The file '{WORKBOOK_FILE_NAME}' exists at one of the locations above\n\
         2. The file name is exactly '{WORKBOOK_FILE_NAME}' (case-sensitive)\n\
         3. The server hosting any URL location is running\n\
         4. The file can be opened directly from that location\n\n\
         Last failure: {last}",
        locations = locations.join("\n"),
        last = last_miss.unwrap_or("no candidates configured"),
    )
}

/// Reject selections that are not `.xlsx` files.
pub fn validate_upload_name(path: &Path) -> Result<()> {
    let is_xlsx = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(".xlsx"));
    if is_xlsx {
        Ok(())
    } else {
        Err(AppError::acquisition("Please select an Excel file (.xlsx)"))
    }
}

/// Read a user-selected workbook.
pub async fn read_local_file(path: &Path) -> Result<AcquiredWorkbook> {
    validate_upload_name(path)?;
    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(AppError::acquisition("Excel file is empty or corrupted"));
    }
    info!("Uploaded file read: {}, size: {} bytes", path.display(), bytes.len());
    Ok(AcquiredWorkbook {
        bytes,
        source: path.display().to_string(),
    })
}

/// Open a native file picker filtered to Excel workbooks.
pub fn pick_local_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select attendance workbook")
        .add_filter("Excel Files", &["xlsx"])
        .pick_file()
}
