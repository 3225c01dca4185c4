//! Append-only JSONL event log.
//!
//! One serde-serialized record per line, synced per write so a record is
//! never torn by a shutdown mid-line.

use crate::events::DetectionMethod;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the monitor did with a detected event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    /// Recorded without scheduling (observation mode or unaddressable).
    Observed,
    /// Reply task enqueued.
    Scheduled,
    /// Reply task fired and the send succeeded (or was a dry run).
    Sent,
    /// Reply task fired but the sender reported failure.
    Failed,
    /// Reply cap reached; event never entered the queue.
    Dropped,
    /// Pending task abandoned at shutdown.
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub contact: String,
    pub detection_method: DetectionMethod,
    pub action: LogAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_used: Option<f64>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct EventLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl EventLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, EventLogError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, record: &LogRecord) -> Result<(), EventLogError> {
        let json = serde_json::to_string(record)?;
        let mut file = self.file.lock();
        writeln!(file, "{}", json)?;
        file.sync_all()?;
        Ok(())
    }
}
