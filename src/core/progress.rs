//! Append-only, timestamped progress log of ETL milestones

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ProgressLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `<timestamp> : <message>` as a new line.
    pub fn record(&self, message: &str) -> Result<()> {
        self.record_at(Local::now(), message)
    }

    pub(crate) fn record_at(&self, at: DateTime<Local>, message: &str) -> Result<()> {
        let line = format!("{} : {}\n", at.format(TIMESTAMP_FORMAT), message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open progress log: {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to write progress log: {}", self.path.display()))?;

        debug!(message, "Recorded progress");
        Ok(())
    }
}
