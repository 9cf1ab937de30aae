use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use tracing::info;
use crate::analyzer::AnalysisResult;
use crate::error::Result;

const HEAVY_RULE: &str = "==================================================";
const LIGHT_RULE: &str = "--------------------------------------------------";

/// One analysis outcome as it is written to the call log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub transcript: String,
    pub summary: String,
    pub sentiment: String,
}

impl LogEntry {
    pub fn new(transcript: &str, result: &AnalysisResult) -> Self {
        Self {
            timestamp: Local::now(),
            transcript: transcript.to_string(),
            summary: result.summary.clone(),
            sentiment: result.sentiment.to_string(),
        }
    }

    pub fn format_block(&self) -> String {
        format!(
            "\n{heavy}\nLog Entry: {ts}\n{heavy}\n\n\
             [Transcript]\n{transcript}\n\n{light}\n\n\
             [Summary]\n{summary}\n\n{light}\n\n\
             [Sentiment]\n{sentiment}\n\n{heavy}\n\n\n",
            heavy = HEAVY_RULE,
            light = LIGHT_RULE,
            ts = self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            transcript = self.transcript,
            summary = self.summary,
            sentiment = self.sentiment,
        )
    }
}

/// Append-only text log shared by every request.
pub struct CallLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CallLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one block. Appends are serialized so concurrent requests never interleave.
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let block = entry.format_block();
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(block.as_bytes())?;
        file.flush()?;

        info!("Appended call analysis to {}", self.path.display());
        Ok(())
    }
}
