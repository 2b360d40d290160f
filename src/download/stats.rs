use std::fmt;
use std::time::Duration;

use indicatif::HumanBytes;

use super::file::PersistOutcome;

/// Counters for one download run. Reset at the start of each run and never
/// persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Items examined, including the first one past the item cap.
    pub total: u64,
    /// Payloads written by this run.
    pub downloaded: u64,
    /// Items whose persistence failed.
    pub errors: u64,
    /// Payload bytes written by this run.
    pub bytes: u64,
}

impl RunStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_seen(&mut self) {
        self.total += 1;
    }

    pub fn record_outcome(&mut self, outcome: PersistOutcome) {
        match outcome {
            PersistOutcome::Downloaded { bytes } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            PersistOutcome::AlreadyDownloaded => {}
        }
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed: {}, Downloaded: {}, Errors: {}, Total Size: {}",
            self.total,
            self.downloaded,
            self.errors,
            HumanBytes(self.bytes)
        )
    }
}

pub(crate) fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
