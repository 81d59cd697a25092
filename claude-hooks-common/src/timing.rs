//! Start files for timing long-running operations.
//!
//! A pre-tool hook writes the current unix time into a start file; the
//! matching post-tool hook consumes it to work out how long the operation
//! ran.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::HooksResult;

/// Default minimum duration, in seconds, before a timed operation notifies.
pub const DEFAULT_THRESHOLD_SECS: u64 = 30;

/// Write `now` as whole unix seconds to `path`, creating parent directories.
pub fn create_start_file(path: &Path, now: DateTime<Utc>) -> HooksResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, now.timestamp().to_string())?;
    debug!(path = %path.display(), "Wrote start file");
    Ok(())
}

/// Consume a start file and return the elapsed time since it was written.
///
/// Returns `None` when the file does not exist or does not hold a unix
/// timestamp. The file is removed either way once it has been found.
pub fn take_elapsed(path: &Path, now: DateTime<Utc>) -> Option<Duration> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No start file");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), "Failed to read start file: {}", e);
            remove_quietly(path);
            return None;
        }
    };

    remove_quietly(path);

    let started: f64 = match contents.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(path = %path.display(), "Start file does not contain a timestamp");
            return None;
        }
    };

    let now_secs = now.timestamp_millis() as f64 / 1000.0;
    let elapsed = (now_secs - started).max(0.0);
    Some(Duration::from_secs(elapsed as u64))
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        debug!(path = %path.display(), "Could not remove start file: {}", e);
    }
}

/// Render seconds as `"<m>m <s>s"`.
pub fn format_duration(total_secs: u64) -> String {
    format!("{}m {}s", total_secs / 60, total_secs % 60)
}
