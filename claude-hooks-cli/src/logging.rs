//! Tracing setup for the CLI.
//!
//! Logs always go to stderr. Hosts often swallow hook stderr, so a log file
//! can be added on top with `--log-file` / `CLAUDE_HOOKS_LOG_FILE`.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Filter used with `--debug`.
pub const DEBUG_FILTER: &str = "claude_hooks=debug,claude_hooks_common=debug";

/// A thread-safe writer that flushes and syncs the log file after every write.
///
/// A hook process can be killed by its host at any moment, so nothing is
/// left sitting in a buffer.
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    /// Creates a new `FileWriterGuard` wrapping the given file.
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }

    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file mutex was poisoned"))?;
        f(&mut file)
    }
}

impl io::Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| {
            let written = file.write(buf)?;
            file.flush()?;
            file.sync_all()?;
            Ok(written)
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| {
            file.flush()?;
            file.sync_all()
        })
    }
}

/// Build the level filter: `--debug` wins, then `RUST_LOG`, then `warn`.
pub fn env_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Open `path` for appending, creating parent directories as needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
pub fn init(debug: bool, log_file: Option<&Path>) {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(io::stderr);

    let file_layer = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => {
            let shared_file = Arc::new(Mutex::new(file));
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(move || FileWriterGuard::new(shared_file.clone())),
            )
        }
        Err(e) => {
            eprintln!(
                "Warning: Could not open log file {}: {}. Logging to stderr only.",
                path.display(),
                e
            );
            None
        }
    });

    registry()
        .with(env_filter(debug))
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
