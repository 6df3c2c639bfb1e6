//! Append-only audit logging.
//!
//! Every line is `<ISO-8601 timestamp>: <message>`, appended to the
//! channel's file in a single write and mirrored to the console through
//! `tracing`. The log directory is created once, in [`AuditLog::open`],
//! before the event router starts accepting events.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, SecondsFormat};
use parking_lot::Mutex;

use crate::error::AuditError;

/// Which append-only file a line lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogChannel {
    /// General events and the connection banner (`main.log`).
    Main,
    /// One line per issued token (`auth.log`).
    Auth,
    /// Reserved (`err.log`); handler failures currently surface on the
    /// console only.
    Err,
}

impl LogChannel {
    fn file_name(self) -> &'static str {
        match self {
            LogChannel::Main => "main.log",
            LogChannel::Auth => "auth.log",
            LogChannel::Err => "err.log",
        }
    }
}

impl fmt::Display for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Append-only, timestamped audit trail.
///
/// Write-only by contract: nothing in the bot reads these files back, and
/// they are never rotated or truncated.
#[derive(Debug)]
pub struct AuditLog {
    dir: PathBuf,
    // Serializes appends so concurrent event handlers cannot interleave
    // partial lines.
    write_lock: Mutex<()>,
}

impl AuditLog {
    /// Create the log directory and return a ready-to-use log.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| AuditError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of a channel's backing file.
    pub fn path(&self, channel: LogChannel) -> PathBuf {
        self.dir.join(channel.file_name())
    }

    /// Append one timestamped line to `channel` and mirror it to the
    /// console.
    ///
    /// A failed append fails the whole recording attempt; the entry is
    /// never dropped silently.
    pub fn record(&self, channel: LogChannel, message: &str) -> Result<(), AuditError> {
        let now = Local::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let line = format!("{}: {}\n", now, message);
        let path = self.path(channel);

        {
            let _guard = self.write_lock.lock();
            let mut file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&path)
                .map_err(|source| AuditError::Append {
                    path: path.display().to_string(),
                    source,
                })?;
            // One write per line keeps appends atomic at line granularity.
            file.write_all(line.as_bytes())
                .map_err(|source| AuditError::Append {
                    path: path.display().to_string(),
                    source,
                })?;
        }

        tracing::info!(log = %channel, "{}", message);
        Ok(())
    }
}
